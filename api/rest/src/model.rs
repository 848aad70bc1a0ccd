use actix_web::{http::StatusCode, HttpResponse, HttpResponseBuilder};
use pp_error::Error;
use serde::{Deserialize, Serialize};
use validator::ValidationError;

pub mod account;
pub mod admin;
pub mod application;
pub mod auth;
pub mod message;
pub mod review;
pub mod token;

#[derive(Serialize, Deserialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorRes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<PaginationRes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl Response {
    pub fn data<T: Serialize>(
        status_code: &StatusCode,
        pagination: &Option<PaginationRes>,
        data: T,
    ) -> HttpResponse {
        match serde_json::to_value(data) {
            Ok(data) => HttpResponseBuilder::new(*status_code).json(Self {
                error: None,
                pagination: *pagination,
                data: Some(data),
            }),
            Err(err) => Self::error(&Error::InternalServerError(err.to_string())),
        }
    }

    pub fn error(err: &Error) -> HttpResponse {
        let status_code = match err {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self::error_raw(&status_code, err.message())
    }

    pub fn error_raw(status_code: &StatusCode, message: &str) -> HttpResponse {
        if status_code.is_server_error() {
            pp_log::error(None, message);
        } else {
            pp_log::debug(None, format!("{status_code}: {message}"));
        }

        HttpResponseBuilder::new(*status_code).json(Self {
            error: Some(ErrorRes {
                status: match status_code.canonical_reason() {
                    Some(reason) => reason.to_owned(),
                    None => "Unknown".to_owned(),
                },
                message: message.to_owned(),
            }),
            pagination: None,
            data: None,
        })
    }

    #[cfg(test)]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|err| err.message.as_str())
    }

    #[cfg(test)]
    pub fn pagination(&self) -> &Option<PaginationRes> {
        &self.pagination
    }

    #[cfg(test)]
    pub fn into_data(self) -> serde_json::Value {
        self.data.unwrap_or_default()
    }
}

#[derive(Serialize, Deserialize)]
pub struct ErrorRes {
    status: String,
    message: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct PaginationRes {
    count: usize,
    total: i64,
}

impl PaginationRes {
    pub fn new(count: &usize, total: &i64) -> Self {
        Self {
            count: *count,
            total: *total,
        }
    }
}

/// Rejects values that are empty once surrounding whitespace is trimmed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Body of endpoints that only acknowledge an action.
#[derive(Serialize)]
pub struct NoticeResJson {
    message: String,
}

impl NoticeResJson {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

#[derive(Deserialize)]
pub struct PageReqQuery {
    page: Option<i64>,
    limit: Option<i64>,
}

impl PageReqQuery {
    pub fn page(&self) -> &Option<i64> {
        &self.page
    }

    pub fn limit(&self) -> &Option<i64> {
        &self.limit
    }
}
