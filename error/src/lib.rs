use std::fmt;

/// Failure of a request, classified by how it is reported to the client.
#[derive(Debug)]
pub enum Error {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    InternalServerError(String),
}

impl Error {
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::InternalServerError(msg) => msg,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::InternalServerError(_) => 500,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.status_code())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(Error::BadRequest("x".to_owned()).status_code(), 400);
        assert_eq!(Error::Unauthorized("x".to_owned()).status_code(), 401);
        assert_eq!(Error::Conflict("x".to_owned()).status_code(), 409);
        assert_eq!(
            Error::InternalServerError("db down".to_owned()).message(),
            "db down"
        );
    }
}
