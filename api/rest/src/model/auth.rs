use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::not_blank;

#[derive(Deserialize, Validate)]
pub struct RegisterReqJson {
    #[validate(
        length(max = 200, message = "name is too long"),
        custom(function = "not_blank", message = "name must not be empty")
    )]
    name: String,
    #[validate(email(message = "email is not a valid address"))]
    email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    password: String,
    #[validate(
        length(max = 200, message = "country is too long"),
        custom(function = "not_blank", message = "country must not be empty")
    )]
    country: String,
    #[serde(default)]
    #[validate(length(max = 300))]
    organization: String,
}

impl RegisterReqJson {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }
}

#[derive(Serialize)]
pub struct RegisterResJson {
    id: Uuid,
}

impl RegisterResJson {
    pub fn new(id: &Uuid) -> Self {
        Self { id: *id }
    }
}

#[derive(Deserialize)]
pub struct VerifyEmailReqJson {
    token: String,
}

impl VerifyEmailReqJson {
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Shared by resend-verification and forgot-password.
#[derive(Deserialize, Validate)]
pub struct EmailReqJson {
    #[validate(email(message = "email is not a valid address"))]
    email: String,
}

impl EmailReqJson {
    pub fn email(&self) -> &str {
        &self.email
    }
}

#[derive(Deserialize)]
pub struct LoginReqJson {
    email: String,
    password: String,
}

impl LoginReqJson {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

#[derive(Serialize)]
pub struct LoginResJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    two_factor_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<Uuid>,
}

impl LoginResJson {
    pub fn token(token: &str) -> Self {
        Self {
            token: Some(token.to_owned()),
            two_factor_required: false,
            user_id: None,
        }
    }

    pub fn two_factor_required(user_id: &Uuid) -> Self {
        Self {
            token: None,
            two_factor_required: true,
            user_id: Some(*user_id),
        }
    }
}

#[derive(Deserialize)]
pub struct LoginTwoFactorReqJson {
    user_id: Uuid,
    code: String,
}

impl LoginTwoFactorReqJson {
    pub fn user_id(&self) -> &Uuid {
        &self.user_id
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

#[derive(Deserialize, Validate)]
pub struct ResetPasswordReqJson {
    token: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    password: String,
}

impl ResetPasswordReqJson {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}
