use chrono::{DateTime, Utc};
use pp_dao::user::UserDao;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::not_blank;

#[derive(Serialize)]
pub struct UserResJson {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    name: String,
    email: String,
    role: String,
    country: String,
    organization: String,
    is_verified: bool,
    two_factor_enabled: bool,
}

impl UserResJson {
    pub fn from_dao(user: &UserDao) -> Self {
        Self {
            id: *user.id(),
            created_at: *user.created_at(),
            updated_at: *user.updated_at(),
            name: user.name().to_owned(),
            email: user.email().to_owned(),
            role: user.role().to_str().to_owned(),
            country: user.country().to_owned(),
            organization: user.organization().to_owned(),
            is_verified: *user.is_verified(),
            two_factor_enabled: *user.two_factor_enabled(),
        }
    }
}

#[derive(Deserialize, Validate)]
pub struct UpdateAccountReqJson {
    #[validate(
        length(max = 200, message = "name is too long"),
        custom(function = "not_blank", message = "name must not be empty")
    )]
    name: Option<String>,
    #[validate(
        length(max = 200, message = "country is too long"),
        custom(function = "not_blank", message = "country must not be empty")
    )]
    country: Option<String>,
    #[validate(length(max = 300))]
    organization: Option<String>,
    two_factor_enabled: Option<bool>,
}

impl UpdateAccountReqJson {
    pub fn name(&self) -> &Option<String> {
        &self.name
    }

    pub fn country(&self) -> &Option<String> {
        &self.country
    }

    pub fn organization(&self) -> &Option<String> {
        &self.organization
    }

    pub fn two_factor_enabled(&self) -> &Option<bool> {
        &self.two_factor_enabled
    }

    pub fn is_all_none(&self) -> bool {
        self.name.is_none()
            && self.country.is_none()
            && self.organization.is_none()
            && self.two_factor_enabled.is_none()
    }
}

#[derive(Deserialize, Validate)]
pub struct ChangePasswordReqJson {
    current_password: String,
    #[validate(length(min = 8, message = "new_password must be at least 8 characters"))]
    new_password: String,
}

impl ChangePasswordReqJson {
    pub fn current_password(&self) -> &str {
        &self.current_password
    }

    pub fn new_password(&self) -> &str {
        &self.new_password
    }
}
