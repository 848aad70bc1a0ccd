use chrono::{DateTime, Utc};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(FromRow)]
pub struct UserModel {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    country: String,
    organization: String,
    is_verified: bool,
    verification_token: Option<String>,
    verification_expires_at: Option<DateTime<Utc>>,
    reset_token: Option<String>,
    reset_expires_at: Option<DateTime<Utc>>,
    two_factor_enabled: bool,
    two_factor_code: Option<String>,
    two_factor_expires_at: Option<DateTime<Utc>>,
    two_factor_attempts: i32,
}

impl UserModel {
    pub fn new(
        id: &Uuid,
        created_at: &DateTime<Utc>,
        updated_at: &DateTime<Utc>,
        name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
        country: &str,
        organization: &str,
        is_verified: &bool,
        verification_token: &Option<String>,
        verification_expires_at: &Option<DateTime<Utc>>,
        reset_token: &Option<String>,
        reset_expires_at: &Option<DateTime<Utc>>,
        two_factor_enabled: &bool,
        two_factor_code: &Option<String>,
        two_factor_expires_at: &Option<DateTime<Utc>>,
        two_factor_attempts: &i32,
    ) -> Self {
        Self {
            id: *id,
            created_at: *created_at,
            updated_at: *updated_at,
            name: name.to_owned(),
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
            role: role.to_owned(),
            country: country.to_owned(),
            organization: organization.to_owned(),
            is_verified: *is_verified,
            verification_token: verification_token.clone(),
            verification_expires_at: *verification_expires_at,
            reset_token: reset_token.clone(),
            reset_expires_at: *reset_expires_at,
            two_factor_enabled: *two_factor_enabled,
            two_factor_code: two_factor_code.clone(),
            two_factor_expires_at: *two_factor_expires_at,
            two_factor_attempts: *two_factor_attempts,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub fn updated_at(&self) -> &DateTime<Utc> {
        &self.updated_at
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn is_verified(&self) -> &bool {
        &self.is_verified
    }

    pub fn verification_token(&self) -> &Option<String> {
        &self.verification_token
    }

    pub fn verification_expires_at(&self) -> &Option<DateTime<Utc>> {
        &self.verification_expires_at
    }

    pub fn reset_token(&self) -> &Option<String> {
        &self.reset_token
    }

    pub fn reset_expires_at(&self) -> &Option<DateTime<Utc>> {
        &self.reset_expires_at
    }

    pub fn two_factor_enabled(&self) -> &bool {
        &self.two_factor_enabled
    }

    pub fn two_factor_code(&self) -> &Option<String> {
        &self.two_factor_code
    }

    pub fn two_factor_expires_at(&self) -> &Option<DateTime<Utc>> {
        &self.two_factor_expires_at
    }

    pub fn two_factor_attempts(&self) -> &i32 {
        &self.two_factor_attempts
    }
}
