use std::time::Duration;

use serde::Deserialize;

#[derive(Deserialize)]
pub struct AuthConfig {
    #[serde(deserialize_with = "duration_str::deserialize_duration")]
    verification_ttl: Duration,
    #[serde(deserialize_with = "duration_str::deserialize_duration")]
    reset_password_ttl: Duration,
    #[serde(deserialize_with = "duration_str::deserialize_duration")]
    two_factor_ttl: Duration,
    #[serde(deserialize_with = "duration_str::deserialize_duration")]
    session_ttl: Duration,
    #[serde(default)]
    admin_emails: Vec<String>,
}

impl AuthConfig {
    pub fn verification_ttl(&self) -> &Duration {
        &self.verification_ttl
    }

    pub fn reset_password_ttl(&self) -> &Duration {
        &self.reset_password_ttl
    }

    pub fn two_factor_ttl(&self) -> &Duration {
        &self.two_factor_ttl
    }

    pub fn session_ttl(&self) -> &Duration {
        &self.session_ttl
    }

    pub fn admin_emails(&self) -> &Vec<String> {
        &self.admin_emails
    }
}
