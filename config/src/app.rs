use serde::Deserialize;

#[derive(Deserialize)]
pub struct AppConfig {
    mode: AppConfigMode,
    public_url: String,
}

impl AppConfig {
    pub fn mode(&self) -> &AppConfigMode {
        &self.mode
    }

    /// Base URL of the portal front end, used for links in outgoing mail.
    pub fn public_url(&self) -> &str {
        self.public_url.trim_end_matches('/')
    }
}

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum AppConfigMode {
    Development,
    Production,
}
