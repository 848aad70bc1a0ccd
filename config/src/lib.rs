use std::fs::File;

use serde::Deserialize;

use self::{
    api::ApiConfig, app::AppConfig, application::ApplicationConfig, auth::AuthConfig,
    db::DbConfig, hash::HashConfig, log::LogConfig, mailer::MailerConfig, token::TokenConfig,
};

pub mod api;
pub mod app;
pub mod application;
pub mod auth;
pub mod db;
pub mod hash;
pub mod log;
pub mod mailer;
pub mod token;

#[derive(Deserialize)]
pub struct Config {
    app: AppConfig,
    log: LogConfig,
    hash: HashConfig,
    token: TokenConfig,
    mailer: Option<MailerConfig>,
    db: DbConfig,
    auth: AuthConfig,
    application: ApplicationConfig,
    api: ApiConfig,
}

impl Config {
    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    pub fn log(&self) -> &LogConfig {
        &self.log
    }

    pub fn hash(&self) -> &HashConfig {
        &self.hash
    }

    pub fn token(&self) -> &TokenConfig {
        &self.token
    }

    pub fn mailer(&self) -> &Option<MailerConfig> {
        &self.mailer
    }

    pub fn db(&self) -> &DbConfig {
        &self.db
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    pub fn application(&self) -> &ApplicationConfig {
        &self.application
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }
}

pub fn from_str(yaml: &str) -> Result<Config, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

pub fn from_path(path: &str) -> Config {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => panic!("Failed to open config file '{path}': {err}"),
    };
    match serde_yaml::from_reader::<_, Config>(file) {
        Ok(config) => config,
        Err(err) => panic!("Failed to parse config file '{path}': {err}"),
    }
}
