use std::time::Duration;

use anyhow::{Error, Result};
use chrono::{DateTime, Utc};
use pp_db_postgresql::model::user::UserModel as UserPostgresModel;
use pp_db_sqlite::model::user::UserModel as UserSqliteModel;
use uuid::Uuid;

use crate::{dto::pagination::Pagination, util::random, Db};

/// Wrong guesses allowed against one two-factor code before it is dropped.
pub const MAX_TWO_FACTOR_ATTEMPTS: i32 = 5;

pub struct UserDao {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    name: String,
    email: String,
    password_hash: String,
    role: UserRole,
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

impl UserDao {
    pub fn new(
        name: &str,
        email: &str,
        password_hash: &str,
        role: &UserRole,
        country: &str,
        organization: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
            name: name.trim().to_owned(),
            email: normalize_email(email),
            password_hash: password_hash.to_owned(),
            role: *role,
            country: country.trim().to_owned(),
            organization: organization.trim().to_owned(),
            is_verified: false,
            verification_token: None,
            verification_expires_at: None,
            reset_token: None,
            reset_expires_at: None,
            two_factor_enabled: false,
            two_factor_code: None,
            two_factor_expires_at: None,
            two_factor_attempts: 0,
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

    pub fn role(&self) -> &UserRole {
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

    pub fn two_factor_enabled(&self) -> &bool {
        &self.two_factor_enabled
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_owned();
    }

    pub fn set_country(&mut self, country: &str) {
        self.country = country.trim().to_owned();
    }

    pub fn set_organization(&mut self, organization: &str) {
        self.organization = organization.trim().to_owned();
    }

    pub fn set_password_hash(&mut self, password_hash: &str) {
        self.password_hash = password_hash.to_owned();
    }

    pub fn set_two_factor_enabled(&mut self, enabled: &bool) {
        self.two_factor_enabled = *enabled;
        if !enabled {
            self.two_factor_code = None;
            self.two_factor_expires_at = None;
            self.two_factor_attempts = 0;
        }
    }

    /// Replaces any previous verification token. Returns the new token.
    pub fn issue_verification_token(&mut self, ttl: &Duration) -> Result<String> {
        let token = random::url_token();
        self.verification_token = Some(token.clone());
        self.verification_expires_at = Some(expires_at(ttl)?);
        Ok(token)
    }

    /// Marks the email verified when `token` matches the unexpired verification token.
    pub fn verify_email(&mut self, token: &str) -> bool {
        if !is_live(&self.verification_token, &self.verification_expires_at, token) {
            return false;
        }
        self.is_verified = true;
        self.verification_token = None;
        self.verification_expires_at = None;
        true
    }

    pub fn issue_reset_token(&mut self, ttl: &Duration) -> Result<String> {
        let token = random::url_token();
        self.reset_token = Some(token.clone());
        self.reset_expires_at = Some(expires_at(ttl)?);
        Ok(token)
    }

    /// Clears the reset token if it matches and has not expired. The caller sets the new hash.
    pub fn consume_reset_token(&mut self, token: &str) -> bool {
        if !is_live(&self.reset_token, &self.reset_expires_at, token) {
            return false;
        }
        self.reset_token = None;
        self.reset_expires_at = None;
        true
    }

    pub fn issue_two_factor_code(&mut self, ttl: &Duration) -> Result<String> {
        let code = random::numeric_code();
        self.two_factor_code = Some(code.clone());
        self.two_factor_expires_at = Some(expires_at(ttl)?);
        self.two_factor_attempts = 0;
        Ok(code)
    }

    /// A miss against a pending code counts as an attempt. The code is dropped
    /// once [`MAX_TWO_FACTOR_ATTEMPTS`] misses are reached, so the caller must
    /// persist the record whichever way this returns.
    pub fn consume_two_factor_code(&mut self, code: &str) -> bool {
        if is_live(&self.two_factor_code, &self.two_factor_expires_at, code) {
            self.two_factor_code = None;
            self.two_factor_expires_at = None;
            self.two_factor_attempts = 0;
            return true;
        }
        if self.two_factor_code.is_some() {
            self.two_factor_attempts += 1;
            if self.two_factor_attempts >= MAX_TWO_FACTOR_ATTEMPTS {
                self.two_factor_code = None;
                self.two_factor_expires_at = None;
                self.two_factor_attempts = 0;
            }
        }
        false
    }

    pub async fn db_insert(&self, db: &Db) -> Result<()> {
        match db {
            Db::PostgresqlDb(db) => db.insert_user(&self.to_postgresdb_model()).await,
            Db::SqliteDb(db) => db.insert_user(&self.to_sqlitedb_model()).await,
        }
    }

    pub async fn db_select(db: &Db, id: &Uuid) -> Result<Option<Self>> {
        match db {
            Db::PostgresqlDb(db) => db
                .select_user(id)
                .await?
                .map(|model| Self::from_postgresdb_model(&model))
                .transpose(),
            Db::SqliteDb(db) => db
                .select_user(id)
                .await?
                .map(|model| Self::from_sqlitedb_model(&model))
                .transpose(),
        }
    }

    pub async fn db_select_by_email(db: &Db, email: &str) -> Result<Option<Self>> {
        let email = normalize_email(email);
        match db {
            Db::PostgresqlDb(db) => db
                .select_user_by_email(&email)
                .await?
                .map(|model| Self::from_postgresdb_model(&model))
                .transpose(),
            Db::SqliteDb(db) => db
                .select_user_by_email(&email)
                .await?
                .map(|model| Self::from_sqlitedb_model(&model))
                .transpose(),
        }
    }

    pub async fn db_select_by_verification_token(db: &Db, token: &str) -> Result<Option<Self>> {
        match db {
            Db::PostgresqlDb(db) => db
                .select_user_by_verification_token(token)
                .await?
                .map(|model| Self::from_postgresdb_model(&model))
                .transpose(),
            Db::SqliteDb(db) => db
                .select_user_by_verification_token(token)
                .await?
                .map(|model| Self::from_sqlitedb_model(&model))
                .transpose(),
        }
    }

    pub async fn db_select_by_reset_token(db: &Db, token: &str) -> Result<Option<Self>> {
        match db {
            Db::PostgresqlDb(db) => db
                .select_user_by_reset_token(token)
                .await?
                .map(|model| Self::from_postgresdb_model(&model))
                .transpose(),
            Db::SqliteDb(db) => db
                .select_user_by_reset_token(token)
                .await?
                .map(|model| Self::from_sqlitedb_model(&model))
                .transpose(),
        }
    }

    pub async fn db_select_many(db: &Db, pagination: &Pagination) -> Result<(Vec<Self>, i64)> {
        let offset = pagination.offset();
        match db {
            Db::PostgresqlDb(db) => {
                let (users, total) = tokio::try_join!(
                    db.select_many_users(pagination.limit(), &offset),
                    db.count_users()
                )?;
                let mut users_data = Vec::with_capacity(users.len());
                for user in &users {
                    users_data.push(Self::from_postgresdb_model(user)?);
                }
                Ok((users_data, total))
            }
            Db::SqliteDb(db) => {
                let (users, total) = tokio::try_join!(
                    db.select_many_users(pagination.limit(), &offset),
                    db.count_users()
                )?;
                let mut users_data = Vec::with_capacity(users.len());
                for user in &users {
                    users_data.push(Self::from_sqlitedb_model(user)?);
                }
                Ok((users_data, total))
            }
        }
    }

    pub async fn db_count(db: &Db) -> Result<i64> {
        match db {
            Db::PostgresqlDb(db) => db.count_users().await,
            Db::SqliteDb(db) => db.count_users().await,
        }
    }

    pub async fn db_update(&mut self, db: &Db) -> Result<()> {
        self.updated_at = Utc::now();
        match db {
            Db::PostgresqlDb(db) => db.update_user(&self.to_postgresdb_model()).await,
            Db::SqliteDb(db) => db.update_user(&self.to_sqlitedb_model()).await,
        }
    }

    fn from_postgresdb_model(model: &UserPostgresModel) -> Result<Self> {
        Ok(Self {
            id: *model.id(),
            created_at: *model.created_at(),
            updated_at: *model.updated_at(),
            name: model.name().to_owned(),
            email: model.email().to_owned(),
            password_hash: model.password_hash().to_owned(),
            role: UserRole::from_str(model.role())?,
            country: model.country().to_owned(),
            organization: model.organization().to_owned(),
            is_verified: *model.is_verified(),
            verification_token: model.verification_token().clone(),
            verification_expires_at: *model.verification_expires_at(),
            reset_token: model.reset_token().clone(),
            reset_expires_at: *model.reset_expires_at(),
            two_factor_enabled: *model.two_factor_enabled(),
            two_factor_code: model.two_factor_code().clone(),
            two_factor_expires_at: *model.two_factor_expires_at(),
            two_factor_attempts: *model.two_factor_attempts(),
        })
    }

    fn to_postgresdb_model(&self) -> UserPostgresModel {
        UserPostgresModel::new(
            &self.id,
            &self.created_at,
            &self.updated_at,
            &self.name,
            &self.email,
            &self.password_hash,
            self.role.to_str(),
            &self.country,
            &self.organization,
            &self.is_verified,
            &self.verification_token,
            &self.verification_expires_at,
            &self.reset_token,
            &self.reset_expires_at,
            &self.two_factor_enabled,
            &self.two_factor_code,
            &self.two_factor_expires_at,
            &self.two_factor_attempts,
        )
    }

    fn from_sqlitedb_model(model: &UserSqliteModel) -> Result<Self> {
        Ok(Self {
            id: *model.id(),
            created_at: *model.created_at(),
            updated_at: *model.updated_at(),
            name: model.name().to_owned(),
            email: model.email().to_owned(),
            password_hash: model.password_hash().to_owned(),
            role: UserRole::from_str(model.role())?,
            country: model.country().to_owned(),
            organization: model.organization().to_owned(),
            is_verified: *model.is_verified(),
            verification_token: model.verification_token().clone(),
            verification_expires_at: *model.verification_expires_at(),
            reset_token: model.reset_token().clone(),
            reset_expires_at: *model.reset_expires_at(),
            two_factor_enabled: *model.two_factor_enabled(),
            two_factor_code: model.two_factor_code().clone(),
            two_factor_expires_at: *model.two_factor_expires_at(),
            two_factor_attempts: *model.two_factor_attempts(),
        })
    }

    fn to_sqlitedb_model(&self) -> UserSqliteModel {
        UserSqliteModel::new(
            &self.id,
            &self.created_at,
            &self.updated_at,
            &self.name,
            &self.email,
            &self.password_hash,
            self.role.to_str(),
            &self.country,
            &self.organization,
            &self.is_verified,
            &self.verification_token,
            &self.verification_expires_at,
            &self.reset_token,
            &self.reset_expires_at,
            &self.two_factor_enabled,
            &self.two_factor_code,
            &self.two_factor_expires_at,
            &self.two_factor_attempts,
        )
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UserRole {
    Applicant,
    Admin,
}

impl UserRole {
    pub fn from_str(str: &str) -> Result<Self> {
        match str {
            "applicant" => Ok(Self::Applicant),
            "admin" => Ok(Self::Admin),
            _ => Err(Error::msg(format!("Unknown user role '{str}'"))),
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Self::Applicant => "applicant",
            Self::Admin => "admin",
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn expires_at(ttl: &Duration) -> Result<DateTime<Utc>> {
    Utc::now()
        .checked_add_signed(chrono::Duration::from_std(*ttl)?)
        .ok_or_else(|| Error::msg("Token ttl is out of range"))
}

fn is_live(stored: &Option<String>, expires_at: &Option<DateTime<Utc>>, given: &str) -> bool {
    match (stored, expires_at) {
        (Some(stored), Some(expires_at)) => stored == given && *expires_at > Utc::now(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_db;

    fn applicant() -> UserDao {
        UserDao::new(
            "Amina Diallo",
            "  Amina@Example.ORG ",
            "$argon2id$hash",
            &UserRole::Applicant,
            "Senegal",
            "Senegal National Commission for UNESCO",
        )
    }

    #[test]
    fn normalizes_email_on_create() {
        let user = applicant();
        assert_eq!(user.email(), "amina@example.org");
        assert!(!user.is_verified());
        assert!(!user.is_admin());
    }

    #[test]
    fn verification_token_is_single_use() {
        let mut user = applicant();
        let token = user
            .issue_verification_token(&Duration::from_secs(3600))
            .unwrap();

        assert!(!user.verify_email("not-the-token"));
        assert!(user.verify_email(&token));
        assert!(user.is_verified());
        assert!(!user.verify_email(&token));
    }

    #[test]
    fn expired_reset_token_is_rejected() {
        let mut user = applicant();
        let token = user.issue_reset_token(&Duration::from_secs(0)).unwrap();

        assert!(!user.consume_reset_token(&token));
    }

    #[test]
    fn disabling_two_factor_drops_pending_code() {
        let mut user = applicant();
        user.set_two_factor_enabled(&true);
        let code = user
            .issue_two_factor_code(&Duration::from_secs(600))
            .unwrap();

        user.set_two_factor_enabled(&false);

        assert!(!user.consume_two_factor_code(&code));
    }

    #[test]
    fn two_factor_code_dies_after_too_many_misses() {
        let mut user = applicant();
        let code = user
            .issue_two_factor_code(&Duration::from_secs(600))
            .unwrap();

        for _ in 0..MAX_TWO_FACTOR_ATTEMPTS {
            assert!(!user.consume_two_factor_code("not-a-code"));
        }
        assert!(!user.consume_two_factor_code(&code));

        let code = user
            .issue_two_factor_code(&Duration::from_secs(600))
            .unwrap();
        assert!(!user.consume_two_factor_code("not-a-code"));
        assert!(user.consume_two_factor_code(&code));
    }

    #[test]
    fn parses_roles() {
        assert_eq!(UserRole::from_str("admin").unwrap(), UserRole::Admin);
        assert_eq!(UserRole::Applicant.to_str(), "applicant");
        assert!(UserRole::from_str("superuser").is_err());
    }

    #[tokio::test]
    async fn persists_and_reloads_user() {
        let db = test_db::sqlite().await;
        let mut user = applicant();
        let token = user
            .issue_verification_token(&Duration::from_secs(3600))
            .unwrap();
        user.db_insert(&db).await.unwrap();

        let mut loaded = UserDao::db_select_by_verification_token(&db, &token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.id(), user.id());
        assert!(loaded.verify_email(&token));
        loaded.db_update(&db).await.unwrap();

        let reloaded = UserDao::db_select_by_email(&db, "AMINA@example.org")
            .await
            .unwrap()
            .unwrap();
        assert!(reloaded.is_verified());
        assert!(UserDao::db_select_by_verification_token(&db, &token)
            .await
            .unwrap()
            .is_none());

        let (users, total) = UserDao::db_select_many(&db, &Pagination::new(&None, &None, &10))
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn two_factor_misses_survive_reload() {
        let db = test_db::sqlite().await;
        let mut user = applicant();
        let code = user
            .issue_two_factor_code(&Duration::from_secs(600))
            .unwrap();
        user.db_insert(&db).await.unwrap();

        for _ in 0..MAX_TWO_FACTOR_ATTEMPTS {
            let mut loaded = UserDao::db_select(&db, user.id()).await.unwrap().unwrap();
            assert!(!loaded.consume_two_factor_code("not-a-code"));
            loaded.db_update(&db).await.unwrap();
        }

        let mut loaded = UserDao::db_select(&db, user.id()).await.unwrap().unwrap();
        assert!(!loaded.consume_two_factor_code(&code));
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let db = test_db::sqlite().await;
        applicant().db_insert(&db).await.unwrap();

        assert!(applicant().db_insert(&db).await.is_err());
    }
}
