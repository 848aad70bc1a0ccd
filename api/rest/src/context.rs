use std::time::Duration;

use pp_dao::Db;
use pp_hash_argon2::argon2::Argon2Hash;
use pp_mailer::MailSender;
use pp_token_jwt::token::JwtToken;

pub struct ApiRestCtx {
    hash: ApiRestHashCtx,
    token: ApiRestTokenCtx,
    mailer: Option<ApiRestMailerCtx>,
    dao: ApiRestDaoCtx,
    auth: ApiRestAuthCtx,
    application: ApiRestApplicationCtx,
    public_url: String,
}

impl ApiRestCtx {
    pub fn new(
        hash: ApiRestHashCtx,
        token: ApiRestTokenCtx,
        mailer: Option<ApiRestMailerCtx>,
        dao: ApiRestDaoCtx,
        auth: ApiRestAuthCtx,
        application: ApiRestApplicationCtx,
        public_url: &str,
    ) -> Self {
        Self {
            hash,
            token,
            mailer,
            dao,
            auth,
            application,
            public_url: public_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn hash(&self) -> &ApiRestHashCtx {
        &self.hash
    }

    pub fn token(&self) -> &ApiRestTokenCtx {
        &self.token
    }

    pub fn mailer(&self) -> &Option<ApiRestMailerCtx> {
        &self.mailer
    }

    pub fn dao(&self) -> &ApiRestDaoCtx {
        &self.dao
    }

    pub fn auth(&self) -> &ApiRestAuthCtx {
        &self.auth
    }

    pub fn application(&self) -> &ApiRestApplicationCtx {
        &self.application
    }

    /// Base of the links placed in outgoing mail.
    pub fn public_url(&self) -> &str {
        &self.public_url
    }
}

pub struct ApiRestHashCtx {
    argon2: Argon2Hash,
}

impl ApiRestHashCtx {
    pub fn new(argon2: Argon2Hash) -> Self {
        Self { argon2 }
    }

    pub fn argon2(&self) -> &Argon2Hash {
        &self.argon2
    }
}

pub struct ApiRestTokenCtx {
    jwt: JwtToken,
}

impl ApiRestTokenCtx {
    pub fn new(jwt: JwtToken) -> Self {
        Self { jwt }
    }

    pub fn jwt(&self) -> &JwtToken {
        &self.jwt
    }
}

pub struct ApiRestMailerCtx {
    sender: MailSender,
}

impl ApiRestMailerCtx {
    pub fn new(sender: MailSender) -> Self {
        Self { sender }
    }

    pub fn sender(&self) -> &MailSender {
        &self.sender
    }
}

pub struct ApiRestDaoCtx {
    db: Db,
}

impl ApiRestDaoCtx {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }
}

pub struct ApiRestAuthCtx {
    verification_ttl: Duration,
    reset_password_ttl: Duration,
    two_factor_ttl: Duration,
    session_ttl: Duration,
    admin_emails: Vec<String>,
}

impl ApiRestAuthCtx {
    pub fn new(
        verification_ttl: &Duration,
        reset_password_ttl: &Duration,
        two_factor_ttl: &Duration,
        session_ttl: &Duration,
        admin_emails: &[String],
    ) -> Self {
        Self {
            verification_ttl: *verification_ttl,
            reset_password_ttl: *reset_password_ttl,
            two_factor_ttl: *two_factor_ttl,
            session_ttl: *session_ttl,
            admin_emails: admin_emails.to_vec(),
        }
    }

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

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim();
        self.admin_emails
            .iter()
            .any(|admin_email| admin_email.trim().eq_ignore_ascii_case(email))
    }
}

pub struct ApiRestApplicationCtx {
    max_budget: i64,
    page_size: i64,
}

impl ApiRestApplicationCtx {
    pub fn new(max_budget: &i64, page_size: &i64) -> Self {
        Self {
            max_budget: *max_budget,
            page_size: *page_size,
        }
    }

    pub fn max_budget(&self) -> &i64 {
        &self.max_budget
    }

    pub fn page_size(&self) -> &i64 {
        &self.page_size
    }
}
