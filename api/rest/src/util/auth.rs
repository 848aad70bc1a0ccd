use actix_web_httpauth::extractors::bearer::BearerAuth;
use pp_dao::{session::SessionDao, user::UserDao};
use pp_error::Error;
use pp_token_jwt::claim::Claim;
use uuid::Uuid;

use crate::context::ApiRestCtx;

/// The user behind a bearer token together with the session the token points at.
pub struct Caller {
    claim: Claim,
    session: SessionDao,
    user: UserDao,
}

impl Caller {
    pub fn claim(&self) -> &Claim {
        &self.claim
    }

    pub fn session(&self) -> &SessionDao {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionDao {
        &mut self.session
    }

    pub fn user(&self) -> &UserDao {
        &self.user
    }

    pub fn user_mut(&mut self) -> &mut UserDao {
        &mut self.user
    }

    pub fn require_admin(&self) -> Result<(), Error> {
        if self.user.is_admin() {
            Ok(())
        } else {
            Err(Error::Forbidden(
                "This action is restricted to administrators".to_owned(),
            ))
        }
    }
}

pub async fn authenticate(ctx: &ApiRestCtx, auth: &BearerAuth) -> Result<Caller, Error> {
    let claim = ctx
        .token()
        .jwt()
        .decode(auth.token())
        .map_err(|err| Error::Unauthorized(format!("Invalid token: {err}")))?;

    let session = match SessionDao::db_select(ctx.dao().db(), claim.id()).await {
        Ok(Some(session)) if session.user_id() == claim.user_id() => session,
        Ok(_) => return Err(Error::Unauthorized("Session has expired".to_owned())),
        Err(err) => return Err(Error::InternalServerError(err.to_string())),
    };

    let user = match UserDao::db_select(ctx.dao().db(), session.user_id()).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(Error::Unauthorized("User no longer exists".to_owned())),
        Err(err) => return Err(Error::InternalServerError(err.to_string())),
    };

    Ok(Caller {
        claim,
        session,
        user,
    })
}

/// Stores a new session for `user_id` and returns the bearer token pointing at it.
pub async fn open_session(ctx: &ApiRestCtx, user_id: &Uuid) -> Result<String, Error> {
    let session = SessionDao::new(user_id, ctx.auth().session_ttl())
        .map_err(|err| Error::InternalServerError(err.to_string()))?;
    session
        .db_insert(ctx.dao().db())
        .await
        .map_err(|err| Error::InternalServerError(err.to_string()))?;

    ctx.token()
        .jwt()
        .encode(session.id(), user_id)
        .map_err(|err| Error::InternalServerError(err.to_string()))
}
