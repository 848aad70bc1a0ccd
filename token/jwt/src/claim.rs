use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of a portal bearer token. `id` names the session row the token belongs to.
#[derive(Deserialize, Serialize)]
pub struct Claim {
    id: Uuid,
    user_id: Uuid,
    exp: usize,
}

impl Claim {
    pub fn new(id: &Uuid, user_id: &Uuid, exp: &usize) -> Self {
        Self {
            id: *id,
            user_id: *user_id,
            exp: *exp,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn user_id(&self) -> &Uuid {
        &self.user_id
    }

    pub fn exp(&self) -> &usize {
        &self.exp
    }
}
