use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::claim::Claim;

pub struct JwtToken {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_duration: u64,
}

impl JwtToken {
    pub fn new(secret: &str, expiry_duration: &Duration) -> Self {
        pp_log::info(Some("⚡"), "[JwtToken] Initializing component");

        let secret = secret.as_bytes();
        Self {
            header: Header::default(),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_duration: expiry_duration.as_secs(),
        }
    }

    pub fn expiry_duration(&self) -> &u64 {
        &self.expiry_duration
    }

    pub fn encode(&self, session_id: &Uuid, user_id: &Uuid) -> Result<String> {
        let expiration_time =
            usize::try_from(Self::now()? + self.expiry_duration)?;

        Ok(encode(
            &self.header,
            &Claim::new(session_id, user_id, &expiration_time),
            &self.encoding_key,
        )?)
    }

    pub fn decode(&self, token: &str) -> Result<Claim> {
        Ok(decode::<Claim>(token, &self.decoding_key, &Validation::default())?.claims)
    }

    /// A token past half of its lifetime gets reissued on refresh.
    pub fn need_renew(&self, claim: &Claim) -> Result<bool> {
        let expiry = u64::try_from(*claim.exp())?;
        Ok(expiry.saturating_sub(self.expiry_duration / 2) < Self::now()?)
    }

    pub fn renew(&self, claim: &Claim) -> Result<String> {
        self.encode(claim.id(), claim.user_id())
    }

    fn now() -> Result<u64> {
        Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
    }
}
