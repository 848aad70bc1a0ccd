use anyhow::{Error, Result};
use argon2::{
    password_hash::{self, SaltString},
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
};

pub struct Argon2Hash {
    argon2: Argon2<'static>,
    salt: SaltString,
}

impl Argon2Hash {
    pub fn new(
        algorithm: &str,
        version: &str,
        salt: &str,
        memory_cost: &Option<u32>,
        time_cost: &Option<u32>,
    ) -> Result<Self> {
        pp_log::info(Some("⚡"), "[Argon2Hash] Initializing component");

        let algorithm = match algorithm {
            "Argon2d" => Algorithm::Argon2d,
            "Argon2i" => Algorithm::Argon2i,
            "Argon2id" => Algorithm::Argon2id,
            _ => return Err(Error::msg(format!("Unknown argon2 algorithm '{algorithm}'"))),
        };

        let version = match version {
            "V0x10" => Version::V0x10,
            "V0x13" => Version::V0x13,
            _ => return Err(Error::msg(format!("Unknown argon2 version '{version}'"))),
        };

        let salt = SaltString::from_b64(salt).map_err(|err| Error::msg(err.to_string()))?;

        let params = Params::new(
            memory_cost.unwrap_or(Params::DEFAULT_M_COST),
            time_cost.unwrap_or(Params::DEFAULT_T_COST),
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|err| Error::msg(format!("Invalid argon2 params: {err}")))?;

        Ok(Self {
            argon2: Argon2::new(algorithm, version, params),
            salt,
        })
    }

    /// Hashes into a PHC string, the form stored on the user record.
    pub fn hash_password(&self, password: &str) -> Result<String, password_hash::Error> {
        Ok(self
            .argon2
            .hash_password(password.as_bytes(), &self.salt)?
            .to_string())
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<(), password_hash::Error> {
        let hash = PasswordHash::new(hash)?;
        self.argon2.verify_password(password.as_bytes(), &hash)
    }
}
