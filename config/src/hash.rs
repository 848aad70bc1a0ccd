use serde::Deserialize;

#[derive(Deserialize)]
pub struct HashConfig {
    argon2: Argon2HashConfig,
}

impl HashConfig {
    pub fn argon2(&self) -> &Argon2HashConfig {
        &self.argon2
    }
}

/// Password hashing for user accounts. Only `salt` is required. The costs fall
/// back to the argon2 crate defaults when omitted.
#[derive(Deserialize)]
pub struct Argon2HashConfig {
    #[serde(default = "default_algorithm")]
    algorithm: String,
    #[serde(default = "default_version")]
    version: String,
    salt: String,
    memory_cost: Option<u32>,
    time_cost: Option<u32>,
}

impl Argon2HashConfig {
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// KiB of memory per hash.
    pub fn memory_cost(&self) -> &Option<u32> {
        &self.memory_cost
    }

    pub fn time_cost(&self) -> &Option<u32> {
        &self.time_cost
    }
}

fn default_algorithm() -> String {
    "Argon2id".to_owned()
}

fn default_version() -> String {
    "V0x13".to_owned()
}
