use serde::Serialize;

#[derive(Serialize)]
pub struct TokenResJson {
    token: String,
}

impl TokenResJson {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_owned(),
        }
    }
}
