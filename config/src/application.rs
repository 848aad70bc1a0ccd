use serde::Deserialize;

#[derive(Deserialize)]
pub struct ApplicationConfig {
    max_budget: i64,
    page_size: i64,
}

impl ApplicationConfig {
    /// Upper bound, in USD, on the total budget a single application may request.
    pub fn max_budget(&self) -> &i64 {
        &self.max_budget
    }

    pub fn page_size(&self) -> &i64 {
        &self.page_size
    }
}
