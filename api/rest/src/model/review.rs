use pp_dao::application::ApplicationStats;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize)]
pub struct FindManyApplicationReqQuery {
    status: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

impl FindManyApplicationReqQuery {
    pub fn status(&self) -> &Option<String> {
        &self.status
    }

    pub fn page(&self) -> &Option<i64> {
        &self.page
    }

    pub fn limit(&self) -> &Option<i64> {
        &self.limit
    }
}

#[derive(Deserialize, Validate)]
pub struct ReviewApplicationReqJson {
    status: Option<String>,
    #[validate(range(min = 0, max = 100, message = "marks must be between 0 and 100"))]
    marks: Option<i32>,
    #[validate(length(max = 5000))]
    feedback: Option<String>,
}

impl ReviewApplicationReqJson {
    pub fn status(&self) -> &Option<String> {
        &self.status
    }

    pub fn marks(&self) -> &Option<i32> {
        &self.marks
    }

    pub fn feedback(&self) -> &Option<String> {
        &self.feedback
    }

    pub fn is_all_none(&self) -> bool {
        self.status.is_none() && self.marks.is_none() && self.feedback.is_none()
    }
}

#[derive(Serialize)]
pub struct ApplicationStatsResJson {
    users: i64,
    total: i64,
    pending: i64,
    approved: i64,
    rejected: i64,
    scored: i64,
    average_marks: Option<f64>,
    min_marks: Option<i32>,
    max_marks: Option<i32>,
    requested_budget: i64,
    approved_budget: i64,
}

impl ApplicationStatsResJson {
    pub fn from_dao(stats: &ApplicationStats, users: &i64) -> Self {
        Self {
            users: *users,
            total: *stats.total(),
            pending: *stats.pending(),
            approved: *stats.approved(),
            rejected: *stats.rejected(),
            scored: *stats.scored(),
            average_marks: stats.average_marks().map(|avg| (avg * 100.0).round() / 100.0),
            min_marks: *stats.min_marks(),
            max_marks: *stats.max_marks(),
            requested_budget: *stats.requested_budget(),
            approved_budget: *stats.approved_budget(),
        }
    }
}
