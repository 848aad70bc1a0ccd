use chrono::{DateTime, NaiveDate, Utc};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(FromRow)]
pub struct ApplicationModel {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_id: Uuid,
    title: String,
    country: String,
    national_commission: String,
    sector: String,
    summary: String,
    objectives: String,
    beneficiaries: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    budget: String,
    other_funding: i64,
    total_budget: i64,
    status: String,
    marks: Option<i32>,
    feedback: Option<String>,
    reviewed_by: Option<Uuid>,
    reviewed_at: Option<DateTime<Utc>>,
}

impl ApplicationModel {
    pub fn new(
        id: &Uuid,
        created_at: &DateTime<Utc>,
        updated_at: &DateTime<Utc>,
        user_id: &Uuid,
        title: &str,
        country: &str,
        national_commission: &str,
        sector: &str,
        summary: &str,
        objectives: &str,
        beneficiaries: &str,
        start_date: &NaiveDate,
        end_date: &NaiveDate,
        budget: &str,
        other_funding: &i64,
        total_budget: &i64,
        status: &str,
        marks: &Option<i32>,
        feedback: &Option<String>,
        reviewed_by: &Option<Uuid>,
        reviewed_at: &Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: *id,
            created_at: *created_at,
            updated_at: *updated_at,
            user_id: *user_id,
            title: title.to_owned(),
            country: country.to_owned(),
            national_commission: national_commission.to_owned(),
            sector: sector.to_owned(),
            summary: summary.to_owned(),
            objectives: objectives.to_owned(),
            beneficiaries: beneficiaries.to_owned(),
            start_date: *start_date,
            end_date: *end_date,
            budget: budget.to_owned(),
            other_funding: *other_funding,
            total_budget: *total_budget,
            status: status.to_owned(),
            marks: *marks,
            feedback: feedback.clone(),
            reviewed_by: *reviewed_by,
            reviewed_at: *reviewed_at,
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

    pub fn user_id(&self) -> &Uuid {
        &self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn national_commission(&self) -> &str {
        &self.national_commission
    }

    pub fn sector(&self) -> &str {
        &self.sector
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn objectives(&self) -> &str {
        &self.objectives
    }

    pub fn beneficiaries(&self) -> &str {
        &self.beneficiaries
    }

    pub fn start_date(&self) -> &NaiveDate {
        &self.start_date
    }

    pub fn end_date(&self) -> &NaiveDate {
        &self.end_date
    }

    /// Budget lines, serialized as a JSON array.
    pub fn budget(&self) -> &str {
        &self.budget
    }

    pub fn other_funding(&self) -> &i64 {
        &self.other_funding
    }

    pub fn total_budget(&self) -> &i64 {
        &self.total_budget
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn marks(&self) -> &Option<i32> {
        &self.marks
    }

    pub fn feedback(&self) -> &Option<String> {
        &self.feedback
    }

    pub fn reviewed_by(&self) -> &Option<Uuid> {
        &self.reviewed_by
    }

    pub fn reviewed_at(&self) -> &Option<DateTime<Utc>> {
        &self.reviewed_at
    }
}

/// One row per status of the aggregate over all applications.
#[derive(FromRow)]
pub struct ApplicationStatsModel {
    status: String,
    total: i64,
    scored: i64,
    marks_sum: i64,
    marks_min: Option<i32>,
    marks_max: Option<i32>,
    budget_sum: i64,
}

impl ApplicationStatsModel {
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn total(&self) -> &i64 {
        &self.total
    }

    pub fn scored(&self) -> &i64 {
        &self.scored
    }

    pub fn marks_sum(&self) -> &i64 {
        &self.marks_sum
    }

    pub fn marks_min(&self) -> &Option<i32> {
        &self.marks_min
    }

    pub fn marks_max(&self) -> &Option<i32> {
        &self.marks_max
    }

    pub fn budget_sum(&self) -> &i64 {
        &self.budget_sum
    }
}
