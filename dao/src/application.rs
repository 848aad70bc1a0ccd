use std::{fmt, str::FromStr};

use anyhow::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use pp_db_postgresql::model::application::{
    ApplicationModel as ApplicationPostgresModel,
    ApplicationStatsModel as ApplicationStatsPostgresModel,
};
use pp_db_sqlite::model::application::{
    ApplicationModel as ApplicationSqliteModel, ApplicationStatsModel as ApplicationStatsSqliteModel,
};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{dto::pagination::Pagination, Db};

pub struct ApplicationDao {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_id: Uuid,
    title: String,
    country: String,
    national_commission: String,
    sector: ApplicationSector,
    summary: String,
    objectives: String,
    beneficiaries: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    budget: Vec<BudgetLine>,
    other_funding: i64,
    total_budget: i64,
    status: ApplicationStatus,
    marks: Option<i32>,
    feedback: Option<String>,
    reviewed_by: Option<Uuid>,
    reviewed_at: Option<DateTime<Utc>>,
}

impl ApplicationDao {
    /// Validates both form steps in order and builds a pending application.
    pub fn new(
        user_id: &Uuid,
        project: &ProjectSection,
        budget: &BudgetSection,
        max_budget: &i64,
    ) -> Result<Self, StepError> {
        let sector = project.check()?;
        let total_budget = budget.check(max_budget)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
            user_id: *user_id,
            title: project.title.trim().to_owned(),
            country: project.country.trim().to_owned(),
            national_commission: project.national_commission.trim().to_owned(),
            sector,
            summary: project.summary.trim().to_owned(),
            objectives: project.objectives.trim().to_owned(),
            beneficiaries: project.beneficiaries.trim().to_owned(),
            start_date: project.start_date,
            end_date: project.end_date,
            budget: budget.lines.clone(),
            other_funding: budget.other_funding,
            total_budget,
            status: ApplicationStatus::Pending,
            marks: None,
            feedback: None,
            reviewed_by: None,
            reviewed_at: None,
        })
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

    pub fn sector(&self) -> &ApplicationSector {
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

    pub fn budget(&self) -> &Vec<BudgetLine> {
        &self.budget
    }

    pub fn other_funding(&self) -> &i64 {
        &self.other_funding
    }

    pub fn total_budget(&self) -> &i64 {
        &self.total_budget
    }

    pub fn status(&self) -> &ApplicationStatus {
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

    /// Applicants may only change an application nobody has reviewed yet.
    pub fn is_editable(&self) -> bool {
        self.status == ApplicationStatus::Pending && self.reviewed_at.is_none()
    }

    pub fn set_project(&mut self, project: &ProjectSection) -> Result<(), StepError> {
        self.sector = project.check()?;
        self.title = project.title.trim().to_owned();
        self.country = project.country.trim().to_owned();
        self.national_commission = project.national_commission.trim().to_owned();
        self.summary = project.summary.trim().to_owned();
        self.objectives = project.objectives.trim().to_owned();
        self.beneficiaries = project.beneficiaries.trim().to_owned();
        self.start_date = project.start_date;
        self.end_date = project.end_date;
        Ok(())
    }

    pub fn set_budget(&mut self, budget: &BudgetSection, max_budget: &i64) -> Result<(), StepError> {
        self.total_budget = budget.check(max_budget)?;
        self.budget = budget.lines.clone();
        self.other_funding = budget.other_funding;
        Ok(())
    }

    /// Applies an admin review. Returns true when the status actually changed.
    pub fn set_review(
        &mut self,
        reviewer_id: &Uuid,
        status: &Option<ApplicationStatus>,
        marks: &Option<i32>,
        feedback: &Option<String>,
    ) -> Result<bool> {
        if let Some(marks) = marks {
            if !(0..=100).contains(marks) {
                return Err(Error::msg("Marks must be between 0 and 100"));
            }
            self.marks = Some(*marks);
        }
        if let Some(feedback) = feedback {
            let feedback = feedback.trim();
            self.feedback = if feedback.is_empty() {
                None
            } else {
                Some(feedback.to_owned())
            };
        }

        let changed = match status {
            Some(status) if *status != self.status => {
                self.status = *status;
                true
            }
            _ => false,
        };

        self.reviewed_by = Some(*reviewer_id);
        self.reviewed_at = Some(Utc::now());

        Ok(changed)
    }

    pub async fn db_insert(&self, db: &Db) -> Result<()> {
        match db {
            Db::PostgresqlDb(db) => db.insert_application(&self.to_postgresdb_model()?).await,
            Db::SqliteDb(db) => db.insert_application(&self.to_sqlitedb_model()?).await,
        }
    }

    pub async fn db_select(db: &Db, id: &Uuid) -> Result<Option<Self>> {
        match db {
            Db::PostgresqlDb(db) => db
                .select_application(id)
                .await?
                .map(|model| Self::from_postgresdb_model(&model))
                .transpose(),
            Db::SqliteDb(db) => db
                .select_application(id)
                .await?
                .map(|model| Self::from_sqlitedb_model(&model))
                .transpose(),
        }
    }

    pub async fn db_select_many_by_user_id(db: &Db, user_id: &Uuid) -> Result<Vec<Self>> {
        match db {
            Db::PostgresqlDb(db) => db
                .select_many_applications_by_user_id(user_id)
                .await?
                .iter()
                .map(Self::from_postgresdb_model)
                .collect(),
            Db::SqliteDb(db) => db
                .select_many_applications_by_user_id(user_id)
                .await?
                .iter()
                .map(Self::from_sqlitedb_model)
                .collect(),
        }
    }

    /// Newest first, optionally narrowed to one status. Also returns the filtered total.
    pub async fn db_select_many(
        db: &Db,
        status: &Option<ApplicationStatus>,
        pagination: &Pagination,
    ) -> Result<(Vec<Self>, i64)> {
        let status = status.map(|s| s.to_string());
        let status = status.as_deref();
        let offset = pagination.offset();
        match db {
            Db::PostgresqlDb(db) => {
                let (applications, total) = tokio::try_join!(
                    db.select_many_applications(&status, pagination.limit(), &offset),
                    db.count_applications(&status)
                )?;
                let applications = applications
                    .iter()
                    .map(Self::from_postgresdb_model)
                    .collect::<Result<Vec<_>>>()?;
                Ok((applications, total))
            }
            Db::SqliteDb(db) => {
                let (applications, total) = tokio::try_join!(
                    db.select_many_applications(&status, pagination.limit(), &offset),
                    db.count_applications(&status)
                )?;
                let applications = applications
                    .iter()
                    .map(Self::from_sqlitedb_model)
                    .collect::<Result<Vec<_>>>()?;
                Ok((applications, total))
            }
        }
    }

    pub async fn db_count(db: &Db, status: &Option<ApplicationStatus>) -> Result<i64> {
        let status = status.map(|s| s.to_string());
        match db {
            Db::PostgresqlDb(db) => db.count_applications(&status.as_deref()).await,
            Db::SqliteDb(db) => db.count_applications(&status.as_deref()).await,
        }
    }

    pub async fn db_update(&mut self, db: &Db) -> Result<()> {
        self.updated_at = Utc::now();
        match db {
            Db::PostgresqlDb(db) => db.update_application(&self.to_postgresdb_model()?).await,
            Db::SqliteDb(db) => db.update_application(&self.to_sqlitedb_model()?).await,
        }
    }

    pub async fn db_stats(db: &Db) -> Result<ApplicationStats> {
        match db {
            Db::PostgresqlDb(db) => Ok(ApplicationStats::from_rows(
                db.select_applications_stats()
                    .await?
                    .iter()
                    .map(StatusRow::from_postgresdb_model),
            )),
            Db::SqliteDb(db) => Ok(ApplicationStats::from_rows(
                db.select_applications_stats()
                    .await?
                    .iter()
                    .map(StatusRow::from_sqlitedb_model),
            )),
        }
    }

    fn from_postgresdb_model(model: &ApplicationPostgresModel) -> Result<Self> {
        Ok(Self {
            id: *model.id(),
            created_at: *model.created_at(),
            updated_at: *model.updated_at(),
            user_id: *model.user_id(),
            title: model.title().to_owned(),
            country: model.country().to_owned(),
            national_commission: model.national_commission().to_owned(),
            sector: ApplicationSector::from_str(model.sector())?,
            summary: model.summary().to_owned(),
            objectives: model.objectives().to_owned(),
            beneficiaries: model.beneficiaries().to_owned(),
            start_date: *model.start_date(),
            end_date: *model.end_date(),
            budget: serde_json::from_str(model.budget())?,
            other_funding: *model.other_funding(),
            total_budget: *model.total_budget(),
            status: ApplicationStatus::from_str(model.status())?,
            marks: *model.marks(),
            feedback: model.feedback().clone(),
            reviewed_by: *model.reviewed_by(),
            reviewed_at: *model.reviewed_at(),
        })
    }

    fn to_postgresdb_model(&self) -> Result<ApplicationPostgresModel> {
        Ok(ApplicationPostgresModel::new(
            &self.id,
            &self.created_at,
            &self.updated_at,
            &self.user_id,
            &self.title,
            &self.country,
            &self.national_commission,
            &self.sector.to_string(),
            &self.summary,
            &self.objectives,
            &self.beneficiaries,
            &self.start_date,
            &self.end_date,
            &serde_json::to_string(&self.budget)?,
            &self.other_funding,
            &self.total_budget,
            &self.status.to_string(),
            &self.marks,
            &self.feedback,
            &self.reviewed_by,
            &self.reviewed_at,
        ))
    }

    fn from_sqlitedb_model(model: &ApplicationSqliteModel) -> Result<Self> {
        Ok(Self {
            id: *model.id(),
            created_at: *model.created_at(),
            updated_at: *model.updated_at(),
            user_id: *model.user_id(),
            title: model.title().to_owned(),
            country: model.country().to_owned(),
            national_commission: model.national_commission().to_owned(),
            sector: ApplicationSector::from_str(model.sector())?,
            summary: model.summary().to_owned(),
            objectives: model.objectives().to_owned(),
            beneficiaries: model.beneficiaries().to_owned(),
            start_date: *model.start_date(),
            end_date: *model.end_date(),
            budget: serde_json::from_str(model.budget())?,
            other_funding: *model.other_funding(),
            total_budget: *model.total_budget(),
            status: ApplicationStatus::from_str(model.status())?,
            marks: *model.marks(),
            feedback: model.feedback().clone(),
            reviewed_by: *model.reviewed_by(),
            reviewed_at: *model.reviewed_at(),
        })
    }

    fn to_sqlitedb_model(&self) -> Result<ApplicationSqliteModel> {
        Ok(ApplicationSqliteModel::new(
            &self.id,
            &self.created_at,
            &self.updated_at,
            &self.user_id,
            &self.title,
            &self.country,
            &self.national_commission,
            &self.sector.to_string(),
            &self.summary,
            &self.objectives,
            &self.beneficiaries,
            &self.start_date,
            &self.end_date,
            &serde_json::to_string(&self.budget)?,
            &self.other_funding,
            &self.total_budget,
            &self.status.to_string(),
            &self.marks,
            &self.feedback,
            &self.reviewed_by,
            &self.reviewed_at,
        ))
    }
}

#[derive(EnumString, Display, EnumIter, PartialEq, Eq, Clone, Copy, Debug)]
#[strum(serialize_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    pub fn is_decision(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

#[derive(EnumString, Display, EnumIter, PartialEq, Eq, Clone, Copy, Debug)]
#[strum(serialize_all = "snake_case")]
pub enum ApplicationSector {
    Education,
    NaturalSciences,
    SocialAndHumanSciences,
    Culture,
    CommunicationAndInformation,
}

impl ApplicationSector {
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}

#[derive(Deserialize, Serialize, Clone, PartialEq, Debug)]
pub struct BudgetLine {
    description: String,
    quantity: i64,
    unit_cost: i64,
}

impl BudgetLine {
    pub fn new(description: &str, quantity: &i64, unit_cost: &i64) -> Self {
        Self {
            description: description.trim().to_owned(),
            quantity: *quantity,
            unit_cost: *unit_cost,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> &i64 {
        &self.quantity
    }

    pub fn unit_cost(&self) -> &i64 {
        &self.unit_cost
    }

    pub fn amount(&self) -> Option<i64> {
        self.quantity.checked_mul(self.unit_cost)
    }
}

/// First step of the submission form.
pub struct ProjectSection {
    title: String,
    country: String,
    national_commission: String,
    sector: String,
    summary: String,
    objectives: String,
    beneficiaries: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl ProjectSection {
    pub fn new(
        title: &str,
        country: &str,
        national_commission: &str,
        sector: &str,
        summary: &str,
        objectives: &str,
        beneficiaries: &str,
        start_date: &NaiveDate,
        end_date: &NaiveDate,
    ) -> Self {
        Self {
            title: title.to_owned(),
            country: country.to_owned(),
            national_commission: national_commission.to_owned(),
            sector: sector.to_owned(),
            summary: summary.to_owned(),
            objectives: objectives.to_owned(),
            beneficiaries: beneficiaries.to_owned(),
            start_date: *start_date,
            end_date: *end_date,
        }
    }

    fn check(&self) -> Result<ApplicationSector, StepError> {
        let fail = |reason: &str| StepError::new(Step::Project, reason);

        for (field, value) in [
            ("title", &self.title),
            ("country", &self.country),
            ("summary", &self.summary),
            ("objectives", &self.objectives),
        ] {
            if value.trim().is_empty() {
                return Err(fail(&format!("{field} must not be empty")));
            }
        }
        if self.end_date <= self.start_date {
            return Err(fail("end_date must be after start_date"));
        }

        ApplicationSector::from_str(self.sector.trim())
            .map_err(|_| fail(&format!("unknown sector '{}'", self.sector)))
    }
}

/// Second step of the submission form.
pub struct BudgetSection {
    lines: Vec<BudgetLine>,
    other_funding: i64,
}

impl BudgetSection {
    pub fn new(lines: &[BudgetLine], other_funding: &i64) -> Self {
        Self {
            lines: lines.to_vec(),
            other_funding: *other_funding,
        }
    }

    /// Returns the requested total on success.
    fn check(&self, max_budget: &i64) -> Result<i64, StepError> {
        let fail = |reason: &str| StepError::new(Step::Budget, reason);

        if self.lines.is_empty() {
            return Err(fail("at least one budget line is required"));
        }
        if self.other_funding < 0 {
            return Err(fail("other_funding must not be negative"));
        }

        let mut total: i64 = 0;
        for (idx, line) in self.lines.iter().enumerate() {
            if line.description.is_empty() {
                return Err(fail(&format!("line {} needs a description", idx + 1)));
            }
            if line.quantity <= 0 || line.unit_cost <= 0 {
                return Err(fail(&format!(
                    "line {} must have a positive quantity and unit_cost",
                    idx + 1
                )));
            }
            total = line
                .amount()
                .and_then(|amount| total.checked_add(amount))
                .ok_or_else(|| fail("total is out of range"))?;
        }

        if total > *max_budget {
            return Err(fail(&format!(
                "total {total} exceeds the maximum of {max_budget}"
            )));
        }

        Ok(total)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Step {
    Project,
    Budget,
}

impl Step {
    pub fn to_str(&self) -> &str {
        match self {
            Self::Project => "project",
            Self::Budget => "budget",
        }
    }
}

#[derive(Debug)]
pub struct StepError {
    step: Step,
    reason: String,
}

impl StepError {
    fn new(step: Step, reason: &str) -> Self {
        Self {
            step,
            reason: reason.to_owned(),
        }
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.step.to_str(), self.reason)
    }
}

impl std::error::Error for StepError {}

struct StatusRow {
    status: String,
    total: i64,
    scored: i64,
    marks_sum: i64,
    marks_min: Option<i32>,
    marks_max: Option<i32>,
    budget_sum: i64,
}

impl StatusRow {
    fn from_postgresdb_model(model: &ApplicationStatsPostgresModel) -> Self {
        Self {
            status: model.status().to_owned(),
            total: *model.total(),
            scored: *model.scored(),
            marks_sum: *model.marks_sum(),
            marks_min: *model.marks_min(),
            marks_max: *model.marks_max(),
            budget_sum: *model.budget_sum(),
        }
    }

    fn from_sqlitedb_model(model: &ApplicationStatsSqliteModel) -> Self {
        Self {
            status: model.status().to_owned(),
            total: *model.total(),
            scored: *model.scored(),
            marks_sum: *model.marks_sum(),
            marks_min: *model.marks_min(),
            marks_max: *model.marks_max(),
            budget_sum: *model.budget_sum(),
        }
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct ApplicationStats {
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

impl ApplicationStats {
    fn from_rows(rows: impl Iterator<Item = StatusRow>) -> Self {
        let mut stats = Self::default();
        let mut marks_sum = 0;

        for row in rows {
            stats.total += row.total;
            stats.scored += row.scored;
            stats.requested_budget += row.budget_sum;
            marks_sum += row.marks_sum;
            stats.min_marks = match (stats.min_marks, row.marks_min) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
            stats.max_marks = match (stats.max_marks, row.marks_max) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            };

            match ApplicationStatus::from_str(&row.status) {
                Ok(ApplicationStatus::Pending) => stats.pending += row.total,
                Ok(ApplicationStatus::Approved) => {
                    stats.approved += row.total;
                    stats.approved_budget += row.budget_sum;
                }
                Ok(ApplicationStatus::Rejected) => stats.rejected += row.total,
                Err(_) => {}
            }
        }

        if stats.scored > 0 {
            stats.average_marks = Some(marks_sum as f64 / stats.scored as f64);
        }

        stats
    }

    pub fn total(&self) -> &i64 {
        &self.total
    }

    pub fn pending(&self) -> &i64 {
        &self.pending
    }

    pub fn approved(&self) -> &i64 {
        &self.approved
    }

    pub fn rejected(&self) -> &i64 {
        &self.rejected
    }

    pub fn scored(&self) -> &i64 {
        &self.scored
    }

    pub fn average_marks(&self) -> &Option<f64> {
        &self.average_marks
    }

    pub fn min_marks(&self) -> &Option<i32> {
        &self.min_marks
    }

    pub fn max_marks(&self) -> &Option<i32> {
        &self.max_marks
    }

    pub fn requested_budget(&self) -> &i64 {
        &self.requested_budget
    }

    pub fn approved_budget(&self) -> &i64 {
        &self.approved_budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_db;

    fn project() -> ProjectSection {
        ProjectSection::new(
            "Literacy workshops in rural schools",
            "Senegal",
            "Senegal National Commission for UNESCO",
            "education",
            "Training 200 tutors",
            "Improve literacy outcomes",
            "Primary school pupils",
            &NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            &NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        )
    }

    fn budget() -> BudgetSection {
        BudgetSection::new(
            &[
                BudgetLine::new("Workshops", &4, &5_000),
                BudgetLine::new("Materials", &200, &25),
            ],
            &1_000,
        )
    }

    #[test]
    fn new_application_is_pending_with_total() {
        let application =
            ApplicationDao::new(&Uuid::now_v7(), &project(), &budget(), &26_000).unwrap();

        assert_eq!(application.status(), &ApplicationStatus::Pending);
        assert_eq!(application.total_budget(), &25_000);
        assert_eq!(application.sector(), &ApplicationSector::Education);
        assert!(application.is_editable());
    }

    #[test]
    fn reports_first_failing_step() {
        let bad_project = ProjectSection::new(
            " ",
            "Senegal",
            "",
            "education",
            "s",
            "o",
            "",
            &NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            &NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        );
        let empty_budget = BudgetSection::new(&[], &0);

        let err = ApplicationDao::new(&Uuid::now_v7(), &bad_project, &empty_budget, &26_000)
            .err()
            .unwrap();
        assert_eq!(err.step(), &Step::Project);
        assert_eq!(err.to_string(), "project: title must not be empty");

        let err = ApplicationDao::new(&Uuid::now_v7(), &project(), &empty_budget, &26_000)
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "budget: at least one budget line is required");
    }

    #[test]
    fn rejects_inverted_dates_and_unknown_sector() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let same_day = ProjectSection::new("t", "c", "", "culture", "s", "o", "", &date, &date);
        assert!(same_day.check().is_err());

        let unknown = ProjectSection::new(
            "t",
            "c",
            "",
            "sports",
            "s",
            "o",
            "",
            &date,
            &NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
        );
        assert!(unknown.check().unwrap_err().reason().contains("sports"));
    }

    #[test]
    fn rejects_budget_over_max_and_non_positive_lines() {
        assert!(budget().check(&24_999).is_err());

        let zero = BudgetSection::new(&[BudgetLine::new("Travel", &0, &100)], &0);
        assert_eq!(
            zero.check(&26_000).unwrap_err().to_string(),
            "budget: line 1 must have a positive quantity and unit_cost"
        );
    }

    #[test]
    fn review_reports_status_change() {
        let mut application =
            ApplicationDao::new(&Uuid::now_v7(), &project(), &budget(), &26_000).unwrap();
        let admin = Uuid::now_v7();

        let changed = application
            .set_review(&admin, &None, &Some(70), &Some("Good".to_owned()))
            .unwrap();
        assert!(!changed);
        assert_eq!(application.marks(), &Some(70));
        assert!(!application.is_editable());

        let changed = application
            .set_review(&admin, &Some(ApplicationStatus::Approved), &None, &None)
            .unwrap();
        assert!(changed);
        assert_eq!(application.reviewed_by(), &Some(admin));

        assert!(application
            .set_review(&admin, &None, &Some(101), &None)
            .is_err());
    }

    #[test]
    fn parses_status_names() {
        assert_eq!(
            ApplicationStatus::from_str("approved").unwrap(),
            ApplicationStatus::Approved
        );
        assert_eq!(ApplicationStatus::Rejected.to_string(), "rejected");
        assert_eq!(
            ApplicationSector::SocialAndHumanSciences.to_string(),
            "social_and_human_sciences"
        );
        assert_eq!(ApplicationSector::all().len(), 5);
    }

    #[tokio::test]
    async fn approval_is_visible_on_next_fetch() {
        let db = test_db::sqlite().await;
        let mut application =
            ApplicationDao::new(&Uuid::now_v7(), &project(), &budget(), &26_000).unwrap();
        application.db_insert(&db).await.unwrap();

        application
            .set_review(
                &Uuid::now_v7(),
                &Some(ApplicationStatus::Approved),
                &Some(88),
                &None,
            )
            .unwrap();
        application.db_update(&db).await.unwrap();

        let fetched = ApplicationDao::db_select(&db, application.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.status(), &ApplicationStatus::Approved);
        assert_eq!(fetched.marks(), &Some(88));
        assert_eq!(fetched.budget(), application.budget());
    }

    #[tokio::test]
    async fn filters_lists_and_aggregates() {
        let db = test_db::sqlite().await;
        let user_id = Uuid::now_v7();
        let admin = Uuid::now_v7();

        for (status, marks) in [
            (None, None),
            (Some(ApplicationStatus::Approved), Some(90)),
            (Some(ApplicationStatus::Rejected), Some(40)),
        ] {
            let mut application =
                ApplicationDao::new(&user_id, &project(), &budget(), &26_000).unwrap();
            if status.is_some() {
                application
                    .set_review(&admin, &status, &marks, &None)
                    .unwrap();
            }
            application.db_insert(&db).await.unwrap();
        }

        let mine = ApplicationDao::db_select_many_by_user_id(&db, &user_id)
            .await
            .unwrap();
        assert_eq!(mine.len(), 3);

        let (approved, total) = ApplicationDao::db_select_many(
            &db,
            &Some(ApplicationStatus::Approved),
            &Pagination::new(&None, &None, &10),
        )
        .await
        .unwrap();
        assert_eq!(total, 1);
        assert_eq!(approved[0].marks(), &Some(90));
        assert_eq!(ApplicationDao::db_count(&db, &None).await.unwrap(), 3);

        let stats = ApplicationDao::db_stats(&db).await.unwrap();
        assert_eq!(stats.total(), &3);
        assert_eq!(stats.pending(), &1);
        assert_eq!(stats.scored(), &2);
        assert_eq!(stats.average_marks(), &Some(65.0));
        assert_eq!(stats.min_marks(), &Some(40));
        assert_eq!(stats.max_marks(), &Some(90));
        assert_eq!(stats.requested_budget(), &75_000);
        assert_eq!(stats.approved_budget(), &25_000);
    }
}
