use chrono::{DateTime, NaiveDate, Utc};
use pp_dao::application::{ApplicationDao, BudgetLine, BudgetSection, ProjectSection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct ProjectReqJson {
    title: String,
    country: String,
    #[serde(default)]
    national_commission: String,
    sector: String,
    summary: String,
    objectives: String,
    #[serde(default)]
    beneficiaries: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl ProjectReqJson {
    pub fn to_section(&self) -> ProjectSection {
        ProjectSection::new(
            &self.title,
            &self.country,
            &self.national_commission,
            &self.sector,
            &self.summary,
            &self.objectives,
            &self.beneficiaries,
            &self.start_date,
            &self.end_date,
        )
    }
}

#[derive(Deserialize, Serialize)]
pub struct BudgetLineJson {
    description: String,
    quantity: i64,
    unit_cost: i64,
}

impl BudgetLineJson {
    fn from_dao(line: &BudgetLine) -> Self {
        Self {
            description: line.description().to_owned(),
            quantity: *line.quantity(),
            unit_cost: *line.unit_cost(),
        }
    }
}

#[derive(Deserialize)]
pub struct BudgetReqJson {
    lines: Vec<BudgetLineJson>,
    #[serde(default)]
    other_funding: i64,
}

impl BudgetReqJson {
    pub fn to_section(&self) -> BudgetSection {
        BudgetSection::new(
            &self
                .lines
                .iter()
                .map(|line| BudgetLine::new(&line.description, &line.quantity, &line.unit_cost))
                .collect::<Vec<_>>(),
            &self.other_funding,
        )
    }
}

#[derive(Deserialize)]
pub struct InsertOneApplicationReqJson {
    project: ProjectReqJson,
    budget: BudgetReqJson,
}

impl InsertOneApplicationReqJson {
    pub fn project(&self) -> &ProjectReqJson {
        &self.project
    }

    pub fn budget(&self) -> &BudgetReqJson {
        &self.budget
    }
}

#[derive(Deserialize)]
pub struct ApplicationReqPath {
    application_id: Uuid,
}

impl ApplicationReqPath {
    pub fn application_id(&self) -> &Uuid {
        &self.application_id
    }
}

#[derive(Deserialize)]
pub struct UpdateOneApplicationReqJson {
    project: Option<ProjectReqJson>,
    budget: Option<BudgetReqJson>,
}

impl UpdateOneApplicationReqJson {
    pub fn project(&self) -> &Option<ProjectReqJson> {
        &self.project
    }

    pub fn budget(&self) -> &Option<BudgetReqJson> {
        &self.budget
    }

    pub fn is_all_none(&self) -> bool {
        self.project.is_none() && self.budget.is_none()
    }
}

#[derive(Serialize)]
pub struct ApplicationResJson {
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
    budget: Vec<BudgetLineJson>,
    other_funding: i64,
    total_budget: i64,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    marks: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reviewed_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reviewed_at: Option<DateTime<Utc>>,
}

impl ApplicationResJson {
    pub fn from_dao(application: &ApplicationDao) -> Self {
        Self {
            id: *application.id(),
            created_at: *application.created_at(),
            updated_at: *application.updated_at(),
            user_id: *application.user_id(),
            title: application.title().to_owned(),
            country: application.country().to_owned(),
            national_commission: application.national_commission().to_owned(),
            sector: application.sector().to_string(),
            summary: application.summary().to_owned(),
            objectives: application.objectives().to_owned(),
            beneficiaries: application.beneficiaries().to_owned(),
            start_date: *application.start_date(),
            end_date: *application.end_date(),
            budget: application
                .budget()
                .iter()
                .map(BudgetLineJson::from_dao)
                .collect(),
            other_funding: *application.other_funding(),
            total_budget: *application.total_budget(),
            status: application.status().to_string(),
            marks: *application.marks(),
            feedback: application.feedback().clone(),
            reviewed_by: *application.reviewed_by(),
            reviewed_at: *application.reviewed_at(),
        }
    }
}
