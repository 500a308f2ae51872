use chrono::NaiveDate;
use paging_core::{PageRequest, PageSizeCfg};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// A company and its identity. Employees are loaded separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub introduction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub company_id: Uuid,
    pub employee_no: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Unknown,
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Unknown => "Unknown",
            Gender::Male => "Male",
            Gender::Female => "Female",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown gender '{0}'")]
pub struct ParseGenderError(pub String);

impl FromStr for Gender {
    type Err = ParseGenderError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "unknown" => Ok(Gender::Unknown),
            _ => Err(ParseGenderError(s.to_string())),
        }
    }
}

/// Input for creating a company together with its initial staff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub introduction: String,
    #[serde(default)]
    pub employees: Vec<NewEmployee>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub employee_no: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
}

/// Company listing query. Unset paging fields take the configured defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyParameters {
    pub company_name: Option<String>,
    pub search_term: Option<String>,
    pub page_number: Option<u64>,
    pub page_size: Option<u64>,
    pub order_by: String,
}

impl Default for CompanyParameters {
    fn default() -> Self {
        Self {
            company_name: None,
            search_term: None,
            page_number: None,
            page_size: None,
            order_by: "CompanyName".to_string(),
        }
    }
}

impl CompanyParameters {
    pub fn page(mut self, page_number: u64, page_size: u64) -> Self {
        self.page_number = Some(page_number);
        self.page_size = Some(page_size);
        self
    }

    pub fn page_request(&self, cfg: PageSizeCfg) -> PageRequest {
        PageRequest::clamped(self.page_number, self.page_size, cfg)
    }
}

/// Employee listing query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmployeeParameters {
    /// Parsed case-insensitively; an unknown value is rejected.
    pub gender: Option<String>,
    /// Substring over employee number, first and last name.
    pub q: Option<String>,
    pub page_number: Option<u64>,
    pub page_size: Option<u64>,
    pub order_by: String,
}

impl Default for EmployeeParameters {
    fn default() -> Self {
        Self {
            gender: None,
            q: None,
            page_number: None,
            page_size: None,
            order_by: "Name".to_string(),
        }
    }
}

impl EmployeeParameters {
    pub fn page(mut self, page_number: u64, page_size: u64) -> Self {
        self.page_number = Some(page_number);
        self.page_size = Some(page_size);
        self
    }

    pub fn page_request(&self, cfg: PageSizeCfg) -> PageRequest {
        PageRequest::clamped(self.page_number, self.page_size, cfg)
    }
}
