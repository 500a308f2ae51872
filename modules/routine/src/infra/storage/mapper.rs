use sea_orm::Set;
use uuid::Uuid;

use super::entity::{company, employee};
use crate::contract::{Company, Employee, Gender, NewEmployee};

impl From<employee::Gender> for Gender {
    fn from(g: employee::Gender) -> Self {
        match g {
            employee::Gender::Unknown => Gender::Unknown,
            employee::Gender::Male => Gender::Male,
            employee::Gender::Female => Gender::Female,
        }
    }
}

impl From<Gender> for employee::Gender {
    fn from(g: Gender) -> Self {
        match g {
            Gender::Unknown => employee::Gender::Unknown,
            Gender::Male => employee::Gender::Male,
            Gender::Female => employee::Gender::Female,
        }
    }
}

impl From<company::Model> for Company {
    fn from(m: company::Model) -> Self {
        Company {
            id: m.id,
            name: m.name,
            introduction: m.introduction,
        }
    }
}

impl From<employee::Model> for Employee {
    fn from(m: employee::Model) -> Self {
        Employee {
            id: m.id,
            company_id: m.company_id,
            employee_no: m.employee_no,
            first_name: m.first_name,
            last_name: m.last_name,
            gender: m.gender.into(),
            date_of_birth: m.date_of_birth,
        }
    }
}

pub fn company_active(c: &Company) -> company::ActiveModel {
    company::ActiveModel {
        id: Set(c.id),
        name: Set(c.name.clone()),
        introduction: Set(c.introduction.clone()),
    }
}

pub fn employee_active(e: &Employee) -> employee::ActiveModel {
    employee::ActiveModel {
        id: Set(e.id),
        company_id: Set(e.company_id),
        employee_no: Set(e.employee_no.clone()),
        first_name: Set(e.first_name.clone()),
        last_name: Set(e.last_name.clone()),
        gender: Set(e.gender.into()),
        date_of_birth: Set(e.date_of_birth),
    }
}

/// A new employee row with a fresh id under `company_id`.
pub fn employee_from_new(company_id: Uuid, e: NewEmployee) -> Employee {
    Employee {
        id: Uuid::new_v4(),
        company_id,
        employee_no: e.employee_no,
        first_name: e.first_name,
        last_name: e.last_name,
        gender: e.gender,
        date_of_birth: e.date_of_birth,
    }
}
