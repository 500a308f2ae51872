//! Shared fixtures: a fresh in-memory SQLite database per test, migrated.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use routine::config::RoutineConfig;
use routine::contract::{Gender, NewCompany, NewEmployee};
use routine::domain::repo::CompanyRepository;
use routine::Routine;
use routine_db::{ConnectOpts, DbHandle};

pub async fn create_module() -> Routine {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default())
        .await
        .expect("Failed to connect to test database");
    Routine::with_db(db, RoutineConfig::default())
        .await
        .expect("Failed to run migrations")
}

pub async fn create_repo() -> Arc<dyn CompanyRepository> {
    create_module().await.repository()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn employee(no: &str, first: &str, last: &str, gender: Gender, born: NaiveDate) -> NewEmployee {
    NewEmployee {
        employee_no: no.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        gender,
        date_of_birth: born,
    }
}

pub fn company(name: &str, introduction: &str, employees: Vec<NewEmployee>) -> NewCompany {
    NewCompany {
        name: name.to_string(),
        introduction: introduction.to_string(),
        employees,
    }
}

/// `n` employees numbered from `start`, alternating gender, one year apart.
pub fn staff(prefix: &str, start: u32, n: u32) -> Vec<NewEmployee> {
    (start..start + n)
        .map(|i| {
            let gender = if i % 2 == 0 { Gender::Female } else { Gender::Male };
            employee(
                &format!("{prefix}{i:03}"),
                &format!("First{i:02}"),
                &format!("Last{i:02}"),
                gender,
                date(1960 + i as i32, 1, 1),
            )
        })
        .collect()
}
