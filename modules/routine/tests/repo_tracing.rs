//! Repository operations emit named spans and debug events.

mod common;

use common::{company, create_repo, staff};
use routine::contract::EmployeeParameters;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn listing_emits_repo_and_paginate_spans() {
    let repo = create_repo().await;
    let acme = repo
        .add_company(company("Acme", "", staff("A", 1, 3)))
        .await
        .unwrap();

    let params = EmployeeParameters {
        order_by: "bogusfield, name".into(),
        ..Default::default()
    };
    let page = repo.get_employees(acme.id, &params).await.unwrap();
    assert_eq!(page.total_count(), 3);

    assert!(logs_contain("routine.repo.add_company"));
    assert!(logs_contain("company created"));
    assert!(logs_contain("routine.repo.get_employees"));
    assert!(logs_contain("routine_db.paginate"));
    assert!(logs_contain("skipping unknown orderby key"));
    assert!(logs_contain("listed employees"));
}

#[tokio::test]
#[traced_test]
async fn rejected_arguments_still_open_a_span() {
    let repo = create_repo().await;
    assert!(repo.get_company(uuid::Uuid::nil()).await.is_err());
    assert!(logs_contain("routine.repo.get_company"));
}
