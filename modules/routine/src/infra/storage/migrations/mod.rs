use sea_orm_migration::prelude::*;

mod m20250301_000001_create_companies;
mod m20250301_000002_create_employees;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_companies::Migration),
            Box::new(m20250301_000002_create_employees::Migration),
        ]
    }
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    Name,
    Introduction,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    CompanyId,
    EmployeeNo,
    FirstName,
    LastName,
    Gender,
    DateOfBirth,
}
