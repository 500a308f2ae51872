//! SeaORM-backed implementation of [`CompanyRepository`].
//!
//! Generic over `C: ConnectionTrait + TransactionTrait`, so it can be built
//! over a `DatabaseConnection` or over a `DatabaseTransaction` when several
//! writes must commit together. Inside a transaction, `add_company` nests as a
//! savepoint.

use std::sync::Arc;

use paging_core::{PageSizeCfg, PagedList};
use routine_db::paging::contains_any;
use routine_db::{paginate, FieldMap, SortApplyExt};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, TransactionTrait,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::entity::company::{self, Entity as CompanyEntity};
use super::entity::employee::{self, Entity as EmployeeEntity};
use super::field_maps::{company_fields, employee_fields};
use super::mapper::{company_active, employee_active, employee_from_new};
use crate::contract::{
    Company, CompanyParameters, Employee, EmployeeParameters, Gender, NewCompany, NewEmployee,
};
use crate::domain::error::RepoError;
use crate::domain::mappings::{DtoShape, EntityKind, RoutineMappings};
use crate::domain::repo::CompanyRepository;

/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmCompanyRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
    mappings: Arc<RoutineMappings>,
    page_cfg: PageSizeCfg,
    company_fields: FieldMap<company::Entity>,
    employee_fields: FieldMap<employee::Entity>,
}

impl<C> SeaOrmCompanyRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C, mappings: Arc<RoutineMappings>) -> Self {
        Self {
            conn,
            mappings,
            page_cfg: PageSizeCfg::default(),
            company_fields: company_fields(),
            employee_fields: employee_fields(),
        }
    }

    pub fn with_page_size(mut self, cfg: PageSizeCfg) -> Self {
        self.page_cfg = cfg;
        self
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn into_connection(self) -> C {
        self.conn
    }

    fn company_select(&self, params: &CompanyParameters) -> Result<Select<CompanyEntity>, RepoError> {
        let mut select = CompanyEntity::find();

        if let Some(name) = non_blank(params.company_name.as_deref()) {
            select = select.filter(company::Column::Name.eq(name));
        }
        if let Some(term) = non_blank(params.search_term.as_deref()) {
            select = select.filter(contains_any(
                &[company::Column::Name, company::Column::Introduction],
                term,
            ));
        }

        let mapping = self
            .mappings
            .get_property_mapping(DtoShape::Company, EntityKind::Company)?;
        Ok(select.apply_sort(&params.order_by, mapping, &self.company_fields)?)
    }

    /// Filters and ordering shared by the per-company and global employee listings.
    fn employee_select(
        &self,
        scope: Condition,
        params: &EmployeeParameters,
    ) -> Result<Select<EmployeeEntity>, RepoError> {
        let mut select = EmployeeEntity::find().filter(scope);

        if let Some(raw) = non_blank(params.gender.as_deref()) {
            let gender: Gender = raw.parse().map_err(|_| RepoError::invalid("gender"))?;
            select = select.filter(employee::Column::Gender.eq(employee::Gender::from(gender)));
        }
        if let Some(q) = non_blank(params.q.as_deref()) {
            select = select.filter(contains_any(
                &[
                    employee::Column::EmployeeNo,
                    employee::Column::FirstName,
                    employee::Column::LastName,
                ],
                q,
            ));
        }

        let mapping = self
            .mappings
            .get_property_mapping(DtoShape::Employee, EntityKind::Employee)?;
        Ok(select.apply_sort(&params.order_by, mapping, &self.employee_fields)?)
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

async fn insert_company_with_staff<C: ConnectionTrait>(
    conn: &C,
    company: &Company,
    staff: Vec<employee::ActiveModel>,
) -> Result<(), DbErr> {
    company_active(company).insert(conn).await?;
    if !staff.is_empty() {
        EmployeeEntity::insert_many(staff)
            .exec_without_returning(conn)
            .await?;
    }
    Ok(())
}

fn require(id: Uuid, name: &'static str) -> Result<Uuid, RepoError> {
    if id.is_nil() {
        return Err(RepoError::invalid(name));
    }
    Ok(id)
}

#[async_trait::async_trait]
impl<C> CompanyRepository for SeaOrmCompanyRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    #[instrument(
        name = "routine.repo.add_company",
        skip(self, company),
        fields(employees = company.employees.len())
    )]
    async fn add_company(&self, company: NewCompany) -> Result<Company, RepoError> {
        let created = Company {
            id: Uuid::new_v4(),
            name: company.name,
            introduction: company.introduction,
        };
        let staff: Vec<employee::ActiveModel> = company
            .employees
            .into_iter()
            .map(|e| employee_active(&employee_from_new(created.id, e)))
            .collect();

        let txn = self.conn.begin().await?;
        match insert_company_with_staff(&txn, &created, staff).await {
            Ok(()) => txn.commit().await?,
            Err(e) => {
                txn.rollback().await?;
                return Err(e.into());
            }
        }

        info!(company_id = %created.id, "company created");
        Ok(created)
    }

    #[instrument(
        name = "routine.repo.add_employee",
        skip(self, employee),
        fields(company_id = %company_id)
    )]
    async fn add_employee(
        &self,
        company_id: Uuid,
        employee: NewEmployee,
    ) -> Result<Employee, RepoError> {
        let company_id = require(company_id, "company_id")?;
        let created = employee_from_new(company_id, employee);
        employee_active(&created).insert(&self.conn).await?;
        info!(employee_id = %created.id, "employee created");
        Ok(created)
    }

    #[instrument(name = "routine.repo.company_exists", skip(self), fields(company_id = %company_id))]
    async fn company_exists(&self, company_id: Uuid) -> Result<bool, RepoError> {
        let company_id = require(company_id, "company_id")?;
        let count = CompanyEntity::find_by_id(company_id)
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }

    #[instrument(name = "routine.repo.get_company", skip(self), fields(company_id = %company_id))]
    async fn get_company(&self, company_id: Uuid) -> Result<Option<Company>, RepoError> {
        let company_id = require(company_id, "company_id")?;
        let found = CompanyEntity::find_by_id(company_id).one(&self.conn).await?;
        Ok(found.map(Into::into))
    }

    #[instrument(
        name = "routine.repo.get_companies",
        skip(self, params),
        fields(order_by = %params.order_by)
    )]
    async fn get_companies(
        &self,
        params: &CompanyParameters,
    ) -> Result<PagedList<Company>, RepoError> {
        let select = self.company_select(params)?;
        let page = params.page_request(self.page_cfg);
        let companies = paginate(select, &self.conn, page, Company::from).await?;
        debug!(
            total_count = companies.total_count(),
            returned = companies.len(),
            "listed companies"
        );
        Ok(companies)
    }

    #[instrument(name = "routine.repo.get_companies_by_ids", skip(self, ids), fields(ids = ids.len()))]
    async fn get_companies_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = CompanyEntity::find()
            .filter(company::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(company::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(
        name = "routine.repo.get_employee",
        skip(self),
        fields(company_id = %company_id, employee_id = %employee_id)
    )]
    async fn get_employee(
        &self,
        company_id: Uuid,
        employee_id: Uuid,
    ) -> Result<Option<Employee>, RepoError> {
        let company_id = require(company_id, "company_id")?;
        let employee_id = require(employee_id, "employee_id")?;
        let found = EmployeeEntity::find()
            .filter(employee::Column::CompanyId.eq(company_id))
            .filter(employee::Column::Id.eq(employee_id))
            .one(&self.conn)
            .await?;
        Ok(found.map(Into::into))
    }

    #[instrument(
        name = "routine.repo.get_employees",
        skip(self, params),
        fields(company_id = %company_id, order_by = %params.order_by)
    )]
    async fn get_employees(
        &self,
        company_id: Uuid,
        params: &EmployeeParameters,
    ) -> Result<PagedList<Employee>, RepoError> {
        let company_id = require(company_id, "company_id")?;
        let scope = Condition::all().add(employee::Column::CompanyId.eq(company_id));
        let select = self.employee_select(scope, params)?;
        let page = params.page_request(self.page_cfg);
        let employees = paginate(select, &self.conn, page, Employee::from).await?;
        debug!(
            total_count = employees.total_count(),
            returned = employees.len(),
            "listed employees"
        );
        Ok(employees)
    }

    #[instrument(
        name = "routine.repo.search_employees",
        skip(self, params),
        fields(order_by = %params.order_by)
    )]
    async fn search_employees(
        &self,
        params: &EmployeeParameters,
    ) -> Result<PagedList<Employee>, RepoError> {
        let select = self.employee_select(Condition::all(), params)?;
        let page = params.page_request(self.page_cfg);
        Ok(paginate(select, &self.conn, page, Employee::from).await?)
    }

    #[instrument(name = "routine.repo.update_company", skip(self, company), fields(company_id = %company.id))]
    async fn update_company(&self, company: Company) -> Result<(), RepoError> {
        require(company.id, "company.id")?;
        company_active(&company).update(&self.conn).await?;
        Ok(())
    }

    #[instrument(name = "routine.repo.update_employee", skip(self, employee), fields(employee_id = %employee.id))]
    async fn update_employee(&self, employee: Employee) -> Result<(), RepoError> {
        require(employee.id, "employee.id")?;
        require(employee.company_id, "employee.company_id")?;
        employee_active(&employee).update(&self.conn).await?;
        Ok(())
    }

    #[instrument(name = "routine.repo.delete_company", skip(self), fields(company_id = %company_id))]
    async fn delete_company(&self, company_id: Uuid) -> Result<bool, RepoError> {
        let company_id = require(company_id, "company_id")?;
        let res = CompanyEntity::delete_by_id(company_id)
            .exec(&self.conn)
            .await?;
        if res.rows_affected > 0 {
            info!("company deleted");
        }
        Ok(res.rows_affected > 0)
    }

    #[instrument(name = "routine.repo.delete_employee", skip(self), fields(employee_id = %employee_id))]
    async fn delete_employee(&self, employee_id: Uuid) -> Result<bool, RepoError> {
        let employee_id = require(employee_id, "employee_id")?;
        let res = EmployeeEntity::delete_by_id(employee_id)
            .exec(&self.conn)
            .await?;
        Ok(res.rows_affected > 0)
    }
}
