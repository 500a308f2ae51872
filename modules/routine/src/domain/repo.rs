use crate::contract::{
    Company, CompanyParameters, Employee, EmployeeParameters, NewCompany, NewEmployee,
};
use crate::domain::error::RepoError;
use async_trait::async_trait;
use paging_core::PagedList;
use uuid::Uuid;

/// Persistence operations for companies and their employees.
/// Object-safe and async-friendly via `async_trait`.
///
/// Every id argument is checked for nil before the store is touched.
/// Writes take effect immediately; build the implementation over a
/// transaction to group them.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Insert a company and its nested employees, all with fresh ids.
    async fn add_company(&self, company: NewCompany) -> Result<Company, RepoError>;

    async fn add_employee(
        &self,
        company_id: Uuid,
        employee: NewEmployee,
    ) -> Result<Employee, RepoError>;

    async fn company_exists(&self, company_id: Uuid) -> Result<bool, RepoError>;

    async fn get_company(&self, company_id: Uuid) -> Result<Option<Company>, RepoError>;

    /// Filtered, sorted and paged company listing.
    async fn get_companies(
        &self,
        params: &CompanyParameters,
    ) -> Result<PagedList<Company>, RepoError>;

    /// Companies with the given ids, ordered by name.
    async fn get_companies_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>, RepoError>;

    async fn get_employee(
        &self,
        company_id: Uuid,
        employee_id: Uuid,
    ) -> Result<Option<Employee>, RepoError>;

    /// Employees of one company, filtered, sorted and paged.
    async fn get_employees(
        &self,
        company_id: Uuid,
        params: &EmployeeParameters,
    ) -> Result<PagedList<Employee>, RepoError>;

    /// Like [`CompanyRepository::get_employees`] but across all companies.
    async fn search_employees(
        &self,
        params: &EmployeeParameters,
    ) -> Result<PagedList<Employee>, RepoError>;

    async fn update_company(&self, company: Company) -> Result<(), RepoError>;

    async fn update_employee(&self, employee: Employee) -> Result<(), RepoError>;

    /// Returns true if a row was deleted. Employees go with their company.
    async fn delete_company(&self, company_id: Uuid) -> Result<bool, RepoError>;

    async fn delete_employee(&self, employee_id: Uuid) -> Result<bool, RepoError>;
}
