pub mod model;

pub use model::{
    Company, CompanyParameters, Employee, EmployeeParameters, Gender, NewCompany, NewEmployee,
};
