use routine_db::FieldMap;

use super::entity::{company, employee};

/// Internal company field names → columns.
pub fn company_fields() -> FieldMap<company::Entity> {
    FieldMap::new()
        .insert("Id", company::Column::Id)
        .insert("Name", company::Column::Name)
        .insert("Introduction", company::Column::Introduction)
}

/// Internal employee field names → columns.
pub fn employee_fields() -> FieldMap<employee::Entity> {
    FieldMap::new()
        .insert("Id", employee::Column::Id)
        .insert("CompanyId", employee::Column::CompanyId)
        .insert("EmployeeNo", employee::Column::EmployeeNo)
        .insert("FirstName", employee::Column::FirstName)
        .insert("LastName", employee::Column::LastName)
        .insert("Gender", employee::Column::Gender)
        .insert("DateOfBirth", employee::Column::DateOfBirth)
}
