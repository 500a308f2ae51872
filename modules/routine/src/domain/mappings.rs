//! Sort-key tables from the externally visible field names to entity fields.
//!
//! Internal names here are the names registered in
//! `infra::storage::field_maps`; the two are kept in step by tests.

use paging_core::{PropertyMapping, PropertyMappingService, PropertyMappingValue};

/// Shape of the data a caller sorts by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DtoShape {
    Company,
    Employee,
}

impl DtoShape {
    pub const ALL: [DtoShape; 2] = [DtoShape::Company, DtoShape::Employee];

    /// The entity each shape is listed from.
    pub fn entity(self) -> EntityKind {
        match self {
            DtoShape::Company => EntityKind::Company,
            DtoShape::Employee => EntityKind::Employee,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Company,
    Employee,
}

pub type RoutineMappings = PropertyMappingService<DtoShape, EntityKind>;

pub fn company_mapping() -> PropertyMapping {
    PropertyMapping::new()
        .insert("Id", PropertyMappingValue::new(["Id"]))
        .insert("CompanyName", PropertyMappingValue::new(["Name"]))
        .insert("Name", PropertyMappingValue::new(["Name"]))
        .insert("Introduction", PropertyMappingValue::new(["Introduction"]))
}

pub fn employee_mapping() -> PropertyMapping {
    PropertyMapping::new()
        .insert("Id", PropertyMappingValue::new(["Id"]))
        .insert("CompanyId", PropertyMappingValue::new(["CompanyId"]))
        .insert("EmployeeNo", PropertyMappingValue::new(["EmployeeNo"]))
        .insert("Name", PropertyMappingValue::new(["FirstName", "LastName"]))
        .insert("GenderDisplay", PropertyMappingValue::new(["Gender"]))
        // Older people have earlier birth dates.
        .insert("Age", PropertyMappingValue::new(["DateOfBirth"]).reverted())
}

/// All tables, registered once at start-up.
pub fn property_mapping_service() -> RoutineMappings {
    PropertyMappingService::new()
        .register(DtoShape::Company, EntityKind::Company, company_mapping())
        .register(DtoShape::Employee, EntityKind::Employee, employee_mapping())
}
