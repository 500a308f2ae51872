//! The registered sort tables must be complete and agree with the storage columns.

use paging_core::Error;
use routine::domain::mappings::{property_mapping_service, DtoShape, EntityKind};
use routine::infra::storage::field_maps::{company_fields, employee_fields};

#[test]
fn every_shape_has_a_table() {
    let svc = property_mapping_service();
    for shape in DtoShape::ALL {
        assert!(
            svc.is_registered(shape, shape.entity()),
            "no table for {shape:?}"
        );
    }
}

#[test]
fn every_destination_field_has_a_column() {
    let svc = property_mapping_service();

    let company = svc
        .get_property_mapping(DtoShape::Company, EntityKind::Company)
        .unwrap();
    assert_eq!(company_fields().missing_from(company), Vec::<String>::new());

    let employee = svc
        .get_property_mapping(DtoShape::Employee, EntityKind::Employee)
        .unwrap();
    assert_eq!(employee_fields().missing_from(employee), Vec::<String>::new());
}

#[test]
fn mismatched_pair_is_a_configuration_error() {
    let svc = property_mapping_service();
    let err = svc
        .get_property_mapping(DtoShape::Company, EntityKind::Employee)
        .unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(
        err,
        Error::MappingNotFound {
            shape: "Company".into(),
            entity: "Employee".into(),
        }
    );
}

#[test]
fn employee_table_contents() {
    let svc = property_mapping_service();
    let table = svc
        .get_property_mapping(DtoShape::Employee, EntityKind::Employee)
        .unwrap();

    let name = table.get("name").unwrap();
    assert_eq!(name.destination_properties, vec!["FirstName", "LastName"]);
    assert!(!name.revert);

    let age = table.get("AGE").unwrap();
    assert_eq!(age.destination_properties, vec!["DateOfBirth"]);
    assert!(age.revert);
}

#[test]
fn strict_validation_is_opt_in() {
    let svc = property_mapping_service();
    let table = svc
        .get_property_mapping(DtoShape::Company, EntityKind::Company)
        .unwrap();

    assert!(table.valid_mapping_exists_for("companyName desc, introduction"));
    assert_eq!(
        table.validate_order_by("name, country"),
        Err(Error::InvalidOrderByField("country".into()))
    );
}
