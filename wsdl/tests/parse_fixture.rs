//! Parses the on-disk items fixture through the default loader, following
//! relative includes and imports between files.

use pretty_assertions::assert_eq;
use whistler_wsdl::{
    builtin::BuiltIn,
    namespaces::QualifiedName,
    types::{ElementType, TypeShape},
};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn types_named<'a>(types: &'a [ElementType], local: &str) -> Vec<&'a ElementType> {
    types.iter().filter(|ty| ty.name.local == local).collect()
}

#[test]
fn parses_items_service() {
    let definition = whistler_wsdl::parse(fixture("items.wsdl")).expect("items.wsdl parses");

    assert_eq!(definition.target_namespace, "urn:items");
    assert_eq!(definition.messages.len(), 3);
    assert_eq!(definition.port_types[0].operations.len(), 2);
    assert_eq!(definition.services[0].ports[0].name, "ItemsSoap");
}

#[test]
fn mutually_included_schemas_are_read_once() {
    let definition = whistler_wsdl::parse(fixture("items.wsdl")).unwrap();

    assert_eq!(types_named(&definition.types, "ItemRequest").len(), 1);
    assert_eq!(types_named(&definition.types, "Item").len(), 1);
    assert_eq!(types_named(&definition.types, "Status").len(), 1);
}

#[test]
fn imported_types_are_reachable_under_both_namespaces() {
    let definition = whistler_wsdl::parse(fixture("items.wsdl")).unwrap();
    let table = &definition.table;

    let imported = table.get(&QualifiedName::new("urn:common", "Money")).unwrap();
    let rebased = table.get(&QualifiedName::new("urn:items", "Money")).unwrap();

    assert_eq!(imported.shape, rebased.shape);
    assert_eq!(rebased.name.to_string(), "urn:items:Money");
    assert_eq!(rebased.canonical_name(), &imported.name);
    assert_eq!(imported.origin, None);
}

#[test]
fn built_in_elements_need_no_table_entry() {
    let definition = whistler_wsdl::parse(fixture("items.wsdl")).unwrap();
    let ping = QualifiedName::new("urn:items", "Ping");

    assert!(definition.table.element(&ping).is_none());
    assert!(definition.table.contains_element(&ping));
    assert_eq!(definition.table.primitive_element(&ping), Some(BuiltIn::String));
}

#[test]
fn element_resolves_to_its_declared_type() {
    let definition = whistler_wsdl::parse(fixture("items.wsdl")).unwrap();

    let response = definition
        .table
        .element(&QualifiedName::new("urn:items", "itemresponse"))
        .unwrap();

    assert_eq!(response.name, QualifiedName::new("urn:items", "Item"));
    assert_eq!(response.documentation.as_deref(), Some("A catalogue item."));
    assert!(matches!(response.shape, TypeShape::Structural(_)));
}

#[test]
fn missing_file_is_reported() {
    let result = whistler_wsdl::parse(fixture("absent.wsdl"));
    assert!(result.is_err());
}
