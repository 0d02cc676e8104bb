mod common;

use common::fixtures::CATALOG;
use common::{TestResult, catalog_types, sku, skus};
use xbind::{
    AnyType, CursorError, CursorFlags, DataSourceNode, Deferred, IncludedTypeSet, Lazy, LazyCell,
    NodeType, ReadOnlyCursor, TypeDescriptor, TypedNode, XmlCursor, XmlDocument, XmlNode, compile,
};

#[test]
fn multiple_items_in_document_order() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let mut cursor = ReadOnlyCursor::new(
        Some(doc.root_node()),
        compile("catalog/item")?,
        catalog_types(),
        CursorFlags::MULTIPLE,
    )?;

    assert_eq!(skus(&mut cursor), vec!["b1", "p1", "b2"]);
    assert!(!cursor.is_positioned());
    assert!(!cursor.move_next());
    Ok(())
}

#[test]
fn resolved_types_follow_markers() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let mut cursor = ReadOnlyCursor::new(
        Some(doc.root_node()),
        compile("//item")?,
        catalog_types(),
        CursorFlags::MULTIPLE,
    )?;

    let mut seen = Vec::new();
    while cursor.move_next() {
        let included = cursor.included_type().ok_or("positioned without a type")?;
        seen.push((
            included.descriptor.name().to_string(),
            cursor.xsi_type().map(str::to_string),
        ));
    }
    assert_eq!(
        seen,
        vec![
            ("BookProduct".to_string(), Some("Book".to_string())),
            ("Product".to_string(), None),
            ("BookProduct".to_string(), Some("Book".to_string())),
        ]
    );
    Ok(())
}

#[test]
fn relative_query_from_document_element() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let mut cursor = ReadOnlyCursor::new(
        Some(doc.document_element()),
        compile("item[@xsi:type]")?,
        catalog_types(),
        CursorFlags::MULTIPLE,
    )?;
    assert_eq!(skus(&mut cursor), vec!["b1", "b2"]);
    Ok(())
}

#[test]
fn single_item_query_yields_once() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let mut cursor = ReadOnlyCursor::new(
        Some(doc.root_node()),
        compile("catalog/item[@sku='p1']")?,
        catalog_types(),
        CursorFlags::ELEMENTS,
    )?;

    assert!(cursor.move_next());
    assert_eq!(cursor.current().map(sku).as_deref(), Some("p1"));
    assert!(!cursor.move_next());
    assert!(!cursor.is_positioned());
    Ok(())
}

#[test]
fn single_item_query_with_many_results_yields_nothing() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let mut cursor = ReadOnlyCursor::new(
        Some(doc.root_node()),
        compile("catalog/item")?,
        catalog_types(),
        CursorFlags::ELEMENTS,
    )?;

    assert!(!cursor.move_next());
    assert!(!cursor.move_next());
    assert!(!cursor.is_positioned());
    Ok(())
}

#[test]
fn unknown_markers_do_not_stop_the_scan() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let mut cursor = ReadOnlyCursor::new(
        Some(doc.root_node()),
        compile("catalog/item[@sku='t1'] | catalog/item[@sku='b2']")?,
        catalog_types(),
        CursorFlags::MULTIPLE,
    )?;
    assert_eq!(skus(&mut cursor), vec!["b2"]);
    Ok(())
}

#[test]
fn reset_reproduces_the_sequence() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let mut cursor = ReadOnlyCursor::new(
        Some(doc.root_node()),
        compile("catalog/*")?,
        AnyType::new(TypeDescriptor::new("node")),
        CursorFlags::MULTIPLE,
    )?;

    let first = skus(&mut cursor);
    assert_eq!(first, vec!["b1", "p1", "", "t1", "b2"]);
    cursor.reset()?;
    assert_eq!(skus(&mut cursor), first);

    cursor.move_next();
    cursor.move_next();
    cursor.reset()?;
    assert!(!cursor.is_positioned());
    assert_eq!(skus(&mut cursor), first);
    Ok(())
}

#[test]
fn saved_position_is_restored_on_a_fresh_cursor() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let path = compile("catalog/item")?;
    let types = catalog_types();

    let mut cursor =
        ReadOnlyCursor::new(Some(doc.root_node()), path.clone(), &types, CursorFlags::MULTIPLE)?;
    cursor.move_next();
    cursor.move_next();
    cursor.move_next();
    let snapshot = cursor.save()?;
    assert_eq!(sku(snapshot.node()), "b2");
    assert_eq!(snapshot.xsi_type(), Some("Book"));

    let mut fresh =
        ReadOnlyCursor::new(Some(doc.root_node()), path, &types, CursorFlags::MULTIPLE)?;
    fresh.move_to(&snapshot)?;
    assert_eq!(fresh.current(), cursor.current());
    assert_eq!(fresh.included_type(), cursor.included_type());
    assert!(!fresh.move_next());
    Ok(())
}

#[test]
fn move_to_rewinds_before_searching() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let mut cursor = ReadOnlyCursor::new(
        Some(doc.root_node()),
        compile("catalog/item")?,
        catalog_types(),
        CursorFlags::MULTIPLE,
    )?;
    cursor.move_next();
    let first = cursor.save()?;
    cursor.move_to_end();

    cursor.move_to(&first)?;
    assert_eq!(cursor.current().map(sku).as_deref(), Some("b1"));
    assert_eq!(skus(&mut cursor), vec!["p1", "b2"]);
    Ok(())
}

#[test]
fn move_to_node_of_another_document_fails() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let copy = XmlDocument::parse(CATALOG)?;
    let path = compile("catalog/item")?;

    let mut other = ReadOnlyCursor::new(
        Some(copy.root_node()),
        path.clone(),
        catalog_types(),
        CursorFlags::MULTIPLE,
    )?;
    assert!(other.move_next());
    let foreign = other.save()?;

    let mut cursor =
        ReadOnlyCursor::new(Some(doc.root_node()), path, catalog_types(), CursorFlags::MULTIPLE)?;
    let err = cursor.move_to(&foreign).unwrap_err();
    assert!(matches!(err, CursorError::CannotMoveToGivenNode));
    assert!(!cursor.is_positioned());
    Ok(())
}

#[test]
fn move_to_unresolved_reference_fails() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let mut cursor = ReadOnlyCursor::new(
        Some(doc.root_node()),
        compile("catalog/item")?,
        catalog_types(),
        CursorFlags::MULTIPLE,
    )?;

    let unresolved: LazyCell<XmlNode> = LazyCell::new();
    let err = cursor.move_to(&unresolved).unwrap_err();
    assert!(matches!(err, CursorError::CannotMoveToGivenNode));

    unresolved.set(doc.document_element());
    let err = cursor.move_to(&unresolved).unwrap_err();
    assert!(matches!(err, CursorError::CannotMoveToGivenNode));
    Ok(())
}

#[test]
fn move_to_node_whose_type_is_unknown_fails() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let path = compile("catalog/item")?;
    let everything = IncludedTypeSet::new(TypeDescriptor::new("Product"))
        .include("Toy", TypeDescriptor::new("ToyProduct"));

    let mut toys = ReadOnlyCursor::new(
        Some(doc.root_node()),
        compile("catalog/item[@xsi:type='Toy']")?,
        everything,
        CursorFlags::MULTIPLE,
    )?;
    assert!(toys.move_next());

    let mut cursor =
        ReadOnlyCursor::new(Some(doc.root_node()), path, catalog_types(), CursorFlags::MULTIPLE)?;
    let err = cursor.move_to(&toys).unwrap_err();
    assert!(matches!(err, CursorError::CannotMoveToGivenNode));
    Ok(())
}

#[test]
fn move_to_end_from_every_state() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let mut cursor = ReadOnlyCursor::new(
        Some(doc.root_node()),
        compile("catalog/item")?,
        catalog_types(),
        CursorFlags::MULTIPLE,
    )?;

    // Before the first item.
    cursor.move_to_end();
    assert!(!cursor.is_positioned());
    assert!(!cursor.move_next());

    // Mid-sequence.
    cursor.reset()?;
    assert!(cursor.move_next());
    cursor.move_to_end();
    assert!(!cursor.is_positioned());
    assert!(!cursor.move_next());

    // Already at the end.
    cursor.move_to_end();
    assert!(!cursor.is_positioned());
    assert!(!cursor.move_next());
    assert!(matches!(cursor.save(), Err(CursorError::NotPositioned)));
    Ok(())
}

#[test]
fn every_mutation_is_rejected() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let mut cursor = ReadOnlyCursor::new(
        Some(doc.root_node()),
        compile("catalog/item")?,
        catalog_types(),
        CursorFlags::MULTIPLE | CursorFlags::MUTABLE,
    )?;
    let ty = TypeDescriptor::new("BookProduct");

    for step in 0..3 {
        if step > 0 {
            cursor.move_next();
        }
        let outcomes = [
            cursor.set_nil(true),
            cursor.set_nil(false),
            cursor.clear(),
            cursor.set_attribute(None, "sku", Some("x")),
            cursor.set_attribute(Some(xbind::XSI_NAMESPACE), "type", None),
            cursor.ensure_prefix("urn:example").map(drop),
            cursor.make_next(&ty),
            cursor.create(&ty),
            cursor.coerce(&ty),
            cursor.remove(),
            cursor.remove_all_next(),
        ];
        for outcome in outcomes {
            assert!(matches!(outcome, Err(CursorError::NotMutable)));
        }
    }

    assert_eq!(cursor.current().map(sku).as_deref(), Some("p1"));
    let elements = doc
        .document_element()
        .children()
        .filter(|child| child.node_type() == NodeType::Element)
        .count();
    assert_eq!(elements, 5);
    Ok(())
}

#[test]
fn is_nil_reflects_the_node() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let mut cursor = ReadOnlyCursor::new(
        Some(doc.root_node()),
        compile("catalog/item")?,
        AnyType::new(TypeDescriptor::new("node")),
        CursorFlags::MULTIPLE,
    )?;

    let mut nil = Vec::new();
    while cursor.move_next() {
        nil.push(cursor.is_nil());
    }
    assert_eq!(nil, vec![false, false, true, false]);
    assert!(!cursor.is_nil());
    Ok(())
}

#[test]
fn lazy_parent_resolved_after_construction() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let parent = LazyCell::new();
    let mut cursor = ReadOnlyCursor::new(
        parent.clone(),
        compile("item")?,
        catalog_types(),
        CursorFlags::MULTIPLE,
    )?;
    assert!(!cursor.move_next());

    parent.set(doc.document_element());
    cursor.reset()?;
    assert_eq!(skus(&mut cursor), vec!["b1", "p1", "b2"]);

    parent.clear();
    cursor.reset()?;
    assert!(!cursor.move_next());
    Ok(())
}

#[test]
fn deferred_parent_is_requeried_on_reset() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let ready = std::cell::Cell::new(false);
    let parent = Deferred::new(|| ready.get().then(|| doc.root_node()));
    assert!(!parent.has_value());

    let mut cursor = ReadOnlyCursor::new(
        &parent,
        compile("/catalog/item")?,
        catalog_types(),
        CursorFlags::MULTIPLE,
    )?;
    assert!(!cursor.move_next());

    ready.set(true);
    cursor.reset()?;
    assert_eq!(skus(&mut cursor), vec!["b1", "p1", "b2"]);
    Ok(())
}

#[test]
fn attribute_results_resolve_to_the_default_type() -> TestResult {
    let doc = XmlDocument::parse(CATALOG)?;
    let mut cursor = ReadOnlyCursor::new(
        Some(doc.root_node()),
        compile("catalog/item/@sku")?,
        catalog_types(),
        CursorFlags::MULTIPLE | CursorFlags::ATTRIBUTES,
    )?;

    let mut values = Vec::new();
    while cursor.move_next() {
        let node = cursor.value().ok_or("positioned without a node")?;
        values.push(node.string_value());
        assert_eq!(cursor.xsi_type(), None);
    }
    assert_eq!(values, vec!["b1", "p1", "t1", "b2"]);
    Ok(())
}

#[test]
fn bad_inputs_surface_as_bind_errors() {
    let err: xbind::BindError = XmlDocument::parse("<catalog>").unwrap_err().into();
    assert!(matches!(err, xbind::BindError::Xml(_)));

    let err: xbind::BindError = compile("catalog/item[").unwrap_err().into();
    assert!(matches!(err, xbind::BindError::XPath(_)));

    let err: xbind::BindError = compile("count(catalog/item)").unwrap_err().into();
    assert!(matches!(err, xbind::BindError::XPath(xbind::XPathError::NotANodeSet(_))));
}
