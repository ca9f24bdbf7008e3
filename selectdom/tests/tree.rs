use selectdom::{Document, DomError};

fn select_with(doc: &Document, values: &[(&str, &str)]) -> selectdom::Element {
    let select = doc.create_element("select");
    for (value, label) in values {
        let option = doc.create_element("option");
        option.set_attribute("value", value).unwrap();
        option.set_text(label).unwrap();
        select.append_child(&option).unwrap();
    }
    select
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_append_and_remove() {
    let doc = Document::new();
    let root = doc.create_element("div");
    let child = doc.create_element("span");
    root.append_child(&child).unwrap();

    assert_eq!(root.children(), vec![child.clone()]);
    assert_eq!(child.parent(), Some(root.clone()));

    child.remove().unwrap();
    assert!(root.children().is_empty());
    assert!(!child.exists());
    assert_eq!(child.remove(), Err(DomError::NodeNotFound(child.id())));
}

#[test]
fn test_remove_drops_subtree() {
    let doc = Document::new();
    let root = doc.create_element("div");
    let select = select_with(&doc, &[("1", "one"), ("2", "two")]);
    root.append_child(&select).unwrap();
    assert_eq!(doc.len(), 4);

    select.remove().unwrap();
    assert_eq!(doc.len(), 1);
}

#[test]
fn test_insert_before_places_previous_sibling() {
    let doc = Document::new();
    let root = doc.create_element("div");
    let first = doc.create_element("p");
    let control = doc.create_element("select");
    root.append_child(&first).unwrap();
    root.append_child(&control).unwrap();

    let label = doc.create_element("span");
    control.insert_before(&label).unwrap();

    assert_eq!(root.children(), vec![first, label, control]);
}

#[test]
fn test_insert_before_requires_parent() {
    let doc = Document::new();
    let control = doc.create_element("select");
    let label = doc.create_element("span");
    assert_eq!(
        control.insert_before(&label),
        Err(DomError::Detached(control.id()))
    );
}

#[test]
fn test_append_rejects_cycle() {
    let doc = Document::new();
    let outer = doc.create_element("div");
    let inner = doc.create_element("div");
    outer.append_child(&inner).unwrap();
    assert!(matches!(
        inner.append_child(&outer),
        Err(DomError::Cycle { .. })
    ));
}

#[test]
fn test_siblings_with_class() {
    let doc = Document::new();
    let root = doc.create_element("div");
    let control = doc.create_element("select");
    let marked = doc.create_element("span");
    marked.add_class("marker other").unwrap();
    let plain = doc.create_element("span");
    root.append_child(&marked).unwrap();
    root.append_child(&plain).unwrap();
    root.append_child(&control).unwrap();

    assert_eq!(control.siblings_with_class("marker"), vec![marked.clone()]);
    assert!(marked.has_class("other"));
    assert_eq!(doc.elements_with_class("marker"), vec![marked]);
}

// ============================================================================
// Select values
// ============================================================================

#[test]
fn test_select_defaults_to_first_enabled_option() {
    let doc = Document::new();
    let select = select_with(&doc, &[("1", "one"), ("2", "two")]);
    assert_eq!(select.value(), "1");

    select.options()[0].set_attribute("disabled", "disabled").unwrap();
    assert_eq!(select.value(), "2");
}

#[test]
fn test_empty_select_has_empty_value() {
    let doc = Document::new();
    let select = doc.create_element("select");
    assert_eq!(select.value(), "");
}

#[test]
fn test_set_value_selects_disabled_option() {
    let doc = Document::new();
    let select = select_with(&doc, &[("1", "one"), ("2", "two")]);
    select.options()[1].set_attribute("disabled", "disabled").unwrap();

    select.set_value("2").unwrap();
    assert_eq!(select.value(), "2");
}

#[test]
fn test_set_value_without_match_clears_selection() {
    let doc = Document::new();
    let select = select_with(&doc, &[("1", "one")]);
    select.set_value("9").unwrap();
    assert_eq!(select.value(), "");

    // New options restore the default selection
    let option = doc.create_element("option");
    option.set_attribute("value", "3").unwrap();
    select.append_child(&option).unwrap();
    assert_eq!(select.value(), "1");
}

#[test]
fn test_removing_selected_option_falls_back() {
    let doc = Document::new();
    let select = select_with(&doc, &[("1", "one"), ("2", "two")]);
    select.set_value("2").unwrap();
    select.options()[1].remove().unwrap();
    assert_eq!(select.value(), "1");
}

#[test]
fn test_options_inside_groups() {
    let doc = Document::new();
    let select = doc.create_element("select");
    let group = doc.create_element("optgroup");
    let option = doc.create_element("option");
    option.set_attribute("value", "a").unwrap();
    group.append_child(&option).unwrap();
    select.append_child(&group).unwrap();

    assert_eq!(select.options(), vec![option]);
    assert_eq!(select.value(), "a");
}

#[test]
fn test_option_without_value_uses_text() {
    let doc = Document::new();
    let select = doc.create_element("select");
    let option = doc.create_element("option");
    option.set_text("plain").unwrap();
    select.append_child(&option).unwrap();
    assert_eq!(select.value(), "plain");
}

// ============================================================================
// Change listeners
// ============================================================================

#[test]
fn test_choose_notifies_listeners() {
    let doc = Document::new();
    let select = select_with(&doc, &[("1", "one"), ("2", "two")]);
    let mut listener = select.on_change().unwrap();

    select.set_value("2").unwrap();
    assert!(listener.try_recv().is_none());

    select.choose("1").unwrap();
    let event = listener.try_recv().unwrap();
    assert_eq!(event.target, select.id());
    assert_eq!(event.value, "1");
}

#[tokio::test]
async fn test_listener_closes_when_node_removed() {
    let doc = Document::new();
    let select = select_with(&doc, &[("1", "one")]);
    let mut listener = select.on_change().unwrap();
    select.remove().unwrap();
    assert!(listener.recv().await.is_none());
}
