use super::*;

#[test]
fn caret_region_selector_targets_editor_regions() {
    assert_eq!(caret_region_selector(), ".editor[data-section-id]");
}

#[test]
fn section_from_attr_parses_ids() {
    let id = SectionId::new();
    assert_eq!(section_from_attr(Some(id.to_string())), Some(id));
}

#[test]
fn section_from_attr_rejects_missing_or_garbage() {
    assert_eq!(section_from_attr(None), None);
    assert_eq!(section_from_attr(Some("not-an-id".to_owned())), None);
}

#[cfg(not(feature = "csr"))]
#[test]
fn native_build_has_no_caret() {
    assert_eq!(caret_section(), None);
    assert!(!exec_format(FormatCommand::Bold));
}
