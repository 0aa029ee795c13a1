use super::*;

#[test]
fn default_base_path_is_knowledgebase2() {
    assert_eq!(ClientConfig::new(DEFAULT_BASE_PATH).base_path(), "/knowledgebase2");
}

#[test]
fn trailing_slashes_are_trimmed() {
    assert_eq!(ClientConfig::new("/kb//").base_path(), "/kb");
}

#[test]
fn missing_leading_slash_is_added() {
    assert_eq!(ClientConfig::new("kb").base_path(), "/kb");
}

#[test]
fn root_mount_has_empty_prefix() {
    let config = ClientConfig::new("/");
    assert_eq!(config.base_path(), "");
    assert_eq!(config.endpoint("sign_in"), "/sign_in");
}

#[test]
fn endpoint_joins_with_single_slash() {
    let config = ClientConfig::new("/knowledgebase2/");
    assert_eq!(config.endpoint("/base/upload"), "/knowledgebase2/base/upload");
    assert_eq!(config.endpoint("base/teams"), "/knowledgebase2/base/teams");
}
