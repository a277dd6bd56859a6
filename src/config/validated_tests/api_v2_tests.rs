//! Tests for enabling Bot API 2.0.

use super::*;

#[test]
fn enabled_with_domain_and_token() {
    let cli = cli(&["--domain", "demo.webim.ru", "--token", "secret"]);
    let api = ValidatedConfig::from_raw(&cli, None).unwrap().api_v2.unwrap();

    assert_eq!(api.domain, "demo.webim.ru");
    assert_eq!(api.token, "secret");
    assert_eq!(api.forward_agent_id, None);
    assert_eq!(api.forward_department_key, None);
}

#[test]
fn disabled_without_token() {
    let cli = cli(&["--domain", "demo.webim.ru", "--agent-id", "3"]);
    let config = ValidatedConfig::from_raw(&cli, None).unwrap();

    assert!(config.api_v2.is_none());
}

#[test]
fn disabled_without_domain() {
    let cli = cli(&["--token", "secret", "--dep-key", "sales"]);
    let config = ValidatedConfig::from_raw(&cli, None).unwrap();

    assert!(config.api_v2.is_none());
}

#[test]
fn empty_token_counts_as_unset() {
    let cli = cli(&["--domain", "demo.webim.ru", "--token", ""]);
    let config = ValidatedConfig::from_raw(&cli, None).unwrap();

    assert!(config.api_v2.is_none());
}

#[test]
fn forward_targets_are_carried() {
    let cli = cli(&[
        "--domain",
        "demo.webim.ru",
        "--token",
        "secret",
        "--agent-id",
        "42",
        "--dep-key",
        "sales",
    ]);
    let api = ValidatedConfig::from_raw(&cli, None).unwrap().api_v2.unwrap();

    assert_eq!(api.forward_agent_id, Some(42));
    assert_eq!(api.forward_department_key.as_deref(), Some("sales"));
}

#[test]
fn display_hides_token() {
    let cli = cli(&["--domain", "demo.webim.ru", "--token", "very-secret"]);
    let config = ValidatedConfig::from_raw(&cli, None).unwrap();
    let shown = config.to_string();

    assert!(shown.contains("demo.webim.ru"));
    assert!(!shown.contains("very-secret"));
}

#[test]
fn display_reports_disabled_api() {
    let config = ValidatedConfig::from_raw(&cli(&[]), None).unwrap();

    assert!(config.to_string().contains("api_v2: disabled"));
}
