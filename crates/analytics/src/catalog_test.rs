//! Tests for metric and dimension resolution

use crate::catalog::Catalog;
use crate::error::AnalyticsError;
use crate::request::Dimension;
use crate::sql::ValueQuoting;

#[test]
fn test_builtin_metric_keys() {
    let keys: Vec<_> = Catalog::global().metric_keys().collect();
    assert_eq!(keys, vec!["events", "revenue", "sessions", "users"]);
}

#[test]
fn test_users_metric() {
    let users = Catalog::global().resolve_metric("users").unwrap();
    assert!(users.groupable);
    assert_eq!(users.name, "user_pseudo_id");
    assert_eq!(users.pseudo_name, "users");
    assert_eq!(users.inner, "user_pseudo_id");
    assert_eq!(users.outer, "COUNT(DISTINCT user_pseudo_id) AS users");
}

#[test]
fn test_sessions_metric() {
    let sessions = Catalog::global().resolve_metric("sessions").unwrap();
    assert!(sessions.groupable);
    assert!(sessions.inner.contains("key = 'ga_session_id'"));
    assert!(sessions.inner.ends_with("AS sessions"));
    assert_eq!(sessions.outer, "COUNT(DISTINCT sessions) AS sessions");
}

#[test]
fn test_non_groupable_metrics() {
    let catalog = Catalog::global();

    let revenue = catalog.resolve_metric("revenue").unwrap();
    assert!(!revenue.groupable);
    assert_eq!(revenue.inner, "SUM(ecommerce.purchase_revenue) AS revenue");
    assert_eq!(revenue.outer, "SUM(revenue) AS revenue");

    let events = catalog.resolve_metric("events").unwrap();
    assert!(!events.groupable);
    assert_eq!(events.inner, "COUNT(event_name) AS events");
    assert_eq!(events.outer, "SUM(events) AS events");
}

#[test]
fn test_unknown_metric() {
    let err = Catalog::global().resolve_metric("bounce_rate").unwrap_err();
    match err {
        AnalyticsError::UnsupportedMetric { key } => assert_eq!(key, "bounce_rate"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_metric_lookup_is_case_sensitive() {
    assert!(Catalog::global().resolve_metric("Users").is_err());
}

#[test]
fn test_dotted_dimension() {
    let statement = Catalog::global()
        .resolve_dimension(&Dimension::new("device.category"), ValueQuoting::Verbatim)
        .unwrap();

    assert!(statement.groupable);
    assert_eq!(statement.inner, "device.category AS device__category");
    assert_eq!(statement.outer, "device__category");
    assert_eq!(statement.name, "device__category");
    assert_eq!(statement.pseudo_name, "device__category");
}

#[test]
fn test_event_date_dimension() {
    let statement = Catalog::global()
        .resolve_dimension(&Dimension::new("event_date"), ValueQuoting::Verbatim)
        .unwrap();

    assert_eq!(statement.inner, "PARSE_DATE('%Y%m%d', event_date) AS event_date");
    assert_eq!(statement.outer, "event_date");
}

#[test]
fn test_custom_dimension() {
    let statement = Catalog::global()
        .resolve_dimension(&Dimension::custom("campaign"), ValueQuoting::Verbatim)
        .unwrap();

    assert!(statement.groupable);
    assert_eq!(
        statement.inner,
        "(SELECT value.string_value FROM UNNEST(event_params) WHERE key = 'campaign') AS campaign"
    );
    assert_eq!(statement.outer, "campaign");
}

#[test]
fn test_any_dimension_name_resolves_verbatim() {
    let statement = Catalog::global()
        .resolve_dimension(&Dimension::new("not a column"), ValueQuoting::Verbatim)
        .unwrap();
    assert_eq!(statement.inner, "not a column AS not a column");
}

#[test]
fn test_escaped_rejects_bad_dimension_name() {
    let err = Catalog::global()
        .resolve_dimension(&Dimension::new("geo.city; --"), ValueQuoting::Escaped)
        .unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidIdentifier(_)));
}

#[test]
fn test_escaped_rejects_custom_key_with_invalid_alias() {
    let err = Catalog::global()
        .resolve_dimension(&Dimension::custom("it's"), ValueQuoting::Escaped)
        .unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidIdentifier(_)));
}
