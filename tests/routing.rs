//! Integration tests for route table resolution.

use waypoint::config::model::{Config, HeaderRules, RewriteRule, RouteRule};
use waypoint::error::WaypointError;
use waypoint::routing::RouteTable;

fn gateway_rule(product: &str, resource: &str, backend: &str) -> RouteRule {
    RouteRule {
        path: format!("/{product}/{resource}/**"),
        backend: backend.into(),
        rewrite: Some(RewriteRule {
            pattern: format!("/{product}/{resource}/(?<rest>.*)"),
            template: "/${rest}".into(),
        }),
        timeout: None,
        response_headers: HeaderRules::default(),
    }
}

fn bank_table() -> RouteTable {
    RouteTable::from_config(&[
        gateway_rule("isoft-bank", "accounts", "ACCOUNTS"),
        gateway_rule("isoft-bank", "cards", "CARDS"),
        gateway_rule("isoft-bank", "loans", "LOANS"),
    ])
    .unwrap()
}

#[test]
fn accounts_route_strips_prefix() {
    let table = bank_table();
    let m = table.resolve("/isoft-bank/accounts/42/balance").unwrap();
    assert_eq!(m.backend, "ACCOUNTS");
    assert_eq!(m.forward_path, "/42/balance");
}

#[test]
fn each_product_resource_maps_to_its_backend() {
    let table = bank_table();
    assert_eq!(table.resolve("/isoft-bank/cards/7").unwrap().backend, "CARDS");
    assert_eq!(table.resolve("/isoft-bank/loans/9").unwrap().backend, "LOANS");
}

#[test]
fn bare_prefix_request_forwards_verbatim() {
    // Matches the /** predicate but not the rewrite pattern, which
    // requires the trailing slash; still a valid request
    let table = bank_table();
    let m = table.resolve("/isoft-bank/accounts").unwrap();
    assert_eq!(m.backend, "ACCOUNTS");
    assert_eq!(m.forward_path, "/isoft-bank/accounts");
}

#[test]
fn unknown_path_is_route_not_found() {
    let table = bank_table();
    let err = table.resolve("/unknown/thing").unwrap_err();
    assert!(matches!(err, WaypointError::RouteNotFound { .. }));
}

#[test]
fn table_order_decides_between_overlapping_rules() {
    let broad = RouteRule {
        path: "/isoft-bank/**".into(),
        backend: "PORTAL".into(),
        rewrite: None,
        timeout: None,
        response_headers: HeaderRules::default(),
    };
    let table = RouteTable::from_config(&[
        broad,
        gateway_rule("isoft-bank", "accounts", "ACCOUNTS"),
    ])
    .unwrap();

    // First match wins even though the later rule is more specific
    let m = table.resolve("/isoft-bank/accounts/42").unwrap();
    assert_eq!(m.backend, "PORTAL");
    assert_eq!(m.forward_path, "/isoft-bank/accounts/42");
}

#[cfg(feature = "yaml")]
#[test]
fn yaml_config_builds_a_working_table() {
    let yaml = r#"
backends:
  ACCOUNTS: http://localhost:8081
routes:
  - path: /isoft-bank/accounts/**
    backend: ACCOUNTS
    rewrite:
      pattern: /isoft-bank/accounts/(?<rest>.*)
      template: /${rest}
"#;
    let config: Config = serde_yml::from_str(yaml).unwrap();
    let table = RouteTable::from_config(&config.routes).unwrap();

    let m = table.resolve("/isoft-bank/accounts/42/balance").unwrap();
    assert_eq!(m.backend, "ACCOUNTS");
    assert_eq!(m.forward_path, "/42/balance");
}
