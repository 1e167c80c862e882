//! The ordered route table: first-match-wins path resolution.
//!
//! [`RouteTable::from_config`] compiles every rule's path predicate and
//! rewrite regex once; the resulting table is immutable and shared
//! read-only across all concurrent exchanges (no locking). Resolution is
//! a pure function of the request path and the table.

use regex::Regex;

use crate::config::model::RouteRule;
use crate::error::WaypointError;
use crate::routing::rewrite;

/// Path predicate kinds supported by route rules.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathPattern {
    Exact(String),
    /// Trailing `/**` (or `/*`): matches the prefix itself and anything below it.
    Prefix(String),
}

impl PathPattern {
    fn parse(pattern: &str) -> Self {
        for glob in ["/**", "/*"] {
            if let Some(prefix) = pattern.strip_suffix(glob) {
                return Self::Prefix(prefix.to_string());
            }
        }
        Self::Exact(pattern.to_string())
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => exact == path,
            Self::Prefix(prefix) => {
                if prefix.is_empty() {
                    return true;
                }
                // Trailing slash is ignored for prefix matching
                let path = path.trim_end_matches('/');
                path == prefix || path.starts_with(&format!("{prefix}/"))
            }
        }
    }
}

#[derive(Debug)]
struct CompiledRule {
    rule: RouteRule,
    pattern: PathPattern,
    rewrite: Option<(Regex, String)>,
}

/// The result of resolving an inbound path: the logical backend name, the
/// path to forward upstream, and the matched rule (for response-header
/// injection in the filter chain).
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub backend: &'a str,
    pub forward_path: String,
    pub rule: &'a RouteRule,
}

#[derive(Debug)]
pub struct RouteTable {
    rules: Vec<CompiledRule>,
}

impl RouteTable {
    /// Compile the configured rules, preserving their order.
    pub fn from_config(routes: &[RouteRule]) -> Result<Self, WaypointError> {
        let mut rules = Vec::with_capacity(routes.len());
        for route in routes {
            let compiled_rewrite = match route.rewrite {
                Some(ref rw) => {
                    let re = Regex::new(&rw.pattern).map_err(|e| {
                        WaypointError::InvalidRoutePattern {
                            pattern: rw.pattern.clone(),
                            reason: e.to_string(),
                        }
                    })?;
                    Some((re, rw.template.clone()))
                }
                None => None,
            };
            rules.push(CompiledRule {
                rule: route.clone(),
                pattern: PathPattern::parse(&route.path),
                rewrite: compiled_rewrite,
            });
        }
        Ok(Self { rules })
    }

    /// Resolve an inbound path to a backend and forward path.
    ///
    /// Rules are tried in table order; the first matching predicate
    /// terminates the search. Without a rewrite rule, or when the rewrite
    /// pattern does not match, the forward path is the matched path
    /// verbatim.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch<'_>, WaypointError> {
        for compiled in &self.rules {
            if !compiled.pattern.matches(path) {
                continue;
            }
            let forward_path = match compiled.rewrite {
                Some((ref re, ref template)) => rewrite::rewrite(path, re, template),
                None => path.to_string(),
            };
            return Ok(RouteMatch {
                backend: &compiled.rule.backend,
                forward_path,
                rule: &compiled.rule,
            });
        }

        Err(WaypointError::RouteNotFound {
            path: path.to_string(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{HeaderRules, RewriteRule};

    fn rule(path: &str, backend: &str, rewrite: Option<(&str, &str)>) -> RouteRule {
        RouteRule {
            path: path.into(),
            backend: backend.into(),
            rewrite: rewrite.map(|(pattern, template)| RewriteRule {
                pattern: pattern.into(),
                template: template.into(),
            }),
            timeout: None,
            response_headers: HeaderRules::default(),
        }
    }

    #[test]
    fn prefix_match_with_rewrite() {
        let table = RouteTable::from_config(&[rule(
            "/shop/orders/**",
            "ORDERS",
            Some(("/shop/orders/(?<rest>.*)", "/${rest}")),
        )])
        .unwrap();

        let m = table.resolve("/shop/orders/42/items").unwrap();
        assert_eq!(m.backend, "ORDERS");
        assert_eq!(m.forward_path, "/42/items");
    }

    #[test]
    fn no_rewrite_forwards_path_verbatim() {
        let table = RouteTable::from_config(&[rule("/status", "STATUS", None)]).unwrap();
        let m = table.resolve("/status").unwrap();
        assert_eq!(m.forward_path, "/status");
    }

    #[test]
    fn first_match_wins_over_later_rules() {
        let table = RouteTable::from_config(&[
            rule("/shop/**", "GENERAL", None),
            rule("/shop/orders/**", "ORDERS", None),
        ])
        .unwrap();

        // Insertion order decides, not specificity
        let m = table.resolve("/shop/orders/42").unwrap();
        assert_eq!(m.backend, "GENERAL");
    }

    #[test]
    fn exact_pattern_rejects_subpaths() {
        let table = RouteTable::from_config(&[rule("/status", "STATUS", None)]).unwrap();
        assert!(table.resolve("/status/deep").is_err());
    }

    #[test]
    fn prefix_matches_bare_prefix_and_trailing_slash() {
        let table = RouteTable::from_config(&[rule("/shop/orders/**", "ORDERS", None)]).unwrap();
        assert!(table.resolve("/shop/orders").is_ok());
        assert!(table.resolve("/shop/orders/").is_ok());
        assert!(table.resolve("/shop/ordersx").is_err());
    }

    #[test]
    fn unmatched_path_is_route_not_found() {
        let table = RouteTable::from_config(&[rule("/shop/orders/**", "ORDERS", None)]).unwrap();
        let err = table.resolve("/unknown/thing").unwrap_err();
        assert!(matches!(err, WaypointError::RouteNotFound { .. }));
    }

    #[test]
    fn mismatched_rewrite_pattern_forwards_verbatim() {
        let table = RouteTable::from_config(&[rule(
            "/shop/orders/**",
            "ORDERS",
            Some(("/cards/(?<rest>.*)", "/${rest}")),
        )])
        .unwrap();
        let m = table.resolve("/shop/orders/42").unwrap();
        assert_eq!(m.forward_path, "/shop/orders/42");
    }

    #[test]
    fn bare_prefix_under_rewrite_rule_forwards_verbatim() {
        // The predicate matches the bare prefix but the rewrite pattern
        // requires the trailing slash; the path goes upstream unchanged.
        let table = RouteTable::from_config(&[rule(
            "/shop/orders/**",
            "ORDERS",
            Some(("/shop/orders/(?<rest>.*)", "/${rest}")),
        )])
        .unwrap();
        let m = table.resolve("/shop/orders").unwrap();
        assert_eq!(m.backend, "ORDERS");
        assert_eq!(m.forward_path, "/shop/orders");
    }

    #[test]
    fn invalid_rewrite_pattern_rejected_at_build() {
        let err = RouteTable::from_config(&[rule(
            "/shop/**",
            "SHOP",
            Some(("/shop/(", "/${rest}")),
        )])
        .unwrap_err();
        assert!(matches!(err, WaypointError::InvalidRoutePattern { .. }));
    }

    #[test]
    fn single_star_glob_is_prefix_alias() {
        let table = RouteTable::from_config(&[rule("/qa/*", "QA", None)]).unwrap();
        assert!(table.resolve("/qa/anything/deep").is_ok());
    }
}
