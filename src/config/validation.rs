//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for structural
//! errors such as empty route tables, invalid path predicates, duplicate
//! entries, undeclared backends, malformed endpoint URLs, and rewrite
//! patterns that do not compile. Returns a list of [`ValidationError`]
//! values with per-field suggestions.

use url::Url;

use super::model::{Config, RewriteRule};
use crate::error::ValidationError;

/// Validate a single route path predicate. Returns `Ok(())` or a
/// human-readable error.
pub fn validate_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("path cannot be empty".into());
    }
    if !path.starts_with('/') {
        return Err(format!("path must start with '/' (did you mean '/{path}'?)"));
    }
    // Wildcards are only meaningful as a trailing segment
    if let Some(idx) = path.find('*') {
        let tail = &path[idx..];
        if tail != "*" && tail != "**" {
            return Err("wildcard is only allowed as a trailing '/*' or '/**' segment".into());
        }
        if !path[..idx].ends_with('/') {
            return Err("wildcard must follow a '/' separator".into());
        }
    }
    Ok(())
}

/// Validate a backend endpoint URL. Returns `Ok(())` or a human-readable error.
pub fn validate_endpoint_url(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{url}' is not a valid URL")),
    }
}

/// Validate a rewrite rule. The pattern must compile and carry at least
/// one named capture group the template can reference.
pub fn validate_rewrite(rewrite: &RewriteRule) -> Result<(), String> {
    let re = regex::Regex::new(&rewrite.pattern)
        .map_err(|e| format!("rewrite pattern does not compile: {e}"))?;

    if re.capture_names().flatten().next().is_none() {
        return Err(format!(
            "rewrite pattern '{}' has no named capture group (use e.g. '(?<rest>.*)')",
            rewrite.pattern
        ));
    }

    if rewrite.template.is_empty() {
        return Err("rewrite template cannot be empty".into());
    }
    Ok(())
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.routes.is_empty() {
        errors.push(ValidationError {
            route: "(root)".into(),
            field: "routes".into(),
            message: "at least one route must be defined".into(),
            suggestion: None,
        });
        return Err(errors);
    }

    for (name, endpoint) in &config.backends {
        if let Err(msg) = validate_endpoint_url(endpoint) {
            errors.push(ValidationError {
                route: "(root)".into(),
                field: format!("backends.{name}"),
                message: msg,
                suggestion: None,
            });
        }
    }

    let mut seen_paths = std::collections::HashSet::new();

    for (i, route) in config.routes.iter().enumerate() {
        let route_id = if route.path.is_empty() {
            format!("routes[{i}]")
        } else {
            route.path.clone()
        };

        if let Err(msg) = validate_path(&route.path) {
            errors.push(ValidationError {
                route: route_id.clone(),
                field: "path".into(),
                message: msg,
                suggestion: if !route.path.is_empty() && !route.path.starts_with('/') {
                    Some(format!("did you mean '/{}'?", route.path))
                } else {
                    None
                },
            });
        }

        // Ordered table, first match wins: a duplicate predicate can never fire
        if !seen_paths.insert(&route.path) {
            errors.push(ValidationError {
                route: route_id.clone(),
                field: "path".into(),
                message: "duplicate route path (shadowed by an earlier rule)".into(),
                suggestion: None,
            });
        }

        if route.backend.is_empty() {
            errors.push(ValidationError {
                route: route_id.clone(),
                field: "backend".into(),
                message: "backend name cannot be empty".into(),
                suggestion: None,
            });
        } else if !config.backends.contains_key(&route.backend) {
            errors.push(ValidationError {
                route: route_id.clone(),
                field: "backend".into(),
                message: format!("backend '{}' is not declared", route.backend),
                suggestion: Some("add it to the 'backends' map".into()),
            });
        }

        if let Some(ref rewrite) = route.rewrite {
            if let Err(msg) = validate_rewrite(rewrite) {
                errors.push(ValidationError {
                    route: route_id.clone(),
                    field: "rewrite".into(),
                    message: msg,
                    suggestion: None,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let mut lines = vec![format!(
        "  {} routes, {} backends\n",
        config.routes.len(),
        config.backend_count()
    )];

    for route in &config.routes {
        let forward = route
            .rewrite
            .as_ref()
            .map_or_else(|| "(unchanged)".to_string(), |r| r.template.clone());
        let timeout = route.timeout.map_or_else(
            || format!("{}ms (default)", config.defaults.timeout),
            |t| format!("{t}ms"),
        );

        lines.push(format!(
            "  {}  -> {} (forward path: {})",
            route.path, route.backend, forward,
        ));
        lines.push(format!("    timeout: {timeout}"));
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{Config, Defaults, HeaderRules, RouteRule};
    use std::collections::HashMap;

    fn minimal_config() -> Config {
        let mut backends = HashMap::new();
        backends.insert("ORDERS".to_string(), "http://localhost:8080".to_string());
        Config {
            defaults: Defaults::default(),
            backends,
            routes: vec![RouteRule {
                path: "/shop/orders/**".into(),
                backend: "ORDERS".into(),
                rewrite: Some(RewriteRule {
                    pattern: "/shop/orders/(?<rest>.*)".into(),
                    template: "/${rest}".into(),
                }),
                timeout: None,
                response_headers: HeaderRules::default(),
            }],
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate(&minimal_config()).is_ok());
    }

    #[test]
    fn empty_routes_fails() {
        let config = Config {
            routes: vec![],
            ..minimal_config()
        };
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("at least one route"));
    }

    #[test]
    fn undeclared_backend_fails() {
        let mut config = minimal_config();
        config.routes[0].backend = "CARDS".into();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("not declared")));
    }

    #[test]
    fn invalid_endpoint_url_fails() {
        let mut config = minimal_config();
        config
            .backends
            .insert("ORDERS".into(), "not a url".into());
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("not a valid URL")));
    }

    #[test]
    fn non_http_scheme_fails() {
        let mut config = minimal_config();
        config
            .backends
            .insert("ORDERS".into(), "ftp://files:21".into());
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("unsupported scheme")));
    }

    #[test]
    fn path_without_slash_fails() {
        let mut config = minimal_config();
        config.routes[0].path = "shop".into();
        let errors = validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.suggestion.as_deref() == Some("did you mean '/shop'?")));
    }

    #[test]
    fn interior_wildcard_fails() {
        assert!(validate_path("/shop/*/orders").is_err());
    }

    #[test]
    fn trailing_wildcards_pass() {
        assert!(validate_path("/shop/orders/**").is_ok());
        assert!(validate_path("/shop/orders/*").is_ok());
        assert!(validate_path("/status").is_ok());
    }

    #[test]
    fn duplicate_route_path_fails() {
        let mut config = minimal_config();
        let dup = config.routes[0].clone();
        config.routes.push(dup);
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("duplicate")));
    }

    #[test]
    fn rewrite_without_named_group_fails() {
        let mut config = minimal_config();
        config.routes[0].rewrite = Some(RewriteRule {
            pattern: "/shop/orders/(.*)".into(),
            template: "/$1".into(),
        });
        let errors = validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.message.contains("no named capture group")));
    }

    #[test]
    fn rewrite_bad_pattern_fails() {
        let mut config = minimal_config();
        config.routes[0].rewrite = Some(RewriteRule {
            pattern: "/shop/(".into(),
            template: "/${rest}".into(),
        });
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("does not compile")));
    }
}
