//! Serde data structures for the Waypoint configuration file.
//!
//! Contains [`Config`] (the root), [`RouteRule`], [`RewriteRule`],
//! [`Defaults`], and [`HeaderRules`]. All types derive `Serialize` and
//! `Deserialize` with `deny_unknown_fields` for strict parsing.
//!
//! Routes are an ordered list: the gateway evaluates them in the order
//! they appear in the file, first match wins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const fn default_timeout() -> u64 {
    5000
}

const fn default_true() -> bool {
    true
}

fn is_default_timeout(v: &u64) -> bool {
    *v == default_timeout()
}

fn is_true(v: &bool) -> bool {
    *v
}

fn is_default_defaults(v: &Defaults) -> bool {
    v.timeout == default_timeout()
        && v.forward_headers
        && v.proxy_headers
        && v.strip_hop_by_hop
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "is_default_defaults")]
    pub defaults: Defaults,

    /// Logical backend name -> endpoint base URL.
    ///
    /// Routes reference backends by name only; this map is what the
    /// bundled static resolver feeds on. A deployment with external
    /// service discovery can leave endpoints pointing at its edge.
    pub backends: HashMap<String, String>,

    pub routes: Vec<RouteRule>,
}

impl Config {
    #[must_use]
    pub fn backend_count(&self) -> usize {
        self.backends.len()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: Defaults::default(),
            backends: HashMap::new(),
            routes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    #[serde(
        default = "default_timeout",
        skip_serializing_if = "is_default_timeout"
    )]
    pub timeout: u64,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub forward_headers: bool,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub proxy_headers: bool,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub strip_hop_by_hop: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            forward_headers: default_true(),
            proxy_headers: default_true(),
            strip_hop_by_hop: default_true(),
        }
    }
}

/// One routing rule: path predicate, optional rewrite, logical backend.
///
/// Immutable once the gateway is running; the table is loaded once at
/// startup and lives for the whole process.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouteRule {
    /// Path predicate: exact (`/status`) or deep prefix (`/prefix/**`).
    pub path: String,

    /// Logical backend name, resolved by a [`BackendResolver`](crate::resolve::BackendResolver).
    pub backend: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<RewriteRule>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Literal headers added to / stripped from the response when this
    /// rule matched. `X-ResponseTime` is stamped by the filter chain and
    /// does not need to be listed here.
    #[serde(default, skip_serializing_if = "HeaderRules::is_default")]
    pub response_headers: HeaderRules,
}

/// Regex-and-template pair transforming the matched path into the path
/// forwarded upstream, e.g. pattern `/shop/orders/(?<rest>.*)` with
/// template `/${rest}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RewriteRule {
    pub pattern: String,
    pub template: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderRules {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub add: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strip: Vec<String>,
}

impl HeaderRules {
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.add.is_empty() && self.strip.is_empty()
    }
}
