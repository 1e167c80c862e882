//! The fixed-order filter chain around every proxied exchange.
//!
//! A [`FilterChain`] is two statically ordered stage lists fixed at
//! process start: request-phase stages run before the route lookup and
//! upstream call, response-phase stages run after it — on every code
//! path, including route misses, upstream errors, and timeouts. Stages
//! are a closed enum: the chain is deliberately not a plugin system.
//!
//! For one exchange the request phase always completes before the
//! response phase starts; the response phase consumes the
//! [`CorrelationContext`] established earlier and never re-derives it.

pub mod correlation;

pub use correlation::{CorrelationContext, Origin, CORRELATION_HEADER};

use http::{HeaderMap, HeaderName, HeaderValue};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::config::model::RouteRule;

pub const RESPONSE_TIME_HEADER: &str = "x-responsetime";

/// Stages applied to the request headers before forwarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    /// Establish the exchange's correlation id.
    CorrelationStamp,
}

/// Stages applied to the response headers before returning to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStage {
    /// Literal header add/strip rules from the matched route.
    RouteHeaders,
    /// `X-ResponseTime` request-completion timestamp for matched routes.
    ResponseTime,
    /// Guarantee the correlation id on the response.
    CorrelationPropagate,
}

pub struct FilterChain {
    request_stages: Vec<RequestStage>,
    response_stages: Vec<ResponseStage>,
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl FilterChain {
    /// The standard gateway chain: correlation stamping on the way in;
    /// route header injection, response-time stamp, then correlation
    /// propagation on the way out.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            request_stages: vec![RequestStage::CorrelationStamp],
            response_stages: vec![
                ResponseStage::RouteHeaders,
                ResponseStage::ResponseTime,
                ResponseStage::CorrelationPropagate,
            ],
        }
    }

    /// Run the request phase over the outbound request headers.
    ///
    /// Returns the exchange's correlation context. Never fails: malformed
    /// correlation headers degrade to the generated path.
    pub fn run_request_phase(&self, headers: &mut HeaderMap) -> CorrelationContext {
        let mut ctx = None;
        for stage in &self.request_stages {
            match stage {
                RequestStage::CorrelationStamp => {
                    ctx = Some(correlation::ensure_request_id(headers));
                }
            }
        }
        // ensure_request_id is idempotent, so this also covers a chain
        // built without the stamp stage
        ctx.unwrap_or_else(|| correlation::ensure_request_id(headers))
    }

    /// Run the response phase over the response headers.
    ///
    /// `route` is the matched rule, or `None` when the exchange never
    /// reached a route (e.g. a 404); route-scoped stages are skipped then,
    /// correlation propagation always runs.
    pub fn run_response_phase(
        &self,
        headers: &mut HeaderMap,
        ctx: &CorrelationContext,
        route: Option<&RouteRule>,
    ) {
        for stage in &self.response_stages {
            match stage {
                ResponseStage::RouteHeaders => {
                    if let Some(rule) = route {
                        apply_header_rules(headers, rule);
                    }
                }
                ResponseStage::ResponseTime => {
                    if route.is_some() {
                        stamp_response_time(headers);
                    }
                }
                ResponseStage::CorrelationPropagate => {
                    correlation::propagate_response_id(headers, ctx);
                }
            }
        }
    }
}

fn apply_header_rules(headers: &mut HeaderMap, rule: &RouteRule) {
    for (key, value) in &rule.response_headers.add {
        match (key.parse::<HeaderName>(), HeaderValue::from_str(value)) {
            (Ok(name), Ok(val)) => {
                headers.insert(name, val);
            }
            _ => {
                tracing::warn!(header = %key, "invalid header name or value in response_headers.add, skipping");
            }
        }
    }

    for key in &rule.response_headers.strip {
        if let Ok(name) = key.parse::<HeaderName>() {
            headers.remove(&name);
        }
    }
}

fn stamp_response_time(headers: &mut HeaderMap) {
    let Ok(now) = OffsetDateTime::now_utc().format(&Rfc3339) else {
        return;
    };
    if let Ok(value) = HeaderValue::from_str(&now) {
        headers.insert(RESPONSE_TIME_HEADER, value);
    }
}
