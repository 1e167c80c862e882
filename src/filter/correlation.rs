//! Correlation identifier lifecycle for one exchange.
//!
//! Every request/response pair carries exactly one `correlation-id`. The
//! request phase adopts the inbound header when present or generates a
//! UUID v4 and writes it onto the outbound request; the response phase
//! guarantees the same id appears on the response returned to the caller.
//! Both phases emit a tracing event with `(phase, origin, correlation_id)`;
//! the log sink is fire-and-forget and can never affect the exchange.

use http::{HeaderMap, HeaderValue};

pub const CORRELATION_HEADER: &str = "correlation-id";

/// Where the exchange's correlation id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    FoundInRequest,
    Generated,
}

impl Origin {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FoundInRequest => "found",
            Self::Generated => "generated",
        }
    }
}

/// Exchange-scoped correlation state, created in the request phase and
/// consumed by the response phase. Immutable once established; never
/// shared across exchanges.
#[derive(Debug, Clone)]
pub struct CorrelationContext {
    pub id: String,
    pub origin: Origin,
}

/// Establish the correlation id for an exchange.
///
/// Adopts the first inbound header value when present and readable; the
/// header is already on the outbound request, so it is not written again.
/// A missing, empty, or non-UTF-8 header degrades to the generated path
/// and the new id is inserted into the request headers before forwarding.
/// This operation never fails.
pub fn ensure_request_id(headers: &mut HeaderMap) -> CorrelationContext {
    // HeaderMap::get returns the first value of a multi-valued header
    let inbound = headers
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from);

    let ctx = match inbound {
        Some(id) => CorrelationContext {
            id,
            origin: Origin::FoundInRequest,
        },
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            if let Ok(value) = HeaderValue::from_str(&id) {
                headers.insert(CORRELATION_HEADER, value);
            }
            CorrelationContext {
                id,
                origin: Origin::Generated,
            }
        }
    };

    tracing::info!(
        phase = "request",
        origin = ctx.origin.as_str(),
        correlation_id = %ctx.id,
        "correlation id established"
    );
    ctx
}

/// Write the exchange's correlation id onto the response headers.
///
/// Uses insert, not append: calling this twice with the same context
/// leaves a single header with the same value, so propagation is
/// idempotent for both origins.
pub fn propagate_response_id(headers: &mut HeaderMap, ctx: &CorrelationContext) {
    if let Ok(value) = HeaderValue::from_str(&ctx.id) {
        headers.insert(CORRELATION_HEADER, value);
    }

    tracing::info!(
        phase = "response",
        origin = ctx.origin.as_str(),
        correlation_id = %ctx.id,
        "correlation id propagated"
    );
}
