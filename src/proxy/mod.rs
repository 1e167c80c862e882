//! Per-exchange forwarding pipeline.
//!
//! [`forward_handler`] is the Axum fallback that receives every
//! non-`/health` request. It runs the request phase of the filter chain
//! (correlation stamping), resolves the path against the route table,
//! resolves the logical backend to an endpoint, dispatches upstream, and
//! runs the response phase — on every code path, so the correlation id
//! reaches the caller even for 404s, upstream failures, and timeouts.
//! Submodules handle header construction ([`headers`]) and the upstream
//! call ([`upstream`]).

pub mod headers;
pub mod upstream;

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::config::model::RouteRule;
use crate::filter::CorrelationContext;
use crate::server::AppState;

pub async fn forward_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path();

    // Request phase runs before routing: the correlation id must be on the
    // outbound request whatever happens next.
    let mut req_headers = req_headers;
    let ctx = state.filter_chain.run_request_phase(&mut req_headers);

    let route_match = match state.route_table.resolve(path) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(
                correlation_id = %ctx.id,
                method = %method,
                path = %path,
                error = %e,
                "no route matched"
            );
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            return placeholder_response(&state, StatusCode::NOT_FOUND, &ctx, None);
        }
    };

    tracing::info!(
        correlation_id = %ctx.id,
        method = %method,
        path = %path,
        backend = %route_match.backend,
        forward_path = %route_match.forward_path,
        "request routed"
    );

    let endpoint = match state.resolver.resolve(route_match.backend) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(
                correlation_id = %ctx.id,
                backend = %route_match.backend,
                error = %e,
                "backend resolution failed"
            );
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            return placeholder_response(
                &state,
                StatusCode::BAD_GATEWAY,
                &ctx,
                Some(route_match.rule),
            );
        }
    };

    let mut target = endpoint;
    target.set_path(&route_match.forward_path);
    target.set_query(uri.query());

    let client_ip = addr.ip().to_string();
    let forwarded_headers =
        headers::build_forwarded_headers(&req_headers, &client_ip, &target, &state.defaults);

    let timeout_ms = route_match.rule.timeout.unwrap_or(state.defaults.timeout);
    let outcome = upstream::dispatch(upstream::UpstreamRequest {
        client: &state.http_client,
        method: &method,
        url: &target,
        headers: forwarded_headers,
        body,
        timeout: Duration::from_millis(timeout_ms),
        correlation_id: &ctx.id,
    })
    .await;

    match outcome {
        upstream::UpstreamOutcome::Success {
            status,
            mut headers,
            body,
        } => {
            state.stats.forwarded.fetch_add(1, Ordering::Relaxed);
            headers::strip_response_hop_by_hop(&mut headers);
            state
                .filter_chain
                .run_response_phase(&mut headers, &ctx, Some(route_match.rule));
            build_response(status, &headers, axum::body::Body::from(body), &ctx)
        }
        upstream::UpstreamOutcome::Failed { .. } => {
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            placeholder_response(&state, StatusCode::BAD_GATEWAY, &ctx, Some(route_match.rule))
        }
        upstream::UpstreamOutcome::TimedOut => {
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            placeholder_response(
                &state,
                StatusCode::GATEWAY_TIMEOUT,
                &ctx,
                Some(route_match.rule),
            )
        }
    }
}

/// An empty-body response for exchanges that never got an upstream
/// answer. The response phase still runs so the correlation id (and, when
/// a route matched, its response headers) are attached.
fn placeholder_response(
    state: &AppState,
    status: StatusCode,
    ctx: &CorrelationContext,
    rule: Option<&RouteRule>,
) -> Response {
    let mut headers = HeaderMap::new();
    state.filter_chain.run_response_phase(&mut headers, ctx, rule);
    build_response(status, &headers, axum::body::Body::empty(), ctx)
}

fn build_response(
    status: StatusCode,
    headers: &HeaderMap,
    body: axum::body::Body,
    ctx: &CorrelationContext,
) -> Response {
    let mut builder = Response::builder().status(status);
    for (key, value) in headers {
        builder = builder.header(key, value);
    }
    builder.body(body).unwrap_or_else(|e| {
        tracing::error!(
            correlation_id = %ctx.id,
            error = %e,
            "failed to build response"
        );
        StatusCode::BAD_GATEWAY.into_response()
    })
}
