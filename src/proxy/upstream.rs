//! Single upstream dispatch with timeout and latency logging.
//!
//! Sends one request to the resolved backend endpoint and collects the
//! full response body. Failures never propagate as errors to the caller:
//! every outcome is reported as an [`UpstreamOutcome`] so the handler can
//! run the response-phase filter chain on a placeholder response.

use std::time::{Duration, Instant};

use axum::http::{HeaderMap, Method};
use bytes::Bytes;
use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::StatusCode;

use crate::server::HttpClient;

#[derive(Debug)]
pub enum UpstreamOutcome {
    Success {
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
    },
    Failed {
        error: String,
    },
    TimedOut,
}

pub struct UpstreamRequest<'a> {
    pub client: &'a HttpClient,
    pub method: &'a Method,
    pub url: &'a url::Url,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub timeout: Duration,
    pub correlation_id: &'a str,
}

#[allow(clippy::cast_possible_truncation)]
pub async fn dispatch(req: UpstreamRequest<'_>) -> UpstreamOutcome {
    let start = Instant::now();
    let target = req.url.as_str().to_string();

    let mut builder = hyper::Request::builder()
        .method(req.method.clone())
        .uri(target.clone());

    for (key, value) in &req.headers {
        builder = builder.header(key, value);
    }

    let outbound = match builder.body(Full::new(req.body)) {
        Ok(r) => r,
        Err(e) => {
            return UpstreamOutcome::Failed {
                error: e.to_string(),
            }
        }
    };

    let result = tokio::time::timeout(req.timeout, req.client.request(outbound)).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(response)) => {
            let status = response.status();
            let headers = response.headers().clone();

            match response.into_body().collect().await {
                Ok(collected) => {
                    tracing::info!(
                        correlation_id = %req.correlation_id,
                        target = %target,
                        status = status.as_u16(),
                        latency_ms,
                        "upstream responded"
                    );
                    UpstreamOutcome::Success {
                        status,
                        headers,
                        body: collected.to_bytes(),
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        correlation_id = %req.correlation_id,
                        target = %target,
                        status = status.as_u16(),
                        latency_ms,
                        error = %e,
                        "upstream body read failed"
                    );
                    UpstreamOutcome::Failed {
                        error: format!("body read error: {e}"),
                    }
                }
            }
        }
        Ok(Err(e)) => {
            tracing::warn!(
                correlation_id = %req.correlation_id,
                target = %target,
                latency_ms,
                error = %e,
                "upstream request failed"
            );
            UpstreamOutcome::Failed {
                error: e.to_string(),
            }
        }
        Err(_) => {
            tracing::warn!(
                correlation_id = %req.correlation_id,
                target = %target,
                latency_ms,
                timeout_ms = req.timeout.as_millis() as u64,
                "upstream request timed out"
            );
            UpstreamOutcome::TimedOut
        }
    }
}
