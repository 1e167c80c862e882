//! Integration tests for the filter chain's correlation lifecycle.

use http::HeaderMap;

use waypoint::config::model::{HeaderRules, RouteRule};
use waypoint::filter::{
    CorrelationContext, FilterChain, Origin, CORRELATION_HEADER, RESPONSE_TIME_HEADER,
};

fn matched_rule() -> RouteRule {
    RouteRule {
        path: "/isoft-bank/accounts/**".into(),
        backend: "ACCOUNTS".into(),
        rewrite: None,
        timeout: None,
        response_headers: HeaderRules::default(),
    }
}

#[test]
fn generated_id_appears_on_request_and_response() {
    let chain = FilterChain::standard();

    let mut req_headers = HeaderMap::new();
    let ctx = chain.run_request_phase(&mut req_headers);
    assert_eq!(ctx.origin, Origin::Generated);

    let rule = matched_rule();
    let mut resp_headers = HeaderMap::new();
    chain.run_response_phase(&mut resp_headers, &ctx, Some(&rule));

    // Same identifier on the outbound request and the final response
    assert_eq!(
        req_headers.get(CORRELATION_HEADER),
        resp_headers.get(CORRELATION_HEADER)
    );
    assert!(resp_headers.contains_key(RESPONSE_TIME_HEADER));
}

#[test]
fn found_id_echoed_without_duplication() {
    let chain = FilterChain::standard();

    let mut req_headers = HeaderMap::new();
    req_headers.insert(CORRELATION_HEADER, "abc-123".parse().unwrap());

    let ctx = chain.run_request_phase(&mut req_headers);
    assert_eq!(ctx.origin, Origin::FoundInRequest);
    assert_eq!(ctx.id, "abc-123");
    assert_eq!(req_headers.get_all(CORRELATION_HEADER).iter().count(), 1);

    let rule = matched_rule();
    let mut resp_headers = HeaderMap::new();
    chain.run_response_phase(&mut resp_headers, &ctx, Some(&rule));
    assert_eq!(resp_headers.get(CORRELATION_HEADER).unwrap(), "abc-123");
}

#[test]
fn repeated_response_phase_keeps_single_value() {
    let chain = FilterChain::standard();
    let ctx = CorrelationContext {
        id: "abc-123".into(),
        origin: Origin::FoundInRequest,
    };
    let rule = matched_rule();

    let mut resp_headers = HeaderMap::new();
    chain.run_response_phase(&mut resp_headers, &ctx, Some(&rule));
    chain.run_response_phase(&mut resp_headers, &ctx, Some(&rule));

    let values: Vec<_> = resp_headers.get_all(CORRELATION_HEADER).iter().collect();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0], "abc-123");
}

#[test]
fn response_phase_without_matched_route_still_carries_id() {
    let chain = FilterChain::standard();

    let mut req_headers = HeaderMap::new();
    let ctx = chain.run_request_phase(&mut req_headers);

    let mut resp_headers = HeaderMap::new();
    chain.run_response_phase(&mut resp_headers, &ctx, None);

    assert_eq!(
        resp_headers.get(CORRELATION_HEADER).unwrap(),
        ctx.id.as_str()
    );
    // Route-scoped stages are skipped on a miss
    assert!(!resp_headers.contains_key(RESPONSE_TIME_HEADER));
}

#[test]
fn distinct_exchanges_get_distinct_generated_ids() {
    let chain = FilterChain::standard();

    let mut first = HeaderMap::new();
    let mut second = HeaderMap::new();
    let ctx_a = chain.run_request_phase(&mut first);
    let ctx_b = chain.run_request_phase(&mut second);

    assert_ne!(ctx_a.id, ctx_b.id);
}
