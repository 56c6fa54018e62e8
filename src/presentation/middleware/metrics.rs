//! HTTP metrics middleware

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::infrastructure::metrics;

/// Record count and latency of every routed request.
///
/// Must be installed with `route_layer` so that [`MatchedPath`] is set;
/// the route template keeps label cardinality bounded.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(req).await;

    metrics::record_http_request(
        method.as_str(),
        &path,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );

    response
}
