use axum::{body::Body, extract::Request, Router};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};

/// HTTP header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id as a log field value
pub fn request_id_str(id: &RequestId) -> &str {
    id.header_value().to_str().unwrap_or("<non-ascii>")
}

/// Adds request ids and HTTP tracing to `router`.
///
/// A caller-supplied `x-request-id` is kept, otherwise a UUID v4 is
/// assigned. The id is stored as a [`RequestId`] extension, recorded on the
/// request span and echoed on the response.
pub fn with_request_tracing<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}

fn request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(request_id_str)
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Extension};
    use tower::ServiceExt;

    fn echo_router() -> Router {
        with_request_tracing(Router::new().route(
            "/",
            get(|Extension(id): Extension<RequestId>| async move { request_id_str(&id).to_string() }),
        ))
    }

    async fn call(request: Request<Body>) -> (String, String) {
        let response = echo_router().oneshot(request).await.unwrap();
        let header = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_string();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (header, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_caller_id_reaches_handler_and_response() {
        let request = Request::builder()
            .uri("/")
            .header(REQUEST_ID_HEADER, "trace-me-42")
            .body(Body::empty())
            .unwrap();

        let (header, seen_by_handler) = call(request).await;

        assert_eq!(header, "trace-me-42");
        assert_eq!(seen_by_handler, "trace-me-42");
    }

    #[tokio::test]
    async fn test_missing_id_is_generated_once() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let (header, seen_by_handler) = call(request).await;

        assert_eq!(header.len(), 36);
        assert_eq!(header, seen_by_handler);
    }
}
