//! Request identification.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Honor an ID supplied by an upstream proxy
//! - Expose the ID to handlers through a request extension
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An existing `x-request-id` header is trusted, not replaced
//! - Plain tower Layer/Service pair, no middleware framework magic

use std::fmt;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Correlation ID assigned to one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read the correlation ID attached by [`RequestIdLayer`].
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&RequestId>;
}

impl RequestIdExt for Request<Body> {
    fn request_id(&self) -> Option<&RequestId> {
        self.extensions().get::<RequestId>()
    }
}

/// Layer that assigns the correlation ID before anything else runs.
#[derive(Debug, Clone, Copy)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service wrapper produced by [`RequestIdLayer`].
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestIdService<S>
where
    S: Service<Request<Body>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let id = match req
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
        {
            Some(existing) => RequestId(existing.to_string()),
            None => {
                let id = RequestId::generate();
                if let Ok(value) = HeaderValue::from_str(id.as_str()) {
                    req.headers_mut().insert(X_REQUEST_ID, value);
                }
                id
            }
        };
        req.extensions_mut().insert(id);
        self.inner.call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Inner service that reports the ID it observed.
    #[derive(Clone)]
    struct Capture;

    impl Service<Request<Body>> for Capture {
        type Response = (Option<String>, Option<String>);
        type Error = std::convert::Infallible;
        type Future = std::future::Ready<Result<Self::Response, Self::Error>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: Request<Body>) -> Self::Future {
            let extension = req.request_id().map(|id| id.as_str().to_string());
            let header = req
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            std::future::ready(Ok((extension, header)))
        }
    }

    #[tokio::test]
    async fn test_layer_generates_id_and_header() {
        let mut service = RequestIdLayer.layer(Capture);
        let req = Request::builder().body(Body::default()).unwrap();
        let (extension, header) = service.call(req).await.unwrap();
        let extension = extension.expect("extension missing");
        assert_eq!(Some(extension), header);
    }

    #[tokio::test]
    async fn test_layer_keeps_upstream_id() {
        let mut service = RequestIdLayer.layer(Capture);
        let req = Request::builder()
            .header(X_REQUEST_ID, "upstream-abc")
            .body(Body::default())
            .unwrap();
        let (extension, header) = service.call(req).await.unwrap();
        assert_eq!(extension.as_deref(), Some("upstream-abc"));
        assert_eq!(header.as_deref(), Some("upstream-abc"));
    }
}
