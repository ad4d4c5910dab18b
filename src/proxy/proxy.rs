// ────────────────────────────────
// src/proxy/proxy.rs
// Proxy component that handles HTTP request forwarding
// ────────────────────────────────

use crate::load_balancer::LoadBalancer;
use hyper::client::HttpConnector;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, CONNECTION, HOST};
use hyper::{Body, Client, Request, Response, StatusCode, Uri};
use std::net::SocketAddr;
use std::sync::Arc;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

// Hop-by-hop headers are meaningful only for a single transport-level
// connection and must not be forwarded.
const HOP_HEADERS: &[&str] = &[
    "connection",
    "proxy-connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    // Upgrades are not tunnelled, so the request goes through as plain HTTP.
    "upgrade",
];

/// Reverse proxy that sends each request to the next backend in rotation.
pub struct Proxy {
    balancer: Arc<dyn LoadBalancer>,
    client: Client<HttpConnector>,
}

impl Proxy {
    pub fn new(balancer: Arc<dyn LoadBalancer>) -> Self {
        Self {
            balancer,
            client: Client::new(),
        }
    }

    pub async fn handle(
        &self,
        mut req: Request<Body>,
        peer: Option<SocketAddr>,
    ) -> Result<Response<Body>, ProxyError> {
        let backend = self.balancer.choose().to_string();

        *req.uri_mut() = target_uri(req.uri(), &backend)?;
        let host = HeaderValue::from_str(&backend)
            .map_err(|_| ProxyError::InvalidTarget(backend.clone()))?;
        req.headers_mut().insert(HOST, host);

        strip_hop_headers(req.headers_mut());
        if let Some(peer) = peer {
            append_forwarded_for(req.headers_mut(), peer);
        }

        tracing::debug!(%backend, uri = %req.uri(), "forwarding request");
        let mut resp = self
            .client
            .request(req)
            .await
            .map_err(|e| ProxyError::Backend { backend, source: e })?;

        strip_hop_headers(resp.headers_mut());
        Ok(resp)
    }
}

/// Rewrite `uri` to plain HTTP on `backend`, keeping path and query.
pub fn target_uri(uri: &Uri, backend: &str) -> Result<Uri, ProxyError> {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    format!("http://{}{}", backend, path)
        .parse()
        .map_err(|_| ProxyError::InvalidTarget(backend.to_string()))
}

fn strip_hop_headers(headers: &mut HeaderMap) {
    // Headers listed in Connection are hop-by-hop too.
    let listed: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in HOP_HEADERS {
        headers.remove(*name);
    }
}

fn append_forwarded_for(headers: &mut HeaderMap, peer: SocketAddr) {
    let ip = peer.ip().to_string();
    let value = match headers.get(X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
        Some(prior) => format!("{}, {}", prior, ip),
        None => ip,
    };
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}

// Custom error type for proxy operations
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("invalid backend target {0}")]
    InvalidTarget(String),

    #[error("backend {backend} error: {source}")]
    Backend {
        backend: String,
        #[source]
        source: hyper::Error,
    },
}

// Convert ProxyError to Hyper Response for error handling
impl From<ProxyError> for Response<Body> {
    fn from(err: ProxyError) -> Self {
        let status = match err {
            ProxyError::InvalidTarget(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Backend { .. } => StatusCode::BAD_GATEWAY,
        };

        let mut resp = Response::new(Body::empty());
        *resp.status_mut() = status;
        resp
    }
}
