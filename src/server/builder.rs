// ────────────────────────────────
// src/server/builder.rs
// ────────────────────────────────
use crate::server::handler::RequestHandler;
use crate::server::listener::bind_tcp;
use anyhow::{anyhow, Result};
use hyper::server::conn::Http;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Builder pattern so `main.rs` can inject its Proxy.
pub struct ServerBuilder {
    addr: String,
    handler: Option<RequestHandler>,
}

impl ServerBuilder {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            handler: None,
        }
    }

    /// Inject the request handler (wraps `proxy::Proxy`).
    pub fn with_handler(mut self, handler: RequestHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Bind the TCP socket without serving yet.
    pub async fn bind(self) -> Result<HttpServer> {
        let handler = self
            .handler
            .ok_or_else(|| anyhow!("handler must be set via with_handler()"))?;
        let listener = bind_tcp(&self.addr).await?;
        Ok(HttpServer { listener, handler })
    }
}

/// HTTP/1.x server with a bound listener.
pub struct HttpServer {
    listener: TcpListener,
    handler: RequestHandler,
}

impl HttpServer {
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn serve(self) -> Result<()> {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(err) => {
                    tracing::warn!(%err, "failed to accept");
                    continue;
                }
            };
            let svc = self.handler.for_peer(peer);

            // One Tokio task per connection.
            tokio::spawn(async move {
                let http = Http::new();
                if let Err(err) = http.serve_connection(stream, svc).await {
                    tracing::debug!(%peer, %err, "connection error");
                }
            });
        }
    }
}
