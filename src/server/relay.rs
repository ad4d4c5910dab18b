// ────────────────────────────────
// src/server/relay.rs
// Raw TCP balancing: accept, pick a backend, splice bytes both ways.
// ────────────────────────────────
use crate::load_balancer::LoadBalancer;
use crate::server::listener::bind_tcp;
use anyhow::Result;
use socket2::SockRef;
use std::io;
use std::net::{Shutdown, SocketAddr};
use std::sync::Arc;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, warn};

/// A bound TCP relay. Binding is separate from serving so a bind failure
/// surfaces before the accept loop starts.
pub struct TcpRelay {
    listener: TcpListener,
    balancer: Arc<dyn LoadBalancer>,
}

impl TcpRelay {
    pub async fn bind(addr: &str, balancer: Arc<dyn LoadBalancer>) -> Result<Self> {
        let listener = bind_tcp(addr).await?;
        Ok(Self { listener, balancer })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever, one task per connection.
    ///
    /// There is no admission control: a burst of connections spawns an equal
    /// burst of tasks.
    pub async fn serve(self) -> Result<()> {
        loop {
            let (inbound, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(err) => {
                    warn!(%err, "failed to accept");
                    continue;
                }
            };

            let backend = self.balancer.choose().to_string();
            tokio::spawn(handle_connection(inbound, peer, backend));
        }
    }
}

/// Dial `backend` and start relaying. Returns once both copy tasks are
/// spawned; the session ends on its own when both directions have ended.
pub async fn handle_connection(inbound: TcpStream, peer: SocketAddr, backend: String) {
    let outbound = match TcpStream::connect(&backend).await {
        Ok(stream) => stream,
        Err(err) => {
            // Dropping `inbound` closes the client connection.
            warn!(%peer, %backend, %err, "failed to dial backend");
            return;
        }
    };
    debug!(%peer, %backend, "relaying");

    for stream in [&inbound, &outbound] {
        if let Err(err) = stream.set_nodelay(true) {
            debug!(%peer, %err, "failed to set TCP_NODELAY");
        }
    }

    let (client_read, client_write) = inbound.into_split();
    let (backend_read, backend_write) = outbound.into_split();

    tokio::spawn(copy(backend_write, client_read, Direction::Upstream, peer));
    tokio::spawn(copy(client_write, backend_read, Direction::Downstream, peer));
}

#[derive(Debug, Clone, Copy)]
pub enum Direction {
    /// client -> backend
    Upstream,
    /// backend -> client
    Downstream,
}

/// Stream `src` into `dst` until EOF or an error, then close `dst`'s socket.
///
/// The close is a full shutdown of both directions, so the paired copy task
/// blocked reading from the same socket returns immediately.
pub async fn copy(
    mut dst: OwnedWriteHalf,
    mut src: OwnedReadHalf,
    direction: Direction,
    peer: SocketAddr,
) -> io::Result<u64> {
    let result = tokio::io::copy(&mut src, &mut dst).await;
    match &result {
        Ok(bytes) => debug!(%peer, ?direction, bytes = *bytes, "relay stream ended"),
        Err(err) => debug!(%peer, ?direction, %err, "relay stream ended with error"),
    }

    // The peer may already be gone, in which case there is nothing left to close.
    let socket: &TcpStream = dst.as_ref();
    if let Err(err) = SockRef::from(socket).shutdown(Shutdown::Both) {
        debug!(%peer, ?direction, %err, "close after relay");
    }
    result
}
