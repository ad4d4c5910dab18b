// tests/http_proxy_tests.rs
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Client, Request, Response, Server, StatusCode};
use rust_balance::load_balancer::create_load_balancer;
use rust_balance::proxy::Proxy;
use rust_balance::server::{RequestHandler, ServerBuilder};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Backend that answers with its name plus what it received.
async fn spawn_backend(name: &'static str) -> SocketAddr {
    let make_service = make_service_fn(move |_| async move {
        Ok::<_, Infallible>(service_fn(move |req: Request<Body>| async move {
            let host = req
                .headers()
                .get(hyper::header::HOST)
                .and_then(|h| h.to_str().ok())
                .unwrap_or("")
                .to_string();
            let forwarded = req
                .headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .unwrap_or("")
                .to_string();
            let target = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_default();

            Ok::<_, Infallible>(Response::new(Body::from(format!(
                "{} {} {} {}",
                name, host, target, forwarded
            ))))
        }))
    });

    let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_service);
    let addr = server.local_addr();
    tokio::spawn(server);
    addr
}

async fn start_proxy(backends: Vec<String>) -> SocketAddr {
    let balancer = create_load_balancer(backends).unwrap();
    let proxy = Arc::new(Proxy::new(balancer));
    let server = ServerBuilder::new("127.0.0.1:0")
        .with_handler(RequestHandler::new(proxy))
        .bind()
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.serve());
    addr
}

async fn get(addr: SocketAddr, path: &str) -> (StatusCode, String) {
    let uri = format!("http://{}{}", addr, path).parse().unwrap();
    let resp = Client::new().get(uri).await.unwrap();
    let status = resp.status();
    let body = hyper::body::to_bytes(resp.into_body()).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_requests_rotate_and_rewrite_host() {
    let a = spawn_backend("a").await;
    let b = spawn_backend("b").await;
    let proxy = start_proxy(vec![a.to_string(), b.to_string()]).await;

    let mut bodies = Vec::new();
    for _ in 0..4 {
        let (status, body) = get(proxy, "/items?id=7").await;
        assert_eq!(status, StatusCode::OK);
        bodies.push(body);
    }

    assert_eq!(bodies[0], format!("a {} /items?id=7 127.0.0.1", a));
    assert_eq!(bodies[1], format!("b {} /items?id=7 127.0.0.1", b));
    assert_eq!(bodies[2], bodies[0]);
    assert_eq!(bodies[3], bodies[1]);
}

#[tokio::test]
async fn test_dead_backend_returns_bad_gateway() {
    let dead = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let live = spawn_backend("live").await;
    let proxy = start_proxy(vec![dead.to_string(), live.to_string()]).await;

    let (status, _) = get(proxy, "/").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    // The proxy keeps serving; the next request lands on the live backend.
    let (status, body) = get(proxy, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("live "));
}

#[tokio::test]
async fn test_bind_requires_handler() {
    let err = ServerBuilder::new("127.0.0.1:0").bind().await.err().unwrap();
    assert!(err.to_string().contains("handler must be set"));
}
