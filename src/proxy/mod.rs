mod proxy;

pub use proxy::{target_uri, Proxy, ProxyError};
