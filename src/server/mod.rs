pub mod builder;
pub mod handler;
pub mod listener;
pub mod relay;

pub use builder::{HttpServer, ServerBuilder};
pub use handler::RequestHandler;
pub use relay::TcpRelay;
