//! Minimal HTTP/1.1 front end for the integrator.

pub mod request;
pub mod response;
pub mod router;
pub mod server;

pub use server::HttpServer;
