//! Infrastructure layer: the HTTP transport and the touch script reader.

pub mod http_transport;
pub mod touch_script;
