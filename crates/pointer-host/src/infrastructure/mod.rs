//! Infrastructure layer: cursor backends, the HTTP front end, and config
//! storage.

pub mod cursor;
pub mod http;
pub mod storage;
