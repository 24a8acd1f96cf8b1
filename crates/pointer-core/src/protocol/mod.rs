//! Protocol module containing the JSON bodies exchanged over HTTP.

pub mod messages;

pub use messages::*;
