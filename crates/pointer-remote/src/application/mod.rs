//! Application layer: the controller session and the host capability it
//! talks through.

pub mod control_session;
pub mod transport;

pub use control_session::{ConnectionState, MoveOutcome, RemoteSession, SessionError};
pub use transport::{AddressError, HostAddress, HostTransport, TransportError};
