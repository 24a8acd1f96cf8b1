//! pointer-host library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the host do? (for beginners)
//!
//! The *host* is the computer whose pointer is being driven from a phone or
//! tablet.  The controller sends small relative motion events ("moved 6 px
//! right, 2 px up") over HTTP.  The host:
//!
//! 1. Refuses to trust the size of each event and clamps it to a maximum.
//! 2. Smooths consecutive events so a jittery finger gives a steady pointer,
//!    but starts fresh after a pause so a new gesture never inherits motion
//!    from the previous one.
//! 3. Adds the smoothed delta to the live cursor position and moves the
//!    pointer, skipping sub-pixel moves.
//! 4. Performs left and right clicks on request.
//!
//! ```text
//! controller ──HTTP──> infrastructure::http ──> application::MotionIntegrator
//!                                                    │
//!                                   application::CursorControl (trait)
//!                                                    │
//!                       infrastructure::cursor (SendInput / XTest / CoreGraphics)
//! ```

/// Application layer: motion integration and the cursor capability.
pub mod application;

/// Infrastructure layer: OS cursor adapters, HTTP server, and config.
pub mod infrastructure;
