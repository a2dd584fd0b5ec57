//! Realtime collaboration layer
//!
//! [`SessionHub`] keeps one broadcast session per open map; the
//! [`protocol`] module defines the JSON frames on the wire.

pub mod hub;
pub mod protocol;

pub use hub::{HubError, SessionHub};
pub use protocol::{ClientMessage, EditOp, MapEvent, CLOSE_INTERNAL, CLOSE_NOT_FOUND};
