//! Local process control channel.
//!
//! A launched instance runs a [`ControlListener`] on a background thread; a
//! second invocation uses [`ControlClient`] to query it (`status`) or to ask
//! it to shut down (`stop:<key>`). A valid stop is delivered to the hosting
//! process through [`ControlHandle::wait_for_shutdown`] instead of ending
//! the process from the listener thread.

pub mod client;
pub mod listener;
pub mod protocol;

pub use client::ControlClient;
pub use listener::ControlHandle;
pub use listener::ControlListener;
pub use listener::DEFAULT_READ_TIMEOUT;
pub use listener::MAX_LINE_LENGTH;
pub use protocol::ControlRequest;
pub use protocol::DEFAULT_CONTROL_KEY;
pub use protocol::DEFAULT_CONTROL_PORT;
pub use protocol::STATUS_REPLY;
