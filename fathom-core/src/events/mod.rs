//! Analysis lifecycle events: synchronous dispatch, panic-isolated
//! handlers, zero overhead when nothing is registered.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::FathomEventHandler;
pub use types::*;
