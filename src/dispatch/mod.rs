//! Dispatcher façade
//!
//! This module handles:
//! - Building commands from caller intent
//! - Fanning a request out to every active display, or all but one
//! - Refusing requests while too many commands are still unfinished

mod dispatcher;

pub use dispatcher::Dispatcher;
