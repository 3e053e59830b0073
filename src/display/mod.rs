//! Active display tracking
//!
//! The queue never enumerates displays itself. Fan-out requests ask a
//! [`DisplayEnumerator`] for a snapshot of the active set at submission time.

mod enumerator;

pub use enumerator::{DisplayEnumerator, StaticDisplays};
