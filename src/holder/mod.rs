/* src/holder/mod.rs */

//!
//! Wait-free publication of the active configuration value.

mod entry;
#[cfg(feature = "events")]
mod event;
mod store;
mod meta;

pub use entry::Entry;
#[cfg(feature = "events")]
pub use event::HoldEvent;
pub use store::{DEFAULT_EVENT_CAPACITY, Holder};
pub use meta::Meta;
