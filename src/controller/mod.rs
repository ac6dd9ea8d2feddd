/* src/controller/mod.rs */

//!
//! Live reconfiguration of bundling options.
//!
//! - [`ReloadManager`] - Resolves, diffs, invalidates and commits on every reload
//! - [`ConfigSource`] / [`LayeredSource`] - Where configuration comes from

mod error;
mod manager;
mod source;

pub use error::ReloadError;
pub use manager::{ErrorCallback, ManagerState, PostBindFn, ReloadManager, ReloadManagerBuilder};
pub use source::{ConfigSource, LayeredSource};
