/* src/options/mod.rs */

//!
//! Bundling options, before and after resolution.
//!
//! [`RawOptions`] is what the configuration source explicitly says: every
//! switch may be unset. [`BundleOptions`] is the resolved snapshot in which
//! every switch has a value.

mod provider;
mod raw;
mod snapshot;

pub use provider::{FileProvider, NullFileProvider, PhysicalFileProvider};
pub use raw::RawOptions;
pub use snapshot::BundleOptions;
