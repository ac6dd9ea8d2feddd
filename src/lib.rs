/* src/lib.rs */

//!
//! Live-reloading options for an asset bundling pipeline.
//!
//! The crate is split into the following modules:
//!
//! - **holder**: Atomic, wait-free publication of the active options.
//! - **loader**: Format-agnostic loading of layered configuration trees.
//! - **signal**: Reload notifications and (optionally) filesystem watching.
//! - **options**: Raw (bound) and resolved bundling options.
//! - **resolver**: Fills unset options from environment and settings signals.
//! - **detector**: Decides whether a change invalidates cached artifacts.
//! - **invalidate**: Clears the downstream artifact cache on demand.
//! - **controller**: The [`ReloadManager`](controller::ReloadManager) tying it
//!   all together.
//!
//! ## Feature Flags
//!
//! - `full`: Enables all features.
//! - `json`, `toml`, `yaml`: Loader formats (`json` and `toml` are default).
//! - `fs`: Filesystem source for the loader.
//! - `watch`: Filesystem watcher that emits reload notices (implies `fs`).
//! - `stream`: `Stream` adapter for reload tokens.
//! - `events`: Broadcast of publish events from the holder.
//! - `logging`: Loader diagnostics through `log`.
//!
//! ## Basic Usage
//!
//! See `demos/basic.rs` for a complete example.

pub mod controller;
pub mod detector;
pub mod holder;
pub mod invalidate;
pub mod loader;
pub mod options;
pub mod resolver;
pub mod signal;

pub use controller::{ReloadError, ReloadManager};
pub use options::{BundleOptions, RawOptions};
