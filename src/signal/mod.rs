/* src/signal/mod.rs */

//!
//! Reload notifications.
//!
//! A [`ChangeNotifier`] belongs to a configuration source and fires once per
//! underlying change. Consumers hold a [`ReloadToken`] obtained from it. With
//! the `watch` feature, a [`Watcher`] turns filesystem activity into
//! notifications.

use std::path::PathBuf;

mod token;
#[cfg(feature = "watch")]
mod watcher;
#[cfg(feature = "watch")]
mod worker;

pub use token::{ChangeNotifier, DEFAULT_NOTICE_CAPACITY, ReloadToken};
#[cfg(feature = "stream")]
pub use token::ReloadStream;
#[cfg(feature = "watch")]
pub use watcher::{WatchConfig, WatchTarget, Watcher};

/// Errors from the filesystem watcher.
#[derive(thiserror::Error, Debug)]
pub enum SignalError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[cfg(feature = "watch")]
	#[error("Notify error: {0}")]
	Notify(#[from] notify::Error),

	#[error("Invalid configuration: {0}")]
	Config(String),

	#[error("No async runtime available: {0}")]
	NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Registering for (or releasing) reload notifications failed.
#[derive(thiserror::Error, Debug)]
pub enum SubscriptionError {
	#[error("change notifier is closed")]
	Closed,

	#[error("no async runtime available to run the reload listener: {0}")]
	NoRuntime(#[from] tokio::runtime::TryCurrentError),

	#[error("signal error: {0}")]
	Signal(#[from] SignalError),
}

/// One change of the underlying configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadNotice {
	/// Monotonic per notifier, starting at 1.
	pub sequence: u64,
	/// Files involved, if the change came from the filesystem.
	pub paths: Vec<PathBuf>,
}
