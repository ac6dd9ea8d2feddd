/* src/controller/source.rs */

//!
//! Configuration sources the reload manager binds from.

use std::sync::Arc;

use async_trait::async_trait;

use crate::loader::{BindingError, ConfigTree, LayeredLoader};
use crate::signal::{ChangeNotifier, ReloadToken, SubscriptionError};

#[cfg(feature = "watch")]
use crate::signal::{SignalError, WatchConfig, WatchTarget, Watcher};

/// A configuration tree that can be reloaded and that announces its changes.
///
/// Notices are delivered at least once per underlying change.
#[async_trait]
pub trait ConfigSource: Send + Sync {
	/// Reads the current configuration.
	async fn load(&self) -> Result<ConfigTree, BindingError>;

	/// Registers for change notices.
	fn subscribe(&self) -> Result<ReloadToken, SubscriptionError>;
}

/// A [`LayeredLoader`] paired with a [`ChangeNotifier`].
pub struct LayeredSource {
	loader: LayeredLoader,
	notifier: Arc<ChangeNotifier>,
	#[cfg(feature = "watch")]
	watchers: std::sync::Mutex<Vec<Watcher>>,
}

impl LayeredSource {
	pub fn new(loader: LayeredLoader) -> Self {
		Self {
			loader,
			notifier: Arc::new(ChangeNotifier::new()),
			#[cfg(feature = "watch")]
			watchers: std::sync::Mutex::new(Vec::new()),
		}
	}

	pub fn loader(&self) -> &LayeredLoader {
		&self.loader
	}

	pub fn notifier(&self) -> &Arc<ChangeNotifier> {
		&self.notifier
	}

	/// Announces a change made out of band (e.g. an edit to a `MemorySource`).
	pub fn notify_changed(&self) -> Option<u64> {
		self.notifier.notify(Vec::new())
	}

	/// Watches a file or directory and announces its changes.
	///
	/// Must be called from within a tokio runtime.
	#[cfg(feature = "watch")]
	pub fn watch(&self, target: WatchTarget, config: WatchConfig) -> Result<(), SignalError> {
		let watcher = Watcher::new(target, config, Arc::clone(&self.notifier))?;
		self.watchers
			.lock()
			.unwrap_or_else(std::sync::PoisonError::into_inner)
			.push(watcher);
		Ok(())
	}

	/// Stops all watchers and closes the notifier.
	pub fn close(&self) {
		#[cfg(feature = "watch")]
		self.watchers
			.lock()
			.unwrap_or_else(std::sync::PoisonError::into_inner)
			.clear();
		self.notifier.close();
	}
}

#[async_trait]
impl ConfigSource for LayeredSource {
	async fn load(&self) -> Result<ConfigTree, BindingError> {
		self.loader.load().await
	}

	fn subscribe(&self) -> Result<ReloadToken, SubscriptionError> {
		self.notifier.subscribe()
	}
}

impl std::fmt::Debug for LayeredSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LayeredSource")
			.field("loader", &self.loader)
			.field("notifier", &self.notifier)
			.finish_non_exhaustive()
	}
}
