/* src/controller/manager.rs */

//!
//! The reload manager: one resolve → diff → invalidate → commit cycle per
//! configuration change.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::detector;
use crate::holder::{Holder, Meta};
use crate::invalidate::{CacheLocator, InvalidationTrigger};
use crate::loader::ConfigTree;
use crate::options::{BundleOptions, FileProvider, NullFileProvider, RawOptions};
use crate::resolver::{
	self, EnvironmentProvider, ProcessEnvironment, ResolutionContext, SettingsProvider,
	StaticSettings,
};
use crate::signal::ReloadToken;

use super::{ConfigSource, ReloadError};

/// Default configuration section holding the bundling options.
pub const DEFAULT_SECTION: &str = "bundling";

/// Code-level override applied to the bound options on every cycle.
pub type PostBindFn = Arc<dyn Fn(&mut RawOptions) + Send + Sync>;

/// Receives errors from reloads triggered by change notices.
pub type ErrorCallback = Arc<dyn Fn(ReloadError) + Send + Sync>;

/// Lifecycle of a [`ReloadManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
	/// No successful cycle yet, so no subscription.
	Uninitialized,
	/// Listening for change notices.
	Subscribed,
	/// Torn down. Terminal.
	Disposed,
}

struct Subscription {
	shutdown: watch::Sender<bool>,
	handle: JoinHandle<()>,
}

/// A token taken ahead of a cycle, installed only if the cycle succeeds.
struct PendingSubscription {
	runtime: tokio::runtime::Handle,
	token: ReloadToken,
}

enum Lifecycle {
	Uninitialized,
	Subscribed(Subscription),
	Disposed,
}

/// State shared with the listener task.
struct Inner {
	source: Arc<dyn ConfigSource>,
	environment: Arc<dyn EnvironmentProvider>,
	settings: Arc<dyn SettingsProvider>,
	trigger: InvalidationTrigger,
	fallback_provider: Arc<dyn FileProvider>,
	section: String,
	post_bind: Vec<PostBindFn>,
	on_error: Option<ErrorCallback>,
	/// Last successfully applied options. The lock is held for a whole cycle,
	/// which serializes cycles.
	previous: tokio::sync::Mutex<Option<Arc<BundleOptions>>>,
	active: Holder<BundleOptions>,
}

/// Keeps bundling options in sync with their configuration source.
///
/// Every cycle binds the configured section, resolves it into a
/// [`BundleOptions`] snapshot, compares it with the last applied snapshot and,
/// if cached artifacts became stale, clears the artifact cache before the new
/// snapshot is committed. A cycle that fails leaves the last applied snapshot
/// (and the published one) untouched.
///
/// After the first successful cycle the manager subscribes to the source's
/// change notices and runs a cycle for each of them in the background.
/// Dropping the manager disposes it.
pub struct ReloadManager {
	inner: Arc<Inner>,
	lifecycle: Mutex<Lifecycle>,
}

impl Drop for ReloadManager {
	fn drop(&mut self) {
		self.dispose();
	}
}

/// Builder for [`ReloadManager`].
pub struct ReloadManagerBuilder {
	source: Option<Arc<dyn ConfigSource>>,
	locator: Option<Arc<dyn CacheLocator>>,
	environment: Option<Arc<dyn EnvironmentProvider>>,
	settings: Option<Arc<dyn SettingsProvider>>,
	file_provider: Option<Arc<dyn FileProvider>>,
	section: String,
	post_bind: Vec<PostBindFn>,
	on_error: Option<ErrorCallback>,
}

impl ReloadManagerBuilder {
	pub fn new() -> Self {
		Self {
			source: None,
			locator: None,
			environment: None,
			settings: None,
			file_provider: None,
			section: DEFAULT_SECTION.to_string(),
			post_bind: Vec::new(),
			on_error: None,
		}
	}

	pub fn source(mut self, source: Arc<dyn ConfigSource>) -> Self {
		self.source = Some(source);
		self
	}

	/// Where the artifact cache is looked up when it must be cleared.
	pub fn locator(mut self, locator: Arc<dyn CacheLocator>) -> Self {
		self.locator = Some(locator);
		self
	}

	/// Defaults to [`ProcessEnvironment::default`].
	pub fn environment(mut self, environment: Arc<dyn EnvironmentProvider>) -> Self {
		self.environment = Some(environment);
		self
	}

	/// Defaults to all signals unset.
	pub fn settings(mut self, settings: Arc<dyn SettingsProvider>) -> Self {
		self.settings = Some(settings);
		self
	}

	/// File provider attached to snapshots that do not set one. Defaults to [`NullFileProvider`].
	pub fn file_provider(mut self, provider: Arc<dyn FileProvider>) -> Self {
		self.file_provider = Some(provider);
		self
	}

	/// `:`-separated path of the section to bind. Defaults to `bundling`.
	pub fn section(mut self, section: impl Into<String>) -> Self {
		self.section = section.into();
		self
	}

	pub fn post_bind<F>(mut self, f: F) -> Self
	where
		F: Fn(&mut RawOptions) + Send + Sync + 'static,
	{
		self.post_bind.push(Arc::new(f));
		self
	}

	pub fn on_error<F>(mut self, f: F) -> Self
	where
		F: Fn(ReloadError) + Send + Sync + 'static,
	{
		self.on_error = Some(Arc::new(f));
		self
	}

	pub fn build(self) -> Result<ReloadManager, ReloadError> {
		let source = self
			.source
			.ok_or_else(|| ReloadError::Builder("source is required".to_string()))?;
		let locator = self
			.locator
			.ok_or_else(|| ReloadError::Builder("locator is required".to_string()))?;

		let inner = Inner {
			source,
			environment: self
				.environment
				.unwrap_or_else(|| Arc::new(ProcessEnvironment::default())),
			settings: self
				.settings
				.unwrap_or_else(|| Arc::new(StaticSettings::default())),
			trigger: InvalidationTrigger::new(locator),
			fallback_provider: self
				.file_provider
				.unwrap_or_else(|| Arc::new(NullFileProvider)),
			section: self.section,
			post_bind: self.post_bind,
			on_error: self.on_error,
			previous: tokio::sync::Mutex::new(None),
			active: Holder::new(),
		};

		Ok(ReloadManager {
			inner: Arc::new(inner),
			lifecycle: Mutex::new(Lifecycle::Uninitialized),
		})
	}
}

impl Default for ReloadManagerBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ReloadManager {
	pub fn builder() -> ReloadManagerBuilder {
		ReloadManagerBuilder::new()
	}

	/// Loads from the source, runs one cycle and subscribes to change notices.
	///
	/// This is the usual startup call. An error here means the options were
	/// never applied and dependent subsystems should not start.
	pub async fn load(&self) -> Result<Arc<BundleOptions>, ReloadError> {
		self.ensure_live()?;
		let pending = self.prepare_subscription();
		let next = self.inner.reload().await?;
		self.install_subscription(pending?);
		Ok(next)
	}

	/// Manually reloads from the source.
	///
	/// Same as [`load`](Self::load): if no subscription is registered yet, a
	/// successful reload registers one.
	pub async fn reload(&self) -> Result<Arc<BundleOptions>, ReloadError> {
		self.load().await
	}

	/// Runs one cycle against an already loaded tree and subscribes to change
	/// notices if not yet subscribed.
	pub async fn configure(&self, tree: &ConfigTree) -> Result<Arc<BundleOptions>, ReloadError> {
		self.ensure_live()?;
		let pending = self.prepare_subscription();
		let next = {
			let mut previous = self.inner.previous.lock().await;
			self.inner.cycle(&mut previous, tree).await?
		};
		self.install_subscription(pending?);
		Ok(next)
	}

	/// The currently applied options. Lock-free; safe to call on every request.
	pub fn current(&self) -> Option<Arc<BundleOptions>> {
		self.inner.active.get()
	}

	/// Metadata of the currently applied options (version, load time).
	pub fn current_meta(&self) -> Option<Meta> {
		self.inner.active.meta()
	}

	/// The options the next cycle will be diffed against.
	///
	/// Waits for an in-flight cycle to finish.
	pub async fn last_applied(&self) -> Option<Arc<BundleOptions>> {
		self.inner.previous.lock().await.clone()
	}

	/// Subscribes to publish events of the applied options.
	#[cfg(feature = "events")]
	pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<crate::holder::HoldEvent<BundleOptions>> {
		self.inner.active.subscribe()
	}

	pub fn state(&self) -> ManagerState {
		match &*self.lock_lifecycle() {
			Lifecycle::Uninitialized => ManagerState::Uninitialized,
			Lifecycle::Subscribed(_) => ManagerState::Subscribed,
			Lifecycle::Disposed => ManagerState::Disposed,
		}
	}

	/// Releases the change subscription and stops future cycles.
	///
	/// Idempotent. A cycle already in flight is allowed to finish. Returns
	/// true only for the call that actually released a subscription.
	pub fn dispose(&self) -> bool {
		let previous = std::mem::replace(&mut *self.lock_lifecycle(), Lifecycle::Disposed);
		match previous {
			Lifecycle::Subscribed(subscription) => {
				// The listener may already be gone; that is fine.
				let _ = subscription.shutdown.send(true);
				drop(subscription.handle);
				tracing::debug!(section = %self.inner.section, "Reload subscription released");
				true
			}
			Lifecycle::Uninitialized | Lifecycle::Disposed => false,
		}
	}

	fn lock_lifecycle(&self) -> std::sync::MutexGuard<'_, Lifecycle> {
		self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
	}

	fn ensure_live(&self) -> Result<(), ReloadError> {
		match &*self.lock_lifecycle() {
			Lifecycle::Disposed => Err(ReloadError::Disposed),
			_ => Ok(()),
		}
	}

	/// Takes a reload token before the first cycle reads the source.
	///
	/// A change that lands while that cycle runs is then still buffered in the
	/// token, and the listener reloads once more. Yields `None` when a
	/// subscription already exists (or the manager is disposed).
	fn prepare_subscription(&self) -> Result<Option<PendingSubscription>, ReloadError> {
		if !matches!(*self.lock_lifecycle(), Lifecycle::Uninitialized) {
			return Ok(None);
		}

		let runtime = tokio::runtime::Handle::try_current()
			.map_err(crate::signal::SubscriptionError::from)?;
		let token = self.inner.source.subscribe()?;
		Ok(Some(PendingSubscription { runtime, token }))
	}

	/// Starts the listener after a successful cycle.
	///
	/// If another cycle got there first, or the manager was disposed while the
	/// cycle ran, the token is dropped instead.
	fn install_subscription(&self, pending: Option<PendingSubscription>) {
		let Some(PendingSubscription { runtime, token }) = pending else {
			return;
		};
		let mut lifecycle = self.lock_lifecycle();
		if !matches!(*lifecycle, Lifecycle::Uninitialized) {
			return;
		}

		let (shutdown, shutdown_rx) = watch::channel(false);
		let handle = runtime.spawn(listen(Arc::clone(&self.inner), token, shutdown_rx));

		*lifecycle = Lifecycle::Subscribed(Subscription { shutdown, handle });
		tracing::debug!(section = %self.inner.section, "Subscribed to configuration changes");
	}
}

impl Inner {
	async fn reload(&self) -> Result<Arc<BundleOptions>, ReloadError> {
		// Load under the cycle lock so trees are applied in the order they were read.
		let mut previous = self.previous.lock().await;
		let tree = self.source.load().await?;
		self.cycle(&mut previous, &tree).await
	}

	async fn cycle(
		&self,
		previous: &mut Option<Arc<BundleOptions>>,
		tree: &ConfigTree,
	) -> Result<Arc<BundleOptions>, ReloadError> {
		let mut raw: RawOptions = tree.bind(&self.section)?;
		for hook in &self.post_bind {
			hook(&mut raw);
		}

		let ctx = ResolutionContext::capture(self.environment.as_ref(), self.settings.as_ref());
		let next = Arc::new(resolver::resolve(&raw, &ctx, &self.fallback_provider));

		let diff = detector::diff(previous.as_deref(), &next);
		if diff.is_cache_affecting() {
			tracing::info!(changed = ?diff.changed, "Cache-affecting option change, invalidating artifacts");
			self.trigger.invalidate().await?;
		} else if !diff.is_empty() {
			tracing::debug!(changed = ?diff.changed, "Option change does not affect cached artifacts");
		}

		let meta = self.active.publish(Arc::clone(&next));
		*previous = Some(Arc::clone(&next));

		tracing::info!(
			section = %self.section,
			version = meta.version,
			bundling = next.bundling_enabled,
			minification = next.minification_enabled,
			auto_prefixer = next.auto_prefixer_enabled,
			"Bundling options applied"
		);
		Ok(next)
	}
}

async fn listen(inner: Arc<Inner>, mut token: ReloadToken, mut shutdown: watch::Receiver<bool>) {
	loop {
		tokio::select! {
			biased;
			// Fires on dispose, or when the manager is dropped.
			_ = shutdown.changed() => break,
			notice = token.changed() => {
				let Some(notice) = notice else {
					tracing::debug!(section = %inner.section, "Configuration source closed");
					break;
				};
				if *shutdown.borrow() {
					break;
				}
				tracing::debug!(sequence = notice.sequence, "Configuration change notice received");
				if let Err(e) = inner.reload().await {
					tracing::warn!(
						section = %inner.section,
						"Reload failed, keeping last applied options: {}",
						e
					);
					if let Some(ref cb) = inner.on_error {
						cb(e);
					}
				}
			}
		}
	}
}

impl std::fmt::Debug for ReloadManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut s = f.debug_struct("ReloadManager");
		s.field("section", &self.inner.section);
		s.field("state", &self.state());
		s.field("current", &self.current());
		s.finish_non_exhaustive()
	}
}
