/* src/invalidate.rs */

//!
//! Clearing the downstream artifact cache.
//!
//! The cache backend is itself configured from the resolved options, so the
//! trigger cannot hold it from construction: the cache would need the options
//! before the options machinery exists. Instead the trigger holds a
//! [`CacheLocator`] and asks it for the cache each time it fires.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;

/// Error type returned by cache implementations.
pub type CacheError = Box<dyn std::error::Error + Send + Sync>;

/// The cache of derived artifacts (bundled, minified, prefixed output).
///
/// The cache is shared with request-serving readers; the trigger only ever
/// calls [`clear_all`](ArtifactCache::clear_all).
#[async_trait]
pub trait ArtifactCache: Send + Sync {
	/// Removes every cached artifact, including any persisted copies.
	async fn clear_all(&self) -> Result<(), CacheError>;
}

/// Looks up the artifact cache at call time.
pub trait CacheLocator: Send + Sync {
	/// The cache, if one is registered right now.
	fn artifact_cache(&self) -> Option<Arc<dyn ArtifactCache>>;
}

struct Registered {
	cache: Arc<dyn ArtifactCache>,
}

/// A [`CacheLocator`] the cache registers itself with once it is built.
#[derive(Default)]
pub struct CacheRegistry {
	slot: ArcSwapOption<Registered>,
}

impl CacheRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers (or replaces) the artifact cache.
	pub fn register(&self, cache: Arc<dyn ArtifactCache>) {
		self.slot.store(Some(Arc::new(Registered { cache })));
	}

	/// Removes the registered cache, returning true if one was registered.
	pub fn unregister(&self) -> bool {
		self.slot.swap(None).is_some()
	}
}

impl CacheLocator for CacheRegistry {
	fn artifact_cache(&self) -> Option<Arc<dyn ArtifactCache>> {
		self.slot.load_full().map(|registered| Arc::clone(&registered.cache))
	}
}

impl std::fmt::Debug for CacheRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CacheRegistry")
			.field("registered", &self.slot.load().is_some())
			.finish()
	}
}

/// The cache could not be cleared.
#[derive(Debug, thiserror::Error)]
#[error("failed to clear artifact cache: {source}")]
pub struct InvalidationError {
	#[source]
	pub source: CacheError,
}

/// What an invalidation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
	/// The cache was cleared.
	Cleared,
	/// No cache was registered, so there was nothing to clear.
	Skipped,
}

/// Clears the artifact cache found through a [`CacheLocator`].
#[derive(Clone)]
pub struct InvalidationTrigger {
	locator: Arc<dyn CacheLocator>,
}

impl InvalidationTrigger {
	pub fn new(locator: Arc<dyn CacheLocator>) -> Self {
		Self { locator }
	}

	/// Clears the cache and waits for the clear to finish.
	pub async fn invalidate(&self) -> Result<Invalidation, InvalidationError> {
		let Some(cache) = self.locator.artifact_cache() else {
			tracing::debug!("No artifact cache registered, skipping invalidation");
			return Ok(Invalidation::Skipped);
		};

		cache
			.clear_all()
			.await
			.map_err(|source| InvalidationError { source })?;

		tracing::info!("Artifact cache cleared");
		Ok(Invalidation::Cleared)
	}
}

impl std::fmt::Debug for InvalidationTrigger {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("InvalidationTrigger").finish_non_exhaustive()
	}
}
