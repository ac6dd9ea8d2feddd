/* src/holder/store.rs */

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use arc_swap::ArcSwapOption;

use super::{Entry, Meta};
#[cfg(feature = "events")]
use super::HoldEvent;

/// Default event channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Thread-safe single-value holder with atomic replacement.
///
/// Readers never block and never observe a partially written value; a
/// publish swaps the whole entry in one atomic step.
pub struct Holder<T> {
	inner: ArcSwapOption<Entry<T>>,
	version: AtomicU64,
	#[cfg(feature = "events")]
	events: tokio::sync::broadcast::Sender<HoldEvent<T>>,
}

impl<T> Holder<T>
where
	T: Clone + Send + Sync,
{
	/// Creates an empty holder with default event channel capacity.
	pub fn new() -> Self {
		Self {
			inner: ArcSwapOption::empty(),
			version: AtomicU64::new(0),
			#[cfg(feature = "events")]
			events: tokio::sync::broadcast::channel(DEFAULT_EVENT_CAPACITY).0,
		}
	}

	/// Creates an empty holder with custom event channel capacity.
	///
	/// Note: Events may be dropped if subscribers process slower than
	/// the publish rate and the channel fills up.
	#[cfg(feature = "events")]
	pub fn with_event_capacity(capacity: usize) -> Self {
		Self {
			inner: ArcSwapOption::empty(),
			version: AtomicU64::new(0),
			events: tokio::sync::broadcast::channel(capacity).0,
		}
	}

	/// Publishes a new value, replacing the previous one.
	pub fn publish(&self, value: Arc<T>) -> Meta {
		let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
		let meta = Meta {
			loaded_at: Instant::now(),
			version,
		};

		let entry = Entry {
			value: Arc::clone(&value),
			meta: meta.clone(),
		};
		let old = self.inner.swap(Some(Arc::new(entry)));

		#[cfg(feature = "events")]
		{
			let event = match old {
				Some(old) => HoldEvent::Updated {
					old: Arc::clone(&old.value),
					new: value,
					meta: meta.clone(),
				},
				None => HoldEvent::Loaded {
					value,
					meta: meta.clone(),
				},
			};
			// No subscribers is not an error.
			let _ = self.events.send(event);
		}

		#[cfg(not(feature = "events"))]
		{
			let _ = (old, value);
		}

		meta
	}

	/// Gets the current value. This is a lock-free operation.
	pub fn get(&self) -> Option<Arc<T>> {
		self.inner.load_full().map(|entry| Arc::clone(&entry.value))
	}

	/// Gets metadata for the current value.
	pub fn meta(&self) -> Option<Meta> {
		self.inner.load_full().map(|entry| entry.meta.clone())
	}

	/// Gets the full entry (value + metadata).
	pub fn entry(&self) -> Option<Entry<T>> {
		self.inner.load_full().map(|entry| Entry {
			value: Arc::clone(&entry.value),
			meta: entry.meta.clone(),
		})
	}

	/// Returns true if nothing has been published yet.
	pub fn is_empty(&self) -> bool {
		self.inner.load().is_none()
	}

	/// Subscribes to publish events.
	#[cfg(feature = "events")]
	pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<HoldEvent<T>> {
		self.events.subscribe()
	}
}

impl<T> Default for Holder<T>
where
	T: Clone + Send + Sync,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<T> std::fmt::Debug for Holder<T>
where
	T: Clone + Send + Sync + std::fmt::Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut s = f.debug_struct("Holder");
		s.field("value", &self.get());
		s.field("version", &self.version.load(Ordering::SeqCst));
		s.finish()
	}
}
