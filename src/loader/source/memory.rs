/* src/loader/source/memory.rs */

use std::collections::BTreeMap;

use arc_swap::ArcSwap;
use async_trait::async_trait;

use super::super::{BindingError, Source};

/// An in-memory source whose contents can be changed while it is in use.
///
/// Useful for tests and for embedding configuration that is edited at runtime
/// (e.g. from an admin endpoint). Pair it with
/// [`LayeredSource::notify_changed`](crate::controller::LayeredSource::notify_changed)
/// to trigger a reload after an edit.
#[derive(Default)]
pub struct MemorySource {
	data: ArcSwap<BTreeMap<String, Vec<u8>>>,
}

impl MemorySource {
	/// Creates a new empty MemorySource.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or replaces data under `key`.
	pub fn insert(&self, key: &str, value: impl Into<Vec<u8>>) {
		let value = value.into();
		self.data.rcu(|map| {
			let mut map = (**map).clone();
			map.insert(key.to_string(), value.clone());
			map
		});
	}

	/// Removes data under `key`, returning true if it existed.
	pub fn remove(&self, key: &str) -> bool {
		let mut existed = false;
		self.data.rcu(|map| {
			let mut map = (**map).clone();
			existed = map.remove(key).is_some();
			map
		});
		existed
	}
}

#[async_trait]
impl Source for MemorySource {
	async fn read(&self, key: &str) -> Result<Vec<u8>, BindingError> {
		self.data
			.load()
			.get(key)
			.cloned()
			.ok_or_else(|| BindingError::NotFound(key.to_string()))
	}

	async fn exists(&self, key: &str) -> bool {
		self.data.load().contains_key(key)
	}
}
