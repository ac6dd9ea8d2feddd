/* src/loader/mod.rs */

//!
//! Format-agnostic loading of layered configuration.
//!
//! A [`LayeredLoader`] reads each [`Layer`] from a [`Source`], parses it with
//! the matching [`Format`] and deep-merges the results into a [`ConfigTree`].
//! Sections of the tree are then bound to typed values.

pub mod error;
pub mod format;
mod layered;
pub mod source;
mod tree;

pub use error::BindingError;
pub use layered::{Layer, LayeredLoader, LayeredLoaderBuilder};
pub use source::MemorySource;
pub use tree::{ConfigTree, SECTION_SEPARATOR, normalize_key};

#[cfg(feature = "fs")]
pub use source::FileSource;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// Where a merged layer came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadInfo {
	/// Source key the layer was read from.
	pub key: String,
	/// Primary extension of the format that parsed it.
	pub format: &'static str,
}

/// Result of loading a single layer.
#[derive(Debug)]
pub enum LoadResult<T> {
	/// Successfully loaded and parsed.
	Ok { value: T, info: LoadInfo },
	/// Resource not found at the given key.
	NotFound,
	/// Resource exists but is invalid.
	Invalid(BindingError),
}

/// Abstract format parser that converts bytes into a configuration tree.
pub trait Format: Send + Sync {
	/// List of supported extensions or identifiers.
	fn extensions(&self) -> &'static [&'static str];

	/// Parse the raw bytes read from `key`.
	fn parse(&self, key: &str, input: &[u8]) -> Result<Value, BindingError>;
}

/// Abstract data source that retrieves raw bytes by key.
#[async_trait]
pub trait Source: Send + Sync {
	/// Read raw data as a vector of bytes.
	async fn read(&self, key: &str) -> Result<Vec<u8>, BindingError>;

	/// Check if the resource exists at the given key.
	async fn exists(&self, key: &str) -> bool;
}

#[async_trait]
impl<S> Source for Arc<S>
where
	S: Source + ?Sized,
{
	async fn read(&self, key: &str) -> Result<Vec<u8>, BindingError> {
		(**self).read(key).await
	}

	async fn exists(&self, key: &str) -> bool {
		(**self).exists(key).await
	}
}
