/* src/holder/entry.rs */

use std::sync::Arc;

use super::Meta;

/// A published value together with its metadata.
#[derive(Debug, Clone)]
pub struct Entry<T> {
	/// The value wrapped in Arc for efficient sharing.
	pub value: Arc<T>,
	/// Metadata about this publication.
	pub meta: Meta,
}
