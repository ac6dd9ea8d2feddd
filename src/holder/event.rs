/* src/holder/event.rs */

use std::sync::Arc;

use super::Meta;

/// Events emitted by the holder when a value is published.
#[derive(Debug, Clone)]
pub enum HoldEvent<T> {
	/// The first value was published.
	Loaded { value: Arc<T>, meta: Meta },
	/// An existing value was replaced.
	Updated {
		old: Arc<T>,
		new: Arc<T>,
		meta: Meta,
	},
}
