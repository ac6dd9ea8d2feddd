/* src/controller/error.rs */

use thiserror::Error;

use crate::invalidate::InvalidationError;
use crate::loader::BindingError;
use crate::signal::SubscriptionError;

/// Errors that can occur while reconfiguring.
///
/// None of these advance the last applied options: a failed cycle can be
/// retried and will see the same difference again.
#[derive(Debug, Error)]
pub enum ReloadError {
	#[error("Binding error: {0}")]
	Binding(#[from] BindingError),

	#[error("Invalidation error: {0}")]
	Invalidation(#[from] InvalidationError),

	#[error("Subscription error: {0}")]
	Subscription(#[from] SubscriptionError),

	#[error("Reload manager has been disposed")]
	Disposed,

	#[error("Builder error: {0}")]
	Builder(String),
}
