/* src/signal/token.rs */

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use super::{ReloadNotice, SubscriptionError};

/// Default number of notices buffered per token before older ones are coalesced.
pub const DEFAULT_NOTICE_CAPACITY: usize = 16;

/// Fires reload notices to every subscribed [`ReloadToken`].
pub struct ChangeNotifier {
	sender: Mutex<Option<broadcast::Sender<ReloadNotice>>>,
	sequence: AtomicU64,
}

impl ChangeNotifier {
	pub fn new() -> Self {
		Self::with_capacity(DEFAULT_NOTICE_CAPACITY)
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			sender: Mutex::new(Some(broadcast::channel(capacity.max(1)).0)),
			sequence: AtomicU64::new(0),
		}
	}

	/// Registers a new token. Fails once the notifier is closed.
	pub fn subscribe(&self) -> Result<ReloadToken, SubscriptionError> {
		let guard = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
		let sender = guard.as_ref().ok_or(SubscriptionError::Closed)?;
		Ok(ReloadToken {
			rx: sender.subscribe(),
		})
	}

	/// Fires one notice. Returns its sequence number, or `None` if the notifier is closed.
	pub fn notify(&self, paths: Vec<PathBuf>) -> Option<u64> {
		let guard = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
		let sender = guard.as_ref()?;
		let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
		// No live tokens is not an error.
		let _ = sender.send(ReloadNotice { sequence, paths });
		Some(sequence)
	}

	/// Closes the notifier. Live tokens drain what is buffered, then end.
	pub fn close(&self) {
		self.sender
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.take();
	}

	pub fn is_closed(&self) -> bool {
		self.sender
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.is_none()
	}

	/// Number of live tokens.
	pub fn subscriber_count(&self) -> usize {
		self.sender
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.as_ref()
			.map_or(0, broadcast::Sender::receiver_count)
	}
}

impl Default for ChangeNotifier {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for ChangeNotifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ChangeNotifier")
			.field("sequence", &self.sequence.load(Ordering::SeqCst))
			.field("closed", &self.is_closed())
			.finish()
	}
}

/// A subscription to reload notices.
///
/// Dropping the token releases the subscription.
#[derive(Debug)]
pub struct ReloadToken {
	rx: broadcast::Receiver<ReloadNotice>,
}

impl ReloadToken {
	/// Waits for the next notice. Returns `None` once the notifier is closed.
	///
	/// If the token fell behind, the notices it missed are collapsed into the
	/// oldest one still buffered: a reload re-reads the whole source anyway.
	pub async fn changed(&mut self) -> Option<ReloadNotice> {
		loop {
			match self.rx.recv().await {
				Ok(notice) => return Some(notice),
				Err(RecvError::Lagged(skipped)) => {
					tracing::debug!(skipped, "Reload token lagged, coalescing notices");
				}
				Err(RecvError::Closed) => return None,
			}
		}
	}

	/// Converts the token into a `Stream` of notices.
	#[cfg(feature = "stream")]
	pub fn into_stream(self) -> ReloadStream {
		ReloadStream {
			inner: tokio_stream::wrappers::BroadcastStream::new(self.rx),
		}
	}
}

/// Stream of reload notices; lagged gaps are skipped.
#[cfg(feature = "stream")]
pub struct ReloadStream {
	inner: tokio_stream::wrappers::BroadcastStream<ReloadNotice>,
}

#[cfg(feature = "stream")]
impl futures_util::Stream for ReloadStream {
	type Item = ReloadNotice;

	fn poll_next(
		mut self: std::pin::Pin<&mut Self>,
		cx: &mut std::task::Context<'_>,
	) -> std::task::Poll<Option<Self::Item>> {
		use futures_util::Stream as _;
		use std::task::Poll;

		loop {
			match std::pin::Pin::new(&mut self.inner).poll_next(cx) {
				Poll::Ready(Some(Ok(notice))) => return Poll::Ready(Some(notice)),
				Poll::Ready(Some(Err(_lagged))) => continue,
				Poll::Ready(None) => return Poll::Ready(None),
				Poll::Pending => return Poll::Pending,
			}
		}
	}
}
