/* tests/signal_tests.rs */

use std::path::PathBuf;
use std::time::Duration;

use bundle_live::signal::{ChangeNotifier, SubscriptionError};

#[tokio::test]
async fn test_notice_reaches_every_token() {
	let notifier = ChangeNotifier::new();
	let mut first = notifier.subscribe().unwrap();
	let mut second = notifier.subscribe().unwrap();
	assert_eq!(notifier.subscriber_count(), 2);

	let seq = notifier.notify(vec![PathBuf::from("appsettings.json")]);
	assert_eq!(seq, Some(1));

	let a = first.changed().await.unwrap();
	let b = second.changed().await.unwrap();
	assert_eq!(a.sequence, 1);
	assert_eq!(b.paths, vec![PathBuf::from("appsettings.json")]);
}

#[tokio::test]
async fn test_notify_without_tokens_still_counts() {
	let notifier = ChangeNotifier::new();
	assert_eq!(notifier.notify(Vec::new()), Some(1));
	assert_eq!(notifier.notify(Vec::new()), Some(2));
}

#[tokio::test]
async fn test_lagged_token_coalesces() {
	let notifier = ChangeNotifier::with_capacity(2);
	let mut token = notifier.subscribe().unwrap();
	for _ in 0..5 {
		notifier.notify(Vec::new());
	}

	// The three oldest notices were overwritten; the token resumes at the oldest kept.
	let notice = token.changed().await.unwrap();
	assert_eq!(notice.sequence, 4);
	assert_eq!(token.changed().await.unwrap().sequence, 5);
}

#[tokio::test]
async fn test_close_ends_tokens() {
	let notifier = ChangeNotifier::new();
	let mut token = notifier.subscribe().unwrap();
	notifier.notify(Vec::new());
	notifier.close();

	assert!(notifier.is_closed());
	assert_eq!(notifier.notify(Vec::new()), None);
	assert!(matches!(
		notifier.subscribe(),
		Err(SubscriptionError::Closed)
	));

	// Buffered notices drain before the token ends.
	assert!(token.changed().await.is_some());
	let ended = tokio::time::timeout(Duration::from_secs(1), token.changed())
		.await
		.unwrap();
	assert!(ended.is_none());
}

#[tokio::test]
async fn test_dropped_token_releases_subscription() {
	let notifier = ChangeNotifier::new();
	let token = notifier.subscribe().unwrap();
	assert_eq!(notifier.subscriber_count(), 1);
	drop(token);
	assert_eq!(notifier.subscriber_count(), 0);
}

#[cfg(feature = "stream")]
#[tokio::test]
async fn test_token_stream() {
	use futures_util::StreamExt;

	let notifier = ChangeNotifier::new();
	let stream = notifier.subscribe().unwrap().into_stream();
	notifier.notify(vec![PathBuf::from("a.toml")]);
	notifier.notify(vec![PathBuf::from("b.toml")]);
	notifier.close();

	let seqs: Vec<u64> = stream.map(|n| n.sequence).collect().await;
	assert_eq!(seqs, vec![1, 2]);
}
