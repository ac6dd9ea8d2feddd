/* src/signal/worker.rs */

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use super::ChangeNotifier;
use super::watcher::Matcher;

struct Pending {
	last_seen: Instant,
	paths: BTreeSet<PathBuf>,
}

pub(crate) async fn debounce_events(
	mut raw_rx: mpsc::Receiver<notify::Result<notify::Event>>,
	notifier: Arc<ChangeNotifier>,
	matcher: Matcher,
	debounce: Duration,
) {
	let mut pending: Option<Pending> = None;

	loop {
		let deadline = pending.as_ref().map(|p| p.last_seen + debounce);

		tokio::select! {
			maybe_event = raw_rx.recv() => {
				match maybe_event {
					Some(Ok(event)) => record(event, &mut pending, &matcher),
					Some(Err(e)) => tracing::error!("Notify error: {:?}", e),
					None => break,
				}
			}
			_ = quiet_until(deadline) => {
				if let Some(batch) = pending.take() {
					let paths: Vec<PathBuf> = batch.paths.into_iter().collect();
					tracing::debug!(?paths, "Config change settled, firing reload notice");
					if notifier.notify(paths).is_none() {
						break;
					}
				}
			}
		}
	}
}

async fn quiet_until(deadline: Option<Instant>) {
	match deadline {
		Some(deadline) => tokio::time::sleep_until(deadline).await,
		None => std::future::pending().await,
	}
}

fn record(event: notify::Event, pending: &mut Option<Pending>, matcher: &Matcher) {
	use notify::EventKind as NK;
	if !matches!(event.kind, NK::Create(_) | NK::Modify(_) | NK::Remove(_)) {
		return;
	}

	for path in event.paths {
		if !matcher.matches(&path) {
			continue;
		}
		let batch = pending.get_or_insert_with(|| Pending {
			last_seen: Instant::now(),
			paths: BTreeSet::new(),
		});
		batch.last_seen = Instant::now();
		batch.paths.insert(path);
	}
}
