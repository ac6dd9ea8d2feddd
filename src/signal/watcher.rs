/* src/signal/watcher.rs */

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::worker::debounce_events;
use super::{ChangeNotifier, SignalError};

/// What to watch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WatchTarget {
	/// A single configuration file.
	File(PathBuf),
	/// Every (non-hidden) file below a directory, recursively.
	Directory(PathBuf),
}

/// Watcher behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
	/// Quiet period after the last raw event before a notice is fired.
	pub debounce: Duration,
	/// Whether to ignore hidden files (dotfiles) in directory targets.
	pub ignore_hidden: bool,
}

impl Default for WatchConfig {
	fn default() -> Self {
		Self {
			debounce: Duration::from_millis(300),
			ignore_hidden: true,
		}
	}
}

/// Turns filesystem changes into reload notices.
///
/// A burst of raw events (editors often write, rename and touch in quick
/// succession) produces a single notice once the target has been quiet for
/// [`WatchConfig::debounce`].
pub struct Watcher {
	_internal_watcher: RecommendedWatcher,
	task_handle: JoinHandle<()>,
	target: WatchTarget,
}

/// Resolved form of a [`WatchTarget`] used for matching raw event paths.
#[derive(Debug)]
pub(crate) enum Matcher {
	File(PathBuf),
	Directory { root: PathBuf, ignore_hidden: bool },
}

impl Matcher {
	pub(crate) fn matches(&self, path: &Path) -> bool {
		match self {
			Matcher::File(file) => path == file,
			Matcher::Directory {
				root,
				ignore_hidden,
			} => {
				let Ok(relative) = path.strip_prefix(root) else {
					return false;
				};
				!*ignore_hidden
					|| !relative.components().any(|c| {
						c.as_os_str()
							.to_str()
							.is_some_and(|s| s.starts_with('.') && s != "." && s != "..")
					})
			}
		}
	}
}

impl Watcher {
	/// Starts watching `target` and firing notices on `notifier`.
	///
	/// Must be called from within a tokio runtime.
	#[must_use = "Watcher must be kept alive"]
	pub fn new(
		target: WatchTarget,
		config: WatchConfig,
		notifier: Arc<ChangeNotifier>,
	) -> Result<Self, SignalError> {
		let runtime = tokio::runtime::Handle::try_current()?;

		let (watch_path, mode, matcher) = match &target {
			WatchTarget::File(p) => {
				let file = canonical_file(p)?;
				let parent = file
					.parent()
					.map(Path::to_path_buf)
					.ok_or_else(|| SignalError::Config(format!("File has no parent: {:?}", p)))?;
				(parent, RecursiveMode::NonRecursive, Matcher::File(file))
			}
			WatchTarget::Directory(p) => {
				let root = std::fs::canonicalize(p).map_err(|_| {
					SignalError::Config(format!("Path does not exist: {:?}", p))
				})?;
				(
					root.clone(),
					RecursiveMode::Recursive,
					Matcher::Directory {
						root,
						ignore_hidden: config.ignore_hidden,
					},
				)
			}
		};

		let (raw_tx, raw_rx) = mpsc::channel(100);

		let mut internal_watcher =
			notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
				let _ = raw_tx.blocking_send(res);
			})?;
		internal_watcher.watch(&watch_path, mode)?;

		let task_handle = runtime.spawn(debounce_events(raw_rx, notifier, matcher, config.debounce));

		tracing::info!(path = ?watch_path, "Config watcher started");

		Ok(Self {
			_internal_watcher: internal_watcher,
			task_handle,
			target,
		})
	}

	pub fn target(&self) -> &WatchTarget {
		&self.target
	}

	pub fn stop(&self) {
		self.task_handle.abort();
	}
}

impl Drop for Watcher {
	fn drop(&mut self) {
		self.task_handle.abort();
	}
}

impl std::fmt::Debug for Watcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Watcher")
			.field("target", &self.target)
			.finish_non_exhaustive()
	}
}

/// Canonical path of a file that may not exist yet (its parent must).
fn canonical_file(path: &Path) -> Result<PathBuf, SignalError> {
	if let Ok(canonical) = std::fs::canonicalize(path) {
		return Ok(canonical);
	}
	let missing = || SignalError::Config(format!("Path does not exist: {:?}", path));
	let name = path.file_name().ok_or_else(missing)?;
	let parent = match path.parent() {
		Some(p) if !p.as_os_str().is_empty() => p,
		_ => Path::new("."),
	};
	let parent = std::fs::canonicalize(parent).map_err(|_| missing())?;
	Ok(parent.join(name))
}
