/* src/options/provider.rs */

use std::path::{Component, Path, PathBuf};

/// Access to the asset files the bundler reads.
///
/// Only the identity of a provider matters to option resolution; providers are
/// never compared when deciding whether cached artifacts are stale.
pub trait FileProvider: Send + Sync + std::fmt::Debug {
	/// Maps a request-relative path to a location the bundler can read.
	///
	/// Returns `None` if the path escapes the provider or is not served by it.
	fn resolve(&self, subpath: &str) -> Option<PathBuf>;
}

/// Serves files below a root directory.
#[derive(Debug, Clone)]
pub struct PhysicalFileProvider {
	root: PathBuf,
}

impl PhysicalFileProvider {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}
}

impl FileProvider for PhysicalFileProvider {
	fn resolve(&self, subpath: &str) -> Option<PathBuf> {
		let relative = Path::new(subpath.trim_start_matches('/'));
		let escapes = relative
			.components()
			.any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
		if escapes {
			return None;
		}
		Some(self.root.join(relative))
	}
}

/// Serves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFileProvider;

impl FileProvider for NullFileProvider {
	fn resolve(&self, _subpath: &str) -> Option<PathBuf> {
		None
	}
}
