/* src/loader/tree.rs */

//!
//! Merged configuration tree and section binding.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{BindingError, LoadInfo};

/// Separator between segments of a section path, e.g. `web:bundling`.
pub const SECTION_SEPARATOR: char = ':';

/// The result of merging every configuration layer, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
	root: Map<String, Value>,
	origins: Vec<LoadInfo>,
}

impl ConfigTree {
	/// Creates an empty tree.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a tree from a single JSON object. Non-object values yield an empty tree.
	pub fn from_value(value: Value) -> Self {
		let mut tree = Self::new();
		tree.merge(value);
		tree
	}

	/// Deep-merges `layer` over the current contents.
	///
	/// Objects are merged key by key; any other value replaces what was there.
	pub fn merge(&mut self, layer: Value) {
		if let Value::Object(map) = layer {
			merge_maps(&mut self.root, map);
		}
	}

	pub(crate) fn record_origin(&mut self, info: LoadInfo) {
		self.origins.push(info);
	}

	/// Layers that contributed to this tree, in merge order.
	pub fn origins(&self) -> &[LoadInfo] {
		&self.origins
	}

	/// Looks up a section by `:`-separated path. Segments match by [`normalize_key`].
	pub fn section(&self, path: &str) -> Option<&Value> {
		let mut segments = path
			.split(SECTION_SEPARATOR)
			.map(str::trim)
			.filter(|s| !s.is_empty());

		let first = segments.next()?;
		let mut current = lookup(&self.root, first)?;
		for segment in segments {
			match current {
				Value::Object(map) => current = lookup(map, segment)?,
				_ => return None,
			}
		}
		Some(current)
	}

	/// Binds a section to `T`.
	///
	/// A missing (or `null`) section binds `T::default()`, leaving every field unset.
	pub fn bind<T>(&self, path: &str) -> Result<T, BindingError>
	where
		T: DeserializeOwned + Default,
	{
		match self.section(path) {
			None | Some(Value::Null) => Ok(T::default()),
			Some(value) => T::deserialize(value).map_err(|source| BindingError::Bind {
				section: path.to_string(),
				source,
			}),
		}
	}
}

/// Canonical form of a configuration key: ASCII-lowercased with `_` and `-` removed.
///
/// Keys with the same canonical form name the same setting, both when layers
/// are merged and when sections are bound.
pub fn normalize_key(key: &str) -> String {
	key.chars()
		.filter(|c| *c != '_' && *c != '-')
		.map(|c| c.to_ascii_lowercase())
		.collect()
}

fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
	map.get(key).or_else(|| {
		let wanted = normalize_key(key);
		map.iter()
			.find(|(k, _)| normalize_key(k) == wanted)
			.map(|(_, v)| v)
	})
}

fn merge_maps(target: &mut Map<String, Value>, layer: Map<String, Value>) {
	for (key, value) in layer {
		// Overrides keep the spelling of the first layer that introduced the key.
		let wanted = normalize_key(&key);
		let existing_key = target
			.keys()
			.find(|k| normalize_key(k) == wanted)
			.cloned()
			.unwrap_or(key);

		match value {
			Value::Object(incoming) => {
				if let Some(Value::Object(current)) = target.get_mut(&existing_key) {
					merge_maps(current, incoming);
				} else {
					target.insert(existing_key, Value::Object(incoming));
				}
			}
			other => {
				target.insert(existing_key, other);
			}
		}
	}
}
