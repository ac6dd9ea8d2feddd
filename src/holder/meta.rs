/* src/holder/meta.rs */

use std::time::Instant;

/// Metadata associated with a published value.
#[derive(Debug, Clone)]
pub struct Meta {
	/// Timestamp when the value was published.
	pub loaded_at: Instant,
	/// Version number, incremented on each publish. The first value is version 1.
	pub version: u64,
}
