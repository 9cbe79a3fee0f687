//! Routing module
//!
//! Longest-prefix mount table with `script_name` / `path_info` rewriting:
//! - Canonical prefix form and matching
//! - Registration, ordering and dispatch
//! - Introspection and proxy directive generation

mod matcher;
mod table;

pub use matcher::{display_prefix, match_prefix, normalize_prefix};
pub use table::{Mount, MountTable};
