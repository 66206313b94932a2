//! URL handling for targets and discovered links
//!
//! This module provides:
//! - Target validation (absolute HTTP/HTTPS URLs only)
//! - Site-key normalization (`scheme://host/`) used by the handler registry
//! - Canonicalization of discovered article links

mod canonical;
mod site;
mod target;

pub use canonical::canonicalize_link;
pub use site::site_key;
pub use target::parse_target;
