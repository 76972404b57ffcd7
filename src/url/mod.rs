//! URL handling module
//!
//! This module provides link resolution against the site origin, file-name
//! derivation for downloaded media, and the site's listing pagination scheme.

mod category;
mod resolve;

// Re-export main functions
pub use category::{category_slug, page_url};
pub use resolve::{absolutize, extension_from_url, filename_from_url};
