//! URL policy module for KB-Linkcheck
//!
//! This module holds the pure predicates applied to candidate URLs:
//! - the exclusion policy deciding which links are extracted and verified
//! - the attachment test marking links that open an embedded document viewer
//! - the login-redirect test applied to the final URL of a navigation

mod exclusion;
mod matcher;

pub use exclusion::{is_excluded, EXCLUDED_KEYWORDS};
pub use matcher::{is_attachment, is_auth_redirect};
