//! Request and response bodies
//!
//! Write requests arrive as form-encoded field maps and go straight to the
//! domain parsers, so only query strings and responses need types here.

pub mod insured;
pub mod policy;
pub mod report;

use serde::Deserialize;

/// `?search=` on the listing endpoints
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}
