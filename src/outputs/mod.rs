//! Emission of the aggregate.
//!
//! # Submodules
//!
//! - [`json`]: writes the debug artifact (`articles.json` by default)
//! - [`delivery`]: posts the aggregate to the backend's `/api/articles`

pub mod delivery;
pub mod json;
