//! Scrape news sites and collect their articles for the news compiler backend.
//!
//! The crate is organised around a site contract and the pass that drives it:
//!
//! - [`models`]: [`Category`](models::Category), [`Article`](models::Article) and its
//!   canonical [`ArticleRecord`](models::ArticleRecord)
//! - [`site`]: the [`Site`](site::Site) trait and the per-site scrape pipeline
//! - [`scrapers`]: the built-in sites
//! - [`registry`]: explicit registration and discovery of sites
//! - [`orchestrator`]: runs every site with failure isolation and emits the aggregate
//! - [`outputs`]: the debug artifact and backend delivery
//! - [`http`]: page retrieval

pub mod error;
pub mod http;
pub mod models;
pub mod orchestrator;
pub mod outputs;
pub mod registry;
pub mod scrapers;
pub mod site;
pub mod utils;

#[cfg(test)]
mod testing;
