//! Assembles the set of sites scraped in one run.
//!
//! Sites are registered explicitly: each [`Registration`] pairs a name with a
//! constructor. [`Registry::discover`] calls every constructor that is not
//! excluded. A constructor that fails or panics is logged and left out; the
//! rest of discovery carries on.

use std::panic::{self, AssertUnwindSafe};

use itertools::Itertools;
use tracing::{error, info, instrument, warn};

use crate::error::ScrapeError;
use crate::scrapers;
use crate::site::Site;

/// Builds one site. Must only set static configuration.
pub type SiteFactory = fn() -> Result<Box<dyn Site>, ScrapeError>;

/// A named site constructor.
#[derive(Debug, Clone, Copy)]
pub struct Registration {
    pub name: &'static str,
    pub factory: SiteFactory,
}

impl Registration {
    pub const fn new(name: &'static str, factory: SiteFactory) -> Self {
        Self { name, factory }
    }
}

/// The list of sites available to a run.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    registrations: Vec<Registration>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in site.
    pub fn builtin() -> Self {
        Self {
            registrations: scrapers::BUILTIN.to_vec(),
        }
    }

    /// Add a site constructor.
    pub fn register(mut self, name: &'static str, factory: SiteFactory) -> Self {
        self.registrations.push(Registration::new(name, factory));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.registrations.iter().map(|r| r.name).collect()
    }

    /// Instantiate every registered site not named in `excluded`.
    ///
    /// An exclusion matches a registration name or a site's source name,
    /// case-insensitively. Sites are returned in registration order.
    #[instrument(level = "info", skip_all, fields(registered = self.registrations.len()))]
    pub fn discover(&self, excluded: &[String]) -> Vec<Box<dyn Site>> {
        let is_excluded = |name: &str| excluded.iter().any(|e| e.eq_ignore_ascii_case(name));

        let mut sites = Vec::with_capacity(self.registrations.len());
        for registration in &self.registrations {
            if is_excluded(registration.name) {
                info!(site = registration.name, "Site excluded");
                continue;
            }

            match panic::catch_unwind(AssertUnwindSafe(registration.factory)) {
                Ok(Ok(site)) if is_excluded(&site.identity().source) => {
                    info!(site = registration.name, source = %site.identity().source, "Site excluded");
                }
                Ok(Ok(site)) => {
                    info!(site = registration.name, identity = %site.identity(), "Loaded site");
                    sites.push(site);
                }
                Ok(Err(e)) => {
                    error!(site = registration.name, error = %e, "Failed to load site; skipping");
                }
                Err(_) => {
                    error!(site = registration.name, "Site constructor panicked; skipping");
                }
            }
        }

        for identity in sites.iter().map(|s| s.identity().clone()).duplicates() {
            warn!(%identity, "Multiple sites share the same identity");
        }

        info!(count = sites.len(), "Discovered sites");
        sites
    }
}
