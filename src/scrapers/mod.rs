//! Built-in news sites.
//!
//! Each submodule implements [`Site`](crate::site::Site) for one outlet
//! section and exposes a `boxed()` constructor that the registry calls.
//!
//! # Supported Sites
//!
//! | Site | Module | Index page |
//! |------|--------|------------|
//! | ABC News (US) | [`abc_us`] | `abcnews.go.com/US` |
//! | Associated Press (US) | [`ap_us`] | `apnews.com/hub/us-news` |
//! | BBC (US & Canada) | [`bbc_us`] | `bbc.com/news/us-canada` |
//! | CNN Lite | [`cnn`] | `lite.cnn.com` |
//!
//! Adding a site means adding a module here and an entry to [`BUILTIN`].

use crate::registry::Registration;

pub mod abc_us;
pub mod ap_us;
pub mod bbc_us;
pub mod cnn;

/// Every site compiled into the binary, in discovery order.
pub const BUILTIN: &[Registration] = &[
    Registration::new("abc_us", abc_us::AbcUs::boxed),
    Registration::new("ap_us", ap_us::ApUs::boxed),
    Registration::new("bbc_us", bbc_us::BbcUs::boxed),
    Registration::new("cnn", cnn::CnnLite::boxed),
];
