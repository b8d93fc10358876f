//! # rpm-evr
//!
//! RPM version ordering and `yum check-update` parsing.
//!
//! Versions are compared exactly like rpm's `rpmvercmp()`, quirks included, and a requested
//! version without release matches any installed release of the same version. The output of
//! `check-update` is parsed into per-package update lists, cached per repository selection.
//!
//! # Example
//!
//! ```rust
//! use std::cmp::Ordering;
//! use rpm_evr::{CheckUpdateOutput, InstallOperation, RepoQuery, VersionCache};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! assert_eq!(Ordering::Less, rpm_evr::rpmvercmp("1.0~rc1", "1.0"));
//! assert_eq!(Ordering::Equal, rpm_evr::compare_versions("1.2", "1.2-5.el7"));
//! assert_eq!(
//!     InstallOperation::Downgrade,
//!     InstallOperation::plan("bash", "4.2.45", Some("4.2.46-34.el7"))
//! );
//!
//! // the fetcher is where `yum check-update` would actually be run
//! let fetcher = |query: &RepoQuery| -> std::io::Result<CheckUpdateOutput> {
//!     assert_eq!(
//!         vec!["yum", "check-update", "--enablerepo=updates"],
//!         query.check_update_args("yum")
//!     );
//!     Ok(CheckUpdateOutput::new(
//!         100,
//!         "Loaded plugins: fastestmirror\n\nbash.x86_64 4.2.46-35.el7_9 updates\n",
//!     ))
//! };
//!
//! let cache = VersionCache::new();
//! let query = RepoQuery::new().enable_repo("updates");
//! let update = cache.latest("bash", &query, &fetcher)?.ok_or("no update for bash")?;
//! assert_eq!("0:4.2.46-35.el7_9", update.evr().as_normalized_form());
//! # Ok(())
//! # }
//! ```

#![allow(unknown_lints, clippy::uninlined_format_args)]

mod errors;
pub use crate::errors::*;

mod constants;
pub use crate::constants::*;

mod version;
pub use crate::version::*;

mod updates;
pub use crate::updates::*;

mod cache;
pub use crate::cache::*;

mod provider;
pub use crate::provider::*;
