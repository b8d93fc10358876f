//! Decisions a package provider takes from version comparisons
use std::cmp::Ordering;
use std::fmt;

use crate::cache::{Fetcher, RepoQuery, VersionCache};
use crate::errors::*;
use crate::version::compare_versions;

/// What to ask the package manager for when a specific version is requested
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstallOperation {
    Install,
    Downgrade,
}

impl InstallOperation {
    /// Pick the operation that gets `package` from `installed` to `should`.
    ///
    /// Installing also upgrades, so only a request older than what is installed needs the
    /// downgrade operation.
    pub fn plan(package: &str, should: &str, installed: Option<&str>) -> Self {
        match installed {
            Some(installed) if compare_versions(should, installed) == Ordering::Less => {
                log::debug!(
                    "Downgrading package {} from version {} to {}",
                    package,
                    installed,
                    should
                );
                InstallOperation::Downgrade
            }
            _ => InstallOperation::Install,
        }
    }

    /// The package manager subcommand
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallOperation::Install => "install",
            InstallOperation::Downgrade => "downgrade",
        }
    }
}

impl fmt::Display for InstallOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The version `package` should be at when tracking the latest release.
///
/// With an update available this is its `epoch:version-release`. Without one the installed
/// version is already the latest, and a package that is not installed is an error.
pub fn latest_version<F>(
    cache: &VersionCache,
    package: &str,
    query: &RepoQuery,
    installed: Option<&str>,
    fetcher: &F,
) -> Result<String>
where
    F: Fetcher + ?Sized,
{
    match cache.latest(package, query, fetcher)? {
        Some(update) => Ok(update.evr().as_normalized_form()),
        None => installed
            .map(str::to_owned)
            .ok_or_else(|| Error::NotInstalled(package.to_owned())),
    }
}

/// Check that an install of `should` actually left `package` at that version.
///
/// A `should` without release accepts any installed release of the same version.
pub fn verify_installed(package: &str, should: &str, installed: Option<&str>) -> Result<()> {
    let installed = installed.ok_or_else(|| Error::NotInstalled(package.to_owned()))?;
    if compare_versions(should, installed) != Ordering::Equal {
        return Err(Error::VersionMismatch {
            package: package.to_owned(),
            expected: should.to_owned(),
            actual: installed.to_owned(),
        });
    }
    Ok(())
}
