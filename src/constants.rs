//! Constants shared by the version parser and the check-update handling
//!
//! Exit codes and output markers follow the behaviour of `yum check-update`.

/// Epoch used whenever none is given or the given one is not a non-negative integer.
pub const DEFAULT_EPOCH: &str = "0";

/// Program invoked to look for updates unless the caller picks another one.
pub const DEFAULT_PACKAGE_COMMAND: &str = "yum";

/// Subcommand listing the available updates.
pub const CHECK_UPDATE_SUBCOMMAND: &str = "check-update";

/// `check-update` found updates and printed them on stdout.
pub const CHECK_UPDATE_AVAILABLE: i32 = 100;

/// `check-update` ran successfully and found nothing to update.
pub const CHECK_UPDATE_NONE: i32 = 0;

/// Tokens opening the footer sections that follow the list of updates.
///
/// A group is matched when its first token starts with one of these.
pub const CHECK_UPDATE_TRAILER_MARKERS: [&str; 3] = ["Obsoleting", "Security:", "Update"];

pub const ENABLE_REPO_FLAG: &str = "--enablerepo";
pub const DISABLE_REPO_FLAG: &str = "--disablerepo";
pub const DISABLE_EXCLUDES_FLAG: &str = "--disableexcludes";
