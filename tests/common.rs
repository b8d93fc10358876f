use std::path::PathBuf;

use rpm_evr::{CheckUpdateOutput, RepoQuery};

pub fn check_update_el7_path() -> PathBuf {
    cargo_manifest_dir().join("test_assets/check_update_el7.txt")
}

pub fn check_update_security_path() -> PathBuf {
    cargo_manifest_dir().join("test_assets/check_update_security.txt")
}

pub fn check_update_malformed_path() -> PathBuf {
    cargo_manifest_dir().join("test_assets/check_update_malformed.txt")
}

pub fn cargo_manifest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A fetcher replaying a recorded `check-update` run
pub fn recorded_fetcher(
    status: i32,
    path: PathBuf,
) -> impl Fn(&RepoQuery) -> std::io::Result<CheckUpdateOutput> {
    move |_: &RepoQuery| -> std::io::Result<CheckUpdateOutput> {
        Ok(CheckUpdateOutput::new(
            status,
            std::fs::read_to_string(&path)?,
        ))
    }
}
