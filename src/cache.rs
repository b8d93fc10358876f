use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::constants::*;
use crate::errors::*;
use crate::updates::UpdateTable;
use crate::version::Nevra;

/// The repository selection a `check-update` run is made with.
///
/// Also the key of [`VersionCache`]. Lists are kept in the order they were given and compared
/// as-is, so the same repositories listed in another order make a different key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RepoQuery {
    enable_repos: Vec<String>,
    disable_repos: Vec<String>,
    disable_excludes: Vec<String>,
}

impl RepoQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable_repo(mut self, repo: impl Into<String>) -> Self {
        self.enable_repos.push(repo.into());
        self
    }

    pub fn disable_repo(mut self, repo: impl Into<String>) -> Self {
        self.disable_repos.push(repo.into());
        self
    }

    /// Ignore the `exclude=` settings of `repo` (or `all`, `main`)
    pub fn disable_excludes(mut self, repo: impl Into<String>) -> Self {
        self.disable_excludes.push(repo.into());
        self
    }

    /// Repositories passed with `--enablerepo`, in call order
    pub fn enabled_repos(&self) -> &[String] {
        &self.enable_repos
    }

    /// Repositories passed with `--disablerepo`, in call order
    pub fn disabled_repos(&self) -> &[String] {
        &self.disable_repos
    }

    /// Repositories whose excludes are ignored via `--disableexcludes`
    pub fn disabled_excludes(&self) -> &[String] {
        &self.disable_excludes
    }

    /// The command line listing updates for this selection, `program` first.
    pub fn check_update_args(&self, program: &str) -> Vec<String> {
        let flags = [
            (ENABLE_REPO_FLAG, &self.enable_repos),
            (DISABLE_REPO_FLAG, &self.disable_repos),
            (DISABLE_EXCLUDES_FLAG, &self.disable_excludes),
        ];

        let mut args = vec![program.to_owned(), CHECK_UPDATE_SUBCOMMAND.to_owned()];
        for (flag, repos) in flags {
            args.extend(repos.iter().map(|repo| format!("{}={}", flag, repo)));
        }
        args
    }
}

/// Exit status and stdout of a finished `check-update` run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckUpdateOutput {
    pub status: i32,
    pub stdout: String,
}

impl CheckUpdateOutput {
    pub fn new(status: i32, stdout: impl Into<String>) -> Self {
        Self {
            status,
            stdout: stdout.into(),
        }
    }

    /// Interpret the run.
    ///
    /// Status 100 means updates are listed on stdout, 0 means there are none. Any other status
    /// is logged and treated as if there were no updates.
    pub fn into_table(self) -> Result<UpdateTable> {
        match self.status {
            CHECK_UPDATE_AVAILABLE => UpdateTable::parse(&self.stdout),
            CHECK_UPDATE_NONE => {
                log::debug!("check-update exited with 0; no package updates available");
                Ok(UpdateTable::new())
            }
            status => {
                log::warn!(
                    "Could not check for updates, check-update exited with {}",
                    status
                );
                Ok(UpdateTable::new())
            }
        }
    }
}

/// Runs `check-update` for a repository selection.
///
/// Implemented for any `Fn(&RepoQuery) -> io::Result<CheckUpdateOutput>`.
pub trait Fetcher {
    fn check_update(&self, query: &RepoQuery) -> io::Result<CheckUpdateOutput>;
}

impl<F> Fetcher for F
where
    F: Fn(&RepoQuery) -> io::Result<CheckUpdateOutput>,
{
    fn check_update(&self, query: &RepoQuery) -> io::Result<CheckUpdateOutput> {
        self(query)
    }
}

/// Parsed `check-update` results, one table per [`RepoQuery`].
///
/// A table is fetched the first time its query is seen and kept until [`VersionCache::reset`].
/// The lock is held while fetching, so concurrent lookups of the same query run the command once.
#[derive(Debug, Default)]
pub struct VersionCache {
    tables: Mutex<HashMap<RepoQuery, Arc<UpdateTable>>>,
}

impl VersionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_tables(&self) -> Result<MutexGuard<'_, HashMap<RepoQuery, Arc<UpdateTable>>>> {
        self.tables.lock().map_err(|_| Error::CachePoisoned)
    }

    /// The update table for `query`, fetched through `fetcher` on a miss.
    ///
    /// A fetch or parse failure is returned and nothing is stored, so the next lookup tries
    /// again.
    pub fn updates<F>(&self, query: &RepoQuery, fetcher: &F) -> Result<Arc<UpdateTable>>
    where
        F: Fetcher + ?Sized,
    {
        let mut tables = self.lock_tables()?;
        if let Some(table) = tables.get(query) {
            log::trace!("using cached updates for {:?}", query);
            return Ok(Arc::clone(table));
        }

        log::debug!("checking for updates with {:?}", query);
        let table = Arc::new(fetcher.check_update(query)?.into_table()?);
        tables.insert(query.clone(), Arc::clone(&table));
        Ok(table)
    }

    /// The newest available version of `package`, if there is one.
    ///
    /// `package` may be a bare name or `name.arch`. A bare name that has updates for several
    /// architectures resolves to whichever was listed first.
    pub fn latest<F>(
        &self,
        package: &str,
        query: &RepoQuery,
        fetcher: &F,
    ) -> Result<Option<Arc<Nevra<'static>>>>
    where
        F: Fetcher + ?Sized,
    {
        let table = self.updates(query, fetcher)?;
        Ok(table.latest(package).cloned())
    }

    /// Forget every cached table
    pub fn reset(&self) {
        match self.tables.lock() {
            Ok(mut tables) => tables.clear(),
            Err(poisoned) => {
                poisoned.into_inner().clear();
                self.tables.clear_poison();
            }
        }
    }
}
