//! Parsing of `yum check-update` output
//!
//! The command prints a banner, a blank line, and then one `name.arch [epoch:]version-release repo`
//! entry per available update, followed by optional footer sections:
//!
//! ```text
//! Loaded plugins: fastestmirror
//!
//! bash.x86_64                 4.2.46-35.el7_9          updates
//! kernel.x86_64               3.10.0-1160.119.1.el7    updates
//! Obsoleting Packages
//! ...
//! ```
use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use nom::character::complete::{char, digit1};
use nom::sequence::terminated;
use nom::{IResult, Parser};

use crate::constants::{CHECK_UPDATE_TRAILER_MARKERS, DEFAULT_EPOCH};
use crate::errors::*;
use crate::version::Nevra;

/// Available updates, looked up by bare package name or by `name.arch`.
///
/// yum treats both forms as mostly interchangeable, so every update is listed under both keys.
/// Within one key the updates keep the order in which the command printed them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateTable {
    packages: HashMap<String, Vec<Arc<Nevra<'static>>>>,
}

impl UpdateTable {
    /// An empty table, as produced when no updates are available
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the stdout of a `check-update` run that reported available updates.
    ///
    /// Everything up to the first blank line is banner and skipped; without a blank line there
    /// is nothing to parse. Parsing stops at the first footer section. An entry that does not
    /// look like `name.arch [epoch:]version-release repo` fails the whole parse, since it means
    /// the output format is not the one understood here.
    pub fn parse(output: &str) -> Result<Self> {
        let mut table = UpdateTable::new();

        let Some(body) = strip_banner(output) else {
            log::debug!("check-update output has no blank line after its banner");
            return Ok(table);
        };

        let mut entries = body.split_whitespace().tuples::<(_, _, _)>();
        for (nevra, evr, repo) in entries.by_ref() {
            if is_trailer(nevra) {
                log::trace!("reached check-update footer at `{}`", nevra);
                return Ok(table);
            }
            let update = parse_update(nevra, evr)?;
            log::trace!("update {} available from {}", update, repo);
            table.insert(update.into_owned());
        }

        // the repo column is not needed, so a last entry without one is still an update
        let leftover = entries.into_buffer().collect::<Vec<_>>();
        match leftover.as_slice() {
            [first, ..] if is_trailer(first) => {}
            [nevra, evr] => {
                let update = parse_update(nevra, evr)?;
                log::trace!("update {} available without a repo column", update);
                table.insert(update.into_owned());
            }
            [entry] => return Err(Error::TruncatedUpdate((*entry).to_owned())),
            _ => {}
        }
        Ok(table)
    }

    /// Add an update under both its bare and its arch-qualified name
    pub fn insert(&mut self, update: Nevra<'static>) {
        let update = Arc::new(update);
        self.packages
            .entry(update.name().to_owned())
            .or_default()
            .push(Arc::clone(&update));
        self.packages
            .entry(update.qualified_name())
            .or_default()
            .push(update);
    }

    /// All updates listed for `package`, in output order
    pub fn get(&self, package: &str) -> Option<&[Arc<Nevra<'static>>]> {
        self.packages.get(package).map(Vec::as_slice)
    }

    /// The first update listed for `package`.
    ///
    /// When a bare name matches several architectures, the first one printed wins.
    pub fn latest(&self, package: &str) -> Option<&Arc<Nevra<'static>>> {
        self.get(package).and_then(|updates| updates.first())
    }

    /// Number of lookup keys, bare and arch-qualified names both count
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Skip everything up to and including the first whitespace-only line.
fn strip_banner(output: &str) -> Option<&str> {
    let mut offset = 0;
    for line in output.split_inclusive('\n') {
        offset += line.len();
        if line.ends_with('\n') && line.trim().is_empty() {
            return Some(&output[offset..]);
        }
    }
    None
}

fn is_trailer(token: &str) -> bool {
    CHECK_UPDATE_TRAILER_MARKERS
        .iter()
        .any(|marker| token.starts_with(marker))
}

fn parse_update<'a>(nevra: &'a str, evr: &'a str) -> Result<Nevra<'a>> {
    let malformed = |reason| Error::MalformedUpdate {
        entry: format!("{} {}", nevra, evr),
        reason,
    };

    let (name, arch) = nevra
        .rsplit_once('.')
        .filter(|(name, arch)| !name.is_empty() && !arch.is_empty())
        .ok_or_else(|| malformed("package is not of the form name.arch"))?;
    let (epoch, version, release) = parse_feed_evr(evr)
        .ok_or_else(|| malformed("version is not of the form [epoch:]version-release"))?;

    Ok(Nevra::new(name, epoch, version, release, arch))
}

fn epoch_prefix(input: &str) -> IResult<&str, &str> {
    terminated(digit1, char(':')).parse(input)
}

/// Read `[epoch:]version-release` where version and release are both non-empty.
///
/// A leading `digits:` is only taken as the epoch when the rest still holds a version and a
/// release; otherwise the whole token is read as `version-release` with the default epoch.
fn parse_feed_evr(evr: &str) -> Option<(&str, &str, &str)> {
    if let Ok((vr, epoch)) = epoch_prefix(evr) {
        if let Some((version, release)) = split_version_release(vr) {
            return Some((epoch, version, release));
        }
    }
    split_version_release(evr).map(|(version, release)| (DEFAULT_EPOCH, version, release))
}

/// Split at the last `-` that leaves both sides non-empty.
fn split_version_release(vr: &str) -> Option<(&str, &str)> {
    let (last, _) = vr.char_indices().next_back()?;
    let dash = vr[..last].rfind('-').filter(|&dash| dash > 0)?;
    Some((&vr[..dash], &vr[dash + 1..]))
}
