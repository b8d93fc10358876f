use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use crate::constants::DEFAULT_EPOCH;

/// A package as reported by `check-update`: Name, Epoch, Version, Release and Architecture.
///
/// Unlike a bare [`Evr`], every component is always present. The release in particular is
/// mandatory, the feed never lists a package without one.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Nevra<'a> {
    name: Cow<'a, str>,
    evr: Evr<'a>,
    arch: Cow<'a, str>,
}

impl<'a> Nevra<'a> {
    /// Create a new NEVRA
    pub fn new<T: Into<Cow<'a, str>>>(
        name: T,
        epoch: T,
        version: T,
        release: T,
        arch: T,
    ) -> Nevra<'a> {
        Self {
            name: name.into(),
            evr: Evr::new(epoch, version, Some(release)),
            arch: arch.into(),
        }
    }

    /// The name value
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The EVR
    pub fn evr(&self) -> &Evr<'a> {
        &self.evr
    }

    /// The epoch value
    pub fn epoch(&self) -> &str {
        self.evr.epoch()
    }

    /// The version value
    pub fn version(&self) -> &str {
        self.evr.version()
    }

    /// The release value
    pub fn release(&self) -> &str {
        self.evr.release().unwrap_or_default()
    }

    /// The arch value
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// The `name.arch` form under which yum also knows this package
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.name, self.arch)
    }

    /// Write an NEVRA string in a normalized form which always includes an epoch
    pub fn as_normalized_form(&self) -> String {
        format!(
            "{}-{}.{}",
            self.name,
            self.evr.as_normalized_form(),
            self.arch
        )
    }

    /// Detach from the buffer the values were parsed out of
    pub fn into_owned(self) -> Nevra<'static> {
        Nevra {
            name: Cow::Owned(self.name.into_owned()),
            evr: self.evr.into_owned(),
            arch: Cow::Owned(self.arch.into_owned()),
        }
    }
}

impl fmt::Display for Nevra<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}.{}", self.name, self.evr, self.arch)
    }
}

/// An RPM "version" specifier made of Epoch, Version and an optional Release.
///
/// Epoch overrides all other fields and is generally only used as a last resort - in cases where
/// a change to the versioning scheme or packaging error creates a situation where newer packages
/// might otherwise sort as being older.
///
/// Version is the normal version string used by the upstream project.
///
/// Release counts the rebuilds of one upstream version and often carries the distribution
/// tag (el7, fc38). A requested version may leave it out, in which case it is `None` - which
/// is not the same as an empty release. See [`Evr::compare_to`] for what that changes.
///
/// Including ~ in a version denotes a pre-release and forces it to sort before the same
/// version without it, e.g. 1.0~rc1 < 1.0.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Evr<'a> {
    epoch: Cow<'a, str>,
    version: Cow<'a, str>,
    release: Option<Cow<'a, str>>,
}

impl<'a> Evr<'a> {
    /// Create a new EVR. The epoch is taken as given, use [`Evr::parse`] for normalization.
    pub fn new<T: Into<Cow<'a, str>>>(epoch: T, version: T, release: Option<T>) -> Evr<'a> {
        Evr {
            epoch: epoch.into(),
            version: version.into(),
            release: release.map(Into::into),
        }
    }

    /// Create an EVR parsed from a string.
    ///
    /// Accepts `version`, `version-release` and `epoch:version-release`. Parsing never fails,
    /// malformed input degrades to the best matching fields.
    pub fn parse(evr: &'a str) -> Self {
        let (epoch, version, release) = Evr::parse_values(evr);
        Evr::new(epoch, version, release)
    }

    /// The epoch value
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// The version value
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The release value, if one was given
    pub fn release(&self) -> Option<&str> {
        self.release.as_deref()
    }

    /// Write an EVR string in a normalized form which always includes an epoch
    pub fn as_normalized_form(&self) -> String {
        match self.release() {
            Some(release) => format!("{}:{}-{}", self.epoch, self.version, release),
            None => format!("{}:{}", self.epoch, self.version),
        }
    }

    /// Parse the epoch, version and release values and return them as a 3-element tuple
    ///
    /// The epoch is everything before the first `:` and falls back to "0" when it is missing
    /// or not a non-negative integer. The release is everything after the first `-` that
    /// follows the epoch.
    pub fn parse_values(evr: &'a str) -> (&'a str, &'a str, Option<&'a str>) {
        let (epoch, vr) = match evr.split_once(':') {
            Some((epoch, vr)) => (normalize_epoch(epoch), vr),
            None => (DEFAULT_EPOCH, evr),
        };
        match vr.split_once('-') {
            Some((version, release)) => (epoch, version, Some(release)),
            None => (epoch, vr, None),
        }
    }

    /// Compare a requested EVR (`self`) against an installed one.
    ///
    /// Epoch, then version, then release are compared with [`rpmvercmp`], the first
    /// difference decides. When `self` carries no release, matching epoch and version is
    /// enough to be considered equal: a request for "1.2" is satisfied by "1.2-5" and must
    /// not trigger an upgrade or downgrade. The reverse does not hold, so this is not an
    /// [`Ord`] implementation.
    pub fn compare_to(&self, installed: &Evr<'_>) -> Ordering {
        let epoch_cmp = compare_fields(Some(self.epoch()), Some(installed.epoch()));
        if epoch_cmp != Ordering::Equal {
            return epoch_cmp;
        }

        let version_cmp = compare_fields(Some(self.version()), Some(installed.version()));
        if version_cmp != Ordering::Equal {
            return version_cmp;
        }

        if self.release.is_none() {
            return Ordering::Equal;
        }

        compare_fields(self.release(), installed.release())
    }

    /// Detach from the buffer the values were parsed out of
    pub fn into_owned(self) -> Evr<'static> {
        Evr {
            epoch: Cow::Owned(self.epoch.into_owned()),
            version: Cow::Owned(self.version.into_owned()),
            release: self.release.map(|r| Cow::Owned(r.into_owned())),
        }
    }
}

impl fmt::Display for Evr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != DEFAULT_EPOCH {
            write!(f, "{}:", self.epoch)?;
        }
        write!(f, "{}", self.version)?;
        if let Some(release) = self.release() {
            write!(f, "-{}", release)?;
        }
        Ok(())
    }
}

/// Digits only, leading zeros dropped; anything else becomes the default epoch.
fn normalize_epoch(epoch: &str) -> &str {
    if epoch.is_empty() || !epoch.bytes().all(|b| b.is_ascii_digit()) {
        return DEFAULT_EPOCH;
    }
    match epoch.trim_start_matches('0') {
        "" => DEFAULT_EPOCH,
        trimmed => trimmed,
    }
}

/// A missing field is older than any present one, two missing fields are equal.
fn compare_fields(field1: Option<&str>, field2: Option<&str>) -> Ordering {
    match (field1, field2) {
        (None, None) => Ordering::Equal,
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (Some(field1), Some(field2)) => rpmvercmp(field1, field2),
    }
}

/// Compare two version (or release) strings the way rpm's `rpmvercmp()` does.
///
/// Both strings are walked segment by segment, a segment being a run of ASCII digits or a
/// run of ASCII letters. Everything else, non-ASCII characters included, only separates
/// segments. The quirks are deliberate and must be kept:
///
/// * `~` sorts before anything, even the end of the string
/// * a numeric segment is always newer than an alphabetic one
/// * numeric segments compare by digit count first (leading zeros ignored), then bytewise
/// * when all segments match, whichever string has characters left over is newer
pub fn rpmvercmp(version1: &str, version2: &str) -> Ordering {
    if version1 == version2 {
        return Ordering::Equal;
    }

    let mut version1_part = version1;
    let mut version2_part = version2;

    let not_alphanumeric_or_tilde = |c: char| !c.is_ascii_alphanumeric() && c != '~';

    loop {
        version1_part = version1_part.trim_start_matches(not_alphanumeric_or_tilde);
        version2_part = version2_part.trim_start_matches(not_alphanumeric_or_tilde);

        match (
            version1_part.strip_prefix('~'),
            version2_part.strip_prefix('~'),
        ) {
            (Some(a), Some(b)) => {
                version1_part = a;
                version2_part = b;
                continue;
            }
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => (),
        }

        if version1_part.is_empty() || version2_part.is_empty() {
            break;
        }

        // the first string decides which kind of segment is pulled from both
        let numeric = version1_part.starts_with(|c: char| c.is_ascii_digit());
        let in_segment: fn(&char) -> bool = if numeric {
            char::is_ascii_digit
        } else {
            char::is_ascii_alphabetic
        };

        let (segment1, rest1) = split_segment(version1_part, in_segment);
        let (segment2, rest2) = split_segment(version2_part, in_segment);
        version1_part = rest1;
        version2_part = rest2;

        if segment2.is_empty() {
            return if numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let ordering = if numeric {
            let segment1 = segment1.trim_start_matches('0');
            let segment2 = segment2.trim_start_matches('0');
            segment1
                .len()
                .cmp(&segment2.len())
                .then_with(|| segment1.cmp(segment2))
        } else {
            segment1.cmp(segment2)
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    version1_part.len().cmp(&version2_part.len())
}

/// Split off the leading run of characters matching `in_segment`, possibly empty.
fn split_segment(string: &str, in_segment: fn(&char) -> bool) -> (&str, &str) {
    let end = string
        .find(|c: char| !in_segment(&c))
        .unwrap_or(string.len());
    string.split_at(end)
}

/// Compare a requested version string against an installed one.
///
/// This is [`Evr::parse`] on both sides followed by [`Evr::compare_to`]; `Less` means the
/// installed package is newer than requested and would have to be downgraded.
pub fn compare_versions(should: &str, is: &str) -> Ordering {
    Evr::parse(should).compare_to(&Evr::parse(is))
}
