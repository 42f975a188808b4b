//! API version ranking
//!
//! Orders Kubernetes-style version strings (`v1`, `v2beta1`, `v1alpha3`):
//! stable above beta above alpha, then by major version, then by the
//! channel's numeric suffix. Strings that do not parse rank below every
//! parseable version and compare lexically among themselves.

use std::cmp::Ordering;

/// Release channel of a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    Alpha,
    Beta,
    Stable,
}

/// A parsed `v<major>[alpha|beta<n>]` version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApiVersion {
    pub major: u32,
    pub channel: Channel,
    pub suffix: u32,
}

impl ApiVersion {
    pub fn parse(version: &str) -> Option<Self> {
        let rest = version.strip_prefix('v')?;
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        let major = rest[..digits].parse().ok()?;
        let tail = &rest[digits..];

        let (channel, suffix) = if tail.is_empty() {
            (Channel::Stable, "")
        } else if let Some(suffix) = tail.strip_prefix("beta") {
            (Channel::Beta, suffix)
        } else if let Some(suffix) = tail.strip_prefix("alpha") {
            (Channel::Alpha, suffix)
        } else {
            return None;
        };

        let suffix = if suffix.is_empty() {
            0
        } else if suffix.chars().all(|c| c.is_ascii_digit()) {
            suffix.parse().ok()?
        } else {
            return None;
        };

        Some(Self {
            major,
            channel,
            suffix,
        })
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.channel
            .cmp(&other.channel)
            .then(self.major.cmp(&other.major))
            .then(self.suffix.cmp(&other.suffix))
    }
}

/// Compare two version strings; `Greater` means `a` is the later version
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (ApiVersion::parse(a), ApiVersion::parse(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

/// The highest-ranked version, if any
pub fn latest_version<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .max_by(|a, b| compare_versions(a, b))
}

/// Sort versions latest first
pub fn sort_latest_first(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(b, a));
}
