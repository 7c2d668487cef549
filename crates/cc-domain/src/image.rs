//! Classification of provider image names.
//!
//! ConoHa publishes images under names such as
//! `vmi-rust-latest-ubuntu-20.04-amd64-100gb`: an optional `vmi` marker, an
//! optional bundled application and its version, the OS token, the OS version,
//! then architecture and disk hints. There is no published grammar, so the
//! rules here follow the names the catalog actually contains.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Leading token on most catalog names; never part of an application name.
const IMAGE_MARKER: &str = "vmi";

/// The one catalog entry no OS claims.
pub const DEV_IMAGE: &str = "dev";

// ── Version ─────────────────────────────────────────────────────────

/// An OS or application version token, compared as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub value: String,
}

impl Version {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// `latest` is how the CLI asks for the newest available version.
    pub fn is_latest(&self) -> bool {
        self.value == "latest"
    }

    /// Whether the version occurs anywhere in the image name.
    pub fn is_match(&self, image_name: &str) -> bool {
        image_name.contains(self.value.as_str())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Version {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s.trim()))
    }
}

// ── Application ─────────────────────────────────────────────────────

/// An application bundled into an image, or [`Application::NONE`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Application {
    pub name: String,
    pub version: Version,
}

impl Application {
    /// Plain OS image with nothing bundled.
    pub const NONE: Self = Self {
        name: String::new(),
        version: Version {
            value: String::new(),
        },
    };

    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Version::new(version),
        }
    }

    pub fn none() -> Self {
        Self::NONE
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Both the name and the version occur in the image name.
    pub fn is_match(&self, image_name: &str) -> bool {
        image_name.contains(self.name.as_str()) && self.version.is_match(image_name)
    }
}

impl fmt::Display for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return f.write_str("null");
        }
        write!(f, "{}-{}", self.name, self.version)
    }
}

/// Parses CLI input: `null` (or empty) for no application, otherwise
/// `<name>-<version>` split at the last hyphen.
impl FromStr for Application {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" | "null" | "none" => Ok(Self::none()),
            text => match text.rsplit_once('-') {
                Some((name, version)) if !name.is_empty() && !version.is_empty() => {
                    Ok(Self::new(name, version))
                }
                _ => Err(Error::ApplicationWithoutVersion(text.to_string())),
            },
        }
    }
}

// ── OS ──────────────────────────────────────────────────────────────

/// OS families offered in the image catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Centos,
    Ubuntu,
    Debian,
    Rocky,
    Alma,
    Oracle,
    Miracle,
    Freebsd,
    Fedora,
    Opensuse,
    Arch,
    Netbsd,
    Openbsd,
    Windows,
}

/// How an OS token is located in an image name.
enum Delimiter {
    /// `-{token}-`
    Exact(&'static str),
    /// `-{prefix}` followed, somewhere later, by `-`
    Prefix(&'static str),
}

impl Os {
    pub const ALL: [Os; 14] = [
        Os::Centos,
        Os::Ubuntu,
        Os::Debian,
        Os::Rocky,
        Os::Alma,
        Os::Oracle,
        Os::Miracle,
        Os::Freebsd,
        Os::Fedora,
        Os::Opensuse,
        Os::Arch,
        Os::Netbsd,
        Os::Openbsd,
        Os::Windows,
    ];

    /// Short name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Centos => "centos",
            Self::Ubuntu => "ubuntu",
            Self::Debian => "debian",
            Self::Rocky => "rocky",
            Self::Alma => "alma",
            Self::Oracle => "oracle",
            Self::Miracle => "miracle",
            Self::Freebsd => "freebsd",
            Self::Fedora => "fedora",
            Self::Opensuse => "opensuse",
            Self::Arch => "arch",
            Self::Netbsd => "netbsd",
            Self::Openbsd => "openbsd",
            Self::Windows => "windows",
        }
    }

    /// The token as it appears in image names. `win.*` stands for any token
    /// starting with `win`.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Centos => "centos",
            Self::Ubuntu => "ubuntu",
            Self::Debian => "debian",
            Self::Rocky => "rockylinux",
            Self::Alma => "almalinux",
            Self::Oracle => "oraclelinux",
            Self::Miracle => "miraclelinux",
            Self::Freebsd => "freebsd",
            Self::Fedora => "fedora",
            Self::Opensuse => "opensuse",
            Self::Arch => "arch",
            Self::Netbsd => "netbsd",
            Self::Openbsd => "openbsd",
            Self::Windows => "win.*",
        }
    }

    /// Token with the wildcard stripped.
    fn bare_token(&self) -> &'static str {
        match self.delimiter() {
            Delimiter::Exact(token) | Delimiter::Prefix(token) => token,
        }
    }

    fn delimiter(&self) -> Delimiter {
        match self {
            Self::Windows => Delimiter::Prefix("win"),
            other => Delimiter::Exact(other.token()),
        }
    }

    /// Byte offset of the leftmost delimiter match. The surrounding hyphens
    /// keep `arch` from matching `archive`.
    fn find_delimiter(&self, image_name: &str) -> Option<usize> {
        match self.delimiter() {
            Delimiter::Exact(token) => image_name.find(&format!("-{token}-")),
            Delimiter::Prefix(prefix) => {
                let needle = format!("-{prefix}");
                image_name
                    .match_indices(needle.as_str())
                    .map(|(start, _)| start)
                    .find(|&start| image_name[start + needle.len()..].contains('-'))
            }
        }
    }

    fn locate(&self, image_name: &str) -> Result<usize> {
        self.find_delimiter(image_name).ok_or_else(|| {
            Error::Extraction(format!(
                "no OS token `{}` in image name `{image_name}`",
                self.token()
            ))
        })
    }

    /// Whether the image belongs to this OS.
    pub fn name_match(&self, image_name: &str) -> bool {
        self.find_delimiter(image_name).is_some()
    }

    /// OS version encoded in the image name: the hyphen token after the OS
    /// token. Windows versions span two tokens (`win-2019dce`).
    pub fn extract_version(&self, image_name: &str) -> Result<Version> {
        self.locate(image_name)?;

        let tokens: Vec<&str> = image_name.split('-').collect();
        let bare = self.bare_token();
        let missing = || {
            Error::Extraction(format!(
                "no {} version in image name `{image_name}`",
                self.as_str()
            ))
        };

        let index = tokens
            .iter()
            .position(|token| token.contains(bare))
            .ok_or_else(missing)?;

        let value = match self {
            Self::Windows => tokens[index..tokens.len().min(index + 2)].join("-"),
            _ => tokens.get(index + 1).ok_or_else(missing)?.to_string(),
        };
        Ok(Version::new(value))
    }

    /// Application bundled into the image: every token between the `vmi`
    /// marker and the OS token, the last one being its version.
    pub fn extract_app_with_version(&self, image_name: &str) -> Result<Application> {
        let start = self.locate(image_name)?;
        // find_delimiter only returns offsets of `-{bare_token}`
        if !image_name[start..].starts_with(&format!("-{}", self.bare_token())) {
            return Err(Error::UnexpectedState(format!(
                "{} delimiter at offset {start} does not hold the OS token in `{image_name}`",
                self.as_str()
            )));
        }

        let tokens: Vec<&str> = image_name[..start]
            .split('-')
            .filter(|token| *token != IMAGE_MARKER)
            .collect();

        match tokens.as_slice() {
            [] => Ok(Application::none()),
            [_] => Err(Error::ApplicationWithoutVersion(image_name.to_string())),
            [name, version] => Ok(Application::new(*name, *version)),
            [name @ .., version] => Ok(Application::new(name.join("-"), *version)),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the short CLI name or the catalog token (`rockylinux`).
impl FromStr for Os {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|os| os.as_str() == needle || os.token() == needle)
            .ok_or(Error::UnknownOs(needle))
    }
}

// ── ImageNames ──────────────────────────────────────────────────────

/// Every image name the provider offers, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageNames {
    values: Vec<String>,
}

impl ImageNames {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Subset of names accepted by `keep`, order preserved.
    pub fn filtered(&self, keep: impl Fn(&str) -> bool) -> Self {
        Self {
            values: self
                .values
                .iter()
                .filter(|name| keep(name))
                .cloned()
                .collect(),
        }
    }

    fn matching(&self, os: Os) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .map(String::as_str)
            .filter(move |name| os.name_match(name))
    }

    /// Distinct versions of `os`, sorted as strings: `"10"` comes before `"9"`.
    pub fn available_os_versions(&self, os: Os) -> Result<Vec<Version>> {
        let versions = self
            .matching(os)
            .map(|name| os.extract_version(name))
            .collect::<Result<BTreeSet<_>>>()?;
        Ok(versions.into_iter().collect())
    }

    /// Greatest entry of [`available_os_versions`](Self::available_os_versions).
    pub fn latest_os_version(&self, os: Os) -> Result<Option<Version>> {
        Ok(self.available_os_versions(os)?.pop())
    }

    /// Applications shipped on `os` at `version`, including
    /// [`Application::NONE`] when a plain image exists.
    pub fn available_apps(&self, os: Os, version: &Version) -> Result<Vec<Application>> {
        let mut apps = BTreeSet::new();
        for name in self.matching(os) {
            if os.extract_version(name)? == *version {
                apps.insert(os.extract_app_with_version(name)?);
            }
        }
        Ok(apps.into_iter().collect())
    }

    /// OS variants claiming `image_name`.
    pub fn claimants(image_name: &str) -> Vec<Os> {
        Os::ALL
            .into_iter()
            .filter(|os| os.name_match(image_name))
            .collect()
    }

    /// Checks that the OS variants split the catalog into disjoint groups
    /// covering every name except the single `dev` image.
    pub fn check_direct_sum(&self) -> Result<()> {
        let claimed: usize = Os::ALL.iter().map(|os| self.matching(*os).count()).sum();
        if claimed + 1 != self.values.len() {
            return Err(Error::CatalogPartition {
                total: self.values.len(),
                claimed,
            });
        }
        Ok(())
    }

    /// Names no OS claims, `dev` excepted.
    pub fn unclaimed(&self) -> Vec<&str> {
        self.values
            .iter()
            .map(String::as_str)
            .filter(|name| *name != DEV_IMAGE && Self::claimants(name).is_empty())
            .collect()
    }

    /// Names claimed by more than one OS, with their claimants.
    pub fn overclaimed(&self) -> Vec<(&str, Vec<Os>)> {
        self.values
            .iter()
            .map(|name| (name.as_str(), Self::claimants(name)))
            .filter(|(_, claimants)| claimants.len() > 1)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ImageNames {
        ImageNames::new([
            "dev",
            "vmi-ubuntu-20.04-amd64-30gb",
            "vmi-ubuntu-20.04-amd64-100gb",
            "vmi-ubuntu-22.04-amd64-100gb",
            "vmi-rust-latest-ubuntu-20.04-amd64-100gb",
            "vmi-docker-24.0-ubuntu-22.04-amd64-100gb",
            "vmi-debian-12.0-amd64-100gb",
            "vmi-cacti-nagios-1.2.17.4.4.6-centos-7.9-amd64-30gb",
            "vmi-centos-7.9-amd64-100gb",
            "vmi-rockylinux-9.2-amd64-100gb",
            "vmi-arch-2023.06-amd64-100gb",
            "vmi-win-2019dce-amd64",
            "vmi-win2019dce-rds",
        ])
    }

    #[test]
    fn test_version_is_match() {
        let version = Version::new("20.04");
        assert!(version.is_match("vmi-ubuntu-20.04-amd64-100gb"));
        assert!(!version.is_match("vmi-ubuntu-22.04-amd64-100gb"));
    }

    #[test]
    fn test_application_is_match_requires_name_and_version() {
        let app = Application::new("rust", "latest");
        assert!(app.is_match("vmi-rust-latest-ubuntu-20.04-amd64-100gb"));
        assert!(!app.is_match("vmi-rust-1.70-ubuntu-20.04-amd64-100gb"));
        assert!(!app.is_match("vmi-go-latest-ubuntu-20.04-amd64-100gb"));
    }

    #[test]
    fn test_application_none_sentinel() {
        assert_eq!(Application::none(), Application::NONE);
        assert!(Application::none().is_none());
        assert_ne!(Application::none(), Application::new("rust", "latest"));
        assert_eq!(Application::none().to_string(), "null");
    }

    #[test]
    fn test_application_from_str() {
        assert_eq!("null".parse::<Application>().unwrap(), Application::none());
        assert_eq!(
            "cacti-nagios-1.2.17.4.4.6".parse::<Application>().unwrap(),
            Application::new("cacti-nagios", "1.2.17.4.4.6")
        );
        assert!(matches!(
            "wordpress".parse::<Application>(),
            Err(Error::ApplicationWithoutVersion(_))
        ));
    }

    #[test]
    fn test_os_name_match() {
        assert!(Os::Ubuntu.name_match("xxx-ubuntu-yyy"));
        assert!(!Os::Ubuntu.name_match("xxx-not_ubuntu-yyy"));
        assert!(!Os::Ubuntu.name_match("xxx-ubuntu"));
    }

    #[test]
    fn test_os_name_match_needs_hyphen_delimiters() {
        assert!(Os::Arch.name_match("vmi-arch-2023.06-amd64-100gb"));
        assert!(!Os::Arch.name_match("vmi-archive-1.0-debian-12.0-amd64-100gb"));
    }

    #[test]
    fn test_windows_name_match_is_prefix_wildcard() {
        assert!(Os::Windows.name_match("vmi-win2019dce-rds"));
        assert!(Os::Windows.name_match("vmi-win-2019dce-amd64"));
        assert!(!Os::Windows.name_match("vmi-win2019dce"));
        assert!(!Os::Windows.name_match("vmi-ubuntu-20.04-amd64"));
    }

    #[test]
    fn test_extract_version() {
        assert_eq!(
            Os::Ubuntu.extract_version("xxx-ubuntu-vvv-zzzz").unwrap(),
            Version::new("vvv")
        );
        assert_eq!(
            Os::Centos
                .extract_version("vmi-cacti-nagios-1.2.17.4.4.6-centos-7.9-amd64-30gb")
                .unwrap(),
            Version::new("7.9")
        );
    }

    #[test]
    fn test_extract_windows_version_spans_two_tokens() {
        assert_eq!(
            Os::Windows.extract_version("vmi-win2019dce-rds").unwrap(),
            Version::new("win2019dce-rds")
        );
        assert_eq!(
            Os::Windows.extract_version("vmi-win-2019dce-amd64").unwrap(),
            Version::new("win-2019dce")
        );
    }

    #[test]
    fn test_extract_version_errors() {
        assert!(matches!(
            Os::Ubuntu.extract_version("xxx-ubun-22.0"),
            Err(Error::Extraction(_))
        ));
        assert!(matches!(
            Os::Ubuntu.extract_version("xxx-ubuntu"),
            Err(Error::Extraction(_))
        ));
    }

    #[test]
    fn test_extract_app_with_version() {
        assert_eq!(
            Os::Ubuntu
                .extract_app_with_version("vmi-rust-latest-ubuntu-20.04-amd64-100gb")
                .unwrap(),
            Application::new("rust", "latest")
        );
        assert_eq!(
            Os::Debian
                .extract_app_with_version("vmi-debian-12.0-amd64-100gb")
                .unwrap(),
            Application::none()
        );
        assert_eq!(
            Os::Centos
                .extract_app_with_version("vmi-cacti-nagios-1.2.17.4.4.6-centos-7.9-amd64-30gb")
                .unwrap(),
            Application::new("cacti-nagios", "1.2.17.4.4.6")
        );
    }

    #[test]
    fn test_extract_app_with_version_errors() {
        assert!(matches!(
            Os::Ubuntu.extract_app_with_version("dev"),
            Err(Error::Extraction(_))
        ));
        assert!(matches!(
            Os::Ubuntu
                .extract_app_with_version("vmi-appname_without_version-ubuntu-20.02-amd64-100gb"),
            Err(Error::ApplicationWithoutVersion(_))
        ));
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let name = "vmi-docker-24.0-ubuntu-22.04-amd64-100gb";
        assert_eq!(
            Os::Ubuntu.extract_version(name).unwrap(),
            Os::Ubuntu.extract_version(name).unwrap()
        );
        assert_eq!(
            Os::Ubuntu.extract_app_with_version(name).unwrap(),
            Os::Ubuntu.extract_app_with_version(name).unwrap()
        );
    }

    #[test]
    fn test_os_from_str() {
        assert_eq!("ubuntu".parse::<Os>().unwrap(), Os::Ubuntu);
        assert_eq!("rockylinux".parse::<Os>().unwrap(), Os::Rocky);
        assert_eq!("Rocky".parse::<Os>().unwrap(), Os::Rocky);
        assert!(matches!("plan9".parse::<Os>(), Err(Error::UnknownOs(_))));
    }

    #[test]
    fn test_available_os_versions_dedup_and_sort() {
        let versions = catalog().available_os_versions(Os::Ubuntu).unwrap();
        assert_eq!(versions, vec![Version::new("20.04"), Version::new("22.04")]);
    }

    #[test]
    fn test_available_os_versions_sort_is_lexicographic() {
        // Plain string order; numeric-aware ordering is not applied.
        let names = ImageNames::new(["vmi-debian-9-amd64-100gb", "vmi-debian-10-amd64-100gb"]);
        let versions = names.available_os_versions(Os::Debian).unwrap();
        assert_eq!(versions, vec![Version::new("10"), Version::new("9")]);
    }

    #[test]
    fn test_latest_os_version() {
        assert_eq!(
            catalog().latest_os_version(Os::Ubuntu).unwrap(),
            Some(Version::new("22.04"))
        );
        assert_eq!(catalog().latest_os_version(Os::Fedora).unwrap(), None);
    }

    #[test]
    fn test_available_apps() {
        let apps = catalog()
            .available_apps(Os::Ubuntu, &Version::new("20.04"))
            .unwrap();
        assert_eq!(apps, vec![Application::none(), Application::new("rust", "latest")]);
    }

    #[test]
    fn test_check_direct_sum_passes_for_partitioned_catalog() {
        catalog().check_direct_sum().unwrap();
    }

    #[test]
    fn test_check_direct_sum_detects_unclaimed_image() {
        let mut values = catalog().values().to_vec();
        values.push("vmi-plan9-4-amd64-100gb".into());
        let names = ImageNames::new(values);

        assert!(matches!(
            names.check_direct_sum(),
            Err(Error::CatalogPartition { total: 14, claimed: 12 })
        ));
        assert_eq!(names.unclaimed(), vec!["vmi-plan9-4-amd64-100gb"]);
    }

    #[test]
    fn test_check_direct_sum_detects_overclaimed_image() {
        let mut values = catalog().values().to_vec();
        values.push("vmi-ubuntu-debian-12.0-amd64-100gb".into());
        let names = ImageNames::new(values);

        assert!(matches!(
            names.check_direct_sum(),
            Err(Error::CatalogPartition { total: 14, claimed: 14 })
        ));
        assert_eq!(
            names.overclaimed(),
            vec![("vmi-ubuntu-debian-12.0-amd64-100gb", vec![Os::Ubuntu, Os::Debian])]
        );
    }

    #[test]
    fn test_check_direct_sum_rejects_empty_catalog() {
        let err = ImageNames::new(Vec::<String>::new())
            .check_direct_sum()
            .unwrap_err();
        assert!(matches!(err, Error::CatalogPartition { total: 0, claimed: 0 }));
        assert!(err.to_string().contains("0 of 0 claimed"));
        assert!(err.to_string().contains("`dev`"));
    }

    #[test]
    fn test_filtered_keeps_order() {
        let names = catalog().filtered(|name| name.ends_with("30gb"));
        assert_eq!(
            names.values(),
            [
                "vmi-ubuntu-20.04-amd64-30gb",
                "vmi-cacti-nagios-1.2.17.4.4.6-centos-7.9-amd64-30gb"
            ]
        );
    }
}
