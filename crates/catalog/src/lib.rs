//! Package catalog
//!
//! package_name -> [version -> [version_info]]
//!
//! The catalog stores versions of any scheme side by side. It never looks at which
//! scheme a version is, it only parses, compares and prints them.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use serde::{Serialize, Deserialize};
use version::Version;

type PackageName = String;
type ChannelName = String;
type ArchName    = String;

pub const NOARCH: &str = "noarch";

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read catalog")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Version(#[from] version::Error),
}

/// Matches an arch filter against the arch of an entry.
///
/// An empty filter and "noarch" match entries without an arch, "*" matches every entry.
/// Everything else matches the arch name, ignoring ascii case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchMatcher<'a> {
    Any,
    NoArch,
    Named(&'a str),
}

impl<'a> From<&'a str> for ArchMatcher<'a> {
    fn from(filter: &'a str) -> Self {
        match filter {
            "*" => ArchMatcher::Any,
            "" => ArchMatcher::NoArch,
            f if f.eq_ignore_ascii_case(NOARCH) => ArchMatcher::NoArch,
            f => ArchMatcher::Named(f),
        }
    }
}

impl ArchMatcher<'_> {
    pub fn matches(&self, arch: Option<&str>) -> bool {
        let arch = arch.filter(|a| !a.is_empty() && !a.eq_ignore_ascii_case(NOARCH));
        match (self, arch) {
            (ArchMatcher::Any, _) => true,
            (ArchMatcher::NoArch, None) => true,
            (ArchMatcher::Named(name), Some(arch)) => name.eq_ignore_ascii_case(arch),
            _ => false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub uri: String,
    pub filename: String,
    pub channels: Vec<ChannelName>,
    pub arch: Option<ArchName>,
}

impl VersionInfo {
    fn add_channel(&mut self, channel: Option<&str>) {
        if let Some(channel) = channel {
            if !self.channels.iter().any(|v| v == channel) {
                self.channels.push(channel.into());
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version: Version,
    pub infos: Vec<VersionInfo>,
}

impl VersionEntry {
    fn is(&self, version: &str) -> bool {
        self.version.to_string() == version
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageInfo {

    // in insertion order, see Catalog::sorted
    pub versions: Vec<VersionEntry>,
}

/// The newest version of a package for a set of arch preferences.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Latest<'a> {
    pub name: &'a str,
    pub version: &'a Version,
    pub info: &'a VersionInfo,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub packages: BTreeMap<PackageName, PackageInfo>,
}

impl Catalog {

    pub fn from_reader<R: Read>(read: R) -> Result<Self> {
        let catalog: Catalog = serde_json::from_reader(read)?;
        tracing::debug!(packages = catalog.package_count(), versions = catalog.version_count(), "loaded catalog");
        Ok(catalog)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let read = BufReader::new(File::open(path.as_ref())?);
        Self::from_reader(read)
    }

    /// add a name, version, arch, ?channel?
    ///
    /// The version string is parsed with fallback allowed, so anything with at least
    /// one segment is accepted.
    pub fn add_version<S: Into<String>>(
        &mut self,
        pkg_name: &str,
        version: &str,
        arch: Option<&str>,
        channel: Option<&str>,
        filename: S,
        uri: S
    ) -> Result<()> {

        let version = Version::parse(version, true).inspect_err(|e| {
            tracing::warn!("rejected version for {pkg_name}: {e}");
        })?;
        let canonical = version.to_string();

        let pinfo = self.packages.entry(pkg_name.into()).or_default();
        let idx = match pinfo.versions.iter().position(|ent| ent.is(&canonical)) {
            Some(idx) => idx,
            None => {
                pinfo.versions.push(VersionEntry { version, infos: vec![] });
                pinfo.versions.len() - 1
            }
        };

        let vlist = &mut pinfo.versions[idx].infos;
        if let Some(existing) = vlist.iter_mut().find(|ent| ent.arch.as_deref() == arch) {
            existing.add_channel(channel);
        } else {
            let mut vinfo = VersionInfo{
                uri: uri.into(),
                filename: filename.into(),
                channels: vec![],
                arch: arch.map(String::from),
            };
            vinfo.add_channel(channel);
            vlist.push(vinfo);
        }

        Ok(())
    }

    /// apply a channel to all entries for that version
    pub fn insert_channel(&mut self, pkg_name: &str, version: &str, channel: &str) {

        // look up by canonical form, so "v1.2.3" finds "1.2.3"
        let canonical = match Version::parse(version, true) {
            Ok(v) => v.to_string(),
            Err(e) => {
                tracing::warn!("{e}");
                return;
            }
        };

        if let Some(pinfo) = self.packages.get_mut(pkg_name) {
            if let Some(entry) = pinfo.versions.iter_mut().find(|ent| ent.is(&canonical)) {
                for ent in entry.infos.iter_mut() {
                    ent.add_channel(Some(channel));
                }
            }
        }
    }

    fn prune(&mut self) {
        for pinfo in self.packages.values_mut() {
            pinfo.versions.retain(|ent| !ent.infos.is_empty());
        }
        self.packages.retain(|_pname, pinfo| !pinfo.versions.is_empty());
    }

    /// remove package entries that don't match any of the arch filters
    pub fn filter_arch(&mut self, archs: &[&str]) {

        if archs.is_empty() {
            return;
        }

        let filters : Vec<_> = archs.iter().map(|f| ArchMatcher::from(*f)).collect();

        for pinfo in self.packages.values_mut() {
            for entry in pinfo.versions.iter_mut() {
                entry.infos.retain(|ent| {
                    filters.iter().any(|f| f.matches(ent.arch.as_deref()))
                });
            }
        }
        self.prune();
    }

    /// remove package entries that don't match one of the named packages
    pub fn filter_package(&mut self, pkgs: &[&str]) {
        if !pkgs.is_empty() {
            self.packages.retain(|pname, _pinfo| pkgs.contains(&pname.as_str()))
        }
    }

    /// remove package entires that don't match the given channels
    pub fn filter_channel(&mut self, channels: &[&str]) {
        if !channels.is_empty() {
            for pinfo in self.packages.values_mut() {
                for entry in pinfo.versions.iter_mut() {
                    entry.infos.retain(|ent| {
                        ent.channels.iter().any(|c| channels.contains(&c.as_str()))
                    });
                }
            }
            self.prune();
        }
    }

    /// count of packages
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// count of all versions for all packages
    pub fn version_count(&self) -> usize {
        self.packages.values().map(|pinfo| pinfo.versions.len()).sum()
    }

    /// count of all versions+archs for all packages
    pub fn unique_count(&self) -> usize {
        self.packages.values()
            .flat_map(|pinfo| pinfo.versions.iter())
            .map(|entry| entry.infos.len())
            .sum()
    }

    /// merge package info from multiple catalogs
    pub fn merge(&mut self, other: Self) {
        for (pname, right_pinfo) in other.packages {
            let left_pinfo = self.packages.entry(pname).or_default();
            left_pinfo.merge(right_pinfo);
        }
    }

    /// versions of a package, oldest first
    pub fn sorted(&self, pkg_name: &str) -> Option<Vec<&VersionEntry>> {
        let pinfo = self.packages.get(pkg_name)?;
        let mut entries: Vec<&VersionEntry> = pinfo.versions.iter().collect();
        version::sort_by_version(&mut entries, |ent| &ent.version);
        Some(entries)
    }

    /// The newest version of a package that is available for one of the archs.
    ///
    /// Archs are tried in preference order against each version, newest first. With
    /// no preferences any entry will do.
    pub fn latest(&self, pkg_name: &str, arch_preferences: &[&str]) -> Option<Latest<'_>> {

        let (name, _) = self.packages.get_key_value(pkg_name)?;
        let entries = self.sorted(pkg_name)?;

        for entry in entries.into_iter().rev() {
            let info = if arch_preferences.is_empty() {
                entry.infos.first()
            } else {
                arch_preferences.iter()
                    .map(|arch| ArchMatcher::from(*arch))
                    .find_map(|m| entry.infos.iter().find(|ent| m.matches(ent.arch.as_deref())))
            };

            if let Some(info) = info {
                tracing::debug!("{pkg_name} latest is {}", entry.version);
                return Some(Latest { name, version: &entry.version, info });
            }
            tracing::debug!("{pkg_name} {} has no matching arch", entry.version);
        }

        None
    }
}

impl PackageInfo {

    fn merge(&mut self, other: Self) {

        for r_entry in other.versions {
            let canonical = r_entry.version.to_string();
            match self.versions.iter_mut().find(|ent| ent.is(&canonical)) {
                Some(l_entry) => l_entry.infos.extend(r_entry.infos),
                None => self.versions.push(r_entry),
            }
        }
    }
}
