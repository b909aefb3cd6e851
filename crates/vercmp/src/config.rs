use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;

pub const CONFIG_FILE_NAME: &str = "vercmp.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Ascending,
    Descending,
}

/// the main config struct
#[derive(Debug, Clone, PartialEq)]
pub struct Config {

    /// accept V1 and fallback versions, not just V2
    pub fallback: bool,

    /// drop V1 tweaks before printing
    pub ignore_tweak: bool,

    pub order: Order,

    /// arch preferences, most preferred first
    pub arch: Vec<String>,

    pub channels: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback: true,
            ignore_tweak: false,
            order: Order::Descending,
            arch: Vec::new(),
            channels: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigToml {
    fallback: Option<bool>,
    ignore_tweak: Option<bool>,
    order: Option<Order>,
    catalog: Option<CatalogToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogToml {
    arch: Option<ArchToml>,
    channels: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ArchToml {
    Single(String),
    Multiple(Vec<String>),
}

/// "" means noarch, duplicates keep their first position
fn normalize_arch(arch: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(arch.len());
    for ent in arch {
        let ent = if ent.is_empty() { String::from(catalog::NOARCH) } else { ent };
        if !out.contains(&ent) {
            out.push(ent);
        }
    }
    out
}

/// search for the config file
/// 1. vercmp.toml next to the executable
/// 2. vercmp.toml in the current directory
pub fn find_config_file() -> Option<Utf8PathBuf> {

    let next_to_exe = std::env::current_exe().ok()
        .map(|p| p.with_file_name(CONFIG_FILE_NAME))
        .and_then(|p| Utf8PathBuf::from_path_buf(p).ok());

    let in_cwd = std::env::current_dir().ok()
        .map(|p| p.join(CONFIG_FILE_NAME))
        .and_then(|p| Utf8PathBuf::from_path_buf(p).ok());

    [next_to_exe, in_cwd].into_iter().flatten().find(|p| p.is_file())
}

impl Config {

    pub fn from_reader<R: Read>(mut read: R) -> anyhow::Result<Config> {

        let toml = {
            let mut contents = String::new();
            read.read_to_string(&mut contents)?;
            toml::from_str::<ConfigToml>(&contents).context("failed to parse config")?
        };

        let defaults = Config::default();

        let (arch, channels) = match toml.catalog {
            Some(cat) => {
                let arch = cat.arch.map(|e| {
                    match e {
                        ArchToml::Single(v) => vec![v],
                        ArchToml::Multiple(v) => v,
                    }
                }).unwrap_or_default();
                (normalize_arch(arch), cat.channels.unwrap_or_default())
            }
            None => (defaults.arch, defaults.channels),
        };

        Ok(Config {
            fallback: toml.fallback.unwrap_or(defaults.fallback),
            ignore_tweak: toml.ignore_tweak.unwrap_or(defaults.ignore_tweak),
            order: toml.order.unwrap_or(defaults.order),
            arch,
            channels,
        })
    }

    pub fn from_path<P: AsRef<Utf8Path>>(path: P) -> anyhow::Result<Config> {
        let path = path.as_ref();
        let read = BufReader::new(File::open(path).with_context(|| format!("failed to open config file {path}"))?);
        Self::from_reader(read).with_context(|| format!("in config file {path}"))
    }

    /// Load the given config file, else a found one, else the defaults.
    pub fn load(path: Option<&Utf8Path>) -> anyhow::Result<Config> {
        match path.map(Utf8Path::to_path_buf).or_else(find_config_file) {
            Some(path) => {
                tracing::debug!("using config file {path}");
                Self::from_path(path)
            }
            None => {
                tracing::debug!("no config file, using defaults");
                Ok(Config::default())
            }
        }
    }

    /// Command line flags win over the config file.
    pub fn apply_args(&mut self, matches: &clap::ArgMatches) {
        if matches.get_flag("strict") {
            self.fallback = false;
        }
        if matches.get_flag("ignore-tweak") {
            self.ignore_tweak = true;
        }
    }

    pub fn descending(&self) -> bool {
        self.order == Order::Descending
    }
}
