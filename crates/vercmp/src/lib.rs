use clap::{arg, ArgAction, Command};
use anyhow::Result;
use version::Version;

pub mod config;

mod bump;
mod compare;
mod inspect;
mod latest;
mod list;
mod sort;

use config::Config;

pub fn get_cli() -> Command {
    build_cli(Command::new("vercmp"))
}

pub fn build_cli(cmd: clap::Command) -> clap::Command {
    cmd
        .about("Parse, compare, sort and bump package versions")
        .arg(arg!(-c --config <file> "use a specific config file").global(true))
        .arg(arg!(--strict "only accept semver (v2) versions").global(true))
        .arg(arg!(--"ignore-tweak" "drop the fourth number of v1 versions").global(true))
        .subcommand_required(true)
        .subcommand(sort::args())
        .subcommand(compare::args())
        .subcommand(inspect::args())
        .subcommand(bump::args())
        .subcommand(latest::args())
        .subcommand(list::args())
}

pub fn main_cli(matches: &clap::ArgMatches, config: &Config) -> Result<()> {

    match matches.subcommand() {
        Some(("sort", matches)) => sort::main(matches, config),
        Some(("compare", matches)) => compare::main(matches, config),
        Some(("inspect", matches)) => inspect::main(matches, config),
        Some(("bump", matches)) => bump::main(matches, config),
        Some(("latest", matches)) => latest::main(matches, config),
        Some(("list", matches)) => list::main(matches, config),
        _ =>  {
            anyhow::bail!("no subcmd");
        }
    }
}

/// parse with the configured scheme rules
pub(crate) fn parse_version(raw: &str, config: &Config) -> version::Result<Version> {
    let mut v = Version::parse(raw, config.fallback)?;
    if config.ignore_tweak {
        v.ignore_tweak();
    }
    Ok(v)
}

pub(crate) fn pull_many<'a>(matches: &'a clap::ArgMatches, key: &str) -> Vec<&'a str> {
    matches.get_many::<String>(key).map_or(Vec::new(), |v| v.map(String::as_str).collect())
}

pub(crate) fn arch_arg() -> clap::Arg {
    arg!(--arch <arch> "Arch preference, most preferred first (comma delimited)")
        .value_delimiter(',')
        .action(ArgAction::Append)
}

pub(crate) fn channel_arg() -> clap::Arg {
    arg!(--channel <channels> "Only consider the given channels (comma delimited)")
        .alias("channels")
        .value_delimiter(',')
        .action(ArgAction::Append)
}

/// command line values if given, else the configured ones
pub(crate) fn or_config<'a>(given: Vec<&'a str>, configured: &'a [String]) -> Vec<&'a str> {
    if given.is_empty() {
        configured.iter().map(String::as_str).collect()
    } else {
        given
    }
}

/// Load a catalog and apply the channel and package filters.
pub(crate) fn load_catalog(matches: &clap::ArgMatches, config: &Config) -> Result<catalog::Catalog> {
    use anyhow::Context;

    let path = matches.get_one::<String>("catalog").context("catalog file expected")?;
    let mut cat = catalog::Catalog::from_path(path).with_context(|| format!("catalog {path}"))?;

    let channels = or_config(pull_many(matches, "channel"), &config.channels);
    cat.filter_channel(&channels);

    let pkgs = pull_many(matches, "pkg");
    cat.filter_package(&pkgs);

    tracing::debug!(packages = cat.package_count(), versions = cat.version_count(), "after filters");
    Ok(cat)
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;

    /// run a full command line against an in-memory output
    pub fn run<F>(args: &[&str], f: F) -> Result<String>
    where
        F: FnOnce(&clap::ArgMatches, &Config, &mut Vec<u8>) -> Result<()>,
    {
        let matches = get_cli().try_get_matches_from(std::iter::once("vercmp").chain(args.iter().copied()))?;
        let mut config = Config::default();
        config.apply_args(&matches);
        let (_name, sub) = matches.subcommand().ok_or_else(|| anyhow::anyhow!("no subcmd"))?;
        let mut out = Vec::new();
        f(sub, &config, &mut out)?;
        Ok(String::from_utf8(out)?)
    }
}
