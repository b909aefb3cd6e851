use clap::Command;
use clap::arg;
use anyhow::Result;
use std::io::Write;
use catalog::Catalog;

use crate::config::Config;

pub fn args() -> Command {
    Command::new("latest")
        .about("Print the latest version of packages in a catalog")
        .arg(arg!(<catalog> "catalog json file"))
        .arg(arg!([pkg]... "package names, all packages when omitted"))
        .arg(crate::arch_arg())
        .arg(crate::channel_arg())
}

pub fn main(matches: &clap::ArgMatches, config: &Config) -> Result<()> {
    run(matches, config, &mut std::io::stdout().lock())
}

pub(crate) fn run<W: Write>(matches: &clap::ArgMatches, config: &Config, out: &mut W) -> Result<()> {

    let cat = crate::load_catalog(matches, config)?;
    let arch = crate::or_config(crate::pull_many(matches, "arch"), &config.arch);

    for pkg in crate::pull_many(matches, "pkg") {
        if !cat.packages.contains_key(pkg) {
            tracing::warn!("package '{pkg}' not found");
        }
    }

    let mut tw = tabwriter::TabWriter::new(&mut *out);
    for line in latest_lines(&cat, &arch, config.ignore_tweak) {
        writeln!(&mut tw, "{line}")?;
    }
    tw.flush()?;
    Ok(())
}

/// name, version, arch and uri of the latest version of every package
pub(crate) fn latest_lines(cat: &Catalog, arch: &[&str], ignore_tweak: bool) -> Vec<String> {
    cat.packages.keys()
        .filter_map(|name| cat.latest(name, arch))
        .map(|latest| {
            let mut version = latest.version.clone();
            if ignore_tweak {
                version.ignore_tweak();
            }
            let arch = latest.info.arch.as_deref().unwrap_or(catalog::NOARCH);
            format!("{}\t{}\t{}\t{}", latest.name, version, arch, latest.info.uri)
        })
        .collect()
}
