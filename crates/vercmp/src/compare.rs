use clap::Command;
use clap::arg;
use anyhow::Result;
use anyhow::Context;
use std::cmp::Ordering;
use std::io::Write;
use version::Version;

use crate::config::Config;

pub fn args() -> Command {
    Command::new("compare")
        .about("Compare two versions")
        .long_about("Print the relation of two versions: <, ==, > or <> when neither is \
            lesser and they are not equal (v1 versions that differ only by a zero tweak)")
        .visible_alias("cmp")
        .arg(arg!(<left> "left side"))
        .arg(arg!(<right> "right side"))
}

pub fn main(matches: &clap::ArgMatches, config: &Config) -> Result<()> {
    run(matches, config, &mut std::io::stdout().lock())
}

pub(crate) fn run<W: Write>(matches: &clap::ArgMatches, config: &Config, out: &mut W) -> Result<()> {
    let left = matches.get_one::<String>("left").context("left version expected")?;
    let right = matches.get_one::<String>("right").context("right version expected")?;

    let left = crate::parse_version(left, config)?;
    let right = crate::parse_version(right, config)?;

    tracing::debug!("{} {} vs {} {}", left.kind(), left, right.kind(), right);
    writeln!(out, "{}", relation(&left, &right))?;
    Ok(())
}

pub(crate) fn relation(left: &Version, right: &Version) -> &'static str {
    if left == right {
        return "==";
    }
    match left.partial_cmp(right) {
        Some(Ordering::Less) => "<",
        Some(Ordering::Greater) => ">",
        _ => "<>",
    }
}
