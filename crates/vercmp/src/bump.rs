use clap::Command;
use clap::arg;
use anyhow::Result;
use anyhow::Context;
use std::io::Write;
use version::{Increment, Version, VersionV2};

use crate::config::Config;

pub fn args() -> Command {
    Command::new("bump")
        .about("Increment part of a v2 version")
        .long_about("Increment major, minor, patch, prerelease or the security counter of a v2 \
            (semver) version and print the result")
        .arg(arg!(<version> "version to increment"))
        .arg(arg!(<kind> "part to increment")
            .value_parser(["major", "minor", "patch", "prerelease", "pre", "security"])
        )
        .arg(arg!(--pre <tag> "prerelease tag for the new version"))
}

pub fn main(matches: &clap::ArgMatches, config: &Config) -> Result<()> {
    run(matches, config, &mut std::io::stdout().lock())
}

pub(crate) fn run<W: Write>(matches: &clap::ArgMatches, config: &Config, out: &mut W) -> Result<()> {
    let raw = matches.get_one::<String>("version").context("version expected")?;
    let kind = matches.get_one::<String>("kind").context("increment kind expected")?;
    let pre = matches.get_one::<String>("pre").map_or("", String::as_str);

    let v = crate::parse_version(raw, config)?;
    let next = bump(&v, kind.parse()?, pre)?;
    writeln!(out, "{next}")?;
    Ok(())
}

pub(crate) fn bump(v: &Version, which: Increment, pre: &str) -> Result<VersionV2> {
    let Some(v2) = v.as_v2() else {
        anyhow::bail!("only v2 versions can be incremented, '{v}' is {}", v.kind());
    };
    Ok(v2.increment(which, pre)?)
}

#[cfg(test)]
mod test {
    use super::*;

    fn bump_cli(args: &[&str]) -> Result<String> {
        let mut argv = vec!["bump"];
        argv.extend_from_slice(args);
        let out = crate::test_util::run(&argv, |m, c, out| run(m, c, out))?;
        Ok(out.trim_end().to_string())
    }

    #[test]
    fn increments() -> Result<()> {
        assert_eq!(bump_cli(&["1.2.3", "major"])?, "2.0.0");
        assert_eq!(bump_cli(&["1.2.3", "minor"])?, "1.3.0");
        assert_eq!(bump_cli(&["1.2.3-alpha", "patch"])?, "1.2.3");
        assert_eq!(bump_cli(&["1.2.3", "pre"])?, "1.2.4-0");
        assert_eq!(bump_cli(&["1.2.3", "prerelease", "--pre", "beta"])?, "1.2.4-beta");
        assert_eq!(bump_cli(&["1.2.3+build.5", "security"])?, "1.2.3+build.5.security.1");
        Ok(())
    }

    #[test]
    fn rejects() {
        assert!(bump_cli(&["1.2.3.4", "patch"]).is_err());
        assert!(bump_cli(&["1.2.3", "tweak"]).is_err());
        assert!(bump_cli(&["1.2.3", "patch", "--pre", "01"]).is_err());
    }

    #[test]
    fn only_v2() -> Result<()> {
        let v = Version::parse("1.2", true)?;
        let err = bump(&v, Increment::Major, "").unwrap_err();
        assert!(err.to_string().contains("fallback"));
        Ok(())
    }
}
