use clap::Command;
use clap::arg;
use anyhow::Result;
use anyhow::Context;
use std::io::Write;
use version::Version;

use crate::config::Config;

pub fn args() -> Command {
    Command::new("sort")
        .about("Sort versions")
        .long_about("Take a list of versions, sort and print them in descending order")
        .visible_alias("vc")
        .arg(arg!(versions: <version>... "Versions to compare and sort"))
        .arg(arg!(--"skip-invalid" "Skip invalid versions"))
        .arg(arg!(--explain "Print the scheme of each version"))
        .arg(arg!(--ascending "output in ascending order")
            .overrides_with("descending")
        )
        .arg(arg!(--descending "output in descending order (default)")
            .overrides_with("ascending")
        )
}

pub fn main(matches: &clap::ArgMatches, config: &Config) -> Result<()> {
    run(matches, config, &mut std::io::stdout().lock())
}

pub(crate) fn run<W: Write>(matches: &clap::ArgMatches, config: &Config, out: &mut W) -> Result<()> {

    let raw = matches.get_many::<String>("versions").context("version expected")?;
    let skip_invalid = matches.get_flag("skip-invalid");
    let explain = matches.get_flag("explain");

    let descending = if matches.get_flag("ascending") {
        false
    } else if matches.get_flag("descending") {
        true
    } else {
        config.descending()
    };

    let mut versions = Vec::new();
    let mut err = 0;
    for v in raw {
        match crate::parse_version(v, config) {
            Ok(v) => versions.push(v),
            Err(e) if skip_invalid => {
                tracing::debug!("skipping: {e}");
            }
            Err(e) => {
                eprintln!("error: {e}");
                err += 1;
            }
        }
    }
    if err > 0 {
        anyhow::bail!("{err} invalid version(s)");
    }

    let versions = sort_dedup(versions, descending);

    if explain {
        let mut tw = tabwriter::TabWriter::new(&mut *out);
        for v in &versions {
            writeln!(&mut tw, "{}\t{}", v, v.kind())?;
        }
        tw.flush()?;
    } else {
        for v in &versions {
            writeln!(out, "{}", v)?;
        }
    }

    Ok(())
}

/// sort ascending, drop repeats, then reverse if asked
pub(crate) fn sort_dedup(mut versions: Vec<Version>, descending: bool) -> Vec<Version> {
    version::sort_versions(&mut versions);
    versions.dedup();
    if descending {
        versions.reverse();
    }
    versions
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::run as run_cli;

    fn sort(args: &[&str]) -> Result<Vec<String>> {
        let mut argv = vec!["sort"];
        argv.extend_from_slice(args);
        let out = run_cli(&argv, |m, c, out| run(m, c, out))?;
        Ok(out.lines().map(String::from).collect())
    }

    #[test]
    fn descending_by_default() -> Result<()> {
        assert_eq!(sort(&["1.2.4", "1.2.3-rc1", "1.2.3.1", "1.2.3"])?, ["1.2.4", "1.2.3.1", "1.2.3", "1.2.3-rc1"]);
        Ok(())
    }

    #[test]
    fn ascending() -> Result<()> {
        assert_eq!(sort(&["--ascending", "1.10", "1.9", "1.2.3"])?, ["1.2.3", "1.9", "1.10"]);
        assert_eq!(sort(&["--ascending", "--descending", "1", "2"])?, ["2", "1"]);
        Ok(())
    }

    #[test]
    fn dedup_equal_across_schemes() -> Result<()> {
        // v1 1.2.3.0 == v2 1.2.3, the first one seen is kept
        assert_eq!(sort(&["--ascending", "1.2.3", "v1.2.3", "1.2.3.0"])?, ["1.2.3"]);
        assert_eq!(sort(&["--ascending", "1.2.3.0", "1.2.3"])?, ["1.2.3.0"]);
        Ok(())
    }

    #[test]
    fn invalid_versions() -> Result<()> {
        assert!(sort(&["1.2.3", "..."]).is_err());
        assert_eq!(sort(&["--skip-invalid", "1.2.3", "..."])?, ["1.2.3"]);

        // strict mode only accepts v2
        assert!(sort(&["--strict", "1.2.3", "1.2.3.4"]).is_err());
        assert_eq!(sort(&["--strict", "--skip-invalid", "1.2.3", "1.2.3.4", "r17"])?, ["1.2.3"]);
        Ok(())
    }

    #[test]
    fn ignore_tweak() -> Result<()> {
        assert_eq!(sort(&["--ignore-tweak", "1.2.3.4", "1.2.3.9"])?, ["1.2.3"]);
        Ok(())
    }

    #[test]
    fn explain() -> Result<()> {
        let lines = sort(&["--explain", "--ascending", "1.2.3", "1.2.3.4", "1.2.3.x"])?;
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("1.2.3 ") && lines[0].ends_with("v2"));
        assert!(lines[1].ends_with("v1"));
        assert!(lines[2].ends_with("fallback"));
        Ok(())
    }
}
