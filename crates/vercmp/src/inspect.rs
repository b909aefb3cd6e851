use clap::Command;
use clap::arg;
use anyhow::Result;
use anyhow::Context;
use std::io::Write;
use version::Version;

use crate::config::Config;

pub fn args() -> Command {
    Command::new("inspect")
        .about("Show the scheme and fields of a version")
        .arg(arg!(<version> "version to inspect"))
}

pub fn main(matches: &clap::ArgMatches, config: &Config) -> Result<()> {
    run(matches, config, &mut std::io::stdout().lock())
}

pub(crate) fn run<W: Write>(matches: &clap::ArgMatches, config: &Config, out: &mut W) -> Result<()> {
    let raw = matches.get_one::<String>("version").context("version expected")?;
    let v = crate::parse_version(raw, config)?;

    let mut tw = tabwriter::TabWriter::new(&mut *out);
    for (key, value) in fields(&v) {
        writeln!(&mut tw, "{key}\t{value}")?;
    }
    tw.flush()?;
    Ok(())
}

pub(crate) fn fields(v: &Version) -> Vec<(&'static str, String)> {

    let mut fields = vec![
        ("scheme", v.kind().to_string()),
        ("canonical", v.to_string()),
    ];

    match v {
        Version::V1(v) => {
            fields.push(("major", v.major.to_string()));
            fields.push(("minor", v.minor.to_string()));
            fields.push(("patch", v.patch.to_string()));
            fields.push(("tweak", v.tweak.map_or_else(|| String::from("-"), |t| t.to_string())));
        }
        Version::V2(v) => {
            fields.push(("major", v.major.to_string()));
            fields.push(("minor", v.minor.to_string()));
            fields.push(("patch", v.patch.to_string()));
            fields.push(("prerelease", v.prerelease().to_string()));
            fields.push(("build", v.build_meta().to_string()));
            fields.push(("security", v.security.to_string()));
        }
        Version::Fallback(v) => {
            fields.push(("segments", v.segments().join(" ")));
        }
    }

    fields
}

#[cfg(test)]
mod test {
    use super::*;

    fn get(fields: &[(&'static str, String)], key: &str) -> String {
        fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone()).unwrap_or_default()
    }

    #[test]
    fn v2_fields() -> Result<()> {
        let f = fields(&Version::parse("v1.2.3-rc.1+build.5.security.2", true)?);
        assert_eq!(get(&f, "scheme"), "v2");
        assert_eq!(get(&f, "canonical"), "1.2.3-rc.1+build.5.security.2");
        assert_eq!(get(&f, "prerelease"), "rc.1");
        assert_eq!(get(&f, "build"), "build.5");
        assert_eq!(get(&f, "security"), "2");
        Ok(())
    }

    #[test]
    fn v1_and_fallback_fields() -> Result<()> {
        let f = fields(&Version::parse("1.2.3.4", true)?);
        assert_eq!(get(&f, "scheme"), "v1");
        assert_eq!(get(&f, "tweak"), "4");

        let f = fields(&Version::parse("2024..r17.git", true)?);
        assert_eq!(get(&f, "scheme"), "fallback");
        assert_eq!(get(&f, "canonical"), "2024.r17.git");
        assert_eq!(get(&f, "segments"), "2024 r17 git");
        Ok(())
    }

    #[test]
    fn command_line() -> Result<()> {
        let out = crate::test_util::run(&["inspect", "--ignore-tweak", "1.2.3.4"], |m, c, out| run(m, c, out))?;
        let tweak = out.lines().find(|l| l.starts_with("tweak")).unwrap_or_default();
        assert!(tweak.ends_with('-'));
        Ok(())
    }
}
