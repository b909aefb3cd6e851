use clap::Command;
use clap::arg;
use anyhow::Result;
use std::io::Write;
use catalog::Catalog;

use crate::config::Config;

pub fn args() -> Command {
    Command::new("list")
        .about("List all versions in a catalog, newest first")
        .arg(arg!(<catalog> "catalog json file"))
        .arg(arg!([pkg]... "package names, all packages when omitted"))
        .arg(crate::arch_arg())
        .arg(crate::channel_arg())
        .arg(arg!(--limit <N> "Limit to the N latest versions per package")
            .value_parser(clap::value_parser!(u32))
            .default_value("0")
        )
}

pub fn main(matches: &clap::ArgMatches, config: &Config) -> Result<()> {
    run(matches, config, &mut std::io::stdout().lock())
}

pub(crate) fn run<W: Write>(matches: &clap::ArgMatches, config: &Config, out: &mut W) -> Result<()> {

    let mut cat = crate::load_catalog(matches, config)?;

    let arch = crate::or_config(crate::pull_many(matches, "arch"), &config.arch);
    cat.filter_arch(&arch);

    let limit = matches.get_one::<u32>("limit").copied().unwrap_or(0) as usize;

    let mut tw = tabwriter::TabWriter::new(&mut *out);
    writeln!(&mut tw, "name\tversion\tscheme\tarch\tchannels")?;
    write_rows(&mut tw, &cat, limit, config.ignore_tweak)?;
    tw.flush()?;
    Ok(())
}

fn write_rows<W: Write>(w: &mut W, cat: &Catalog, limit: usize, ignore_tweak: bool) -> Result<()> {
    for name in cat.packages.keys() {
        let Some(entries) = cat.sorted(name) else {
            continue;
        };

        let take = if limit == 0 { entries.len() } else { limit };
        for entry in entries.iter().rev().take(take) {
            let mut version = entry.version.clone();
            if ignore_tweak {
                version.ignore_tweak();
            }
            for info in &entry.infos {
                let arch = info.arch.as_deref().unwrap_or(catalog::NOARCH);
                writeln!(w, "{}\t{}\t{}\t{}\t{}", name, version, version.kind(), arch, info.channels.join(","))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn table(cat: &Catalog, limit: usize) -> Result<Vec<String>> {
        let mut out = Vec::new();
        write_rows(&mut out, cat, limit, false)?;
        Ok(String::from_utf8(out)?.lines().map(String::from).collect())
    }

    fn fixture() -> Result<Catalog> {
        let mut cat = Catalog::default();
        cat.add_version("foo", "1.2.3", None, Some("stable"), "f", "u")?;
        cat.add_version("foo", "1.2.4", Some("x86_64"), Some("beta"), "f", "u")?;
        cat.add_version("foo", "1.2.4", Some("aarch64"), Some("beta"), "f", "u")?;
        cat.add_version("foo", "1.2.3.7", None, Some("stable"), "f", "u")?;
        cat.add_version("bar", "0.9", None, None, "f", "u")?;
        Ok(cat)
    }

    #[test]
    fn newest_first() -> Result<()> {
        let rows = table(&fixture()?, 0)?;
        assert_eq!(rows, [
            "bar\t0.9\tfallback\tnoarch\t",
            "foo\t1.2.4\tv2\tx86_64\tbeta",
            "foo\t1.2.4\tv2\taarch64\tbeta",
            "foo\t1.2.3.7\tv1\tnoarch\tstable",
            "foo\t1.2.3\tv2\tnoarch\tstable",
        ]);
        Ok(())
    }

    #[test]
    fn limit() -> Result<()> {
        let rows = table(&fixture()?, 1)?;
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| !r.contains("1.2.3")));
        Ok(())
    }
}
