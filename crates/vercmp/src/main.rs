use anyhow::Result;
use camino::Utf8PathBuf;
use vercmp::config::Config;

fn main() -> Result<()> {

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .without_time()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("VERCMP_LOG"))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let matches = vercmp::get_cli().get_matches_from(wild::args());

    let config_file = matches.get_one::<String>("config").map(|s| Utf8PathBuf::from(s.as_str()));
    let mut config = Config::load(config_file.as_deref())?;
    config.apply_args(&matches);
    tracing::trace!(?config);

    vercmp::main_cli(&matches, &config)
}
