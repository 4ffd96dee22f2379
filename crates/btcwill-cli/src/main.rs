mod cli;
mod config;
mod storage;
mod wills;

use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Command, ConfigCommand, WillCommand};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = cli::Cli::parse();
    let config = config::load()?;
    match cli.command.unwrap_or(Command::Will(WillCommand::List)) {
        Command::Version => print_version(),
        Command::Health => run_health_check(&config).await?,
        Command::Config(ConfigCommand::Init) => init_config(&config)?,
        Command::Will(cmd) => wills::handle(cmd, &config).await?,
    }

    Ok(())
}

fn init_tracing() {
    // Logs go to stderr so compiled documents on stdout stay clean.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_version() {
    println!("btcwill {}", env!("CARGO_PKG_VERSION"));
}

async fn run_health_check(config: &config::Config) -> Result<()> {
    let store = storage::store_from_config(config)?;
    wills::run_store_health(&store).await?;
    println!("Storage: ok ({})", store.root().display());

    let codec = wills::codec_from_config(config);
    wills::run_codec_health(&codec)?;
    println!("Codec: ok (key {})", codec.key_id().unwrap_or("unavailable"));
    Ok(())
}

fn init_config(config: &config::Config) -> Result<()> {
    let path = config::write_default_if_missing(config)?;
    println!("Config initialized at {}", path.display());
    Ok(())
}
