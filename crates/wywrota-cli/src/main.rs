use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use wywrota_client::Session;

mod credentials;
mod output;

use credentials::Credentials;

#[derive(Parser)]
#[command(name = "wywrota")]
#[command(about = "Fetch lyrics and chords from the wywrota.pl songbook")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with the environment credentials and report whether the site accepts them
    Login,

    /// Log in, fetch a song page, and print or write the split lyrics and chords
    Fetch {
        /// Song page URL, e.g. "https://spiewnik.wywrota.pl/dzem/whisky"
        url: String,

        /// Write lyrics.txt, chords.txt, and song.json here instead of printing
        #[arg(short = 'O', long)]
        output_dir: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a .env file if present; credentials may live there.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(&cli);

    match cli.command {
        Commands::Login => {
            let creds = Credentials::from_env()?;
            let session = Session::log_in(&creds.username, &creds.password)
                .await
                .context("login failed")?;
            tracing::info!(user = %creds.username, "Credentials accepted");
            session.close();
        }
        Commands::Fetch { url, output_dir } => {
            let creds = Credentials::from_env()?;
            let session = Session::log_in(&creds.username, &creds.password)
                .await
                .context("login failed")?;
            tracing::info!(url = %url, "Fetching song");
            let song = session.fetch_song(&url).await?;
            session.close();

            let Some(song) = song else {
                anyhow::bail!("no song found at {url}");
            };
            tracing::info!(
                lyric_lines = song.lyric_lines(),
                chord_lines = song.chord_lines(),
                "Fetched song"
            );

            match output_dir {
                Some(dir) => output::write_song(&song, &url, &dir)?,
                None => print!("{}", song.interleaved()),
            }
        }
    }

    Ok(())
}

fn init_tracing(cli: &Cli) {
    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(
                time_format.to_string(),
            ))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(
                time_format.to_string(),
            ))
            .init();
    }
}
