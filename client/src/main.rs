use std::path::PathBuf;

use chrono::DateTime;
use clap::{Parser, Subcommand};
use podu_client::{HttpUploadApi, LocalImage, Uploader};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use upload_history::{FileBackend, HistoryStore};

#[derive(Parser)]
#[command(name = "podu", version, about = "Turn your images into links")]
struct Cli {
    /// Base URL of the upload service
    #[arg(long, env = "PODU_API_URL", default_value = "http://localhost:8001")]
    api_url: String,

    /// Directory holding the upload history, defaults to ~/.podu
    #[arg(long, env = "PODU_HISTORY_DIR")]
    history_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload an image and print its public link
    Upload {
        path: PathBuf,

        /// Override the content type guessed from the file extension
        #[arg(long)]
        content_type: Option<String>,
    },
    /// List recent uploads, newest first
    History,
    /// Forget all recent uploads
    Clear,
}

fn default_history_dir() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from(".podu"),
        |home| PathBuf::from(home).join(".podu"),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let history_dir = cli.history_dir.unwrap_or_else(default_history_dir);
    let history = HistoryStore::spawn(FileBackend::new(history_dir));
    let uploader = Uploader::new(HttpUploadApi::new(cli.api_url)?, history);

    match cli.command {
        Command::Upload { path, content_type } => {
            let image = LocalImage::open(&path, content_type).await?;

            let response = uploader.upload(&image).await?;
            println!("{}", response.url);
        }
        Command::History => {
            let history = uploader.history().await?;
            if history.is_empty() {
                println!("No uploads yet");
            }
            for entry in history.entries() {
                let uploaded_at = DateTime::from_timestamp_millis(entry.timestamp)
                    .map_or_else(|| entry.timestamp.to_string(), |at| at.to_rfc3339());
                println!("{uploaded_at}  {}", entry.url);
            }
        }
        Command::Clear => {
            uploader.clear_history().await?;
            println!("History cleared");
        }
    }

    Ok(())
}
