use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use yaspeech::config::proc_loader::file_to_config;
use yaspeech::observability::metrics::render_metrics;
use yaspeech::utils::logging::{self, LogLevel};
use yaspeech::SpeechKit;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "yaspeech.yaml")]
    config: PathBuf,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// Print metrics in text exposition format to stderr before exiting
    #[arg(long)]
    dump_metrics: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a current IAM token
    Token,
    /// List service accounts of the configured folder
    Accounts,
    /// Create an authorized key for a service account
    CreateKey {
        #[arg(long)]
        account_id: String,
    },
    /// Synthesize text into an audio file
    Synthesize {
        #[arg(long)]
        text: String,
        #[arg(long, default_value = "audio.ogg")]
        out: PathBuf,
    },
    /// Recognize speech in an audio file
    Recognize {
        #[arg(long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let service_config = file_to_config(&args.config)
        .await
        .with_context(|| format!("loading config {}", args.config.display()))?;
    logging::run(&service_config.settings, args.log_level);

    // -------------------------------
    // 2. Build token cache and clients
    // -------------------------------

    let kit = SpeechKit::from_config(&service_config)
        .await
        .context("building clients")?;
    let folder_id = service_config.speech.folder_id.as_str();

    // -------------------------------
    // 3. Run command
    // -------------------------------

    let outcome = run(&kit, folder_id, args.command).await;
    kit.shutdown();

    if args.dump_metrics {
        eprint!("{}", render_metrics().await);
    }
    outcome
}

async fn run(kit: &SpeechKit, folder_id: &str, command: Command) -> Result<()> {
    match command {
        Command::Token => {
            let token = kit.tokens.get_token().await.context("obtaining IAM token")?;
            println!("{token}");
        }
        Command::Accounts => {
            let accounts = kit
                .iam
                .list_service_accounts(folder_id)
                .await
                .context("listing service accounts")?;
            for account in accounts {
                println!("{}\t{}\t{}", account.id, account.name, account.created_at.to_rfc3339());
            }
        }
        Command::CreateKey { account_id } => {
            let key = kit
                .iam
                .create_service_account_key(&account_id)
                .await
                .context("creating service account key")?;
            println!("Key ID: {}\nPrivate key:\n{}", key.key_id, key.private_key);
        }
        Command::Synthesize { text, out } => {
            let audio = kit.tts.synthesize(&text).await.context("synthesizing speech")?;
            write_audio(&out, &audio).await?;
            info!("wrote {} bytes to {}", audio.len(), out.display());
        }
        Command::Recognize { input } => {
            let text = kit
                .stt
                .recognize_file(&input)
                .await
                .context("recognizing speech")?;
            println!("{text}");
        }
    }
    Ok(())
}

async fn write_audio(path: &Path, audio: &[u8]) -> Result<()> {
    tokio::fs::write(path, audio)
        .await
        .with_context(|| format!("writing {}", path.display()))
}
