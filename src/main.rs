use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use wa_message::config::{AllowList, MessageConfig, StickerMetadata};
use wa_message::content::Content;
use wa_message::message::{MessageFields, detect_content};
use wa_message::types::RawMessage;
use wa_message::{UreqHttpClient, mime, sticker};

// Offline helpers around the message wrapper.
//
// Usage:
//   wa-message inspect event.json --user 15551234567@s.whatsapp.net --sudo 15557654321
//   wa-message detect https://example.com/cat.jpg
//   wa-message detect ./clip.mp4
//   wa-message tag-sticker in.webp out.webp --pack "My pack" --author me

#[derive(Parser)]
#[command(name = "wa-message", about = "Inspect and prepare WhatsApp bot messages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the normalized fields of a JSON-encoded message event.
    Inspect {
        payload: PathBuf,
        /// JID of the logged-in account.
        #[arg(long, default_value = "")]
        user: String,
        /// Overrides SUDO from the environment.
        #[arg(long)]
        sudo: Option<String>,
        /// Overrides DEVS from the environment.
        #[arg(long)]
        devs: Option<String>,
        /// Overrides HANDLERS from the environment.
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Show how `send` would classify a URL or a local file.
    Detect { target: String },
    /// Stamp sticker pack metadata into a WebP file.
    TagSticker {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        pack: Option<String>,
        #[arg(long)]
        author: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "{} [{:<5}] [{}] - {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let cli = Cli::parse();

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to build tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(run(cli.command)) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Inspect {
            payload,
            user,
            sudo,
            devs,
            prefix,
        } => {
            let data = tokio::fs::read(&payload)
                .await
                .with_context(|| format!("reading {}", payload.display()))?;
            let raw = RawMessage::from_slice(&data).context("parsing message event")?;

            let mut config = MessageConfig::from_env();
            if let Some(sudo) = sudo {
                config.sudo = AllowList::parse(&sudo);
            }
            if let Some(devs) = devs {
                config.devs = AllowList::parse(&devs);
            }
            if let Some(prefix) = prefix {
                config.prefix = prefix;
            }

            let fields = MessageFields::from_raw(&user, &config, &raw);
            println!("{}", serde_json::to_string_pretty(&fields)?);
        }
        Command::Detect { target } => {
            let path = PathBuf::from(&target);
            let content = if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                let data = tokio::fs::read(&path).await?;
                if let Some(file_type) = mime::sniff(&data) {
                    info!("{} looks like {} (.{})", target, file_type.mime, file_type.ext);
                }
                Content::from(data)
            } else {
                Content::from(target.clone())
            };

            let http = UreqHttpClient::new();
            let detection = detect_content(&http, &content).await;
            if let Some(diagnostic) = &detection.diagnostic {
                info!("{}", diagnostic);
            }
            match detection.kind {
                Some(kind) => println!("{}", kind.as_str()),
                None => println!("undetermined (sent as text)"),
            }
        }
        Command::TagSticker {
            input,
            output,
            pack,
            author,
        } => {
            let defaults = StickerMetadata::send_default();
            let metadata = StickerMetadata::new(
                pack.unwrap_or(defaults.pack_name),
                author.unwrap_or(defaults.author),
            );
            let data = tokio::fs::read(&input)
                .await
                .with_context(|| format!("reading {}", input.display()))?;
            let tagged = sticker::write_exif_webp(&data, &metadata)?;
            tokio::fs::write(&output, &tagged).await?;
            info!(
                "Wrote {} ({} bytes) for pack '{}'",
                output.display(),
                tagged.len(),
                metadata.pack_name
            );
        }
    }
    Ok(())
}
