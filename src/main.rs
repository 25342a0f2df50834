use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use video_grabber_lib::commands::{download_video, get_video_info, render_menu};
use video_grabber_lib::downloader::tools::ToolManager;
use video_grabber_lib::downloader::ArtifactPolicy;
use video_grabber_lib::logging;
use video_grabber_lib::{GrabberConfig, MenuPolicy, Selection, SelectionMode};

/// Pick video/audio streams for a URL and download them as one file
#[derive(Debug, Parser)]
#[command(name = "video-grabber", version)]
#[command(about = "Inspect formats, download once, get one merged file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// SOCKS5/HTTP proxy passed to yt-dlp
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// cookies.txt file passed to yt-dlp
    #[arg(long, global = true)]
    cookies: Option<String>,

    /// Read cookies from this browser (chrome, firefox, ...)
    #[arg(long, global = true)]
    cookies_from_browser: Option<String>,

    /// Download timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the selectable formats of a URL
    Inspect {
        url: String,

        /// Resolution ladder menu instead of individual streams
        #[arg(long)]
        ladder: bool,
    },

    /// Download one selection and save it
    Fetch {
        url: String,

        #[arg(long, value_enum, default_value_t = ModeArg::Combined)]
        mode: ModeArg,

        /// Video format id (per-stream menu)
        #[arg(long)]
        video: Option<String>,

        /// Audio format id (per-stream menu)
        #[arg(long)]
        audio: Option<String>,

        /// Target height (ladder menu)
        #[arg(long)]
        height: Option<u32>,

        #[arg(long)]
        ladder: bool,

        /// Take the newest file if yt-dlp leaves more than one
        #[arg(long)]
        newest: bool,

        /// Directory to save into (defaults to the Downloads folder)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show yt-dlp / ffmpeg availability
    Doctor,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Combined,
    Video,
    Audio,
}

impl From<ModeArg> for SelectionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Combined => SelectionMode::CombinedBestQuality,
            ModeArg::Video => SelectionMode::VideoOnly,
            ModeArg::Audio => SelectionMode::AudioOnly,
        }
    }
}

fn base_config(cli: &Cli) -> GrabberConfig {
    let mut config = GrabberConfig::from_env()
        .with_cookies_path(cli.cookies.clone())
        .with_cookies_from_browser(cli.cookies_from_browser.clone());
    if cli.proxy.is_some() {
        config = config.with_proxy(cli.proxy.clone());
    }
    if let Some(secs) = cli.timeout {
        config = config.with_download_timeout(secs);
    }
    config
}

fn policy(ladder: bool) -> MenuPolicy {
    if ladder {
        MenuPolicy::ResolutionLadder
    } else {
        MenuPolicy::PerStream
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = base_config(&cli);

    let outcome = match cli.command {
        Command::Inspect { url, ladder } => {
            let config = config.with_menu_policy(policy(ladder));
            get_video_info(&url, &config).await.map(|inspection| {
                for line in render_menu(&inspection) {
                    println!("{}", line);
                }
            })
        }
        Command::Fetch {
            url,
            mode,
            video,
            audio,
            height,
            ladder,
            newest,
            output,
        } => {
            let mut config = config.with_menu_policy(policy(ladder));
            if newest {
                config = config.with_artifact_policy(ArtifactPolicy::NewestModified);
            }
            let selection = Selection {
                mode: mode.into(),
                video_id: video,
                audio_id: audio,
                height,
            };
            match download_video(&url, &selection, &config).await {
                Ok(result) => {
                    let dir = output
                        .or_else(dirs::download_dir)
                        .unwrap_or_else(|| PathBuf::from("."));
                    let target = dir.join(&result.suggested_filename);
                    tokio::fs::write(&target, &result.data)
                        .await
                        .map(|_| {
                            println!(
                                "✅ Saved {} ({}, {} bytes)",
                                target.display(),
                                result.mime_type,
                                result.data.len()
                            )
                        })
                        .map_err(|e| format!("Could not write {}: {}", target.display(), e))
                }
                Err(e) => Err(e),
            }
        }
        Command::Doctor => {
            for tool in ToolManager::new(config).get_all_tools() {
                let status = if tool.is_available { "✔" } else { "✖" };
                println!(
                    "{} {:<7} {} {}",
                    status,
                    tool.name,
                    tool.version.as_deref().unwrap_or("not found"),
                    tool.path
                );
            }
            Ok(())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("❌ {}", message);
            ExitCode::FAILURE
        }
    }
}
