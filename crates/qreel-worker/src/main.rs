//! `qreel` command-line front end.

use std::net::SocketAddr;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use qreel_matcher::MatchProvider;
use qreel_models::{Quote, VoiceSpec};
use tracing::{error, info};

use qreel_worker::error::{is_retryable_failure, EX_TEMPFAIL};
use qreel_worker::{
    build_generator, build_matcher, generate_quote, init_tracing, list_videos, AppConfig,
    QuoteReelService,
};

#[derive(Parser)]
#[command(name = "qreel", about = "Turn quotes into vertical stock-footage videos")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Match footage for a quote and render the video.
    Render {
        /// Quote text; generated when omitted.
        #[arg(short, long)]
        quote: Option<String>,

        /// Quote author.
        #[arg(short, long, default_value = "Anonymous")]
        author: String,

        /// Topic used for generation and as matching context.
        #[arg(short, long)]
        topic: Option<String>,

        /// Footage provider (coverr, pexels, pixabay).
        #[arg(short, long)]
        provider: Option<MatchProvider>,

        /// Narration voice, e.g. "en-US-GuyNeural".
        #[arg(long, conflicts_with = "no_voice")]
        voice: Option<String>,

        /// Render without narration.
        #[arg(long)]
        no_voice: bool,

        /// Output length in seconds.
        #[arg(short, long)]
        duration: Option<f64>,
    },

    /// Generate a quote.
    Quote {
        #[arg(short, long)]
        topic: Option<String>,
    },

    /// Print the footage candidate for a quote.
    Match {
        /// Quote text.
        quote: String,

        #[arg(short, long)]
        topic: Option<String>,

        #[arg(short, long)]
        provider: Option<MatchProvider>,
    },

    /// List rendered videos in the output directory.
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let retryable = is_retryable_failure(&e);
            error!(retryable, "{:#}", e);
            if retryable {
                ExitCode::from(EX_TEMPFAIL)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env().context("loading configuration")?;

    if let Some(addr) = config.metrics_listen_addr {
        start_metrics_exporter(addr)?;
    }

    match cli.command {
        Command::Render {
            quote,
            author,
            topic,
            provider,
            voice,
            no_voice,
            duration,
        } => {
            if let Some(provider) = provider {
                config.provider = provider;
            }
            let voice_id = if no_voice { None } else { voice.or(config.voice.clone()) };

            let http = reqwest::Client::new();
            let generator = build_generator(http)?;

            let quote = match quote {
                Some(text) => {
                    let quote = Quote::new(text, author);
                    match &topic {
                        Some(topic) => quote.with_topic(topic.as_str()),
                        None => quote,
                    }
                }
                None => generate_quote(generator.clone(), topic.as_deref()).await?,
            };
            info!(text = %quote.text, author = %quote.author, "Rendering quote");

            let service = QuoteReelService::from_config(&config, generator)?;
            let video = service
                .render(quote, voice_id.map(VoiceSpec::synthesize), duration)
                .await?;

            println!("{}", video.path.display());
        }

        Command::Quote { topic } => {
            let generator = build_generator(reqwest::Client::new())?;
            let quote = generate_quote(generator, topic.as_deref()).await?;
            println!("{}\n\u{2014} {}", quote.text, quote.author);
        }

        Command::Match {
            quote,
            topic,
            provider,
        } => {
            let http = reqwest::Client::new();
            let generator = build_generator(http.clone())?;
            let matcher = build_matcher(provider.unwrap_or(config.provider), generator, http)?;

            let candidate = matcher
                .match_quote(&quote, topic.as_deref())
                .await
                .with_context(|| format!("{} found no footage", matcher.provider()))?;
            println!("{}", serde_json::to_string_pretty(&candidate)?);
        }

        Command::List => {
            let videos = list_videos(&config.render.output_dir).await?;
            if videos.is_empty() {
                println!("No videos in {}", config.render.output_dir.display());
            }
            for video in videos {
                println!(
                    "{}\t{:.1} MB\t{}",
                    video.file_name,
                    video.size_bytes as f64 / 1_048_576.0,
                    video.modified.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
    }

    Ok(())
}

fn start_metrics_exporter(addr: SocketAddr) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("installing Prometheus exporter")?;
    info!(%addr, "Prometheus exporter listening");
    Ok(())
}
