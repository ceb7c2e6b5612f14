mod cli;
mod config;
mod errors;
mod grid;
mod imagegen;
mod layout;
mod render;
mod samples;
mod wordlist;

use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Command, GridArgs, ImagesArgs, SamplesArgs, WordlistsArgs};
use crate::config::Config;
use crate::errors::AppError;
use crate::grid::GridOptions;
use crate::imagegen::generator::{
    process_all_wordlists, process_wordlist_file, validate_template, GenerateOptions,
};
use crate::imagegen::prompts::DEFAULT_PROMPT_TEMPLATE;
use crate::imagegen::{ImageBackend, SdClient};
use crate::layout::{GridTemplate, PageSpec};
use crate::wordlist::{build_wordlists, default_sources, BuildRequest, CHUNK_SIZE};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("wordgrid v{}", env!("CARGO_PKG_VERSION"));

    let outcome = match cli.command {
        Command::Wordlists(args) => run_wordlists(args, &config),
        Command::Images(args) => run_images(args, &config).await,
        Command::Grid(args) => run_grid(args, &config).await,
        Command::Samples(args) => run_samples(args, &config).await,
    };

    match outcome {
        Ok(0) => Ok(()),
        Ok(failures) => bail!("{failures} item(s) failed"),
        Err(e) => {
            error!("{e}");
            if let Some(hint) = e.hint() {
                error!("{hint}");
            }
            Err(e.into())
        }
    }
}

// Each command returns the number of items that failed without aborting the run.

fn run_wordlists(args: WordlistsArgs, config: &Config) -> Result<usize, AppError> {
    let request = BuildRequest {
        sources: default_sources(&args.bip39_dir),
        output_dir: args.output.unwrap_or_else(|| config.wordlists_dir.clone()),
        chunk_size: CHUNK_SIZE,
        include_partial: args.include_partial,
        clear: args.clear,
        dry_run: args.dry_run,
    };

    let summary = build_wordlists(&request)?;
    if summary.cleared > 0 {
        info!("Removed {} existing wordlist files", summary.cleared);
    }
    info!(
        "{} {} wordlist files from {} words in {}",
        if request.dry_run { "Would write" } else { "Wrote" },
        summary.chunks_written,
        summary.total_words,
        request.output_dir.display()
    );
    Ok(0)
}

async fn run_images(args: ImagesArgs, config: &Config) -> Result<usize, AppError> {
    let prompt_template = args
        .prompt_template
        .unwrap_or_else(|| DEFAULT_PROMPT_TEMPLATE.to_string());
    validate_template(&prompt_template)?;

    let options = GenerateOptions {
        prompt_template,
        dry_run: args.dry_run,
        force: args.force,
        delay: Duration::from_millis(args.delay_ms.unwrap_or(config.image_request_delay_ms)),
    };

    let client = if options.dry_run {
        None
    } else {
        let mut config = config.clone();
        if let Some(host) = args.host {
            config.sd_host = host;
        }
        if let Some(port) = args.port {
            config.sd_port = port;
        }
        let client = SdClient::new(config.sd_base_url())?;
        client.connect().await?;
        info!("Connected to Stable Diffusion WebUI at {}", client.base_url());
        Some(client)
    };
    let backend = client.as_ref().map(|c| c as &dyn ImageBackend);

    let stats = match args.wordlist {
        Some(file) => process_wordlist_file(backend, &file, &options).await?,
        None => {
            let dir = args
                .wordlists_dir
                .unwrap_or_else(|| config.wordlists_dir.clone());
            process_all_wordlists(backend, &dir, &options).await?
        }
    };

    info!("{}", stats.summary(options.dry_run));
    Ok(stats.failed)
}

async fn run_grid(args: GridArgs, config: &Config) -> Result<usize, AppError> {
    let mut config = config.clone();
    if let Some(backend) = args.backend {
        config.pdf_backend = backend;
    }
    let renderer = render::renderer_for(&config);

    let wordlists_dir = args
        .wordlists_dir
        .unwrap_or_else(|| config.wordlists_dir.clone());
    let options = GridOptions {
        title: args.title,
        output_dir: args.output.unwrap_or_else(|| config.output_dir.clone()),
        template: GridTemplate::default(),
        page_spec: PageSpec::default(),
    };

    if let Some(wordlist) = args.wordlist {
        grid::generate_single(renderer.as_ref(), &wordlist, args.images.as_deref(), &options)
            .await?;
        return Ok(0);
    }

    if args.combined {
        grid::generate_combined(renderer.as_ref(), &wordlists_dir, &options).await?;
        return Ok(0);
    }

    if args.all {
        info!("Rendering every wordlist in {}", wordlists_dir.display());
    }
    let summary = grid::generate_all(renderer.as_ref(), &wordlists_dir, &options).await?;
    info!(
        "Generated {} PDFs ({} failed, {} skipped) in {}",
        summary.succeeded,
        summary.failed,
        summary.skipped,
        options.output_dir.display()
    );
    Ok(summary.failed)
}

async fn run_samples(args: SamplesArgs, config: &Config) -> Result<usize, AppError> {
    let dir = args
        .wordlists_dir
        .unwrap_or_else(|| config.wordlists_dir.clone());
    let summary = samples::create_samples(&dir, !args.no_images, &args.convert_bin).await?;

    info!(
        "Created {} sample wordlists and {} placeholder images in {}",
        summary.wordlists,
        summary.images,
        dir.display()
    );
    if summary.image_failures > 0 {
        warn!("{} placeholder images could not be drawn", summary.image_failures);
    }
    info!("Next: wordgrid grid --all --wordlists-dir {}", dir.display());
    Ok(0)
}
