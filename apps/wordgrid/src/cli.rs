use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::PdfBackend;

/// Build illustrated word reference grids: chunk BIP39 wordlists, illustrate
/// them with Stable Diffusion and print them as A4 PDF grids
#[derive(Parser, Debug)]
#[command(name = "wordgrid", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split the BIP39 source lists into numbered 32-line wordlist files
    Wordlists(WordlistsArgs),
    /// Generate one image per wordlist line through the Stable Diffusion WebUI
    Images(ImagesArgs),
    /// Render wordlists and their images into PDF grids
    Grid(GridArgs),
    /// Create a small sample wordlists tree for trying the grid command
    Samples(SamplesArgs),
}

#[derive(Args, Debug)]
pub struct WordlistsArgs {
    /// Directory holding chinese_simplified.txt, english.txt and french.txt
    #[arg(long, default_value = "bip39")]
    pub bip39_dir: PathBuf,

    /// Output directory for the numbered wordlists (defaults to WORDGRID_WORDLISTS_DIR)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Remove existing *.txt files from the output directory first
    #[arg(long, default_value_t = false)]
    pub clear: bool,

    /// Report the chunks without writing anything
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Also write a final chunk shorter than 32 lines
    #[arg(long, default_value_t = false)]
    pub include_partial: bool,
}

#[derive(Args, Debug)]
pub struct ImagesArgs {
    /// Directory of wordlist files (defaults to WORDGRID_WORDLISTS_DIR)
    #[arg(short, long)]
    pub wordlists_dir: Option<PathBuf>,

    /// Process a single wordlist file instead of the whole directory
    #[arg(long)]
    pub wordlist: Option<PathBuf>,

    /// Stable Diffusion WebUI host (defaults to SD_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Stable Diffusion WebUI port (defaults to SD_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Show the prompts without contacting the backend
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Regenerate images that already exist
    #[arg(long, default_value_t = false)]
    pub force: bool,

    /// Prompt template; `{words}` is replaced by the line's words
    #[arg(long)]
    pub prompt_template: Option<String>,

    /// Pause between requests in milliseconds (defaults to IMAGE_REQUEST_DELAY_MS)
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

#[derive(Args, Debug)]
pub struct GridArgs {
    /// Directory of wordlist files (defaults to WORDGRID_WORDLISTS_DIR)
    #[arg(short, long)]
    pub wordlists_dir: Option<PathBuf>,

    /// Output directory for the PDFs (defaults to WORDGRID_OUTPUT_DIR)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Page heading
    #[arg(long, default_value = "Word Reference Grid")]
    pub title: String,

    /// One PDF per wordlist (the default mode)
    #[arg(long, default_value_t = false, conflicts_with_all = ["combined", "wordlist"])]
    pub all: bool,

    /// One page sampling every wordlist
    #[arg(long, default_value_t = false, conflicts_with = "wordlist")]
    pub combined: bool,

    /// Render a single wordlist file
    #[arg(long)]
    pub wordlist: Option<PathBuf>,

    /// Image directory for --wordlist (defaults to the sibling directory named after the file)
    #[arg(long, requires = "wordlist")]
    pub images: Option<PathBuf>,

    /// HTML-to-PDF renderer (defaults to PDF_BACKEND)
    #[arg(long)]
    pub backend: Option<PdfBackend>,
}

#[derive(Args, Debug)]
pub struct SamplesArgs {
    /// Where to create the sample tree (defaults to WORDGRID_WORDLISTS_DIR)
    #[arg(short, long)]
    pub wordlists_dir: Option<PathBuf>,

    /// Skip the ImageMagick placeholder images
    #[arg(long, default_value_t = false)]
    pub no_images: bool,

    /// ImageMagick executable used for the placeholders
    #[arg(long, default_value = "convert")]
    pub convert_bin: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_grid_modes_are_exclusive() {
        let err = Cli::try_parse_from(["wordgrid", "grid", "--combined", "--wordlist", "001.txt"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_grid_images_require_wordlist() {
        assert!(Cli::try_parse_from(["wordgrid", "grid", "--images", "001"]).is_err());

        let cli = Cli::try_parse_from([
            "wordgrid",
            "grid",
            "--wordlist",
            "wordlists/001.txt",
            "--images",
            "pics",
            "--backend",
            "weasyprint",
        ])
        .unwrap();
        let Command::Grid(args) = cli.command else {
            panic!("expected grid command");
        };
        assert_eq!(args.images, Some(PathBuf::from("pics")));
        assert_eq!(args.backend, Some(PdfBackend::WeasyPrint));
        assert_eq!(args.title, "Word Reference Grid");
    }

    #[test]
    fn test_wordlists_defaults() {
        let cli = Cli::try_parse_from(["wordgrid", "wordlists"]).unwrap();
        let Command::Wordlists(args) = cli.command else {
            panic!("expected wordlists command");
        };
        assert_eq!(args.bip39_dir, PathBuf::from("bip39"));
        assert!(!args.clear && !args.dry_run && !args.include_partial);
    }
}
