//! Sample data: a small `wordlists/` tree for trying the grid command
//! without BIP39 sources or an image backend.
//!
//! Placeholder images are drawn with ImageMagick's `convert` when it is on
//! the PATH; otherwise only the text files and empty image directories are
//! created.

use std::path::Path;

use tokio::process::Command;
use tracing::{info, warn};

use crate::errors::AppError;

const FRUITS: [&str; 32] = [
    "Apple", "Banana", "Cherry", "Date", "Elderberry", "Fig", "Grape", "Honeydew",
    "Kiwi", "Lemon", "Mango", "Orange", "Papaya", "Quince", "Raspberry", "Strawberry",
    "Tangerine", "Ugli", "Vanilla", "Watermelon", "Xigua", "Yuzu", "Zucchini", "Avocado",
    "Blueberry", "Coconut", "Dragonfruit", "Eggplant", "Fennel", "Garlic", "Hazelnut", "Iceberg",
];

const ANIMALS: [&str; 32] = [
    "Ant", "Bear", "Cat", "Dog", "Elephant", "Fox", "Giraffe", "Horse",
    "Iguana", "Jaguar", "Kangaroo", "Lion", "Mouse", "Newt", "Owl", "Penguin",
    "Quail", "Rabbit", "Snake", "Tiger", "Unicorn", "Vulture", "Wolf", "Xenops",
    "Yak", "Zebra", "Aardvark", "Badger", "Cheetah", "Dolphin", "Eagle", "Flamingo",
];

const COLOURS: [&str; 32] = [
    "Red", "Blue", "Green", "Yellow", "Orange", "Purple", "Pink", "Brown",
    "Black", "White", "Gray", "Violet", "Indigo", "Turquoise", "Magenta", "Cyan",
    "Maroon", "Navy", "Olive", "Lime", "Aqua", "Teal", "Silver", "Gold",
    "Crimson", "Scarlet", "Azure", "Beige", "Coral", "Ivory", "Khaki", "Lavender",
];

/// A sample list with its placeholder colour scheme `(background, text)`.
struct SampleList {
    id: &'static str,
    words: &'static [&'static str],
    colours: (&'static str, &'static str),
}

const SAMPLES: [SampleList; 3] = [
    SampleList {
        id: "001",
        words: &FRUITS,
        colours: ("#FF6B6B", "#4ECDC4"),
    },
    SampleList {
        id: "002",
        words: &ANIMALS,
        colours: ("#45B7D1", "#96CEB4"),
    },
    SampleList {
        id: "003",
        words: &COLOURS,
        colours: ("#FECA57", "#FF9FF3"),
    },
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleSummary {
    pub wordlists: usize,
    pub images: usize,
    pub image_failures: usize,
}

/// Writes the sample wordlists and, if `with_images`, their placeholder images.
pub async fn create_samples(
    wordlists_dir: &Path,
    with_images: bool,
    convert_bin: &str,
) -> Result<SampleSummary, AppError> {
    tokio::fs::create_dir_all(wordlists_dir)
        .await
        .map_err(|e| AppError::partial_write(wordlists_dir, e))?;

    info!("Creating sample wordlist structure in {}", wordlists_dir.display());

    let imagemagick = with_images && imagemagick_available(convert_bin).await;
    if with_images && !imagemagick {
        info!("ImageMagick `{convert_bin}` not found; skipping placeholder images");
    }

    let mut summary = SampleSummary::default();
    for sample in &SAMPLES {
        let txt_path = wordlists_dir.join(format!("{}.txt", sample.id));
        let body: String = sample.words.iter().map(|w| format!("{w}\n")).collect();
        tokio::fs::write(&txt_path, body)
            .await
            .map_err(|e| AppError::partial_write(&txt_path, e))?;
        info!("Created {} ({} words)", txt_path.display(), sample.words.len());
        summary.wordlists += 1;

        let img_dir = wordlists_dir.join(sample.id);
        tokio::fs::create_dir_all(&img_dir)
            .await
            .map_err(|e| AppError::partial_write(&img_dir, e))?;

        if imagemagick {
            for (i, word) in sample.words.iter().enumerate() {
                let img_path = img_dir.join(format!("{:03}.png", i + 1));
                match create_placeholder(convert_bin, &img_path, word, sample.colours).await {
                    Ok(()) => summary.images += 1,
                    Err(e) => {
                        warn!("Failed to create {}: {e}", img_path.display());
                        summary.image_failures += 1;
                    }
                }
            }
            info!("Created placeholder images for {}", sample.id);
        }
    }

    Ok(summary)
}

async fn imagemagick_available(convert_bin: &str) -> bool {
    Command::new(convert_bin)
        .arg("-version")
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Draws a 300×200 label image. Retries once without the font option, which
/// is not installed everywhere.
async fn create_placeholder(
    convert_bin: &str,
    img_path: &Path,
    word: &str,
    (background, fill): (&str, &str),
) -> Result<(), AppError> {
    let with_font = placeholder_args(img_path, word, background, fill, true);
    if run_convert(convert_bin, &with_font).await.is_ok() {
        return Ok(());
    }
    let plain = placeholder_args(img_path, word, background, fill, false);
    run_convert(convert_bin, &plain).await
}

fn placeholder_args(
    img_path: &Path,
    word: &str,
    background: &str,
    fill: &str,
    with_font: bool,
) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-size".into(),
        "300x200".into(),
        "-background".into(),
        background.into(),
        "-fill".into(),
        fill.into(),
        "-gravity".into(),
        "center".into(),
    ];
    if with_font {
        args.extend(["-pointsize", "24", "-font", "Arial-Bold"].map(String::from));
    }
    args.push(format!("label:{word}"));
    args.push(img_path.to_string_lossy().to_string());
    args
}

async fn run_convert(convert_bin: &str, args: &[String]) -> Result<(), AppError> {
    let output = Command::new(convert_bin)
        .args(args)
        .output()
        .await
        .map_err(|e| AppError::Render(format!("Failed to run {convert_bin}: {e}")))?;
    if output.status.success() {
        Ok(())
    } else {
        Err(AppError::Render(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}
