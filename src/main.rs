use clap::{Parser, Subcommand};
use gallery_preview::{ArchiveDetection, GalleryIndex, build_index, config, output, sample};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Shared flags for commands that build an index.
#[derive(clap::Args, Clone)]
struct IndexArgs {
    /// Directories, archives, or image files to index
    #[arg(required = true)]
    roots: Vec<PathBuf>,

    /// Detect zip archives by content instead of by the .zip extension
    #[arg(long, short = 'c')]
    check_archives: bool,
}

#[derive(Parser)]
#[command(name = "gallery-preview")]
#[command(about = "Index images in directories and zip archives")]
#[command(long_about = "\
Index images in directories and zip archives

Every directory of images, and every folder inside a zip archive, is a
gallery. Galleries and images are addressed by stable opaque ids derived
from their paths, so the same tree always yields the same ids.

Recognized image extensions: .jpg .jpeg .JPG .png .gif
Files and directories starting with ._ are ignored.

Run 'gallery-preview gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List galleries sorted by name
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        index: IndexArgs,
    },
    /// List a gallery's images
    Show {
        gallery_id: String,
        #[command(flatten)]
        index: IndexArgs,
    },
    /// Draw random preview images from a gallery
    Sample {
        gallery_id: String,
        /// Number of images to draw (default from config)
        #[arg(short)]
        k: Option<usize>,
        #[command(flatten)]
        index: IndexArgs,
    },
    /// Write an image's raw bytes to stdout or a file
    Cat {
        image_id: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[command(flatten)]
        index: IndexArgs,
    },
    /// Print the path to reveal for a gallery
    Locate {
        gallery_id: String,
        #[command(flatten)]
        index: IndexArgs,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::List { json, index } => {
            let galleries = open_index(&cli.config_dir, &index)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&galleries.galleries())?);
            } else {
                output::print_lines(&output::format_gallery_list(&galleries));
            }
        }
        Command::Show { gallery_id, index } => {
            let galleries = open_index(&cli.config_dir, &index)?;
            output::print_lines(&output::format_gallery(&galleries, &gallery_id)?);
        }
        Command::Sample {
            gallery_id,
            k,
            index,
        } => {
            let settings = config::load_config(&cli.config_dir)?;
            let galleries = build_index(&index.roots, detection(&settings, &index))?;
            let k = k.unwrap_or(settings.sample_size);
            let name = galleries.get_gallery_name(&gallery_id)?;
            let picked = sample::sample(&galleries, &gallery_id, k)?;
            output::print_lines(&output::format_sample(name, &picked));
        }
        Command::Cat {
            image_id,
            output: target,
            index,
        } => {
            let galleries = open_index(&cli.config_dir, &index)?;
            let bytes = galleries.get_image_bytes(&image_id)?;
            match target {
                Some(path) => std::fs::write(path, bytes)?,
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&bytes)?;
                    stdout.flush()?;
                }
            }
        }
        Command::Locate { gallery_id, index } => {
            let galleries = open_index(&cli.config_dir, &index)?;
            println!("{}", galleries.gallery_location(&gallery_id)?.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load config and build the index for a command's roots.
fn open_index(
    config_dir: &Path,
    args: &IndexArgs,
) -> Result<GalleryIndex, Box<dyn std::error::Error>> {
    let settings = config::load_config(config_dir)?;
    Ok(build_index(&args.roots, detection(&settings, args))?)
}

/// `--check-archives` forces probing; otherwise the config decides.
fn detection(settings: &config::IndexConfig, args: &IndexArgs) -> ArchiveDetection {
    if args.check_archives {
        ArchiveDetection::Probe
    } else {
        settings.archive_detection
    }
}
