use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use snesfloppy::disk_formats::{best_fit, Geometry};
use snesfloppy::dos_name::sanitize_path;
use snesfloppy::fat12::{self, Source};
use snesfloppy::{disks, formats};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "SNES backup unit floppy image builder")]
struct Cli {
    /// Log progress (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack ROM parts onto as many disks as needed and write the images
    Build {
        #[arg(long)]
        output_dir: PathBuf,
        /// Base name of the images, defaults to the first part's file stem
        #[arg(long)]
        stem: Option<String>,
        /// Copy blank disks from this directory instead of synthesizing them
        #[arg(long)]
        template_dir: Option<PathBuf>,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Write one blank FAT12 image
    Format {
        #[arg(long)]
        output: PathBuf,
        #[arg(long, value_parser = parse_geometry, default_value = "auto")]
        geometry: DiskChoice,
        /// Bytes the disk must hold, used with `--geometry auto`
        #[arg(long, default_value_t = 0)]
        size: u64,
        #[arg(long)]
        template_dir: Option<PathBuf>,
    },
    /// Add files to an existing image
    Inject {
        #[arg(long)]
        image: PathBuf,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    Display {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        ascii: bool,
    },
    /// Copy one file out of an image
    Extract {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Debug, Clone)]
enum DiskChoice {
    Auto,
    Fixed(Geometry),
}

fn parse_geometry(s: &str) -> Result<DiskChoice, String> {
    if s == "auto" {
        Ok(DiskChoice::Auto)
    } else {
        s.parse().map(DiskChoice::Fixed).map_err(|e: snesfloppy::Error| e.to_string())
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build { output_dir, stem, template_dir, files } => {
            let stem = match stem {
                Some(s) => s,
                None => files[0]
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
                    .ok_or_else(|| anyhow!("Cannot derive image name from {}", files[0].display()))?,
            };
            let parts = disks::parts_from_files(&files)?;
            let formatter = formats::select(template_dir.as_deref());
            for path in disks::build(&parts, &output_dir, &stem, &*formatter)? {
                println!("Wrote {}", path.display());
            }
        }
        Commands::Format { output, geometry, size, template_dir } => {
            let geometry = match geometry {
                DiskChoice::Auto => best_fit(size)?,
                DiskChoice::Fixed(g) => g,
            };
            formats::select(template_dir.as_deref()).create_blank(geometry, &output)?;
            println!("Formatted {} as {}", output.display(), geometry);
        }
        Commands::Inject { image, files } => {
            let sources = files
                .iter()
                .map(|p| -> Result<Source> {
                    let data = std::fs::read(p).map_err(|e| anyhow!("Cannot read {}: {}", p.display(), e))?;
                    Ok(Source::new(sanitize_path(p)?, data))
                })
                .collect::<Result<Vec<_>>>()?;
            fat12::inject_file(&image, &sources)?;
            println!("Injected {} files into {}", sources.len(), image.display());
        }
        Commands::Display { input, ascii } => {
            let data = std::fs::read(&input)?;
            println!("{}", snesfloppy::core::display(&data, ascii)?);
        }
        Commands::Extract { input, name, output } => {
            let data = std::fs::read(&input)?;
            let contents = fat12::reader::read_file(&data, &name)?;
            std::fs::write(&output, &contents)?;
            println!("Extracted {} ({} bytes) to {}", name, contents.len(), output.display());
        }
    }
    Ok(())
}
