use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use ghimg::{
    batch,
    config::ToolPaths,
    convert::{self, ConvertOptions, ConvertRequest},
    extract::{self, ExtractOptions},
    format::{Game, ImgFormat, Platform},
    texture::{Texture, TextureFormat},
    tools::ExternalTools,
};
#[macro_use]
extern crate tracing;

#[derive(Parser)]
#[command(name = "ghimg", version, about = "Convert textures to and from IMG files")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Tool path config, defaults to ./ghimg.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an image into an IMG file
    Convert {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        options: ConvertArgs,
    },
    /// Extract an IMG file into an image
    Extract {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_parser = parse_platform)]
        platform: Option<Platform>,
        /// Write the DDS/TEX0/PVR container instead of an image
        #[arg(long)]
        native: bool,
    },
    /// Convert every image under a directory
    BatchConvert {
        dir: PathBuf,
        #[command(flatten)]
        options: ConvertArgs,
    },
    /// Extract every IMG file under a directory
    BatchExtract {
        dir: PathBuf,
        #[arg(long, value_parser = parse_platform)]
        platform: Option<Platform>,
        #[arg(long)]
        native: bool,
    },
    /// Print what an IMG header describes
    Info {
        input: PathBuf,
        #[arg(long, value_parser = parse_platform)]
        platform: Option<Platform>,
    },
}

#[derive(Args)]
struct ConvertArgs {
    #[arg(short, long, value_parser = parse_platform)]
    platform: Platform,
    #[arg(short, long, default_value = "ghl", value_parser = parse_game)]
    game: Game,
    /// Texture format, e.g. BC1, BC3, R8G8B8A8, CMPR
    #[arg(short, long, value_parser = parse_texture)]
    format: Option<Texture>,
    #[arg(short, long, default_value_t = 1)]
    mips: u32,
    #[arg(short, long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    resize: Option<Vec<u32>>,
    /// Flip the image vertically
    #[arg(long)]
    flip: bool,
}

impl ConvertArgs {
    fn into_options(self) -> anyhow::Result<ConvertOptions> {
        let format = ImgFormat::from_platform_and_game(self.platform, self.game)?;
        let resize = match self.resize.as_deref() {
            Some(&[width, height]) => Some((width, height)),
            Some(other) => anyhow::bail!("Expected a width and a height, got {other:?}"),
            None => None,
        };

        Ok(ConvertOptions {
            format,
            texture: self.format,
            mip_count: self.mips,
            resize,
            flip: self.flip,
        })
    }
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    Platform::from_name(s).map_err(|e| e.to_string())
}

fn parse_game(s: &str) -> Result<Game, String> {
    Game::from_name(s).map_err(|e| e.to_string())
}

fn parse_texture(s: &str) -> Result<Texture, String> {
    Texture::from_name(s).map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let tools = ExternalTools::new(ToolPaths::load(cli.config.as_deref())?);

    match cli.command {
        Command::Convert {
            input,
            output,
            options,
        } => {
            let dest = output.unwrap_or_else(|| input.with_extension("img"));
            let request = ConvertRequest {
                source: input,
                dest,
                options: options.into_options()?,
            };
            convert::convert(&tools, &request)?;
        }
        Command::Extract {
            input,
            output,
            platform,
            native,
        } => {
            let dest = output.unwrap_or_else(|| input.with_extension("png"));
            let options = ExtractOptions {
                platform_hint: platform,
                native_only: native,
            };
            extract::extract(&tools, &input, &dest, options)?;
        }
        Command::BatchConvert { dir, options } => {
            let report = batch::convert_dir(&tools, &dir, &options.into_options()?)?;
            print_batch_report(&report);
        }
        Command::BatchExtract {
            dir,
            platform,
            native,
        } => {
            let options = ExtractOptions {
                platform_hint: platform,
                native_only: native,
            };
            let report = batch::extract_dir(&tools, &dir, options)?;
            print_batch_report(&report);
        }
        Command::Info { input, platform } => {
            let bytes = std::fs::read(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let info = extract::inspect(&bytes, platform)?;

            println!("{}", input.display());
            println!("  platform:      {}", info.platform().full_name());
            println!("  game:          {}", info.format.game().full_name());
            println!("  size:          {}x{}", info.width, info.height);
            println!("  mip count:     {}", info.mip_count);
            println!("  format:        {}", info.texture.name());
            println!(
                "  discriminator: {}",
                hex::encode(info.format.discriminator())
            );
            if platform.is_none() && info.format.game() != Game::Ghl {
                warn!("DJ Hero headers are shared across platforms, pass --platform to be sure");
            }
        }
    }

    Ok(())
}

fn print_batch_report(report: &batch::BatchReport) {
    println!(
        "{} processed, {} skipped",
        report.processed,
        report.skipped.len()
    );
    for path in &report.skipped {
        println!("  skipped {}", path.display());
    }
}
