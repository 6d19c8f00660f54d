mod args;
mod global;
mod handlers;

use clap::Parser;
use hunspell_embed::Manifest;
use std::path::PathBuf;

use args::ExportStyleCli;
use global::GlobalArgs;

#[derive(Parser)]
#[command(name = "hunspell-embed")]
#[command(version)]
#[command(about = "Embed Hunspell dictionaries as base64 in generated JavaScript files", long_about = None)]
pub struct Cli {
    /// Locales to convert (default: every locale in the manifest)
    #[arg(value_name = "LOCALE")]
    pub locales: Vec<String>,

    /// Directory holding <locale>.aff and <locale>.dic
    #[arg(short = 'i', long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory to write the generated files to
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Extra manifest file, applied after the built-in and user manifests
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How the generated record is published
    #[arg(long, value_enum)]
    pub export: Option<ExportStyleCli>,

    /// Read each written artifact back and check it decodes to the input before replacing the target
    #[arg(long)]
    pub verify: bool,

    /// Print the run as JSON
    #[arg(long)]
    pub json: bool,

    /// List configured locales and exit
    #[arg(short, long)]
    pub list: bool,

    #[command(flatten)]
    pub global: GlobalArgs,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.global.no_color {
        hunspell_embed::disable_color();
    }

    let mut manifest = Manifest::load_with_overrides(cli.config.as_deref())?;

    // Command-line flags win over every manifest
    if let Some(dir) = &cli.input_dir {
        manifest.settings.input_dir = Some(dir.clone());
    }
    if let Some(dir) = &cli.output_dir {
        manifest.settings.output_dir = Some(dir.clone());
    }
    if let Some(style) = cli.export {
        manifest.settings.export = Some(style.into());
    }

    if cli.list {
        return handlers::list::handle(&cli, &manifest);
    }

    handlers::convert::handle(&cli, &manifest)
}
