use clap::ValueEnum;
use hunspell_embed::ExportStyle;

/// How the generated record is published (CLI enum)
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportStyleCli {
    /// Assign to `window.<identifier>` for plain script tags
    Window,
    /// `export const <identifier>` for ES modules
    Module,
}

impl From<ExportStyleCli> for ExportStyle {
    fn from(cli: ExportStyleCli) -> Self {
        match cli {
            ExportStyleCli::Window => ExportStyle::Window,
            ExportStyleCli::Module => ExportStyle::Module,
        }
    }
}
