use clap::Args;

/// Global arguments that apply to every mode
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Suppress per-locale reports and the final reminder
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}
