use crate::cli::Cli;
use hunspell_embed::{
    ConvertOptions, Manifest, Outcome, ReportSink, RunSummary, kb, run_jobs,
    should_use_color, should_use_color_stdout,
};

const REMINDER: &str =
    "Done! Now uncomment the script tags in your HTML page to load these dictionaries.";

pub fn handle(cli: &Cli, manifest: &Manifest) -> Result<(), Box<dyn std::error::Error>> {
    let jobs = manifest.jobs(&cli.locales)?;
    let output_dir = manifest.settings.output_dir();
    let layout = manifest.settings.layout()?;
    for job in &jobs {
        layout.validate_for(&job.locale)?;
    }
    let options = ConvertOptions {
        layout,
        verify: cli.verify,
    };

    let summary = if cli.json {
        let mut sink = JsonReport::default();
        let summary = run_jobs(&jobs, &output_dir, &options, &mut sink);
        sink.print(&summary)?;
        summary
    } else {
        let mut sink = TextReport::new(cli.global.quiet);
        let summary = run_jobs(&jobs, &output_dir, &options, &mut sink);
        if !cli.global.quiet {
            println!("{}", REMINDER);
        }
        summary
    };

    if !summary.is_success() {
        return Err(format!("{} locale(s) failed to convert", summary.failed).into());
    }

    Ok(())
}

/// Prints each outcome as soon as it is known.
struct TextReport {
    quiet: bool,
    color_out: bool,
    color_err: bool,
}

impl TextReport {
    fn new(quiet: bool) -> Self {
        TextReport {
            quiet,
            color_out: should_use_color_stdout(),
            color_err: should_use_color(),
        }
    }
}

fn tag(label: &str, code: &str, color: bool) -> String {
    if color {
        format!("\x1b[{}m[{}]\x1b[0m", code, label)
    } else {
        format!("[{}]", label)
    }
}

impl ReportSink for TextReport {
    fn outcome(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Converted(report) => {
                if self.quiet {
                    return;
                }
                println!("{} Converted {}", tag("OK", "1;32", self.color_out), report.locale);
                println!(
                    "  .aff: {:.2} KB -> base64: {:.2} KB",
                    kb(report.aff_bytes),
                    kb(report.aff_encoded_bytes)
                );
                println!(
                    "  .dic: {:.2} KB -> base64: {:.2} KB",
                    kb(report.dic_bytes),
                    kb(report.dic_encoded_bytes)
                );
                println!("  Total JS file: {:.2} KB", kb(report.artifact_bytes));
                if report.verified {
                    println!("  Verified: aff and dic decode to their inputs");
                }
                println!("  Saved to: {}", report.output_path.display());
                println!();
            }
            Outcome::Skipped(locale, error) => {
                eprintln!(
                    "{} Skipping {}: dictionary files not found ({})",
                    tag("WARNING", "1;33", self.color_err),
                    locale,
                    error.summary()
                );
            }
            Outcome::Failed(locale, error) => {
                eprintln!(
                    "{} Failed to convert {}: {}",
                    tag("ERROR", "1;31", self.color_err),
                    locale,
                    error.summary()
                );
            }
        }
    }
}

/// Collects outcomes and prints a single JSON document at the end.
#[derive(Default)]
struct JsonReport {
    results: Vec<serde_json::Value>,
}

impl JsonReport {
    fn print(&self, summary: &RunSummary) -> Result<(), serde_json::Error> {
        let output = serde_json::json!({
            "results": self.results,
            "summary": {
                "converted": summary.converted,
                "skipped": summary.skipped,
                "failed": summary.failed,
            },
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

impl ReportSink for JsonReport {
    fn outcome(&mut self, outcome: &Outcome) {
        let entry = match outcome {
            Outcome::Converted(report) => serde_json::json!({
                "locale": outcome.locale(),
                "status": outcome.status(),
                "report": report,
            }),
            Outcome::Skipped(_, error) | Outcome::Failed(_, error) => serde_json::json!({
                "locale": outcome.locale(),
                "status": outcome.status(),
                "reason": error.summary(),
            }),
        };
        self.results.push(entry);
    }
}
