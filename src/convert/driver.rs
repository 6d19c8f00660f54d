use std::path::{Path, PathBuf};

use crate::convert::converter::{ConversionReport, ConvertOptions, convert};
use crate::convert::error::ConvertError;
use crate::convert::locale::Locale;

/// One locale to convert and where its inputs live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub locale: Locale,
    pub aff: PathBuf,
    pub dic: PathBuf,
}

impl Job {
    pub fn new(locale: Locale, aff: impl Into<PathBuf>, dic: impl Into<PathBuf>) -> Self {
        Job {
            locale,
            aff: aff.into(),
            dic: dic.into(),
        }
    }

    /// `<dir>/<locale>.aff` and `<dir>/<locale>.dic`.
    pub fn in_dir(locale: Locale, dir: &Path) -> Self {
        let aff = dir.join(format!("{}.aff", locale));
        let dic = dir.join(format!("{}.dic", locale));
        Job::new(locale, aff, dic)
    }

    fn missing_inputs(&self) -> Vec<PathBuf> {
        [&self.aff, &self.dic]
            .into_iter()
            .filter(|p| !p.exists())
            .cloned()
            .collect()
    }
}

/// What happened to one job.
#[derive(Debug)]
pub enum Outcome {
    Converted(ConversionReport),
    Skipped(Locale, ConvertError),
    Failed(Locale, ConvertError),
}

impl Outcome {
    pub fn locale(&self) -> &str {
        match self {
            Outcome::Converted(report) => &report.locale,
            Outcome::Skipped(locale, _) | Outcome::Failed(locale, _) => locale.as_str(),
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Converted(_) => "converted",
            Outcome::Skipped(..) => "skipped",
            Outcome::Failed(..) => "failed",
        }
    }
}

/// Receives outcomes in job order as the run progresses.
pub trait ReportSink {
    fn outcome(&mut self, outcome: &Outcome);
}

impl<F: FnMut(&Outcome)> ReportSink for F {
    fn outcome(&mut self, outcome: &Outcome) {
        self(outcome)
    }
}

/// Totals for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Runs every job in order.
///
/// A job whose inputs are missing is skipped. A job that fails while reading
/// or writing is reported and the run moves on, so one bad locale never
/// prevents the others from being converted.
pub fn run_jobs(
    jobs: &[Job],
    output_dir: &Path,
    options: &ConvertOptions,
    sink: &mut dyn ReportSink,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for job in jobs {
        let outcome = run_job(job, output_dir, options);
        match &outcome {
            Outcome::Converted(_) => summary.converted += 1,
            Outcome::Skipped(..) => summary.skipped += 1,
            Outcome::Failed(..) => summary.failed += 1,
        }
        sink.outcome(&outcome);
    }

    summary
}

/// Runs a single job: existence check, then conversion.
pub fn run_job(job: &Job, output_dir: &Path, options: &ConvertOptions) -> Outcome {
    let missing = job.missing_inputs();
    if !missing.is_empty() {
        return Outcome::Skipped(
            job.locale.clone(),
            ConvertError::MissingInput {
                locale: job.locale.clone(),
                missing,
            },
        );
    }

    match convert(&job.aff, &job.dic, &job.locale, output_dir, options) {
        Ok(report) => Outcome::Converted(report),
        Err(e) => Outcome::Failed(job.locale.clone(), e),
    }
}
