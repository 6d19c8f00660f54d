use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::convert::artifact::LayoutError;
use crate::convert::locale::Locale;
use crate::encoders::errors::{DecodeError, should_use_color, write_prefix};

/// Errors produced while converting one locale.
#[derive(Debug)]
pub enum ConvertError {
    /// One or both input files are absent. The driver skips the locale.
    MissingInput {
        locale: Locale,
        missing: Vec<PathBuf>,
    },
    /// Reading an input or writing the artifact failed.
    Io { path: PathBuf, source: io::Error },
    /// The written artifact does not decode back to its input.
    Verification {
        locale: Locale,
        field: &'static str,
        reason: VerificationFailure,
    },
    /// The configured layout cannot produce a valid identifier or file name.
    Layout(LayoutError),
}

#[derive(Debug)]
pub enum VerificationFailure {
    Decode(DecodeError),
    Mismatch { expected: usize, actual: usize },
    FieldNotFound,
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short form used in one-line console messages and JSON reports.
    pub fn summary(&self) -> String {
        match self {
            ConvertError::MissingInput { missing, .. } => {
                let names: Vec<String> = missing.iter().map(|p| p.display().to_string()).collect();
                format!("missing {}", names.join(", "))
            }
            ConvertError::Io { path, source } => format!("{}: {}", path.display(), source),
            ConvertError::Verification { field, reason, .. } => match reason {
                VerificationFailure::Decode(_) => format!("{} field does not decode", field),
                VerificationFailure::Mismatch { expected, actual } => format!(
                    "{} field decodes to {} bytes that differ from the {}-byte input",
                    field, actual, expected
                ),
                VerificationFailure::FieldNotFound => {
                    format!("{} field not found in artifact", field)
                }
            },
            ConvertError::Layout(e) => e.to_string(),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let use_color = should_use_color();

        match self {
            ConvertError::MissingInput { locale, .. } => {
                write_prefix(f, "error", use_color)?;
                write!(f, "dictionary files for '{}' not found ({})", locale, self.summary())
            }
            ConvertError::Io { path, source } => {
                write_prefix(f, "error", use_color)?;
                write!(f, "{}: {}", path.display(), source)
            }
            ConvertError::Verification { locale, reason, .. } => {
                write_prefix(f, "error", use_color)?;
                writeln!(f, "artifact for '{}' failed verification", locale)?;
                match reason {
                    VerificationFailure::Decode(e) => write!(f, "{}", e),
                    _ => {
                        writeln!(f)?;
                        write_prefix(f, "hint", use_color)?;
                        write!(f, "{}", self.summary())
                    }
                }
            }
            ConvertError::Layout(e) => {
                write_prefix(f, "error", use_color)?;
                write!(f, "{}", e)
            }
        }
    }
}

impl From<LayoutError> for ConvertError {
    fn from(e: LayoutError) -> Self {
        ConvertError::Layout(e)
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Io { source, .. } => Some(source),
            ConvertError::Verification {
                reason: VerificationFailure::Decode(e),
                ..
            } => Some(e),
            ConvertError::Layout(e) => Some(e),
            _ => None,
        }
    }
}
