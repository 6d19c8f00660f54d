//! Embed Hunspell dictionaries in generated JavaScript.
//!
//! Each locale's affix file and word list are read as raw bytes, encoded as
//! padded base64 and written into a small script that publishes them as
//! `{ aff, dic }` under a name derived from the locale, e.g.
//! `window.dictionary_en_US`.

mod core;
mod encoders;

pub mod convert;

pub use convert::artifact::{
    ArtifactLayout, DictionaryInput, ExportStyle, GeneratedArtifact, LayoutError,
};
pub use convert::converter::{ConversionReport, ConvertOptions, convert, kb};
pub use convert::driver::{Job, Outcome, ReportSink, RunSummary, run_job, run_jobs};
pub use convert::error::{ConvertError, VerificationFailure};
pub use convert::locale::{Locale, LocaleError};
pub use crate::core::config::{LocaleConfig, Manifest, Settings};
pub use crate::core::dictionary::{BASE64_STANDARD, Dictionary};
pub use encoders::errors::{DecodeError, disable_color, should_use_color, should_use_color_stdout};

/// Encodes bytes with the given dictionary.
pub fn encode(data: &[u8], dictionary: &Dictionary) -> String {
    encoders::chunked::encode_chunked(data, dictionary)
}

/// Decodes text produced by [`encode`] with the same dictionary.
pub fn decode(encoded: &str, dictionary: &Dictionary) -> Result<Vec<u8>, DecodeError> {
    encoders::chunked::decode_chunked(encoded, dictionary)
}
