use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::convert::artifact::{ArtifactLayout, DictionaryInput, GeneratedArtifact};
use crate::convert::error::ConvertError;
use crate::convert::locale::Locale;

/// Settings for a single conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub layout: ArtifactLayout,
    /// Read the written artifact back and check it decodes to the input
    /// before it replaces the target.
    pub verify: bool,
}

/// Size statistics of one successful conversion, in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub locale: String,
    pub identifier: String,
    pub output_path: PathBuf,
    pub aff_bytes: usize,
    pub aff_encoded_bytes: usize,
    pub dic_bytes: usize,
    pub dic_encoded_bytes: usize,
    pub artifact_bytes: usize,
    pub verified: bool,
}

/// Bytes to kilobytes, the unit the report is printed in.
pub fn kb(bytes: usize) -> f64 {
    bytes as f64 / 1024.0
}

/// Converts one locale's `.aff`/`.dic` pair into a generated JavaScript file
/// in `output_dir`, replacing any file already there.
///
/// The artifact is written to a temporary file in `output_dir` and renamed
/// into place, so a failed write leaves no partial output behind. With
/// `verify` set, the temporary file is read back and decoded before the
/// rename.
pub fn convert(
    aff_path: &Path,
    dic_path: &Path,
    locale: &Locale,
    output_dir: &Path,
    options: &ConvertOptions,
) -> Result<ConversionReport, ConvertError> {
    options.layout.validate_for(locale)?;

    let input = DictionaryInput::read(locale.clone(), aff_path, dic_path)?;
    let artifact = GeneratedArtifact::render(&input, &options.layout);
    let output_path = output_dir.join(&artifact.file_name);

    let mut tmp = NamedTempFile::new_in(output_dir).map_err(|e| ConvertError::io(output_dir, e))?;
    tmp.write_all(artifact.contents.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| ConvertError::io(tmp.path(), e))?;

    if options.verify {
        let contents = fs::read_to_string(tmp.path()).map_err(|e| ConvertError::io(tmp.path(), e))?;
        let written = GeneratedArtifact {
            contents,
            ..artifact.clone()
        };
        written.verify(&input)?;
    }

    set_artifact_permissions(&tmp, &output_path)?;
    tmp.persist(&output_path)
        .map_err(|e| ConvertError::io(&output_path, e.error))?;

    Ok(ConversionReport {
        locale: locale.to_string(),
        identifier: artifact.identifier,
        output_path,
        aff_bytes: input.aff.len(),
        aff_encoded_bytes: artifact.aff_encoded_len,
        dic_bytes: input.dic.len(),
        dic_encoded_bytes: artifact.dic_encoded_len,
        artifact_bytes: artifact.contents.len(),
        verified: options.verify,
    })
}

/// Temporary files are created owner-only. The artifact is served to
/// browsers, so it keeps the mode of the file it replaces, or gets 0644.
#[cfg(unix)]
fn set_artifact_permissions(tmp: &NamedTempFile, target: &Path) -> Result<(), ConvertError> {
    use std::os::unix::fs::PermissionsExt;

    let mode = fs::metadata(target)
        .map(|meta| meta.permissions().mode() & 0o7777)
        .unwrap_or(ARTIFACT_MODE);
    tmp.as_file()
        .set_permissions(fs::Permissions::from_mode(mode))
        .map_err(|e| ConvertError::io(tmp.path(), e))
}

#[cfg(not(unix))]
fn set_artifact_permissions(_tmp: &NamedTempFile, _target: &Path) -> Result<(), ConvertError> {
    Ok(())
}

#[cfg(unix)]
const ARTIFACT_MODE: u32 = 0o644;
