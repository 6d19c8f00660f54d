use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::convert::error::{ConvertError, VerificationFailure};
use crate::convert::locale::{
    DEFAULT_EXTENSION, DEFAULT_FILE_PREFIX, DEFAULT_IDENTIFIER_PREFIX, Locale,
};
use crate::core::dictionary::Dictionary;
use crate::encoders::chunked::{decode_chunked, encode_chunked};

/// How the generated record is made reachable by the page that loads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStyle {
    /// `window.<identifier> = { ... };` for classic `<script>` tags.
    #[default]
    Window,
    /// `export const <identifier> = { ... };` for ES modules.
    Module,
}

impl ExportStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportStyle::Window => "window",
            ExportStyle::Module => "module",
        }
    }
}

/// Naming and export settings shared by every artifact in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    pub export: ExportStyle,
    pub identifier_prefix: String,
    pub file_prefix: String,
    pub extension: String,
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        ArtifactLayout {
            export: ExportStyle::default(),
            identifier_prefix: DEFAULT_IDENTIFIER_PREFIX.to_string(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl ArtifactLayout {
    /// Checks the prefixes and extension on their own: the identifier prefix
    /// must be empty or a JavaScript identifier, and the file name parts must
    /// not leave the output directory.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let prefix = &self.identifier_prefix;
        let mut chars = prefix.chars();
        if let Some(first) = chars.next()
            && !(is_identifier_start(first) && chars.all(is_identifier_part))
        {
            return Err(LayoutError::InvalidIdentifierPrefix(prefix.clone()));
        }

        for (field, value) in [
            ("file_prefix", &self.file_prefix),
            ("extension", &self.extension),
        ] {
            if value.contains(['/', '\\']) || value.contains("..") {
                return Err(LayoutError::InvalidFileComponent {
                    field,
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }

    /// Checks the full identifier for one locale. With an empty prefix a
    /// locale such as `1996_DE` would start with a digit.
    pub fn validate_for(&self, locale: &Locale) -> Result<(), LayoutError> {
        self.validate()?;
        let identifier = locale.identifier(&self.identifier_prefix);
        match identifier.chars().next() {
            Some(first) if is_identifier_start(first) => Ok(()),
            _ => Err(LayoutError::InvalidIdentifier(identifier)),
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Layout settings that would produce broken JavaScript or escape the
/// output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    InvalidIdentifierPrefix(String),
    InvalidIdentifier(String),
    InvalidFileComponent { field: &'static str, value: String },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::InvalidIdentifierPrefix(prefix) => write!(
                f,
                "identifier_prefix '{}' is not a JavaScript identifier (allowed: [A-Za-z_$][A-Za-z0-9_$]*)",
                prefix
            ),
            LayoutError::InvalidIdentifier(identifier) => write!(
                f,
                "identifier '{}' must not start with a digit; set an identifier_prefix",
                identifier
            ),
            LayoutError::InvalidFileComponent { field, value } => write!(
                f,
                "{} '{}' must not contain '/', '\\' or '..'",
                field, value
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

/// The two Hunspell files of one locale, read in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryInput {
    pub locale: Locale,
    pub aff: Vec<u8>,
    pub dic: Vec<u8>,
}

impl DictionaryInput {
    pub fn new(locale: Locale, aff: Vec<u8>, dic: Vec<u8>) -> Self {
        DictionaryInput { locale, aff, dic }
    }

    /// Reads both files as opaque bytes. Hunspell files come in all sorts of
    /// encodings, so nothing here assumes UTF-8.
    pub fn read(locale: Locale, aff_path: &Path, dic_path: &Path) -> Result<Self, ConvertError> {
        let aff = fs::read(aff_path).map_err(|e| ConvertError::io(aff_path, e))?;
        let dic = fs::read(dic_path).map_err(|e| ConvertError::io(dic_path, e))?;
        Ok(Self::new(locale, aff, dic))
    }
}

/// Rendered JavaScript source embedding one locale's dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub identifier: String,
    pub file_name: String,
    pub aff_encoded_len: usize,
    pub dic_encoded_len: usize,
    pub contents: String,
}

impl GeneratedArtifact {
    /// Renders the artifact. Output depends only on the input bytes, the
    /// locale and the layout.
    pub fn render(input: &DictionaryInput, layout: &ArtifactLayout) -> Self {
        let dictionary = Dictionary::base64();
        let aff_b64 = encode_chunked(&input.aff, &dictionary);
        let dic_b64 = encode_chunked(&input.dic, &dictionary);

        let identifier = input.locale.identifier(&layout.identifier_prefix);
        let binding = match layout.export {
            ExportStyle::Window => format!("window.{}", identifier),
            ExportStyle::Module => format!("export const {}", identifier),
        };

        let contents = format!(
            "// Dictionary data for {locale}\n\
             // Generated from .aff and .dic files\n\
             // This file contains base64-encoded dictionary data that will be decoded in memory\n\
             \n\
             {binding} = {{\n    aff: \"{aff_b64}\",\n    dic: \"{dic_b64}\"\n}};",
            locale = input.locale,
        );

        GeneratedArtifact {
            identifier,
            file_name: input
                .locale
                .file_name(&layout.file_prefix, &layout.extension),
            aff_encoded_len: aff_b64.len(),
            dic_encoded_len: dic_b64.len(),
            contents,
        }
    }

    /// The base64 text of the `aff` or `dic` field.
    pub fn field(&self, name: &str) -> Option<&str> {
        let marker = format!("\n    {}: \"", name);
        let start = self.contents.find(&marker)? + marker.len();
        let len = self.contents[start..].find('"')?;
        Some(&self.contents[start..start + len])
    }

    /// Decodes both embedded fields and checks they reproduce the input.
    pub fn verify(&self, input: &DictionaryInput) -> Result<(), ConvertError> {
        let dictionary = Dictionary::base64();

        for (field, expected) in [("aff", &input.aff), ("dic", &input.dic)] {
            let failure = |reason| ConvertError::Verification {
                locale: input.locale.clone(),
                field,
                reason,
            };

            let encoded = self
                .field(field)
                .ok_or_else(|| failure(VerificationFailure::FieldNotFound))?;
            let decoded = decode_chunked(encoded, &dictionary)
                .map_err(|e| failure(VerificationFailure::Decode(e)))?;

            if &decoded != expected {
                return Err(failure(VerificationFailure::Mismatch {
                    expected: expected.len(),
                    actual: decoded.len(),
                }));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(locale: &str, aff: &[u8], dic: &[u8]) -> DictionaryInput {
        DictionaryInput::new(Locale::new(locale).unwrap(), aff.to_vec(), dic.to_vec())
    }

    #[test]
    fn test_render_small_dictionary() {
        let artifact = GeneratedArtifact::render(&input("xx_YY", b"AB", b"C"), &ArtifactLayout::default());

        assert_eq!(artifact.identifier, "dictionary_xx_YY");
        assert_eq!(artifact.file_name, "dictionaries-xx_YY.js");
        assert_eq!(artifact.field("aff"), Some("QUI="));
        assert_eq!(artifact.field("dic"), Some("Qw=="));
        assert_eq!(
            artifact.contents,
            "// Dictionary data for xx_YY\n\
             // Generated from .aff and .dic files\n\
             // This file contains base64-encoded dictionary data that will be decoded in memory\n\
             \n\
             window.dictionary_xx_YY = {\n    aff: \"QUI=\",\n    dic: \"Qw==\"\n};"
        );
    }

    #[test]
    fn test_render_hyphenated_locale() {
        let artifact = GeneratedArtifact::render(&input("sv-SE", b"", b""), &ArtifactLayout::default());

        assert_eq!(artifact.identifier, "dictionary_sv_SE");
        assert_eq!(artifact.file_name, "dictionaries-sv_SE.js");
        assert!(artifact.contents.starts_with("// Dictionary data for sv-SE\n"));
        assert!(artifact.contents.contains("window.dictionary_sv_SE = {"));
        assert_eq!(artifact.field("aff"), Some(""));
    }

    #[test]
    fn test_render_module_export() {
        let layout = ArtifactLayout {
            export: ExportStyle::Module,
            extension: "mjs".to_string(),
            ..ArtifactLayout::default()
        };
        let artifact = GeneratedArtifact::render(&input("en_US", b"SET UTF-8\n", b"1\nhello\n"), &layout);

        assert_eq!(artifact.file_name, "dictionaries-en_US.mjs");
        assert!(artifact.contents.contains("export const dictionary_en_US = {"));
        assert!(!artifact.contents.contains("window."));
    }

    #[test]
    fn test_render_is_deterministic() {
        let data: Vec<u8> = (0..=255).collect();
        let first = GeneratedArtifact::render(&input("en_US", &data, &data), &ArtifactLayout::default());
        let second = GeneratedArtifact::render(&input("en_US", &data, &data), &ArtifactLayout::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_encoded_lengths() {
        let artifact = GeneratedArtifact::render(&input("en_US", b"abcd", b"abc"), &ArtifactLayout::default());
        assert_eq!(artifact.aff_encoded_len, 8);
        assert_eq!(artifact.dic_encoded_len, 4);
    }

    #[test]
    fn test_default_layout_is_valid() {
        let layout = ArtifactLayout::default();
        assert!(layout.validate().is_ok());
        assert!(layout.validate_for(&Locale::new("en_US").unwrap()).is_ok());
    }

    #[test]
    fn test_identifier_prefix_must_be_identifier() {
        for prefix in ["my-dict.", "1dict_", "dict ", "a.b"] {
            let layout = ArtifactLayout {
                identifier_prefix: prefix.to_string(),
                ..ArtifactLayout::default()
            };
            assert_eq!(
                layout.validate(),
                Err(LayoutError::InvalidIdentifierPrefix(prefix.to_string())),
                "{}",
                prefix
            );
        }

        for prefix in ["", "$", "_dict_", "spell$Dict"] {
            let layout = ArtifactLayout {
                identifier_prefix: prefix.to_string(),
                ..ArtifactLayout::default()
            };
            assert!(layout.validate().is_ok(), "{}", prefix);
        }
    }

    #[test]
    fn test_empty_prefix_rejects_leading_digit() {
        let layout = ArtifactLayout {
            identifier_prefix: String::new(),
            ..ArtifactLayout::default()
        };
        assert!(layout.validate_for(&Locale::new("en_US").unwrap()).is_ok());
        assert_eq!(
            layout.validate_for(&Locale::new("1996-DE").unwrap()),
            Err(LayoutError::InvalidIdentifier("1996_DE".to_string()))
        );
        // A leading hyphen becomes an underscore, which is fine
        assert!(layout.validate_for(&Locale::new("-x").unwrap()).is_ok());
    }

    #[test]
    fn test_file_components_stay_in_output_dir() {
        let cases = [
            ("file_prefix", "../dictionaries-"),
            ("file_prefix", "js/dictionaries-"),
            ("extension", "js/../x"),
            ("extension", "..js"),
        ];
        for (field, value) in cases {
            let mut layout = ArtifactLayout::default();
            match field {
                "file_prefix" => layout.file_prefix = value.to_string(),
                _ => layout.extension = value.to_string(),
            }
            assert_eq!(
                layout.validate(),
                Err(LayoutError::InvalidFileComponent {
                    field,
                    value: value.to_string()
                })
            );
        }
    }

    #[test]
    fn test_verify_accepts_rendered_artifact() {
        let data: Vec<u8> = (0..=255).rev().collect();
        let source = input("en_US", &data, b"\xe5\xe4\xf6");
        let artifact = GeneratedArtifact::render(&source, &ArtifactLayout::default());
        assert!(artifact.verify(&source).is_ok());
    }

    #[test]
    fn test_verify_detects_tampering() {
        let source = input("en_US", b"AB", b"C");
        let mut artifact = GeneratedArtifact::render(&source, &ArtifactLayout::default());
        artifact.contents = artifact.contents.replace("Qw==", "RA==");

        let err = artifact.verify(&source).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Verification {
                field: "dic",
                reason: VerificationFailure::Mismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_verify_reports_missing_field() {
        let source = input("en_US", b"AB", b"C");
        let mut artifact = GeneratedArtifact::render(&source, &ArtifactLayout::default());
        artifact.contents = artifact.contents.replace("aff:", "affix:");

        let err = artifact.verify(&source).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Verification {
                field: "aff",
                reason: VerificationFailure::FieldNotFound,
                ..
            }
        ));
    }
}
