use std::fmt;

/// Default prefix of the identifier the consumer looks the record up by.
pub const DEFAULT_IDENTIFIER_PREFIX: &str = "dictionary_";
/// Default prefix of the generated file name.
pub const DEFAULT_FILE_PREFIX: &str = "dictionaries-";
/// Default extension of the generated file.
pub const DEFAULT_EXTENSION: &str = "js";

/// A language/region tag such as `en_US` or `sv-SE`.
///
/// Only ASCII letters, digits, `_` and `-` are accepted, so the derived
/// identifier is always a bare JavaScript identifier and the derived file
/// name never needs quoting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl Into<String>) -> Result<Self, LocaleError> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(LocaleError::Empty);
        }
        if let Some(c) = tag
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(LocaleError::InvalidCharacter { tag, char: c });
        }
        Ok(Locale(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The locale with every `-` replaced by `_`.
    pub fn identifier_component(&self) -> String {
        self.0.replace('-', "_")
    }

    /// Name the generated record is published under, e.g. `dictionary_sv_SE`.
    pub fn identifier(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.identifier_component())
    }

    /// Generated file name, e.g. `dictionaries-sv_SE.js`.
    pub fn file_name(&self, prefix: &str, extension: &str) -> String {
        if extension.is_empty() {
            format!("{}{}", prefix, self.identifier_component())
        } else {
            format!("{}{}.{}", prefix, self.identifier_component(), extension)
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::new(s)
    }
}

/// A locale tag that cannot be turned into an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    Empty,
    InvalidCharacter { tag: String, char: char },
}

impl fmt::Display for LocaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocaleError::Empty => write!(f, "locale cannot be empty"),
            LocaleError::InvalidCharacter { tag, char } => write!(
                f,
                "invalid character '{}' in locale '{}' (allowed: letters, digits, '_', '-')",
                char, tag
            ),
        }
    }
}

impl std::error::Error for LocaleError {}
