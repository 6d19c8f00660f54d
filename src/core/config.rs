use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::convert::artifact::{ArtifactLayout, ExportStyle, LayoutError};
use crate::convert::driver::Job;
use crate::convert::locale::{
    DEFAULT_EXTENSION, DEFAULT_FILE_PREFIX, DEFAULT_IDENTIFIER_PREFIX, Locale, LocaleError,
};

/// One locale entry in the manifest.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct LocaleConfig {
    /// Human-readable language name, shown by `--list`
    #[serde(default)]
    pub name: Option<String>,
    /// Affix file; defaults to `<input_dir>/<locale>.aff`
    #[serde(default)]
    pub aff: Option<PathBuf>,
    /// Word list; defaults to `<input_dir>/<locale>.dic`
    #[serde(default)]
    pub dic: Option<PathBuf>,
}

/// Run-wide settings. Every field is optional so later manifests only need
/// to name what they change.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding `<locale>.aff` / `<locale>.dic`
    #[serde(default)]
    pub input_dir: Option<PathBuf>,
    /// Directory the generated files are written to
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// `window` global or ES `module` export
    #[serde(default)]
    pub export: Option<ExportStyle>,
    #[serde(default)]
    pub identifier_prefix: Option<String>,
    #[serde(default)]
    pub file_prefix: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
}

impl Settings {
    fn merge(&mut self, other: Settings) {
        if other.input_dir.is_some() {
            self.input_dir = other.input_dir;
        }
        if other.output_dir.is_some() {
            self.output_dir = other.output_dir;
        }
        if other.export.is_some() {
            self.export = other.export;
        }
        if other.identifier_prefix.is_some() {
            self.identifier_prefix = other.identifier_prefix;
        }
        if other.file_prefix.is_some() {
            self.file_prefix = other.file_prefix;
        }
        if other.extension.is_some() {
            self.extension = other.extension;
        }
    }

    pub fn input_dir(&self) -> PathBuf {
        self.input_dir
            .as_deref()
            .map(expand_path)
            .unwrap_or_else(|| PathBuf::from("dictionaries"))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .as_deref()
            .map(expand_path)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// The artifact layout these settings describe, rejected if a prefix or
    /// the extension is unusable.
    pub fn layout(&self) -> Result<ArtifactLayout, LayoutError> {
        let layout = ArtifactLayout {
            export: self.export.unwrap_or_default(),
            identifier_prefix: self
                .identifier_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_IDENTIFIER_PREFIX.to_string()),
            file_prefix: self
                .file_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_FILE_PREFIX.to_string()),
            extension: self
                .extension
                .clone()
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
        };
        layout.validate()?;
        Ok(layout)
    }
}

/// The set of locales to convert, loaded from TOML.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Manifest {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub locales: BTreeMap<String, LocaleConfig>,
}

impl Manifest {
    /// Parses a manifest from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads the built-in manifest (`en_US` and `sv_SE`).
    pub fn load_default() -> Result<Self, Box<dyn std::error::Error>> {
        let content = include_str!("../../locales.toml");
        Ok(Self::from_toml(content)?)
    }

    /// Loads a manifest from a file path. `~` is expanded.
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let path = expand_path(path);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| format!("Cannot read manifest '{}': {}", path.display(), e))?;
        Self::from_toml(&content)
            .map_err(|e| format!("Invalid manifest '{}': {}", path.display(), e).into())
    }

    /// Loads the manifest with overrides from standard locations.
    ///
    /// Searches in priority order:
    /// 1. Built-in manifest
    /// 2. `~/.config/hunspell-embed/locales.toml` (user overrides)
    /// 3. `./hunspell-embed.toml` (project-local overrides)
    /// 4. `extra`, when given (fails hard instead of warning)
    pub fn load_with_overrides(extra: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut manifest = Self::load_default()?;

        if let Some(config_dir) = dirs::config_dir() {
            let user_path = config_dir.join("hunspell-embed").join("locales.toml");
            manifest.merge_optional(&user_path, "user");
        }

        manifest.merge_optional(Path::new("hunspell-embed.toml"), "local");

        if let Some(path) = extra {
            manifest.merge(Self::load_from_file(path)?);
        }

        Ok(manifest)
    }

    fn merge_optional(&mut self, path: &Path, kind: &str) {
        if !path.exists() {
            return;
        }
        match Self::load_from_file(path) {
            Ok(other) => self.merge(other),
            Err(e) => {
                eprintln!("Warning: Failed to load {} config from {:?}: {}", kind, path, e);
            }
        }
    }

    /// Merges another manifest into this one. Settings override field by
    /// field, locales by name.
    pub fn merge(&mut self, other: Manifest) {
        self.settings.merge(other.settings);
        for (name, locale) in other.locales {
            self.locales.insert(name, locale);
        }
    }

    pub fn get_locale(&self, name: &str) -> Option<&LocaleConfig> {
        self.locales.get(name)
    }

    /// Builds the job for one locale, using manifest paths when set and the
    /// `<input_dir>/<locale>.aff|.dic` convention otherwise.
    pub fn job(&self, tag: &str) -> Result<Job, LocaleError> {
        let locale = Locale::new(tag)?;
        let input_dir = self.settings.input_dir();
        let convention = Job::in_dir(locale, &input_dir);

        Ok(match self.get_locale(tag) {
            Some(entry) => Job {
                aff: entry.aff.as_deref().map(expand_path).unwrap_or(convention.aff),
                dic: entry.dic.as_deref().map(expand_path).unwrap_or(convention.dic),
                locale: convention.locale,
            },
            None => convention,
        })
    }

    /// Jobs for the selected locales in the order given, or for every
    /// manifest locale in name order when none are selected.
    pub fn jobs(&self, selected: &[String]) -> Result<Vec<Job>, LocaleError> {
        if selected.is_empty() {
            self.locales.keys().map(|tag| self.job(tag)).collect()
        } else {
            selected.iter().map(|tag| self.job(tag)).collect()
        }
    }
}

fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).as_ref()),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_manifest() {
        let manifest = Manifest::load_default().unwrap();
        assert!(manifest.locales.contains_key("en_US"));
        assert!(manifest.locales.contains_key("sv_SE"));
        assert_eq!(
            manifest.get_locale("sv_SE").unwrap().name.as_deref(),
            Some("Swedish")
        );
        assert_eq!(manifest.settings.input_dir(), PathBuf::from("dictionaries"));
        assert_eq!(manifest.settings.output_dir(), PathBuf::from("."));
        assert_eq!(manifest.settings.layout().unwrap(), ArtifactLayout::default());
    }

    #[test]
    fn test_default_jobs_in_reference_order() {
        let manifest = Manifest::load_default().unwrap();
        let jobs = manifest.jobs(&[]).unwrap();
        let tags: Vec<&str> = jobs.iter().map(|j| j.locale.as_str()).collect();
        assert_eq!(tags, ["en_US", "sv_SE"]);
        assert_eq!(jobs[0].aff, Path::new("dictionaries").join("en_US.aff"));
        assert_eq!(jobs[1].dic, Path::new("dictionaries").join("sv_SE.dic"));
    }

    #[test]
    fn test_selected_jobs_keep_given_order() {
        let manifest = Manifest::load_default().unwrap();
        let selected = vec!["sv_SE".to_string(), "nb-NO".to_string(), "en_US".to_string()];
        let jobs = manifest.jobs(&selected).unwrap();
        let tags: Vec<&str> = jobs.iter().map(|j| j.locale.as_str()).collect();
        assert_eq!(tags, ["sv_SE", "nb-NO", "en_US"]);
        assert_eq!(jobs[1].aff, Path::new("dictionaries").join("nb-NO.aff"));
    }

    #[test]
    fn test_invalid_selected_locale() {
        let manifest = Manifest::load_default().unwrap();
        assert!(manifest.jobs(&["en US".to_string()]).is_err());
    }

    #[test]
    fn test_merge_settings_field_by_field() {
        let mut manifest = Manifest::load_default().unwrap();
        let other = Manifest::from_toml(
            r#"
[settings]
output_dir = "public/js"
export = "module"
"#,
        )
        .unwrap();

        manifest.merge(other);

        assert_eq!(manifest.settings.output_dir(), PathBuf::from("public/js"));
        assert_eq!(manifest.settings.input_dir(), PathBuf::from("dictionaries"));
        let layout = manifest.settings.layout().unwrap();
        assert_eq!(layout.export, ExportStyle::Module);
        assert_eq!(layout.identifier_prefix, "dictionary_");
        assert_eq!(manifest.locales.len(), 2);
    }

    #[test]
    fn test_merge_locales_by_name() {
        let mut manifest = Manifest::load_default().unwrap();
        let other = Manifest::from_toml(
            r#"
[locales.sv_SE]
name = "Svenska"
aff = "vendor/sv/sv_SE.aff"

[locales.de-DE]
"#,
        )
        .unwrap();

        manifest.merge(other);

        assert_eq!(manifest.locales.len(), 3);
        let job = manifest.job("sv_SE").unwrap();
        assert_eq!(job.aff, PathBuf::from("vendor/sv/sv_SE.aff"));
        assert_eq!(job.dic, Path::new("dictionaries").join("sv_SE.dic"));
        assert_eq!(
            manifest.get_locale("sv_SE").unwrap().name.as_deref(),
            Some("Svenska")
        );

        let tags: Vec<String> = manifest
            .jobs(&[])
            .unwrap()
            .into_iter()
            .map(|j| j.locale.to_string())
            .collect();
        assert_eq!(tags, ["de-DE", "en_US", "sv_SE"]);
    }

    #[test]
    fn test_invalid_layout_settings_are_rejected() {
        let manifest = Manifest::from_toml(
            r#"
[settings]
identifier_prefix = "my-dict."
"#,
        )
        .unwrap();
        assert_eq!(
            manifest.settings.layout().unwrap_err(),
            LayoutError::InvalidIdentifierPrefix("my-dict.".to_string())
        );

        let manifest = Manifest::from_toml(
            r#"
[settings]
file_prefix = "../"
"#,
        )
        .unwrap();
        assert!(matches!(
            manifest.settings.layout(),
            Err(LayoutError::InvalidFileComponent { field: "file_prefix", .. })
        ));
    }

    #[test]
    fn test_unknown_export_style_is_rejected() {
        let result = Manifest::from_toml(
            r#"
[settings]
export = "commonjs"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = Manifest::load_from_file(Path::new("/nonexistent/locales.toml")).unwrap_err();
        assert!(err.to_string().contains("Cannot read manifest"));
    }

    #[test]
    fn test_tilde_is_expanded() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path(Path::new("~/dicts")), home.join("dicts"));
        }
        assert_eq!(expand_path(Path::new("dicts")), PathBuf::from("dicts"));
    }
}
