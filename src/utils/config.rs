use super::changelog::{ChangeKind, ChangeKindEntry};
use super::output::OutputFormat;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "clq.toml";

/// project configuration, every field can be overridden from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClqConfig {
    /// release mode, `[Unreleased]` sections are rejected
    pub release: bool,

    /// output format of query results
    pub output: OutputFormat,

    /// always prefix results with the name of the file
    pub with_filename: bool,

    /// json file defining the change kinds, relative to the configuration file
    pub change_map: Option<PathBuf>,

    /// change kinds defined inline, they take precedence over `change_map`
    pub change_kinds: Vec<ChangeKindEntry>,
}

impl ClqConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn release(mut self, release: bool) -> Self {
        self.release = release;
        self
    }

    pub fn output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    pub fn with_filename(mut self, with_filename: bool) -> Self {
        self.with_filename = with_filename;
        self
    }

    pub fn change_map(mut self, change_map: impl Into<PathBuf>) -> Self {
        self.change_map = Some(change_map.into());
        self
    }

    /// load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| Error::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config: ClqConfig = toml::from_str(&contents).map_err(|e| Error::TomlParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        if let Some(change_map) = config.change_map.take() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            config.change_map = Some(base.join(change_map));
        }
        tracing::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// load `clq.toml` from `dir`, defaults when there is none
    ///
    /// a configuration file that exists but cannot be parsed is an error.
    pub fn load_or_default<P: AsRef<Path>>(dir: P) -> Result<Self> {
        match Self::find_config_file(dir) {
            Some(config_path) => Self::load_from_file(config_path),
            None => Ok(Self::default()),
        }
    }

    /// find `clq.toml` in `dir`
    pub fn find_config_file<P: AsRef<Path>>(dir: P) -> Option<PathBuf> {
        let config_path = dir.as_ref().join(CONFIG_FILE_NAME);

        if config_path.is_file() {
            Some(config_path)
        } else {
            None
        }
    }

    /// the change kind registry this configuration describes
    pub fn change_kind(&self) -> Result<ChangeKind> {
        if !self.change_kinds.is_empty() {
            return ChangeKind::from_entries(self.change_kinds.clone());
        }
        match &self.change_map {
            Some(path) => ChangeKind::load_from_file(path),
            None => Ok(ChangeKind::new()),
        }
    }
}
