//! Always-available options (redirects, fillers)

use crate::{Result, TeleopError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// One always-available option
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticOption {
    /// First token of the command field; the only one that gets played
    pub command: String,
    /// Button label, defaulting to the full command field
    pub label: String,
}

impl StaticOption {
    /// Parse one line of a static script
    ///
    /// Returns `None` for blank lines.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim_end();
        if raw.is_empty() {
            return None;
        }

        let mut parts = raw.split('\t');
        let command_field = parts.next().unwrap_or_default();
        let command = command_field
            .split(',')
            .next()
            .unwrap_or_default()
            .to_string();
        let label = parts
            .next()
            .map(str::to_string)
            .unwrap_or_else(|| command_field.to_string());

        Some(Self { command, label })
    }
}

/// The set of static options shown beside the script
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticScript {
    source: Option<PathBuf>,
    options: Vec<StaticOption>,
}

impl StaticScript {
    pub fn parse(content: &str) -> Self {
        Self {
            source: None,
            options: content.lines().filter_map(StaticOption::parse).collect(),
        }
    }

    /// Load a static script file. An empty file yields no options.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| TeleopError::ScriptLoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut script = Self::parse(&content);
        script.source = Some(path.to_path_buf());
        info!(
            "Loaded static script {} ({} options)",
            path.display(),
            script.len()
        );
        Ok(script)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn options(&self) -> &[StaticOption] {
        &self.options
    }

    pub fn get(&self, index: usize) -> Option<&StaticOption> {
        self.options.get(index)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
