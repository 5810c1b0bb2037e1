//! Line-by-line script store
//!
//! A script file has one navigable step per line. Each line is a run of
//! tab-separated fields that pair up as `command, label, command, label, ...`.

use crate::{Result, TeleopError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Placeholder for an option slot the current line does not fill
pub const ABSENT: &str = "-";

/// One (command, label) pair offered to the operator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptOption {
    /// Command field; may be a comma-joined sequence of tokens
    pub command: String,
    /// Button label
    pub label: String,
}

impl ScriptOption {
    pub fn new(command: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            label: label.into(),
        }
    }

    /// The `("-", "-")` option used for unfilled slots
    pub fn absent() -> Self {
        Self::new(ABSENT, ABSENT)
    }

    /// Whether pressing this option sends nothing
    pub fn is_absent(&self) -> bool {
        self.command == ABSENT
    }
}

/// A single step of the script
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptLine {
    fields: Vec<String>,
}

impl ScriptLine {
    /// Split one raw line into fields
    pub fn parse(raw: &str) -> Self {
        Self {
            fields: raw.trim().split('\t').map(str::to_string).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of complete (command, label) pairs on this line
    ///
    /// A trailing unpaired command on an odd-length line is not counted.
    pub fn option_count(&self) -> usize {
        self.fields.len() / 2
    }

    /// Option `k`, pairing fields `2k` and `2k + 1`
    pub fn option(&self, k: usize) -> ScriptOption {
        if k < self.option_count() {
            ScriptOption::new(&self.fields[k * 2], &self.fields[k * 2 + 1])
        } else {
            ScriptOption::absent()
        }
    }
}

/// An ordered, immutable sequence of script lines
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    source: Option<PathBuf>,
    lines: Vec<ScriptLine>,
}

impl Script {
    /// Parse script content already in memory
    pub fn parse(content: &str) -> Self {
        Self {
            source: None,
            lines: content.lines().map(ScriptLine::parse).collect(),
        }
    }

    /// Load a script file
    ///
    /// Fails if the file is missing, is not UTF-8, or has no lines. The caller
    /// keeps whatever script it had before.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading script from {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| TeleopError::ScriptLoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut script = Self::parse(&content);
        if script.is_empty() {
            return Err(TeleopError::EmptyScriptError(path.display().to_string()));
        }
        script.source = Some(path.to_path_buf());

        info!("Loaded script {} ({} lines)", path.display(), script.len());
        Ok(script)
    }

    /// File the script was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&ScriptLine> {
        self.lines.get(index)
    }

    /// The `slots` options for line `index`, padded with absent options
    pub fn options(&self, index: usize, slots: usize) -> Vec<ScriptOption> {
        match self.line(index) {
            Some(line) => (0..slots).map(|k| line.option(k)).collect(),
            None => vec![ScriptOption::absent(); slots],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_pairs_fields_positionally() {
        let line = ScriptLine::parse("hello.wav\tHello!\tWAVE,bye.wav\tBye");
        assert_eq!(line.option_count(), 2);
        assert_eq!(line.option(0), ScriptOption::new("hello.wav", "Hello!"));
        assert_eq!(line.option(1), ScriptOption::new("WAVE,bye.wav", "Bye"));
        assert!(line.option(2).is_absent());
    }

    #[test]
    fn test_odd_field_count_drops_trailing_command() {
        let line = ScriptLine::parse("a.wav\tA\tb.wav");
        assert_eq!(line.option_count(), 1);
        assert_eq!(line.option(1), ScriptOption::absent());
    }

    #[test]
    fn test_strips_carriage_returns() {
        let script = Script::parse("a.wav\tA\r\nb.wav\tB\r\n");
        assert_eq!(script.len(), 2);
        assert_eq!(script.options(1, 1)[0], ScriptOption::new("b.wav", "B"));
    }

    #[test]
    fn test_options_padded_to_slot_count() {
        let script = Script::parse("a.wav\tHi\t-\t-");
        let options = script.options(0, 3);
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].label, "Hi");
        assert!(options[1].is_absent());
        assert!(options[2].is_absent());
    }

    #[test]
    fn test_out_of_range_line_is_all_absent() {
        let script = Script::parse("a.wav\tHi");
        assert_eq!(script.options(5, 2), vec![ScriptOption::absent(); 2]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Script::load("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, TeleopError::ScriptLoadError { .. }));
    }

    #[test]
    fn test_load_empty_file_is_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = Script::load(file.path()).unwrap_err();
        assert!(matches!(err, TeleopError::EmptyScriptError(_)));
    }

    #[test]
    fn test_load_records_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "intro.wav\tIntro").unwrap();
        writeln!(file, "story.wav\tStory\tPARTICIPANT_TURN\tYour turn").unwrap();

        let script = Script::load(file.path()).unwrap();
        assert_eq!(script.len(), 2);
        assert_eq!(script.source(), Some(file.path()));
        assert_eq!(script.line(1).unwrap().option_count(), 2);
    }
}
