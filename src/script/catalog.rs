//! Lists script files offered in the pickers

use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// All `*.txt` files directly inside `dir`, sorted by path
///
/// An unreadable directory yields an empty list.
pub fn list_scripts(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Could not list scripts in {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut scripts: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    scripts.sort();
    scripts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_only_txt_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.txt", "notes.md", "c.TXT.bak"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let scripts = list_scripts(dir.path());
        let names: Vec<_> = scripts
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        assert!(list_scripts(Path::new("/no/scripts/here")).is_empty());
    }
}
