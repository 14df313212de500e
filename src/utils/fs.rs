use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub fn relative_path(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// A single file is returned as-is; directories are walked for `*.json`,
/// skipping hidden directories. Paths come back in a stable order.
pub fn collect_answer_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        bail!("path does not exist: {}", path.display());
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
    {
        let entry = entry.with_context(|| format!("failed walking {}", path.display()))?;
        if entry.file_type().is_file() && is_json(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed parsing {}", path.display()))
}

pub fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("failed writing {}", path.display()))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_uses_forward_slashes() {
        let base = Path::new("/reviews");
        assert_eq!(
            relative_path(base, Path::new("/reviews/sprint-1/PROJ-1.json")),
            "sprint-1/PROJ-1.json"
        );
        assert_eq!(relative_path(base, Path::new("/other/x.json")), "/other/x.json");
    }

    #[test]
    fn collects_json_files_and_skips_hidden_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("b.json"), "[]").unwrap();
        fs::write(dir.path().join("a.JSON"), "[]").unwrap();
        fs::write(dir.path().join("readme.md"), "").unwrap();
        fs::create_dir(dir.path().join(".cache")).unwrap();
        fs::write(dir.path().join(".cache/c.json"), "[]").unwrap();

        let files = collect_answer_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|file| relative_path(dir.path(), file))
            .collect();
        assert_eq!(names, ["a.JSON", "b.json"]);
    }

    #[test]
    fn missing_path_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(collect_answer_files(&dir.path().join("absent")).is_err());
    }
}
