use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

const MARKER_PATTERN: &str = r"TODO|HACK|EXPLAIN|REMOVE|THINK|@[A-Z][a-z]+";

// scratch directories are never reported
const EXCLUDED_DIR: &str = "tmp";

/// A work marker or a mention of a person, reported but never failing the commit.
#[derive(Debug, PartialEq)]
pub struct MarkerHit {
    pub marker: String,
    pub path: PathBuf,
    pub line: usize,
    pub text: String,
}

impl fmt::Display for MarkerHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: [{}] {}", self.path.display(), self.line, self.marker, self.text.trim())
    }
}

/// Scans `files`, skipping anything under a `tmp` directory of `root`.
pub fn find_markers(root: &Path, files: &[PathBuf]) -> Vec<MarkerHit> {
    let matcher = Regex::new(MARKER_PATTERN).expect("marker pattern is a valid regex");
    let mut hits = Vec::new();
    for path in files.iter().filter(|path| !is_excluded(root, path)) {
        let content = match fs::read(path) {
            Ok(content) => content,
            Err(err) => {
                warn!("Skipping {}: {}", path.display(), err);
                continue;
            }
        };
        let content = String::from_utf8_lossy(&content);
        for (index, line) in content.lines().enumerate() {
            if let Some(found) = matcher.find(line) {
                hits.push(MarkerHit {
                    marker: found.as_str().to_string(),
                    path: path.clone(),
                    line: index + 1,
                    text: line.to_string(),
                });
            }
        }
    }
    hits
}

fn is_excluded(root: &Path, path: &Path) -> bool {
    match path.strip_prefix(root) {
        Ok(relative) => relative.components()
            .any(|component| component == Component::Normal(EXCLUDED_DIR.as_ref())),
        Err(_) => false,
    }
}
