use regex::bytes::{Regex, RegexSet};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Text that must never be committed.
pub const INVALID_PATTERNS: &[&str] = &[
    "<<<<<<< ", // noqa
    "======= ", // noqa
    ">>>>>>> ", // noqa
    "dbg!(", // noqa
];

// a bare separator line, the conflict marker without trailing text
const BARE_SEPARATOR: &str = "======="; // noqa

const NOQA: &str = "// noqa";

#[derive(Debug, PartialEq)]
pub struct PatternHit {
    pub pattern: String,
    pub path: PathBuf,
    pub line: usize,
}

impl fmt::Display for PatternHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid pattern {:?} found in {}:{}", self.pattern, self.path.display(), self.line)
    }
}

/// All forbidden patterns compiled into one set, matched in a single pass per line.
struct PatternMatcher {
    set: RegexSet,
    labels: Vec<&'static str>,
    noqa: Regex,
}

impl PatternMatcher {
    fn new() -> Self {
        let mut expressions: Vec<String> = INVALID_PATTERNS.iter()
            .map(|pattern| regex::escape(pattern))
            .collect();
        expressions.push(format!(r"^{}\r?$", regex::escape(BARE_SEPARATOR)));
        let mut labels = INVALID_PATTERNS.to_vec();
        labels.push(BARE_SEPARATOR);
        PatternMatcher {
            set: RegexSet::new(&expressions).expect("escaped patterns are valid regexes"),
            labels,
            noqa: Regex::new(&regex::escape(NOQA)).expect("escaped noqa marker is a valid regex"),
        }
    }

    fn line_hits(&self, line: &[u8]) -> Vec<&'static str> {
        if self.noqa.is_match(line) {
            return Vec::new();
        }
        self.set.matches(line)
            .into_iter()
            .map(|index| self.labels[index])
            .collect()
    }
}

pub fn detect_invalid_patterns(files: &[PathBuf]) -> Vec<PatternHit> {
    let matcher = PatternMatcher::new();
    let mut hits = Vec::new();
    for path in files {
        match scan_file(&matcher, path) {
            Ok(mut found) => hits.append(&mut found),
            Err(err) => warn!("Skipping {}: {}", path.display(), err),
        }
    }
    hits
}

fn scan_file(matcher: &PatternMatcher, path: &Path) -> std::io::Result<Vec<PatternHit>> {
    let reader = BufReader::new(File::open(path)?);
    let mut hits = Vec::new();
    for (index, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        for pattern in matcher.line_hits(&line) {
            hits.push(PatternHit {
                pattern: pattern.to_string(),
                path: path.to_path_buf(),
                line: index + 1,
            });
        }
    }
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn marker(c: char) -> String {
        std::iter::repeat(c).take(7).collect()
    }

    #[test]
    fn conflict_markers_are_found_with_line_numbers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "fn main() {{}}\n{} HEAD\nlet a = 1;\n{}\nlet a = 2;\n{} topic\n",
               marker('<'), marker('='), marker('>')).unwrap();

        let hits = detect_invalid_patterns(&[file.path().to_path_buf()]);
        let lines: Vec<(usize, String)> = hits.into_iter().map(|h| (h.line, h.pattern)).collect();
        assert_eq!(lines, vec![
            (2, format!("{} ", marker('<'))),
            (4, marker('=')),
            (6, format!("{} ", marker('>'))),
        ]);
    }

    #[test]
    fn noqa_lines_are_ignored() {
        let line = format!("let x = {}1); // noqa", "dbg!(");
        assert!(PatternMatcher::new().line_hits(line.as_bytes()).is_empty());
        let line = format!("let x = {}1);", "dbg!("); // noqa
        assert_eq!(PatternMatcher::new().line_hits(line.as_bytes()).len(), 1);
    }

    #[test]
    fn several_patterns_on_one_line_are_all_reported() {
        let line = format!("{} {}x)", marker('>'), "dbg!("); // noqa
        let hits = PatternMatcher::new().line_hits(line.as_bytes());
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn separator_inside_text_is_not_a_bare_separator() {
        let line = format!("let s = \"{}\";", marker('='));
        assert!(PatternMatcher::new().line_hits(line.as_bytes()).is_empty());
    }

    #[test]
    fn windows_line_endings_still_match_bare_separator() {
        let line = format!("{}\r", marker('='));
        assert_eq!(PatternMatcher::new().line_hits(line.as_bytes()).len(), 1);
    }

    #[test]
    fn non_utf8_content_is_scanned() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xff\xfe\n").unwrap();
        file.write_all(b"\xc4\x87 dbg!(x)").unwrap(); // noqa
        let hits = detect_invalid_patterns(&[file.path().to_path_buf()]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line, 2);
    }

    #[test]
    fn unreadable_files_are_skipped() {
        let hits = detect_invalid_patterns(&[PathBuf::from("does/not/exist.rs")]);
        assert!(hits.is_empty());
    }
}
