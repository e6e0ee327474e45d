use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

// everything staged except deletions
const STAGED_FILTER: &str = "--diff-filter=ACMRTUXB";

/// What one run of the checks looks at.
#[derive(Debug, Default)]
pub struct Selection {
    /// Work tree top level, or the starting directory outside a repository.
    pub root: PathBuf,
    /// Files the blocking checks scan.
    pub files: Vec<PathBuf>,
    /// Every tracked file, for the marker report.
    pub tracked: Vec<PathBuf>,
}

pub fn select(dir: &Path, all_files: bool) -> io::Result<Selection> {
    let root = repository_root(dir)?.unwrap_or_else(|| dir.to_path_buf());
    Ok(Selection {
        files: select_files(dir, all_files)?,
        tracked: select_files(dir, true)?,
        root,
    })
}

/// Top level of the work tree containing `dir`, or `None` outside a repository.
pub fn repository_root(dir: &Path) -> io::Result<Option<PathBuf>> {
    let output = Command::new("git")
        .args(&["rev-parse", "--show-toplevel"])
        .current_dir(dir)
        .output()?;
    if !output.status.success() {
        return Ok(None);
    }
    let root = String::from_utf8_lossy(&output.stdout).trim_end_matches('\n').to_string();
    Ok(Some(PathBuf::from(root)))
}

/// Files to check: those staged for commit, or every tracked file when
/// `all_files` is set. Paths are absolute, rooted at the work tree top level
/// so the checker behaves the same from any subdirectory. Empty outside a
/// git repository.
pub fn select_files(dir: &Path, all_files: bool) -> io::Result<Vec<PathBuf>> {
    let root = match repository_root(dir)? {
        Some(root) => root,
        None => {
            debug!("{} is not inside a git repository, nothing to check", dir.display());
            return Ok(Vec::new());
        }
    };
    if all_files {
        git_paths(&root, &["ls-files", "-z"])
    } else {
        git_paths(&root, &["diff", "--cached", "--name-only", "-z", STAGED_FILTER])
    }
}

// -z keeps git from quoting non-ASCII names
fn git_paths(root: &Path, args: &[&str]) -> io::Result<Vec<PathBuf>> {
    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .output()?;
    if !output.status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("git {} failed: {}", args.join(" "), String::from_utf8_lossy(&output.stderr).trim()),
        ));
    }
    let paths: Vec<PathBuf> = output.stdout
        .split(|byte| *byte == 0)
        .filter(|name| !name.is_empty())
        .map(|name| root.join(path_from_bytes(name)))
        .collect();
    debug!("git {} selected {} files", args.join(" "), paths.len());
    Ok(paths)
}

#[cfg(unix)]
fn path_from_bytes(name: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(name))
}

#[cfg(not(unix))]
fn path_from_bytes(name: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(name).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(&["-c", "user.name=Test", "-c", "user.email=test@example.com", "-c", "commit.gpgsign=false"])
            .args(args)
            .current_dir(dir)
            .status()
            .unwrap();
        assert!(status.success(), "git {:?}", args);
    }

    fn repository() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init", "-q"]);
        dir
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files.iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn outside_a_repository_nothing_is_selected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(select_files(dir.path(), false).unwrap().is_empty());
        assert!(select_files(dir.path(), true).unwrap().is_empty());
    }

    #[test]
    fn selection_splits_staged_from_tracked() {
        let repo = repository();
        fs::write(repo.path().join("committed.rs"), "fn a() {}\n").unwrap();
        git(repo.path(), &["add", "committed.rs"]);
        git(repo.path(), &["commit", "-q", "-m", "init"]);
        fs::write(repo.path().join("staged.rs"), "fn b() {}\n").unwrap();
        git(repo.path(), &["add", "staged.rs"]);

        let selection = select(repo.path(), false).unwrap();
        assert_eq!(names(&selection.files), vec!["staged.rs"]);
        let mut tracked = names(&selection.tracked);
        tracked.sort();
        assert_eq!(tracked, vec!["committed.rs", "staged.rs"]);
        assert!(selection.files.iter().all(|f| f.starts_with(&selection.root)));
    }

    #[test]
    fn renamed_and_edited_files_are_selected() {
        let repo = repository();
        fs::write(repo.path().join("old.rs"), "fn main() {}\n".repeat(20)).unwrap();
        git(repo.path(), &["add", "old.rs"]);
        git(repo.path(), &["commit", "-q", "-m", "init"]);
        git(repo.path(), &["mv", "old.rs", "new.rs"]);
        let mut content = fs::read_to_string(repo.path().join("new.rs")).unwrap();
        content.push_str(&"<".repeat(7));
        content.push_str(" HEAD\n");
        fs::write(repo.path().join("new.rs"), content).unwrap();
        git(repo.path(), &["add", "new.rs"]);

        let files = select_files(repo.path(), false).unwrap();
        assert_eq!(names(&files), vec!["new.rs"]);
        let hits = crate::precommit::patterns::detect_invalid_patterns(&files);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line, 21);
    }

    #[test]
    fn non_ascii_names_resolve_to_real_files() {
        let repo = repository();
        fs::write(repo.path().join("zażółć.rs"), format!("{} t\n", ">".repeat(7))).unwrap();
        git(repo.path(), &["add", "zażółć.rs"]);

        for all_files in vec![false, true] {
            let files = select_files(repo.path(), all_files).unwrap();
            assert_eq!(names(&files), vec!["zażółć.rs"]);
            assert_eq!(crate::precommit::patterns::detect_invalid_patterns(&files).len(), 1);
        }
    }

    #[test]
    fn subdirectories_resolve_paths_from_the_top_level() {
        let repo = repository();
        fs::create_dir(repo.path().join("src")).unwrap();
        fs::write(repo.path().join("src").join("lib.rs"), "pub fn a() {}\n").unwrap();
        fs::write(repo.path().join("top.rs"), "fn b() {}\n").unwrap();
        git(repo.path(), &["add", "."]);

        let mut files = select_files(&repo.path().join("src"), false).unwrap();
        files.sort();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.exists()), "{:?}", files);
    }
}
