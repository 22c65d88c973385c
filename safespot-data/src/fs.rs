//! Capability-based filesystem helpers shared by ingestion and the CLI.

use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Read a UTF-8 text file using ambient authority.
///
/// # Errors
/// Returns the I/O error raised while opening or reading the file.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = parent_and_name(path)?;
    dir.read_to_string(name)
}

/// Whether `path` exists and is a regular file.
///
/// # Errors
/// Propagates failures other than the file or its parent being absent.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let metadata = parent_and_name(path).and_then(|(dir, name)| dir.metadata(name));
    match metadata {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Create the parent directory of `path` when it is missing.
///
/// # Errors
/// Returns the I/O error raised while creating the directories.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    let (anchor, below) = split_anchor(parent);
    if below.as_str().is_empty() {
        return Ok(());
    }
    fs_utf8::Dir::open_ambient_dir(&anchor, ambient_authority())?.create_dir_all(&below)
}

/// Open the directory holding `path` and return it with the file name.
fn parent_and_name(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, &str)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} has no file name")))?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split `dir` into the part cap-std must open ambiently and the part below.
///
/// The anchor holds any drive prefix, the root and leading `..` components,
/// none of which a capability directory may traverse.
fn split_anchor(dir: &Utf8Path) -> (Utf8PathBuf, Utf8PathBuf) {
    let mut anchor = Utf8PathBuf::new();
    let mut below = Utf8PathBuf::new();
    for component in dir.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::Prefix(_) | Utf8Component::RootDir => anchor.push(component),
            Utf8Component::ParentDir if below.as_str().is_empty() => anchor.push(component),
            other => below.push(other),
        }
    }
    if anchor.as_str().is_empty() {
        anchor.push(".");
    }
    (anchor, below)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn utf8(dir: &TempDir, relative: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join(relative)).expect("utf-8 path")
    }

    #[rstest]
    fn creates_nested_parent(temp_dir: TempDir) {
        let target = utf8(&temp_dir, "a/b/places.db");
        ensure_parent_dir(&target).expect("create parents");
        assert!(target.parent().expect("parent").is_dir());
    }

    #[rstest]
    fn reads_text_back(temp_dir: TempDir) {
        let target = utf8(&temp_dir, "note.txt");
        std::fs::write(target.as_std_path(), "hello").expect("write file");
        assert_eq!(read_to_string(&target).expect("read file"), "hello");
    }

    #[rstest]
    fn reports_missing_files_as_absent(temp_dir: TempDir) {
        assert!(!file_is_file(&utf8(&temp_dir, "missing.db")).expect("inspect path"));
        assert!(!file_is_file(&utf8(&temp_dir, "nowhere/missing.db")).expect("inspect path"));
    }

    #[rstest]
    #[case("/srv/data/places.db", "/", "srv/data")]
    #[case("out/places.db", ".", "out")]
    #[case("./out/places.db", ".", "out")]
    #[case("../shared/places.db", "..", "shared")]
    #[case("places.db", ".", "")]
    fn anchors_split_before_the_creatable_part(
        #[case] path: &str,
        #[case] anchor: &str,
        #[case] below: &str,
    ) {
        let parent = Utf8Path::new(path).parent().expect("parent");
        let (found_anchor, found_below) = split_anchor(parent);
        assert_eq!(found_anchor, Utf8PathBuf::from(anchor));
        assert_eq!(found_below, Utf8PathBuf::from(below));
    }

    #[rstest]
    fn directories_are_not_files(temp_dir: TempDir) {
        let nested = utf8(&temp_dir, "dir/inner");
        std::fs::create_dir_all(nested.as_std_path()).expect("create dir");
        assert!(!file_is_file(&nested).expect("inspect path"));
    }
}
