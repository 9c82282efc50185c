//! Atomic document writes.
//!
//! Each collection file is replaced by writing a hidden temporary sibling
//! and renaming it over the target, so readers never observe a partially
//! written document.

use std::io::{self, Write};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};
use uuid::Uuid;

use super::DocumentStoreError;

/// Replace `path` inside `dir` with `contents`.
///
/// `path` must name a file directly inside `dir`.
pub(crate) fn write_atomic(
    dir: &Dir,
    path: &Utf8Path,
    contents: &str,
) -> Result<(), DocumentStoreError> {
    let mut components = path.components();
    let (Some(Utf8Component::Normal(file_name)), None) = (components.next(), components.next())
    else {
        return Err(DocumentStoreError::io(path, "document path must be a bare file name"));
    };
    let tmp_name = temp_name(file_name);

    write_temp_file(dir, &tmp_name, contents)
        .map_err(|err| DocumentStoreError::io(&path.with_file_name(&tmp_name), err))?;
    if let Err(err) = rename_over(dir, &tmp_name, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(DocumentStoreError::io(path, err));
    }
    sync_directory(dir);
    Ok(())
}

fn temp_name(file_name: &str) -> String {
    format!(".{file_name}.tmp-{}", Uuid::new_v4().simple())
}

fn write_temp_file(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;

    let written = file
        .write_all(contents.as_bytes())
        .and_then(|()| file.sync_all());
    if written.is_err() {
        drop(file);
        drop(dir.remove_file(tmp_name));
    }
    written
}

#[cfg(windows)]
fn rename_over(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_over(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn sync_directory(dir: &Dir) {
    // Best effort; the rename has already landed.
    drop(dir.open(".").and_then(|handle| handle.sync_all()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use cap_std::ambient_authority;

    fn temp_dir() -> (tempfile::TempDir, Dir) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = Dir::open_ambient_dir(tmp.path(), ambient_authority()).expect("open dir");
        (tmp, dir)
    }

    #[test]
    fn replaces_existing_contents() {
        let (_tmp, dir) = temp_dir();
        let path = Utf8Path::new("bands.json");

        write_atomic(&dir, path, "[]").expect("first write");
        write_atomic(&dir, path, "[1]").expect("second write");

        assert_eq!(dir.read_to_string(path).expect("read"), "[1]");
    }

    #[test]
    fn leaves_no_temporary_files() {
        let (_tmp, dir) = temp_dir();
        write_atomic(&dir, Utf8Path::new("likes.json"), "[]").expect("write");

        let names: Vec<String> = dir
            .entries()
            .expect("entries")
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        assert_eq!(names, ["likes.json"]);
    }

    #[test]
    fn temporary_names_are_hidden_and_unique() {
        let first = temp_name("bands.json");
        let second = temp_name("bands.json");
        assert!(first.starts_with(".bands.json.tmp-"));
        assert_ne!(first, second);
    }

    #[test]
    fn rejects_nested_paths() {
        let (_tmp, dir) = temp_dir();
        let err = write_atomic(&dir, Utf8Path::new("nested/bands.json"), "[]")
            .expect_err("nested path");
        assert!(matches!(err, DocumentStoreError::Io { .. }));
    }
}
