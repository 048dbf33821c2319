//! Filesystem helpers for staging and publishing client trees
//!
//! - `copy_tree()`: recursive copy that recreates symlinks instead of following them
//! - `replace_tree()`: delete-then-copy publication of a finished tree
//! - `atomic_write()`: write-temp-then-rename for small files
//! - `tree_digest()`: deterministic SHA-256 over a directory's contents

use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Copy `src` into `dst`, preserving symlinks as links.
///
/// Any entry whose absolute path is listed in `skip` is left out together with
/// everything below it. `dst` is created if missing.
pub fn copy_tree(src: &Path, dst: &Path, skip: &[PathBuf]) -> io::Result<()> {
    fs::create_dir_all(dst)?;

    let walker = WalkDir::new(src)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !skip.iter().any(|s| e.path() == s.as_path()));

    for entry in walker {
        let entry = entry.map_err(io::Error::other)?;
        let rel = match entry.path().strip_prefix(src) {
            Ok(rel) if rel.as_os_str().is_empty() => continue,
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let target = dst.join(rel);
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            let link = fs::read_link(entry.path())?;
            create_symlink(&link, &target)?;
        } else if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

/// Replace `dst` wholesale with a copy of `src`.
///
/// Between the delete and the end of the copy `dst` is incomplete.
pub fn replace_tree(src: &Path, dst: &Path) -> io::Result<()> {
    remove_tree(dst)?;
    copy_tree(src, dst, &[])
}

/// Remove a directory tree, treating a missing path as already removed.
pub fn remove_tree(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Write `content` to `path` through a sibling temp file and a rename.
///
/// Readers observe either the old file or the new one, never a partial write.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

/// Deterministic digest of a directory's contents.
///
/// Covers relative paths, file bytes and symlink targets; ignores timestamps
/// and permissions. A missing directory hashes like an empty one.
pub fn tree_digest(path: &Path) -> io::Result<String> {
    let mut hasher = Sha256::new();

    if !path.exists() {
        return Ok(hex::encode(hasher.finalize()));
    }

    for entry in WalkDir::new(path).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(io::Error::other)?;
        let rel = entry
            .path()
            .strip_prefix(path)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");
        if rel.is_empty() {
            continue;
        }

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            let target = fs::read_link(entry.path())?;
            hasher.update(format!("L:{}:{}\n", rel, target.to_string_lossy()).as_bytes());
        } else if file_type.is_dir() {
            hasher.update(format!("D:{}\n", rel).as_bytes());
        } else if file_type.is_file() {
            let contents = fs::read(entry.path())?;
            hasher.update(format!("F:{}:", rel).as_bytes());
            hasher.update(hex::encode(Sha256::digest(&contents)).as_bytes());
            hasher.update(b"\n");
        }
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(unix)]
fn create_symlink(link: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(link, target)
}

#[cfg(windows)]
fn create_symlink(link: &Path, target: &Path) -> io::Result<()> {
    let resolved = target.parent().map(|p| p.join(link)).unwrap_or_else(|| link.to_path_buf());
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(link, target)
    } else {
        std::os::windows::fs::symlink_file(link, target)
    }
}

#[cfg(test)]
mod tests {
    include!("fsutil.test.rs");
}
