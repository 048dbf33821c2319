use super::*;
use std::fs;
use tempfile::TempDir;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn test_copy_tree_copies_nested_files() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    write(&src.join("package.json"), "{}");
    write(&src.join("src/index.js"), "export default 1;");

    let dst = temp.path().join("dst");
    copy_tree(&src, &dst, &[]).unwrap();

    assert_eq!(fs::read_to_string(dst.join("package.json")).unwrap(), "{}");
    assert_eq!(
        fs::read_to_string(dst.join("src/index.js")).unwrap(),
        "export default 1;"
    );
}

#[test]
fn test_copy_tree_skips_listed_paths() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    write(&src.join("keep.txt"), "keep");
    write(&src.join("build/web_modules/a.js"), "old");

    let dst = temp.path().join("dst");
    copy_tree(&src, &dst, &[src.join("build")]).unwrap();

    assert!(dst.join("keep.txt").exists());
    assert!(!dst.join("build").exists());
}

#[cfg(unix)]
#[test]
fn test_copy_tree_preserves_symlinks() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    write(&src.join("real.js"), "real");
    std::os::unix::fs::symlink("real.js", src.join("link.js")).unwrap();

    let dst = temp.path().join("dst");
    copy_tree(&src, &dst, &[]).unwrap();

    let meta = fs::symlink_metadata(dst.join("link.js")).unwrap();
    assert!(meta.file_type().is_symlink());
    assert_eq!(fs::read_link(dst.join("link.js")).unwrap(), Path::new("real.js"));
}

#[test]
fn test_replace_tree_drops_stale_files() {
    let temp = TempDir::new().unwrap();
    let fresh = temp.path().join("fresh");
    write(&fresh.join("web_modules/new.js"), "new");
    let live = temp.path().join("live");
    write(&live.join("web_modules/stale.js"), "stale");

    replace_tree(&fresh, &live).unwrap();

    assert!(live.join("web_modules/new.js").exists());
    assert!(!live.join("web_modules/stale.js").exists());
}

#[test]
fn test_remove_tree_missing_is_ok() {
    let temp = TempDir::new().unwrap();
    assert!(remove_tree(&temp.path().join("nope")).is_ok());
}

#[test]
fn test_atomic_write_replaces_contents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested/config.json");

    atomic_write(&path, b"first").unwrap();
    atomic_write(&path, b"second").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn test_tree_digest_tracks_content() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a");
    let b = temp.path().join("b");
    write(&a.join("web_modules/x.js"), "export default 1;");
    write(&b.join("web_modules/x.js"), "export default 1;");

    assert_eq!(tree_digest(&a).unwrap(), tree_digest(&b).unwrap());

    write(&b.join("web_modules/x.js"), "export default 2;");
    assert_ne!(tree_digest(&a).unwrap(), tree_digest(&b).unwrap());
}

#[test]
fn test_tree_digest_missing_equals_empty() {
    let temp = TempDir::new().unwrap();
    let empty = temp.path().join("empty");
    fs::create_dir_all(&empty).unwrap();

    assert_eq!(
        tree_digest(&empty).unwrap(),
        tree_digest(&temp.path().join("missing")).unwrap()
    );
}
