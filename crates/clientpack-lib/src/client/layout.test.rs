use super::*;

#[test]
fn test_for_workdir_defaults() {
    let layout = ClientLayout::for_workdir(Path::new("/srv/site"));
    assert_eq!(layout.app_dir, PathBuf::from("/srv/site/app"));
    assert_eq!(layout.build_dir, PathBuf::from("/srv/site/app/build"));
    assert_eq!(
        layout.store_path,
        PathBuf::from("/srv/site/.clientpack/build-config.json")
    );
    assert_eq!(layout.contrib_dir, PathBuf::from("/srv/site/contributors"));
    assert_eq!(layout.url_prefix, "../");
}

#[test]
fn test_staged_output_follows_build_dir() {
    let mut layout = ClientLayout::for_workdir(Path::new("/srv/site"));
    assert_eq!(
        layout.staged_output(Path::new("/tmp/stage/app")),
        PathBuf::from("/tmp/stage/app/build")
    );

    layout.build_dir = PathBuf::from("/srv/site/app/dist/client");
    assert_eq!(
        layout.staged_output(Path::new("/tmp/stage/app")),
        PathBuf::from("/tmp/stage/app/dist/client")
    );

    layout.build_dir = PathBuf::from("/var/www/bundle");
    assert_eq!(
        layout.staged_output(Path::new("/tmp/stage/app")),
        PathBuf::from("/tmp/stage/app/bundle")
    );
}

#[test]
fn test_staging_exclusions() {
    let mut layout = ClientLayout::for_workdir(Path::new("/srv/site"));
    assert_eq!(
        layout.staging_exclusions(),
        vec![PathBuf::from("/srv/site/app/build")]
    );

    layout.store_path = PathBuf::from("/srv/site/app/.clientpack/build-config.json");
    layout.build_dir = PathBuf::from("/var/www/bundle");
    assert_eq!(
        layout.staging_exclusions(),
        vec![PathBuf::from("/srv/site/app/.clientpack")]
    );
}

#[test]
fn test_module_file() {
    let layout = ClientLayout::for_workdir(Path::new("/srv/site"));
    assert_eq!(
        layout.module_file("a_left_pad"),
        PathBuf::from("/srv/site/app/build/web_modules/a_left_pad.js")
    );
}
