// all-or-nothing behaviour of file-backed injection
use snesfloppy::disk_formats::Geometry;
use snesfloppy::fat12::{inject_file, reader, Source};
use snesfloppy::formats::{BlankFormatter, Synthesized};
use snesfloppy::{DosName, Error};
type STDRESULT = Result<(), Box<dyn std::error::Error>>;

fn source(name: &str, len: usize, fill: u8) -> Source {
    Source::new(DosName::new(name).unwrap(), vec![fill; len])
}

#[test]
fn disk_full_leaves_file_untouched() -> STDRESULT {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("disk.img");
    Synthesized.create_blank(Geometry::Dd720K, &path)?;
    inject_file(&path, &[source("FIRST.BIN", 10_000, 1)])?;
    let before = std::fs::read(&path)?;

    let batch = [source("SECOND.BIN", 1000, 2), source("HUGE.BIN", 800_000, 3)];
    match inject_file(&path, &batch) {
        Err(Error::DiskFull { name, .. }) => assert_eq!(name, "HUGE.BIN"),
        other => panic!("expected disk full, got {:?}", other),
    }
    assert_eq!(std::fs::read(&path)?, before);
    Ok(())
}

#[test]
fn directory_full_leaves_file_untouched() -> STDRESULT {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("disk.img");
    Synthesized.create_blank(Geometry::Hd1440K, &path)?;
    let before = std::fs::read(&path)?;
    let batch: Vec<Source> = (0..225).map(|i| source(&format!("P{}", i), 1, i as u8)).collect();
    assert!(matches!(inject_file(&path, &batch), Err(Error::DirectoryFull { .. })));
    assert_eq!(std::fs::read(&path)?, before);

    // the same batch minus the overflowing file goes through
    inject_file(&path, &batch[..224])?;
    let image = std::fs::read(&path)?;
    assert_eq!(reader::catalog(&image)?.len(), 224);
    assert_eq!(reader::read_file(&image, "P223")?, vec![223u8]);
    Ok(())
}

#[test]
fn missing_image_is_a_resource_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = inject_file(&dir.path().join("nope.img"), &[source("A", 1, 0)]);
    assert!(matches!(result, Err(Error::Resource { .. })));
}

#[cfg(unix)]
#[test]
fn rewrite_keeps_mode_and_symlink() -> STDRESULT {
    use std::os::unix::fs::PermissionsExt;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("disk.img");
    let link = dir.path().join("current.img");
    Synthesized.create_blank(Geometry::Hd1440K, &path)?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644))?;
    std::os::unix::fs::symlink(&path, &link)?;

    inject_file(&link, &[source("A.BIN", 100, 7)])?;
    assert_eq!(std::fs::metadata(&path)?.permissions().mode() & 0o777, 0o644);
    assert!(std::fs::symlink_metadata(&link)?.file_type().is_symlink());
    assert_eq!(reader::read_file(&std::fs::read(&path)?, "A.BIN")?, vec![7u8; 100]);
    Ok(())
}
