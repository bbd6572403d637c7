use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use repeat_archive::{Error, Staging, StagingOptions, TarCompress, extract_archive};

fn write_tar_gz(path: &Path, members: &[(&str, &[u8])]) {
    let file = File::create(path).expect("Failed to create archive");
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        if name.ends_with('/') {
            header.set_mode(0o755);
            header.set_entry_type(tar::EntryType::Directory);
        } else {
            header.set_mode(0o644);
            header.set_entry_type(tar::EntryType::Regular);
        }
        // Raw name bytes: the builder refuses `..` on purpose.
        header.as_old_mut().name[..name.len()].copy_from_slice(name.as_bytes());
        header.set_cksum();
        builder.append(&header, *data).expect("Failed to append member");
    }
    builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .and_then(|mut file| file.flush())
        .expect("Failed to finish archive");
}

#[test]
fn extract_tar_gz_into_staging() {
    let fixtures = tempfile::tempdir().unwrap();
    let archive = fixtures.path().join("good.tar.gz");
    write_tar_gz(
        &archive,
        &[
            ("repeat-42/", b""),
            ("repeat-42/collections.db", b"not really sqlite"),
            ("repeat-42/logs/run.log", b"line\n"),
        ],
    );

    let staging = Staging::new(&StagingOptions::default()).unwrap();
    let report = staging.extract(&archive).unwrap();

    assert_eq!(report.compression, TarCompress::Gzip);
    assert_eq!(report.files().count(), 2);
    for entry in &report.entries {
        let target = &entry.target;
        assert!(target.starts_with(staging.root()), "{} escaped", target.display());
        assert!(target.exists());
    }
    assert_eq!(
        fs::read(staging.root().join("repeat-42/logs/run.log")).unwrap(),
        b"line\n"
    );

    let root = staging.root().to_path_buf();
    staging.close().unwrap();
    assert!(!root.exists());
}

#[test]
fn evil_member_leaves_nothing_behind() {
    let fixtures = tempfile::tempdir().unwrap();
    let archive = fixtures.path().join("evil.tar.gz");
    write_tar_gz(&archive, &[("../outside.txt", b"pwned")]);

    let base = tempfile::tempdir().unwrap();
    let staging = Staging::new(&StagingOptions::default().base_dir(base.path())).unwrap();
    let root: PathBuf = staging.root().to_path_buf();

    let err = staging.extract(&archive).unwrap_err();
    assert!(err.is_traversal(), "unexpected error: {err}");
    drop(staging);

    assert!(!root.exists());
    assert!(!base.path().join("outside.txt").exists());
}

#[test]
fn missing_archive_is_open_error() {
    let dest = tempfile::tempdir().unwrap();
    let result = extract_archive(Path::new("does/not/exist.tar.gz"), dest.path());
    assert!(matches!(result, Err(Error::Open { .. })));
}
