//! Two-pass tar extraction.
//!
//! The first pass reads every header and sanitizes every path and symlink
//! target without writing anything. Only when the whole archive is accepted
//! does the second pass rewind the reader and write members to disk. Each
//! write is re-checked against the real filesystem: the nearest existing
//! ancestor of the target is canonicalized and must still lie inside the
//! extraction root, which stops symlink chains that look harmless lexically.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use crate::entry::{ArchiveReport, Entry, EntryKind};
use crate::error::{Error, Result};
use crate::format::{self, TarCompress};
use crate::sanitize::{is_within, normalize_path, sanitize_path, sanitize_symlink_target};

/// Header data of one archive member. `kind` is `None` for member types that
/// are never written (hard links, devices, fifos).
struct Member {
    path: PathBuf,
    size: u64,
    mode: Option<u32>,
    kind: Option<EntryKind>,
}

impl Member {
    fn from_entry<R: Read>(entry: &tar::Entry<'_, R>) -> Result<Self> {
        let path = entry.path().map_err(|_| Error::InvalidPath)?.into_owned();
        let header = entry.header();
        let entry_type = header.entry_type();

        let kind = if entry_type.is_dir() {
            Some(EntryKind::Directory)
        } else if entry_type.is_symlink() {
            let target = entry
                .link_name()
                .map_err(|_| Error::InvalidPath)?
                .ok_or(Error::InvalidPath)?
                .into_owned();
            Some(EntryKind::Symlink { target })
        } else if entry_type.is_file() || entry_type.is_contiguous() || entry_type.is_gnu_sparse() {
            Some(EntryKind::File)
        } else {
            None
        };

        Ok(Self {
            path,
            size: entry.size(),
            mode: header.mode().ok(),
            kind,
        })
    }
}

/// Walk every member of a tar archive, sniffing the compression first.
fn read_members<R, F>(reader: &mut R, mut visit: F) -> Result<TarCompress>
where
    R: Read + Seek,
    F: FnMut(Member, &mut dyn Read) -> Result<()>,
{
    reader.rewind()?;
    let compression = format::detect_from_reader(reader)
        .map_err(Error::corrupted)?
        .ok_or(Error::UnsupportedFormat)?;

    let mut archive = tar::Archive::new(compression.decoder(&mut *reader)?);
    for entry in archive.entries().map_err(Error::corrupted)? {
        let mut entry = entry.map_err(Error::corrupted)?;
        let member = Member::from_entry(&entry)?;
        visit(member, &mut entry)?;
    }

    Ok(compression)
}

/// Sanitize one member against `root` and describe where it would land.
fn plan_entry(member: &Member, kind: EntryKind, root: &Path) -> Result<Entry> {
    let sanitized = sanitize_path(&member.path, root)?;
    if let EntryKind::Symlink { target } = &kind {
        sanitize_symlink_target(target, &sanitized.resolved, root)?;
    }
    Ok(Entry {
        path: member.path.clone(),
        target: sanitized.resolved,
        size: member.size,
        mode: member.mode,
        kind,
    })
}

fn canonical_root(destination: &Path) -> Result<PathBuf> {
    fs::canonicalize(destination).map_err(|source| Error::ExtractionFailed {
        path: destination.to_path_buf(),
        source,
    })
}

fn scan<R: Read + Seek>(reader: &mut R, root: &Path) -> Result<ArchiveReport> {
    let mut entries = Vec::new();
    let mut skipped = Vec::new();
    let mut total_bytes = 0u64;

    let compression = read_members(reader, |member, _| {
        match member.kind.clone() {
            Some(kind) => {
                let entry = plan_entry(&member, kind, root)?;
                if entry.is_file() {
                    total_bytes += entry.size;
                }
                entries.push(entry);
            }
            None => skipped.push(member.path),
        }
        Ok(())
    })?;

    Ok(ArchiveReport {
        compression,
        entry_count: entries.len(),
        total_bytes,
        entries,
        skipped,
    })
}

/// Check every member of the archive without writing anything.
///
/// `destination` must exist; paths are resolved against its canonical form.
pub fn validate_from_reader<R: Read + Seek>(mut reader: R, destination: &Path) -> Result<ArchiveReport> {
    let root = canonical_root(destination)?;
    scan(&mut reader, &root)
}

/// Validate the whole archive, then extract it into `destination`.
///
/// Nothing is written unless every member passes validation.
pub fn extract_from_reader<R: Read + Seek>(mut reader: R, destination: &Path) -> Result<ArchiveReport> {
    let root = canonical_root(destination)?;
    let report = scan(&mut reader, &root)?;
    tracing::debug!(
        "archive validated: {} entries, {} bytes, {} skipped",
        report.entry_count,
        report.total_bytes,
        report.skipped.len()
    );

    read_members(&mut reader, |member, content| {
        let Some(kind) = member.kind.clone() else {
            tracing::warn!(
                "skipping unsupported archive member '{}'",
                member.path.display()
            );
            return Ok(());
        };
        let entry = plan_entry(&member, kind, &root)?;
        write_entry(&entry.kind, &entry.target, &root, content)
    })?;

    Ok(report)
}

fn open_archive(archive: &Path) -> Result<BufReader<File>> {
    let file = File::open(archive).map_err(|source| Error::Open {
        path: archive.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Path-based form of [`validate_from_reader`].
pub fn validate_archive(archive: &Path, destination: &Path) -> Result<ArchiveReport> {
    validate_from_reader(open_archive(archive)?, destination)
}

/// Path-based form of [`extract_from_reader`].
pub fn extract_archive(archive: &Path, destination: &Path) -> Result<ArchiveReport> {
    tracing::debug!(
        "extracting '{}' into '{}'",
        archive.display(),
        destination.display()
    );
    extract_from_reader(open_archive(archive)?, destination)
}

fn write_entry(kind: &EntryKind, target: &Path, root: &Path, content: &mut dyn Read) -> Result<()> {
    match kind {
        EntryKind::File => write_file(target, root, content),
        EntryKind::Directory => ensure_directory(target, root),
        EntryKind::Symlink { target: link_target } => write_symlink(link_target, target, root),
    }
}

/// Canonicalize the nearest existing ancestor of `path` and require it to be
/// inside `root`.
fn confine(path: &Path, root: &Path) -> Result<()> {
    let mut probe = path;
    loop {
        match fs::canonicalize(probe) {
            Ok(real) if is_within(root, &real) => return Ok(()),
            Ok(real) => {
                return Err(Error::PathTraversal {
                    entry: path.to_path_buf(),
                    resolved: real,
                });
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                probe = probe.parent().ok_or_else(|| Error::PathTraversal {
                    entry: path.to_path_buf(),
                    resolved: probe.to_path_buf(),
                })?;
            }
            Err(e) => return Err(Error::Io(e)),
        }
    }
}

/// Resolve a symlink target from the real location of the link's parent and
/// require it to stay inside `root`. Links written earlier may make the
/// parent resolve somewhere other than its lexical path.
fn confine_link_target(target: &Path, link: &Path, root: &Path) -> Result<PathBuf> {
    let parent = link.parent().unwrap_or(root);
    let real_parent = fs::canonicalize(parent).map_err(|source| Error::ExtractionFailed {
        path: parent.to_path_buf(),
        source,
    })?;
    let joined = real_parent.join(target);
    // Dangling targets can only be checked lexically.
    let resolved = match fs::canonicalize(&joined) {
        Ok(real) => real,
        Err(e) if e.kind() == io::ErrorKind::NotFound => normalize_path(&joined),
        Err(e) => return Err(Error::Io(e)),
    };
    if !is_within(root, &resolved) {
        return Err(Error::SymlinkEscape {
            target: target.to_path_buf(),
            resolved,
        });
    }
    Ok(resolved)
}

/// Remove a symlink or file already sitting at `path` so a new member
/// replaces it instead of writing through it.
fn clear_link(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() || meta.is_file() => {
            fs::remove_file(path).map_err(|source| Error::ExtractionFailed {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    Ok(())
}

fn write_file(target: &Path, root: &Path, content: &mut dyn Read) -> Result<()> {
    clear_link(target)?;
    confine(target, root)?;
    create_parent(target)?;

    let mut file = File::create(target).map_err(|e| Error::ExtractionFailed {
        path: target.to_path_buf(),
        source: e,
    })?;
    io::copy(content, &mut file).map_err(Error::corrupted)?;
    Ok(())
}

fn ensure_directory(path: &Path, root: &Path) -> Result<()> {
    confine(path, root)?;
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| Error::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

#[cfg(unix)]
fn write_symlink(target: &Path, link: &Path, root: &Path) -> Result<()> {
    use std::os::unix::fs::symlink;

    clear_link(link)?;
    confine(link, root)?;
    create_parent(link)?;
    confine_link_target(target, link, root)?;
    symlink(target, link).map_err(|e| Error::SymlinkCreationFailed {
        target: target.to_path_buf(),
        link: link.to_path_buf(),
        source: e,
    })
}

#[cfg(windows)]
fn write_symlink(target: &Path, link: &Path, root: &Path) -> Result<()> {
    use std::os::windows::fs;

    clear_link(link)?;
    confine(link, root)?;
    create_parent(link)?;
    let resolved = confine_link_target(target, link, root)?;
    let created = if resolved.is_dir() {
        fs::symlink_dir(target, link)
    } else {
        fs::symlink_file(target, link)
    };
    created.map_err(|e| Error::SymlinkCreationFailed {
        target: target.to_path_buf(),
        link: link.to_path_buf(),
        source: e,
    })
}
