// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::{StoreError, WriteDurability};

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Metadata of whatever is at `path`, `None` when nothing is. A symlink is an error.
fn exists_without_symlink(path: &Path) -> Result<Option<fs::Metadata>, StoreError> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => Err(StoreError::SymlinkRefused {
            path: path.to_path_buf(),
        }),
        Ok(meta) => Ok(Some(meta)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(io_at(path)(source)),
    }
}

fn ensure_dir(dir: &Path) -> Result<(), StoreError> {
    match exists_without_symlink(dir)? {
        Some(meta) if meta.is_dir() => Ok(()),
        Some(_) => Err(io_at(dir)(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "not a directory",
        ))),
        None => fs::create_dir_all(dir).map_err(io_at(dir)),
    }
}

/// Sibling temp file that removes itself unless it was renamed into place.
struct Staged {
    path: PathBuf,
    committed: bool,
}

impl Staged {
    fn create(dir: &Path, target_name: &str) -> Result<(Self, File), StoreError> {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        let path = dir.join(format!(
            ".quote-intake.tmp.{target_name}.{}.{stamp}",
            std::process::id()
        ));
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(io_at(&path))?;
        Ok((
            Self {
                path,
                committed: false,
            },
            file,
        ))
    }

    fn commit(mut self, target: &Path) -> Result<(), StoreError> {
        replace(&self.path, target).map_err(io_at(target))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for Staged {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

#[cfg(not(windows))]
fn replace(from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to)
}

// Windows refuses to rename over an existing file in some configurations.
#[cfg(windows)]
fn replace(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(err)
            if matches!(
                err.kind(),
                io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
            ) =>
        {
            let _ = fs::remove_file(to);
            fs::rename(from, to)
        }
        other => other,
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<(), StoreError> {
    File::open(dir)
        .and_then(|handle| handle.sync_all())
        .map_err(io_at(dir))
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<(), StoreError> {
    Ok(())
}

/// Replaces `path` with `contents` through a staged sibling file and a rename.
///
/// Readers see the old document or the new one, never a partial write. Symlinks at the
/// target or its directory are refused.
pub(crate) fn write_atomic(
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    let target_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| io_at(path)(io::Error::other("path has no file name")))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    ensure_dir(dir)?;
    exists_without_symlink(path)?;

    let (staged, mut file) = Staged::create(dir, &target_name)?;
    file.write_all(contents).map_err(io_at(&staged.path))?;
    if durability == WriteDurability::Durable {
        file.sync_all().map_err(io_at(&staged.path))?;
    }
    drop(file);

    staged.commit(path)?;

    if durability == WriteDurability::Durable {
        sync_dir(dir)?;
    }
    Ok(())
}
