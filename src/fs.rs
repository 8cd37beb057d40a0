//! Whole-file disk access used by the service.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Filesystem operations the service depends on.
pub trait FileSystem {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write `data` to `path`, replacing any previous contents, and apply `mode`.
    fn write_file(&self, path: &Path, data: &[u8], mode: u32) -> io::Result<()>;

    fn delete_file(&self, path: &Path) -> io::Result<()>;
}

/// `FileSystem` backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileSystem;

impl FileSystem for DiskFileSystem {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write_file(&self, path: &Path, data: &[u8], mode: u32) -> io::Result<()> {
        // Permissions are narrowed before the new contents land, for both
        // freshly created and pre-existing files.
        let mut file = open_for_write(path, mode)?;
        restrict(&file, mode)?;
        file.set_len(0)?;
        file.write_all(data)?;
        file.sync_all()
    }

    fn delete_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Open `path` for writing without truncating. A new file is created with `mode`.
#[cfg(unix)]
fn open_for_write(path: &Path, mode: u32) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .mode(mode)
        .open(path)
}

#[cfg(not(unix))]
fn open_for_write(path: &Path, _mode: u32) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
}

#[cfg(unix)]
fn restrict(file: &File, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn restrict(_file: &File, _mode: u32) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.bin");
        let fs = DiskFileSystem;

        fs.write_file(&path, b"payload", 0o600).unwrap();
        assert_eq!(fs.read_file(&path).unwrap(), b"payload");

        fs.delete_file(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(
            fs.delete_file(&path).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[cfg(unix)]
    #[test]
    fn write_applies_mode_to_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        DiskFileSystem.write_file(&path, b"new", 0o600).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn new_file_is_created_with_restricted_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.toml");

        // Checked before any set_permissions call runs.
        let file = open_for_write(&path, 0o600).unwrap();
        let mode = file.metadata().unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "created with mode {:o}", mode & 0o777);
        drop(file);

        DiskFileSystem.write_file(&path, b"key", 0o600).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn rewrite_replaces_longer_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "a much longer previous body").unwrap();

        DiskFileSystem.write_file(&path, b"short", 0o600).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "short");
    }
}
