use std::{
    ffi::OsString,
    fs::{self, Permissions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::debug;

/// Appended to the input artifact's path to name its signature file.
pub const SIGNATURE_FILE_SUFFIX: &str = "_jni_sign.json";

/// `app.jar` → `app.jar_jni_sign.json`
pub fn signature_file_path(input: impl AsRef<Path>) -> PathBuf {
    let mut path = OsString::from(input.as_ref().as_os_str());
    path.push(SIGNATURE_FILE_SUFFIX);
    PathBuf::from(path)
}

/// Replaces `destination` with `payload` in one step.
///
/// The payload is written to a temporary file next to the destination which is
/// then renamed over it, so readers never observe a partial file and a failed
/// write leaves any previous content in place.
///
/// An existing destination keeps its permissions. A new one is created
/// world-readable (`0644` on Unix).
pub fn write_atomically(destination: impl AsRef<Path>, payload: &[u8]) -> io::Result<()> {
    let destination = destination.as_ref();
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    let permissions = match fs::metadata(destination) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => new_file_permissions(),
    };
    if let Some(permissions) = permissions {
        file.as_file().set_permissions(permissions)?;
    }
    file.write_all(payload)?;
    file.as_file().sync_all()?;
    debug!(
        "persisting {} bytes from {} to {}",
        payload.len(),
        file.path().display(),
        destination.display()
    );
    file.persist(destination).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_is_appended_to_full_name() {
        assert_eq!(
            signature_file_path("/tmp/app.jar"),
            PathBuf::from("/tmp/app.jar_jni_sign.json")
        );
        assert_eq!(
            signature_file_path("classes"),
            PathBuf::from("classes_jni_sign.json")
        );
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, b"old content that is longer").unwrap();

        write_atomically(&path, b"{}").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let err = write_atomically(&path, b"{}").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!path.exists());
    }

    #[cfg(unix)]
    fn mode(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[test]
    fn new_file_is_world_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_atomically(&path, b"{}").unwrap();

        assert_eq!(mode(&path), 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn overwrite_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, b"old").unwrap();
        std::fs::set_permissions(&path, Permissions::from_mode(0o640)).unwrap();

        write_atomically(&path, b"{}").unwrap();

        assert_eq!(mode(&path), 0o640);
        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
    }
}
