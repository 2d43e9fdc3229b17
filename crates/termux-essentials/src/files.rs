use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("No such file: {}", .0.display())]
    NotFound(PathBuf),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            FileError::NotFound(path.to_path_buf())
        } else {
            FileError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Truncates an existing file to zero length. Missing files are an error,
/// never created.
pub fn erase(path: impl AsRef<Path>) -> Result<(), FileError> {
    let path = path.as_ref();

    OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| FileError::from_io(path, e))?;

    log::info!("Erased {}", path.display());
    Ok(())
}

/// Replaces a file's content with `content`. With `create` unset a missing
/// file is an error, like [`erase`].
pub fn overwrite(
    path: impl AsRef<Path>,
    content: impl AsRef<[u8]>,
    create: bool,
) -> Result<(), FileError> {
    let path = path.as_ref();
    let content = content.as_ref();

    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(create)
        .open(path)
        .map_err(|e| FileError::from_io(path, e))?;

    file.write_all(content)
        .and_then(|_| file.flush())
        .map_err(|e| FileError::from_io(path, e))?;

    log::info!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

pub fn read_to_string(path: impl AsRef<Path>) -> Result<String, FileError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| FileError::from_io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "termux-essentials-{}-{}",
            std::process::id(),
            name
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_overwrite_then_read_round_trip() {
        let path = scratch("round-trip");
        fs::write(&path, "old content that is longer than the new one").unwrap();

        let content = "héllo\nworld\t!";
        overwrite(&path, content, false).expect("overwrite failed");

        assert_eq!(read_to_string(&path).unwrap(), content);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_overwrite_with_empty_content() {
        let path = scratch("overwrite-empty");
        fs::write(&path, "something").unwrap();

        overwrite(&path, "", false).unwrap();

        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_overwrite_missing_file_without_create() {
        let path = scratch("overwrite-missing");

        let err = overwrite(&path, "data", false).unwrap_err();

        assert!(matches!(err, FileError::NotFound(ref p) if p == &path));
        assert!(!path.exists());
    }

    #[test]
    fn test_overwrite_missing_file_with_create() {
        let path = scratch("overwrite-create");

        overwrite(&path, "fresh", true).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_erase_empties_file() {
        let path = scratch("erase");
        fs::write(&path, "line one\nline two\n").unwrap();

        erase(&path).expect("erase failed");

        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
        assert_eq!(read_to_string(&path).unwrap(), "");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_erase_missing_file() {
        let path = scratch("erase-missing");

        let err = erase(&path).unwrap_err();

        assert!(matches!(err, FileError::NotFound(_)));
        assert!(err.to_string().starts_with("No such file: "));
        assert!(!path.exists(), "erase must not create files");
    }

    #[test]
    fn test_erase_directory_is_io_error() {
        let dir = std::env::temp_dir();

        let err = erase(&dir).unwrap_err();

        assert!(matches!(err, FileError::Io { .. }));
    }
}
