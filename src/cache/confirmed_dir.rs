use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};

/// A directory that was confirmed to exist when the value was created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfirmedDir(PathBuf);

impl ConfirmedDir {
    pub fn new(path: impl Into<PathBuf>) -> io::Result<ConfirmedDir> {
        let path = path.into();
        if path.is_dir() {
            Ok(ConfirmedDir(path))
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not an existing directory", path.display()),
            ))
        }
    }

    /// Caller guarantees `path` was just created or checked.
    pub(crate) fn assume_exists(path: PathBuf) -> ConfirmedDir {
        ConfirmedDir(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.0.join(path)
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for ConfirmedDir {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for ConfirmedDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.display().fmt(f)
    }
}
