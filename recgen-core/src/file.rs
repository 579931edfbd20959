use std::{
    io,
    path::{Path, PathBuf},
};

/// Permission bits applied to every generated file on Unix.
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

fn write_file(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    set_mode(path)
}

#[cfg(unix)]
fn set_mode(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(FILE_MODE))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// A file to be generated
pub struct File {
    path: PathBuf,
    content: Vec<u8>,
}

impl File {
    /// Create a new file with the given path and content
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Write the file, replacing whatever was there before
    pub fn write(&self) -> io::Result<()> {
        write_file(&self.path, &self.content)?;
        tracing::info!(path = %self.path.display(), bytes = self.content.len(), "wrote file");
        Ok(())
    }
}
