// Per-request scratch directory
//
// Created fresh for every download and removed when the guard drops, on
// success and error paths alike.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::models::{escape_template, OutputPath, OutputTarget};

const PREFIX: &str = "video-grabber-";

/// File stem used when the output extension is known up front
pub const FIXED_STEM: &str = "output";

/// yt-dlp template used when the backend picks the extension
pub const TITLE_TEMPLATE: &str = "%(title)s.%(ext)s";

#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Uniquely named directory under the system temp area
    pub fn acquire() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(PREFIX).tempdir()?;
        tracing::debug!("workspace acquired at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Backend output argument plus the exact path when it is known ahead
    pub fn output_for(&self, target: &OutputTarget) -> (OutputPath, Option<PathBuf>) {
        match target {
            OutputTarget::Fixed { extension } => {
                let path = self.path().join(format!("{}.{}", FIXED_STEM, extension));
                (OutputPath::Path(path.clone()), Some(path))
            }
            OutputTarget::Template => {
                let dir = escape_template(&self.path().to_string_lossy());
                let template = Path::new(&dir).join(TITLE_TEMPLATE);
                (
                    OutputPath::Template(template.to_string_lossy().to_string()),
                    None,
                )
            }
        }
    }

    /// Remove the directory now and report failures instead of ignoring them
    pub fn release(self) -> std::io::Result<()> {
        let path = self.path().to_path_buf();
        self.dir.close()?;
        tracing::debug!("workspace released: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_and_removed_on_drop() {
        let a = Workspace::acquire().unwrap();
        let b = Workspace::acquire().unwrap();
        assert_ne!(a.path(), b.path());

        let path = a.path().to_path_buf();
        assert!(path.is_dir());
        drop(a);
        assert!(!path.exists());
    }

    #[test]
    fn test_release_removes_contents() {
        let ws = Workspace::acquire().unwrap();
        std::fs::write(ws.path().join("output.mp4"), b"data").unwrap();
        let path = ws.path().to_path_buf();
        ws.release().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_output_paths() {
        let ws = Workspace::acquire().unwrap();

        let (arg, expected) = ws.output_for(&OutputTarget::Fixed {
            extension: "m4a".to_string(),
        });
        let expected = expected.unwrap();
        assert_eq!(expected, ws.path().join("output.m4a"));
        assert_eq!(arg, OutputPath::Path(expected));

        let (arg, expected) = ws.output_for(&OutputTarget::Template);
        assert!(expected.is_none());
        assert!(arg.as_arg().ends_with("%(title)s.%(ext)s"));
        assert!(arg.as_arg().starts_with(&*ws.path().to_string_lossy()));
    }

    #[cfg(unix)]
    #[test]
    fn test_percent_in_temp_dir_is_escaped() {
        let parent = tempfile::Builder::new()
            .prefix("tmp-%(id)s-")
            .tempdir()
            .unwrap();
        let dir = tempfile::Builder::new()
            .prefix(PREFIX)
            .tempdir_in(parent.path())
            .unwrap();
        let ws = Workspace { dir };

        let (arg, _) = ws.output_for(&OutputTarget::Template);
        let arg = arg.as_arg();
        assert!(arg.contains("tmp-%%(id)s-"));
        assert!(arg.ends_with("/%(title)s.%(ext)s"));

        let (arg, expected) = ws.output_for(&OutputTarget::Fixed {
            extension: "mp4".to_string(),
        });
        assert!(expected.unwrap().to_string_lossy().contains("tmp-%(id)s-"));
        assert!(arg.as_arg().contains("tmp-%%(id)s-"));
    }
}
