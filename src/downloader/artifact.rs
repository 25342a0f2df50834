// Artifact locator - finds the one deliverable file in a workspace

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::errors::{GrabError, Result};
use super::models::{ArtifactPolicy, MediaKind};
use super::utils::sanitize_filename;

/// yt-dlp leftovers that never count as output
const PARTIAL_SUFFIXES: [&str; 4] = ["part", "ytdl", "temp", "tmp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedArtifact {
    pub path: PathBuf,
    pub extension: String,
    pub mime_type: String,
}

impl LocatedArtifact {
    /// `{title}.{ext}` with the title made filesystem-safe
    pub fn suggested_filename(&self, title: &str) -> String {
        let stem = sanitize_filename(title);
        if self.extension.is_empty() {
            stem
        } else {
            format!("{}.{}", stem, self.extension)
        }
    }
}

/// Resolve the deliverable: the expected path when known, otherwise a scan
pub fn locate(
    workspace: &Path,
    expected: Option<&Path>,
    kind: MediaKind,
    policy: ArtifactPolicy,
) -> Result<LocatedArtifact> {
    let path = match expected {
        Some(path) => {
            if !path.is_file() {
                tracing::warn!("expected output {} was not written", path.display());
                return Err(GrabError::ArtifactMissing {
                    dir: workspace.to_path_buf(),
                });
            }
            path.to_path_buf()
        }
        None => scan(workspace, policy)?,
    };

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let mime_type = mime_type(&extension, kind);

    Ok(LocatedArtifact {
        path,
        extension,
        mime_type,
    })
}

fn scan(workspace: &Path, policy: ArtifactPolicy) -> Result<PathBuf> {
    let mut files: Vec<(PathBuf, SystemTime)> = Vec::new();

    for entry in fs::read_dir(workspace)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        let path = entry.path();
        if is_partial(&path) {
            continue;
        }
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        files.push((path, modified));
    }

    // read_dir order is filesystem-dependent
    files.sort_by(|a, b| a.0.cmp(&b.0));

    match files.len() {
        0 => Err(GrabError::ArtifactMissing {
            dir: workspace.to_path_buf(),
        }),
        1 => Ok(files.remove(0).0),
        _ => match policy {
            ArtifactPolicy::RequireSingle => Err(GrabError::AmbiguousArtifact {
                dir: workspace.to_path_buf(),
                files: files.iter().map(|(p, _)| file_name(p)).collect(),
            }),
            ArtifactPolicy::NewestModified => {
                // newest wins; on equal mtimes the sort above keeps the lowest name first
                let mut best = 0;
                for (i, (_, modified)) in files.iter().enumerate().skip(1) {
                    if *modified > files[best].1 {
                        best = i;
                    }
                }
                Ok(files.swap_remove(best).0)
            }
        },
    }
}

fn is_partial(path: &Path) -> bool {
    path.extension()
        .map(|e| {
            let ext = e.to_string_lossy().to_lowercase();
            PARTIAL_SUFFIXES.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// MIME type for an output extension
///
/// mp3 and mp4 are fixed; anything else follows the kind of output.
pub fn mime_type(extension: &str, kind: MediaKind) -> String {
    match extension {
        "mp3" => "audio/mpeg".to_string(),
        "mp4" => "video/mp4".to_string(),
        "" => "application/octet-stream".to_string(),
        ext => match kind {
            MediaKind::Video => format!("video/{}", ext),
            MediaKind::Audio => format!("audio/{}", ext),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_single_file_is_found() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Some Title.mp4");
        fs::write(&file, b"x").unwrap();

        let found = locate(dir.path(), None, MediaKind::Video, ArtifactPolicy::RequireSingle)
            .unwrap();
        assert_eq!(found.path, file);
        assert_eq!(found.extension, "mp4");
        assert_eq!(found.mime_type, "video/mp4");
        assert_eq!(found.suggested_filename("Some Title"), "Some Title.mp4");
    }

    #[test]
    fn test_mp3_is_audio_mpeg() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("song.mp3"), b"x").unwrap();
        let found =
            locate(dir.path(), None, MediaKind::Audio, ArtifactPolicy::RequireSingle).unwrap();
        assert_eq!(found.mime_type, "audio/mpeg");
    }

    #[test]
    fn test_empty_workspace_is_missing() {
        let dir = tempdir().unwrap();
        let err = locate(dir.path(), None, MediaKind::Video, ArtifactPolicy::RequireSingle)
            .unwrap_err();
        assert!(matches!(err, GrabError::ArtifactMissing { .. }));
    }

    #[test]
    fn test_expected_path_must_exist() {
        let dir = tempdir().unwrap();
        let expected = dir.path().join("output.mp4");
        let err = locate(
            dir.path(),
            Some(&expected),
            MediaKind::Video,
            ArtifactPolicy::RequireSingle,
        )
        .unwrap_err();
        assert!(matches!(err, GrabError::ArtifactMissing { .. }));

        fs::write(&expected, b"x").unwrap();
        // a stray file next to the known path does not matter
        fs::write(dir.path().join("other.webm"), b"x").unwrap();
        let found = locate(
            dir.path(),
            Some(&expected),
            MediaKind::Video,
            ArtifactPolicy::RequireSingle,
        )
        .unwrap();
        assert_eq!(found.path, expected);
    }

    #[test]
    fn test_partials_and_dirs_are_ignored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("clip.f137.mp4.part"), b"x").unwrap();
        fs::write(dir.path().join("clip.ytdl"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("clip.webm"), b"x").unwrap();

        let found =
            locate(dir.path(), None, MediaKind::Video, ArtifactPolicy::RequireSingle).unwrap();
        assert_eq!(file_name(&found.path), "clip.webm");
        assert_eq!(found.mime_type, "video/webm");
    }

    #[test]
    fn test_two_files_are_ambiguous() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.mp4"), b"x").unwrap();
        fs::write(dir.path().join("a.webm"), b"x").unwrap();

        match locate(dir.path(), None, MediaKind::Video, ArtifactPolicy::RequireSingle) {
            Err(GrabError::AmbiguousArtifact { files, .. }) => {
                assert_eq!(files, vec!["a.webm".to_string(), "b.mp4".to_string()]);
            }
            other => panic!("expected AmbiguousArtifact, got {:?}", other),
        }
    }

    #[test]
    fn test_newest_modified_policy() {
        let dir = tempdir().unwrap();
        let old = dir.path().join("a.mp4");
        let new = dir.path().join("b.mp4");
        fs::write(&old, b"x").unwrap();
        fs::write(&new, b"x").unwrap();

        let past = SystemTime::now() - Duration::from_secs(3600);
        fs::File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(past)
            .unwrap();

        let found =
            locate(dir.path(), None, MediaKind::Video, ArtifactPolicy::NewestModified).unwrap();
        assert_eq!(found.path, new);
    }

    #[test]
    fn test_mime_table() {
        assert_eq!(mime_type("mp4", MediaKind::Video), "video/mp4");
        assert_eq!(mime_type("mp3", MediaKind::Audio), "audio/mpeg");
        assert_eq!(mime_type("m4a", MediaKind::Audio), "audio/m4a");
        assert_eq!(mime_type("webm", MediaKind::Audio), "audio/webm");
        assert_eq!(mime_type("mkv", MediaKind::Video), "video/mkv");
    }
}
