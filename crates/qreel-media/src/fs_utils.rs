//! Filesystem helpers: per-render scratch space and cross-device moves.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;

use crate::error::{MediaError, MediaResult};

/// Per-render scratch directory, removed when dropped.
///
/// Every temporary asset of a render (downloaded clip, synthesized voice,
/// caption text files, in-progress encode) lives here, so dropping the guard
/// releases all of them on success, on error and during unwinding.
#[derive(Debug)]
pub struct ScratchSpace {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchSpace {
    /// Create a fresh scratch directory under `work_dir`.
    pub fn new_in(work_dir: impl AsRef<Path>, label: &str) -> MediaResult<Self> {
        let work_dir = work_dir.as_ref();
        std::fs::create_dir_all(work_dir)?;

        let dir = tempfile::Builder::new()
            .prefix(&format!("qreel-{}-", label))
            .tempdir_in(work_dir)?;
        let path = dir.path().to_path_buf();

        tracing::debug!(scratch = %path.display(), "Created scratch space");
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file inside the scratch directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for ScratchSpace {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => tracing::debug!(scratch = %self.path.display(), "Removed scratch space"),
                Err(e) => tracing::warn!(
                    scratch = %self.path.display(),
                    error = %e,
                    "Failed to remove scratch space"
                ),
            }
        }
    }
}

/// Move a file from `src` to `dst`, handling cross-device moves.
///
/// Tries a rename first and falls back to copy-then-delete on EXDEV. The copy
/// goes to a temporary sibling of `dst` and is renamed into place, so `dst`
/// never names a half-written file.
pub async fn move_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> MediaResult<()> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    if let Some(parent) = dst.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    match fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_error(&e) => {
            tracing::debug!(
                "Cross-device rename detected, falling back to copy+delete: {} -> {}",
                src.display(),
                dst.display()
            );
            copy_and_delete(src, dst).await
        }
        Err(e) => Err(MediaError::from(e)),
    }
}

/// EXDEV (cross-device link) is 18 on Linux and macOS.
fn is_cross_device_error(e: &std::io::Error) -> bool {
    e.raw_os_error() == Some(18)
}

async fn copy_and_delete(src: &Path, dst: &Path) -> MediaResult<()> {
    let tmp_dst = dst.with_extension("partial");

    if let Err(e) = fs::copy(src, &tmp_dst).await {
        let _ = fs::remove_file(&tmp_dst).await;
        tracing::error!(
            "Failed to copy file during cross-device move: {} -> {}: {}",
            src.display(),
            tmp_dst.display(),
            e
        );
        return Err(MediaError::from(e));
    }

    if let Err(e) = fs::rename(&tmp_dst, dst).await {
        let _ = fs::remove_file(&tmp_dst).await;
        tracing::error!(
            "Failed to rename temp file during cross-device move: {} -> {}: {}",
            tmp_dst.display(),
            dst.display(),
            e
        );
        return Err(MediaError::from(e));
    }

    if let Err(e) = fs::remove_file(src).await {
        tracing::warn!(
            "Failed to remove source file after cross-device move: {}: {}",
            src.display(),
            e
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_move_file_same_filesystem() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("source.mp4");
        let dst = dir.path().join("dest.mp4");

        fs::write(&src, b"test content").await.unwrap();

        move_file(&src, &dst).await.unwrap();

        assert!(!src.exists(), "Source file should be removed");
        assert_eq!(fs::read_to_string(&dst).await.unwrap(), "test content");
    }

    #[tokio::test]
    async fn test_move_file_creates_output_dir() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("source.mp4");
        let dst = dir.path().join("output").join("dest.mp4");

        fs::write(&src, b"x").await.unwrap();

        move_file(&src, &dst).await.unwrap();

        assert!(!src.exists());
        assert!(dst.exists());
    }

    #[tokio::test]
    async fn test_copy_fallback_moves_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("render.mp4");
        let out = dir.path().join("output");
        fs::create_dir(&out).await.unwrap();
        let dst = out.join("quote_video_x.mp4");
        fs::write(&src, b"encoded").await.unwrap();

        copy_and_delete(&src, &dst).await.unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dst).await.unwrap(), b"encoded");
        assert!(!out.join("quote_video_x.partial").exists());
    }

    #[tokio::test]
    async fn test_failed_copy_removes_partial_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("output");
        fs::create_dir(&out).await.unwrap();
        let dst = out.join("quote_video_x.mp4");
        // Half-written copy left by an interrupted transfer
        fs::write(out.join("quote_video_x.partial"), b"half").await.unwrap();

        let err = copy_and_delete(&dir.path().join("vanished.mp4"), &dst).await;

        assert!(matches!(err, Err(MediaError::Io(_))));
        assert!(!dst.exists());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_is_cross_device_error() {
        assert!(is_cross_device_error(&std::io::Error::from_raw_os_error(18)));
        assert!(!is_cross_device_error(&std::io::Error::from_raw_os_error(2)));
    }

    #[test]
    fn test_scratch_space_removed_on_drop() {
        let work = TempDir::new().unwrap();
        let scratch = ScratchSpace::new_in(work.path().join("work"), "abc12345").unwrap();
        let path = scratch.path().to_path_buf();
        std::fs::write(scratch.file("source.mp4"), b"data").unwrap();
        std::fs::create_dir(scratch.file("nested")).unwrap();
        assert!(path.exists());

        drop(scratch);

        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(work.path().join("work")).unwrap().count(), 0);
    }

    #[test]
    fn test_scratch_space_removed_during_unwind() {
        let work = TempDir::new().unwrap();
        let work_path = work.path().to_path_buf();

        let result = std::panic::catch_unwind(move || {
            let scratch = ScratchSpace::new_in(&work_path, "panic").unwrap();
            std::fs::write(scratch.file("voice.mp3"), b"data").unwrap();
            panic!("render blew up");
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_scratch_spaces_are_distinct() {
        let work = TempDir::new().unwrap();
        let a = ScratchSpace::new_in(work.path(), "same").unwrap();
        let b = ScratchSpace::new_in(work.path(), "same").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
