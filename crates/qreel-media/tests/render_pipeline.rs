//! End-to-end renders against a real FFmpeg.

use std::path::Path;
use std::process::Command;

use qreel_media::{probe_video, RenderConfig, RenderPipeline};
use qreel_models::{FrameSize, Quote, RenderSpec, VoiceSpec};
use tempfile::TempDir;
use url::Url;

/// Write a synthetic test clip with FFmpeg's `testsrc` source.
fn make_clip(dir: &std::path::Path, size: &str, seconds: u32) -> std::path::PathBuf {
    let path = dir.join(format!("clip_{}.mp4", size));
    let status = Command::new("ffmpeg")
        .args(["-y", "-v", "error", "-f", "lavfi", "-i"])
        .arg(format!("testsrc=size={}:rate=25:duration={}", size, seconds))
        .args(["-f", "lavfi", "-i", "sine=frequency=440"])
        .args(["-shortest", "-c:v", "libx264", "-preset", "ultrafast", "-pix_fmt", "yuv420p"])
        .arg(&path)
        .status()
        .expect("failed to run ffmpeg");
    assert!(status.success());
    path
}

fn pipeline(work: &TempDir) -> RenderPipeline {
    let mut config = RenderConfig::default()
        .with_work_dir(work.path().join("work"))
        .with_output_dir(work.path().join("out"));
    config.caption_style = config
        .caption_style
        .with_font(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSans.ttf"));
    RenderPipeline::new(config, reqwest::Client::new(), None)
}

#[tokio::test]
#[ignore = "requires ffmpeg and ffprobe on PATH"]
async fn test_short_ultrawide_clip_is_looped_and_cropped() {
    let work = TempDir::new().unwrap();
    let clip = make_clip(work.path(), "1920x800", 5);
    let url = Url::from_file_path(&clip).unwrap();

    let spec = RenderSpec::new(Quote::new("Stay strong.", "Anonymous"), url.as_str());
    let video = pipeline(&work).render(&spec).await.unwrap();

    assert!(video.path.is_absolute());
    assert!(video.path.starts_with(work.path().join("out")));
    assert!(!video.has_audio);

    let info = probe_video(&video.path).await.unwrap();
    assert_eq!(info.frame_size(), FrameSize::new(1080, 1920));
    assert!((info.duration - 15.0).abs() < 0.2, "duration {}", info.duration);
    assert!((info.fps - 30.0).abs() < 0.1);

    assert_eq!(std::fs::read_dir(work.path().join("work")).unwrap().count(), 0);
}

#[tokio::test]
#[ignore = "requires ffmpeg and ffprobe on PATH"]
async fn test_long_clip_with_prerecorded_voice() {
    let work = TempDir::new().unwrap();
    let clip = make_clip(work.path(), "1280x720", 20);
    let url = Url::from_file_path(&clip).unwrap();

    let voice = work.path().join("voice.m4a");
    let status = Command::new("ffmpeg")
        .args(["-y", "-v", "error", "-f", "lavfi", "-i", "sine=frequency=220:duration=4"])
        .arg(&voice)
        .status()
        .unwrap();
    assert!(status.success());

    let spec = RenderSpec::new(Quote::new("Stay strong.", "Anonymous"), url.as_str())
        .with_duration(6.0)
        .with_voice(VoiceSpec::Prerecorded { path: voice.clone() });
    let video = pipeline(&work).render(&spec).await.unwrap();

    assert!(video.has_audio);
    assert!(voice.exists(), "caller-owned voice file must survive");

    let info = probe_video(&video.path).await.unwrap();
    assert!((info.duration - 6.0).abs() < 0.2, "duration {}", info.duration);
}

#[tokio::test]
#[ignore = "requires ffmpeg and ffprobe on PATH"]
async fn test_two_renders_get_distinct_files() {
    let work = TempDir::new().unwrap();
    let clip = make_clip(work.path(), "1080x1920", 2);
    let url = Url::from_file_path(&clip).unwrap();
    let spec = RenderSpec::new(Quote::new("Stay strong.", "Anonymous"), url.as_str())
        .with_duration(2.0);

    let pipeline = pipeline(&work);
    let a = pipeline.render(&spec).await.unwrap();
    let b = pipeline.render(&spec).await.unwrap();

    assert_ne!(a.path, b.path);
    assert!(a.path.exists() && b.path.exists());
}
