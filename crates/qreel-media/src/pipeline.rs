//! End-to-end render of one quote video.
//!
//! A render runs these steps in order:
//!
//! ```text
//! ACQUIRE -> PROBE -> DECODE -> GEOMETRY_FIX -> DURATION_FIX -> COMPOSITE -> ENCODE -> CLEANUP
//!    \-- VOICE_SYNTH (concurrent with ACQUIRE, optional)
//! ```
//!
//! Every temporary asset lives in one [`ScratchSpace`], which is removed when
//! the render returns, fails or unwinds. The encode writes inside the scratch
//! space and is moved into the output directory only once FFmpeg succeeded,
//! so a failed render never leaves a partial file behind.

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, Instrument};

use qreel_models::{RenderId, RenderSpec, RenderedVideo, VoiceSpec};

use crate::caption;
use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::config::RenderConfig;
use crate::download::download_source;
use crate::duration::try_fit;
use crate::error::{MediaError, MediaResult};
use crate::filters::build_render_filter;
use crate::font::TextMeasurer;
use crate::fs_utils::{move_file, ScratchSpace};
use crate::geometry::normalize;
use crate::logging::RenderLogger;
use crate::metrics;
use crate::probe::probe_video;
use crate::speech::SpeechSynthesizer;

/// Steps of a render, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderStep {
    Acquire,
    Probe,
    Decode,
    GeometryFix,
    DurationFix,
    VoiceSynth,
    Composite,
    Encode,
    Cleanup,
}

impl RenderStep {
    pub const ALL: [RenderStep; 9] = [
        RenderStep::Acquire,
        RenderStep::Probe,
        RenderStep::Decode,
        RenderStep::GeometryFix,
        RenderStep::DurationFix,
        RenderStep::VoiceSynth,
        RenderStep::Composite,
        RenderStep::Encode,
        RenderStep::Cleanup,
    ];

    /// Whether a failure of this step fails the render.
    pub fn is_required(&self) -> bool {
        !matches!(self, RenderStep::VoiceSynth)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStep::Acquire => "acquire",
            RenderStep::Probe => "probe",
            RenderStep::Decode => "decode",
            RenderStep::GeometryFix => "geometry_fix",
            RenderStep::DurationFix => "duration_fix",
            RenderStep::VoiceSynth => "voice_synth",
            RenderStep::Composite => "composite",
            RenderStep::Encode => "encode",
            RenderStep::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for RenderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a finished video: timestamp to the millisecond plus the render ID prefix.
pub fn output_file_name(now: DateTime<Utc>, render_id: &RenderId) -> String {
    format!(
        "quote_video_{}_{}.mp4",
        now.format("%Y%m%dT%H%M%S%3f"),
        render_id.short()
    )
}

/// Turns a [`RenderSpec`] into an MP4 in the output directory.
pub struct RenderPipeline {
    config: RenderConfig,
    http: reqwest::Client,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    runner: FfmpegRunner,
}

impl RenderPipeline {
    pub fn new(
        config: RenderConfig,
        http: reqwest::Client,
        synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    ) -> Self {
        let runner = FfmpegRunner::new().with_timeout(config.ffmpeg_timeout.as_secs().max(1));
        Self {
            config,
            http,
            synthesizer,
            runner,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render one video.
    pub async fn render(&self, spec: &RenderSpec) -> MediaResult<RenderedVideo> {
        validate_spec(spec)?;

        let render_id = RenderId::new();
        let logger = RenderLogger::new(&render_id, "render");
        let span = logger.create_span();
        let start = Instant::now();

        logger.log_start(&format!(
            "{:.1}s {} video from {}",
            spec.target_duration_seconds, spec.target_size, spec.source_url
        ));

        let result = self
            .run_steps(&render_id, spec, &logger)
            .instrument(span)
            .await;

        let elapsed = start.elapsed().as_secs_f64();
        match &result {
            Ok(video) => {
                metrics::record_render("success", elapsed);
                logger.log_completion(&format!("{} in {:.1}s", video.path.display(), elapsed));
            }
            Err(e) => {
                metrics::record_render(e.kind(), elapsed);
                logger.log_error(&e.to_string());
            }
        }

        result
    }

    /// Render one video, reporting failure as `None`.
    pub async fn render_or_none(&self, spec: &RenderSpec) -> Option<PathBuf> {
        self.render(spec).await.ok().map(|video| video.path)
    }

    async fn run_steps(
        &self,
        render_id: &RenderId,
        spec: &RenderSpec,
        logger: &RenderLogger,
    ) -> MediaResult<RenderedVideo> {
        let scratch = ScratchSpace::new_in(&self.config.work_dir, render_id.short())?;
        let source_path = scratch.file("source.mp4");
        let voice_path = scratch.file("voice.mp3");

        // ACQUIRE with VOICE_SYNTH alongside
        log_step(RenderStep::Acquire);
        let (acquired, voice) = tokio::join!(
            download_source(
                &self.http,
                &spec.source_url,
                &source_path,
                self.config.download_timeout,
            ),
            self.prepare_voice(spec, &voice_path, logger),
        );
        acquired?;

        log_step(RenderStep::Probe);
        let info = probe_video(&source_path).await?;
        logger.log_progress(&format!(
            "source {}x{} {:.2}s @ {:.2} fps",
            info.width, info.height, info.duration, info.fps
        ));

        log_step(RenderStep::GeometryFix);
        let transform = normalize(info.frame_size(), spec.target_size, self.config.fit_policy);

        log_step(RenderStep::DurationFix);
        let plan = try_fit(info.duration, spec.target_duration_seconds)?;
        debug!(
            action = %plan.action,
            repetitions = plan.repetitions,
            trim_to = plan.trim_to,
            "Duration plan"
        );

        log_step(RenderStep::Composite);
        let measurer = TextMeasurer::load(&self.config.caption_style).await?;
        let overlay = caption::render(
            &spec.quote.text,
            &spec.quote.author,
            spec.target_duration_seconds,
            spec.target_size,
            &self.config.caption_style,
            &measurer,
        );
        let caption_files = overlay.materialize(scratch.path()).await?;
        let caption_chain = overlay.drawtext_chain(&caption_files);
        let filter = build_render_filter(
            &transform,
            self.config.encoding.fps,
            Some(&caption_chain),
        );

        // DECODE: the clip contributes video only
        log_step(RenderStep::Decode);
        let partial = scratch.file("render.mp4");
        let mut cmd = FfmpegCommand::new(&source_path, &partial)
            .stream_loop(plan.stream_loop_count())
            .input_arg("-an");
        cmd = match &voice {
            Some(voice_path) => cmd
                .add_input(voice_path)
                .map("0:v:0")
                .map("1:a:0")
                .output_args(self.config.encoding.audio_args()),
            None => cmd.map("0:v:0").no_audio(),
        };
        let cmd = cmd
            .video_filter(filter)
            .output_args(self.config.encoding.video_args())
            .duration(plan.trim_to);

        log_step(RenderStep::Encode);

        let total = plan.trim_to;
        let id = render_id.to_string();
        self.runner
            .run_with_progress(&cmd, move |progress| {
                debug!(
                    render_id = %id,
                    percent = progress.percentage(total).round() as u32,
                    speed = progress.speed,
                    "Encoding"
                );
            })
            .await?;

        let encoded = tokio::fs::metadata(&partial).await.map(|m| m.len()).unwrap_or(0);
        if encoded == 0 {
            return Err(MediaError::encoding_failed("FFmpeg produced no output"));
        }

        let created_at = Utc::now();
        let file_name = output_file_name(created_at, render_id);
        let output_dir = std::path::absolute(&self.config.output_dir)?;
        let output_path = output_dir.join(&file_name);
        move_file(&partial, &output_path).await?;

        log_step(RenderStep::Cleanup);
        drop(scratch);

        Ok(RenderedVideo {
            path: output_path,
            file_name,
            duration_seconds: plan.planned_duration(),
            size: spec.target_size,
            has_audio: voice.is_some(),
            created_at,
        })
    }

    /// VOICE_SYNTH. Returns the audio to attach, if any.
    async fn prepare_voice(
        &self,
        spec: &RenderSpec,
        voice_path: &Path,
        logger: &RenderLogger,
    ) -> Option<PathBuf> {
        match spec.voice.as_ref()? {
            VoiceSpec::Prerecorded { path } => {
                if path.is_file() {
                    Some(path.clone())
                } else {
                    logger.log_warning(&format!(
                        "voice file {} missing, rendering without audio",
                        path.display()
                    ));
                    None
                }
            }
            VoiceSpec::Synthesize { voice_id } => {
                log_step(RenderStep::VoiceSynth);
                let Some(synthesizer) = self.synthesizer.as_ref() else {
                    logger.log_warning("no speech synthesizer configured, rendering without audio");
                    return None;
                };
                match synthesizer
                    .synthesize(&spec.quote.text, voice_id, voice_path)
                    .await
                {
                    Ok(()) => Some(voice_path.to_path_buf()),
                    Err(e) => {
                        logger.log_warning(&format!(
                            "speech synthesis failed, rendering without audio: {}",
                            e
                        ));
                        None
                    }
                }
            }
        }
    }
}

fn log_step(step: RenderStep) {
    debug!(step = %step, required = step.is_required(), "Render step");
}

fn validate_spec(spec: &RenderSpec) -> MediaResult<()> {
    if spec.quote.text.trim().is_empty() {
        return Err(MediaError::invalid_input("quote text is empty"));
    }
    if !spec.target_duration_seconds.is_finite() || spec.target_duration_seconds <= 0.0 {
        return Err(MediaError::invalid_input(format!(
            "target duration must be positive, got {}",
            spec.target_duration_seconds
        )));
    }
    let size = spec.target_size;
    if !size.is_valid() || size.width % 2 != 0 || size.height % 2 != 0 {
        return Err(MediaError::invalid_input(format!(
            "target size must be positive and even, got {}",
            size
        )));
    }
    Ok(())
}
