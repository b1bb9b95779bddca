/// Pipeline stage a progress update refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderStage {
    /// One scene was built or skipped.
    Scene {
        /// 0-based position in the script.
        index: usize,
        /// Number of scenes in the script.
        total: usize,
        /// Scene number from the script.
        scene_number: u32,
    },
    /// Scene clips were concatenated.
    Concatenate,
    /// Background video layer was resolved.
    BackgroundVideo,
    /// Background music layer was resolved.
    BackgroundMusic,
    /// The encoder finished.
    Encode,
}

/// One progress notification.
#[derive(Clone, Debug, PartialEq)]
pub struct Progress {
    /// Completed share of the render in `[0, 1]`, never decreasing within one render.
    pub fraction: f64,
    /// Stage that just completed.
    pub stage: RenderStage,
    /// Human-readable description.
    pub message: String,
}

/// Receiver of progress updates, called synchronously between pipeline stages.
pub trait ProgressSink {
    fn report(&mut self, update: &Progress);
}

impl<F> ProgressSink for F
where
    F: FnMut(&Progress),
{
    fn report(&mut self, update: &Progress) {
        self(update)
    }
}

/// Progress sink that drops every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _update: &Progress) {}
}

/// Stage counter: `scenes + 4` steps (each scene, concatenate, background, music, encode).
pub(crate) struct ProgressTracker<'a> {
    sink: &'a mut dyn ProgressSink,
    total_steps: usize,
    done: usize,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(sink: &'a mut dyn ProgressSink, scene_count: usize) -> Self {
        Self {
            sink,
            total_steps: scene_count + 4,
            done: 0,
        }
    }

    pub(crate) fn step(&mut self, stage: RenderStage, message: impl Into<String>) {
        self.done = (self.done + 1).min(self.total_steps);
        let update = Progress {
            fraction: self.done as f64 / self.total_steps as f64,
            stage,
            message: message.into(),
        };
        tracing::debug!(fraction = update.fraction, message = %update.message, "progress");
        self.sink.report(&update);
    }
}
