pub(crate) mod animator;
pub(crate) mod assign;

pub use animator::{SceneAnimator, static_frame};
pub use assign::AnimationPicker;

/// Pan/zoom motion applied to a scene image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    ZoomIn,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
}

impl AnimationKind {
    /// Every kind, in a stable order.
    pub const ALL: [AnimationKind; 5] = [
        Self::ZoomIn,
        Self::SlideLeft,
        Self::SlideRight,
        Self::SlideUp,
        Self::SlideDown,
    ];

    /// Snake-case name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Self::ZoomIn => "zoom_in",
            Self::SlideLeft => "slide_left",
            Self::SlideRight => "slide_right",
            Self::SlideUp => "slide_up",
            Self::SlideDown => "slide_down",
        }
    }

    /// Parse a configuration name; unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name.trim())
    }
}

impl std::fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
