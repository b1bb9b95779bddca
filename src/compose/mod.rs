pub(crate) mod background;
pub(crate) mod clip;
pub(crate) mod looping;
pub(crate) mod pipeline;
pub(crate) mod progress;
pub(crate) mod timeline;
