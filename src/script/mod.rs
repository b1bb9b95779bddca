pub(crate) mod assets;
pub(crate) mod model;
pub(crate) mod naming;
