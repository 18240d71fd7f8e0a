/// UI module exports
pub mod carousel;
pub mod components;
pub mod host;
pub mod suggest;
