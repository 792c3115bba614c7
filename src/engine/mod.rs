//! The windowing core: catalog, placement, visibility window, spawner and
//! motion, tied together by `session::Session`.

pub mod catalog;
pub mod motion;
pub mod placement;
pub mod session;
pub mod spawner;
pub mod window;
