//! Pipeline progress display

pub mod reporter;
