//! Output formatting for tool responses and registry listings

pub mod console;
pub mod formatter;
