//! Output formatting for decisions and task outcomes

pub mod console;
pub mod formatter;
