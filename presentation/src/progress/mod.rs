//! Progress reporting for panel evaluations and agent tasks

pub mod reporter;
