//! Shared pieces of the `syllabus-retrieve` and `syllabus-server` binaries.

pub mod server;
pub mod telemetry;
