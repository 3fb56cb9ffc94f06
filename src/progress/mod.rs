//! Progress reporting for pipeline runs

mod handler;
mod logging;

pub use handler::{notify, NoOpHandler, ProgressEvent, ProgressFn, ProgressHandler};
pub use logging::LoggingHandler;
