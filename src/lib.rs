//! age-gui library API
//!
//! A thin front-end over the external `age` binary: a process runner that
//! streams the binary's progress, the file-open dialog adapter, and the form
//! controller both the terminal and the desktop front-ends drive.

pub mod binary;
pub mod config;
pub mod error;
pub mod form;
pub mod labels;
pub mod picker;
pub mod process;
pub mod ui_server;

// Re-export commonly used types for convenience
pub use binary::AgeBinary;
pub use config::Config;
pub use error::Error;
pub use form::{Backend, FormController, FormView, Mode, RunSummary};
pub use labels::{Labels, Lang};
pub use picker::Picked;
pub use process::{Capture, LineSource, LineStream};
