use crate::error::Error;
use crate::form::Backend;
use crate::picker::{self, Picked};
use crate::process::{self, LineStream};

/// Name the external binary is looked up by when nothing else is configured.
pub const DEFAULT_BINARY: &str = "age";

/// The external encryption binary, resolved through the search path.
#[derive(Debug, Clone)]
pub struct AgeBinary {
    program: String,
}

impl AgeBinary {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for AgeBinary {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

impl Backend for AgeBinary {
    type Lines = LineStream;

    async fn pick_file(&self) -> Result<Picked, Error> {
        picker::pick_file(&self.program).await
    }

    async fn run_streaming(&self, args: &[String]) -> Result<LineStream, Error> {
        process::run_streaming(&self.program, args)
    }
}
