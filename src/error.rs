use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("an operation is already in progress")]
    Busy,

    #[error("no input file selected")]
    MissingInput,

    #[error("password input failed")]
    Password,
}
