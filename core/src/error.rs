use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("failed to read program image {path:?}")]
    ReadProgram {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
