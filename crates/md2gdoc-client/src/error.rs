use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    Auth = 1,
    Service = 2,
    InvalidArguments = 3,
    Io = 4,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("document service error: {0}")]
    Service(String),

    #[error("i/o error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl ClientError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Auth(_) => ExitCode::Auth,
            Self::Service(_) => ExitCode::Service,
            Self::Io { .. } => ExitCode::Io,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
