//! Define a general purpose MTDomeGuiError struct.

use std::{
    error::Error,
    fmt::{self, Debug},
    result,
};

pub type MTDomeGuiResult<T> = result::Result<T, MTDomeGuiError>;

type BoxedSource = Box<dyn Error + Send + Sync + 'static>;

/// Broad category of an error, used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The collaborator failed to connect to the dome controller.
    ConnectionFailed,
    /// An operation needs an established connection.
    NotConnected,
    /// A status request to a lower level component failed.
    StatusRequestFailed,
    /// A payload did not have the expected shape.
    InvalidInput,
    /// The configuration could not be loaded.
    Configuration,
    Internal,
}

#[derive(Debug)]
pub struct MTDomeGuiError {
    kind: ErrorKind,
    err_msg: String,
    source: Option<BoxedSource>,
}

impl Error for MTDomeGuiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn Error + 'static))
    }
}

impl fmt::Display for MTDomeGuiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind;
        let err_msg = &self.err_msg;
        write!(f, "MTDomeGuiError::{kind:?}::{err_msg}")
    }
}

impl MTDomeGuiError {
    pub fn new(kind: ErrorKind, err_msg: &str) -> MTDomeGuiError {
        MTDomeGuiError {
            kind,
            err_msg: String::from(err_msg),
            source: None,
        }
    }

    /// Wrap another error, keeping it as the source.
    pub fn from_error(
        kind: ErrorKind,
        err_msg: &str,
        error: impl Error + Send + Sync + 'static,
    ) -> MTDomeGuiError {
        MTDomeGuiError {
            kind,
            err_msg: String::from(err_msg),
            source: Some(Box::new(error)),
        }
    }

    pub fn invalid_input(err_msg: &str) -> MTDomeGuiError {
        MTDomeGuiError::new(ErrorKind::InvalidInput, err_msg)
    }

    pub fn get_kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn get_error_message(&self) -> &str {
        &self.err_msg
    }
}

impl From<std::io::Error> for MTDomeGuiError {
    fn from(item: std::io::Error) -> MTDomeGuiError {
        MTDomeGuiError::from_error(ErrorKind::Internal, &item.to_string(), item)
    }
}

impl From<serde_json::Error> for MTDomeGuiError {
    fn from(item: serde_json::Error) -> MTDomeGuiError {
        MTDomeGuiError::from_error(ErrorKind::InvalidInput, &item.to_string(), item)
    }
}

impl From<serde_yaml::Error> for MTDomeGuiError {
    fn from(item: serde_yaml::Error) -> MTDomeGuiError {
        MTDomeGuiError::from_error(ErrorKind::Configuration, &item.to_string(), item)
    }
}
