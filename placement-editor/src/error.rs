use shared::{ObjectKey, UnknownObjectKey};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("could not create the storage directory {0}")]
    CreateDirectory(PathBuf, #[source] std::io::Error),
    #[error("reading storage key {key} failed")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("writing storage key {key} failed")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("\"{0}\" is not a usable storage key")]
    InvalidKey(String),
    #[error("watching the storage directory failed")]
    Watch(#[from] notify::Error),
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("reading {0} failed: {1}")]
    ReadFile(PathBuf, #[source] std::io::Error),
    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("no clipboard command is configured or known for this platform")]
    NoCommand,
    #[error("could not start \"{0}\": {1}")]
    Spawn(String, #[source] std::io::Error),
    #[error("piping text to the clipboard command failed: {0}")]
    Pipe(#[source] std::io::Error),
    #[error("clipboard command exited with {0}")]
    Exit(std::process::ExitStatus),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading {0} failed")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("{0} is not valid settings JSON")]
    Parse(PathBuf, #[source] serde_json::Error),
    #[error("writing default settings to {0} failed")]
    WriteDefault(PathBuf, #[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("unknown command \"{0}\", try \"help\"")]
    UnknownCommand(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("{0}")]
    UnknownObject(#[from] UnknownObjectKey),
    #[error("{key} has no field \"{field}\"")]
    UnknownField { key: ObjectKey, field: String },
    #[error("\"{0}\" is not a number")]
    InvalidNumber(String),
    #[error("\"{0}\" is not true/false")]
    InvalidBool(String),
    #[error("\"{0}\" is not an axis (x, y, z or 0-2)")]
    InvalidAxis(String),
    #[error("{field} takes {expected} value(s), got {got}")]
    WrongArity {
        field: String,
        expected: usize,
        got: usize,
    },
    #[error("invalid patch: {0}")]
    Patch(#[from] serde_json::Error),
}

/// Failures of a user-triggered action. None of them are fatal; the in-memory
/// state is left as it was before the action.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("config document unavailable: {0}")]
    DocumentUnavailable(#[from] DocumentError),
    #[error("writing the export back to {0} failed: {1}")]
    WriteBackFailed(PathBuf, #[source] std::io::Error),
    #[error("config document has no \"{0}\" section")]
    KeyNotFound(ObjectKey),
    #[error("clipboard write failed: {0}")]
    ClipboardWriteFailed(#[from] ClipboardError),
    #[error("{0}")]
    Console(#[from] ConsoleError),
}
