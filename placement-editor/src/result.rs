use crate::error::*;

pub type StorageResult<T> = Result<T, StorageError>;
pub type DocumentResult<T> = Result<T, DocumentError>;
pub type ClipboardResult = Result<(), ClipboardError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ConsoleResult<T> = Result<T, ConsoleError>;
pub type EditorResult<T> = Result<T, EditorError>;
