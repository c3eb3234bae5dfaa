/*
 * Error type shared by every layer of the crate. Native failures, profile (INI)
 * failures and title lookup misses all surface as a `PlatformError` so callers
 * can use `?` uniformly. Lookup misses are deliberately distinct variants so a
 * host that prefers the permissive behavior can simply ignore them.
 */
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum PlatformError {
    InitializationFailed(String),
    OperationFailed(String),
    InvalidHandle(String),
    ControlNotFound(String),
    ProfileNotFound(PathBuf),
    InvalidProfileExtension(PathBuf),
    Io(std::io::Error),
    #[cfg(target_os = "windows")]
    Win32(windows::core::Error),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::InitializationFailed(msg) => write!(f, "initialization failed: {msg}"),
            PlatformError::OperationFailed(msg) => write!(f, "operation failed: {msg}"),
            PlatformError::InvalidHandle(msg) => write!(f, "invalid handle: {msg}"),
            PlatformError::ControlNotFound(title) => {
                write!(f, "no control titled '{title}' in this dialog")
            }
            PlatformError::ProfileNotFound(path) => {
                write!(f, "profile file not found: {}", path.display())
            }
            PlatformError::InvalidProfileExtension(path) => {
                write!(f, "profile file must have an .ini extension: {}", path.display())
            }
            PlatformError::Io(err) => write!(f, "I/O error: {err}"),
            #[cfg(target_os = "windows")]
            PlatformError::Win32(err) => write!(f, "Win32 error: {err}"),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlatformError::Io(err) => Some(err),
            #[cfg(target_os = "windows")]
            PlatformError::Win32(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PlatformError {
    fn from(err: std::io::Error) -> Self {
        PlatformError::Io(err)
    }
}

#[cfg(target_os = "windows")]
impl From<windows::core::Error> for PlatformError {
    fn from(err: windows::core::Error) -> Self {
        PlatformError::Win32(err)
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_not_found_names_the_title() {
        let err = PlatformError::ControlNotFound("Alpha".to_string());
        assert!(err.to_string().contains("'Alpha'"));
    }

    #[test]
    fn io_errors_convert_and_keep_their_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked");
        let err: PlatformError = io.into();
        assert!(matches!(err, PlatformError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
