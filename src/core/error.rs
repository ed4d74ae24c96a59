use std::fmt;

/// Error types for sheetdash operations
#[derive(Debug)]
pub enum SheetdashError {
    /// IO error (file operations, sockets)
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// HTTP client error
    Http(reqwest::Error),

    /// Blob storage answered with a non-success status
    Storage { status: u16, code: Option<String> },

    /// Connection string or account key could not be used
    Credentials(String),

    /// Spreadsheet could not be parsed
    Spreadsheet(String),

    /// Chart could not be built from the selected columns
    Chart(String),

    /// TOML parsing error
    TomlParsing(toml::de::Error),

    /// Invalid argument error
    InvalidArgument(String),
}

impl fmt::Display for SheetdashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetdashError::Io(err) => write!(f, "IO error: {err}"),
            SheetdashError::Config(msg) => write!(f, "Configuration error: {msg}"),
            SheetdashError::Http(err) => write!(f, "HTTP error: {err}"),
            SheetdashError::Storage {
                status,
                code: Some(code),
            } => write!(f, "Storage error: {status} {code}"),
            SheetdashError::Storage { status, code: None } => {
                write!(f, "Storage error: {status}")
            }
            SheetdashError::Credentials(msg) => write!(f, "Credentials error: {msg}"),
            SheetdashError::Spreadsheet(msg) => write!(f, "Spreadsheet error: {msg}"),
            SheetdashError::Chart(msg) => write!(f, "Chart error: {msg}"),
            SheetdashError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            SheetdashError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for SheetdashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SheetdashError::Io(err) => Some(err),
            SheetdashError::Http(err) => Some(err),
            SheetdashError::TomlParsing(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SheetdashError {
    fn from(err: std::io::Error) -> Self {
        SheetdashError::Io(err)
    }
}

impl From<reqwest::Error> for SheetdashError {
    fn from(err: reqwest::Error) -> Self {
        SheetdashError::Http(err)
    }
}

impl From<toml::de::Error> for SheetdashError {
    fn from(err: toml::de::Error) -> Self {
        SheetdashError::TomlParsing(err)
    }
}

impl From<calamine::XlsxError> for SheetdashError {
    fn from(err: calamine::XlsxError) -> Self {
        SheetdashError::Spreadsheet(err.to_string())
    }
}

impl From<base64::DecodeError> for SheetdashError {
    fn from(err: base64::DecodeError) -> Self {
        SheetdashError::Credentials(format!("account key is not valid base64: {err}"))
    }
}

/// Type alias for Results using SheetdashError
pub type Result<T> = std::result::Result<T, SheetdashError>;
