use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
	UnknownWeight(String),
	DownloadFailed(String),
	OutputMissing(PathBuf),
	ExtractionFailed(String),
	ConfigError(String),
	IoError(std::io::Error),
	SerializationError(String),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::UnknownWeight(id) => write!(
				f,
				"Weight not available: {}. Run 'weightly list' to see known weights",
				id
			),
			Error::DownloadFailed(msg) => write!(f, "Download failed: {}", msg),
			Error::OutputMissing(path) => write!(
				f,
				"Download finished but file not found: {}",
				path.display()
			),
			Error::ExtractionFailed(msg) => write!(f, "Extraction failed: {}", msg),
			Error::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
			Error::IoError(e) => write!(f, "IO error: {}", e),
			Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
		}
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Error::IoError(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::SerializationError(err.to_string())
	}
}

impl From<toml::de::Error> for Error {
	fn from(err: toml::de::Error) -> Self {
		Error::SerializationError(err.to_string())
	}
}

pub type Result<T> = std::result::Result<T, Error>;
