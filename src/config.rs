use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Parameters for the external download tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloaderSettings {
	pub program: String,
	pub concurrency: u32,
	pub chunk_size: String,
	pub log_level: String,
}

impl Default for DownloaderSettings {
	fn default() -> Self {
		Self {
			program: "pget".to_string(),
			concurrency: 10,
			chunk_size: "50M".to_string(),
			log_level: "warn".to_string(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
	pub manifest_path: PathBuf,
	#[serde(default)]
	pub downloader: DownloaderSettings,
}

impl Config {
	pub fn new() -> crate::error::Result<Self> {
		let project_dirs = ProjectDirs::from("", "", "weightly")
			.ok_or_else(|| crate::error::Error::ConfigError("Could not determine config directory".to_string()))?;

		let config_dir = project_dirs.config_dir().to_path_buf();
		let config_path = config_dir.join("config.toml");

		if config_path.exists() {
			let content = std::fs::read_to_string(&config_path)?;
			let config: Config = toml::from_str(&content)?;
			return Ok(config);
		}

		Ok(Self {
			manifest_path: config_dir.join("weights.toml"),
			downloader: DownloaderSettings::default(),
		})
	}

	pub fn from_env() -> crate::error::Result<Self> {
		let mut config = Self::new()?;

		if let Ok(manifest_path) = std::env::var("WEIGHTLY_MANIFEST") {
			config.manifest_path = PathBuf::from(manifest_path);
		}

		Ok(config)
	}
}
