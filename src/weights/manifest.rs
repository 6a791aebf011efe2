use crate::config::Config;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Weight filetypes the fetcher knows about. Anything else still downloads,
/// but gets flagged at manifest load time.
pub const SUPPORTED_FILETYPES: [&str; 7] = [
    ".ckpt",
    ".safetensors",
    ".pt",
    ".pth",
    ".bin",
    ".onnx",
    ".torchscript",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntry {
    pub url: String,
    pub dest: String,
    #[serde(default)]
    pub non_commercial: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WeightsManifest {
    #[serde(default)]
    pub licenses_url: Option<String>,
    weights: HashMap<String, WeightEntry>,
}

impl WeightsManifest {
    pub fn load(config: &Config) -> Result<Self> {
        if !config.manifest_path.exists() {
            return Err(Error::ConfigError(format!(
                "Weights manifest not found at {}",
                config.manifest_path.display()
            )));
        }

        let content = fs::read_to_string(&config.manifest_path)?;
        let manifest: WeightsManifest = toml::from_str(&content)?;

        for id in manifest.weights.keys() {
            let file_name = id.split('/').next_back().unwrap_or(id);
            if !is_supported_filetype(file_name) && !file_name.ends_with(".tar") {
                tracing::debug!("{} has an unrecognized weight filetype", id);
            }
        }

        Ok(manifest)
    }

    pub fn lookup(&self, id: &str) -> Result<&WeightEntry> {
        self.weights
            .get(id)
            .ok_or_else(|| Error::UnknownWeight(id.to_string()))
    }

    pub fn entries(&self) -> Vec<(&str, &WeightEntry)> {
        let mut entries: Vec<(&str, &WeightEntry)> = self
            .weights
            .iter()
            .map(|(id, entry)| (id.as_str(), entry))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Entries whose destination names the given weight type, e.g.
    /// `models/loras` holds the "loras" weights.
    pub fn entries_by_type(&self, kind: &str) -> Vec<(&str, &WeightEntry)> {
        self.entries()
            .into_iter()
            .filter(|(id, entry)| weight_type(id, &entry.dest) == Some(kind))
            .collect()
    }
}

pub fn is_supported_filetype(file_name: &str) -> bool {
    SUPPORTED_FILETYPES
        .iter()
        .any(|ext| file_name.ends_with(ext))
}

/// Weight type implied by a destination: its final directory component.
/// Destinations that already name the weight file use the component in
/// front of the filename.
fn weight_type<'a>(id: &str, dest: &'a str) -> Option<&'a str> {
    let dir = match dest.strip_suffix(id) {
        Some(rest) => rest.trim_end_matches('/'),
        None => dest,
    };
    Path::new(dir).file_name().and_then(|name| name.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const MANIFEST: &str = r#"
licenses_url = "https://example.com/weights-licenses"

[weights."v1-5-pruned.ckpt"]
url = "https://host/v1-5-pruned.ckpt"
dest = "models/checkpoints"

[weights."lora/styleA.safetensors"]
url = "https://host/a.safetensors"
dest = "models/loras"
non_commercial = true

[weights."final.safetensors"]
url = "https://host/final.safetensors"
dest = "/weights/final.safetensors"
"#;

    fn manifest() -> WeightsManifest {
        toml::from_str(MANIFEST).unwrap()
    }

    #[test]
    fn lookup_returns_the_registered_entry() {
        let manifest = manifest();
        let entry = manifest.lookup("v1-5-pruned.ckpt").unwrap();
        assert_eq!(entry.url, "https://host/v1-5-pruned.ckpt");
        assert_eq!(entry.dest, "models/checkpoints");
        assert!(!entry.non_commercial);
    }

    #[test]
    fn lookup_of_an_unknown_id_fails() {
        let manifest = manifest();
        let err = manifest.lookup("nope.safetensors").unwrap_err();
        assert!(matches!(err, Error::UnknownWeight(id) if id == "nope.safetensors"));
    }

    #[test]
    fn non_commercial_flag_is_parsed_and_defaults_to_false() {
        let manifest = manifest();
        assert!(manifest.lookup("lora/styleA.safetensors").unwrap().non_commercial);
        assert!(!manifest.lookup("final.safetensors").unwrap().non_commercial);
    }

    #[test]
    fn licenses_url_is_optional() {
        let manifest = manifest();
        assert_eq!(
            manifest.licenses_url.as_deref(),
            Some("https://example.com/weights-licenses")
        );

        let bare: WeightsManifest =
            toml::from_str("[weights.\"a.pt\"]\nurl = \"https://host/a.pt\"\ndest = \"models\"")
                .unwrap();
        assert!(bare.licenses_url.is_none());
    }

    #[test]
    fn entries_are_sorted_by_id() {
        let manifest = manifest();
        let ids: Vec<&str> = manifest.entries().iter().map(|(id, _)| *id).collect();
        assert_eq!(
            ids,
            vec!["final.safetensors", "lora/styleA.safetensors", "v1-5-pruned.ckpt"]
        );
    }

    #[test]
    fn entries_by_type_groups_on_the_destination_directory() {
        let manifest = manifest();

        let loras: Vec<&str> = manifest
            .entries_by_type("loras")
            .iter()
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(loras, vec!["lora/styleA.safetensors"]);

        // File-style destination: the directory in front of the filename.
        let weights: Vec<&str> = manifest
            .entries_by_type("weights")
            .iter()
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(weights, vec!["final.safetensors"]);

        assert!(manifest.entries_by_type("vae").is_empty());
    }

    #[test]
    fn load_fails_when_the_manifest_file_is_missing() {
        let config = Config {
            manifest_path: PathBuf::from("/nonexistent/weights.toml"),
            downloader: Default::default(),
        };
        let err = WeightsManifest::load(&config).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn recognized_filetypes_cover_the_common_weight_formats() {
        assert!(is_supported_filetype("model.safetensors"));
        assert!(is_supported_filetype("model.ckpt"));
        assert!(is_supported_filetype("model.onnx"));
        assert!(!is_supported_filetype("bundle.tar"));
        assert!(!is_supported_filetype("readme.md"));
    }
}
