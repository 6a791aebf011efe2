use crate::config::Config;
use crate::error::{Error, Result};
use crate::weights::manifest::WeightsManifest;
use crate::weights::process::{ProcessRunner, SystemRunner};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// What to do with a file after it has been downloaded, decided once from
/// its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Tar,
    Plain,
}

impl ArchiveKind {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("tar") => ArchiveKind::Tar,
            _ => ArchiveKind::Plain,
        }
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    /// The weight was already present locally; nothing was done.
    Skipped { path: PathBuf },
    Fetched(FetchReport),
}

#[derive(Debug)]
pub struct FetchReport {
    pub path: PathBuf,
    pub bytes: Option<u64>,
    pub elapsed: Duration,
    pub extracted: bool,
}

pub struct WeightsFetcher<R = SystemRunner> {
    config: Config,
    manifest: WeightsManifest,
    runner: R,
}

impl WeightsFetcher<SystemRunner> {
    pub fn new(config: Config) -> Result<Self> {
        let manifest = WeightsManifest::load(&config)?;
        Ok(Self::with_runner(config, manifest, SystemRunner))
    }
}

impl<R: ProcessRunner> WeightsFetcher<R> {
    pub fn with_runner(config: Config, manifest: WeightsManifest, runner: R) -> Self {
        Self {
            config,
            manifest,
            runner,
        }
    }

    /// Materialize a weight locally, skipping all work when it is already
    /// present. Repeated fetches of a downloaded weight are cheap no-ops.
    pub fn fetch(&self, id: &str) -> Result<FetchOutcome> {
        let entry = self.manifest.lookup(id)?;

        if entry.non_commercial {
            match self.manifest.licenses_url.as_deref() {
                Some(url) => tracing::warn!(
                    "{} is for non-commercial use only, unless you have obtained a commercial license. Details: {}",
                    id,
                    url
                ),
                None => tracing::warn!(
                    "{} is for non-commercial use only, unless you have obtained a commercial license",
                    id
                ),
            }
        }

        let target = resolve_target(id, &entry.dest);
        if target.exists() {
            tracing::debug!("{} already present at {}, skipping", id, target.display());
            return Ok(FetchOutcome::Skipped { path: target });
        }

        let download_dir = resolve_download_dir(id, &entry.dest);
        fs::create_dir_all(&download_dir)?;

        tracing::info!("Downloading {} to {}", id, download_dir.display());
        let start = Instant::now();

        self.download(&entry.url, &target)?;

        if !target.exists() {
            return Err(Error::OutputMissing(target));
        }

        let extracted = match ArchiveKind::from_path(&target) {
            ArchiveKind::Tar => {
                tracing::info!("Extracting {}", target.display());
                self.extract(&target, &download_dir)?;
                true
            }
            ArchiveKind::Plain => false,
        };

        let elapsed = start.elapsed();
        let bytes = fs::metadata(&target).ok().map(|meta| meta.len());
        match bytes {
            Some(bytes) => tracing::info!(
                "Downloaded {} in {:.2}s, size: {:.2}MB",
                id,
                elapsed.as_secs_f64(),
                bytes as f64 / (1024.0 * 1024.0)
            ),
            None => tracing::info!("Downloaded {} in {:.2}s", id, elapsed.as_secs_f64()),
        }

        Ok(FetchOutcome::Fetched(FetchReport {
            path: target,
            bytes,
            elapsed,
            extracted,
        }))
    }

    fn download(&self, url: &str, output: &Path) -> Result<()> {
        let settings = &self.config.downloader;
        let args: Vec<OsString> = vec![
            OsString::from("--log-level"),
            OsString::from(&settings.log_level),
            OsString::from("-c"),
            OsString::from(settings.concurrency.to_string()),
            OsString::from("-m"),
            OsString::from(&settings.chunk_size),
            OsString::from(url),
            output.as_os_str().to_os_string(),
        ];

        let code = self
            .runner
            .run(&settings.program, &args)
            .map_err(|e| Error::DownloadFailed(format!("could not launch {}: {}", settings.program, e)))?;

        if code != 0 {
            return Err(Error::DownloadFailed(format!(
                "{} exited with status {} for {}",
                settings.program, code, url
            )));
        }

        Ok(())
    }

    fn extract(&self, archive: &Path, dest_dir: &Path) -> Result<()> {
        let args: Vec<OsString> = vec![
            OsString::from("-xf"),
            archive.as_os_str().to_os_string(),
            OsString::from("-C"),
            dest_dir.as_os_str().to_os_string(),
        ];

        let code = self
            .runner
            .run("tar", &args)
            .map_err(|e| Error::ExtractionFailed(format!("could not launch tar: {}", e)))?;

        if code != 0 {
            return Err(Error::ExtractionFailed(format!(
                "tar exited with status {} for {}",
                code,
                archive.display()
            )));
        }

        Ok(())
    }
}

/// Path checked for local presence and handed to the download tool. A
/// destination that already names the weight file is used as-is; directory
/// destinations get the identifier joined on.
fn resolve_target(id: &str, dest: &str) -> PathBuf {
    if dest.ends_with(id) {
        PathBuf::from(dest)
    } else {
        Path::new(dest).join(id)
    }
}

/// Directory the download tool and extractor write into. Identifiers with
/// path segments land in a matching subfolder under the destination.
fn resolve_download_dir(id: &str, dest: &str) -> PathBuf {
    if dest.ends_with(id) {
        return Path::new(dest)
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
    }

    match id.rsplit_once('/') {
        Some((subfolder, _)) => Path::new(dest).join(subfolder),
        None => PathBuf::from(dest),
    }
}
