//! Local cache for phonetic dictionary resources.
//!
//! Dictionaries are versioned data assets fetched once into the platform
//! cache directory and read from disk on every later start.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs as async_fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

/// Name of the dictionary used when none is requested explicitly.
pub const DEFAULT_DICTIONARY: &str = "cmudict";

const CACHE_DIR_ENV: &str = "PHONORA_CACHE_DIR";

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct DictionaryInfo {
    pub name: String,
    pub version: String,
    pub url: String,
    pub size: Option<u64>,
}

pub struct DictionaryStore {
    cache_dir: PathBuf,
    registry: HashMap<String, DictionaryInfo>,
}

impl DictionaryStore {
    /// Store rooted at `$PHONORA_CACHE_DIR`, or the platform cache directory.
    pub fn new() -> Result<Self> {
        Ok(Self::with_cache_dir(Self::default_cache_dir()?))
    }

    pub fn with_cache_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            registry: Self::default_registry(),
        }
    }

    fn default_cache_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CACHE_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        dirs::cache_dir()
            .map(|dir| dir.join("phonora"))
            .ok_or_else(|| Error::invalid_input("could not determine cache directory"))
    }

    fn default_registry() -> HashMap<String, DictionaryInfo> {
        let mut registry = HashMap::new();
        registry.insert(
            DEFAULT_DICTIONARY.to_string(),
            DictionaryInfo {
                name: DEFAULT_DICTIONARY.to_string(),
                version: "0.7b".to_string(),
                url: "https://raw.githubusercontent.com/cmusphinx/cmudict/master/cmudict.dict"
                    .to_string(),
                size: Some(3_600_000),
            },
        );
        registry
    }

    /// Adds or replaces a resource in the registry.
    pub fn register(&mut self, info: DictionaryInfo) {
        self.registry.insert(info.name.clone(), info);
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Registered resource names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.registry.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn info(&self, name: &str) -> Result<&DictionaryInfo> {
        self.registry
            .get(name)
            .ok_or_else(|| Error::UnknownResource(name.to_string()))
    }

    /// Where `name` lives once downloaded.
    pub fn cached_path(&self, name: &str) -> Result<PathBuf> {
        let info = self.info(name)?;
        Ok(self
            .cache_dir
            .join("dictionaries")
            .join(format!("{}-{}.dict", info.name, info.version)))
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.cached_path(name).map(|p| p.exists()).unwrap_or(false)
    }

    /// Path to `name`, downloading it first if it is not cached yet.
    pub async fn ensure(&self, name: &str) -> Result<PathBuf> {
        let path = self.cached_path(name)?;
        if path.exists() {
            log::info!("using cached dictionary: {}", path.display());
            return Ok(path);
        }
        self.download(self.info(name)?, &path).await?;
        Ok(path)
    }

    /// A caller-supplied path must exist; otherwise fall back to the default resource.
    pub async fn resolve(&self, custom_path: Option<&Path>) -> Result<PathBuf> {
        match custom_path {
            Some(path) if path.exists() => Ok(path.to_path_buf()),
            Some(path) => Err(Error::MissingPath(path.to_path_buf())),
            None => self.ensure(DEFAULT_DICTIONARY).await,
        }
    }

    async fn download(&self, info: &DictionaryInfo, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io("creating dictionary cache", e))?;
        }

        log::info!("downloading {} dictionary from {}", info.name, info.url);

        let pb = ProgressBar::new(info.size.unwrap_or(0));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {bytes:>9}/{total_bytes:9} {msg}")
                .map_err(|e| Error::download(&info.name, e))?
                .progress_chars("##-"),
        );
        pb.set_message(format!("Downloading {}", info.name));

        let response = reqwest::get(&info.url)
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::download(&info.name, e))?;
        if let Some(total_size) = response.content_length() {
            pb.set_length(total_size);
        }

        // Write to a sibling file so an interrupted download never looks cached.
        let partial = dest.with_extension("part");
        let mut file = async_fs::File::create(&partial)
            .await
            .map_err(|e| Error::io("creating dictionary file", e))?;
        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::download(&info.name, e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| Error::io("writing dictionary file", e))?;
            downloaded += chunk.len() as u64;
            pb.set_position(downloaded);
        }
        file.flush()
            .await
            .map_err(|e| Error::io("writing dictionary file", e))?;
        drop(file);

        async_fs::rename(&partial, dest)
            .await
            .map_err(|e| Error::io("finalizing dictionary file", e))?;
        pb.finish_with_message(format!("Downloaded {}", info.name));

        log::info!("cached {} at {}", info.name, dest.display());
        Ok(())
    }
}
