//! Environment loader: file, process environment, validation, coercion

use crate::{coerce::coerce, normalize::normalize, parser::parse, validation::validate};
use std::{
    io,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use types::{EnvError, RawEnv, Result, Schema, TypedEnv};

/// Options for a single load call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Path of the env file, relative to the working directory
    pub path: PathBuf,
    /// Encoding of the env file
    pub encoding: String,
    /// Let file values win over the process environment
    pub override_process_env: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".env"),
            encoding: "utf-8".to_string(),
            override_process_env: false,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn override_process_env(mut self, override_process_env: bool) -> Self {
        self.override_process_env = override_process_env;
        self
    }
}

impl From<&str> for LoadOptions {
    fn from(path: &str) -> Self {
        Self::default().path(path)
    }
}

impl From<String> for LoadOptions {
    fn from(path: String) -> Self {
        Self::default().path(path)
    }
}

impl From<&Path> for LoadOptions {
    fn from(path: &Path) -> Self {
        Self::default().path(path)
    }
}

impl From<PathBuf> for LoadOptions {
    fn from(path: PathBuf) -> Self {
        Self::default().path(path)
    }
}

/// Encoding name that cannot be decoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported encoding: {0}")]
pub struct UnsupportedEncoding(pub String);

/// Supported env file encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Invalid sequences decode to U+FFFD
    Utf8,
    /// One byte per character
    Latin1,
    /// Seven-bit; the high bit of every byte is dropped
    Ascii,
}

impl Encoding {
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Encoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Encoding::Ascii => bytes.iter().map(|&b| char::from(b & 0x7f)).collect(),
        }
    }
}

impl FromStr for Encoding {
    type Err = UnsupportedEncoding;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "latin1" | "binary" => Ok(Encoding::Latin1),
            "ascii" => Ok(Encoding::Ascii),
            _ => Err(UnsupportedEncoding(s.to_string())),
        }
    }
}

/// Where env file contents come from
pub trait FileSource {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl FileSource for FsSource {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// Snapshot of the current process environment.
///
/// Variables whose name or value is not valid UTF-8 are left out.
pub fn process_env() -> RawEnv {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Combine file values with the process environment.
///
/// The process environment wins on conflicts unless `override_process_env` is set.
pub fn merge(file: RawEnv, process: &RawEnv, override_process_env: bool) -> RawEnv {
    let mut merged = file;
    for (key, value) in process {
        if override_process_env && merged.contains_key(key) {
            continue;
        }
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Loader bound to a file source and a process environment snapshot
#[derive(Debug, Clone)]
pub struct EnvLoader<F = FsSource> {
    source: F,
    process_env: RawEnv,
}

impl EnvLoader<FsSource> {
    /// Loader reading the filesystem and the current process environment
    pub fn new() -> Self {
        Self::with_parts(FsSource, process_env())
    }
}

impl Default for EnvLoader<FsSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSource> EnvLoader<F> {
    pub fn with_parts(source: F, process_env: RawEnv) -> Self {
        Self {
            source,
            process_env,
        }
    }

    /// Replace the process environment snapshot
    pub fn with_process_env(mut self, process_env: RawEnv) -> Self {
        self.process_env = process_env;
        self
    }

    /// Contents of the env file, or the empty string if it cannot be read
    pub fn read_file(&self, path: &Path, encoding: &str) -> String {
        let encoding = match encoding.parse::<Encoding>() {
            Ok(encoding) => encoding,
            Err(e) => {
                warn!(path = %path.display(), "Could not read env file: {}", e);
                return String::new();
            }
        };

        match self.source.read(path) {
            Ok(bytes) => encoding.decode(&bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No env file found");
                String::new()
            }
            Err(e) => {
                warn!(path = %path.display(), "Could not read env file: {}", e);
                String::new()
            }
        }
    }

    /// Parse the env file and merge it with the process environment
    pub fn merged_env(&self, options: &LoadOptions) -> RawEnv {
        let parsed = parse(&self.read_file(&options.path, &options.encoding));
        debug!(
            file_variables = parsed.len(),
            process_variables = self.process_env.len(),
            override_process_env = options.override_process_env,
            "Merging env file with process environment"
        );
        merge(parsed, &self.process_env, options.override_process_env)
    }

    /// Load, validate and coerce the variables `schema` declares
    pub fn load(&self, schema: &Schema, options: impl Into<LoadOptions>) -> Result<TypedEnv> {
        let options = options.into();
        let merged = self.merged_env(&options);
        let normalized = normalize(schema);

        let validated = validate(&normalized, &merged).map_err(EnvError::Validation)?;
        let typed = coerce(validated);

        info!(
            path = %options.path.display(),
            variables = typed.len(),
            "Environment loaded"
        );
        Ok(typed)
    }
}

/// Load `schema` from the env file and the current process environment
pub fn load(schema: &Schema, options: impl Into<LoadOptions>) -> Result<TypedEnv> {
    EnvLoader::new().load(schema, options)
}
