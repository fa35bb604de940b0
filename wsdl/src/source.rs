//! Document retrieval.
//!
//! Remote documents are cached on disk and a cached copy is always preferred
//! over downloading again. Local paths are read directly.

use quick_xml::Reader;
use std::{
    collections::HashMap,
    fs::{self, File},
    io::{BufReader, Write},
    path::{Path, PathBuf},
    time::Duration,
};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use url::Url;

use super::{document::XmlDocument, error::Error};

pub trait DocumentSource {
    fn fetch(&mut self, identifier: &str) -> Result<XmlDocument, Error>;
}

#[derive(Debug, Clone)]
pub struct LoaderOptions {
    pub cache_dir: PathBuf,
    pub timeout: Duration,
}

/// Fetches documents from `http(s)` URLs, `file` URLs and plain paths.
#[derive(Debug, Default)]
pub struct Loader {
    options: LoaderOptions,
    client: Option<reqwest::blocking::Client>,
    documents: HashMap<String, XmlDocument>,
}

/// In-memory documents keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    documents: HashMap<String, String>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("cache"),
            timeout: Duration::from_secs(30),
        }
    }
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoaderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    fn load(&mut self, identifier: &str) -> Result<XmlDocument, Error> {
        match Url::parse(identifier) {
            Ok(url) => match url.scheme() {
                "http" | "https" => self.load_remote(identifier, &url),

                "file" => {
                    let path = url
                        .to_file_path()
                        .map_err(|()| Error::PathConversionError(None))?;

                    load_path(identifier, &path)
                }

                other => Err(Error::UnsupportedScheme(other.into())),
            },

            Err(url::ParseError::RelativeUrlWithoutBase) => {
                load_path(identifier, Path::new(identifier))
            }

            Err(err) => Err(err.into()),
        }
    }

    fn load_remote(&mut self, identifier: &str, url: &Url) -> Result<XmlDocument, Error> {
        let cache_file = self.options.cache_dir.join(cache_file_name(url));

        if cache_file.exists() {
            debug!("Using cache {} for {}", cache_file.display(), url);
            return load_path(identifier, &cache_file);
        }

        info!("Downloading {}", url);

        let response = self.client()?.get(url.clone()).send()?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content = response.bytes()?;
        write_cache(&self.options.cache_dir, &cache_file, &content)?;

        XmlDocument::parse_reader(identifier, Reader::from_reader(&content[..]))
    }

    fn client(&mut self) -> Result<reqwest::blocking::Client, Error> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(self.options.timeout)
            .build()?;

        self.client = Some(client.clone());
        Ok(client)
    }
}

impl DocumentSource for Loader {
    fn fetch(&mut self, identifier: &str) -> Result<XmlDocument, Error> {
        if let Some(document) = self.documents.get(identifier) {
            return Ok(document.clone());
        }

        let document = self.load(identifier)?;
        self.documents
            .insert(identifier.to_owned(), document.clone());

        Ok(document)
    }
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I: Into<String>, S: Into<String>>(mut self, identifier: I, xml: S) -> Self {
        self.insert(identifier, xml);
        self
    }

    pub fn insert<I: Into<String>, S: Into<String>>(&mut self, identifier: I, xml: S) {
        self.documents.insert(identifier.into(), xml.into());
    }
}

impl DocumentSource for StaticSource {
    fn fetch(&mut self, identifier: &str) -> Result<XmlDocument, Error> {
        match self.documents.get(identifier) {
            Some(xml) => XmlDocument::parse_str(identifier, xml),
            None => Err(Error::Io {
                path: PathBuf::from(identifier),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such document"),
            }),
        }
    }
}

fn load_path(identifier: &str, path: &Path) -> Result<XmlDocument, Error> {
    info!("Opening {}", path.display());

    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;

    XmlDocument::parse_reader(identifier, Reader::from_reader(BufReader::new(file)))
}

/// Writes `content` to a temporary file in `cache_dir` and renames it over
/// `path`, so an interrupted download never leaves a partial cache entry.
fn write_cache(cache_dir: &Path, path: &Path, content: &[u8]) -> Result<(), Error> {
    let dir_error = |source| Error::Io {
        path: cache_dir.to_owned(),
        source,
    };

    fs::create_dir_all(cache_dir).map_err(dir_error)?;

    let mut temp_file = NamedTempFile::new_in(cache_dir).map_err(dir_error)?;
    temp_file.write_all(content).map_err(dir_error)?;

    debug!("Persisting cache entry {}", path.display());
    temp_file.persist(path).map_err(|err| Error::Io {
        path: path.to_owned(),
        source: err.error,
    })?;

    Ok(())
}

/// File name used to cache `url`: path separators and other characters that
/// are unsafe in file names become `_`, and `.wsdl` is appended when the last
/// path segment carries no extension or the URL has a query.
pub fn cache_file_name(url: &Url) -> String {
    let mut name: String = url
        .as_str()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '?' | '*' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();

    let has_extension = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(|segment| Path::new(segment).extension().is_some())
        .unwrap_or(false);

    if !has_extension || url.query().is_some() {
        name.push_str(".wsdl");
    }

    name
}

/// Resolves a `schemaLocation` against the document that referenced it.
pub fn resolve_location(base: &str, location: &str) -> Result<String, Error> {
    if Url::parse(location).is_ok() {
        return Ok(location.to_owned());
    }

    match Url::parse(base) {
        Ok(base) => Ok(base.join(location)?.to_string()),

        Err(_) => {
            let joined = match Path::new(base).parent() {
                Some(parent) => parent.join(location),
                None => PathBuf::from(location),
            };

            Ok(joined.to_string_lossy().into_owned())
        }
    }
}
