//! # Catalog fetcher
//!
//! Retrieves the two Minor Planet Center publications the catalog is built from:
//!
//! 1. the **catalog page**, an HTML listing advertising how many near-Earth objects are
//!    currently known (fetched with the blocking [`ureq`] agent of [`NeoEnv`]);
//! 2. the **orbit flat file** in MPCORB format, several megabytes large, streamed to disk
//!    chunk by chunk with [`reqwest`] and tokio's async file I/O.
//!
//! ## Object count extraction
//!
//! The page is stripped of its HTML tags, then searched with [`COUNT_PATTERN`]: a number,
//! possibly with thousands separators, directly followed by an NEO wording
//! (`35,021 near-Earth asteroids`, `35021 NEAs`, …).
use camino::{Utf8Path, Utf8PathBuf};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::{fs::File, io::AsyncWriteExt};
use tokio_stream::StreamExt;
use tracing::{info, warn};

use crate::{env_state::NeoEnv, neolab_errors::NeoError};

/// Number followed by a near-Earth object wording.
pub const COUNT_PATTERN: &str =
    r"(?i)(?P<count>\d{1,3}(?:,\d{3})+|\d+)\s+(?:near[- ]earth\s+(?:asteroids|objects)|NEAs|NEOs)\b";

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("static regex"));
static COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(COUNT_PATTERN).expect("static regex"));

/// Extract the advertised object count from the catalog page.
///
/// Arguments
/// ---------
/// * `html`: the raw page content.
///
/// Return
/// ------
/// * The first count found, or [`NeoError::ObjectCountNotFound`].
pub fn parse_object_count(html: &str) -> Result<u64, NeoError> {
    capture_count(&COUNT_RE, html)
}

/// Same as [`parse_object_count`] with a caller-provided pattern.
///
/// The pattern must define a capture group named `count`.
pub fn parse_object_count_with(html: &str, pattern: &str) -> Result<u64, NeoError> {
    capture_count(&Regex::new(pattern)?, html)
}

/// Page text without tags and non-breaking space entities.
fn strip_markup(html: &str) -> String {
    TAG_RE.replace_all(html, " ").replace("&nbsp;", " ")
}

fn capture_count(re: &Regex, html: &str) -> Result<u64, NeoError> {
    let text = strip_markup(html);
    re.captures(&text)
        .and_then(|caps| caps.name("count"))
        .ok_or(NeoError::ObjectCountNotFound)?
        .as_str()
        .replace(',', "")
        .parse()
        .map_err(|_| NeoError::ObjectCountNotFound)
}

/// Persist the object count as a one-line text file.
pub fn write_count(path: &Utf8Path, count: u64) -> Result<(), NeoError> {
    std::fs::write(path, format!("{count}\n"))?;
    Ok(())
}

/// Read back a count written by [`write_count`].
pub fn read_count(path: &Utf8Path) -> Result<u64, NeoError> {
    let content = std::fs::read_to_string(path)?;
    content
        .trim()
        .parse()
        .map_err(|_| NeoError::ObjectCountNotFound)
}

/// Download a large file from a URL
/// Uses reqwest to download the file in chunks
/// and saves it to the specified path using tokio's async file I/O
/// and stream processing.
///
/// The body is written to `<path>.part` and renamed to `path` once complete,
/// so a failed transfer never leaves a partial file at `path`.
///
/// Arguments
/// ---------
/// * `url`: the URL of the file to download
/// * `path`: the path to save the downloaded file
///
/// Return
/// ------
/// * The number of bytes written
pub(crate) async fn download_big_file(url: &str, path: &Utf8Path) -> Result<u64, NeoError> {
    let part = partial_path(path);
    match stream_to_file(url, &part).await {
        Ok(written) => {
            tokio::fs::rename(&part, path).await?;
            info!(url, bytes = written, "downloaded");
            Ok(written)
        }
        Err(err) => {
            if tokio::fs::try_exists(&part).await.unwrap_or(false) {
                tokio::fs::remove_file(&part).await?;
            }
            warn!(url, error = %err, "download failed");
            Err(err)
        }
    }
}

fn partial_path(path: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{path}.part"))
}

async fn stream_to_file(url: &str, part: &Utf8Path) -> Result<u64, NeoError> {
    info!(url, "downloading");
    let mut stream = reqwest::get(url)
        .await?
        .error_for_status()?
        .bytes_stream();

    let mut file = File::create(part).await?;
    let mut written = 0u64;
    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

/// Access point to the remote catalog publications.
pub struct CatalogFetcher<'a> {
    env: &'a NeoEnv,
}

impl<'a> CatalogFetcher<'a> {
    pub fn new(env: &'a NeoEnv) -> Self {
        CatalogFetcher { env }
    }

    /// Blocking GET of a page.
    pub fn fetch_page(&self, url: &str) -> Result<String, NeoError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(NeoError::InvalidUrl(url.to_string()));
        }
        self.env.get_from_url(url)
    }

    /// Fetch the configured catalog page and extract the object count.
    pub fn fetch_object_count(&self) -> Result<u64, NeoError> {
        let url = &self.env.config.catalog_page_url;
        let page = self.fetch_page(url)?;
        let count = parse_object_count(&page).inspect_err(|_| {
            warn!(url = url.as_str(), "no object count found in catalog page");
        })?;
        info!(count, "catalog page object count");
        Ok(count)
    }

    /// Stream `url` to `path`, returning the number of bytes written.
    pub fn download_flat_file(&self, url: &str, path: &Utf8Path) -> Result<u64, NeoError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(NeoError::InvalidUrl(url.to_string()));
        }
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(async { download_big_file(url, path).await })
    }

    /// Download the configured flat file into the data directory.
    pub fn download_catalog(&self) -> Result<Utf8PathBuf, NeoError> {
        let config = &self.env.config;
        config.ensure_data_dir()?;
        let path = config.flat_file_path();
        self.download_flat_file(&config.flat_file_url, &path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod fetcher_test {
    use super::*;

    #[test]
    fn test_parse_object_count() {
        let html = "<html><body><p>There are currently <b>37,412</b> near-Earth asteroids known.</p></body></html>";
        assert_eq!(parse_object_count(html).unwrap(), 37412);

        let html = "<pre>Number of NEAs: 12\n 1204 NEAs\n</pre>";
        assert_eq!(parse_object_count(html).unwrap(), 1204);

        let html = "<td>35021&nbsp;Near-Earth Objects</td>";
        assert_eq!(parse_object_count(html).unwrap(), 35021);
    }

    #[test]
    fn test_count_not_found() {
        assert_eq!(
            parse_object_count("<p>No statistics today</p>"),
            Err(NeoError::ObjectCountNotFound)
        );
    }

    #[test]
    fn test_parse_object_count_with() {
        let html = "<p>Total: <b>1,234,567</b> minor planets</p>";
        let count = parse_object_count_with(html, r"Total:\s+(?P<count>[\d,]+)").unwrap();
        assert_eq!(count, 1_234_567);
        assert!(matches!(
            parse_object_count_with(html, r"(?P<count"),
            Err(NeoError::RegexError(_))
        ));
    }

    #[test]
    fn test_both_parsers_agree_on_entities() {
        let html = "<td>35021&nbsp;Near-Earth Objects</td>";
        assert_eq!(
            parse_object_count_with(html, COUNT_PATTERN).unwrap(),
            parse_object_count(html).unwrap()
        );
        assert_eq!(
            parse_object_count_with(html, r"(?P<count>\d+) Near").unwrap(),
            35021
        );
    }

    #[test]
    fn test_write_and_read_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = camino::Utf8PathBuf::from_path_buf(dir.path().join("neo_count.txt")).unwrap();
        write_count(&path, 37412).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "37412\n");
        assert_eq!(read_count(&path).unwrap(), 37412);
    }

    #[test]
    fn test_invalid_url() {
        let env = NeoEnv::default();
        let fetcher = CatalogFetcher::new(&env);
        assert_eq!(
            fetcher.fetch_page("ftp://example.org/NEA.txt"),
            Err(NeoError::InvalidUrl("ftp://example.org/NEA.txt".into()))
        );
    }

    #[test]
    fn test_failed_download_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = camino::Utf8PathBuf::from_path_buf(dir.path().join("NEA.txt")).unwrap();

        let env = NeoEnv::default();
        let result = CatalogFetcher::new(&env).download_flat_file("http://127.0.0.1:1/NEA.txt", &path);

        assert!(matches!(result, Err(NeoError::ReqwestError(_))));
        assert!(!path.exists());
        assert!(!partial_path(&path).exists());
    }

    #[test]
    #[ignore]
    fn test_fetch_object_count() {
        let env = NeoEnv::default();
        let count = CatalogFetcher::new(&env).fetch_object_count().unwrap();
        assert!(count > 30_000);
    }
}
