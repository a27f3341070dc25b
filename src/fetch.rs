use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{info, warn};

pub const USER_AGENT: &str = "aparts-scanner/2.0";

const MAX_RETRIES: u32 = 4;
const RETRY_DELAY: Duration = Duration::from_secs(1);

static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[^a-zA-Z0-9]").unwrap());

pub fn cache_dir() -> PathBuf {
    std::env::temp_dir().join("aparts-scanner")
}

pub fn init_cache() -> Result<()> {
    let dir = cache_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("can't create cache dir {}", dir.display()))
}

pub fn clear_cache() -> Result<()> {
    let dir = cache_dir();
    if dir.exists() {
        std::fs::remove_dir_all(&dir)
            .with_context(|| format!("can't clear cache dir {}", dir.display()))?;
    }
    Ok(())
}

/// Cache file for an arbitrary key: non-alphanumerics become underscores.
pub fn cache_path(key: &str) -> PathBuf {
    cache_dir().join(NON_ALNUM_RE.replace_all(key, "_").into_owned())
}

pub fn client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("can't build HTTP client")
}

/// Fetch a URL with bounded retries; the final failure propagates.
pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    for attempt in 1..=MAX_RETRIES {
        match try_fetch(client, url).await {
            Ok(body) => return Ok(body),
            Err(e) => {
                warn!("can't fetch: {} - {} (attempt {}/{})", url, e, attempt, MAX_RETRIES + 1);
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }
    try_fetch(client, url).await
}

/// Fetch one listing document, serving from the on-disk cache when present.
/// A page that still fails after retries yields an empty body: its record
/// stays unfilled and sinks to the bottom of the report.
pub async fn fetch_cached(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let path = cache_path(url);
    if path.exists() {
        info!("from cache: {}", url);
        return std::fs::read(&path)
            .with_context(|| format!("can't read cache file {}", path.display()));
    }

    info!("fetching url: {}", url);
    match fetch(client, url).await {
        Ok(body) => {
            std::fs::write(&path, &body)
                .with_context(|| format!("can't write cache file {}", path.display()))?;
            Ok(body)
        }
        Err(e) => {
            warn!("giving up on {}: {}", url, e);
            Ok(Vec::new())
        }
    }
}

async fn try_fetch(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_path_flattens_urls() {
        let path = cache_path("https://www.imot.bg/pcgi/imot.cgi?act=5&adv=1");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(name, "https___www_imot_bg_pcgi_imot_cgi_act_5_adv_1");
    }

    #[test]
    fn same_key_maps_to_same_file() {
        assert_eq!(cache_path("a b/c"), cache_path("a b/c"));
        assert_ne!(cache_path("a"), cache_path("b"));
    }
}
