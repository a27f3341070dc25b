use std::collections::HashSet;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info};

use crate::fetch;

static LISTING_LINK_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"//(www\.imot\.bg/pcgi/imot\.cgi\?act=5&adv=\S+?&slink=\S+?)""#,
        r#"(https://ues\.bg/en/offers/\S+?)["<\s]"#,
        r#"<a class="offer-link"\s+href="(https://www\.luximmo\.com/\S+\.html)">"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid listing link pattern"))
    .collect()
});

/// Listing URLs straight from a file, one per line, optionally limited to
/// the first `head` entries.
pub fn from_file(path: &str, head: Option<usize>) -> Result<Vec<String>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("can't read links file {}", path))?;
    let mut links: Vec<String> = text
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    if let Some(n) = head {
        links.truncate(n);
    }
    Ok(links)
}

/// Scan search-result pages for listing links.
pub async fn discover(
    client: &reqwest::Client,
    pages_file: &str,
    head: Option<usize>,
) -> Result<Vec<String>> {
    let pages = from_file(pages_file, head)?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for url in pages {
        if !url.starts_with("http") {
            continue;
        }
        info!("open apartments search page: {}", url);
        let body = fetch::fetch(client, &url).await?;
        collect_from_lines(body.split(|b| *b == b'\n'), &mut seen, &mut links);
    }

    info!("found {} listing links", links.len());
    Ok(links)
}

/// The same ordered-pattern mechanism as the field rules: first pattern
/// match per line, seen-set dedup, first-appearance order, scheme prefix
/// for protocol-relative links.
pub fn collect_from_lines<'a, I>(lines: I, seen: &mut HashSet<String>, links: &mut Vec<String>)
where
    I: IntoIterator<Item = &'a [u8]>,
{
    for raw in lines {
        let line = String::from_utf8_lossy(raw);
        for re in LISTING_LINK_RES.iter() {
            let Some(caps) = re.captures(&line) else {
                continue;
            };
            let found = caps[1].to_string();
            if seen.contains(&found) {
                continue;
            }
            seen.insert(found.clone());
            debug!("  found apartment link: {}", found);
            let link = if found.starts_with("http") {
                found
            } else {
                format!("http://{}", found)
            };
            links.push(link);
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();
        collect_from_lines(text.as_bytes().split(|b| *b == b'\n'), &mut seen, &mut links);
        links
    }

    #[test]
    fn imot_links_gain_a_scheme() {
        let links = collect(
            r#"<a href="//www.imot.bg/pcgi/imot.cgi?act=5&adv=1a&slink=abc">"#,
        );
        assert_eq!(
            links,
            vec!["http://www.imot.bg/pcgi/imot.cgi?act=5&adv=1a&slink=abc"]
        );
    }

    #[test]
    fn ues_and_luximmo_links_are_found() {
        let text = concat!(
            r#"<a href="https://ues.bg/en/offers/12345"><img></a>"#,
            "\n",
            r#"<a class="offer-link" href="https://www.luximmo.com/offer-9.html">"#,
        );
        let links = collect(text);
        assert_eq!(
            links,
            vec![
                "https://ues.bg/en/offers/12345",
                "https://www.luximmo.com/offer-9.html",
            ]
        );
    }

    #[test]
    fn duplicates_keep_first_appearance_order() {
        let text = concat!(
            r#"x "https://ues.bg/en/offers/1" y"#,
            "\n",
            r#"x "https://ues.bg/en/offers/2" y"#,
            "\n",
            r#"x "https://ues.bg/en/offers/1" y"#,
        );
        let links = collect(text);
        assert_eq!(
            links,
            vec!["https://ues.bg/en/offers/1", "https://ues.bg/en/offers/2"]
        );
    }
}
