use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::record::Record;

static IMAGE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"src="(//imot\.focus\.bg/photosimotbg/\S+small\S+?\.pic)"#,
        r"(?i)url\('(https://image\.ues\.bg/estates/watermark/\S+?\.jpg)'",
        r#"(?i)"image":"(https:\\/\\/static\.luximo\.ru\\/property-images\\/\S+?\.jpg)"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid image pattern"))
    .collect()
});

/// Collect every image URL on the line. Each URL is recorded once, in
/// first-appearance order; the stored form is normalized per source.
pub fn collect(rec: &mut Record, line: &str) {
    for re in IMAGE_RES.iter() {
        for caps in re.captures_iter(line) {
            let found = &caps[1];
            if rec.seen_images.contains(found) {
                continue;
            }
            rec.seen_images.insert(found.to_string());
            let url = normalize(found);
            debug!("    img: {}", url);
            rec.images.push(url);
        }
    }
}

fn normalize(link: &str) -> String {
    let mut url = link.to_string();
    if !url.starts_with("http") {
        url = format!("http:{}", url);
    }
    if url.contains("imot") {
        // thumbnail path segment upgrade
        url = url.replace("small", "med");
    }
    if url.contains("luximo") || url.contains("luximmo") {
        // URLs lifted out of embedded JSON keep their escape characters
        url = url.replace('\\', "");
    }
    url
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_urls_are_collected_once_in_order() {
        let mut rec = Record::new(1, "u");
        collect(&mut rec, r#"<img src="//imot.focus.bg/photosimotbg/1/small/a.pic">"#);
        collect(&mut rec, r#"<img src="//imot.focus.bg/photosimotbg/1/small/b.pic">"#);
        collect(&mut rec, r#"<img src="//imot.focus.bg/photosimotbg/1/small/a.pic">"#);
        assert_eq!(
            rec.images,
            vec![
                "http://imot.focus.bg/photosimotbg/1/med/a.pic",
                "http://imot.focus.bg/photosimotbg/1/med/b.pic",
            ]
        );
    }

    #[test]
    fn scheme_relative_urls_gain_a_scheme() {
        let mut rec = Record::new(1, "u");
        collect(&mut rec, r#"src="//imot.focus.bg/photosimotbg/2/small/c.pic""#);
        assert!(rec.images[0].starts_with("http://"));
    }

    #[test]
    fn watermark_urls_pass_through_unchanged() {
        let mut rec = Record::new(1, "u");
        collect(
            &mut rec,
            "background: url('https://image.ues.bg/estates/watermark/abc123.jpg')",
        );
        assert_eq!(rec.images, vec!["https://image.ues.bg/estates/watermark/abc123.jpg"]);
    }

    #[test]
    fn json_escapes_are_stripped() {
        let mut rec = Record::new(1, "u");
        collect(
            &mut rec,
            r#""image":"https:\/\/static.luximo.ru\/property-images\/villa1.jpg","image":"https:\/\/static.luximo.ru\/property-images\/villa2.jpg""#,
        );
        assert_eq!(
            rec.images,
            vec![
                "https://static.luximo.ru/property-images/villa1.jpg",
                "https://static.luximo.ru/property-images/villa2.jpg",
            ]
        );
    }

    #[test]
    fn several_matches_on_one_line() {
        let mut rec = Record::new(1, "u");
        let line = concat!(
            r#"<img src="//imot.focus.bg/photosimotbg/1/small/a.pic">"#,
            r#"<img src="//imot.focus.bg/photosimotbg/1/small/b.pic">"#,
        );
        collect(&mut rec, line);
        assert_eq!(rec.images.len(), 2);
    }
}
