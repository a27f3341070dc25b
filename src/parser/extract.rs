use crate::parser::{images, multiline, rules};
use crate::record::Record;

/// Run the rule table over every line of one fetched document.
///
/// Lines arrive as raw bytes and are decoded best-effort per line, so a
/// stray legacy-encoded byte never aborts the scan. A matching
/// stop-sentinel ends the pass after the current line has also fed the
/// image collector and the multi-line parser.
pub fn extract<I, L>(rec: &mut Record, lines: I)
where
    I: IntoIterator<Item = L>,
    L: AsRef<[u8]>,
{
    let mut sub = multiline::multiline_for(&rec.url);

    for raw in lines {
        let decoded = String::from_utf8_lossy(raw.as_ref());
        let line = decoded.trim();
        let lower = line.to_lowercase();

        let mut stop = false;
        for rule in rules::rules() {
            if rule.apply(rec, line, &lower) && rule.target.is_none() {
                stop = true;
            }
        }

        images::collect(rec, line);

        if let Some(sub) = sub.as_deref_mut() {
            sub.feed(rec, line);
        }

        if stop {
            break;
        }
    }
}

// ── Tests ──
