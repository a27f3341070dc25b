use std::sync::LazyLock;

use regex::Regex;

use crate::record::{Field, Record};

/// Sources that render a label and its value on separate lines implement
/// this; the extractor feeds every line through after the generic rule
/// pass. New multi-line sources plug in via [`multiline_for`] without
/// touching the extractor.
pub trait MultiLine {
    fn feed(&mut self, rec: &mut Record, line: &str);
}

/// Look up the multi-line parser for a record's source, if it needs one.
pub fn multiline_for(url: &str) -> Option<Box<dyn MultiLine>> {
    if url.contains("luximmo.com") {
        Some(Box::new(LuximmoState::default()))
    } else {
        None
    }
}

static BARE_INT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s>]*(\d+)[\s<]*").unwrap());

#[derive(Default)]
enum Pending {
    #[default]
    None,
    Price,
    Floor,
    FloorMax,
}

/// Single-slot state machine for luximmo pages: a header token arms the
/// slot, the following line supplies the value, and the slot clears again
/// whether or not the value parsed.
#[derive(Default)]
struct LuximmoState {
    pending: Pending,
}

impl MultiLine for LuximmoState {
    fn feed(&mut self, rec: &mut Record, line: &str) {
        match std::mem::take(&mut self.pending) {
            Pending::Price => {
                let cleaned = line.replace(['"', ' '], "");
                if let Ok(eur) = cleaned.parse::<i64>() {
                    rec.price = eur as f64;
                }
            }
            Pending::Floor => {
                if !Field::Floor.is_set(rec) {
                    if let Some(caps) = BARE_INT_RE.captures(line) {
                        Field::Floor.capture(rec, &caps[1]);
                    }
                }
            }
            Pending::FloorMax => {
                if !Field::FloorMax.is_set(rec) {
                    if let Some(caps) = BARE_INT_RE.captures(line) {
                        Field::FloorMax.capture(rec, &caps[1]);
                    }
                }
            }
            Pending::None => {}
        }

        // Header tokens arm the slot for the next line, never their own.
        if line.contains("curr_conv") {
            self.pending = Pending::Price;
        } else if line.contains("Floor:") {
            self.pending = Pending::Floor;
        } else if line.contains("Number of floors:") {
            self.pending = Pending::FloorMax;
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(rec: &mut Record, lines: &[&str]) {
        let mut state = multiline_for("https://www.luximmo.com/offer-1.html").unwrap();
        for line in lines {
            state.feed(rec, line);
        }
    }

    #[test]
    fn price_comes_from_the_line_after_the_header() {
        let mut rec = Record::new(1, "u");
        feed_all(&mut rec, &["<div id=\"curr_conv\">Price</div>", "\"385 000\""]);
        assert_eq!(rec.price, 385_000.0);
    }

    #[test]
    fn floor_and_floor_max_use_their_own_headers() {
        let mut rec = Record::new(1, "u");
        feed_all(
            &mut rec,
            &["Floor:", "<span>4</span>", "Number of floors:", "<span>9</span>"],
        );
        assert_eq!(rec.floor, 4);
        assert_eq!(rec.floor_max, 9);
    }

    #[test]
    fn slot_clears_after_one_line_even_without_a_value() {
        let mut rec = Record::new(1, "u");
        feed_all(&mut rec, &["Floor:", "no number here", "4"]);
        assert_eq!(rec.floor, 0);
    }

    #[test]
    fn header_never_consumes_its_own_line() {
        let mut rec = Record::new(1, "u");
        feed_all(&mut rec, &["Floor: see below", "7"]);
        assert_eq!(rec.floor, 7);
    }

    #[test]
    fn unknown_sources_have_no_multiline_parser() {
        assert!(multiline_for("https://www.imot.bg/pcgi/imot.cgi").is_none());
        assert!(multiline_for("https://ues.bg/en/offers/1").is_none());
    }
}
