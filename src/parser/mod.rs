pub mod extract;
pub mod images;
pub mod multiline;
pub mod normalize;
pub mod rules;

use crate::record::Record;

/// Two-pass pipeline over one fetched document: line-by-line rule
/// extraction, then one-shot field normalization.
pub fn scan_document<I, L>(rec: &mut Record, lines: I)
where
    I: IntoIterator<Item = L>,
    L: AsRef<[u8]>,
{
    extract::extract(rec, lines);
    normalize::normalize(rec);
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Weights;
    use crate::record::ViewKind;
    use crate::score;

    fn scan_fixture(url: &str, fixture: &str) -> Record {
        let body =
            std::fs::read(format!("tests/fixtures/{}.html", fixture)).expect("missing fixture");
        let mut rec = Record::new(1, url);
        scan_document(&mut rec, body.split(|b| *b == b'\n'));
        rec
    }

    #[test]
    fn imot_listing() {
        let rec = scan_fixture("https://www.imot.bg/pcgi/imot.cgi?act=5&adv=1", "imot_listing");
        assert_eq!(rec.sqm, 85);
        assert_eq!(rec.rooms, 2);
        assert_eq!(rec.floor, 3);
        assert_eq!(rec.floor_max, 6);
        assert_eq!(rec.price, 240_000.0);
        assert_eq!(rec.elevator, 1);
        assert_eq!(rec.internet, 1);
        assert_eq!(rec.balcony, 1);
        assert_eq!(rec.view, ViewKind::RockView);
        assert_eq!(rec.district, "Лозенец");
        assert_eq!(rec.street, "Тинтява");
        assert_eq!(
            rec.images,
            vec![
                "http://imot.focus.bg/photosimotbg/1/234/med/abc.pic",
                "http://imot.focus.bg/photosimotbg/1/234/med/def.pic",
            ]
        );
        // the sentinel cuts the document before the decoy values
        assert_ne!(rec.sqm, 100);
    }

    #[test]
    fn imot_listing_scores_by_weights() {
        let rec = scan_fixture("https://www.imot.bg/pcgi/imot.cgi?act=5&adv=1", "imot_listing");
        let weights = Weights::from_pairs(&[("sqm", 2.0), ("elevator", 50.0)]);
        assert_eq!(score::score(&rec, &weights), 85.0 * 2.0 + 50.0);
    }

    #[test]
    fn luximmo_listing() {
        let rec = scan_fixture("https://www.luximmo.com/offer-123.html", "luximmo_listing");
        assert_eq!(rec.price, 385_000.0);
        assert_eq!(rec.floor, 4);
        assert_eq!(rec.floor_max, 9);
        assert_eq!(rec.bedrooms, 3);
        assert_eq!(rec.rooms, 4); // derived from bedrooms
        assert_eq!(
            rec.images,
            vec![
                "https://static.luximo.ru/property-images/villa1.jpg",
                "https://static.luximo.ru/property-images/villa2.jpg",
            ]
        );
    }

    #[test]
    fn ues_listing() {
        let rec = scan_fixture("https://ues.bg/en/offers/12345", "ues_listing");
        assert_eq!(rec.district, "Iztok");
        assert_eq!(rec.sqm, 120);
        assert_eq!(rec.bedrooms, 2);
        assert_eq!(rec.rooms, 3);
        assert_eq!(rec.floor, 2);
        assert_eq!(rec.floor_max, 8);
        assert_eq!(rec.location, 1);
        assert_eq!(rec.mall, 1);
        assert_eq!(rec.luxe, 1);
        // VAT-exclusive price wins: 250 000 * 1.20
        assert_eq!(rec.price, 300_000.0);
        assert_eq!(rec.images, vec!["https://image.ues.bg/estates/watermark/abc123.jpg"]);
        // За контакти sentinel cuts the decoy tail
        assert_ne!(rec.sqm, 999);
    }
}
