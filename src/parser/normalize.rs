use crate::record::Record;

/// Descriptive suffixes after these connectors are not part of the street
/// name proper.
const STREET_CONNECTORS: [&str; 2] = [" в ", " до "];
const QUOTE_ARTIFACTS: [&str; 3] = ["'", "&#39;", "&quot;"];

/// One-shot cleanup after the line pass: street trimming, rooms derivation,
/// VAT price adjustment, and the luxe source flag.
pub fn normalize(rec: &mut Record) {
    for connector in STREET_CONNECTORS {
        truncate_at(&mut rec.street, connector);
        truncate_at(&mut rec.street_full, connector);
    }
    for artifact in QUOTE_ARTIFACTS {
        rec.street = rec.street.replace(artifact, " ");
        rec.street_full = rec.street_full.replace(artifact, " ");
    }

    // bedroom counts exclude the living room
    if rec.rooms == 0 && rec.bedrooms != 0 {
        rec.rooms = rec.bedrooms + 1;
    }

    // a tax-exclusive price wins over anything else that matched
    if rec.price_wo_vat != 0 {
        rec.price = rec.price_wo_vat as f64 * 1.20;
    }

    if rec.url.contains("ues.bg") {
        rec.luxe = 1;
    }
}

fn truncate_at(s: &mut String, needle: &str) {
    if let Some(idx) = s.find(needle) {
        s.truncate(idx);
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn street_is_cut_at_connectors() {
        let mut rec = Record::new(1, "u");
        rec.street = "Тинтява до парка".to_string();
        rec.street_full = "ул. Тинтява в близост".to_string();
        normalize(&mut rec);
        assert_eq!(rec.street, "Тинтява");
        assert_eq!(rec.street_full, "ул. Тинтява");
    }

    #[test]
    fn quote_artifacts_become_spaces() {
        let mut rec = Record::new(1, "u");
        rec.street = "Knyaz&#39;s&quot;".to_string();
        normalize(&mut rec);
        assert_eq!(rec.street, "Knyaz s ");
    }

    #[test]
    fn rooms_derived_from_bedrooms_only_when_unset() {
        let mut rec = Record::new(1, "u");
        rec.bedrooms = 2;
        normalize(&mut rec);
        assert_eq!(rec.rooms, 3);

        let mut rec = Record::new(2, "u");
        rec.rooms = 4;
        rec.bedrooms = 2;
        normalize(&mut rec);
        assert_eq!(rec.rooms, 4);
    }

    #[test]
    fn vat_price_overrides_any_other_price() {
        let mut rec = Record::new(1, "u");
        rec.price = 999_999.0;
        rec.price_wo_vat = 1000;
        normalize(&mut rec);
        assert_eq!(rec.price, 1200.0);
    }

    #[test]
    fn ues_listings_are_marked_luxe() {
        let mut rec = Record::new(1, "https://ues.bg/en/offers/123");
        normalize(&mut rec);
        assert_eq!(rec.luxe, 1);

        let mut rec = Record::new(2, "https://www.imot.bg/abc");
        normalize(&mut rec);
        assert_eq!(rec.luxe, 0);
    }
}
