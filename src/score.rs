use tracing::debug;

use crate::config::Weights;
use crate::record::{Field, Record};

/// The closed set of fields that participate in scoring.
const SCORED: [Field; 27] = [
    Field::Price,
    Field::Rooms,
    Field::Sqm,
    Field::Floor,
    Field::Elevator,
    Field::Internet,
    Field::Location,
    Field::Mall,
    Field::Luxe,
    Field::View,
    Field::Calm,
    Field::Fireplace,
    Field::Unique,
    Field::Luxury,
    Field::Leisure,
    Field::Pool,
    Field::Restaurants,
    Field::Supermarket,
    Field::Balcony,
    Field::Park,
    Field::Garden,
    Field::Garage,
    Field::Parkslot,
    Field::Furniture,
    Field::Cozy,
    Field::Subway,
    Field::Distance,
];

/// Weighted linear combination over the set fields of a finalized record.
/// Pure; unset fields contribute nothing.
pub fn score(rec: &Record, weights: &Weights) -> f64 {
    let mut total = 0.0;

    for field in SCORED {
        if !field.is_set(rec) {
            continue;
        }

        let v = match field {
            Field::View => rec.view.rank() as f64,
            // Fallbacks for zero values, shadowed by the set-guard above.
            Field::Distance => {
                if rec.distance != 0.0 {
                    rec.distance
                } else {
                    4.0
                }
            }
            Field::Price if rec.price == 0.0 => 1000.0,
            Field::Floor if rec.floor == 0 => 2.0,
            _ => field.numeric(rec),
        };

        let s = v * weights.get(field.name());
        debug!("  subscore for '{}': {:.1}", field.name(), s);
        total += s;
    }

    debug!("  SCORE: {:.1}", total);
    total
}

/// Order records best-first; the stable sort keeps sequence order on ties.
pub fn rank(records: &mut [Record]) {
    records.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
}

// ── Tests ──
