use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::fetch;
use crate::record::Record;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Geocode one free-form address; `None` when the geocoder has no match.
pub async fn geocode(client: &reqwest::Client, query: &str) -> Result<Option<Point>> {
    let body = client
        .get(NOMINATIM_URL)
        .query(&[
            ("q", query),
            ("format", "json"),
            ("limit", "1"),
            ("accept-language", "bg-BG"),
        ])
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let places: Vec<Place> = serde_json::from_str(&body).context("unexpected geocoder response")?;
    let Some(place) = places.first() else {
        return Ok(None);
    };
    let lat = place.lat.parse().context("bad latitude in geocoder response")?;
    let lon = place.lon.parse().context("bad longitude in geocoder response")?;
    Ok(Some(Point { lat, lon }))
}

/// Great-circle distance in kilometers.
pub fn haversine_km(a: Point, b: Point) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
    let h = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Fill `rec.distance` with the smallest positive distance from any
/// candidate address spelling to the reference point.
pub async fn init_distance(
    client: &reqwest::Client,
    rec: &mut Record,
    reference: Point,
    reference_str: &str,
) {
    let candidates = candidate_addresses(rec);
    if candidates.is_empty() {
        return;
    }

    let mut best: Option<f64> = None;
    for addr in &candidates {
        let km = cached_distance(client, addr, reference, reference_str).await;
        if km > 0.0 && best.map_or(true, |b| km < b) {
            best = Some(km);
            rec.distance = km;
        }
    }

    if rec.distance == 0.0 {
        warn!("can't determine location for:\n  {}", candidates.join("\n  "));
    } else {
        debug!("  distance: {:.1} km", rec.distance);
    }
}

/// The geocoder glitches on some spellings ("ул. Тинтява" vs "Тинтява"), so
/// several variants are tried and the closest hit wins.
fn candidate_addresses(rec: &Record) -> Vec<String> {
    if rec.city.is_empty() {
        return Vec::new();
    }

    let address =
        |city: &str, street: &str| format!("{} {} {} {}", rec.country, city, rec.district, street);

    let mut clipped_city = rec.city.chars();
    clipped_city.next_back();

    vec![
        address(&rec.city, &rec.street),
        address(clipped_city.as_str(), &rec.street),
        address(&rec.city, rec.street.split('.').next().unwrap_or("")),
        address(&rec.city, rec.street.split(" и ").next().unwrap_or("")),
        address(&rec.city, rec.street.split(" вх ").next().unwrap_or("")),
        address(&rec.city, &rec.street_full),
    ]
}

/// Distance for one candidate address, cached per (address, reference)
/// pair. Geocoder misses cache as 0.0; transient failures are not cached.
async fn cached_distance(
    client: &reqwest::Client,
    addr: &str,
    reference: Point,
    reference_str: &str,
) -> f64 {
    let path = fetch::cache_path(&format!("{} {}", addr, reference_str));
    if let Ok(text) = std::fs::read_to_string(&path) {
        if let Ok(km) = text.trim().parse::<f64>() {
            debug!("  distance from cache: {:.1} ({})", km, addr);
            return km;
        }
    }

    debug!("  fetching distance...");
    let km = match geocode(client, addr).await {
        Ok(Some(point)) => {
            let km = haversine_km(point, reference);
            debug!("  distance fetched: {:.1} ({})", km, addr);
            km
        }
        Ok(None) => {
            debug!("  can't determine geolocation of: {}", addr);
            0.0
        }
        Err(e) => {
            warn!("  geocoder failed for {}: {}", addr, e);
            return 0.0;
        }
    };

    if let Err(e) = std::fs::write(&path, km.to_string()) {
        warn!("can't write distance cache {}: {}", path.display(), e);
    }
    km
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const SOFIA: Point = Point { lat: 42.6977, lon: 23.3219 };
    const PLOVDIV: Point = Point { lat: 42.1354, lon: 24.7453 };

    #[test]
    fn haversine_of_identical_points_is_zero() {
        assert!(haversine_km(SOFIA, SOFIA) < 1e-9);
    }

    #[test]
    fn haversine_sofia_plovdiv() {
        let km = haversine_km(SOFIA, PLOVDIV);
        assert!((km - 133.0).abs() < 10.0, "got {}", km);
    }

    #[test]
    fn candidate_addresses_cover_the_known_glitches() {
        let mut rec = Record::new(1, "u");
        rec.district = "Лозенец".to_string();
        rec.street = "Тинтява и Никола".to_string();
        rec.street_full = "ул. Тинтява".to_string();
        let addrs = candidate_addresses(&rec);
        assert_eq!(addrs.len(), 6);
        assert_eq!(addrs[0], "България Sofia Лозенец Тинтява и Никола");
        // clipped city variant
        assert!(addrs[1].contains("Sofi "));
        // street cut at " и "
        assert!(addrs.iter().any(|a| a.ends_with("Тинтява")));
        // full street form as a last resort
        assert_eq!(addrs[5], "България Sofia Лозенец ул. Тинтява");
    }

    #[test]
    fn no_candidates_without_a_city() {
        let mut rec = Record::new(1, "u");
        rec.city.clear();
        assert!(candidate_addresses(&rec).is_empty());
    }
}
