use std::collections::HashMap;

use anyhow::{Context, Result};
use config::{File, FileFormat};

/// Per-field scoring weights from the `[WEIGHTS]` section of the config
/// file. Fields absent from the section contribute nothing to a score.
#[derive(Debug, Clone, Default)]
pub struct Weights(HashMap<String, f64>);

impl Weights {
    pub fn load(path: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(File::new(path, FileFormat::Ini))
            .build()
            .with_context(|| format!("can't read config: {}", path))?;

        let table = cfg
            .get_table("WEIGHTS")
            .or_else(|_| cfg.get_table("weights"))
            .context("config has no [WEIGHTS] section")?;

        let mut weights = HashMap::new();
        for (key, value) in table {
            let w = value
                .into_float()
                .with_context(|| format!("bad weight for '{}'", key))?;
            weights.insert(key.to_lowercase(), w);
        }
        Ok(Self(weights))
    }

    pub fn get(&self, field: &str) -> f64 {
        self.0.get(field).copied().unwrap_or(0.0)
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        Self(pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect())
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, body: &str) -> String {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, body).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn loads_weights_section() {
        let path = write_config(
            "aparts-scan-test-weights.ini",
            "[WEIGHTS]\nsqm = 2.0\nelevator = 50\nprice = -0.001\n",
        );
        let weights = Weights::load(&path).unwrap();
        assert_eq!(weights.get("sqm"), 2.0);
        assert_eq!(weights.get("elevator"), 50.0);
        assert_eq!(weights.get("price"), -0.001);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let path = write_config("aparts-scan-test-sparse.ini", "[WEIGHTS]\nsqm = 1.5\n");
        let weights = Weights::load(&path).unwrap();
        assert_eq!(weights.get("garage"), 0.0);
        assert_eq!(weights.get("no_such_field"), 0.0);
    }

    #[test]
    fn missing_section_is_an_error() {
        let path = write_config("aparts-scan-test-empty.ini", "[OTHER]\nx = 1\n");
        assert!(Weights::load(&path).is_err());
    }
}
