//! Market manifest records and validation.
//!
//! The workspace ships a JSON manifest of the market catalog
//! (`data/market_manifest.json`) that external tooling and the headless
//! harness consume. Validation checks the records against the builtin
//! catalog - pure functions, plain data in, error list out.

use serde::{Deserialize, Serialize};

use crate::items::{ItemKind, Measure};

/// One catalog record as it appears in the JSON manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRecord {
    pub name: String,
    /// Catalog id, must match an `ItemKind` discriminant.
    pub kind: u8,
    /// "count" or "pounds".
    pub measure: String,
    pub unit_rate: f64,
    pub bag_quantity: f64,
    pub bags_per_scene: u32,
    pub bag_opens: bool,
}

/// A manifest validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

/// Validate manifest records against the builtin catalog.
pub fn validate_manifest(records: &[MarketRecord]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen_kinds = Vec::new();

    for record in records {
        if record.unit_rate <= 0.0 {
            errors.push(ValidationError {
                category: "pricing",
                severity: Severity::Error,
                message: format!("{} has non-positive unit rate {}", record.name, record.unit_rate),
            });
        }
        if record.bag_quantity <= 0.0 {
            errors.push(ValidationError {
                category: "bagging",
                severity: Severity::Error,
                message: format!(
                    "{} has non-positive bag quantity {}",
                    record.name, record.bag_quantity
                ),
            });
        }
        if record.bags_per_scene == 0 {
            errors.push(ValidationError {
                category: "stocking",
                severity: Severity::Warning,
                message: format!("{} stocks zero bags", record.name),
            });
        }
        if seen_kinds.contains(&record.kind) {
            errors.push(ValidationError {
                category: "catalog",
                severity: Severity::Error,
                message: format!("duplicate kind id {}", record.kind),
            });
        }
        seen_kinds.push(record.kind);

        let kind = match ItemKind::from_u8(record.kind) {
            Some(kind) => kind,
            None => {
                errors.push(ValidationError {
                    category: "catalog",
                    severity: Severity::Error,
                    message: format!("{} has unknown kind id {}", record.name, record.kind),
                });
                continue;
            }
        };

        // Cross-check against the builtin catalog.
        let data = kind.data();
        if data.name != record.name {
            errors.push(ValidationError {
                category: "catalog",
                severity: Severity::Error,
                message: format!(
                    "kind {} is named {:?} in the manifest but {:?} in the catalog",
                    record.kind, record.name, data.name
                ),
            });
        }
        let expected_measure = match data.measure {
            Measure::Count => "count",
            Measure::Pounds => "pounds",
        };
        if record.measure != expected_measure {
            errors.push(ValidationError {
                category: "catalog",
                severity: Severity::Error,
                message: format!(
                    "{} measure {:?} does not match catalog {:?}",
                    record.name, record.measure, expected_measure
                ),
            });
        }
        if (record.unit_rate - data.unit_rate).abs() > 1e-9
            || (record.bag_quantity - data.bag_quantity).abs() > 1e-9
            || record.bags_per_scene != data.bags_per_scene
            || record.bag_opens != data.bag_opens
        {
            errors.push(ValidationError {
                category: "catalog",
                severity: Severity::Error,
                message: format!("{} diverges from the builtin catalog", record.name),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemData;

    fn record_for(kind: ItemKind) -> MarketRecord {
        let data: ItemData = kind.data();
        MarketRecord {
            name: data.name.to_string(),
            kind: kind as u8,
            measure: match data.measure {
                Measure::Count => "count".to_string(),
                Measure::Pounds => "pounds".to_string(),
            },
            unit_rate: data.unit_rate,
            bag_quantity: data.bag_quantity,
            bags_per_scene: data.bags_per_scene,
            bag_opens: data.bag_opens,
        }
    }

    #[test]
    fn test_catalog_records_validate_clean() {
        let records: Vec<_> = crate::items::ALL_KINDS.iter().map(|&k| record_for(k)).collect();
        assert!(validate_manifest(&records).is_empty());
    }

    #[test]
    fn test_bad_rate_and_unknown_kind() {
        let mut bad = record_for(ItemKind::Apples);
        bad.unit_rate = 0.0;
        let unknown = MarketRecord {
            name: "Mystery".to_string(),
            kind: 99,
            measure: "count".to_string(),
            unit_rate: 1.0,
            bag_quantity: 1.0,
            bags_per_scene: 1,
            bag_opens: true,
        };
        let errors = validate_manifest(&[bad, unknown]);
        assert!(errors.iter().any(|e| e.category == "pricing"));
        assert!(errors.iter().any(|e| e.category == "catalog"));
    }

    #[test]
    fn test_duplicate_kind_detected() {
        let records = vec![record_for(ItemKind::Lemons), record_for(ItemKind::Lemons)];
        let errors = validate_manifest(&records);
        assert!(errors
            .iter()
            .any(|e| e.message.contains("duplicate kind id")));
    }

    #[test]
    fn test_divergent_data_detected() {
        let mut drifted = record_for(ItemKind::Carrots);
        drifted.bag_quantity = 6.0;
        let errors = validate_manifest(&[drifted]);
        assert!(errors.iter().any(|e| e.message.contains("diverges")));
    }
}
