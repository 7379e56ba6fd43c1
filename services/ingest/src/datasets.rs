//! Dataset registry: which published source files to ingest and how each
//! one links into the warehouse.
//!
//! Every fact table name is derived from the source file name and validated
//! before it gets anywhere near a DDL/DML statement - no raw config string
//! is ever interpolated into SQL.

use anyhow::{bail, Result};
use serde::Deserialize;

/// A dataset's category decides which dimension its fact rows link against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Row labels are loan-product parameters, created on first encounter.
    ParameterLinked,
    /// Row labels are pre-seeded region titles, never created at runtime.
    RegionLinked,
}

impl DatasetKind {
    pub fn link_column(self) -> &'static str {
        match self {
            DatasetKind::ParameterLinked => "parameter_id",
            DatasetKind::RegionLinked => "region_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DatasetKind::ParameterLinked => "parameter-linked",
            DatasetKind::RegionLinked => "region-linked",
        }
    }
}

/// One published source file.
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub file: String,
    pub kind: DatasetKind,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Dataset {
    pub fn table_name(&self) -> String {
        fact_table_name(&self.file)
    }
}

/// JSON config overriding the built-in registry (`--config`).
#[derive(Debug, Deserialize)]
pub struct DatasetsConfig {
    pub datasets: Vec<Dataset>,
}

/// The bank's mortgage statistics directory. Files the pipeline has not
/// been validated against yet stay disabled but keep their category.
pub fn builtin_datasets() -> Vec<Dataset> {
    fn dataset(file: &str, kind: DatasetKind, enabled: bool) -> Dataset {
        Dataset {
            file: file.to_string(),
            kind,
            enabled,
        }
    }

    vec![
        dataset("02_02_Mortgage.xlsx", DatasetKind::ParameterLinked, true),
        dataset("02_03_Scpa_mortgage.xlsx", DatasetKind::ParameterLinked, true),
        dataset("02_10_Quantity_mortgage.xlsx", DatasetKind::RegionLinked, true),
        dataset("02_15_Quantity_scpa_mortgage.xlsx", DatasetKind::RegionLinked, false),
        dataset("02_11_New_loans_mortgage.xlsx", DatasetKind::RegionLinked, false),
        dataset("02_16_New_loans_scpa_mortgage.xlsx", DatasetKind::RegionLinked, false),
        dataset("02_14_Debt_mortgage.xlsx", DatasetKind::RegionLinked, false),
        dataset("02_18_Debt_scpa_mortgage.xlsx", DatasetKind::RegionLinked, false),
        dataset("02_13_Rates_mortgage.xlsx", DatasetKind::RegionLinked, false),
        dataset("02_17_Rates_scpa_mortgage.xlsx", DatasetKind::RegionLinked, false),
    ]
}

/// Derive the fact table name from the published file name:
/// "02_10_Quantity_mortgage.xlsx" -> "t10_quantity_mortgage".
/// The first three characters are the publisher's section prefix; names
/// that would start with a digit get a "t" prefix.
pub fn fact_table_name(file: &str) -> String {
    let stem = file.rfind('.').map_or(file, |dot| &file[..dot]);
    let trimmed: String = stem.chars().skip(3).collect();
    let mut name = if trimmed.is_empty() {
        stem.to_lowercase()
    } else {
        trimmed.to_lowercase()
    };
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        name.insert(0, 't');
    }
    name
}

/// Table names are interpolated into statements, so anything derived from
/// a file name must be a plain lowercase identifier.
pub fn validate_identifier(name: &str) -> Result<()> {
    let valid_first = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_');
    let valid_rest = name
        .chars()
        .skip(1)
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid_first || !valid_rest {
        bail!("derived table name {name:?} is not a valid identifier");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // TABLE NAME DERIVATION TESTS
    // -------------------------------------------------------------------------

    #[test]
    fn test_fact_table_name_strips_prefix_and_extension() {
        assert_eq!(fact_table_name("02_02_Mortgage.xlsx"), "t02_mortgage");
        assert_eq!(
            fact_table_name("02_10_Quantity_mortgage.xlsx"),
            "t10_quantity_mortgage"
        );
        assert_eq!(
            fact_table_name("02_03_Scpa_mortgage.xlsx"),
            "t03_scpa_mortgage"
        );
    }

    #[test]
    fn test_fact_table_name_digit_prefix() {
        assert_eq!(fact_table_name("02_13_Rates_mortgage.xlsx"), "t13_rates_mortgage");
        assert!(!fact_table_name("02_13_Rates_mortgage.xlsx")
            .starts_with(|c: char| c.is_ascii_digit()));
    }

    #[test]
    fn test_fact_table_name_deterministic() {
        let a = fact_table_name("02_14_Debt_mortgage.xlsx");
        let b = fact_table_name("02_14_Debt_mortgage.xlsx");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fact_table_name_no_extension() {
        assert_eq!(fact_table_name("02_02_Mortgage"), "t02_mortgage");
    }

    // -------------------------------------------------------------------------
    // IDENTIFIER VALIDATION TESTS
    // -------------------------------------------------------------------------

    #[test]
    fn test_validate_identifier_accepts_derived_names() {
        for dataset in builtin_datasets() {
            validate_identifier(&dataset.table_name()).unwrap();
        }
    }

    #[test]
    fn test_validate_identifier_rejects_injection() {
        assert!(validate_identifier("t02; DROP TABLE x").is_err());
        assert!(validate_identifier("T02_Mortgage").is_err());
        assert!(validate_identifier("02_mortgage").is_err());
        assert!(validate_identifier("").is_err());
    }

    // -------------------------------------------------------------------------
    // REGISTRY TESTS
    // -------------------------------------------------------------------------

    #[test]
    fn test_builtin_registry_table_names_unique() {
        let mut names: Vec<String> = builtin_datasets()
            .iter()
            .map(Dataset::table_name)
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), builtin_datasets().len());
    }

    #[test]
    fn test_builtin_registry_link_columns() {
        for dataset in builtin_datasets() {
            match dataset.kind {
                DatasetKind::ParameterLinked => {
                    assert_eq!(dataset.kind.link_column(), "parameter_id")
                }
                DatasetKind::RegionLinked => {
                    assert_eq!(dataset.kind.link_column(), "region_id")
                }
            }
        }
    }

    #[test]
    fn test_config_deserializes() {
        let json = r#"
        {
          "datasets": [
            { "file": "02_02_Mortgage.xlsx", "kind": "parameter_linked" },
            { "file": "02_10_Quantity_mortgage.xlsx", "kind": "region_linked", "enabled": false }
          ]
        }
        "#;
        let config: DatasetsConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.datasets.len(), 2);
        assert!(config.datasets[0].enabled);
        assert!(!config.datasets[1].enabled);
        assert_eq!(config.datasets[1].kind, DatasetKind::RegionLinked);
    }
}
