use super::traits::ConfigSection;
use crate::error::StocklensError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the CSV file holding the price history.
    pub csv_path: String,
    /// Name of the date column. Detected from common aliases when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_column: Option<String>,
    /// Minimum number of observations required after loading.
    pub min_rows: usize,
    /// Where to write the cumulative-returns CSV. Skipped when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: "prices.csv".to_string(),
            date_column: None,
            min_rows: 2,
            output_path: None,
        }
    }
}

impl ConfigSection for DataConfig {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<(), StocklensError> {
        if self.csv_path.trim().is_empty() {
            return Err(StocklensError::Configuration(
                "CSV path must not be empty".to_string(),
            ));
        }
        if self.min_rows < 2 {
            return Err(StocklensError::Configuration(
                "At least 2 rows are required to compute returns".to_string(),
            ));
        }
        Ok(())
    }
}
