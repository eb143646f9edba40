pub mod analysis;
pub mod dataset;
pub mod manager;
pub mod traits;

pub use analysis::AnalysisConfig;
pub use dataset::DataConfig;
pub use manager::{AppConfig, ConfigManager};
