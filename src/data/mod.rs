pub mod cleaning;
pub mod connectors;

pub use connectors::{CsvConnector, DataValidator};
