mod loader;

pub use loader::{Config, HiltConfig, ReportConfig};
