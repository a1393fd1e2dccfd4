pub mod constants;
pub mod lw_parser;
pub mod raw_types;
pub mod types;
pub mod urls;
pub mod util;
pub mod wrapper;

// Re-exporting these dependencies since they might be helpful for manual parsing.
pub use chrono;
pub use reqwest;
pub use serde;
pub use serde_json;
