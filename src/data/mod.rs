pub mod loader;
pub mod signal;

pub use loader::{CsvTable, DataSource, load_table};
pub use signal::Signal;
