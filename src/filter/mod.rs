pub mod cache;
pub mod lowpass;

pub use cache::{CacheStats, FilterCache, ResponseSimulator};
pub use lowpass::{FilterParams, LowPassSimulator, compute_output, lowpass_transfer_function};
