//! Parquet export of the three run logs.

mod assignments;
mod cycles;
mod timeline;
mod utils;
mod validate;

pub use assignments::write_assignment_log_parquet;
pub use cycles::write_cycle_summary_parquet;
pub use timeline::write_courier_timeline_parquet;
pub use validate::validate_courier_timeline;
