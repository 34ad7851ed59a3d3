pub mod math;
mod util;

pub use math::{fraction_of, median};
pub use util::{Result, INTERRUPT_CHECK_INTERVAL, PAD};
