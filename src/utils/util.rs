pub type Result<T> = std::result::Result<T, String>;

/// Sentinel stored in the first cell of a padding column.
pub const PAD: f64 = -1.0;

/// Number of completed work units between two interruption checks.
pub const INTERRUPT_CHECK_INTERVAL: usize = 1000;
