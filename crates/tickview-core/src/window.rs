//! Display windowing.

use crate::{Dated, Series};

/// Default number of trailing sessions handed to renderers.
pub const DEFAULT_WINDOW: usize = 180;

/// Most recent `n` rows of `series`, in original order.
pub fn tail<R: Dated + Clone>(series: &Series<R>, n: usize) -> Series<R> {
    series.tail(n)
}
