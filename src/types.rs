//! Numeric conventions shared by both solvers (spec §4.8 / A4).
//!
//! Centralizing these avoids the two solvers drifting on what "non-zero
//! residual" or "close enough to the target" means.

use num_traits::Float;

/// Tolerance for "residual capacity is effectively zero" in the max-flow engine.
pub const EPS_RESIDUAL: f64 = 1e-9;

/// Tolerance for equality checks against a targeted total (achieved flow vs.
/// demand, LP net-production vs. zero, etc).
pub const EPS_EQUALITY: f64 = 1e-6;

/// Maximum binary-search iterations when FACTORY hunts for a feasible target rate.
pub const BINARY_SEARCH_MAX_ITERS: u32 = 50;

/// Binary search stops early once the bracket narrows below this width.
pub const BINARY_SEARCH_MIN_INTERVAL: f64 = 0.01;

/// Wall-clock budget for a single LP solve (spec §5).
pub const LP_TIME_LIMIT_SECONDS: f64 = 2.0;

/// True if `x` is indistinguishable from zero within `eps`.
pub fn nearly_zero<F: Float>(x: F, eps: F) -> bool {
    x.abs() < eps
}

/// True if `a` and `b` agree within `eps`.
pub fn nearly_eq<F: Float>(a: F, b: F, eps: F) -> bool {
    (a - b).abs() < eps
}

/// Round a value to two decimal places for outbound JSON, per spec §6.5/§4.3.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
