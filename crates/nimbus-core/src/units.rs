//! Temperature conversion with two-decimal precision.
//!
//! Both directions share [`round2`], which breaks ties away from zero.
//! `f64::round_ties_even` is *not* equivalent at `.xx5` boundaries.

/// Round to two decimal places, ties away from zero.
pub fn round2(x: f64) -> f64 {
  round_half_away_from_zero(x * 100.0) / 100.0
}

fn round_half_away_from_zero(x: f64) -> f64 {
  if x >= 0.0 {
    (x + 0.5).floor()
  } else {
    -(-x + 0.5).floor()
  }
}

/// Celsius to Fahrenheit.
pub fn c_to_f(c: f64) -> f64 { round2((9.0 / 5.0) * c + 32.0) }

/// Fahrenheit to Celsius.
pub fn f_to_c(f: f64) -> f64 { round2((f - 32.0) * (5.0 / 9.0)) }
