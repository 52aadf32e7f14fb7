//! Bid price walk.
//!
//! Each bid perturbs the previous price (or the listing price for the first
//! bid) by a uniform random fraction within `±precision`, rounded up to a
//! whole currency unit. Prices may drift far from the listing over many bids.

use rand::Rng;

/// Returns the next bid price derived from `previous`.
///
/// For `previous > 0` and `0 <= precision < 1` the result is a positive whole
/// number within `[ceil(previous * (1 - precision)), ceil(previous * (1 + precision))]`.
pub fn next_bid_price<R: Rng + ?Sized>(rng: &mut R, previous: f64, precision: f64) -> f64 {
    let factor = if precision > 0.0 {
        rng.gen_range(-precision..=precision)
    } else {
        0.0
    };
    (previous + previous * factor).ceil()
}
