//! Timestamp sequencing for generated rows.
//!
//! Accounts and bids are written as chains where each timestamp is drawn
//! relative to the previous one. Both drawing modes never return a value
//! below their lower bound, so threading each result back in as the next
//! lower bound yields a non-decreasing chain.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;

/// 2022-01-01T00:00:00Z as seconds since the Unix epoch.
pub const CHAIN_EPOCH_UNIX_SECONDS: i64 = 1_640_995_200;

/// Lower bound used when a chain has no prior entity.
pub fn chain_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(CHAIN_EPOCH_UNIX_SECONDS)
}

/// Bounded-window mode: a uniformly random timestamp strictly between
/// `start` and `start + window`, at millisecond resolution.
///
/// Windows shorter than two milliseconds are widened so that a value strictly
/// inside the window always exists.
pub fn within_window<R: Rng + ?Sized>(
    rng: &mut R,
    start: DateTime<Utc>,
    window: TimeDelta,
) -> DateTime<Utc> {
    let window_ms = window.num_milliseconds().max(2);
    start + TimeDelta::milliseconds(rng.gen_range(1..window_ms))
}

/// Range mode: a uniformly random timestamp in the closed range
/// `[start, end]`, at millisecond resolution.
///
/// When `end` is not after `start` the range is empty and `start` is returned.
pub fn within_range<R: Rng + ?Sized>(
    rng: &mut R,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> DateTime<Utc> {
    let span_ms = (end - start).num_milliseconds();
    if span_ms <= 0 {
        return start;
    }
    start + TimeDelta::milliseconds(rng.gen_range(0..=span_ms))
}

/// A single chain of timestamps (one account stream, one product's bids).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampChain {
    last: DateTime<Utc>,
}

impl TimestampChain {
    /// Starts a chain after `previous`, or at [`chain_epoch`] when the chain
    /// has no prior entity.
    pub fn resume(previous: Option<DateTime<Utc>>) -> Self {
        Self {
            last: previous.unwrap_or_else(chain_epoch),
        }
    }

    /// Current lower bound of the chain.
    pub fn last(&self) -> DateTime<Utc> {
        self.last
    }

    /// Advances the chain in bounded-window mode. Results strictly increase.
    pub fn next_within_window<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        window: TimeDelta,
    ) -> DateTime<Utc> {
        self.last = within_window(rng, self.last, window);
        self.last
    }

    /// Advances the chain in range mode up to `end`. Results never decrease.
    pub fn next_until<R: Rng + ?Sized>(&mut self, rng: &mut R, end: DateTime<Utc>) -> DateTime<Utc> {
        self.last = within_range(rng, self.last, end);
        self.last
    }
}
