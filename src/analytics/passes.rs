//! Approximate overhead-pass estimator for the tracked satellite.
//!
//! This is not orbital propagation. Passes are drawn from a seeded linear
//! congruential generator so that a given observer sees the same schedule
//! for the whole calendar day, and every implementation of the estimator
//! produces the same schedule bit for bit.

use chrono::{DateTime, Utc};

use crate::types::{ObserverLocation, PassPrediction};

/// Passes produced per prediction run.
pub const PASS_COUNT: usize = 6;

/// Orbital period of the tracked object, in minutes.
pub const ORBITAL_PERIOD_MINUTES: f64 = 92.68;

/// Orbital inclination; observers further from the equator never see a pass.
pub const MAX_OBSERVER_LATITUDE: f64 = 51.6;

/// Compass tracks, indexed by the generator.
pub const DIRECTIONS: [&str; 6] = ["SW → NE", "NW → SE", "SE → NW", "NE → SW", "S → N", "N → S"];

const LCG_MULTIPLIER: f64 = 1_103_515_245.0;
const LCG_INCREMENT: f64 = 12_345.0;
const TWO_POW_32: f64 = 4_294_967_296.0;
const MS_PER_DAY: i64 = 86_400_000;
const MS_PER_MINUTE: f64 = 60_000.0;

/// Advance the generator by one step.
///
/// `next = (state * 1103515245 + 12345) & 0x7fffffff`, where the multiply
/// and add are evaluated in IEEE-754 double precision and the result is
/// wrapped to 32 bits before masking. Once `state` is large the product
/// exceeds 2^53 and loses low-order bits; that rounding is part of the
/// sequence and must not be "fixed" with integer arithmetic.
///
/// The returned state is always in `0..2^31`.
pub fn lcg_next(state: i64) -> i64 {
    let product = state as f64 * LCG_MULTIPLIER + LCG_INCREMENT;
    // `product` is integral here, so the remainder is exact.
    let wrapped = product.rem_euclid(TWO_POW_32) as u64;
    (wrapped & 0x7fff_ffff) as i64
}

/// Seed for an observer on the calendar day (UTC) containing `now`:
/// `floor(epoch_day) + floor(lat * 10) + floor(lon * 10)`.
pub fn pass_seed(now: DateTime<Utc>, observer: ObserverLocation) -> i64 {
    let epoch_day = now.timestamp_millis().div_euclid(MS_PER_DAY);
    epoch_day + (observer.lat * 10.0).floor() as i64 + (observer.lon * 10.0).floor() as i64
}

/// Estimate the next [`PASS_COUNT`] passes over `observer` after `now`.
///
/// Returns an empty list for observers beyond [`MAX_OBSERVER_LATITUDE`].
/// Otherwise the first pass rises 30–149 minutes after `now`; pass `i`
/// rises `i` orbital periods later, scaled by a factor in `[1.5, 2.0)`.
/// Each pass lasts 2–7 minutes and peaks at 10–79 degrees. Results are in
/// ascending rise-time order.
pub fn predict_passes(observer: ObserverLocation, now: DateTime<Utc>) -> Vec<PassPrediction> {
    if observer.lat.abs() > MAX_OBSERVER_LATITUDE {
        return Vec::new();
    }

    let mut state = pass_seed(now, observer);
    let mut next = move || {
        state = lcg_next(state);
        state
    };

    let now_ms = now.timestamp_millis() as f64;
    let base_offset = (next() % 120 + 30) as f64;

    (0..PASS_COUNT)
        .map(|i| {
            let spacing = 1.5 + (next() % 100) as f64 / 200.0;
            let offset_minutes = base_offset + i as f64 * (ORBITAL_PERIOD_MINUTES * spacing);
            let rise_ms = (now_ms + offset_minutes * MS_PER_MINUTE).trunc() as i64;

            let duration = 2 + next() % 6;
            let elevation = 10 + next() % 70;
            let direction = DIRECTIONS[(next() % DIRECTIONS.len() as i64) as usize];

            PassPrediction {
                rise_time: from_millis(rise_ms),
                set_time: from_millis(rise_ms + duration * 60_000),
                duration_minutes: duration as u32,
                max_elevation_degrees: elevation as u32,
                direction: direction.to_string(),
            }
        })
        .collect()
}

fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::<Utc>::MAX_UTC)
}
