#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Validation system that normalizes untrusted level data.
//!
//! Numeric fields are clamped into range rather than rejected, while
//! structural defects (wrong shapes, out-of-range list lengths, revisited
//! tiles) reject the level with a [`ValidationError`] describing the first
//! problem found.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::{debug, trace};
use xodex_core::{
    Level, Limits, Tile, ValidationError, Wave, MAX_REMARK_CHARS, MAX_TIER, MIN_TIER,
};

const MIN_PATH_LEN: usize = 2;
const MIN_WAVES: usize = 1;
const MIN_SPAWN_COUNT: u32 = 1;

/// Normalizes an untrusted level value, typically JSON supplied by the editor.
///
/// The expected shape is
/// `{"size":n,"path":[[x,y],..],"waves":[{"t":n,"c":n},..],"heat":n,"r":"text"}`.
/// Numeric fields that are missing, non-numeric or out of range are clamped;
/// shape errors are returned as [`ValidationError`].
pub fn validate(raw: &Value, limits: &Limits) -> Result<Level, ValidationError> {
    let outcome = raw
        .as_object()
        .ok_or(ValidationError::MissingLevel)
        .and_then(|object| validate_object(object, limits));
    report(&outcome);
    outcome
}

/// Re-validates an already typed level, clamping any out-of-range values.
///
/// Applies exactly the same policy as [`validate`], so the result equals
/// `validate(&serde_json::to_value(level)?, limits)`.
pub fn validate_level(level: &Level, limits: &Limits) -> Result<Level, ValidationError> {
    let size = clamp(f64::from(level.size), limits.min_size(), limits.max_size());
    let outcome = check_path_len(level.path.len(), limits)
        .and_then(|()| {
            normalize_path(
                size,
                level
                    .path
                    .iter()
                    .map(|tile| Ok((f64::from(tile.x()), f64::from(tile.y())))),
            )
        })
        .and_then(|path| {
            check_wave_len(level.waves.len(), limits)?;
            let waves = level
                .waves
                .iter()
                .map(|wave| normalize_wave(f64::from(wave.tier), f64::from(wave.count), limits))
                .collect();
            Ok(Level {
                size,
                path,
                waves,
                heat: clamp(f64::from(level.heat), 0, limits.max_heat()),
                remark: level.remark.as_deref().map(truncate_remark),
            })
        });
    report(&outcome);
    outcome
}

/// Rounds `value` to the nearest integer and bounds it into `[min, max]`.
///
/// Halves round away from zero, which only differs from rounding half-up
/// below zero where every range here clamps to its minimum anyway.
///
/// Non-finite values (including values that were not numbers at all) map to `min`.
#[must_use]
pub fn clamp(value: f64, min: u32, max: u32) -> u32 {
    if !value.is_finite() {
        return min;
    }

    let rounded = value.round();
    if rounded <= f64::from(min) {
        min
    } else if rounded >= f64::from(max) {
        max
    } else {
        rounded as u32
    }
}

fn validate_object(object: &Map<String, Value>, limits: &Limits) -> Result<Level, ValidationError> {
    let size = clamp(
        number(object.get("size")),
        limits.min_size(),
        limits.max_size(),
    );

    let points = object
        .get("path")
        .and_then(Value::as_array)
        .ok_or(ValidationError::InvalidPathLength)?;
    check_path_len(points.len(), limits)?;
    let path = normalize_path(size, points.iter().map(coordinate))?;

    let entries = object
        .get("waves")
        .and_then(Value::as_array)
        .ok_or(ValidationError::InvalidWaveCount)?;
    check_wave_len(entries.len(), limits)?;
    let waves = entries
        .iter()
        .map(|entry| match entry {
            Value::Object(wave) => Ok(normalize_wave(
                number(wave.get("t")),
                number(wave.get("c")),
                limits,
            )),
            // Arrays carry no named fields, so both clamp to their minimum.
            Value::Array(_) => Ok(normalize_wave(f64::NAN, f64::NAN, limits)),
            _ => Err(ValidationError::MalformedWave),
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    let heat = clamp(number(object.get("heat")), 0, limits.max_heat());
    let remark = object.get("r").and_then(Value::as_str).map(truncate_remark);

    Ok(Level {
        size,
        path,
        waves,
        heat,
        remark,
    })
}

fn number(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(f64::NAN)
}

fn coordinate(point: &Value) -> Result<(f64, f64), ValidationError> {
    match point.as_array().map(Vec::as_slice) {
        Some([x, y]) => Ok((number(Some(x)), number(Some(y)))),
        _ => Err(ValidationError::MalformedCoordinate),
    }
}

fn check_path_len(len: usize, limits: &Limits) -> Result<(), ValidationError> {
    if (MIN_PATH_LEN..=limits.max_path()).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPathLength)
    }
}

fn check_wave_len(len: usize, limits: &Limits) -> Result<(), ValidationError> {
    if (MIN_WAVES..=limits.max_waves()).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::InvalidWaveCount)
    }
}

fn normalize_path(
    size: u32,
    points: impl Iterator<Item = Result<(f64, f64), ValidationError>>,
) -> Result<Vec<Tile>, ValidationError> {
    let upper = size.saturating_sub(1);
    let mut seen = HashSet::new();
    let mut path = Vec::new();

    for point in points {
        let (x, y) = point?;
        let tile = Tile::new(clamp(x, 0, upper), clamp(y, 0, upper));
        if !seen.insert(tile) {
            return Err(ValidationError::RevisitedTile {
                x: tile.x(),
                y: tile.y(),
            });
        }
        path.push(tile);
    }

    Ok(path)
}

fn normalize_wave(tier: f64, count: f64, limits: &Limits) -> Wave {
    Wave::new(
        clamp(tier, MIN_TIER, MAX_TIER),
        clamp(count, MIN_SPAWN_COUNT, limits.max_spawn_count()),
    )
}

fn truncate_remark(remark: &str) -> String {
    remark.chars().take(MAX_REMARK_CHARS).collect()
}

fn report(outcome: &Result<Level, ValidationError>) {
    match outcome {
        Ok(level) => trace!(
            size = level.size,
            path = level.path.len(),
            waves = level.waves.len(),
            "level normalized"
        ),
        Err(reason) => debug!(%reason, "level rejected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_maps_non_finite_to_minimum() {
        assert_eq!(clamp(f64::NAN, 4, 20), 4);
        assert_eq!(clamp(f64::INFINITY, 4, 20), 4);
        assert_eq!(clamp(f64::NEG_INFINITY, 0, 500), 0);
    }

    #[test]
    fn clamp_rounds_half_up() {
        assert_eq!(clamp(7.5, 4, 20), 8);
        assert_eq!(clamp(7.49, 4, 20), 7);
        assert_eq!(clamp(-0.5, 0, 5), 0);
        assert_eq!(clamp(2.5, 0, 5), 3);
    }

    #[test]
    fn clamp_does_not_round_up_just_below_half() {
        assert_eq!(clamp(0.499_999_999_999_999_94, 0, 5), 0);
        assert_eq!(clamp(4.499_999_999_999_999, 0, 9), 4);
    }

    #[test]
    fn clamp_bounds_into_range() {
        assert_eq!(clamp(-12.0, 0, 500), 0);
        assert_eq!(clamp(9_000.0, 0, 500), 500);
        assert_eq!(clamp(1e300, 1, 9), 9);
    }

    #[test]
    fn coordinate_requires_exactly_two_entries() {
        let short = serde_json::json!([1]);
        let long = serde_json::json!([1, 2, 3]);
        assert_eq!(
            coordinate(&short),
            Err(ValidationError::MalformedCoordinate)
        );
        assert_eq!(coordinate(&long), Err(ValidationError::MalformedCoordinate));
        let (x, y) = coordinate(&serde_json::json!([1, "a"])).expect("pair");
        assert_eq!(x, 1.0);
        assert!(y.is_nan());
    }
}
