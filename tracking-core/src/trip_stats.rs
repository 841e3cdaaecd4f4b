use crate::{Position, TripStats, geometry::distance_meters};

/// Derives the summary statistics of a trip from all of its positions.
///
/// Positions are expected in non-decreasing timestamp order. Fewer than two positions
/// yield all zero statistics.
pub fn recompute_trip_stats(positions: &[Position]) -> TripStats {
    let [first, .., last] = positions else {
        return TripStats::default();
    };

    let meters: f64 = positions
        .windows(2)
        .map(|w| distance_meters(w[0].coordinate, w[1].coordinate))
        .sum();

    let duration_minutes = (last.timestamp - first.timestamp).num_milliseconds() as f64 / 60_000.0;

    let speeds = positions.iter().filter_map(|p| p.speed);
    let (count, sum, max) = speeds.fold((0usize, 0.0, 0.0_f64), |(count, sum, max), speed| {
        (count + 1, sum + speed, max.max(speed))
    });

    TripStats {
        distance_km: meters / 1000.0,
        duration_minutes,
        avg_speed: if count == 0 { 0.0 } else { sum / count as f64 },
        max_speed: max,
    }
}
