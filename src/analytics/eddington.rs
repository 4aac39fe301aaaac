// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Eddington number and its distance frequency table.
//!
//! The Eddington number `E` is the largest integer such that at least `E`
//! activities each covered at least `E` kilometers.

use serde::{Deserialize, Serialize};

use super::AnalyticsError;

/// Upper bound on a single activity distance, in kilometers.
///
/// The frequency table has one row per whole kilometer, so this also bounds
/// its size.
pub const MAX_DISTANCE_KM: f64 = 10_000.0;

/// One row of the frequency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceCount {
    pub threshold_km: u32,
    /// Activities whose floored distance is at least `threshold_km`
    pub count: usize,
}

/// Eddington number plus the supporting table for charting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EddingtonResult {
    pub number: u32,
    /// Thresholds `0..=floor(max distance)`, ascending
    pub frequency_table: Vec<DistanceCount>,
}

/// Compute the Eddington number from per-activity distances in kilometers.
///
/// Duplicate distances count as independent activities.
pub fn compute_eddington(distances: &[f64]) -> Result<EddingtonResult, AnalyticsError> {
    if distances.is_empty() {
        return Err(AnalyticsError::NoDistances);
    }

    let mut floored = Vec::with_capacity(distances.len());
    for (index, &value) in distances.iter().enumerate() {
        if !value.is_finite() || !(0.0..=MAX_DISTANCE_KM).contains(&value) {
            return Err(AnalyticsError::InvalidDistance { index, value });
        }
        floored.push(value.floor() as usize);
    }

    let max_km = floored.iter().copied().max().unwrap_or(0);

    // Histogram of floored distances, then a suffix sum gives count[i].
    let mut histogram = vec![0usize; max_km + 1];
    for km in floored {
        histogram[km] += 1;
    }

    let mut counts = vec![0usize; max_km + 1];
    let mut running = 0;
    for km in (0..=max_km).rev() {
        running += histogram[km];
        counts[km] = running;
    }

    // count[i] is non-increasing while i grows, so the qualifying
    // thresholds form a prefix and the last one is E.
    let number = counts
        .iter()
        .enumerate()
        .take_while(|&(threshold, &count)| count >= threshold)
        .last()
        .map(|(threshold, _)| threshold)
        .unwrap_or(0);

    let frequency_table = counts
        .into_iter()
        .enumerate()
        .map(|(threshold, count)| DistanceCount {
            threshold_km: threshold as u32,
            count,
        })
        .collect();

    Ok(EddingtonResult {
        number: number as u32,
        frequency_table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(result: &EddingtonResult) -> Vec<usize> {
        result.frequency_table.iter().map(|r| r.count).collect()
    }

    #[test]
    fn test_identical_distances() {
        let result = compute_eddington(&[5.0, 5.0, 5.0]).unwrap();

        assert_eq!(counts(&result), vec![3, 3, 3, 3, 3, 3]);
        // count[3] = 3 >= 3, count[4] = 3 < 4
        assert_eq!(result.number, 3);
    }

    #[test]
    fn test_one_to_five() {
        let result = compute_eddington(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        // Floored distances >= i for i = 0..=5
        assert_eq!(counts(&result), vec![5, 5, 4, 3, 2, 1]);
        // count[3] = 3 >= 3, count[4] = 2 < 4
        assert_eq!(result.number, 3);
    }

    #[test]
    fn test_distances_are_floored() {
        let result = compute_eddington(&[2.99, 2.99, 3.5]).unwrap();

        assert_eq!(counts(&result), vec![3, 3, 3, 1]);
        assert_eq!(result.number, 2);
    }

    #[test]
    fn test_table_covers_zero_through_max_inclusive() {
        let result = compute_eddington(&[12.7, 3.2]).unwrap();

        assert_eq!(result.frequency_table.len(), 13);
        assert_eq!(result.frequency_table.first().unwrap().threshold_km, 0);
        assert_eq!(result.frequency_table.last().unwrap().threshold_km, 12);
        assert_eq!(result.frequency_table.last().unwrap().count, 1);
    }

    #[test]
    fn test_table_invariant_at_number() {
        let distances = [42.2, 21.1, 10.0, 35.0, 8.4, 60.0, 12.0, 15.5, 9.9, 30.0];
        let result = compute_eddington(&distances).unwrap();
        let e = result.number as usize;

        assert_eq!(e, 9);
        assert!(result.frequency_table[e].count >= e);
        assert!(result.frequency_table[e + 1].count < e + 1);
    }

    #[test]
    fn test_duplicates_count_independently() {
        let result = compute_eddington(&[2.0, 2.0]).unwrap();
        assert_eq!(result.number, 2);
    }

    #[test]
    fn test_short_activities_give_zero() {
        let result = compute_eddington(&[0.4, 0.9]).unwrap();

        assert_eq!(counts(&result), vec![2]);
        assert_eq!(result.number, 0);
    }

    #[test]
    fn test_number_bounded_by_activity_count() {
        let result = compute_eddington(&[100.0]).unwrap();
        assert_eq!(result.number, 1);
    }

    #[test]
    fn test_number_never_decreases_when_adding() {
        let mut distances = vec![3.0, 7.0, 1.5];
        let mut last = compute_eddington(&distances).unwrap().number;
        for extra in [4.0, 0.5, 9.0, 4.0, 6.0, 12.0] {
            distances.push(extra);
            let next = compute_eddington(&distances).unwrap().number;
            assert!(next >= last);
            last = next;
        }
        assert_eq!(last, 4);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert_eq!(compute_eddington(&[]), Err(AnalyticsError::NoDistances));
    }

    #[test]
    fn test_invalid_distances_are_rejected() {
        let err = compute_eddington(&[5.0, -1.0]).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidDistance { index: 1, .. }));

        let err = compute_eddington(&[f64::NAN]).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidDistance { index: 0, .. }));

        let err = compute_eddington(&[f64::INFINITY]).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidDistance { index: 0, .. }));

        let err = compute_eddington(&[MAX_DISTANCE_KM + 1.0]).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidDistance { index: 0, .. }));
    }
}
