// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{Days, NaiveDate, NaiveTime};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use geo::{LineString, Point};
use strava_atlas::analytics::{build_fitness_freshness, compute_eddington, TrainingLoadParams};
use strava_atlas::models::Activity;
use strava_atlas::services::RegionService;

/// Ten years of near-daily rides with varied distance and power.
fn synthetic_activities() -> Vec<Activity> {
    let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    (0..3650u64)
        .filter(|i| i % 7 != 3)
        .map(|i| {
            let distance_km = 10.0 + (i * 37 % 140) as f64;
            Activity {
                id: i,
                name: format!("Ride {}", i),
                sport_type: "Ride".to_string(),
                date: start.checked_add_days(Days::new(i)).unwrap(),
                start_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
                distance_km,
                moving_time_min: distance_km * 2.4,
                average_speed_kmh: 25.0,
                max_speed_kmh: 55.0,
                elevation_m: 400.0,
                average_power_watts: (i % 5 != 0).then_some(150.0 + (i % 90) as f64),
                kcal: None,
                summary_polyline: None,
            }
        })
        .collect()
}

fn benchmark_analytics(c: &mut Criterion) {
    let activities = synthetic_activities();
    let distances: Vec<f64> = activities.iter().map(|a| a.distance_km).collect();
    let reference = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let params = TrainingLoadParams::default();

    let mut group = c.benchmark_group("analytics");

    group.bench_function("eddington_ten_years", |b| {
        b.iter(|| compute_eddington(black_box(&distances)))
    });

    group.bench_function("fitness_freshness_ten_years", |b| {
        b.iter(|| build_fitness_freshness(black_box(&activities), reference, &params))
    });

    group.finish();
}

fn benchmark_region_coverage(c: &mut Criterion) {
    let service = RegionService::load_from_file("tests/fixtures/regions.geojson")
        .expect("Failed to load regions");

    // Dense track wandering through Northtown and Southville
    let track: Vec<Point<f64>> = (0..5000)
        .map(|i| {
            let t = i as f64 / 5000.0;
            Point::new(-122.15 + 0.04 * (t * 40.0).sin(), 37.48 - 0.26 * t)
        })
        .collect();
    let line: LineString<f64> = track.iter().map(|p| p.0).collect();

    // Same track moved far from every region
    let far: Vec<Point<f64>> = track.iter().map(|p| Point::new(p.x() + 5.0, p.y())).collect();

    let mut group = c.benchmark_group("region_coverage");

    group.bench_function("covered_regions_hit", |b| {
        b.iter(|| service.covered_regions(black_box(&track)))
    });

    group.bench_function("covered_regions_miss", |b| {
        b.iter(|| service.covered_regions(black_box(&far)))
    });

    group.bench_function("line_intersections", |b| {
        b.iter(|| service.find_intersections(black_box(&line)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_analytics, benchmark_region_coverage);
criterion_main!(benches);
