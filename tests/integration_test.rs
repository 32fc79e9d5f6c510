// Integration tests for the full segmentation workflow
//
// 1. Write a session CSV in the logger's column layout
// 2. Load it into a Run
// 3. Check laps, sectors, microsectors and the delta trace
// 4. Append a second session and write the lap summaries

use std::io::Write;
use std::path::Path;

use lapsplit::segmentation::{DeltaClass, change_points};
use lapsplit::telemetry::COLUMNS;
use lapsplit::{LapAnomaly, LapSegmenter, Run, SegmentSignal, SegmentationConfig, TelemetryField, writer};
use tempfile::NamedTempFile;

const POINTS_PER_LAP: usize = 50;

/// Helper writing a synthetic session: laps of 1000m sampled every 20m,
/// with the delta switching sign halfway round.
fn write_session(file: &mut NamedTempFile, laps: &[(i64, f64)]) {
    writeln!(file, "{}", COLUMNS.join(",")).unwrap();
    let mut clock = 1000.0;
    for (lap_id, laptime) in laps {
        for i in 0..POINTS_PER_LAP {
            let steering = if (15..30).contains(&i) { 0.4 } else { 0.0 };
            let delta = if i < POINTS_PER_LAP / 2 { 0.12 } else { -0.08 };
            writeln!(
                file,
                "{clock},0.9,{steering},0.1,0.2,{x},{y},0.0,30.0,0.0,{lap_id},{laptime},-0.08,{delta},{dist}",
                x = i as f64 * 20.,
                y = 0.0,
                dist = 5000. + i as f64 * 20.,
            )
            .unwrap();
            clock += laptime / POINTS_PER_LAP as f64;
        }
    }
    file.flush().unwrap();
}

fn load(path: &Path, driver: &str, segmenter: &LapSegmenter) -> Run {
    Run::from_csv(path, driver, segmenter).expect("session should load")
}

#[test]
fn test_session_segmentation() {
    let mut file = NamedTempFile::new().unwrap();
    write_session(&mut file, &[(1, 90.), (2, 89.5), (3, 91.)]);

    let run = load(file.path(), "Jo", &LapSegmenter::default());
    assert_eq!(run.laps.len(), 3);
    assert_eq!(run.table.len(), 3 * POINTS_PER_LAP);

    for lap in &run.laps {
        assert!(lap.anomalies().is_empty(), "{:?}", lap.anomalies());
        assert_eq!(lap.global_delta, Some(-0.08));
        assert_eq!(lap.samples()[0].timestamp, 0.);
        assert_eq!(lap.samples()[0].distance, 0.);

        // sectors cover the whole lap without gaps
        assert_eq!(lap.sectors().len(), 3);
        assert_eq!(lap.sectors()[0].start, 0);
        assert_eq!(lap.sectors().last().unwrap().end, POINTS_PER_LAP - 1);
        for pair in lap.sectors().windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        for boundary in lap.sector_boundaries() {
            assert!(lap.microsector_boundaries().contains(boundary));
        }

        assert_eq!(lap.delta.len(), 2);
        let classes = lap.delta_classes();
        assert_eq!(classes[0], DeltaClass::Behind);
        assert_eq!(classes[POINTS_PER_LAP - 1], DeltaClass::Ahead);
    }
    assert_eq!(run.laptimes(), vec![(0, 90.), (1, 89.5), (2, 91.)]);
}

#[test]
fn test_steering_defined_sectors() {
    let mut file = NamedTempFile::new().unwrap();
    write_session(&mut file, &[(7, 90.)]);
    let segmenter = LapSegmenter::new(SegmentationConfig {
        sector_signal: SegmentSignal::Field {
            field: TelemetryField::Steering,
            tolerance: 0.,
        },
        microsector_signal: SegmentSignal::DistanceBins { length_m: 250. },
    });

    let run = load(file.path(), "Jo", &segmenter);
    let lap = &run.laps[0];
    assert_eq!(lap.sector_boundaries(), &[0, 15, 30, POINTS_PER_LAP - 1]);
    // distance bins start every 250m, i.e. every 12.5 samples
    assert_eq!(
        lap.microsector_boundaries(),
        &[0, 13, 15, 25, 30, 38, POINTS_PER_LAP - 1]
    );
    let steering = lap
        .samples()
        .iter()
        .map(|s| s.steering.to_bits())
        .collect::<Vec<_>>();
    assert_eq!(change_points(&steering), vec![0, 15, 30]);
}

#[test]
fn test_inconsistent_lap_is_isolated() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", COLUMNS.join(",")).unwrap();
    for i in 0..10 {
        let laptime = if i == 9 { 61. } else { 60. };
        writeln!(file, "{i},0,0,0,0,0,0,0,0,0,1,{laptime},0.0,0.0,{}", i * 10).unwrap();
    }
    for i in 0..10 {
        writeln!(file, "{},0,0,0,0,0,0,0,0,0,2,59,0.0,0.0,{}", 10 + i, i * 10).unwrap();
    }
    file.flush().unwrap();

    let run = load(file.path(), "Jo", &LapSegmenter::default());
    assert_eq!(run.laps[0].laptime, None);
    assert_eq!(
        run.laps[0].anomalies(),
        &[LapAnomaly::InconsistentField {
            field: TelemetryField::Laptime,
            distinct_values: 2
        }]
    );
    assert_eq!(run.laps[1].laptime, Some(59.));
    assert!(run.laps[1].anomalies().is_empty());
    assert_eq!(run.laps[0].sectors().len(), 3);
}

#[test]
fn test_combined_sessions_written_as_json_lines() {
    let segmenter = LapSegmenter::default();
    let mut first = NamedTempFile::new().unwrap();
    write_session(&mut first, &[(1, 90.), (2, 89.5), (3, 91.)]);
    let mut second = NamedTempFile::new().unwrap();
    write_session(&mut second, &[(1, 88.), (2, 88.5)]);

    let a = load(first.path(), "Jo", &segmenter);
    let b = load(second.path(), "Max", &segmenter);
    let b_microsectors = b.laps[1].microsectors().to_vec();
    let run = a + b;

    let numbers = run.laps.iter().map(|l| l.number).collect::<Vec<_>>();
    assert_eq!(numbers, vec![0, 1, 2, 3, 4]);
    assert_eq!(run.laps[4].driver, "Max");
    assert_eq!(run.laps[4].laptime, Some(88.5));
    assert_eq!(run.laps[4].microsectors(), b_microsectors.as_slice());
    assert_eq!(run.table.len(), 5 * POINTS_PER_LAP);

    let out_dir = tempfile::tempdir().unwrap();
    let out = out_dir.path().join("laps.jsonl");
    writer::write_laps(&out, &run.laps).unwrap();
    let lines = serde_jsonlines::json_lines::<serde_json::Value, _>(&out)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[3]["number"], 3);
    assert_eq!(lines[3]["driver"], "Max");
    assert_eq!(lines[0]["delta"].as_array().unwrap().len(), 2);
}
