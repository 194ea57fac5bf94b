//! Tests for samples, bands and quality scoring.

use assay_rs::engine::{DurationRange, Engine, SimulatedAssay};
use assay_rs::error::Error;
use assay_rs::model::band::{Band, LOCATIONS, generate_batch};
use assay_rs::model::{Quality, Readings, Rgb, WorkItem, quality_distribution};

fn readings(ph: f64, turbidity: f64, dissolved_oxygen: f64, coliform: u32, nitrate: f64) -> Readings {
    Readings {
        ph,
        turbidity,
        dissolved_oxygen,
        coliform,
        nitrate,
    }
}

/// Push a batch through a fast serial engine to get processed items.
fn process(items: Vec<WorkItem>) -> Vec<WorkItem> {
    let range = DurationRange::new(0.001, 0.002).unwrap();
    let engine = Engine::with_assay(Some(1), SimulatedAssay::new(range)).unwrap();
    engine.run_serial(items).unwrap().0
}

fn is_two_decimals(v: f64) -> bool {
    ((v * 100.0).round() / 100.0 - v).abs() < 1e-9
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

#[test]
fn excellent_preset_sample_rates_excellent() {
    let item = WorkItem::new(1, readings(7.4, 1.2, 8.0, 0, 2.5), "Treatment Plant").unwrap();
    let item = process(vec![item]).remove(0);
    assert_eq!(item.rating(), Quality::Excellent);
    assert_eq!(item.readings.score_percent(), 100.0);
}

#[test]
fn industrial_sample_rates_unsafe() {
    let r = readings(9.2, 80.0, 1.5, 500, 45.0);
    assert!(r.score_percent() <= 30.0);
    assert_eq!(r.rate(), Quality::Unsafe);

    let item = process(vec![WorkItem::new(1, r, "Industrial Area").unwrap()]).remove(0);
    assert_eq!(item.rating(), Quality::Unsafe);
}

#[test]
fn rating_thresholds() {
    // 4.5 / 5 = 90%
    assert_eq!(readings(9.0, 1.0, 8.0, 0, 1.0).rate(), Quality::Excellent);
    // 4.0 / 5 = 80%
    assert_eq!(readings(7.0, 1.0, 8.0, 0, 25.0).rate(), Quality::Good);
    // 2.8 / 5 = 56%
    assert_eq!(readings(8.0, 12.0, 5.0, 25, 12.0).rate(), Quality::Moderate);
    // 2.0 / 5 = 40%
    assert_eq!(readings(5.0, 1.0, 8.0, 100, 50.0).rate(), Quality::Poor);
    // 1.5 / 5 = 30%, inclusive lower edge
    assert_eq!(readings(6.0, 10.0, 4.5, 100, 50.0).rate(), Quality::Poor);
    // 1.0 / 5 = 20%
    assert_eq!(readings(7.0, 100.0, 1.0, 100, 50.0).rate(), Quality::Unsafe);
}

#[test]
fn excellent_band_always_rates_excellent() {
    let mut rng = rand::rng();
    for _ in 0..500 {
        let r = Band::Excellent.sample(&mut rng);
        assert!(r.score_percent() >= 90.0, "{r:?}");
        assert_eq!(r.rate(), Quality::Excellent);
    }
}

#[test]
fn rating_is_pure() {
    let items = process(generate_batch(5).unwrap());
    for item in &items {
        assert_eq!(item.rating(), item.rating());
        assert_eq!(item.readings.rate(), item.rating());
    }
}

#[test]
fn unprocessed_item_reports_placeholder_rating() {
    // Readings that would rate Unsafe once processed.
    let item = WorkItem::new(3, readings(9.2, 80.0, 1.5, 500, 45.0), "Industrial Area").unwrap();
    let before = item.clone();

    assert_eq!(item.rating(), Quality::Moderate);
    assert_eq!(item.color(), Quality::Moderate.color());
    assert_eq!(item, before);
    assert!(!item.processed());
    assert_eq!(item.processing_duration(), 0.0);
}

#[test]
fn quality_colors_and_labels() {
    assert_eq!(Quality::Excellent.color(), Rgb(0, 200, 100));
    assert_eq!(Quality::Good.color(), Rgb(100, 220, 100));
    assert_eq!(Quality::Moderate.color(), Rgb(255, 200, 0));
    assert_eq!(Quality::Poor.color(), Rgb(255, 130, 0));
    assert_eq!(Quality::Unsafe.color(), Rgb(220, 50, 50));
    assert_eq!(Quality::Unsafe.to_string(), "Unsafe");
    assert!(Quality::Excellent < Quality::Unsafe);
}

#[test]
fn distribution_counts_each_rating() {
    let items = process(vec![
        WorkItem::new(1, readings(7.4, 1.2, 8.0, 0, 2.5), "A").unwrap(),
        WorkItem::new(2, readings(7.2, 1.5, 8.5, 0, 2.0), "B").unwrap(),
        WorkItem::new(3, readings(9.2, 80.0, 1.5, 500, 45.0), "C").unwrap(),
    ]);
    let dist = quality_distribution(&items);
    assert_eq!(dist[0], (Quality::Excellent, 2));
    assert_eq!(dist[4], (Quality::Unsafe, 1));
    assert_eq!(dist.iter().map(|(_, n)| n).sum::<usize>(), 3);
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[test]
fn band_samples_stay_inside_their_ranges() {
    let mut rng = rand::rng();
    for band in Band::ALL {
        let r = band.ranges();
        for _ in 0..200 {
            let s = band.sample(&mut rng);
            assert!(s.ph >= r.ph.0 && s.ph <= r.ph.1);
            assert!(s.turbidity >= r.turbidity.0 && s.turbidity <= r.turbidity.1);
            assert!(s.dissolved_oxygen >= r.dissolved_oxygen.0 && s.dissolved_oxygen <= r.dissolved_oxygen.1);
            assert!(s.coliform >= r.coliform.0 && s.coliform <= r.coliform.1);
            assert!(s.nitrate >= r.nitrate.0 && s.nitrate <= r.nitrate.1);
            assert!(is_two_decimals(s.ph));
            assert!(is_two_decimals(s.turbidity));
            assert!(is_two_decimals(s.dissolved_oxygen));
            assert!(is_two_decimals(s.nitrate));
        }
    }
}

#[test]
fn generated_batch_has_sequential_ids_and_catalog_locations() {
    let batch = generate_batch(30).unwrap();
    assert_eq!(batch.len(), 30);
    for (i, item) in batch.iter().enumerate() {
        assert_eq!(item.id().0 as usize, i + 1);
        assert!(LOCATIONS.contains(&item.source_location.as_str()));
        assert!(!item.processed());
        assert_eq!(item.processing_duration(), 0.0);
    }
}

#[test]
fn empty_batch_request_is_invalid() {
    assert!(matches!(generate_batch(0), Err(Error::InvalidArgument(_))));
}

#[test]
fn ids_must_be_positive() {
    assert!(WorkItem::new(0, readings(7.0, 1.0, 8.0, 0, 1.0), "Reservoir").is_err());
    let item = WorkItem::new(7, readings(7.0, 1.0, 8.0, 0, 1.0), "Reservoir").unwrap();
    assert_eq!(item.id().to_string(), "#7");
}

#[test]
fn work_item_serializes_to_json() {
    let item = WorkItem::new(2, readings(7.0, 1.0, 8.0, 0, 1.0), "Reservoir").unwrap();
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["id"], 2);
    assert_eq!(json["source_location"], "Reservoir");
    assert_eq!(json["processed"], false);
    assert_eq!(json["readings"]["coliform"], 0);
}
