//! Tests for preset sample sets.

use std::path::PathBuf;

use assay_rs::error::Error;
use assay_rs::model::Quality;
use assay_rs::preset::PresetCatalog;

fn write_temp(content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("assay-preset-{}.toml", uuid::Uuid::new_v4()));
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn builtin_presets_are_listed() {
    let catalog = PresetCatalog::builtin();
    let names: Vec<_> = catalog.names().collect();
    assert_eq!(names, vec!["contaminated_set", "excellent_set", "mixed_quality"]);
    assert_eq!(catalog.get("mixed_quality").unwrap().len(), 5);
}

#[test]
fn mixed_quality_covers_the_scale() {
    let catalog = PresetCatalog::builtin();
    let ratings: Vec<_> = catalog
        .get("mixed_quality")
        .unwrap()
        .iter()
        .map(|s| s.readings().rate())
        .collect();
    assert_eq!(
        ratings,
        vec![
            Quality::Excellent,
            Quality::Excellent,
            Quality::Moderate,
            Quality::Unsafe,
            Quality::Unsafe,
        ]
    );
}

#[test]
fn excellent_and_contaminated_sets_rate_as_named() {
    let catalog = PresetCatalog::builtin();
    for sample in catalog.get("excellent_set").unwrap() {
        assert_eq!(sample.readings().rate(), Quality::Excellent);
    }
    for sample in catalog.get("contaminated_set").unwrap() {
        assert_eq!(sample.readings().rate(), Quality::Unsafe);
    }
}

#[test]
fn preset_items_are_numbered_from_one() {
    let items = PresetCatalog::builtin().items("excellent_set").unwrap();
    let ids: Vec<u32> = items.iter().map(|i| i.id().0).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(items[1].source_location, "Natural Spring");
    assert!(items.iter().all(|i| !i.processed()));
}

#[test]
fn unknown_preset_is_not_found() {
    let err = PresetCatalog::builtin().items("nope").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn file_presets_extend_and_override_builtins() {
    let path = write_temp(
        r#"
[[preset.lakeside]]
ph = 7.1
turbidity = 2.5
do = 7.5
coliform = 3
nitrate = 4.0
location = "Urban Lake"

[[preset.lakeside]]
ph = 6.2
turbidity = 9.0
do = 4.5
coliform = 30
nitrate = 12.0
location = "Wetland Area"

[[preset.excellent_set]]
ph = 7.5
turbidity = 0.9
do = 9.1
coliform = 0
nitrate = 1.1
location = "Natural Spring"
"#,
    );

    let catalog = PresetCatalog::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let lakeside = catalog.get("lakeside").unwrap();
    assert_eq!(lakeside.len(), 2);
    assert_eq!(lakeside[0].dissolved_oxygen, 7.5);
    assert_eq!(lakeside[1].location, "Wetland Area");

    assert_eq!(catalog.get("excellent_set").unwrap().len(), 1);
    assert!(catalog.get("mixed_quality").is_some());
}

#[test]
fn malformed_preset_file_is_a_config_error() {
    let path = write_temp("[[preset.broken]]\nph = \"seven\"\n");
    let err = PresetCatalog::load_from_file(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn empty_preset_is_rejected() {
    let path = write_temp("[preset]\nhollow = []\n");
    let err = PresetCatalog::load_from_file(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn missing_preset_file_is_a_config_error() {
    let path = std::env::temp_dir().join("assay-preset-does-not-exist.toml");
    assert!(matches!(
        PresetCatalog::load_from_file(&path),
        Err(Error::Config(_))
    ));
}
