use assay_rs::config::Config;
use assay_rs::error::Error;
use assay_rs::preset::PresetCatalog;

const VARS: [&str; 5] = [
    "ASSAY_WORKERS",
    "ASSAY_MIN_DURATION",
    "ASSAY_MAX_DURATION",
    "ASSAY_MAX_SAMPLES",
    "ASSAY_DEFAULT_SAMPLES",
];

fn clear() {
    for var in VARS {
        unsafe {
            std::env::remove_var(var);
        }
    }
}

// Environment is process-global, so all cases run in one test.
#[test]
fn config_from_env() {
    clear();

    // Defaults
    let config = Config::from_env().unwrap();
    assert_eq!(config.workers, None);
    assert_eq!(config.min_test_duration, 1.0);
    assert_eq!(config.max_test_duration, 3.0);
    assert_eq!(config.max_samples, 30);
    assert_eq!(config.default_samples, 6);
    assert!(!config.log_level.is_empty());

    // Overrides
    unsafe {
        std::env::set_var("ASSAY_WORKERS", "3");
        std::env::set_var("ASSAY_MIN_DURATION", "0.1");
        std::env::set_var("ASSAY_MAX_DURATION", "0.2");
    }
    let config = Config::from_env().unwrap();
    assert_eq!(config.workers, Some(3));
    let engine = config.engine().unwrap();
    assert_eq!(engine.workers(), 3);
    assert_eq!(engine.assay().range().max(), 0.2);

    // Malformed number
    unsafe {
        std::env::set_var("ASSAY_WORKERS", "many");
    }
    assert!(Config::from_env().is_err());

    // Zero workers
    unsafe {
        std::env::set_var("ASSAY_WORKERS", "0");
    }
    assert!(Config::from_env().is_err());

    // Inverted duration range
    unsafe {
        std::env::set_var("ASSAY_WORKERS", "2");
        std::env::set_var("ASSAY_MIN_DURATION", "2.0");
        std::env::set_var("ASSAY_MAX_DURATION", "1.0");
    }
    assert!(Config::from_env().is_err());

    // Duration too large to sleep for
    unsafe {
        std::env::set_var("ASSAY_MIN_DURATION", "1.0");
        std::env::set_var("ASSAY_MAX_DURATION", "1e20");
    }
    assert!(Config::from_env().is_err());

    // Default batch larger than the cap
    clear();
    unsafe {
        std::env::set_var("ASSAY_MAX_SAMPLES", "4");
    }
    assert!(Config::from_env().is_err());

    clear();
}

#[test]
fn batch_size_bound_applies_to_presets() {
    let config = Config {
        max_samples: 4,
        default_samples: 4,
        ..Config::default()
    };
    assert_eq!(config.check_batch_size(4).unwrap(), 4);
    assert!(config.check_batch_size(0).is_err());
    assert!(config.check_batch_size(5).is_err());

    let items = PresetCatalog::builtin().items("mixed_quality").unwrap();
    assert_eq!(items.len(), 5);
    assert!(matches!(
        config.check_batch_size(items.len()),
        Err(Error::InvalidArgument(_))
    ));
}
