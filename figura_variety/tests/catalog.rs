// Integration tests for variety generation through the public API.
//
// Builds small chord, scale and rhythm catalogs the way a downstream layer
// would: pick a system, run a strategy, read back numbers, levels and codes.
// Checks the results against known necklace counts, serializes them through
// serde_json and re-parses every produced code, so the codec, the structure
// algebra and the generator are exercised together.

use std::collections::BTreeSet;

use figura_code::{pack, unpack};
use figura_structure::{FiguralStructure, System};
use figura_variety::{GeneratorConfig, RhythmParams, SortDirection, Strategy, Variety, VarietyError};

/// Helper: generate a variety of plain figural structures.
fn catalog(system: System, strategy: Strategy) -> Variety<FiguralStructure> {
    let mut variety = Variety::new(system);
    variety.generate(&strategy).unwrap();
    variety
}

fn numbers(variety: &Variety<FiguralStructure>) -> Vec<u128> {
    variety.results().iter().map(|s| s.number()).collect()
}

#[test]
fn twelve_tone_chord_classes_match_necklace_counts() {
    // Binary necklaces of length 12 by weight (transposition classes of
    // pitch-class sets).
    let expected = [1, 6, 19, 43, 66, 80, 66, 43, 19, 6, 1];
    let system = System::new(2, 12);
    for (i, &count) in expected.iter().enumerate() {
        let level = i + 1;
        let variety = catalog(system, Strategy::Classes { level });
        assert_eq!(variety.len(), count, "level {level}");
        assert!(!variety.is_capped());
    }
    // The all-ones fixed point closes the list.
    let full = catalog(system, Strategy::Classes { level: 12 });
    assert_eq!(numbers(&full), vec![4095]);
}

#[test]
fn classes_partition_the_instances() {
    let system = System::new(3, 5);
    let instances = catalog(system, Strategy::Instances { level: 3 });
    let classes = catalog(system, Strategy::Classes { level: 3 });

    let census = instances.class_census();
    let representatives: BTreeSet<u128> = numbers(&classes).into_iter().collect();
    assert_eq!(census.keys().copied().collect::<BTreeSet<_>>(), representatives);
    assert_eq!(census.values().sum::<usize>(), instances.len());
    // Order 5 is prime: every level-3 orbit has exactly 5 members.
    assert!(census.values().all(|&size| size == 5));
}

#[test]
fn binary_and_sieve_paths_agree_on_a_long_cycle() {
    let system = System::new(2, 16);
    for level in [3, 5, 8] {
        let sieved = catalog(system, Strategy::Classes { level });
        let tested = catalog(system, Strategy::BinaryClasses { level });
        assert_eq!(numbers(&sieved), numbers(&tested), "level {level}");
    }
}

#[test]
fn substructures_of_the_diatonic_mask() {
    let system = System::new(2, 12);
    let diatonic = FiguralStructure::from_code(&system, "1,0,1,0,1,1,0,1,0,1,0,1");
    assert_eq!(diatonic.level(), 7);

    let triads = catalog(
        system,
        Strategy::Substructures {
            mask: diatonic.clone(),
            level: Some(3),
        },
    );
    // C(7, 3) with a single nonzero digit value.
    assert_eq!(triads.len(), 35);
    for triad in triads.results() {
        assert!(triad.onsets().iter().all(|&p| diatonic.is_on(p)));
    }

    let everything = catalog(
        system,
        Strategy::Substructures {
            mask: diatonic,
            level: None,
        },
    );
    // Every non-empty subset of seven positions.
    assert_eq!(everything.len(), 127);
}

#[test]
fn rhythmic_classes_respect_configured_thresholds() {
    let system = System::new(2, 12);
    let plain = catalog(system, Strategy::RhythmicClasses { level: 4 });
    assert!(plain.results().iter().all(|s| s.is_on(6)));

    // Lowering the thresholds switches the long-cycle rules on for order 12.
    let strict = GeneratorConfig {
        rhythm: RhythmParams {
            separability_min_order: 8,
            simplicity_min_level: 3,
            simplicity_min_order: 8,
        },
        ..GeneratorConfig::default()
    };
    let mut tightened: Variety<FiguralStructure> = Variety::new(system).with_config(strict);
    tightened.generate(&Strategy::RhythmicClasses { level: 4 }).unwrap();
    assert!(tightened.len() <= plain.len());
    for s in tightened.results() {
        assert!(plain.results().contains(s));
        assert!(
            [3, 4, 8, 9, 2, 10].iter().any(|&p| s.is_on(p)),
            "{s} strikes no subdivision point"
        );
    }
}

#[test]
fn metric_classes_for_a_ternary_rhythm_system() {
    // Degree 3: 0 rest, 1 tone onset, 2 pause onset.
    let system = System::new(3, 8);
    let metric = catalog(system, Strategy::MetricClasses);
    assert_eq!(metric.len(), 4);
    for s in metric.results() {
        assert!(s.is_tone_start(0));
        assert!(s.onsets().iter().all(|&p| s.is_tone_start(p)));
        assert!(s.is_class_representative());
        assert!(!s.is_pause_start(0));
    }
}

#[test]
fn produced_codes_survive_pack_and_unpack() {
    let system = System::new(4, 6);
    let variety = catalog(system, Strategy::Classes { level: 4 });
    assert!(!variety.is_empty());
    for s in variety.results() {
        assert_eq!(pack(&unpack(s.code())), s.code());
        let reparsed = FiguralStructure::from_code(&system, s.code());
        assert_eq!(&reparsed, s);
        assert_eq!(reparsed.number(), s.number());
    }
}

#[test]
fn results_round_trip_through_json() {
    let variety = catalog(System::new(3, 6), Strategy::Classes { level: 2 });
    let json = serde_json::to_string(variety.results()).unwrap();
    let restored: Vec<FiguralStructure> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, variety.results());
    assert_eq!(
        restored.iter().map(|s| s.number()).collect::<Vec<_>>(),
        numbers(&variety)
    );
}

#[test]
fn caller_policy_shapes_the_catalog() {
    let system = System::new(2, 12);
    let mut variety = Variety::new(system)
        .with_cap(10)
        .with_qualifier(|s: &FiguralStructure| s.is_on(7));
    variety.generate(&Strategy::Instances { level: 3 }).unwrap();
    assert_eq!(variety.len(), 10);
    assert!(variety.is_capped());
    assert!(variety.results().iter().all(|s| s.is_on(7)));

    variety.sort_by(|s| s.variability(), SortDirection::Descending);
    assert!(variety
        .results()
        .windows(2)
        .all(|w| w[0].variability() >= w[1].variability()));
}

#[test]
fn mismatched_mask_is_rejected_before_generation() {
    let mask = FiguralStructure::from_code(&System::new(2, 7), "7*1");
    let mut variety: Variety<FiguralStructure> = Variety::new(System::new(2, 12));
    let err = variety
        .generate(&Strategy::Substructures { mask, level: Some(2) })
        .unwrap_err();
    assert!(matches!(err, VarietyError::MaskSystemMismatch { .. }));
    assert!(err.to_string().contains("degree 2, order 7"), "{err}");
    assert!(variety.is_empty());
}

#[test]
fn config_file_drives_the_generator() {
    let dir = std::env::temp_dir().join(format!("figura_variety_catalog_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.json");
    std::fs::write(&path, r#"{ "cap": 4 }"#).unwrap();

    let config = GeneratorConfig::load(&path).unwrap();
    assert_eq!(config.cap, 4);
    assert_eq!(config.rhythm, RhythmParams::default());

    let mut variety: Variety<FiguralStructure> = Variety::new(System::new(2, 10)).with_config(config);
    variety.generate(&Strategy::Classes { level: 5 }).unwrap();
    assert_eq!(variety.len(), 4);
    assert!(variety.is_capped());

    std::fs::remove_dir_all(&dir).unwrap();
}
