//! The bundled data directory loads and compiles cleanly.

use std::path::PathBuf;

use apl::{AplRotation, Diagnostics, ValueCatalog, run_trial};
use sim_content::ContentFactory;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../../data")
}

#[test]
fn bundled_rotation_compiles_without_warnings() {
    let factory = ContentFactory::new(data_dir());
    let scenario = factory.load_scenario().unwrap();
    let rotation = factory.load_rotation().unwrap();
    let trial = factory.load_trial_config().unwrap();
    assert_eq!(trial.seed, 42);

    let (mut sim, player) = scenario.build(trial.sim_config().unwrap(), trial.seed).unwrap();
    assert_eq!(sim.encounter().len(), 3);

    let mut diagnostics = Diagnostics::new();
    let mut apl = AplRotation::new(
        &rotation,
        &sim,
        player,
        &ValueCatalog::standard(),
        &mut diagnostics,
    )
    .unwrap();
    assert!(diagnostics.is_empty(), "{:?}", diagnostics.messages());
    assert_eq!(apl.active_entries().count(), 5);

    let report = run_trial(&mut sim, &mut apl);
    assert!(report.casts > 0);
    assert!(report.dps() > 0.0);
}
