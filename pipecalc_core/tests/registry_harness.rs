//! Registry and harness behaviour with built-in and fixture modules.

use std::sync::{Arc, Barrier};
use std::thread;

use pipecalc_core::calculations::{CalculationModule, TestCaseResult};
use pipecalc_core::errors::{CalcError, CalcResult};
use pipecalc_core::harness::{ExecutionMode, HarnessConfig, TestHarness, SMOKE_TEST_NAME};
use pipecalc_core::inputs::Inputs;
use pipecalc_core::manifest::Manifest;
use pipecalc_core::registry::{Registration, Registry, BUILTIN};
use pipecalc_core::result::{ResultSet, ValidationOutcome};
use pipecalc_core::schema::CalculationConfig;
use pipecalc_core::units::Unit;

// ============================================================================
// Fixture modules
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Behavior {
    Passing,
    FailingAssertion,
    Erroring,
    Panicking,
}

struct Fixture {
    config: CalculationConfig,
    behavior: Behavior,
}

impl Fixture {
    fn boxed(id: &str, behavior: Behavior) -> Arc<dyn CalculationModule> {
        Arc::new(Self {
            config: CalculationConfig {
                id: id.to_string(),
                name: id.to_string(),
                description: "fixture".to_string(),
                category: "fixtures".to_string(),
                version: "0.0.0".to_string(),
                inputs: Vec::new(),
                outputs: Vec::new(),
            },
            behavior,
        })
    }
}

impl CalculationModule for Fixture {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn config(&self) -> &CalculationConfig {
        &self.config
    }

    fn validate(&self, _inputs: &Inputs) -> ValidationOutcome {
        ValidationOutcome::ok()
    }

    fn calculate(&self, _inputs: &Inputs) -> CalcResult<ResultSet> {
        ResultSet::builder().scalar("value", 1.0, Unit::Dimensionless).build()
    }

    fn smoke_test(&self) -> bool {
        true
    }

    fn run_tests(&self) -> CalcResult<Vec<TestCaseResult>> {
        let case = |pass| TestCaseResult {
            name: "fixture case".to_string(),
            pass,
        };
        match self.behavior {
            Behavior::Passing => Ok(vec![case(true)]),
            Behavior::FailingAssertion => Ok(vec![case(true), case(false)]),
            Behavior::Erroring => Err(CalcError::calculation_failed("erroring", "stress table corrupt")),
            Behavior::Panicking => panic!("fixture exploded"),
        }
    }
}

fn passing() -> Arc<dyn CalculationModule> {
    Fixture::boxed("passing", Behavior::Passing)
}

fn failing() -> Arc<dyn CalculationModule> {
    Fixture::boxed("failing", Behavior::FailingAssertion)
}

fn erroring() -> Arc<dyn CalculationModule> {
    Fixture::boxed("erroring", Behavior::Erroring)
}

fn panicking() -> Arc<dyn CalculationModule> {
    Fixture::boxed("panicking", Behavior::Panicking)
}

fn broken_constructor() -> Arc<dyn CalculationModule> {
    panic!("constructor failed")
}

fn fixture_registry() -> Arc<Registry> {
    let mut table = BUILTIN.to_vec();
    for (id, construct) in [
        ("passing", passing as fn() -> Arc<dyn CalculationModule>),
        ("failing", failing),
        ("erroring", erroring),
        ("panicking", panicking),
        ("broken_constructor", broken_constructor),
    ] {
        table.push(Registration {
            id,
            category: "fixtures",
            construct,
        });
    }
    Arc::new(Registry::from_registrations(table).unwrap())
}

fn harness(registry: Arc<Registry>, mode: ExecutionMode) -> TestHarness {
    TestHarness::new(
        registry,
        HarnessConfig {
            mode,
            include_smoke: true,
        },
    )
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_concurrent_first_lookup_constructs_once() {
    let registry = Registry::builtin();
    let threads = 16;
    let barrier = Barrier::new(threads);

    let modules: Vec<Arc<dyn CalculationModule>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    registry.get("wall_thickness_internal_pressure").unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(registry.constructions(), 1);
    assert!(modules.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn test_each_id_constructed_once() {
    let registry = Registry::builtin();
    for _ in 0..3 {
        for id in registry.ids() {
            registry.get(id).unwrap();
        }
    }
    assert_eq!(registry.constructions(), BUILTIN.len());
}

#[test]
fn test_unknown_id_is_an_error() {
    let registry = Registry::builtin();
    let err = registry.get("heat_exchanger_area").err().unwrap();
    assert_eq!(err.error_code(), "UNKNOWN_CALCULATION");
    assert_eq!(registry.constructions(), 0);
}

#[test]
fn test_reset_forces_reconstruction() {
    let mut registry = Registry::builtin();
    let before = registry.get("pipe_mass").unwrap();
    registry.reset();
    assert!(!registry.is_loaded("pipe_mass"));

    let after = registry.get("pipe_mass").unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(registry.constructions(), 1);
}

#[test]
fn test_global_registry_rebuild() {
    let first = Registry::global();
    let again = Registry::global();
    assert!(Arc::ptr_eq(&first, &again));

    Registry::rebuild_global();
    let rebuilt = Registry::global();
    assert!(!Arc::ptr_eq(&first, &rebuilt));
    assert!(rebuilt.get("gas_calorific_value").is_ok());
}

// ============================================================================
// Harness
// ============================================================================

#[test]
fn test_one_entry_per_id_in_order() {
    let ids = [
        "gas_calorific_value",
        "erroring",
        "pipe_flow_resistance",
        "does_not_exist",
        "passing",
        "gas_calorific_value",
    ];
    let report = harness(fixture_registry(), ExecutionMode::Sequential).run(&ids);

    let order: Vec<&str> = report.entries.iter().map(|e| e.calculation_id.as_str()).collect();
    assert_eq!(order, ids);
    assert!(report.entries[0].passed());
    assert_eq!(
        report.entries[1].error.as_deref(),
        Some("Calculation failed: erroring - stress table corrupt")
    );
    assert!(report.entries[2].passed());
    assert!(report.entries[3].error.is_some());
    assert!(report.entries[4].passed());
    assert!(report.entries[5].passed());
}

#[test]
fn test_panicking_module_is_isolated() {
    let ids = ["panicking", "velocity_in_pipelines", "broken_constructor", "pipe_mass"];
    let report = harness(fixture_registry(), ExecutionMode::Sequential).run(&ids);

    assert_eq!(report.entries.len(), 4);
    assert_eq!(report.entries[0].error.as_deref(), Some("panic: fixture exploded"));
    assert!(report.entries[0].results.is_none());
    assert!(report.entries[1].passed());
    assert_eq!(report.entries[2].error.as_deref(), Some("panic: constructor failed"));
    assert!(report.entries[3].passed());
    assert_eq!(report.failed, 2);
}

#[test]
fn test_failing_assertion_is_reported_not_errored() {
    let report = harness(fixture_registry(), ExecutionMode::Sequential).run(&["failing"]);
    let entry = &report.entries[0];
    assert!(entry.error.is_none());
    assert!(!entry.passed());

    let results = entry.results.as_ref().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[2].name, SMOKE_TEST_NAME);
    assert_eq!(report.passed, 2);
    assert_eq!(report.failed, 1);
}

#[test]
fn test_parallel_matches_sequential() {
    let registry = fixture_registry();
    let ids: Vec<String> = registry
        .ids()
        .into_iter()
        .chain(["missing", "passing", "panicking"])
        .map(String::from)
        .collect();

    let sequential = harness(Arc::clone(&registry), ExecutionMode::Sequential).run(&ids);
    let parallel = harness(Arc::clone(&registry), ExecutionMode::Parallel).run(&ids);

    assert_eq!(sequential.entries, parallel.entries);
    assert_eq!(sequential.passed, parallel.passed);
    assert_eq!(sequential.failed, parallel.failed);
    assert_eq!(parallel.mode, ExecutionMode::Parallel);
    assert_ne!(sequential.run_id, parallel.run_id);
}

#[test]
fn test_manifest_from_json() {
    let json = r#"{
        "nodes": [
            { "name": "thermal_calculations",
              "calculations": [{ "id": "gas_calorific_value", "path": "thermal_calculations/gas_calorific_value" }] },
            { "name": "hydraulic_calculations",
              "calculations": [{ "id": "pipe_flow_resistance" }, { "id": "liquid_height" }] }
        ]
    }"#;
    let manifest = Manifest::from_json(json).unwrap();
    let report = harness(Arc::new(Registry::builtin()), ExecutionMode::Parallel).run_manifest(&manifest);

    let order: Vec<&str> = report.entries.iter().map(|e| e.calculation_id.as_str()).collect();
    assert_eq!(order, ["gas_calorific_value", "pipe_flow_resistance", "liquid_height"]);
    assert!(report.is_success());
}

#[test]
fn test_default_manifest_covers_every_builtin() {
    let registry = Arc::new(Registry::builtin());
    let report = harness(Arc::clone(&registry), ExecutionMode::Parallel).run_all();
    assert_eq!(report.entries.len(), BUILTIN.len());
    assert!(report.is_success(), "{}", report.to_json().unwrap());
    assert_eq!(registry.constructions(), BUILTIN.len());
}
