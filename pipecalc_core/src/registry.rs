//! # Module Registry
//!
//! Explicit table mapping a calculation id to the function that builds its
//! module. The first lookup of an id constructs the module and caches it;
//! later lookups return the cached instance.
//!
//! Each slot is a `once_cell::sync::OnceCell`, so concurrent first lookups
//! of the same id construct it exactly once and reads after that take no
//! lock. A process-wide registry is available through [`Registry::global`].
//!
//! ## Example
//!
//! ```rust
//! use pipecalc_core::calculations::CalculationModule;
//! use pipecalc_core::registry::Registry;
//!
//! let registry = Registry::builtin();
//! let module = registry.get("velocity_in_pipelines").unwrap();
//! assert!(module.smoke_test());
//! assert!(registry.get("no_such_calculation").is_err());
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::{Lazy, OnceCell};
use tracing::{debug, info};

use crate::calculations::{
    gas_calorific_value, liquid_height, pipe_flow_resistance, pipe_mass, velocity_in_pipelines,
    wall_thickness, Calculation, CalculationModule, GasCalorificValue, LiquidHeight, Module,
    PipeFlowResistance, PipeMass, VelocityInPipelines, WallThickness,
};
use crate::errors::{CalcError, CalcResult};
use crate::manifest::{category_title, Catalog, CatalogCategory, CatalogEntry, Manifest, ManifestEntry, ManifestNode};

/// Builds a fresh module instance
pub type Constructor = fn() -> Arc<dyn CalculationModule>;

/// One row of the registration table
#[derive(Debug, Clone, Copy)]
pub struct Registration {
    pub id: &'static str,
    pub category: &'static str,
    pub construct: Constructor,
}

fn construct<C: Calculation + Default>() -> Arc<dyn CalculationModule> {
    Arc::new(Module::new(C::default()))
}

/// Calculations shipped with the crate, in catalog order
pub const BUILTIN: [Registration; 6] = [
    Registration {
        id: pipe_flow_resistance::ID,
        category: "hydraulic_calculations",
        construct: construct::<PipeFlowResistance>,
    },
    Registration {
        id: liquid_height::ID,
        category: "hydraulic_calculations",
        construct: construct::<LiquidHeight>,
    },
    Registration {
        id: wall_thickness::ID,
        category: "stress_calculations",
        construct: construct::<WallThickness>,
    },
    Registration {
        id: velocity_in_pipelines::ID,
        category: "technological_calculations",
        construct: construct::<VelocityInPipelines>,
    },
    Registration {
        id: pipe_mass::ID,
        category: "technological_calculations",
        construct: construct::<PipeMass>,
    },
    Registration {
        id: gas_calorific_value::ID,
        category: "thermal_calculations",
        construct: construct::<GasCalorificValue>,
    },
];

struct Slot {
    registration: Registration,
    module: OnceCell<Arc<dyn CalculationModule>>,
}

/// Load-once cache of calculation modules keyed by id.
pub struct Registry {
    slots: Vec<Slot>,
    index: HashMap<&'static str, usize>,
    constructions: AtomicUsize,
}

static GLOBAL: Lazy<RwLock<Arc<Registry>>> = Lazy::new(|| RwLock::new(Arc::new(Registry::builtin())));

impl Registry {
    /// Registry over the built-in calculations
    pub fn builtin() -> Self {
        Self::build(BUILTIN.to_vec())
    }

    /// Registry over a custom table. Duplicate ids are rejected.
    pub fn from_registrations(registrations: Vec<Registration>) -> CalcResult<Self> {
        let mut seen = HashMap::new();
        for registration in &registrations {
            if seen.insert(registration.id, ()).is_some() {
                return Err(CalcError::internal(format!(
                    "calculation '{}' is registered twice",
                    registration.id
                )));
            }
        }
        Ok(Self::build(registrations))
    }

    fn build(registrations: Vec<Registration>) -> Self {
        let index = registrations
            .iter()
            .enumerate()
            .map(|(i, registration)| (registration.id, i))
            .collect();
        let slots = registrations
            .into_iter()
            .map(|registration| Slot {
                registration,
                module: OnceCell::new(),
            })
            .collect();
        Self {
            slots,
            index,
            constructions: AtomicUsize::new(0),
        }
    }

    /// Shared process-wide registry
    pub fn global() -> Arc<Registry> {
        let guard = GLOBAL.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the process-wide registry with a fresh one. Handles obtained
    /// earlier keep their old instance.
    pub fn rebuild_global() {
        let mut guard = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(Registry::builtin());
        info!("global calculation registry rebuilt");
    }

    fn slot(&self, id: &str) -> CalcResult<&Slot> {
        self.index
            .get(id)
            .map(|&i| &self.slots[i])
            .ok_or_else(|| CalcError::unknown_calculation(id))
    }

    /// Module for `id`, constructed on first use.
    pub fn get(&self, id: &str) -> CalcResult<Arc<dyn CalculationModule>> {
        let slot = self.slot(id)?;
        let module = slot.module.get_or_init(|| {
            self.constructions.fetch_add(1, Ordering::SeqCst);
            debug!(calculation = slot.registration.id, "constructing calculation module");
            (slot.registration.construct)()
        });
        Ok(Arc::clone(module))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Whether `id` has been constructed
    pub fn is_loaded(&self, id: &str) -> bool {
        self.slot(id).is_ok_and(|slot| slot.module.get().is_some())
    }

    /// Registered ids in table order
    pub fn ids(&self) -> Vec<&'static str> {
        self.slots.iter().map(|slot| slot.registration.id).collect()
    }

    pub fn registrations(&self) -> impl Iterator<Item = &Registration> {
        self.slots.iter().map(|slot| &slot.registration)
    }

    /// Number of module constructions performed so far
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }

    /// Drop every cached module so the next lookup constructs again.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.module.take();
        }
        self.constructions.store(0, Ordering::SeqCst);
    }

    /// Manifest of every registered calculation, grouped by category in
    /// first-appearance order.
    pub fn manifest(&self) -> Manifest {
        let mut nodes: Vec<ManifestNode> = Vec::new();
        for registration in self.registrations() {
            let entry = ManifestEntry {
                id: registration.id.to_string(),
                path: Some(format!("{}/{}", registration.category, registration.id)),
            };
            match nodes.iter_mut().find(|node| node.name == registration.category) {
                Some(node) => node.calculations.push(entry),
                None => nodes.push(ManifestNode {
                    name: registration.category.to_string(),
                    calculations: vec![entry],
                }),
            }
        }
        Manifest { nodes }
    }

    /// Category tree with titles and descriptions. Loads every module.
    pub fn catalog(&self) -> CalcResult<Catalog> {
        let mut catalog: Catalog = Vec::new();
        for registration in self.registrations() {
            let module = self.get(registration.id)?;
            let config = module.config();
            let entry = CatalogEntry {
                id: registration.id.to_string(),
                title: config.name.clone(),
                description: config.description.clone(),
            };
            match catalog.iter_mut().find(|c| c.id == registration.category) {
                Some(category) => category.calculations.push(entry),
                None => catalog.push(CatalogCategory {
                    id: registration.category.to_string(),
                    title: category_title(registration.category),
                    calculations: vec![entry],
                }),
            }
        }
        Ok(catalog)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("ids", &self.ids())
            .field("constructions", &self.constructions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_are_unique() {
        assert!(Registry::from_registrations(BUILTIN.to_vec()).is_ok());
    }

    #[test]
    fn test_registration_category_matches_config() {
        let registry = Registry::builtin();
        for registration in registry.registrations() {
            let module = registry.get(registration.id).unwrap();
            assert_eq!(module.id(), registration.id);
            assert_eq!(module.config().category, registration.category);
        }
    }

    #[test]
    fn test_lazy_construction() {
        let registry = Registry::builtin();
        assert_eq!(registry.constructions(), 0);
        assert!(!registry.is_loaded(pipe_mass::ID));

        let first = registry.get(pipe_mass::ID).unwrap();
        let second = registry.get(pipe_mass::ID).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.constructions(), 1);
        assert!(registry.is_loaded(pipe_mass::ID));
    }

    #[test]
    fn test_unknown_id() {
        let registry = Registry::builtin();
        let err = registry.get("heat_exchanger_area").err().unwrap();
        assert_eq!(err, CalcError::unknown_calculation("heat_exchanger_area"));
        assert!(!registry.contains("heat_exchanger_area"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut table = BUILTIN.to_vec();
        table.push(BUILTIN[0]);
        assert!(Registry::from_registrations(table).is_err());
    }

    #[test]
    fn test_manifest_groups_by_category() {
        let manifest = Registry::builtin().manifest();
        let names: Vec<&str> = manifest.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "hydraulic_calculations",
                "stress_calculations",
                "technological_calculations",
                "thermal_calculations"
            ]
        );
        assert_eq!(manifest.len(), 6);
        assert_eq!(
            manifest.nodes[0].calculations[0].path.as_deref(),
            Some("hydraulic_calculations/pipe_flow_resistance")
        );
    }

    #[test]
    fn test_catalog() {
        let catalog = Registry::builtin().catalog().unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog[2].title, "Technological Calculations");
        assert_eq!(catalog[2].calculations[0].title, "Velocity in Pipelines");
    }
}
