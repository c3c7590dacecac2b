use crate::event;
use crate::host::{BodyId, StockEphemeris, VesselId};
use crate::util::Vec3D;
use std::cell::OnceCell;
use std::sync::Arc;

/// Position query backend for bodies and vessels at an arbitrary universal time.
pub trait UniverseEvaluator {
    /// Short backend name for log output.
    fn name(&self) -> &str;
    fn body_position(&self, body: BodyId, ut: f64) -> Vec3D<f64>;
    fn vessel_position(&self, vessel: VesselId, ut: f64) -> Option<Vec3D<f64>>;
}

/// Optional high precision orbital mechanics backend registered by the host.
pub trait ExternalEvaluatorProvider {
    /// Probes for the backend. `None` is a normal answer when it is not installed.
    fn universe_evaluator(&self) -> Option<Arc<dyn UniverseEvaluator>>;
}

/// Evaluator delegating to the host's built-in ephemeris.
pub struct StockUniverseEvaluator {
    ephemeris: Arc<dyn StockEphemeris>,
}

impl StockUniverseEvaluator {
    pub fn new(ephemeris: Arc<dyn StockEphemeris>) -> Self { Self { ephemeris } }
}

impl UniverseEvaluator for StockUniverseEvaluator {
    fn name(&self) -> &str { "stock" }

    fn body_position(&self, body: BodyId, ut: f64) -> Vec3D<f64> { self.ephemeris.body_position(body, ut) }

    fn vessel_position(&self, vessel: VesselId, ut: f64) -> Option<Vec3D<f64>> {
        self.ephemeris.vessel_position(vessel, ut)
    }
}

/// Chooses between the external and the stock evaluator once and keeps the
/// choice until [`EvaluatorSelector::clear`] is called on a state reload.
pub struct EvaluatorSelector {
    /// Fallback ephemeris of the host.
    stock: Arc<dyn StockEphemeris>,
    /// Registered external backend, if any.
    external: Option<Box<dyn ExternalEvaluatorProvider>>,
    /// Memoized selection.
    selected: OnceCell<Arc<dyn UniverseEvaluator>>,
}

impl EvaluatorSelector {
    pub fn new(stock: Arc<dyn StockEphemeris>, external: Option<Box<dyn ExternalEvaluatorProvider>>) -> Self {
        Self { stock, external, selected: OnceCell::new() }
    }

    /// Creates a selector that can only ever choose the stock evaluator.
    pub fn stock_only(stock: Arc<dyn StockEphemeris>) -> Self { Self::new(stock, None) }

    /// Returns the selected evaluator, probing the external provider on the
    /// first call only.
    pub fn get(&self) -> Arc<dyn UniverseEvaluator> {
        Arc::clone(self.selected.get_or_init(|| {
            let external = self.external.as_ref().and_then(|p| p.universe_evaluator());
            if let Some(evaluator) = external {
                event!("Using {} universe evaluator.", evaluator.name());
                evaluator
            } else {
                event!("No external universe evaluator available, falling back to stock.");
                let stock: Arc<dyn UniverseEvaluator> =
                    Arc::new(StockUniverseEvaluator::new(Arc::clone(&self.stock)));
                stock
            }
        }))
    }

    /// `true` once a backend has been chosen.
    pub fn is_selected(&self) -> bool { self.selected.get().is_some() }

    /// Forgets the current choice, the next [`EvaluatorSelector::get`] probes again.
    pub fn clear(&mut self) { self.selected.take(); }
}
