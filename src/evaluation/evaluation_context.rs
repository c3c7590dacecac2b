use super::UniverseEvaluator;
use crate::host::{BodyId, VesselId};
use crate::util::Vec3D;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

/// Position queries pinned to one universal time.
///
/// Body positions are memoized for the lifetime of the context, so a context
/// must be built fresh for every observation pass.
pub struct EvaluationContext {
    evaluator: Arc<dyn UniverseEvaluator>,
    /// Body the evaluation is centered on.
    reference: Option<BodyId>,
    /// Universal time all queries resolve at.
    ut: f64,
    body_cache: RefCell<HashMap<BodyId, Vec3D<f64>>>,
}

impl EvaluationContext {
    pub fn new(evaluator: Arc<dyn UniverseEvaluator>, reference: Option<BodyId>, ut: f64) -> Self {
        Self { evaluator, reference, ut, body_cache: RefCell::new(HashMap::new()) }
    }

    pub fn time(&self) -> f64 { self.ut }

    pub fn reference_body(&self) -> Option<BodyId> { self.reference }

    pub fn evaluator_name(&self) -> &str { self.evaluator.name() }

    pub fn body_position(&self, body: BodyId) -> Vec3D<f64> {
        *self
            .body_cache
            .borrow_mut()
            .entry(body)
            .or_insert_with(|| self.evaluator.body_position(body, self.ut))
    }

    pub fn vessel_position(&self, vessel: VesselId) -> Option<Vec3D<f64>> {
        self.evaluator.vessel_position(vessel, self.ut)
    }

    /// Position relative to the reference body, or the world position if
    /// the context has no reference.
    pub fn relative_to_reference(&self, position: Vec3D<f64>) -> Vec3D<f64> {
        match self.reference {
            Some(body) => position - self.body_position(body),
            None => position,
        }
    }
}
