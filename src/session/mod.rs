use crate::config::{Configuration, ConfigurationError};
use crate::equipment::EquipmentStateTracker;
use crate::evaluation::EvaluatorSelector;
use crate::host::{BodyId, ObservationHost, RadiationFieldHost};
use crate::persistence::{ConfigNode, PersistenceFormatError};
use crate::radiation::{FieldResearched, RadiationFieldStatusStore, RadiationFieldType, VisibilityChange};
use crate::scheduling::{ObservationPassReport, SunObservationScheduler};
use crate::{error, event, info};
use std::sync::Arc;
use std::time::Duration;
use strum::IntoEnumIterator;
use tokio::sync::mpsc::UnboundedReceiver;

#[cfg(test)]
mod tests;

/// Progress of pushing saved field visibility into the host after a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldVisibilityInit {
    /// Waiting for the first update after construction or load.
    Pending,
    /// Due at the contained host time.
    Scheduled(Duration),
    Done,
}

/// One game session: owns the radiation field store, the equipment states,
/// the evaluator choice and the sun observation scheduler.
///
/// Created once the startup configuration is known and reset through
/// [`ObservatorySession::on_load`] whenever the host reloads its state.
pub struct ObservatorySession {
    config: Option<Arc<Configuration>>,
    evaluators: EvaluatorSelector,
    store: RadiationFieldStatusStore,
    equipment: EquipmentStateTracker,
    /// `None` when the configuration could not be loaded.
    scheduler: Option<SunObservationScheduler>,
    field_init: FieldVisibilityInit,
}

impl ObservatorySession {
    /// Host time to wait after a load before the host radiation model
    /// receives the saved field visibility.
    pub const FIELD_INIT_DELAY: Duration = Duration::from_secs(5);

    /// Creates a session and the receiver of its research notifications.
    ///
    /// A configuration error disables sun observation for the whole session
    /// and is reported once here. Everything else keeps working.
    pub fn new(
        config: Result<Configuration, ConfigurationError>,
        evaluators: EvaluatorSelector,
    ) -> (Self, UnboundedReceiver<FieldResearched>) {
        let shared = match config {
            Ok(c) => Some(Arc::new(c)),
            Err(e) => {
                error!("Configuration unusable ({e}), solar surface observation is disabled.");
                None
            }
        };
        let scheduler = shared.as_ref().map(|c| SunObservationScheduler::new(Arc::clone(c), Duration::ZERO));
        let (store, rx) = RadiationFieldStatusStore::new();
        (
            Self {
                config: shared,
                evaluators,
                store,
                equipment: EquipmentStateTracker::new(),
                scheduler,
                field_init: FieldVisibilityInit::Pending,
            },
            rx,
        )
    }

    pub fn config(&self) -> Option<&Configuration> { self.config.as_deref() }

    pub fn is_observation_enabled(&self) -> bool { self.scheduler.is_some() }

    pub fn is_field_visibility_initialized(&self) -> bool { self.field_init == FieldVisibilityInit::Done }

    pub fn store(&self) -> &RadiationFieldStatusStore { &self.store }

    pub fn equipment(&self) -> &EquipmentStateTracker { &self.equipment }

    /// Equipment states, to be fed by the host's equipment events.
    pub fn equipment_mut(&mut self) -> &mut EquipmentStateTracker { &mut self.equipment }

    pub fn evaluators(&self) -> &EvaluatorSelector { &self.evaluators }

    /// Host update callback.
    ///
    /// Handles the deferred field visibility push and ticks the sun
    /// observation scheduler.
    ///
    /// # Returns
    /// The report of the observation pass if one ran during this update.
    pub fn update<H>(&mut self, now: Duration, host: &mut H) -> Option<ObservationPassReport>
    where
        H: ObservationHost + RadiationFieldHost,
    {
        match self.field_init {
            FieldVisibilityInit::Pending => {
                self.field_init = FieldVisibilityInit::Scheduled(now + Self::FIELD_INIT_DELAY);
            }
            FieldVisibilityInit::Scheduled(due) if now >= due => {
                self.init_field_visibility(host);
                self.field_init = FieldVisibilityInit::Done;
            }
            _ => {}
        }
        self.scheduler.as_mut()?.tick(now, &self.evaluators, &self.equipment, host)
    }

    /// Requests visibility of a field and forwards the resulting state to
    /// the host radiation model.
    pub fn set_field_visible<H: RadiationFieldHost>(
        &mut self,
        body: BodyId,
        field: RadiationFieldType,
        visible: bool,
        host: &mut H,
    ) -> VisibilityChange {
        let change = self.store.set_visible(body, field, visible);
        let now_visible = self.store.get_or_create(body).is_visible(field);
        host.set_field_visible(body, field, now_visible);
        change
    }

    /// Counts a crossing of a field boundary by any vessel.
    pub fn record_crossing(&mut self, body: BodyId, field: RadiationFieldType) -> u32 {
        self.store.record_crossing(body, field)
    }

    /// Replaces all session state with the saved content of `node`.
    pub fn on_load(&mut self, node: &ConfigNode) {
        self.field_init = FieldVisibilityInit::Pending;
        self.evaluators.clear();
        self.store.load(node);
        self.equipment.load(node);
        info!(
            "Session loaded: {} bodies with radiation status, {} vessels with equipment.",
            self.store.len(),
            self.equipment.len()
        );
    }

    /// Writes all persistent session state into `node`.
    pub fn on_save(&self, node: &mut ConfigNode) {
        self.store.save(node);
        self.equipment.save(node);
    }

    /// Parses saved text and loads it, see [`ObservatorySession::on_load`].
    ///
    /// # Errors
    /// Returns the parse error and leaves the session untouched if the text is malformed.
    pub fn load_text(&mut self, text: &str) -> Result<(), PersistenceFormatError> {
        let node = ConfigNode::parse(text).inspect_err(|e| error!("Saved session unreadable: {e}"))?;
        self.on_load(&node);
        Ok(())
    }

    /// Renders the persistent session state as text.
    pub fn save_text(&self) -> String {
        let mut node = ConfigNode::default();
        self.on_save(&mut node);
        node.to_text()
    }

    fn init_field_visibility<H: RadiationFieldHost>(&mut self, host: &mut H) {
        let hide = self.config.as_ref().is_none_or(|c| c.hide_radiation_belts());
        let reveal_all = host.is_sandbox() || !hide;
        let bodies = host.bodies();
        for body in &bodies {
            let status = self.store.get_or_create(*body).clone();
            for field in RadiationFieldType::iter() {
                host.set_field_visible(*body, field, reveal_all || status.is_visible(field));
            }
        }
        event!("Radiation field visibility pushed for {} bodies.", bodies.len());
    }
}
