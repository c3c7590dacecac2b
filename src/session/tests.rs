use super::ObservatorySession;
use crate::config::{Configuration, ConfigurationError};
use crate::equipment::EquipmentState;
use crate::evaluation::{EvaluatorSelector, ExternalEvaluatorProvider, UniverseEvaluator};
use crate::host::{BodyId, ObservationHost, RadiationFieldHost, StockEphemeris, VesselId};
use crate::radiation::{FieldResearched, RadiationFieldType, VisibilityChange};
use crate::util::Vec3D;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const SUN_OBS: &str = "sunObservation";
const SUN: BodyId = BodyId(0);
const HOME: BodyId = BodyId(1);
const MOON: BodyId = BodyId(3);

struct Ephemeris;

impl StockEphemeris for Ephemeris {
    fn body_position(&self, _body: BodyId, _ut: f64) -> Vec3D<f64> { Vec3D::zero() }

    fn vessel_position(&self, vessel: VesselId, _ut: f64) -> Option<Vec3D<f64>> {
        #[allow(clippy::cast_precision_loss)]
        let offset = vessel.0 as f64;
        Some(Vec3D::new(1.0e9, offset, 0.0))
    }
}

struct NoExternal {
    probes: Arc<AtomicUsize>,
}

impl ExternalEvaluatorProvider for NoExternal {
    fn universe_evaluator(&self) -> Option<Arc<dyn UniverseEvaluator>> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        None
    }
}

#[derive(Default)]
struct Host {
    sandbox: bool,
    field_visibility: HashMap<(BodyId, RadiationFieldType), bool>,
    qualities: Vec<(BodyId, f32)>,
}

impl ObservationHost for Host {
    fn vessel_star(&self, _vessel: VesselId) -> Option<BodyId> { Some(SUN) }

    fn body_name(&self, body: BodyId) -> String { format!("Body {}", body.0) }

    fn universal_time(&self) -> f64 { 0.0 }

    fn set_storm_observation_quality(&mut self, star: BodyId, quality: f32) { self.qualities.push((star, quality)); }
}

impl RadiationFieldHost for Host {
    fn bodies(&self) -> Vec<BodyId> { vec![SUN, HOME, MOON] }

    fn is_sandbox(&self) -> bool { self.sandbox }

    fn set_field_visible(&mut self, body: BodyId, field: RadiationFieldType, visible: bool) {
        self.field_visibility.insert((body, field), visible);
    }
}

fn config(hide: bool) -> Result<Configuration, ConfigurationError> {
    Configuration::new(0.6, SUN_OBS, hide, Configuration::DEFAULT_SURFACE_PATCH_COUNT)
}

fn session(
    config: Result<Configuration, ConfigurationError>,
) -> (ObservatorySession, tokio::sync::mpsc::UnboundedReceiver<FieldResearched>, Arc<AtomicUsize>) {
    let probes = Arc::new(AtomicUsize::new(0));
    let selector = EvaluatorSelector::new(
        Arc::new(Ephemeris),
        Some(Box::new(NoExternal { probes: Arc::clone(&probes) })),
    );
    let (session, rx) = ObservatorySession::new(config, selector);
    (session, rx, probes)
}

#[test]
fn test_field_visibility_pushed_after_delay() {
    let (mut session, mut rx, _) = session(config(true));
    let mut host = Host::default();
    session.set_field_visible(MOON, RadiationFieldType::OuterBelt, true, &mut host);
    assert!(rx.try_recv().is_ok());
    host.field_visibility.clear();

    session.update(Duration::from_secs(100), &mut host);
    session.update(Duration::from_secs(104), &mut host);
    assert!(!session.is_field_visibility_initialized());
    assert!(host.field_visibility.is_empty());

    session.update(Duration::from_secs(105), &mut host);
    assert!(session.is_field_visibility_initialized());
    assert_eq!(host.field_visibility.len(), 9);
    assert!(host.field_visibility[&(MOON, RadiationFieldType::OuterBelt)]);
    assert!(!host.field_visibility[&(MOON, RadiationFieldType::InnerBelt)]);
    assert!(!host.field_visibility[&(HOME, RadiationFieldType::Magnetopause)]);
    assert_eq!(session.store().len(), 3);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_sandbox_and_unhidden_fields_are_all_visible() {
    for (sandbox, hide) in [(true, true), (false, false)] {
        let (mut session, mut rx, _) = session(config(hide));
        let mut host = Host { sandbox, ..Host::default() };
        session.update(Duration::ZERO, &mut host);
        session.update(ObservatorySession::FIELD_INIT_DELAY, &mut host);
        assert_eq!(host.field_visibility.len(), 9);
        assert!(host.field_visibility.values().all(|v| *v));
        assert!(rx.try_recv().is_err());
        assert!(!session.store().get(HOME).unwrap().is_visible(RadiationFieldType::InnerBelt));
    }
}

#[test]
fn test_set_field_visible_forwards_to_host() {
    let (mut session, mut rx, _) = session(config(true));
    let mut host = Host::default();
    let field = RadiationFieldType::InnerBelt;

    assert_eq!(session.set_field_visible(MOON, field, true, &mut host), VisibilityChange::Revealed);
    assert!(host.field_visibility[&(MOON, field)]);
    assert_eq!(rx.try_recv().unwrap(), FieldResearched { body: MOON, field });

    assert_eq!(session.set_field_visible(MOON, field, true, &mut host), VisibilityChange::Unchanged);
    assert_eq!(session.set_field_visible(MOON, field, false, &mut host), VisibilityChange::Refused);
    assert!(host.field_visibility[&(MOON, field)]);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_end_to_end_save_and_reload() {
    let (mut session, mut rx, _) = session(config(true));
    let mut host = Host::default();
    session.set_field_visible(MOON, RadiationFieldType::InnerBelt, true, &mut host);
    session.set_field_visible(MOON, RadiationFieldType::InnerBelt, true, &mut host);
    session.record_crossing(MOON, RadiationFieldType::Magnetopause);
    session.equipment_mut().update(VesselId(9), SUN_OBS, EquipmentState::Nominal);
    assert_eq!(rx.try_recv().unwrap(), FieldResearched { body: MOON, field: RadiationFieldType::InnerBelt });
    assert!(rx.try_recv().is_err());

    let saved = session.save_text();
    let (mut fresh, mut fresh_rx, _) = self::session(config(true));
    fresh.load_text(&saved).unwrap();
    assert_eq!(fresh.store().get(MOON), session.store().get(MOON));
    assert_eq!(fresh.equipment(), session.equipment());
    assert!(fresh_rx.try_recv().is_err());
}

#[test]
fn test_malformed_save_leaves_session_untouched() {
    let (mut session, _rx, _) = session(config(true));
    let mut host = Host::default();
    session.set_field_visible(HOME, RadiationFieldType::InnerBelt, true, &mut host);
    assert!(session.load_text("BodyData\n{\n").is_err());
    assert!(session.store().get(HOME).unwrap().is_visible(RadiationFieldType::InnerBelt));
}

#[test]
fn test_observation_runs_on_schedule() {
    let (mut session, _rx, probes) = session(config(true));
    let mut host = Host::default();
    session.equipment_mut().update(VesselId(1), SUN_OBS, EquipmentState::Nominal);

    assert!(session.update(Duration::from_secs(3), &mut host).is_none());
    let report = session.update(Duration::from_secs(10), &mut host).unwrap();
    assert_eq!(report.updated.len(), 1);
    assert!(session.update(Duration::from_secs(12), &mut host).is_none());
    assert!(session.update(Duration::from_secs(20), &mut host).is_some());
    assert_eq!(host.qualities.len(), 2);
    assert_eq!(probes.load(Ordering::SeqCst), 1);

    session.on_load(&crate::persistence::ConfigNode::default());
    assert!(!session.evaluators().is_selected());
    assert!(session.equipment().is_empty());
}

#[test]
fn test_configuration_error_disables_observation_only() {
    let (mut session, mut rx, _) =
        session(Err(ConfigurationError::MissingValue(Configuration::KEY_MIN_SUN_OBSERVATION_ANGLE.to_string())));
    let mut host = Host::default();
    assert!(!session.is_observation_enabled());
    assert!(session.config().is_none());
    session.equipment_mut().update(VesselId(1), SUN_OBS, EquipmentState::Nominal);

    for secs in [0, 5, 10, 30, 60] {
        assert!(session.update(Duration::from_secs(secs), &mut host).is_none());
    }
    assert!(host.qualities.is_empty());
    assert!(session.is_field_visibility_initialized());
    assert!(host.field_visibility.values().all(|v| !*v));

    session.set_field_visible(SUN, RadiationFieldType::Magnetopause, true, &mut host);
    assert!(rx.try_recv().is_ok());
}

#[test]
fn test_observation_resumes_after_reload_rewinds_clock() {
    let (mut session, _rx, _) = session(config(true));
    let mut host = Host::default();
    session.equipment_mut().update(VesselId(1), SUN_OBS, EquipmentState::Nominal);
    assert!(session.update(Duration::from_secs(5000), &mut host).is_some());

    let saved = session.save_text();
    session.load_text(&saved).unwrap();
    let mut passes = 0;
    for step in 2..400_u64 {
        if session.update(Duration::from_secs(step * 10), &mut host).is_some() {
            passes += 1;
        }
    }
    assert_eq!(passes, 398);
}
