//! Solar storm observation coverage and radiation field research tracking
//! for a spaceflight simulation host.
#![allow(clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
pub mod logger;

pub mod config;
pub mod equipment;
pub mod evaluation;
pub mod host;
pub mod persistence;
pub mod radiation;
pub mod scheduling;
pub mod session;
pub mod surface;
pub mod util;

pub use config::{Configuration, ConfigurationError};
pub use host::{BodyId, VesselId};
pub use radiation::{FieldResearched, RadiationFieldType, VisibilityChange};
pub use session::ObservatorySession;
