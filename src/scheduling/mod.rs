mod sun_observation;

pub use sun_observation::{ObservationPassReport, SunObservationScheduler};
