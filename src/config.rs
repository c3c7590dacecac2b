use crate::persistence::{ConfigNode, PersistenceFormatError};
use strum_macros::Display;

/// Startup configuration, loaded once and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// Half-angle in radians of the surface cap an observer can resolve
    /// around its own sub-point.
    min_sun_observation_angle: f64,
    /// Equipment id of the sun observation instrument.
    sun_observation_equipment: String,
    /// Whether radiation fields start hidden until researched.
    hide_radiation_belts: bool,
    /// Number of patches the solar surface is discretized into.
    surface_patch_count: usize,
}

/// Errors raised while loading the startup configuration.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A required key is absent.
    #[strum(to_string = "missing configuration value {0}")]
    MissingValue(String),
    /// A key is present but its value is unusable.
    #[strum(to_string = "malformed configuration value {0}")]
    MalformedValue(String),
    /// The configuration text itself could not be parsed.
    #[strum(to_string = "configuration syntax error: {0}")]
    Syntax(PersistenceFormatError),
}

impl std::error::Error for ConfigurationError {}

impl From<PersistenceFormatError> for ConfigurationError {
    fn from(value: PersistenceFormatError) -> Self {
        match value {
            PersistenceFormatError::MalformedValue(key) => ConfigurationError::MalformedValue(key),
            other => ConfigurationError::Syntax(other),
        }
    }
}

impl Configuration {
    pub const KEY_MIN_SUN_OBSERVATION_ANGLE: &'static str = "min_sun_observation_angle";
    pub const KEY_SUN_OBSERVATION_EQUIPMENT: &'static str = "sun_observation_equipment";
    pub const KEY_HIDE_RADIATION_BELTS: &'static str = "hide_radiation_belts";
    pub const KEY_SURFACE_PATCH_COUNT: &'static str = "surface_patch_count";
    /// Patch count used when the configuration does not name one.
    pub const DEFAULT_SURFACE_PATCH_COUNT: usize = 64;

    /// Creates a configuration from explicit values.
    ///
    /// # Errors
    /// * `MalformedValue` if the angle is not finite or negative, the
    ///   equipment id is empty, or the patch count is zero.
    pub fn new(
        min_sun_observation_angle: f64,
        sun_observation_equipment: &str,
        hide_radiation_belts: bool,
        surface_patch_count: usize,
    ) -> Result<Self, ConfigurationError> {
        if !min_sun_observation_angle.is_finite() || min_sun_observation_angle < 0.0 {
            return Err(ConfigurationError::MalformedValue(
                Self::KEY_MIN_SUN_OBSERVATION_ANGLE.to_string(),
            ));
        }
        if sun_observation_equipment.trim().is_empty() {
            return Err(ConfigurationError::MalformedValue(
                Self::KEY_SUN_OBSERVATION_EQUIPMENT.to_string(),
            ));
        }
        if surface_patch_count == 0 {
            return Err(ConfigurationError::MalformedValue(
                Self::KEY_SURFACE_PATCH_COUNT.to_string(),
            ));
        }
        Ok(Self {
            min_sun_observation_angle,
            sun_observation_equipment: sun_observation_equipment.trim().to_string(),
            hide_radiation_belts,
            surface_patch_count,
        })
    }

    /// Reads the configuration from a node holding the configuration keys.
    ///
    /// # Errors
    /// * `MissingValue` for an absent angle or equipment id.
    /// * `MalformedValue` for values that cannot be read or fail validation.
    pub fn from_node(node: &ConfigNode) -> Result<Self, ConfigurationError> {
        let angle = node
            .read_value::<f64>(Self::KEY_MIN_SUN_OBSERVATION_ANGLE)?
            .ok_or_else(|| ConfigurationError::MissingValue(Self::KEY_MIN_SUN_OBSERVATION_ANGLE.to_string()))?;
        let equipment = node
            .read_value::<String>(Self::KEY_SUN_OBSERVATION_EQUIPMENT)?
            .ok_or_else(|| ConfigurationError::MissingValue(Self::KEY_SUN_OBSERVATION_EQUIPMENT.to_string()))?;
        let hide = node.read_value::<bool>(Self::KEY_HIDE_RADIATION_BELTS)?.unwrap_or(true);
        let patches = node
            .read_value::<usize>(Self::KEY_SURFACE_PATCH_COUNT)?
            .unwrap_or(Self::DEFAULT_SURFACE_PATCH_COUNT);
        Self::new(angle, &equipment, hide, patches)
    }

    /// Parses configuration text. The keys are looked up on the root first
    /// and otherwise on the first top level node that carries them.
    ///
    /// # Errors
    /// `Syntax` if the text is malformed, otherwise as [`Configuration::from_node`].
    pub fn parse(text: &str) -> Result<Self, ConfigurationError> {
        let root = ConfigNode::parse(text)?;
        let holder = if root.has_value(Self::KEY_MIN_SUN_OBSERVATION_ANGLE) {
            &root
        } else {
            root.nodes()
                .iter()
                .find(|n| n.has_value(Self::KEY_MIN_SUN_OBSERVATION_ANGLE))
                .unwrap_or(&root)
        };
        Self::from_node(holder)
    }

    pub fn min_sun_observation_angle(&self) -> f64 { self.min_sun_observation_angle }

    pub fn sun_observation_equipment(&self) -> &str { &self.sun_observation_equipment }

    pub fn hide_radiation_belts(&self) -> bool { self.hide_radiation_belts }

    pub fn surface_patch_count(&self) -> usize { self.surface_patch_count }
}

#[cfg(test)]
mod tests {
    use super::{Configuration, ConfigurationError};
    use crate::persistence::PersistenceFormatError;

    #[test]
    fn test_parse_nested_config() {
        let text = "\
HELIOSCOPE
{
    min_sun_observation_angle = 0.5
    sun_observation_equipment = SunObservation
    surface_patch_count = 32
}
";
        let config = Configuration::parse(text).unwrap();
        assert!((config.min_sun_observation_angle() - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.sun_observation_equipment(), "SunObservation");
        assert!(config.hide_radiation_belts());
        assert_eq!(config.surface_patch_count(), 32);
    }

    #[test]
    fn test_missing_and_malformed_values() {
        assert_eq!(
            Configuration::parse("sun_observation_equipment = x\n"),
            Err(ConfigurationError::MissingValue("min_sun_observation_angle".to_string()))
        );
        assert_eq!(
            Configuration::parse("min_sun_observation_angle = wide\nsun_observation_equipment = x\n"),
            Err(ConfigurationError::MalformedValue("min_sun_observation_angle".to_string()))
        );
        assert_eq!(
            Configuration::parse("min_sun_observation_angle = 0.2\n"),
            Err(ConfigurationError::MissingValue("sun_observation_equipment".to_string()))
        );
        assert_eq!(
            Configuration::parse("min_sun_observation_angle = 0.2\nsun_observation_equipment = x\nsurface_patch_count = 0\n"),
            Err(ConfigurationError::MalformedValue("surface_patch_count".to_string()))
        );
        assert_eq!(
            Configuration::parse("A\n{\n"),
            Err(ConfigurationError::Syntax(PersistenceFormatError::UnbalancedBrace(2)))
        );
    }

    #[test]
    fn test_error_display_names_key() {
        let missing = Configuration::parse("min_sun_observation_angle = 0.2\n").unwrap_err();
        assert_eq!(missing.to_string(), "missing configuration value sun_observation_equipment");
        let syntax = Configuration::parse("A\n{\n").unwrap_err();
        assert_eq!(syntax.to_string(), "configuration syntax error: unbalanced brace on line 2");
    }
}
