use strum_macros::{Display, EnumIter};

/// Kinds of radiation fields a body can have.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Display, EnumIter)]
pub enum RadiationFieldType {
    #[strum(to_string = "Inner Belt")]
    InnerBelt,
    #[strum(to_string = "Outer Belt")]
    OuterBelt,
    #[strum(to_string = "Magnetopause")]
    Magnetopause,
}

impl RadiationFieldType {
    /// Key of the persisted visibility flag.
    pub fn visible_key(self) -> &'static str {
        match self {
            RadiationFieldType::InnerBelt => "inner_visible",
            RadiationFieldType::OuterBelt => "outer_visible",
            RadiationFieldType::Magnetopause => "pause_visible",
        }
    }

    /// Key of the persisted crossing counter.
    pub fn crossings_key(self) -> &'static str {
        match self {
            RadiationFieldType::InnerBelt => "inner_crossings",
            RadiationFieldType::OuterBelt => "outer_crossings",
            RadiationFieldType::Magnetopause => "magneto_crossings",
        }
    }
}
