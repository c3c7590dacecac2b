use super::RadiationFieldType;
use crate::host::BodyId;
use crate::persistence::{ConfigNode, PersistenceFormatError};
use crate::warn;
use strum::IntoEnumIterator;

/// Research progress on the radiation fields of one body.
///
/// Visibility flags only ever go from hidden to visible at runtime, crossing
/// counters only grow. Both are reset solely by reloading a saved state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalRadiationFieldStatus {
    /// Index of the body this status belongs to.
    index: BodyId,
    inner_visible: bool,
    outer_visible: bool,
    pause_visible: bool,
    inner_crossings: u32,
    outer_crossings: u32,
    magneto_crossings: u32,
}

impl GlobalRadiationFieldStatus {
    const INDEX_KEY: &'static str = "index";

    /// Creates a status with every field hidden and no crossings.
    pub fn new(index: BodyId) -> Self {
        Self {
            index,
            inner_visible: false,
            outer_visible: false,
            pause_visible: false,
            inner_crossings: 0,
            outer_crossings: 0,
            magneto_crossings: 0,
        }
    }

    pub fn index(&self) -> BodyId { self.index }

    pub fn is_visible(&self, field: RadiationFieldType) -> bool {
        match field {
            RadiationFieldType::InnerBelt => self.inner_visible,
            RadiationFieldType::OuterBelt => self.outer_visible,
            RadiationFieldType::Magnetopause => self.pause_visible,
        }
    }

    pub fn crossings(&self, field: RadiationFieldType) -> u32 {
        match field {
            RadiationFieldType::InnerBelt => self.inner_crossings,
            RadiationFieldType::OuterBelt => self.outer_crossings,
            RadiationFieldType::Magnetopause => self.magneto_crossings,
        }
    }

    /// Marks a field as visible. Returns `true` if it was hidden before.
    pub(super) fn reveal(&mut self, field: RadiationFieldType) -> bool {
        let flag = match field {
            RadiationFieldType::InnerBelt => &mut self.inner_visible,
            RadiationFieldType::OuterBelt => &mut self.outer_visible,
            RadiationFieldType::Magnetopause => &mut self.pause_visible,
        };
        let was_hidden = !*flag;
        *flag = true;
        was_hidden
    }

    /// Counts one more crossing of a field and returns the new total.
    pub(super) fn count_crossing(&mut self, field: RadiationFieldType) -> u32 {
        let counter = match field {
            RadiationFieldType::InnerBelt => &mut self.inner_crossings,
            RadiationFieldType::OuterBelt => &mut self.outer_crossings,
            RadiationFieldType::Magnetopause => &mut self.magneto_crossings,
        };
        *counter = counter.saturating_add(1);
        *counter
    }

    /// Restores a status from its saved node.
    ///
    /// Missing or malformed flags and counters fall back to their defaults,
    /// unknown keys are ignored.
    ///
    /// # Errors
    /// * `MalformedValue("index")` if the node has no usable non-negative index.
    pub fn from_node(node: &ConfigNode) -> Result<Self, PersistenceFormatError> {
        let Ok(Some(index)) = node.read_value::<u32>(Self::INDEX_KEY) else {
            return Err(PersistenceFormatError::MalformedValue(Self::INDEX_KEY.to_string()));
        };
        let mut status = Self::new(BodyId(index));
        for field in RadiationFieldType::iter() {
            match node.read_value::<bool>(field.visible_key()) {
                Ok(Some(true)) => {
                    status.reveal(field);
                }
                Ok(_) => {}
                Err(e) => warn!("Saved status of body {index}: {e}, keeping {field} hidden."),
            }
            match node.read_value::<u32>(field.crossings_key()) {
                Ok(Some(count)) => status.set_crossings(field, count),
                Ok(None) => {}
                Err(e) => warn!("Saved status of body {index}: {e}, resetting {field} crossings."),
            }
        }
        Ok(status)
    }

    /// Writes every flag, counter and the index into `node`.
    pub fn save(&self, node: &mut ConfigNode) {
        for field in RadiationFieldType::iter() {
            node.add_value(field.visible_key(), self.is_visible(field));
        }
        for field in RadiationFieldType::iter() {
            node.add_value(field.crossings_key(), self.crossings(field));
        }
        node.add_value(Self::INDEX_KEY, self.index.index());
    }

    fn set_crossings(&mut self, field: RadiationFieldType, count: u32) {
        match field {
            RadiationFieldType::InnerBelt => self.inner_crossings = count,
            RadiationFieldType::OuterBelt => self.outer_crossings = count,
            RadiationFieldType::Magnetopause => self.magneto_crossings = count,
        }
    }
}
