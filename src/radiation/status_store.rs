use super::{GlobalRadiationFieldStatus, RadiationFieldType};
use crate::host::BodyId;
use crate::persistence::ConfigNode;
use crate::{event, info, warn};
use std::collections::{BTreeMap, btree_map::Entry};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// One-time notification that a radiation field of a body has been researched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldResearched {
    pub body: BodyId,
    pub field: RadiationFieldType,
}

impl FieldResearched {
    /// Player facing message text for this discovery.
    pub fn message(&self, body_name: &str) -> String {
        format!(
            "{body_name}: {} researched\n\nThe radiation field has been charted and is now shown on the map.",
            self.field
        )
    }
}

/// Outcome of a visibility request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityChange {
    /// The field went from hidden to visible and a notification was sent.
    Revealed,
    /// The field already was in the requested state.
    Unchanged,
    /// A visible field was asked to hide again, which only a reload may do.
    Refused,
}

/// Owner of every body's [`GlobalRadiationFieldStatus`].
///
/// Statuses are created on first access. Revealing a field sends exactly one
/// [`FieldResearched`] through the channel returned by [`RadiationFieldStatusStore::new`].
pub struct RadiationFieldStatusStore {
    /// Statuses by body, ordered for a stable save layout.
    body_data: BTreeMap<BodyId, GlobalRadiationFieldStatus>,
    /// Discovery notification channel.
    notifier: UnboundedSender<FieldResearched>,
}

impl RadiationFieldStatusStore {
    /// Name of the node holding all saved bodies.
    pub const BODY_DATA_NODE: &'static str = "BodyData";
    /// Name of the node holding one saved body.
    pub const BODY_NODE: &'static str = "GlobalBodyData";

    /// Creates an empty store and the receiving end of its notifications.
    pub fn new() -> (Self, UnboundedReceiver<FieldResearched>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { body_data: BTreeMap::new(), notifier: tx }, rx)
    }

    /// Returns the status of `body`, creating a default one if none exists.
    pub fn get_or_create(&mut self, body: BodyId) -> &GlobalRadiationFieldStatus {
        self.entry(body)
    }

    pub fn get(&self, body: BodyId) -> Option<&GlobalRadiationFieldStatus> { self.body_data.get(&body) }

    pub fn len(&self) -> usize { self.body_data.len() }

    pub fn is_empty(&self) -> bool { self.body_data.is_empty() }

    /// All tracked statuses in ascending body order.
    pub fn iter(&self) -> impl Iterator<Item = &GlobalRadiationFieldStatus> { self.body_data.values() }

    /// Requests a visibility state for one field of a body.
    ///
    /// Hidden to visible reveals the field and notifies once. Requests for
    /// the current state are no-ops. Hiding a visible field is refused.
    pub fn set_visible(&mut self, body: BodyId, field: RadiationFieldType, visible: bool) -> VisibilityChange {
        event!("Setting visibility for {field} of {body} to {visible}");
        let status = self.entry(body);
        match (status.is_visible(field), visible) {
            (false, true) => {
                status.reveal(field);
                info!("{field} of {body} researched.");
                if self.notifier.send(FieldResearched { body, field }).is_err() {
                    event!("No listener for research notifications, dropping {field} of {body}.");
                }
                VisibilityChange::Revealed
            }
            (true, false) => {
                warn!("Refusing to hide already researched {field} of {body}.");
                VisibilityChange::Refused
            }
            _ => VisibilityChange::Unchanged,
        }
    }

    /// Counts a crossing of a field boundary and returns the new total.
    pub fn record_crossing(&mut self, body: BodyId, field: RadiationFieldType) -> u32 {
        self.entry(body).count_crossing(field)
    }

    /// Drops every tracked status.
    pub fn clear(&mut self) { self.body_data.clear(); }

    /// Replaces the whole store with the bodies saved under `node`.
    ///
    /// Bodies without a usable index are skipped, duplicate indices keep the
    /// first occurrence. Never sends notifications.
    pub fn load(&mut self, node: &ConfigNode) {
        self.body_data.clear();
        let Some(bodies) = node.node(Self::BODY_DATA_NODE) else { return };
        for body_node in bodies.nodes() {
            match GlobalRadiationFieldStatus::from_node(body_node) {
                Ok(status) => match self.body_data.entry(status.index()) {
                    Entry::Vacant(slot) => {
                        slot.insert(status);
                    }
                    Entry::Occupied(_) => {
                        warn!("Duplicate saved radiation status for {}, keeping the first.", status.index());
                    }
                },
                Err(e) => warn!("Skipping saved radiation status: {e}"),
            }
        }
        event!("Loaded radiation field status of {} bodies.", self.body_data.len());
    }

    /// Writes every tracked body into a `BodyData` child of `node`.
    pub fn save(&self, node: &mut ConfigNode) {
        let bodies = node.add_node(Self::BODY_DATA_NODE);
        for status in self.body_data.values() {
            status.save(bodies.add_node(Self::BODY_NODE));
        }
    }

    fn entry(&mut self, body: BodyId) -> &mut GlobalRadiationFieldStatus {
        self.body_data.entry(body).or_insert_with(|| GlobalRadiationFieldStatus::new(body))
    }
}
