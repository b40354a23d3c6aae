//! Identity-tagged affordance sequences and the extraction/insertion steps
//! every move is built from.

use crate::affordance::{Access, Affordance, Affordances, Property};
use crate::core::types::{
    AffordanceKind, Direction, Entry, EntryId, Selection, SelectionEvent, StoreError,
};

/// Properties, actions and events in insertion order.
///
/// Elements are addressed by [`EntryId`]; positions are derived on demand and
/// shift whenever an earlier element is removed.
#[derive(Debug, Clone, Default)]
pub struct AffordanceCollection {
    properties: Vec<Entry<Property>>,
    actions: Vec<Entry<Affordance>>,
    events: Vec<Entry<Affordance>>,
    next_id: u64,
}

impl AffordanceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every sequence. Fresh ids continue from the current counter.
    pub fn replace(&mut self, affordances: Affordances) {
        let Affordances {
            properties,
            actions,
            events,
        } = affordances;
        let properties = properties.into_iter().map(|p| self.wrap(p)).collect();
        let actions = actions.into_iter().map(|a| self.wrap(a)).collect();
        let events = events.into_iter().map(|e| self.wrap(e)).collect();
        self.properties = properties;
        self.actions = actions;
        self.events = events;
    }

    pub fn properties(&self) -> &[Entry<Property>] {
        &self.properties
    }

    pub fn actions(&self) -> &[Entry<Affordance>] {
        &self.actions
    }

    pub fn events(&self) -> &[Entry<Affordance>] {
        &self.events
    }

    /// Strip identities, e.g. for export.
    pub fn to_affordances(&self) -> Affordances {
        Affordances {
            properties: self.properties.iter().map(|e| e.item.clone()).collect(),
            actions: self.actions.iter().map(|e| e.item.clone()).collect(),
            events: self.events.iter().map(|e| e.item.clone()).collect(),
        }
    }

    /// Current position of `id` in the sequence that holds `kind`.
    pub fn position(&self, kind: AffordanceKind, id: EntryId) -> Option<usize> {
        match kind {
            AffordanceKind::PropertyGet | AffordanceKind::PropertySet => {
                index_of(&self.properties, id)
            }
            AffordanceKind::Action => index_of(&self.actions, id),
            AffordanceKind::Event => index_of(&self.events, id),
        }
    }

    /// Resolve a positional address into a selection snapshot.
    pub(crate) fn locate(
        &self,
        kind: AffordanceKind,
        position: usize,
    ) -> Result<SelectionEvent, StoreError> {
        let out_of_range = |len| StoreError::PositionOutOfRange {
            kind,
            position,
            len,
        };
        let (id, affordance) = match kind {
            AffordanceKind::Action => {
                let entry = self
                    .actions
                    .get(position)
                    .ok_or_else(|| out_of_range(self.actions.len()))?;
                (entry.id, entry.item.clone())
            }
            AffordanceKind::Event => {
                let entry = self
                    .events
                    .get(position)
                    .ok_or_else(|| out_of_range(self.events.len()))?;
                (entry.id, entry.item.clone())
            }
            AffordanceKind::PropertyGet | AffordanceKind::PropertySet => {
                let entry = self
                    .properties
                    .get(position)
                    .ok_or_else(|| out_of_range(self.properties.len()))?;
                let direction = property_direction(kind);
                let affordance = direction_of(&entry.item, direction)
                    .ok_or(StoreError::MissingDirection {
                        position,
                        direction,
                    })?;
                (entry.id, affordance.clone())
            }
        };
        Ok(SelectionEvent {
            id,
            position,
            kind,
            affordance,
        })
    }

    /// Re-read a selection against the current contents.
    pub(crate) fn resolve(&self, selection: Selection) -> Result<SelectionEvent, StoreError> {
        let stale = StoreError::StaleSelection {
            id: selection.id,
            kind: selection.kind,
        };
        let position = self
            .position(selection.kind, selection.id)
            .ok_or_else(|| stale.clone())?;
        self.locate(selection.kind, position).map_err(|_| stale)
    }

    /// Property id at `position`, for addressing a move target.
    pub(crate) fn property_id_at(
        &self,
        position: usize,
        direction: Direction,
    ) -> Result<EntryId, StoreError> {
        self.properties
            .get(position)
            .map(|entry| entry.id)
            .ok_or(StoreError::PositionOutOfRange {
                kind: AffordanceKind::property(direction),
                position,
                len: self.properties.len(),
            })
    }

    /// Detach the selected affordance from its current home.
    ///
    /// Actions and events are removed outright. A property that has both
    /// directions only loses the selected one; a single-direction property is
    /// removed.
    pub(crate) fn extract(&mut self, selection: Selection) -> Result<Affordance, StoreError> {
        let stale = StoreError::StaleSelection {
            id: selection.id,
            kind: selection.kind,
        };
        match selection.kind {
            AffordanceKind::Action => {
                let position = index_of(&self.actions, selection.id).ok_or(stale)?;
                Ok(self.actions.remove(position).item)
            }
            AffordanceKind::Event => {
                let position = index_of(&self.events, selection.id).ok_or(stale)?;
                Ok(self.events.remove(position).item)
            }
            AffordanceKind::PropertyGet | AffordanceKind::PropertySet => {
                let position =
                    index_of(&self.properties, selection.id).ok_or_else(|| stale.clone())?;
                let direction = property_direction(selection.kind);
                let access = self.properties[position].item.access.clone();
                let (detached, remaining) = match (access, direction) {
                    (Access::Both { get, set }, Direction::Get) => {
                        (get, Some(Access::SetOnly(set)))
                    }
                    (Access::Both { get, set }, Direction::Set) => {
                        (set, Some(Access::GetOnly(get)))
                    }
                    (Access::GetOnly(get), Direction::Get) => (get, None),
                    (Access::SetOnly(set), Direction::Set) => (set, None),
                    _ => return Err(stale),
                };
                match remaining {
                    Some(access) => self.properties[position].item.access = access,
                    None => {
                        self.properties.remove(position);
                    }
                }
                Ok(detached)
            }
        }
    }

    pub(crate) fn push_action(&mut self, affordance: Affordance) -> EntryId {
        let entry = self.wrap(affordance);
        let id = entry.id;
        self.actions.push(entry);
        id
    }

    pub(crate) fn push_event(&mut self, affordance: Affordance) -> EntryId {
        let entry = self.wrap(affordance);
        let id = entry.id;
        self.events.push(entry);
        id
    }

    pub(crate) fn push_property(&mut self, property: Property) -> EntryId {
        let entry = self.wrap(property);
        let id = entry.id;
        self.properties.push(entry);
        id
    }

    /// Write `affordance` into one direction of an existing property.
    ///
    /// Returns whatever previously occupied that direction. Category follows
    /// the populated directions, so filling an occupied slot of a
    /// single-direction property leaves it single-direction.
    pub(crate) fn assign_direction(
        &mut self,
        id: EntryId,
        direction: Direction,
        affordance: Affordance,
    ) -> Result<Option<Affordance>, StoreError> {
        let position = index_of(&self.properties, id).ok_or(StoreError::TargetRemoved(id))?;
        let property = &mut self.properties[position].item;
        let (access, displaced) = match (property.access.clone(), direction) {
            (Access::GetOnly(old), Direction::Get) => (Access::GetOnly(affordance), Some(old)),
            (Access::GetOnly(get), Direction::Set) => (
                Access::Both {
                    get,
                    set: affordance,
                },
                None,
            ),
            (Access::SetOnly(set), Direction::Get) => (
                Access::Both {
                    get: affordance,
                    set,
                },
                None,
            ),
            (Access::SetOnly(old), Direction::Set) => (Access::SetOnly(affordance), Some(old)),
            (Access::Both { get, set }, Direction::Get) => (
                Access::Both {
                    get: affordance,
                    set,
                },
                Some(get),
            ),
            (Access::Both { get, set }, Direction::Set) => (
                Access::Both {
                    get,
                    set: affordance,
                },
                Some(set),
            ),
        };
        property.access = access;
        Ok(displaced)
    }

    fn wrap<T>(&mut self, item: T) -> Entry<T> {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        Entry { id, item }
    }
}

fn index_of<T>(entries: &[Entry<T>], id: EntryId) -> Option<usize> {
    entries.iter().position(|entry| entry.id == id)
}

fn property_direction(kind: AffordanceKind) -> Direction {
    match kind {
        AffordanceKind::PropertySet => Direction::Set,
        _ => Direction::Get,
    }
}

fn direction_of(property: &Property, direction: Direction) -> Option<&Affordance> {
    match direction {
        Direction::Get => property.get(),
        Direction::Set => property.set(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affordance::Category;
    use crate::test_support::{action, both_property, get_property, set_property};

    fn collection(affordances: Affordances) -> AffordanceCollection {
        let mut collection = AffordanceCollection::new();
        collection.replace(affordances);
        collection
    }

    fn selection_at(
        collection: &AffordanceCollection,
        kind: AffordanceKind,
        position: usize,
    ) -> Selection {
        let event = collection.locate(kind, position).expect("locate");
        Selection { id: event.id, kind }
    }

    #[test]
    fn extracting_one_direction_of_both_keeps_property() {
        let mut c = collection(Affordances {
            properties: vec![both_property("Mode")],
            ..Affordances::default()
        });
        let selection = selection_at(&c, AffordanceKind::PropertyGet, 0);

        let detached = c.extract(selection).expect("extract");
        assert_eq!(detached.name, "GetMode");
        assert_eq!(c.properties().len(), 1);
        assert_eq!(c.properties()[0].item.category(), Category::SetOnly);
        assert_eq!(c.properties()[0].item.get(), None);
    }

    #[test]
    fn extracting_set_of_both_downgrades_to_get_only() {
        let mut c = collection(Affordances {
            properties: vec![both_property("Mode")],
            ..Affordances::default()
        });
        let selection = selection_at(&c, AffordanceKind::PropertySet, 0);

        let detached = c.extract(selection).expect("extract");
        assert_eq!(detached.name, "SetMode");
        assert_eq!(c.properties()[0].item.category(), Category::GetOnly);
    }

    #[test]
    fn extracting_single_direction_removes_property() {
        let mut c = collection(Affordances {
            properties: vec![get_property("Position"), set_property("Speed")],
            ..Affordances::default()
        });
        let get = selection_at(&c, AffordanceKind::PropertyGet, 0);
        c.extract(get).expect("extract get");
        assert_eq!(c.properties().len(), 1);

        let set = selection_at(&c, AffordanceKind::PropertySet, 0);
        c.extract(set).expect("extract set");
        assert!(c.properties().is_empty());
    }

    #[test]
    fn removal_shifts_positions_but_not_ids() {
        let mut c = collection(Affordances {
            actions: vec![action("A"), action("B"), action("C")],
            ..Affordances::default()
        });
        let c_id = c.actions()[2].id;
        let first = selection_at(&c, AffordanceKind::Action, 0);
        c.extract(first).expect("extract");

        assert_eq!(c.position(AffordanceKind::Action, c_id), Some(1));
        assert_eq!(c.actions()[1].item.name, "C");
    }

    #[test]
    fn extract_twice_reports_stale_selection() {
        let mut c = collection(Affordances {
            actions: vec![action("A")],
            ..Affordances::default()
        });
        let selection = selection_at(&c, AffordanceKind::Action, 0);
        c.extract(selection).expect("extract");

        let err = c.extract(selection).expect_err("already gone");
        assert!(matches!(err, StoreError::StaleSelection { .. }));
    }

    #[test]
    fn replace_never_reuses_ids() {
        let mut c = collection(Affordances {
            actions: vec![action("A")],
            ..Affordances::default()
        });
        let old = c.actions()[0].id;
        c.replace(Affordances {
            actions: vec![action("A")],
            ..Affordances::default()
        });
        assert_ne!(c.actions()[0].id, old);
    }

    #[test]
    fn assign_into_populated_direction_returns_displaced() {
        let mut c = collection(Affordances {
            properties: vec![get_property("Position")],
            ..Affordances::default()
        });
        let id = c.properties()[0].id;

        let displaced = c
            .assign_direction(id, Direction::Get, action("GetPose"))
            .expect("assign");
        assert_eq!(displaced.map(|a| a.name), Some("GetPosition".to_string()));
        assert_eq!(c.properties()[0].item.category(), Category::GetOnly);
    }

    #[test]
    fn assign_into_empty_direction_completes_property() {
        let mut c = collection(Affordances {
            properties: vec![get_property("Position")],
            ..Affordances::default()
        });
        let id = c.properties()[0].id;

        let displaced = c
            .assign_direction(id, Direction::Set, action("SetPosition"))
            .expect("assign");
        assert_eq!(displaced, None);
        assert_eq!(c.properties()[0].item.category(), Category::Both);
    }

    #[test]
    fn locate_rejects_missing_property_direction() {
        let c = collection(Affordances {
            properties: vec![get_property("Position")],
            ..Affordances::default()
        });
        let err = c
            .locate(AffordanceKind::PropertySet, 0)
            .expect_err("no set direction");
        assert_eq!(
            err,
            StoreError::MissingDirection {
                position: 0,
                direction: Direction::Set,
            }
        );
    }
}
