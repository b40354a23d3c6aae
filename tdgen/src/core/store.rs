//! Affordance store: classification state, selection, and the move protocol.

use tracing::{debug, warn};

use crate::affordance::{Access, Affordance, Affordances, Property};
use crate::core::collection::AffordanceCollection;
use crate::core::notifier::{Notifier, SubscriptionId};
use crate::core::types::{
    AffordanceKind, Direction, Entry, EntryId, MoveOutcome, MoveTarget, Selection,
    SelectionEvent, StoreError,
};

/// Move target with the existing-property position already pinned to an id.
enum Destination {
    Action,
    Event,
    NewProperty(Direction),
    ExistingProperty(EntryId, Direction),
}

#[derive(Debug, Default)]
pub struct AffordanceStore {
    collection: AffordanceCollection,
    selection: Option<Selection>,
    selection_changed: Notifier<SelectionEvent>,
}

impl AffordanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_affordances(affordances: Affordances) -> Self {
        let mut store = Self::new();
        store.load(affordances);
        store
    }

    /// Replace the whole collection.
    ///
    /// The selection is left in place but can no longer resolve: every
    /// element receives a fresh id, so later moves report it as stale.
    pub fn load(&mut self, affordances: Affordances) {
        debug!(
            properties = affordances.properties.len(),
            actions = affordances.actions.len(),
            events = affordances.events.len(),
            "loading affordances"
        );
        self.collection.replace(affordances);
    }

    pub fn collection(&self) -> &AffordanceCollection {
        &self.collection
    }

    pub fn properties(&self) -> &[Entry<Property>] {
        self.collection.properties()
    }

    pub fn actions(&self) -> &[Entry<Affordance>] {
        self.collection.actions()
    }

    pub fn events(&self) -> &[Entry<Affordance>] {
        self.collection.events()
    }

    pub fn export(&self) -> Affordances {
        self.collection.to_affordances()
    }

    /// Make the affordance at `position` the active one and notify subscribers.
    pub fn select(
        &mut self,
        kind: AffordanceKind,
        position: usize,
    ) -> Result<SelectionEvent, StoreError> {
        let event = self.collection.locate(kind, position)?;
        self.selection = Some(Selection { id: event.id, kind });
        debug!(%kind, position, name = %event.affordance.name, "selected affordance");
        self.selection_changed.publish(&event);
        Ok(event)
    }

    /// Current selection, re-read against the collection.
    pub fn selection(&self) -> Result<SelectionEvent, StoreError> {
        let selection = self.selection.ok_or(StoreError::NoSelection)?;
        self.collection.resolve(selection)
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&SelectionEvent) + 'static,
    {
        self.selection_changed.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.selection_changed.unsubscribe(id)
    }

    pub fn move_to_action(&mut self) -> Result<MoveOutcome, StoreError> {
        self.move_selected_to(MoveTarget::Action)
    }

    pub fn move_to_event(&mut self) -> Result<MoveOutcome, StoreError> {
        self.move_selected_to(MoveTarget::Event)
    }

    pub fn move_to_new_property(
        &mut self,
        direction: Direction,
    ) -> Result<MoveOutcome, StoreError> {
        self.move_selected_to(MoveTarget::NewProperty { direction })
    }

    pub fn move_to_existing_property(
        &mut self,
        direction: Direction,
        position: usize,
    ) -> Result<MoveOutcome, StoreError> {
        self.move_selected_to(MoveTarget::ExistingProperty {
            direction,
            position,
        })
    }

    /// Detach the selected affordance and insert it at `target`.
    ///
    /// Atomic: on error the collection, the selection and the subscribers are
    /// untouched. On success exactly one selection-changed event is published.
    pub fn move_selected_to(&mut self, target: MoveTarget) -> Result<MoveOutcome, StoreError> {
        let selection = self.selection.ok_or(StoreError::NoSelection)?;
        let destination = match target {
            MoveTarget::Action => Destination::Action,
            MoveTarget::Event => Destination::Event,
            MoveTarget::NewProperty { direction } => Destination::NewProperty(direction),
            MoveTarget::ExistingProperty {
                direction,
                position,
            } => Destination::ExistingProperty(
                self.collection.property_id_at(position, direction)?,
                direction,
            ),
        };

        let from = selection.kind;
        let mut next = self.collection.clone();
        let affordance = next.extract(selection)?;
        let name = affordance.name.clone();
        let (id, kind, displaced) = match destination {
            Destination::Action => (next.push_action(affordance), AffordanceKind::Action, None),
            Destination::Event => (next.push_event(affordance), AffordanceKind::Event, None),
            Destination::NewProperty(direction) => {
                let access = match direction {
                    Direction::Get => Access::GetOnly(affordance),
                    Direction::Set => Access::SetOnly(affordance),
                };
                let id = next.push_property(Property::new(&name, access));
                (id, AffordanceKind::property(direction), None)
            }
            Destination::ExistingProperty(id, direction) => {
                let displaced = next.assign_direction(id, direction, affordance)?;
                (id, AffordanceKind::property(direction), displaced)
            }
        };

        let selection = Selection { id, kind };
        let event = next.resolve(selection)?;
        self.collection = next;
        self.selection = Some(selection);

        if let Some(displaced) = &displaced {
            warn!(
                property_position = event.position,
                %kind,
                displaced = %displaced.name,
                replacement = %name,
                "move overwrote populated property direction"
            );
        }
        debug!(
            %from,
            %kind,
            position = event.position,
            name = %name,
            "moved affordance"
        );
        self.selection_changed.publish(&event);
        Ok(MoveOutcome {
            selection: event,
            displaced,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::affordance::Category;
    use crate::core::synthesizer::synthesize_properties;
    use crate::test_support::{
        action, affordance, both_property, get_property, object, record_selections, scalar,
        set_property,
    };

    fn store_with(affordances: Affordances) -> AffordanceStore {
        AffordanceStore::with_affordances(affordances)
    }

    fn names(entries: &[Entry<Affordance>]) -> Vec<&str> {
        entries.iter().map(|e| e.item.name.as_str()).collect()
    }

    #[test]
    fn select_publishes_positioned_snapshot() {
        let mut store = store_with(Affordances {
            actions: vec![action("A"), action("B")],
            ..Affordances::default()
        });
        let seen = record_selections(&mut store);

        let event = store.select(AffordanceKind::Action, 1).expect("select");

        assert_eq!(event.position, 1);
        assert_eq!(event.affordance.name, "B");
        assert_eq!(*seen.borrow(), vec![event]);
    }

    #[test]
    fn select_out_of_range_keeps_previous_selection() {
        let mut store = store_with(Affordances {
            actions: vec![action("A")],
            ..Affordances::default()
        });
        store.select(AffordanceKind::Action, 0).expect("select");

        let err = store.select(AffordanceKind::Event, 0).expect_err("no events");
        assert_eq!(
            err,
            StoreError::PositionOutOfRange {
                kind: AffordanceKind::Event,
                position: 0,
                len: 0,
            }
        );
        assert_eq!(store.selection().expect("selection").affordance.name, "A");
    }

    #[test]
    fn move_without_selection_fails_and_changes_nothing() {
        let mut store = store_with(Affordances {
            properties: vec![both_property("Mode")],
            actions: vec![action("A")],
            events: vec![action("E")],
        });
        let before = store.export();
        let seen = record_selections(&mut store);

        let targets = [
            MoveTarget::Action,
            MoveTarget::Event,
            MoveTarget::NewProperty {
                direction: Direction::Get,
            },
            MoveTarget::ExistingProperty {
                direction: Direction::Set,
                position: 0,
            },
        ];
        for target in targets {
            let err = store.move_selected_to(target).expect_err("no selection");
            assert_eq!(err, StoreError::NoSelection);
        }

        assert_eq!(store.export(), before);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn moving_action_to_new_get_property_appends_get_only_property() {
        let mut store = store_with(Affordances {
            properties: vec![get_property("Position")],
            actions: vec![action("SetPosition"), action("GetTemperature")],
            ..Affordances::default()
        });
        let detached = store.actions()[1].item.clone();
        store.select(AffordanceKind::Action, 1).expect("select");

        let outcome = store.move_to_new_property(Direction::Get).expect("move");

        assert_eq!(names(store.actions()), vec!["SetPosition"]);
        assert_eq!(store.properties().len(), 2);
        let added = &store.properties()[1].item;
        assert_eq!(added.name, "GetTemperature");
        assert_eq!(added.category(), Category::GetOnly);
        assert_eq!(added.get(), Some(&detached));
        assert_eq!(added.set(), None);
        assert_eq!(outcome.selection.kind, AffordanceKind::PropertyGet);
        assert_eq!(outcome.selection.position, 1);
        assert_eq!(outcome.displaced, None);
    }

    #[test]
    fn moving_to_new_set_property_yields_set_only() {
        let mut store = store_with(Affordances {
            events: vec![action("SetMode")],
            ..Affordances::default()
        });
        store.select(AffordanceKind::Event, 0).expect("select");

        let outcome = store.move_to_new_property(Direction::Set).expect("move");

        assert!(store.events().is_empty());
        assert_eq!(store.properties()[0].item.category(), Category::SetOnly);
        assert_eq!(outcome.selection.kind, AffordanceKind::PropertySet);
    }

    #[test]
    fn get_direction_round_trip_restores_both() {
        let original = both_property("Mode");
        let mut store = store_with(Affordances {
            properties: vec![original.clone()],
            ..Affordances::default()
        });
        store.select(AffordanceKind::PropertyGet, 0).expect("select");

        let outcome = store.move_to_action().expect("to action");
        assert_eq!(store.properties()[0].item.category(), Category::SetOnly);
        assert_eq!(outcome.selection.kind, AffordanceKind::Action);
        assert_eq!(outcome.selection.position, 0);

        let outcome = store
            .move_to_existing_property(Direction::Get, 0)
            .expect("back to property");

        assert!(store.actions().is_empty());
        assert_eq!(store.properties()[0].item, original);
        assert_eq!(outcome.displaced, None);
        assert_eq!(outcome.selection.kind, AffordanceKind::PropertyGet);
    }

    #[test]
    fn existing_property_target_is_pinned_before_extraction() {
        let mut store = store_with(Affordances {
            properties: vec![get_property("Position"), get_property("Speed")],
            ..Affordances::default()
        });
        // Extracting property 0 shifts Speed to position 0; the target is
        // still the property the caller saw at position 1.
        store.select(AffordanceKind::PropertyGet, 0).expect("select");

        let outcome = store
            .move_to_existing_property(Direction::Set, 1)
            .expect("move");

        assert_eq!(store.properties().len(), 1);
        let speed = &store.properties()[0].item;
        assert_eq!(speed.name, "Speed");
        assert_eq!(speed.category(), Category::Both);
        assert_eq!(speed.set().map(|a| a.name.as_str()), Some("GetPosition"));
        assert_eq!(outcome.selection.position, 0);
    }

    #[test]
    fn overwrite_reports_displaced_affordance() {
        let mut store = store_with(Affordances {
            properties: vec![both_property("Mode")],
            actions: vec![action("ReadMode")],
            ..Affordances::default()
        });
        store.select(AffordanceKind::Action, 0).expect("select");

        let outcome = store
            .move_to_existing_property(Direction::Get, 0)
            .expect("move");

        let displaced = outcome.displaced.expect("displaced");
        assert_eq!(displaced.name, "GetMode");
        assert_eq!(
            store.properties()[0].item.get().map(|a| a.name.as_str()),
            Some("ReadMode")
        );
        assert_eq!(store.properties()[0].item.category(), Category::Both);
    }

    #[test]
    fn setter_into_set_only_property_stays_set_only() {
        let replacement = affordance(
            "SetRpm",
            object(&[("rpm", scalar("integer"))]),
            scalar("object"),
        );
        let mut store = store_with(Affordances {
            properties: vec![set_property("Speed")],
            actions: vec![replacement.clone()],
            ..Affordances::default()
        });
        store.select(AffordanceKind::Action, 0).expect("select");

        let outcome = store
            .move_to_existing_property(Direction::Set, 0)
            .expect("move");

        assert_eq!(outcome.displaced.map(|a| a.name), Some("SetSpeed".to_string()));
        let speed = &store.properties()[0].item;
        assert_eq!(speed.category(), Category::SetOnly);
        assert_eq!(speed.get(), None);
        assert_eq!(speed.set(), Some(&replacement));
        let properties = synthesize_properties(store.collection());
        assert_eq!(
            serde_json::to_string(&properties).expect("serialize"),
            r#"{"Speed":{"type":"object","properties":{"rpm":{"type":"integer"}}}}"#
        );
    }

    #[test]
    fn unsubscribed_callback_misses_later_moves() {
        let mut store = store_with(Affordances {
            actions: vec![action("A")],
            ..Affordances::default()
        });
        store.select(AffordanceKind::Action, 0).expect("select");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |event: &SelectionEvent| {
            sink.borrow_mut().push(event.kind);
        });

        store.move_to_event().expect("to event");
        assert!(store.unsubscribe(id));
        store.move_to_action().expect("back to action");

        assert_eq!(*seen.borrow(), vec![AffordanceKind::Event]);
        assert!(!store.unsubscribe(id));
        assert_eq!(names(store.actions()), vec!["A"]);
    }

    #[test]
    fn moving_into_property_removed_by_extraction_is_rejected() {
        let mut store = store_with(Affordances {
            properties: vec![get_property("Position")],
            ..Affordances::default()
        });
        let before = store.export();
        store.select(AffordanceKind::PropertyGet, 0).expect("select");
        let seen = record_selections(&mut store);

        let err = store
            .move_to_existing_property(Direction::Set, 0)
            .expect_err("target disappears");

        assert!(matches!(err, StoreError::TargetRemoved(_)));
        assert_eq!(store.export(), before);
        assert!(seen.borrow().is_empty());
        assert_eq!(store.selection().expect("selection").position, 0);
    }

    #[test]
    fn each_move_publishes_exactly_one_event() {
        let mut store = store_with(Affordances {
            actions: vec![action("A")],
            ..Affordances::default()
        });
        store.select(AffordanceKind::Action, 0).expect("select");
        let seen = record_selections(&mut store);

        store.move_to_event().expect("to event");
        store.move_to_action().expect("back to action");

        let kinds: Vec<AffordanceKind> = seen.borrow().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![AffordanceKind::Event, AffordanceKind::Action]);
    }

    #[test]
    fn load_makes_previous_selection_stale() {
        let mut store = store_with(Affordances {
            actions: vec![action("A")],
            ..Affordances::default()
        });
        store.select(AffordanceKind::Action, 0).expect("select");
        store.load(Affordances {
            actions: vec![action("A")],
            ..Affordances::default()
        });

        let err = store.move_to_event().expect_err("stale");
        assert!(matches!(err, StoreError::StaleSelection { .. }));
        assert_eq!(names(store.actions()), vec!["A"]);
    }

    #[test]
    fn moved_affordance_keeps_its_schemas() {
        let payload = affordance(
            "Pose",
            object(&[("x", scalar("number"))]),
            scalar("boolean"),
        );
        let mut store = store_with(Affordances {
            actions: vec![payload.clone()],
            ..Affordances::default()
        });
        store.select(AffordanceKind::Action, 0).expect("select");

        let outcome = store.move_to_event().expect("move");

        assert_eq!(outcome.selection.affordance, payload);
        assert_eq!(store.events()[0].item, payload);
    }
}
