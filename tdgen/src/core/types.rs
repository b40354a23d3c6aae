//! Shared types for the classification engine.
//!
//! These types define stable contracts between the store, the synthesizer and
//! whoever drives them. They carry no I/O and stay deterministic across runs.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::affordance::Affordance;

/// Store-assigned identity of a property, action or event.
///
/// Allocated from a counter that never rewinds, so an id outlives neither its
/// element nor a `load` that replaced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An element of one of the store's sequences, tagged with its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T> {
    pub id: EntryId,
    pub item: T,
}

/// Where a selected affordance currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AffordanceKind {
    PropertyGet,
    PropertySet,
    Action,
    Event,
}

impl AffordanceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AffordanceKind::PropertyGet => "property-get",
            AffordanceKind::PropertySet => "property-set",
            AffordanceKind::Action => "action",
            AffordanceKind::Event => "event",
        }
    }

    pub fn property(direction: Direction) -> Self {
        match direction {
            Direction::Get => AffordanceKind::PropertyGet,
            Direction::Set => AffordanceKind::PropertySet,
        }
    }
}

impl fmt::Display for AffordanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Get,
    Set,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Get => f.write_str("get"),
            Direction::Set => f.write_str("set"),
        }
    }
}

/// Destination of a reclassification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "kebab-case")]
pub enum MoveTarget {
    Action,
    Event,
    NewProperty {
        direction: Direction,
    },
    /// `position` addresses the property list as it was before the move.
    ExistingProperty {
        direction: Direction,
        position: usize,
    },
}

/// Internal record of the active selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Selection {
    pub id: EntryId,
    pub kind: AffordanceKind,
}

/// Positioned snapshot published whenever the selection changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEvent {
    pub id: EntryId,
    pub position: usize,
    pub kind: AffordanceKind,
    pub affordance: Affordance,
}

/// Result of a successful move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Selection after the move, already published to subscribers.
    pub selection: SelectionEvent,
    /// Affordance overwritten in the target property's direction, if any.
    pub displaced: Option<Affordance>,
}

/// Recoverable failures of store operations. None of them mutate the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no active selection")]
    NoSelection,
    #[error("selected {kind} {id} no longer exists")]
    StaleSelection { id: EntryId, kind: AffordanceKind },
    #[error("{kind} position {position} out of range ({len} present)")]
    PositionOutOfRange {
        kind: AffordanceKind,
        position: usize,
        len: usize,
    },
    #[error("property at position {position} has no {direction} direction")]
    MissingDirection {
        position: usize,
        direction: Direction,
    },
    #[error("target property {0} was removed by the move")]
    TargetRemoved(EntryId),
}
