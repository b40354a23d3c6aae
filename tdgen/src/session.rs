//! Session orchestration: ingestion, plan replay, listing and production.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::affordance::{Affordances, Category};
use crate::core::notifier::{Notifier, SubscriptionId};
use crate::core::store::AffordanceStore;
use crate::core::synthesizer::produce;
use crate::core::types::{AffordanceKind, MoveOutcome};
use crate::io::config::GeneratorConfig;
use crate::io::ingest::load_affordances;
use crate::io::plan::Plan;
use crate::thing::ThingDescription;

/// A produced document together with its serialized form.
#[derive(Debug, Clone, PartialEq)]
pub struct Produced {
    pub document: ThingDescription,
    pub serialized: String,
}

/// One selectable row of the store overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewRow {
    pub kind: AffordanceKind,
    pub position: usize,
    /// Property name for property rows, affordance name otherwise.
    pub name: String,
    pub affordance: String,
    pub category: Option<Category>,
}

impl fmt::Display for OverviewRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.position, self.name)?;
        if let Some(category) = self.category {
            write!(f, " ({}) category={}", self.affordance, category.code())?;
        }
        Ok(())
    }
}

/// A single in-memory classification session.
#[derive(Debug)]
pub struct Session {
    store: AffordanceStore,
    produced: Notifier<Produced>,
}

impl Session {
    pub fn with_affordances(affordances: Affordances) -> Self {
        Self {
            store: AffordanceStore::with_affordances(affordances),
            produced: Notifier::new(),
        }
    }

    /// Load a document from disk and replay `plan` against it.
    pub fn open(input: &Path, plan: Option<&Path>, cfg: &GeneratorConfig) -> Result<Self> {
        let affordances = load_affordances(input, cfg.strict_names)?;
        let mut session = Self::with_affordances(affordances);
        if let Some(plan_path) = plan {
            let plan = Plan::load(plan_path)?;
            session
                .apply_plan(&plan)
                .with_context(|| format!("apply plan {}", plan_path.display()))?;
        }
        Ok(session)
    }

    pub fn store(&self) -> &AffordanceStore {
        &self.store
    }

    /// Replay plan steps in order. Stops at the first failing step; steps
    /// before it stay applied.
    pub fn apply_plan(&mut self, plan: &Plan) -> Result<Vec<MoveOutcome>> {
        let mut outcomes = Vec::new();
        for (index, step) in plan.steps.iter().enumerate() {
            if let Some(select) = step.select {
                self.store
                    .select(select.kind, select.position)
                    .with_context(|| format!("step[{}]: select", index))?;
            }
            if let Some(target) = step.move_to {
                let outcome = self
                    .store
                    .move_selected_to(target)
                    .with_context(|| format!("step[{}]: move", index))?;
                if let Some(displaced) = &outcome.displaced {
                    warn!(step = index, displaced = %displaced.name, "plan step overwrote affordance");
                }
                outcomes.push(outcome);
            }
        }
        info!(steps = plan.steps.len(), moves = outcomes.len(), "plan applied");
        Ok(outcomes)
    }

    /// Selectable rows in store order: properties (one row per populated
    /// direction), then actions, then events.
    pub fn overview(&self) -> Vec<OverviewRow> {
        let mut rows = Vec::new();
        for (position, entry) in self.store.properties().iter().enumerate() {
            let property = &entry.item;
            let directions = [
                (AffordanceKind::PropertyGet, property.get()),
                (AffordanceKind::PropertySet, property.set()),
            ];
            for (kind, affordance) in directions {
                if let Some(affordance) = affordance {
                    rows.push(OverviewRow {
                        kind,
                        position,
                        name: property.name.clone(),
                        affordance: affordance.name.clone(),
                        category: Some(property.category()),
                    });
                }
            }
        }
        let sequences = [
            (AffordanceKind::Action, self.store.actions()),
            (AffordanceKind::Event, self.store.events()),
        ];
        for (kind, entries) in sequences {
            for (position, entry) in entries.iter().enumerate() {
                rows.push(OverviewRow {
                    kind,
                    position,
                    name: entry.item.name.clone(),
                    affordance: entry.item.name.clone(),
                    category: None,
                });
            }
        }
        rows
    }

    /// Synthesize the Thing Description and notify `produced` subscribers.
    pub fn produce(&mut self, title: &str, pretty: bool) -> Result<Produced> {
        let document = produce(self.store.collection(), title);
        let serialized = document.render(pretty).context("serialize thing description")?;
        debug!(
            title,
            properties = document.properties.len(),
            actions = document.actions.len(),
            events = document.events.len(),
            "produced thing description"
        );
        let produced = Produced {
            document,
            serialized,
        };
        self.produced.publish(&produced);
        Ok(produced)
    }

    pub fn subscribe_produced<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Produced) + 'static,
    {
        self.produced.subscribe(callback)
    }

    pub fn unsubscribe_produced(&mut self, id: SubscriptionId) -> bool {
        self.produced.unsubscribe(id)
    }
}
