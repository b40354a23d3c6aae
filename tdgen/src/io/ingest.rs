//! Affordance document load/export with schema + invariant validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::validator_for;
use serde_json::Value;
use tracing::{debug, warn};

use crate::affordance::{Affordances, WireAffordances};
use crate::core::invariants::{duplicate_names, validate_invariants};
use crate::io::output::write_atomic;

pub const AFFORDANCES_SCHEMA: &str =
    include_str!("../../../schemas/affordances/v1.schema.json");

/// Load and validate an affordance document from disk.
///
/// With `strict_names`, duplicate names within a section are an error instead
/// of a warning.
pub fn load_affordances(path: &Path, strict_names: bool) -> Result<Affordances> {
    debug!(path = %path.display(), "loading affordances");
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read affordances {}", path.display()))?;
    parse_affordances(&contents, strict_names)
        .with_context(|| format!("load affordances {}", path.display()))
}

/// Parse and validate an affordance document: schema, then invariants.
pub fn parse_affordances(contents: &str, strict_names: bool) -> Result<Affordances> {
    let value: Value = serde_json::from_str(contents).context("parse affordances json")?;
    validate_schema(&value)?;
    let wire: WireAffordances =
        serde_json::from_value(value).context("deserialize affordances")?;

    let errors = validate_invariants(&wire);
    if !errors.is_empty() {
        bail!("invariant violations:\n- {}", errors.join("\n- "));
    }
    let duplicates = duplicate_names(&wire);
    if !duplicates.is_empty() {
        if strict_names {
            bail!("duplicate names:\n- {}", duplicates.join("\n- "));
        }
        for duplicate in &duplicates {
            warn!(%duplicate, "duplicate name collapses in produced document");
        }
    }

    let affordances = Affordances::from_wire(wire).map_err(|err| anyhow!(err))?;
    debug!(
        properties = affordances.properties.len(),
        actions = affordances.actions.len(),
        events = affordances.events.len(),
        "affordances parsed"
    );
    Ok(affordances)
}

/// Write affordances back in the ingestion shape, pretty-printed.
pub fn write_affordances(path: &Path, affordances: &Affordances) -> Result<()> {
    let buf = render_affordances(affordances)?;
    write_atomic(path, &buf)
}

pub fn render_affordances(affordances: &Affordances) -> Result<String> {
    let mut buf =
        serde_json::to_string_pretty(&affordances.to_wire()).context("serialize affordances")?;
    buf.push('\n');
    Ok(buf)
}

fn validate_schema(doc: &Value) -> Result<()> {
    let schema: Value =
        serde_json::from_str(AFFORDANCES_SCHEMA).context("parse affordances schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(doc) {
        let messages = compiled
            .iter_errors(doc)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "affordances schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}
