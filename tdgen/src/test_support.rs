//! Test-only helpers for building affordances, fixtures and workspaces.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};

use crate::affordance::{Access, Affordance, Affordances, DataSchema, Property, SchemaField};
use crate::core::store::AffordanceStore;
use crate::core::types::SelectionEvent;
use crate::io::ingest::parse_affordances;

pub fn scalar(data_type: &str) -> DataSchema {
    DataSchema::scalar(data_type)
}

/// `object` schema with the given children, in order.
pub fn object(fields: &[(&str, DataSchema)]) -> DataSchema {
    DataSchema::object(
        fields
            .iter()
            .map(|(key, value)| SchemaField::new(key, value.clone()))
            .collect(),
    )
}

pub fn affordance(name: &str, req: DataSchema, res: DataSchema) -> Affordance {
    Affordance::new(name, req, res)
}

/// Affordance with an empty object request and a `status_code` response.
pub fn action(name: &str) -> Affordance {
    affordance(
        name,
        DataSchema::scalar("object"),
        object(&[("status_code", scalar("integer"))]),
    )
}

fn getter(name: &str) -> Affordance {
    affordance(
        &format!("Get{}", name),
        DataSchema::scalar("object"),
        object(&[("value", scalar("integer"))]),
    )
}

fn setter(name: &str) -> Affordance {
    affordance(
        &format!("Set{}", name),
        object(&[("value", scalar("integer"))]),
        object(&[("status_code", scalar("integer"))]),
    )
}

/// Get-only property whose direction is named `Get<name>`.
pub fn get_property(name: &str) -> Property {
    Property::new(name, Access::GetOnly(getter(name)))
}

/// Set-only property whose direction is named `Set<name>`.
pub fn set_property(name: &str) -> Property {
    Property::new(name, Access::SetOnly(setter(name)))
}

pub fn both_property(name: &str) -> Property {
    Property::new(
        name,
        Access::Both {
            get: getter(name),
            set: setter(name),
        },
    )
}

/// Subscribe a recorder that keeps every published selection event.
pub fn record_selections(store: &mut AffordanceStore) -> Rc<RefCell<Vec<SelectionEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    seen
}

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Parse `tests/fixtures/<name>.json` (schema + invariants checked).
pub fn load_fixture(name: &str) -> Result<Affordances> {
    let path = fixture_path(&format!("{}.json", name));
    let contents =
        fs::read_to_string(&path).with_context(|| format!("read fixture {}", path.display()))?;
    parse_affordances(&contents, false)
}

/// Temporary directory holding copies of fixture files.
pub struct TestWorkspace {
    dir: tempfile::TempDir,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp workspace")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Copy `tests/fixtures/<file>` into the workspace and return its new path.
    pub fn copy_fixture(&self, file: &str) -> Result<PathBuf> {
        let dest = self.dir.path().join(file);
        fs::copy(fixture_path(file), &dest)
            .with_context(|| format!("copy fixture {}", file))?;
        Ok(dest)
    }

    pub fn write(&self, file: &str, contents: &str) -> Result<PathBuf> {
        let dest = self.dir.path().join(file);
        fs::write(&dest, contents).with_context(|| format!("write {}", dest.display()))?;
        Ok(dest)
    }
}
