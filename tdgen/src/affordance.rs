//! Affordance data model and its ingestion wire shape.
//!
//! The wire shape mirrors what the ingestion step emits: PascalCase keys,
//! properties carrying both directions plus a numeric `Category`, and an
//! empty-affordance sentinel in whichever direction is unpopulated. The domain
//! model replaces the sentinel with [`Access`], so a property can never claim a
//! direction it does not have.

use serde::{Deserialize, Serialize};

/// Recursive request/response schema node.
///
/// `properties: None` (wire `null`) and `Some(vec![])` both mean "no structured
/// fields"; they are kept distinct so documents survive a load/export cycle.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataSchema {
    #[serde(rename = "Type")]
    pub data_type: String,
    #[serde(rename = "Properties", default)]
    pub properties: Option<Vec<SchemaField>>,
}

impl DataSchema {
    pub fn scalar(data_type: &str) -> Self {
        Self {
            data_type: data_type.to_string(),
            properties: None,
        }
    }

    pub fn object(fields: Vec<SchemaField>) -> Self {
        Self {
            data_type: "object".to_string(),
            properties: Some(fields),
        }
    }

    /// Children, or `None` when the node is a leaf (absent or empty sequence).
    pub fn fields(&self) -> Option<&[SchemaField]> {
        match self.properties.as_deref() {
            Some(fields) if !fields.is_empty() => Some(fields),
            _ => None,
        }
    }
}

/// Named child of a [`DataSchema`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaField {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    pub value: DataSchema,
}

impl SchemaField {
    pub fn new(key: &str, value: DataSchema) -> Self {
        Self {
            key: key.to_string(),
            value,
        }
    }
}

/// A named unit of interaction: an action, an event payload, or one direction
/// of a property.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Affordance {
    pub name: String,
    pub req: DataSchema,
    pub res: DataSchema,
}

impl Affordance {
    pub fn new(name: &str, req: DataSchema, res: DataSchema) -> Self {
        Self {
            name: name.to_string(),
            req,
            res,
        }
    }

    /// Wire placeholder for an unpopulated property direction.
    pub fn sentinel() -> Self {
        Self::default()
    }
}

/// Which property directions are populated, as the wire `Category` code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    GetOnly,
    SetOnly,
    Both,
}

impl Category {
    pub fn code(self) -> u8 {
        match self {
            Category::GetOnly => 0,
            Category::SetOnly => 1,
            Category::Both => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Category::GetOnly),
            1 => Some(Category::SetOnly),
            2 => Some(Category::Both),
            _ => None,
        }
    }
}

/// Populated directions of a property. A property always has at least one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Access {
    GetOnly(Affordance),
    SetOnly(Affordance),
    Both { get: Affordance, set: Affordance },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub access: Access,
}

impl Property {
    pub fn new(name: &str, access: Access) -> Self {
        Self {
            name: name.to_string(),
            access,
        }
    }

    pub fn category(&self) -> Category {
        match self.access {
            Access::GetOnly(_) => Category::GetOnly,
            Access::SetOnly(_) => Category::SetOnly,
            Access::Both { .. } => Category::Both,
        }
    }

    pub fn get(&self) -> Option<&Affordance> {
        match &self.access {
            Access::GetOnly(get) | Access::Both { get, .. } => Some(get),
            Access::SetOnly(_) => None,
        }
    }

    pub fn set(&self) -> Option<&Affordance> {
        match &self.access {
            Access::SetOnly(set) | Access::Both { set, .. } => Some(set),
            Access::GetOnly(_) => None,
        }
    }

    /// Decode a wire property, trusting `Category` over the direction fields.
    pub fn from_wire(wire: WireProperty) -> Result<Self, String> {
        let category = Category::from_code(wire.category).ok_or_else(|| {
            format!(
                "property '{}': category {} is not one of 0, 1, 2",
                wire.name, wire.category
            )
        })?;
        let access = match category {
            Category::GetOnly => Access::GetOnly(wire.get_prop),
            Category::SetOnly => Access::SetOnly(wire.set_prop),
            Category::Both => Access::Both {
                get: wire.get_prop,
                set: wire.set_prop,
            },
        };
        Ok(Self {
            name: wire.name,
            access,
        })
    }

    pub fn to_wire(&self) -> WireProperty {
        WireProperty {
            name: self.name.clone(),
            get_prop: self.get().cloned().unwrap_or_else(Affordance::sentinel),
            set_prop: self.set().cloned().unwrap_or_else(Affordance::sentinel),
            category: self.category().code(),
        }
    }
}

/// Property as it appears in the ingestion document.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct WireProperty {
    pub name: String,
    pub get_prop: Affordance,
    pub set_prop: Affordance,
    pub category: u8,
}

/// Ingestion document: `{"Props": [...], "Actions": [...], "Events": [...]}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WireAffordances {
    #[serde(rename = "Props", default)]
    pub props: Vec<WireProperty>,
    #[serde(rename = "Actions", default)]
    pub actions: Vec<Affordance>,
    #[serde(rename = "Events", default)]
    pub events: Vec<Affordance>,
}

/// Domain form of an affordance collection, without store identities.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Affordances {
    pub properties: Vec<Property>,
    pub actions: Vec<Affordance>,
    pub events: Vec<Affordance>,
}

impl Affordances {
    pub fn from_wire(wire: WireAffordances) -> Result<Self, String> {
        let properties = wire
            .props
            .into_iter()
            .map(Property::from_wire)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            properties,
            actions: wire.actions,
            events: wire.events,
        })
    }

    pub fn to_wire(&self) -> WireAffordances {
        WireAffordances {
            props: self.properties.iter().map(Property::to_wire).collect(),
            actions: self.actions.clone(),
            events: self.events.clone(),
        }
    }
}
