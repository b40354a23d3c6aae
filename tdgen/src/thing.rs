//! Output model: a W3C WoT Thing Description.

use serde::Serialize;
use serde_json::Value;

use crate::core::ordered_map::OrderedMap;

/// Security marker written into every produced document.
pub const NO_SECURITY: &str = "no-sec";

/// Nested output schema. `properties` is omitted entirely for leaves; an
/// empty mapping is never written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WotSchema {
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<OrderedMap<WotSchema>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyAffordance {
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<OrderedMap<WotSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionAffordance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<WotSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<WotSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventAffordance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<WotSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThingDescription {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "securityDefinitions", skip_serializing_if = "Option::is_none")]
    pub security_definitions: Option<OrderedMap<Value>>,
    pub security: String,
    pub properties: OrderedMap<PropertyAffordance>,
    pub actions: OrderedMap<ActionAffordance>,
    pub events: OrderedMap<EventAffordance>,
}

impl ThingDescription {
    /// Serialize as compact JSON, or indented when `pretty` is set.
    pub fn render(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
