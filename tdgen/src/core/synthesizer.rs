//! Pure synthesis of a Thing Description from the store's classification.

use crate::affordance::{Access, DataSchema, Property};
use crate::core::collection::AffordanceCollection;
use crate::core::ordered_map::OrderedMap;
use crate::thing::{
    ActionAffordance, EventAffordance, NO_SECURITY, PropertyAffordance, ThingDescription,
    WotSchema,
};

/// Convert a flat request/response schema into the nested output form.
///
/// Children become a name-keyed mapping in their given order; a later child
/// with a repeated name overwrites the earlier one. Leaves (absent or empty
/// children) carry only their type.
pub fn synthesize_schema(schema: &DataSchema) -> WotSchema {
    let properties = schema.fields().map(|fields| {
        fields
            .iter()
            .map(|field| (field.key.as_str(), synthesize_schema(&field.value)))
            .collect::<OrderedMap<_>>()
    });
    WotSchema {
        data_type: schema.data_type.clone(),
        properties,
    }
}

/// Schema a property is described by: the set request for set-only
/// properties, the get response otherwise.
pub fn property_source(property: &Property) -> &DataSchema {
    match &property.access {
        Access::SetOnly(set) => &set.req,
        Access::GetOnly(get) | Access::Both { get, .. } => &get.res,
    }
}

pub fn synthesize_properties(collection: &AffordanceCollection) -> OrderedMap<PropertyAffordance> {
    collection
        .properties()
        .iter()
        .map(|entry| {
            let schema = synthesize_schema(property_source(&entry.item));
            let affordance = PropertyAffordance {
                data_type: schema.data_type,
                properties: schema.properties,
                title: None,
                description: None,
            };
            (entry.item.name.as_str(), affordance)
        })
        .collect()
}

pub fn synthesize_actions(collection: &AffordanceCollection) -> OrderedMap<ActionAffordance> {
    collection
        .actions()
        .iter()
        .map(|entry| {
            let affordance = ActionAffordance {
                title: None,
                description: None,
                input: Some(synthesize_schema(&entry.item.req)),
                output: Some(synthesize_schema(&entry.item.res)),
            };
            (entry.item.name.as_str(), affordance)
        })
        .collect()
}

pub fn synthesize_events(collection: &AffordanceCollection) -> OrderedMap<EventAffordance> {
    collection
        .events()
        .iter()
        .map(|entry| {
            let affordance = EventAffordance {
                title: None,
                description: None,
                data: Some(synthesize_schema(&entry.item.res)),
            };
            (entry.item.name.as_str(), affordance)
        })
        .collect()
}

pub fn produce(collection: &AffordanceCollection, title: &str) -> ThingDescription {
    ThingDescription {
        title: title.to_string(),
        description: None,
        security_definitions: None,
        security: NO_SECURITY.to_string(),
        properties: synthesize_properties(collection),
        actions: synthesize_actions(collection),
        events: synthesize_events(collection),
    }
}
