//! Health plan records
//!
//! Records are read as the catalog backend publishes them. Field names on the
//! wire are the backend's (`_id`, `empresa`, `linea`, `clinicas`, `folleto`);
//! the Rust names describe what they hold.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A health insurance plan offered by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthPlan {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "empresa")]
    pub provider: String,
    /// Monthly price; the backend sends a number, older records a string
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    pub rating: f64,
    #[serde(rename = "linea")]
    pub line: String,
    #[serde(default)]
    pub attributes: Vec<PlanAttribute>,
    #[serde(rename = "clinicas", default)]
    pub clinics: Vec<Clinic>,
    #[serde(default)]
    pub images: Vec<PlanImage>,
    /// Brochure links
    #[serde(rename = "folleto", default)]
    pub brochures: Vec<String>,
}

/// A named benefit of a plan, e.g. "Orthodontics: 50%"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanAttribute {
    pub name: String,
    #[serde(rename = "value_name")]
    pub value: String,
    #[serde(rename = "attribute_group_name")]
    pub group: String,
    #[serde(rename = "attribute_name_order", default)]
    pub order: Option<i64>,
    #[serde(rename = "attribute_group_order", default)]
    pub group_order: Option<i64>,
}

/// A medical facility in a plan's network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clinic {
    #[serde(rename = "item_id")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    pub entity: String,
    #[serde(rename = "ubicacion", default)]
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "barrio")]
    pub neighborhood: String,
    #[serde(rename = "partido")]
    pub district: String,
    pub region: String,
    #[serde(rename = "provincia")]
    pub province: String,
    #[serde(rename = "CP")]
    pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanImage {
    pub id: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "empresa")]
    pub provider: String,
    pub url: String,
}

/// Attributes sharing a group name, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeGroup {
    pub name: String,
    pub order: Option<i64>,
    pub attributes: Vec<PlanAttribute>,
}

impl HealthPlan {
    /// Groups attributes for display
    ///
    /// Groups are ordered by their group order, then name; attributes within
    /// a group by their own order, then name. Missing orders sort last.
    pub fn grouped_attributes(&self) -> Vec<AttributeGroup> {
        let mut groups: BTreeMap<&str, AttributeGroup> = BTreeMap::new();

        for attribute in &self.attributes {
            let group = groups
                .entry(attribute.group.as_str())
                .or_insert_with(|| AttributeGroup {
                    name: attribute.group.clone(),
                    order: None,
                    attributes: Vec::new(),
                });
            group.order = match (group.order, attribute.group_order) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
            group.attributes.push(attribute.clone());
        }

        let mut groups: Vec<AttributeGroup> = groups.into_values().collect();
        for group in &mut groups {
            group
                .attributes
                .sort_by(|a, b| order_key(a.order).cmp(&order_key(b.order)).then_with(|| a.name.cmp(&b.name)));
        }
        groups.sort_by(|a, b| order_key(a.order).cmp(&order_key(b.order)).then_with(|| a.name.cmp(&b.name)));
        groups
    }

    /// Looks up an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Clinics with at least one location in the given region
    pub fn clinics_in_region<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a Clinic> + 'a {
        self.clinics.iter().filter(move |clinic| {
            clinic
                .locations
                .iter()
                .any(|l| l.region.eq_ignore_ascii_case(region))
        })
    }

    pub fn primary_image(&self) -> Option<&PlanImage> {
        self.images.first()
    }
}

fn order_key(order: Option<i64>) -> (bool, i64) {
    (order.is_none(), order.unwrap_or_default())
}
