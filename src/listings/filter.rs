use crate::models::{Property, PropertyTag, PropertyType};
use serde::{Deserialize, Serialize};

/// Criteria for narrowing the listing grid; unset fields match everything
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingFilter {
    pub tag: Option<PropertyTag>,
    pub property_type: Option<PropertyType>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub min_bedrooms: Option<u32>,
}

impl ListingFilter {
    pub fn with_tag(tag: PropertyTag) -> Self {
        Self {
            tag: Some(tag),
            ..Default::default()
        }
    }

    pub fn matches(&self, property: &Property) -> bool {
        self.tag.map_or(true, |tag| property.has_tag(tag))
            && self
                .property_type
                .map_or(true, |kind| property.property_type == kind)
            && self.min_price.map_or(true, |min| property.price >= min)
            && self.max_price.map_or(true, |max| property.price <= max)
            && self
                .min_bedrooms
                .map_or(true, |min| property.bedrooms >= min)
    }

    pub fn apply<'a>(&self, properties: &'a [Property]) -> Vec<&'a Property> {
        properties.iter().filter(|p| self.matches(p)).collect()
    }
}
