mod session;

pub use session::{Session, UserRole};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status badge shown on a listing card
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyTag {
    New,
    FastFilling,
    SoldOut,
    Trending,
}

impl PropertyTag {
    pub const ALL: [PropertyTag; 4] = [
        PropertyTag::New,
        PropertyTag::FastFilling,
        PropertyTag::SoldOut,
        PropertyTag::Trending,
    ];

    /// Display label, e.g. "Fast Filling"
    pub fn label(self) -> &'static str {
        match self {
            PropertyTag::New => "New",
            PropertyTag::FastFilling => "Fast Filling",
            PropertyTag::SoldOut => "Sold Out",
            PropertyTag::Trending => "Trending",
        }
    }

    /// Storage form, e.g. "fast-filling"
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyTag::New => "new",
            PropertyTag::FastFilling => "fast-filling",
            PropertyTag::SoldOut => "sold-out",
            PropertyTag::Trending => "trending",
        }
    }
}

impl std::str::FromStr for PropertyTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyTag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tag '{}'", s))
    }
}

/// Kind of dwelling
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PropertyType {
    #[default]
    Apartment,
    Villa,
    House,
    Penthouse,
    Cottage,
    Suite,
}

impl PropertyType {
    pub const ALL: [PropertyType; 6] = [
        PropertyType::Apartment,
        PropertyType::Villa,
        PropertyType::House,
        PropertyType::Penthouse,
        PropertyType::Cottage,
        PropertyType::Suite,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::Apartment => "Apartment",
            PropertyType::Villa => "Villa",
            PropertyType::House => "House",
            PropertyType::Penthouse => "Penthouse",
            PropertyType::Cottage => "Cottage",
            PropertyType::Suite => "Suite",
        }
    }
}

impl std::str::FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown property type '{}'", s))
    }
}

/// Core listing data model, persisted as one element of the `maya_properties` array
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub title: String,
    /// Asking price in rupees
    pub price: u64,
    pub location: String,
    pub tags: Vec<PropertyTag>,
    /// Primary (card) image
    pub image: String,
    pub images: Vec<String>,
    pub description: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    /// Built-up area in sq ft
    pub area: u32,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub amenities: Vec<String>,
    pub published_at: DateTime<Utc>,
}

impl Property {
    /// Attach store-assigned identity to a draft
    pub fn from_new(id: String, published_at: DateTime<Utc>, draft: NewProperty) -> Self {
        Self {
            id,
            title: draft.title,
            price: draft.price,
            location: draft.location,
            tags: draft.tags,
            image: draft.image,
            images: draft.images,
            description: draft.description,
            bedrooms: draft.bedrooms,
            bathrooms: draft.bathrooms,
            area: draft.area,
            property_type: draft.property_type,
            amenities: draft.amenities,
            published_at,
        }
    }

    pub fn has_tag(&self, tag: PropertyTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Merge the fields set in `patch`; id and publish time never change
    pub fn apply(&mut self, patch: PropertyPatch) {
        let PropertyPatch {
            title,
            price,
            location,
            tags,
            image,
            images,
            description,
            bedrooms,
            bathrooms,
            area,
            property_type,
            amenities,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(tags) = tags {
            self.tags = dedup_preserving_order(tags);
        }
        if let Some(image) = image {
            self.image = image;
        }
        if let Some(images) = images {
            self.images = images;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(bedrooms) = bedrooms {
            self.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = bathrooms {
            self.bathrooms = bathrooms;
        }
        if let Some(area) = area {
            self.area = area;
        }
        if let Some(property_type) = property_type {
            self.property_type = property_type;
        }
        if let Some(amenities) = amenities {
            self.amenities = dedup_preserving_order(amenities);
        }
    }
}

/// Listing as submitted by the add-property form, before the store assigns id and timestamp
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub title: String,
    pub price: u64,
    pub location: String,
    pub tags: Vec<PropertyTag>,
    pub image: String,
    pub images: Vec<String>,
    pub description: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: u32,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub amenities: Vec<String>,
}

impl NewProperty {
    /// Check required fields and collapse tag/amenity duplicates
    pub fn validate(mut self) -> Result<Self, String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        if self.location.trim().is_empty() {
            return Err("location must not be empty".to_string());
        }
        self.tags = dedup_preserving_order(self.tags);
        self.amenities = dedup_preserving_order(self.amenities);
        Ok(self)
    }
}

/// Partial update; `None` leaves the field as is
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub price: Option<u64>,
    pub location: Option<String>,
    pub tags: Option<Vec<PropertyTag>>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub area: Option<u32>,
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    pub amenities: Option<Vec<String>>,
}

impl PropertyPatch {
    pub fn is_empty(&self) -> bool {
        *self == PropertyPatch::default()
    }
}

fn dedup_preserving_order<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Render a rupee amount with Indian digit grouping: 5000000 -> "₹50,00,000"
pub fn format_price(price: u64) -> String {
    let digits = price.to_string();
    if digits.len() <= 3 {
        return format!("₹{}", digits);
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("₹{},{}", groups.join(","), last_three)
}
