use super::UnknownVariant;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Listing category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Rent,
    Sale,
    Land,
}

/// Kind of building (or bare land) being listed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Flat,
    Duplex,
    #[serde(rename = "Self-Contain")]
    SelfContain,
    Land,
    Bungalow,
    Terrace,
}

/// Availability of a listing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Available,
    Unavailable,
    Sold,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Rent, Category::Sale, Category::Land];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Rent => "Rent",
            Category::Sale => "Sale",
            Category::Land => "Land",
        }
    }
}

impl PropertyType {
    pub const ALL: [PropertyType; 6] = [
        PropertyType::Flat,
        PropertyType::Duplex,
        PropertyType::SelfContain,
        PropertyType::Land,
        PropertyType::Bungalow,
        PropertyType::Terrace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Flat => "Flat",
            PropertyType::Duplex => "Duplex",
            PropertyType::SelfContain => "Self-Contain",
            PropertyType::Land => "Land",
            PropertyType::Bungalow => "Bungalow",
            PropertyType::Terrace => "Terrace",
        }
    }
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Available, Status::Unavailable, Status::Sold];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Available => "Available",
            Status::Unavailable => "Unavailable",
            Status::Sold => "Sold",
        }
    }
}

macro_rules! closed_enum_text {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

closed_enum_text!(Category, "category");
closed_enum_text!(PropertyType, "property type");
closed_enum_text!(Status, "status");

/// A property listing as served by the API (or loaded from a local catalog)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub slug: String,
    pub category: Category,
    pub property_type: PropertyType,
    /// Display name of the area, e.g. "Jabi"
    #[serde(default)]
    pub area: String,
    /// Canonical area identifier used for filtering
    #[serde(default)]
    pub area_slug: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    /// Price in naira
    pub price: u64,
    #[serde(default)]
    pub rooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default)]
    pub parking: u32,
    #[serde(default)]
    pub water: bool,
    #[serde(default)]
    pub electricity: bool,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_fee: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspection_fee: Option<u64>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Property {
    pub fn is_available(&self) -> bool {
        self.status == Status::Available
    }

    /// First image, used as the card thumbnail
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Accepts full RFC 3339 timestamps from the API and bare dates from hand-written catalogs.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(None);
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Some(dt.and_utc()))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid createdAt: {raw}")))
}

/// Body sent when creating or editing a listing from the admin panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDraft {
    pub title: String,
    pub category: Category,
    pub property_type: PropertyType,
    pub price: u64,
    pub area_slug: String,
    pub city: String,
    pub state: String,
    pub rooms: u32,
    pub bathrooms: u32,
    pub parking: u32,
    pub water: bool,
    pub electricity: bool,
    pub description: String,
    pub images: Vec<String>,
    pub agent_fee: Option<u64>,
    pub inspection_fee: Option<u64>,
    pub featured: bool,
    pub status: Status,
}

impl Default for PropertyDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: Category::Rent,
            property_type: PropertyType::Flat,
            price: 0,
            area_slug: String::new(),
            city: "Abuja".to_string(),
            state: "FCT".to_string(),
            rooms: 0,
            bathrooms: 0,
            parking: 0,
            water: true,
            electricity: true,
            description: String::new(),
            images: Vec::new(),
            agent_fee: None,
            inspection_fee: None,
            featured: false,
            status: Status::Available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_enums_case_insensitively() {
        assert_eq!("rent".parse::<Category>(), Ok(Category::Rent));
        assert_eq!(
            "self-contain".parse::<PropertyType>(),
            Ok(PropertyType::SelfContain)
        );
        assert!("Castle".parse::<PropertyType>().is_err());
    }

    #[test]
    fn deserializes_api_record() {
        let property: Property = serde_json::from_value(json!({
            "_id": "65f0",
            "title": "3 Bedroom Flat",
            "slug": "3-bedroom-flat",
            "category": "Rent",
            "propertyType": "Self-Contain",
            "areaSlug": "jabi",
            "price": 1500000,
            "createdAt": "2024-03-01T10:00:00.000Z",
            "images": ["a.jpg", "b.jpg"]
        }))
        .unwrap();

        assert_eq!(property.id, "65f0");
        assert_eq!(property.property_type, PropertyType::SelfContain);
        assert_eq!(property.status, Status::Available);
        assert_eq!(property.cover_image(), Some("a.jpg"));
        assert!(property.created_at.is_some());
    }

    #[test]
    fn accepts_bare_dates() {
        let property: Property = serde_json::from_value(json!({
            "id": "1",
            "title": "Plot",
            "slug": "plot",
            "category": "Land",
            "propertyType": "Land",
            "price": 0,
            "createdAt": "2024-01-15"
        }))
        .unwrap();

        let created = property.created_at.unwrap();
        assert_eq!(created.format("%Y-%m-%d").to_string(), "2024-01-15");
    }

    #[test]
    fn rejects_negative_price() {
        let result = serde_json::from_value::<Property>(json!({
            "id": "1",
            "title": "Bad",
            "slug": "bad",
            "category": "Sale",
            "propertyType": "Flat",
            "price": -5
        }));
        assert!(result.is_err());
    }
}
