use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A neighbourhood that listings are grouped under
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Area {
    fn seeded(name: &str, slug: &str, description: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            slug: slug.to_string(),
            description: description.to_string(),
            image: Some(format!("/areas/{slug}.jpg")),
        }
    }
}

/// The Abuja districts the site launched with; used by the offline catalog
pub fn known_areas() -> Vec<Area> {
    vec![
        Area::seeded(
            "Jabi",
            "jabi",
            "Growing district near the lake and the city centre, with upscale homes and malls.",
        ),
        Area::seeded(
            "Lugbe",
            "lugbe",
            "Affordable satellite town along the airport road, popular with first-time buyers.",
        ),
        Area::seeded(
            "Katampe",
            "katampe",
            "Quiet hill-top neighbourhood with high-end homes and views over the city.",
        ),
        Area::seeded(
            "Maitama",
            "maitama",
            "Embassy district with luxury estates and the city's top amenities.",
        ),
        Area::seeded(
            "Gwarinpa",
            "gwarinpa",
            "Very large housing estate with family-sized homes and an active community.",
        ),
        Area::seeded(
            "Wuse",
            "wuse",
            "Central commercial and residential hub close to markets and offices.",
        ),
    ]
}

/// Image attached to an area form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaImage {
    /// Local file uploaded as multipart
    Upload(PathBuf),
    /// Already-hosted image kept as-is when editing
    Existing(String),
}

/// Admin form for creating or editing an area
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaForm {
    pub name: String,
    pub description: String,
    pub image: Option<AreaImage>,
}
