use serde::{Deserialize, Deserializer, Serialize};

/// Standard response wrapper: `{ success, message, data }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Whether a decoded body carries the envelope at all
pub fn is_envelope(body: &serde_json::Value) -> bool {
    body.as_object()
        .is_some_and(|fields| fields.contains_key("success"))
}

/// One page of a paginated list endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// A plain list is read as a single page holding every item.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Paginated<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape<T> {
            Page {
                data: Vec<T>,
                total: Option<u64>,
                page: Option<u32>,
                limit: Option<u32>,
            },
            List(Vec<T>),
        }

        Ok(match Shape::deserialize(deserializer)? {
            Shape::Page {
                data,
                total,
                page,
                limit,
            } => Paginated {
                total: total.unwrap_or(data.len() as u64),
                page: page.unwrap_or(1),
                limit: limit.unwrap_or(data.len() as u32),
                data,
            },
            Shape::List(data) => Paginated {
                total: data.len() as u64,
                page: 1,
                limit: data.len() as u32,
                data,
            },
        })
    }
}

impl<T> Paginated<T> {
    pub fn empty(page: u32, limit: u32) -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page,
            limit,
        }
    }

    /// Number of pages needed to show `total` items at `limit` per page
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return if self.total == 0 { 0 } else { 1 };
        }
        self.total.div_ceil(u64::from(self.limit))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }
}
