//! Interest catalog: maps a trip interest to map-data tag filters.
//!
//! The catalog is configuration owned by the point loader. The default table
//! covers eight interests; a JSON catalog can replace it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Accepted values for a tag key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValues {
    /// `true` matches any value as long as the key is present; `false`
    /// disables the filter.
    Any(bool),
    OneOf(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    pub key: String,
    pub values: TagValues,
}

impl TagFilter {
    pub fn one_of(key: &str, values: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            values: TagValues::OneOf(values.iter().map(|v| v.to_string()).collect()),
        }
    }

    pub fn any(key: &str) -> Self {
        Self {
            key: key.to_string(),
            values: TagValues::Any(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    pub label: String,
    pub filters: Vec<TagFilter>,
}

impl Interest {
    fn new(label: &str, filters: Vec<TagFilter>) -> Self {
        Self {
            label: label.to_string(),
            filters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterestCatalog {
    interests: BTreeMap<String, Interest>,
}

impl InterestCatalog {
    pub fn new(interests: BTreeMap<String, Interest>) -> Self {
        Self { interests }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn get(&self, key: &str) -> Option<&Interest> {
        self.interests.get(key)
    }

    /// Tag filters for `key`; unknown keys fall back to `tourism=attraction`.
    pub fn filters_for(&self, key: &str) -> Vec<TagFilter> {
        match self.interests.get(key) {
            Some(interest) => interest.filters.clone(),
            None => vec![TagFilter::one_of("tourism", &["attraction"])],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Interest)> + '_ {
        self.interests.iter().map(|(key, interest)| (key.as_str(), interest))
    }

    pub fn len(&self) -> usize {
        self.interests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interests.is_empty()
    }
}

impl Default for InterestCatalog {
    fn default() -> Self {
        let table = [
            (
                "1",
                Interest::new(
                    "Culture & History",
                    vec![
                        TagFilter::one_of("historic", &["castle", "monument", "memorial"]),
                        TagFilter::one_of("tourism", &["attraction", "museum"]),
                    ],
                ),
            ),
            (
                "2",
                Interest::new(
                    "Nature & Parks",
                    vec![
                        TagFilter::one_of("leisure", &["park", "garden", "nature_reserve"]),
                        TagFilter::one_of("natural", &["wood"]),
                    ],
                ),
            ),
            (
                "3",
                Interest::new(
                    "Shopping",
                    vec![TagFilter::one_of("shop", &["mall", "department_store", "clothes", "supermarket"])],
                ),
            ),
            (
                "4",
                Interest::new(
                    "Culinary",
                    vec![
                        TagFilter::one_of("amenity", &["restaurant", "cafe", "fast_food"]),
                        TagFilter::any("cuisine"),
                    ],
                ),
            ),
            (
                "5",
                Interest::new(
                    "Temples & Places of Worship",
                    vec![
                        TagFilter::one_of("amenity", &["place_of_worship"]),
                        TagFilter::one_of("religion", &["shinto", "buddhist"]),
                    ],
                ),
            ),
            (
                "6",
                Interest::new("Museums & Galleries", vec![TagFilter::one_of("tourism", &["museum", "gallery"])]),
            ),
            (
                "7",
                Interest::new(
                    "City Views",
                    vec![
                        TagFilter::one_of("tourism", &["viewpoint"]),
                        TagFilter::one_of("man_made", &["tower"]),
                    ],
                ),
            ),
            (
                "8",
                Interest::new(
                    "Family Activities",
                    vec![
                        TagFilter::one_of("leisure", &["zoo", "aquarium"]),
                        TagFilter::one_of("tourism", &["theme_park"]),
                    ],
                ),
            ),
        ];

        Self::new(
            table
                .into_iter()
                .map(|(key, interest)| (key.to_string(), interest))
                .collect(),
        )
    }
}
