use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One user ID on a key, with the keywords used to find it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Raw user ID, `Name (Comment) <email>`
    pub id: String,

    /// Derived search keywords
    #[serde(default, deserialize_with = "stored_keywords")]
    pub keywords: Vec<String>,

    /// Fields owned by other writers, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Older writers left `null` or a single string where the list belongs.
fn stored_keywords<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        List(Vec<String>),
        Single(String),
    }

    Ok(match Option::<Stored>::deserialize(deserializer)? {
        Some(Stored::List(keywords)) => keywords,
        Some(Stored::Single(keyword)) if !keyword.trim().is_empty() => vec![keyword],
        Some(Stored::Single(_)) | None => Vec::new(),
    })
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            keywords: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

/// A stored key document, addressed by fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyRecord {
    pub fingerprint: String,

    pub identities: Vec<Identity>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KeyRecord {
    pub fn new(fingerprint: impl Into<String>, identities: Vec<Identity>) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            identities,
            extra: Map::new(),
        }
    }

    /// Total number of keywords across all identities
    pub fn keyword_count(&self) -> usize {
        self.identities.iter().map(|uid| uid.keywords.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn unknown_fields_survive_round_trip() {
        let doc = json!({
            "fingerprint": "ABCDEF0123456789",
            "ctime": 1357000000,
            "identities": [
                {"id": "Alice <alice@example.com>", "keywords": ["alice"], "sigs": [1, 2]}
            ]
        });
        let record: KeyRecord = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(record.extra.get("ctime"), Some(&json!(1357000000)));
        assert_eq!(record.identities[0].extra.get("sigs"), Some(&json!([1, 2])));
        assert_eq!(serde_json::to_value(&record).unwrap(), doc);
    }

    #[test]
    fn keywords_default_to_empty() {
        let record: KeyRecord = serde_json::from_value(json!({
            "fingerprint": "AA",
            "identities": [{"id": "Bob"}]
        }))
        .unwrap();
        assert!(record.identities[0].keywords.is_empty());
        assert_eq!(record.keyword_count(), 0);
    }

    #[test]
    fn legacy_keyword_values_are_accepted() {
        let record: KeyRecord = serde_json::from_value(json!({
            "fingerprint": "AA",
            "identities": [
                {"id": "Alice Example <alice@example.com>", "keywords": null},
                {"id": "Bob", "keywords": "bob builder"},
                {"id": "Carol", "keywords": ""}
            ]
        }))
        .unwrap();
        assert!(record.identities[0].keywords.is_empty());
        assert_eq!(record.identities[1].keywords, vec!["bob builder"]);
        assert!(record.identities[2].keywords.is_empty());
        assert!(record.identities[0].extra.is_empty());
    }

    #[test]
    fn keywords_of_the_wrong_shape_are_rejected() {
        let result = serde_json::from_value::<KeyRecord>(json!({
            "fingerprint": "AA",
            "identities": [{"id": "Alice", "keywords": [1, 2]}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn missing_identity_id_is_rejected() {
        let result = serde_json::from_value::<KeyRecord>(json!({
            "fingerprint": "AA",
            "identities": [{"keywords": []}]
        }));
        assert!(result.is_err());
    }
}
