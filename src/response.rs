//! Typed responses of the NLP server endpoints.
//!
//! The server answers with loosely shaped JSON, so every field is optional
//! or defaulted and unknown fields are kept rather than rejected.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Polyglot tag for location entities.
pub const TAG_LOCATION: &str = "I-LOC";
/// Polyglot tag for organization entities.
pub const TAG_ORGANIZATION: &str = "I-ORG";
/// Polyglot tag for person entities.
pub const TAG_PERSON: &str = "I-PER";

/// An article extracted by the `/newspaper` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Article headline.
    #[serde(default)]
    pub title: Option<String>,

    /// Main article text.
    #[serde(default)]
    pub text: Option<String>,

    /// Author names.
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<String>,

    /// Publication date as reported by the server.
    #[serde(default)]
    pub publish_date: Option<String>,

    /// Lead image URL.
    #[serde(default)]
    pub top_image: Option<String>,

    /// All image URLs found in the article.
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,

    /// Embedded video URLs.
    #[serde(default, deserialize_with = "null_as_default")]
    pub movies: Vec<String>,

    /// Canonical URL of the article.
    #[serde(default)]
    pub canonical_link: Option<String>,

    /// `<meta name="description">` content.
    #[serde(default)]
    pub meta_description: Option<String>,

    /// `<meta name="keywords">` content.
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta_keywords: Vec<String>,

    /// Declared page language.
    #[serde(default)]
    pub meta_lang: Option<String>,

    /// Site the article came from.
    #[serde(default)]
    pub source_url: Option<String>,

    /// Any other fields returned by the server.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A nearest neighbour returned by the `/embeddings` endpoint.
///
/// The server sends either a bare word or a `[word, similarity]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNeighbour")]
pub struct Neighbour {
    /// The neighbouring word.
    pub word: String,
    /// Similarity score, when the server provides one.
    pub similarity: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNeighbour {
    Word(String),
    Scored(String, f64),
}

impl From<RawNeighbour> for Neighbour {
    fn from(raw: RawNeighbour) -> Self {
        match raw {
            RawNeighbour::Word(word) => Self {
                word,
                similarity: None,
            },
            RawNeighbour::Scored(word, similarity) => Self {
                word,
                similarity: Some(similarity),
            },
        }
    }
}

/// Entities and sentiment returned by the `/polyglot` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolyglotResult {
    /// Detected or requested language.
    #[serde(default)]
    pub language: Option<String>,

    /// Every entity found, in text order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub entities: Vec<String>,

    /// Entities grouped by polyglot tag (`I-LOC`, `I-ORG`, `I-PER`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub type_entities: BTreeMap<String, Vec<String>>,

    /// Polarity in `[-1, 1]`.
    #[serde(default)]
    pub sentiment: Option<f64>,
}

impl PolyglotResult {
    /// Every entity found.
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Sentiment polarity, `0.0` when unknown.
    pub fn sentiment(&self) -> f64 {
        self.sentiment.unwrap_or(0.0)
    }

    /// Entities with the given polyglot tag.
    pub fn entities_of(&self, tag: &str) -> &[String] {
        self.type_entities
            .get(tag)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Location entities.
    pub fn locations(&self) -> &[String] {
        self.entities_of(TAG_LOCATION)
    }

    /// Organization entities.
    pub fn organizations(&self) -> &[String] {
        self.entities_of(TAG_ORGANIZATION)
    }

    /// Person entities.
    pub fn persons(&self) -> &[String] {
        self.entities_of(TAG_PERSON)
    }

    /// Whether the server reported nothing at all.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.type_entities.is_empty() && self.sentiment.is_none()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
