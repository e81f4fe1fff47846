//! NLP server endpoints.
//!
//! Each method issues one failover-protected call and extracts its field
//! from the decoded response. An absent or empty field yields `None`.

use crate::client::NlpClient;
use crate::response::{Article, Neighbour, PolyglotResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Language used by [`NlpClient::embeddings`] when the caller has no preference.
pub const DEFAULT_EMBEDDINGS_LANG: &str = "en";

impl NlpClient {
    /// Extract an article from raw HTML.
    pub async fn newspaper_html(&self, html: &str) -> Option<Article> {
        let data = self.post("/newspaper", &[("text", html)]).await?;
        extract(&data, "newspaper")
    }

    /// Download and extract the article at `url`.
    pub async fn newspaper_url(&self, url: &str) -> Option<Article> {
        let data = self.get("/newspaper", &[("url", url)]).await?;
        extract(&data, "newspaper")
    }

    /// Nearest neighbours of `word` in the `lang` embedding space.
    pub async fn embeddings(&self, word: &str, lang: &str) -> Option<Vec<Neighbour>> {
        let data = self
            .get("/embeddings", &[("word", word), ("lang", lang)])
            .await?;
        extract(&data, "neighbours")
    }

    /// Entities and sentiment of `text`.
    ///
    /// Without a `language` the server detects it. An unreachable server or
    /// an unusable answer yields an empty [`PolyglotResult`].
    pub async fn polyglot(&self, text: &str, language: Option<&str>) -> PolyglotResult {
        let mut params = vec![("text", text)];
        if let Some(lang) = language {
            params.push(("lang", lang));
        }

        match self.post("/polyglot", &params).await {
            Some(data) => extract(&data, "polyglot").unwrap_or_default(),
            None => PolyglotResult::default(),
        }
    }

    /// Two-letter language code of `text`.
    ///
    /// Norwegian Bokmål (`nb`) and Nynorsk (`nn`) are both reported as `no`.
    pub async fn language(&self, text: &str) -> Option<String> {
        let data = self.post("/language", &[("text", text)]).await?;
        let code = data.get("langid")?.get("language")?.as_str()?;
        Some(normalize_language(code).to_string())
    }
}

fn normalize_language(code: &str) -> &str {
    match code {
        "nb" | "nn" => "no",
        other => other,
    }
}

/// Decode `data[field]` unless it is missing or empty.
fn extract<T: DeserializeOwned>(data: &Value, field: &str) -> Option<T> {
    let value = data.get(field).filter(|v| !is_empty(v))?;

    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(field, error = %e, "Unexpected shape in NLP server response");
            None
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(_) => false,
    }
}
