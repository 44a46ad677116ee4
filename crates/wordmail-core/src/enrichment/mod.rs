//! Best-effort word enrichment: example sentences, pronunciation audio and a
//! picture, each fetched from a public web service.
//!
//! Every lookup returns `None` on any failure. Nothing here is allowed to
//! fail a run.

mod image;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

use crate::review::SelectedWord;
use crate::storage::EnrichmentConfig;

const YOUDAO_BASE: &str = "https://dict.youdao.com";
const BING_BASE: &str = "https://www.bing.com";
const PIXABAY_BASE: &str = "https://pixabay.com";
const LOREMFLICKR_BASE: &str = "https://loremflickr.com";

pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

/// A bilingual example sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub en: String,
    pub zh: String,
}

/// Media gathered for one word. Images and audio are `data:` URIs so the
/// mail needs no external requests to display them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordMedia {
    pub example_en: Option<String>,
    pub example_zh: Option<String>,
    pub image: Option<String>,
    pub audio: Option<String>,
}

/// A selected word plus whatever media could be found for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedWord {
    #[serde(flatten)]
    pub word: SelectedWord,
    #[serde(flatten)]
    pub media: WordMedia,
}

impl EnrichedWord {
    pub fn bare(word: SelectedWord) -> Self {
        Self {
            word,
            media: WordMedia::default(),
        }
    }
}

/// Service endpoints. Overridable so tests can point at a local server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub youdao: String,
    pub bing: String,
    pub pixabay: String,
    pub loremflickr: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            youdao: YOUDAO_BASE.into(),
            bing: BING_BASE.into(),
            pixabay: PIXABAY_BASE.into(),
            loremflickr: LOREMFLICKR_BASE.into(),
        }
    }
}

/// Fetches examples, audio and images for words.
pub struct ExampleFetcher {
    client: Client,
    endpoints: Endpoints,
    timeout: Duration,
    image_timeout: Duration,
    pixabay_key: Option<String>,
}

impl ExampleFetcher {
    pub fn new(config: &EnrichmentConfig) -> Self {
        Self::with_endpoints(config, Endpoints::default())
    }

    pub fn with_endpoints(config: &EnrichmentConfig, endpoints: Endpoints) -> Self {
        Self {
            client: Client::new(),
            endpoints,
            timeout: Duration::from_secs(config.timeout_secs),
            image_timeout: Duration::from_secs(config.image_timeout_secs),
            pixabay_key: config.pixabay_key.clone(),
        }
    }

    /// Example, image and audio for `word`.
    pub async fn fetch_word_data(&self, word: &str) -> WordMedia {
        let example = self.fetch_example(word).await;
        let image = self.fetch_image(word).await;
        let audio = self.fetch_audio(word).await;

        tracing::debug!(
            word,
            example = example.is_some(),
            image = image.is_some(),
            audio = audio.is_some(),
            "word data fetched"
        );

        let (example_en, example_zh) = match example {
            Some(Example { en, zh }) => (Some(en), Some(zh)),
            None => (None, None),
        };
        WordMedia {
            example_en,
            example_zh,
            image,
            audio,
        }
    }

    /// Enrich every word in order.
    pub async fn enrich_all(&self, words: Vec<SelectedWord>) -> Vec<EnrichedWord> {
        let mut enriched = Vec::with_capacity(words.len());
        for word in words {
            let media = self.fetch_word_data(&word.record.word).await;
            enriched.push(EnrichedWord { word, media });
        }
        enriched
    }

    /// First bilingual example sentence from the Youdao dictionary, falling
    /// back to the first web translation.
    pub async fn fetch_example(&self, word: &str) -> Option<Example> {
        let url = endpoint(&self.endpoints.youdao, "jsonapi", &[("q", word)])?;
        let resp = match self.client.get(url).timeout(self.timeout).send().await {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => {
                tracing::warn!(word, "example lookup timed out");
                return None;
            }
            Err(e) => {
                tracing::warn!(word, error = %e, "example lookup failed");
                return None;
            }
        };

        if !resp.status().is_success() {
            tracing::warn!(word, status = %resp.status(), "example lookup rejected");
            return None;
        }

        let data: serde_json::Value = match resp.json().await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(word, error = %e, "example response was not JSON");
                return None;
            }
        };

        let example = extract_example(&data);
        if example.is_none() {
            tracing::warn!(word, "no example found");
        }
        example
    }

    /// Youdao pronunciation as a `data:` URI.
    pub async fn fetch_audio(&self, word: &str) -> Option<String> {
        let url = endpoint(
            &self.endpoints.youdao,
            "dictvoice",
            &[("audio", word), ("type", "1")],
        )?;
        let resp = match self.client.get(url).timeout(self.timeout).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(word, error = %e, "audio download failed");
                return None;
            }
        };
        if !resp.status().is_success() {
            tracing::warn!(word, status = %resp.status(), "audio download rejected");
            return None;
        }

        let mime = content_type(&resp).unwrap_or_else(|| "audio/mpeg".into());
        let bytes = resp.bytes().await.ok()?;
        if bytes.is_empty() {
            return None;
        }
        tracing::debug!(word, size = bytes.len(), "audio downloaded");
        Some(data_uri(&mime, &bytes))
    }
}

/// Pull an example out of a Youdao `jsonapi` response.
pub fn extract_example(data: &serde_json::Value) -> Option<Example> {
    let pair = &data["blng_sents_part"]["sentence-pair"][0];
    if pair.is_object() {
        let en = strip_tags(pair["sentence"].as_str().unwrap_or_default());
        let zh = strip_tags(pair["sentence-translation"].as_str().unwrap_or_default());
        if !en.is_empty() && !zh.is_empty() {
            return Some(Example { en, zh });
        }
    }

    let web = &data["web_trans"]["web-translation"][0];
    let key = web["key"].as_str().unwrap_or_default();
    let value = web["trans"][0]["value"].as_str().unwrap_or_default();
    if !key.is_empty() && !value.is_empty() {
        return Some(Example {
            en: key.to_string(),
            zh: value.to_string(),
        });
    }

    None
}

fn strip_tags(s: &str) -> String {
    HTML_TAG.replace_all(s, "").trim().to_string()
}

/// `base/path?query`, or `None` if `base` is not a URL.
pub(crate) fn endpoint(base: &str, path: &str, query: &[(&str, &str)]) -> Option<Url> {
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    };
    let mut url = Url::parse(&base).ok()?.join(path).ok()?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Some(url)
}

pub(crate) fn content_type(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get(reqwest::header::CONTENT_TYPE)?
        .to_str()
        .ok()
        .map(|s| s.to_string())
}

pub(crate) fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}
