//! Picture lookup. Sources are tried in order until one yields an image:
//! Bing image search, Pixabay (only with an API key), LoremFlickr.

use regex::Regex;
use std::sync::LazyLock;

use super::{content_type, data_uri, endpoint, ExampleFetcher, USER_AGENT};

/// Responses this small are error pages or placeholders.
const MIN_IMAGE_BYTES: usize = 1000;
const BING_CANDIDATES: usize = 3;

static BING_MURL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""murl":"([^"]+)""#).expect("murl pattern is valid"));

impl ExampleFetcher {
    /// A picture for `word` as a `data:` URI.
    pub async fn fetch_image(&self, word: &str) -> Option<String> {
        if let Some(uri) = self.image_from_bing(word).await {
            return Some(uri);
        }
        if let Some(uri) = self.image_from_pixabay(word).await {
            return Some(uri);
        }
        if let Some(uri) = self.image_from_loremflickr(word).await {
            return Some(uri);
        }
        tracing::warn!(word, "no image source succeeded");
        None
    }

    async fn image_from_bing(&self, word: &str) -> Option<String> {
        let url = endpoint(
            &self.endpoints.bing,
            "images/search",
            &[("q", word), ("first", "1")],
        )?;
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.image_timeout)
            .send()
            .await
            .map_err(|e| tracing::debug!(word, error = %e, "bing image search failed"))
            .ok()?;
        if !resp.status().is_success() {
            return None;
        }
        let html = resp.text().await.ok()?;

        for candidate in bing_image_urls(&html).into_iter().take(BING_CANDIDATES) {
            if let Some(uri) = self.download_image(&candidate, true).await {
                tracing::debug!(word, source = "bing", "image downloaded");
                return Some(uri);
            }
        }
        None
    }

    async fn image_from_pixabay(&self, word: &str) -> Option<String> {
        let key = self.pixabay_key.as_deref()?;
        let url = endpoint(
            &self.endpoints.pixabay,
            "api/",
            &[
                ("key", key),
                ("q", word),
                ("image_type", "photo"),
                ("per_page", "3"),
            ],
        )?;
        let resp = self
            .client
            .get(url)
            .timeout(self.image_timeout)
            .send()
            .await
            .map_err(|e| tracing::debug!(word, error = %e, "pixabay search failed"))
            .ok()?;
        if !resp.status().is_success() {
            return None;
        }
        let data: serde_json::Value = resp.json().await.ok()?;
        let hit = &data["hits"][0];
        let image_url = hit["webformatURL"]
            .as_str()
            .or_else(|| hit["previewURL"].as_str())?;

        let uri = self.download_image(image_url, false).await?;
        tracing::debug!(word, source = "pixabay", "image downloaded");
        Some(uri)
    }

    async fn image_from_loremflickr(&self, word: &str) -> Option<String> {
        let url = endpoint(&self.endpoints.loremflickr, &format!("400/300/{word}"), &[])?;
        let uri = self.download_image(url.as_str(), false).await?;
        tracing::debug!(word, source = "loremflickr", "image downloaded");
        Some(uri)
    }

    /// Download `url` and encode it. With `require_image_mime`, responses
    /// not labelled `image/*` are rejected.
    async fn download_image(&self, url: &str, require_image_mime: bool) -> Option<String> {
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.image_timeout)
            .send()
            .await
            .ok()?;
        if !resp.status().is_success() {
            return None;
        }
        let mime = content_type(&resp).unwrap_or_else(|| "image/jpeg".into());
        if require_image_mime && !mime.starts_with("image/") {
            return None;
        }
        let bytes = resp.bytes().await.ok()?;
        if bytes.len() <= MIN_IMAGE_BYTES {
            return None;
        }
        Some(data_uri(&mime, &bytes))
    }
}

/// Full-size image URLs embedded in a Bing image search page.
pub(crate) fn bing_image_urls(html: &str) -> Vec<String> {
    BING_MURL
        .captures_iter(html)
        .map(|caps| caps[1].replace("\\u0026", "&"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_murl_values_in_order() {
        let html = r#"<a m='{"murl":"https://a.example/1.jpg?x=1\u0026y=2","turl":"t"}'></a>
                      <a m='{"murl":"https://b.example/2.png"}'></a>"#;
        assert_eq!(
            bing_image_urls(html),
            vec![
                "https://a.example/1.jpg?x=1&y=2".to_string(),
                "https://b.example/2.png".to_string()
            ]
        );
    }

    #[test]
    fn no_murl_means_no_candidates() {
        assert!(bing_image_urls("<html></html>").is_empty());
    }
}
