//! Chapter illustration via Unsplash.
//!
//! [`Illustrator::resolve`] always produces a URL. With an access key it
//! searches Unsplash and picks a random landscape photo; without one, or
//! when the search fails or comes back empty, it returns a keyless
//! `source.unsplash.com` query URL built from the same keywords.

use rand::seq::SliceRandom;
use serde::Deserialize;

const SEARCH_API_BASE: &str = "https://api.unsplash.com";
const FALLBACK_BASE: &str = "https://source.unsplash.com";

/// Environment variable holding the Unsplash access key.
pub const ACCESS_KEY_VAR: &str = "UNSPLASH_ACCESS_KEY";

/// Strip everything but ASCII letters, digits and spaces, then turn each
/// space into a comma.
pub fn sanitize_keywords(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .map(|c| if c == ' ' { ',' } else { c })
        .collect()
}

/// Combined search keywords: `fantasy,<setting>,<character>,<prompt>`.
pub fn build_keywords(image_prompt: &str, character_name: &str, setting: &str) -> String {
    format!(
        "fantasy,{},{},{}",
        sanitize_keywords(setting),
        character_name,
        sanitize_keywords(image_prompt)
    )
}

/// Resolves image prompts to displayable URLs.
#[derive(Clone)]
pub struct Illustrator {
    client: reqwest::Client,
    access_key: Option<String>,
    api_base: String,
    fallback_base: String,
}

impl Illustrator {
    /// Create an illustrator. `None` means every chapter gets a fallback URL.
    pub fn new(access_key: Option<String>) -> Self {
        let access_key = access_key.filter(|k| !k.trim().is_empty());
        if access_key.is_none() {
            tracing::warn!(
                "{ACCESS_KEY_VAR} is not set. Falling back to basic random images. For better results, provide a key."
            );
        }

        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            access_key,
            api_base: SEARCH_API_BASE.to_string(),
            fallback_base: FALLBACK_BASE.to_string(),
        }
    }

    /// Point the search API at a different root (used against mock servers).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_access_key(&self) -> bool {
        self.access_key.is_some()
    }

    /// Keyless random-image URL for the given keywords.
    pub fn fallback_url(&self, keywords: &str) -> String {
        format!(
            "{}/1024x768/?{keywords}&t={}",
            self.fallback_base,
            chrono::Utc::now().timestamp_millis()
        )
    }

    /// Find an image URL for a chapter. Never fails.
    pub async fn resolve(&self, image_prompt: &str, character_name: &str, setting: &str) -> String {
        let keywords = build_keywords(image_prompt, character_name, setting);
        let fallback = self.fallback_url(&keywords);

        let Some(access_key) = &self.access_key else {
            return fallback;
        };

        match self.search(access_key, &keywords).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                tracing::warn!(query = %keywords, "no Unsplash images found, using fallback");
                fallback
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching from Unsplash API");
                fallback
            }
        }
    }

    async fn search(&self, access_key: &str, keywords: &str) -> Result<Option<String>, SearchError> {
        tracing::debug!(query = %keywords, "searching Unsplash");

        let response = self
            .client
            .get(format!("{}/search/photos", self.api_base))
            .query(&[
                ("query", keywords),
                ("per_page", "20"),
                ("orientation", "landscape"),
                ("order_by", "relevant"),
            ])
            .header("Authorization", format!("Client-ID {access_key}"))
            .header("Accept-Version", "v1")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.errors.into_iter().next())
                .unwrap_or_else(|| "Check your Access Key.".to_string());
            return Err(SearchError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let page: SearchPage = response.json().await?;
        let photo = page.results.choose(&mut rand::thread_rng());
        Ok(photo.map(|p| p.urls.regular.clone()))
    }
}

#[derive(Debug, thiserror::Error)]
enum SearchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unsplash API error: {status}. {detail}")]
    Status { status: u16, detail: String },
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_punctuation() {
        assert_eq!(sanitize_keywords("A dark, stormy night!"), "A,dark,stormy,night");
        assert_eq!(sanitize_keywords("Dragon's Tooth Mountains"), "Dragons,Tooth,Mountains");
    }

    #[test]
    fn test_sanitize_keeps_repeated_spaces_as_commas() {
        assert_eq!(sanitize_keywords("a  b"), "a,,b");
        assert_eq!(sanitize_keywords("café ☕"), "caf,");
    }

    #[test]
    fn test_build_keywords() {
        assert_eq!(
            build_keywords("a rusty key, on stone.", "Kaelen", "Dragon's Tooth Mountains"),
            "fantasy,Dragons,Tooth,Mountains,Kaelen,a,rusty,key,on,stone"
        );
    }

    #[test]
    fn test_fallback_url_template() {
        let illustrator = Illustrator::new(None);
        let url = illustrator.fallback_url("fantasy,a,b");
        assert!(url.starts_with("https://source.unsplash.com/1024x768/?fantasy,a,b&t="));
        let stamp = url.rsplit("&t=").next().unwrap();
        assert!(stamp.parse::<i64>().is_ok());
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        assert!(!Illustrator::new(Some("   ".to_string())).has_access_key());
        assert!(Illustrator::new(Some("abc".to_string())).has_access_key());
    }

    #[tokio::test]
    async fn test_resolve_without_key_returns_fallback() {
        let illustrator = Illustrator::new(None);
        let url = illustrator
            .resolve("a rusty key", "Kaelen", "Whispering Shadowfen")
            .await;
        assert!(url.starts_with(
            "https://source.unsplash.com/1024x768/?fantasy,Whispering,Shadowfen,Kaelen,a,rusty,key&t="
        ));
    }
}
