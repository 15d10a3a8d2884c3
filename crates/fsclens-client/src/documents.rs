//! Links to decision documents.
//!
//! Every decision has a main document. A companion document (the
//! enforcement notice) only exists for some, so it is probed with `HEAD`
//! before being offered.

use fsclens_core::DecisionKey;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DocumentLinks {
    client: reqwest::Client,
    base_url: String,
}

impl DocumentLinks {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn download_url(&self, key: DecisionKey) -> String {
        format!("{}/decisions/{}/{}/download", self.base_url, key.year, key.id)
    }

    pub fn companion_url(&self, key: DecisionKey) -> String {
        format!(
            "{}/decisions/{}/{}/companion-download",
            self.base_url, key.year, key.id
        )
    }

    /// The companion URL if the backend reports it exists.
    ///
    /// Any failure (transport error or non-2xx) yields `None`.
    pub async fn probe_companion(&self, key: DecisionKey) -> Option<String> {
        let url = self.companion_url(key);
        match self.client.head(&url).send().await {
            Ok(resp) if resp.status().is_success() => Some(url),
            Ok(resp) => {
                debug!(%key, status = resp.status().as_u16(), "no companion document");
                None
            }
            Err(e) => {
                debug!(%key, error = %e, "companion probe failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_urls() {
        let links = DocumentLinks::new(
            reqwest::Client::new(),
            "http://localhost:8000/api/v1/".into(),
        );
        let key = DecisionKey::new(2025, 200);
        assert_eq!(
            links.download_url(key),
            "http://localhost:8000/api/v1/decisions/2025/200/download"
        );
        assert_eq!(
            links.companion_url(key),
            "http://localhost:8000/api/v1/decisions/2025/200/companion-download"
        );
    }
}
