//! Menu source: the one read-only endpoint feeding the normalizer.

use thiserror::Error;
use tracing::debug;

use crate::menu::wire::RawCategory;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("menu endpoint returned HTTP {0}")]
    Status(u16),
    #[error("menu request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("menu payload malformed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Fetches the category tree once at session start; a retry re-issues the
/// same request. Discarding a late response is the session's job (fetch
/// tickets), not the source's.
#[derive(Clone, Debug)]
pub struct HttpMenuSource {
    client: reqwest::Client,
    url: String,
}

impl HttpMenuSource {
    /// `url` is the full categories endpoint, e.g.
    /// `https://resto.example.com:8443/menu/justcool/categories`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self) -> Result<Vec<RawCategory>, FetchError> {
        debug!(url = %self.url, "fetching menu");
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn menu_body() -> serde_json::Value {
        serde_json::json!([
            {
                "name": "Naans",
                "description": "Nos naans garnis maison",
                "sort_order": 0,
                "is_active": true,
                "id": "cat-naan-001",
                "products": [
                    {
                        "name": "Naan Kebab",
                        "description": "Viande de kebab marinée",
                        "price": 7.50,
                        "is_active": true,
                        "sort_order": 0,
                        "id": "prod-naan-002",
                        "image_url": null,
                        "supplement_groups": []
                    }
                ]
            }
        ])
    }

    #[tokio::test]
    async fn fetch_parses_categories() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/menu/justcool/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(menu_body()))
            .mount(&server)
            .await;

        let source = HttpMenuSource::new(format!("{}/menu/justcool/categories", server.uri()));
        let categories = source.fetch().await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].products[0].name, "Naan Kebab");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = HttpMenuSource::new(server.uri());
        match source.fetch().await {
            Err(FetchError::Status(503)) => {}
            other => panic!("expected HTTP 503 error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let source = HttpMenuSource::new(server.uri());
        assert!(matches!(source.fetch().await, Err(FetchError::Decode(_))));
    }
}
