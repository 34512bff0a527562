//! Reverse type search ("which package contains this type?")

use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::TYPE_SEARCH_LIMIT;
use crate::nuget::error::RegistryError;
use crate::nuget::types::TypeSearchHit;

/// Default base URL for the type index
const DEFAULT_BASE_URL: &str = "https://resharper-nugetsearch.jetbrains.com";

/// Response from the find-type API
#[derive(Debug, Deserialize)]
struct FindTypeResponse {
    #[serde(default)]
    packages: Vec<FindTypePackage>,
}

#[derive(Debug, Deserialize)]
struct FindTypePackage {
    id: String,
}

/// Client for the type-to-package index
#[derive(Clone)]
pub struct TypeSearchClient {
    client: reqwest::Client,
    base_url: String,
}

impl TypeSearchClient {
    /// Creates a new TypeSearchClient with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("nuget-lsp")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
        }
    }

    /// Find packages containing `type_name`, at most [`TYPE_SEARCH_LIMIT`] hits.
    ///
    /// Any failure is logged and treated as "no results".
    pub async fn find(&self, type_name: &str, include_prerelease: bool) -> Vec<TypeSearchHit> {
        self.try_find(type_name, include_prerelease)
            .await
            .inspect_err(|e| warn!("Failed to search for type {}: {}", type_name, e))
            .unwrap_or_default()
    }

    async fn try_find(
        &self,
        type_name: &str,
        include_prerelease: bool,
    ) -> Result<Vec<TypeSearchHit>, RegistryError> {
        let url = Url::parse_with_params(
            &format!("{}/api/v1/find-type", self.base_url),
            &[
                ("name", type_name),
                ("allowPrerelease", bool_param(include_prerelease)),
                ("caseSensitive", "true"),
            ],
        )
        .map_err(|e| RegistryError::InvalidUrl(e.to_string()))?;

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body: FindTypeResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(e.to_string()))?;

        debug!("Found {} packages for type {}", body.packages.len(), type_name);

        Ok(body
            .packages
            .into_iter()
            .take(TYPE_SEARCH_LIMIT)
            .map(|p| TypeSearchHit { id: p.id })
            .collect())
    }
}

impl Default for TypeSearchClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

pub(crate) fn bool_param(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn find_returns_package_ids() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/api/v1/find-type")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "JsonConvert".into()),
                Matcher::UrlEncoded("allowPrerelease".into(), "false".into()),
                Matcher::UrlEncoded("caseSensitive".into(), "true".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "packages": [
                        { "id": "Newtonsoft.Json", "version": "13.0.3" },
                        { "id": "Newtonsoft.Json.Bson", "version": "1.0.2" }
                    ]
                }"#,
            )
            .create_async()
            .await;

        let client = TypeSearchClient::new(&server.url());
        let result = client.find("JsonConvert", false).await;

        mock.assert_async().await;
        assert_eq!(
            result,
            vec![
                TypeSearchHit {
                    id: "Newtonsoft.Json".to_string()
                },
                TypeSearchHit {
                    id: "Newtonsoft.Json.Bson".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn find_caps_results_at_limit() {
        let mut server = Server::new_async().await;
        let packages: Vec<String> = (0..15)
            .map(|i| format!(r#"{{ "id": "Package{}" }}"#, i))
            .collect();

        let mock = server
            .mock("GET", "/api/v1/find-type")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{ "packages": [{}] }}"#, packages.join(",")))
            .create_async()
            .await;

        let client = TypeSearchClient::new(&server.url());
        let result = client.find("Widget", true).await;

        mock.assert_async().await;
        assert_eq!(result.len(), TYPE_SEARCH_LIMIT);
        assert_eq!(result[0].id, "Package0");
    }

    #[tokio::test]
    async fn find_returns_empty_on_server_error() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/api/v1/find-type")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = TypeSearchClient::new(&server.url());
        let result = client.find("Widget", false).await;

        mock.assert_async().await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn find_returns_empty_on_malformed_body() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/api/v1/find-type")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let client = TypeSearchClient::new(&server.url());
        let result = client.find("Widget", false).await;

        mock.assert_async().await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn find_returns_empty_when_packages_field_missing() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/api/v1/find-type")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let client = TypeSearchClient::new(&server.url());
        let result = client.find("Widget", false).await;

        mock.assert_async().await;
        assert!(result.is_empty());
    }
}
