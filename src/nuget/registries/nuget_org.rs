//! NuGet v3 search service implementation

use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::SEARCH_PAGE_SIZE;
use crate::nuget::dedup::dedup_by_key;
use crate::nuget::error::RegistryError;
use crate::nuget::index::PackageIndex;
use crate::nuget::registries::type_search::{TypeSearchClient, bool_param};
use crate::nuget::types::{PackageCandidate, TypeSearchHit};

/// Default base URL for the nuget.org search service
const DEFAULT_BASE_URL: &str = "https://azuresearch-usnc.nuget.org";

/// Response from the search service `query` endpoint
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchResult>,
}

/// One package in a search response
#[derive(Debug, Deserialize)]
struct SearchResult {
    id: String,
    version: String,
    #[serde(default)]
    versions: Vec<SearchVersion>,
}

#[derive(Debug, Deserialize)]
struct SearchVersion {
    version: String,
}

/// Package index backed by the nuget.org HTTP search service
pub struct NugetOrgIndex {
    client: reqwest::Client,
    base_url: String,
    type_search: TypeSearchClient,
}

impl NugetOrgIndex {
    /// Creates a new NugetOrgIndex with a custom base URL
    pub fn new(base_url: &str, type_search: TypeSearchClient) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("nuget-lsp")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
            type_search,
        }
    }

    async fn query(
        &self,
        q: &str,
        take: Option<usize>,
        include_prerelease: bool,
    ) -> Result<SearchResponse, RegistryError> {
        let take = take.map(|t| t.to_string());
        let mut params = vec![
            ("q", q),
            ("prerelease", bool_param(include_prerelease)),
            ("semVerLevel", "2.0.0"),
        ];
        if let Some(take) = take.as_deref() {
            params.push(("take", take));
        }

        let url = Url::parse_with_params(&format!("{}/query", self.base_url), &params)
            .map_err(|e| RegistryError::InvalidUrl(e.to_string()))?;

        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(q.to_string()));
        }

        if !status.is_success() {
            warn!("NuGet search returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse NuGet search response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })
    }
}

impl Default for NugetOrgIndex {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, TypeSearchClient::default())
    }
}

#[async_trait::async_trait]
impl PackageIndex for NugetOrgIndex {
    async fn search(
        &self,
        query: &str,
        include_prerelease: bool,
    ) -> Result<Vec<PackageCandidate>, RegistryError> {
        let response = self
            .query(query, Some(SEARCH_PAGE_SIZE), include_prerelease)
            .await?;

        let candidates = response
            .data
            .into_iter()
            .map(|r| PackageCandidate::new(r.id, r.version))
            .collect();

        Ok(dedup_by_key(candidates, |c: &PackageCandidate| c.id.clone()))
    }

    async fn search_exact(
        &self,
        id: &str,
        include_prerelease: bool,
    ) -> Result<Vec<String>, RegistryError> {
        let response = self
            .query(&format!("packageid:{}", id), None, include_prerelease)
            .await?;

        let versions: Vec<String> = response
            .data
            .into_iter()
            .filter(|r| r.id.eq_ignore_ascii_case(id))
            .flat_map(|r| r.versions.into_iter().map(|v| v.version))
            .collect();

        debug!("Found {} versions for package {}", versions.len(), id);

        Ok(versions)
    }

    async fn search_by_type(
        &self,
        type_name: &str,
        include_prerelease: bool,
    ) -> Vec<TypeSearchHit> {
        self.type_search.find(type_name, include_prerelease).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn index_for(server: &mockito::ServerGuard) -> NugetOrgIndex {
        NugetOrgIndex::new(&server.url(), TypeSearchClient::new(&server.url()))
    }

    #[tokio::test]
    async fn search_returns_candidates_in_rank_order() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/query")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "serilog".into()),
                Matcher::UrlEncoded("take".into(), "5".into()),
                Matcher::UrlEncoded("prerelease".into(), "false".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "totalHits": 3,
                    "data": [
                        { "id": "Serilog", "version": "4.0.0" },
                        { "id": "Serilog.Sinks.Console", "version": "6.0.0" },
                        { "id": "Serilog.Extensions.Logging", "version": "8.0.0" }
                    ]
                }"#,
            )
            .create_async()
            .await;

        let index = index_for(&server);
        let result = index.search("serilog", false).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            result,
            vec![
                PackageCandidate::new("Serilog", "4.0.0"),
                PackageCandidate::new("Serilog.Sinks.Console", "6.0.0"),
                PackageCandidate::new("Serilog.Extensions.Logging", "8.0.0"),
            ]
        );
    }

    #[tokio::test]
    async fn search_deduplicates_repeated_ids() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/query")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "data": [
                        { "id": "Polly", "version": "8.4.0" },
                        { "id": "Polly", "version": "7.2.4" }
                    ]
                }"#,
            )
            .create_async()
            .await;

        let index = index_for(&server);
        let result = index.search("polly", true).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, vec![PackageCandidate::new("Polly", "8.4.0")]);
    }

    #[tokio::test]
    async fn search_exact_flattens_versions_of_matching_groups() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/query")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "packageid:Newtonsoft.Json".into()),
                Matcher::UrlEncoded("prerelease".into(), "true".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "data": [
                        {
                            "id": "Newtonsoft.Json",
                            "version": "13.0.3",
                            "versions": [
                                { "version": "12.0.3", "downloads": 10 },
                                { "version": "13.0.3", "downloads": 20 }
                            ]
                        },
                        {
                            "id": "newtonsoft.json",
                            "version": "13.0.4-beta1",
                            "versions": [{ "version": "13.0.4-beta1" }]
                        },
                        {
                            "id": "Newtonsoft.Json.Bson",
                            "version": "1.0.2",
                            "versions": [{ "version": "1.0.2" }]
                        }
                    ]
                }"#,
            )
            .create_async()
            .await;

        let index = index_for(&server);
        let result = index.search_exact("Newtonsoft.Json", true).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, vec!["12.0.3", "13.0.3", "13.0.4-beta1"]);
    }

    #[tokio::test]
    async fn search_exact_returns_not_found_for_404() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/query")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let index = index_for(&server);
        let result = index.search_exact("Missing.Package", false).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn search_propagates_server_errors() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/query")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let index = index_for(&server);
        let result = index.search("anything", false).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn search_by_type_delegates_to_type_search() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/api/v1/find-type")
            .match_query(Matcher::UrlEncoded("name".into(), "ILogger".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "packages": [{ "id": "Microsoft.Extensions.Logging" }] }"#)
            .create_async()
            .await;

        let index = index_for(&server);
        let result = index.search_by_type("ILogger", false).await;

        mock.assert_async().await;
        assert_eq!(
            result,
            vec![TypeSearchHit {
                id: "Microsoft.Extensions.Logging".to_string()
            }]
        );
    }
}
