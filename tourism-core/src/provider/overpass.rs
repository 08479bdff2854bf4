use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    model::PoiElement,
    provider::{PoiQuery, TagFilter, read_body},
};

use super::{PoiProvider, ProviderId};

/// Server-side timeout embedded in every query, in seconds.
const QUERY_TIMEOUT_SECS: u32 = 30;

#[derive(Debug, Clone)]
pub struct OverpassProvider {
    base_url: String,
    http: Client,
}

impl OverpassProvider {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self { base_url: base_url.into(), http }
    }
}

#[derive(Debug, Deserialize)]
struct OpResponse {
    #[serde(default)]
    elements: Vec<PoiElement>,
}

impl TagFilter {
    fn to_overpass_ql(self) -> String {
        match self {
            TagFilter::Exists(key) => format!("[\"{key}\"]"),
            TagFilter::OneOf(key, values) => format!("[\"{key}\"~\"^({})$\"]", values.join("|")),
        }
    }
}

/// Render a radius search over nodes, ways and relations.
pub fn build_query(query: &PoiQuery) -> String {
    let filter = query.filter.to_overpass_ql();
    let around = format!("(around:{},{},{})", query.radius_m, query.latitude, query.longitude);

    let mut ql = format!("[out:json][timeout:{QUERY_TIMEOUT_SECS}];\n(\n");
    for kind in ["node", "way", "relation"] {
        ql.push_str(&format!("  {kind}{filter}{around};\n"));
    }
    ql.push_str(");\nout body;\n>;\nout skel qt;");
    ql
}

#[async_trait]
impl PoiProvider for OverpassProvider {
    async fn around(&self, query: &PoiQuery) -> Result<Vec<PoiElement>> {
        let ql = build_query(query);

        let res = self
            .http
            .post(&self.base_url)
            .form(&[("data", ql.as_str())])
            .send()
            .await
            .context("Failed to send request to Overpass (interpreter)")?;

        let body = read_body(ProviderId::Overpass, res).await?;

        let parsed: OpResponse =
            serde_json::from_str(&body).context("Failed to parse Overpass JSON")?;

        Ok(parsed.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn parks_query() -> PoiQuery {
        PoiQuery {
            filter: TagFilter::OneOf("leisure", &["park", "garden"]),
            latitude: 12.97,
            longitude: 77.59,
            radius_m: 25_000,
        }
    }

    #[test]
    fn query_covers_every_element_kind() {
        let ql = build_query(&parks_query());

        assert!(ql.starts_with("[out:json][timeout:30];"));
        assert!(ql.contains("node[\"leisure\"~\"^(park|garden)$\"](around:25000,12.97,77.59);"));
        assert!(ql.contains("way[\"leisure\"~\"^(park|garden)$\"](around:25000,12.97,77.59);"));
        assert!(ql.contains("relation[\"leisure\"~\"^(park|garden)$\"](around:25000,12.97,77.59);"));
        assert!(ql.ends_with("out skel qt;"));
    }

    #[test]
    fn exists_filter_has_no_value_match() {
        let query = PoiQuery { filter: TagFilter::Exists("historic"), ..parks_query() };
        assert!(build_query(&query).contains("node[\"historic\"](around:25000,12.97,77.59);"));
    }

    #[tokio::test]
    async fn around_posts_query_and_reads_elements() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/interpreter")
            .match_body(Matcher::Regex("data=%5Bout%3Ajson%5D".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"version": 0.6, "elements": [
                    {"type": "way", "id": 1, "tags": {"name": "Cubbon Park", "leisure": "park"}},
                    {"type": "node", "id": 2, "lat": 12.9, "lon": 77.5}
                ]}"#,
            )
            .create_async()
            .await;

        let provider =
            OverpassProvider::new(format!("{}/api/interpreter", server.url()), Client::new());
        let elements = provider.around(&parks_query()).await.expect("elements");

        mock.assert_async().await;
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].tag("name"), Some("Cubbon Park"));
        assert_eq!(elements[1].tag_count(), 0);
    }

    #[tokio::test]
    async fn around_reports_gateway_timeouts() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/interpreter")
            .with_status(504)
            .with_body("<html>Gateway Timeout</html>")
            .create_async()
            .await;

        let provider =
            OverpassProvider::new(format!("{}/api/interpreter", server.url()), Client::new());
        let err = provider.around(&parks_query()).await.unwrap_err();

        assert!(err.to_string().contains("overpass request failed with status 504"));
    }
}
