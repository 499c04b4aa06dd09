//! Neo4jStore — `CategoryStore` over the Neo4j HTTP transaction API
//!
//! Every query is a single auto-commit request to
//! `POST {url}/db/{database}/tx/commit`. Each namespace maps to its own
//! database through `database_pattern` (`{lang}wiki` by default).

use super::{CategoryStore, StoreError, StoreResult};
use crate::graph::{CategoryKey, CategoryPath, CategoryRef, Namespace, PathEdge};
use async_trait::async_trait;
use indexmap::IndexSet;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Connection settings for a Neo4j server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jConfig {
    /// HTTP base URL, e.g. `http://localhost:7474`
    pub url: String,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Database name per namespace; `{lang}` is replaced by the namespace
    pub database_pattern: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:7474".to_string(),
            user: Some("neo4j".to_string()),
            password: None,
            database_pattern: "{lang}wiki".to_string(),
            timeout_secs: 30,
        }
    }
}

const PATH_PROJECTION: &str = "RETURN [n IN nodes(p) | {title: n.title, f_title: n.f_title}] AS nodes, \
     [r IN relationships(p) | [startNode(r).title, type(r), endNode(r).title]] AS edges";

const SINGLE_NODE: &str = "MATCH (s:category {f_title: $source}) \
     RETURN [{title: s.title, f_title: s.f_title}] AS nodes, [] AS edges";

// Needs the APOC plugin; subgraphNodes yields the start node first, then BFS order
const ANCESTOR_EXPANSION: &str = "MATCH (c:category {f_title: $start}) \
     CALL apoc.path.subgraphNodes(c, {maxLevel: $level, relationshipFilter: '<subcat', bfs: true}) \
     YIELD node RETURN node.f_title AS key";

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
struct TxResult {
    #[serde(default)]
    data: Vec<TxRow>,
}

#[derive(Debug, Deserialize)]
struct TxRow {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct TxError {
    code: String,
    #[serde(default)]
    message: String,
}

impl TxError {
    fn into_store_error(self) -> StoreError {
        let text = format!("{}: {}", self.code, self.message);
        // Neo.<Classification>.<Category>.<Title>
        let transient = self.code.split('.').nth(1) == Some("TransientError");
        if transient || self.code.ends_with("Unavailable") {
            StoreError::Unavailable(text)
        } else {
            StoreError::Protocol(text)
        }
    }
}

/// Network store that runs Cypher against a Neo4j server
pub struct Neo4jStore {
    config: Neo4jConfig,
    http_client: Client,
}

impl Neo4jStore {
    pub fn new(config: Neo4jConfig) -> StoreResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self {
            config: Neo4jConfig {
                url: config.url.trim_end_matches('/').to_string(),
                ..config
            },
            http_client,
        })
    }

    /// Database backing a namespace
    pub fn database(&self, namespace: &Namespace) -> String {
        self.config.database_pattern.replace("{lang}", namespace.as_str())
    }

    /// Run one statement and return its rows
    async fn run(&self, namespace: &Namespace, statement: &str, parameters: Value) -> StoreResult<Vec<Vec<Value>>> {
        let url = format!("{}/db/{}/tx/commit", self.config.url, self.database(namespace));
        let body = json!({
            "statements": [{
                "statement": statement,
                "parameters": parameters,
                "resultDataContents": ["row"],
            }]
        });

        let mut request = self.http_client.post(&url).json(&body);
        if let Some(user) = &self.config.user {
            request = request.basic_auth(user, self.config.password.as_ref());
        }

        let response = request.send().await.map_err(|e| {
            warn!("Neo4j request to {} failed: {}", url, e);
            StoreError::Unavailable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!("Neo4j returned {}", status)));
        }

        let parsed: TxResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Protocol(e.to_string()))?;

        if let Some(error) = parsed.errors.into_iter().next() {
            return Err(error.into_store_error());
        }

        Ok(parsed
            .results
            .into_iter()
            .next()
            .map(|r| r.data.into_iter().map(|d| d.row).collect())
            .unwrap_or_default())
    }

    async fn path(
        &self,
        namespace: &Namespace,
        source: &CategoryKey,
        target: &CategoryKey,
        pattern: String,
    ) -> StoreResult<Option<CategoryPath>> {
        // shortestPath refuses identical endpoints
        let statement = if source == target {
            SINGLE_NODE.to_string()
        } else {
            format!(
                "MATCH (s:category {{f_title: $source}}), (t:category {{f_title: $target}}), \
                 p = {} {} ORDER BY length(p) ASC LIMIT 1",
                pattern, PATH_PROJECTION
            )
        };
        let params = json!({ "source": source.as_str(), "target": target.as_str() });

        let rows = self.run(namespace, &statement, params).await?;
        let Some(row) = rows.into_iter().next() else {
            debug!("[{}] no path {} -> {}", namespace, source, target);
            return Ok(None);
        };
        parse_path_row(row).map(Some)
    }
}

fn parse_path_row(row: Vec<Value>) -> StoreResult<CategoryPath> {
    let mut columns = row.into_iter();
    let (Some(nodes), Some(edges)) = (columns.next(), columns.next()) else {
        return Err(StoreError::Protocol("path row needs nodes and edges columns".to_string()));
    };
    let nodes: Vec<CategoryRef> =
        serde_json::from_value(nodes).map_err(|e| StoreError::Protocol(e.to_string()))?;
    let edges: Vec<PathEdge> =
        serde_json::from_value(edges).map_err(|e| StoreError::Protocol(e.to_string()))?;
    Ok(CategoryPath::new(nodes, edges))
}

#[async_trait]
impl CategoryStore for Neo4jStore {
    async fn shortest_undirected(
        &self,
        namespace: &Namespace,
        source: &CategoryKey,
        target: &CategoryKey,
        max_hops: usize,
    ) -> StoreResult<Option<CategoryPath>> {
        let pattern = format!("shortestPath((s)-[:subcat*..{}]-(t))", max_hops);
        self.path(namespace, source, target, pattern).await
    }

    async fn shortest_directed(
        &self,
        namespace: &Namespace,
        source: &CategoryKey,
        target: &CategoryKey,
        max_hops: usize,
    ) -> StoreResult<Option<CategoryPath>> {
        let pattern = format!("shortestPath((s)-[:subcat*..{}]->(t))", max_hops);
        self.path(namespace, source, target, pattern).await
    }

    async fn ancestor_expansion(
        &self,
        namespace: &Namespace,
        start: &CategoryKey,
        max_level: usize,
    ) -> StoreResult<IndexSet<String>> {
        let params = json!({ "start": start.as_str(), "level": max_level });
        let rows = self.run(namespace, ANCESTOR_EXPANSION, params).await?;

        let mut keys = IndexSet::with_capacity(rows.len());
        for row in rows {
            match row.into_iter().next() {
                Some(Value::String(key)) => {
                    keys.insert(key);
                }
                Some(Value::Null) => {}
                other => {
                    return Err(StoreError::Protocol(format!("unexpected ancestor key {:?}", other)))
                }
            }
        }
        Ok(keys)
    }

    async fn ping(&self) -> StoreResult<()> {
        let url = format!("{}/", self.config.url);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!("Neo4j returned {}", response.status())))
        }
    }

    fn name(&self) -> &'static str {
        "neo4j"
    }
}
