use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::dao::{
    storage::StorageResult,
    table_store::{Conflict, Filter, Order, Query, Row, Table, TableStore},
};

use super::{
    config::PostgrestConfig,
    error::{PostgrestError, PostgrestResult},
};

#[derive(Clone)]
/// [`TableStore`] speaking the PostgREST dialect over HTTP.
pub struct PostgrestStore {
    client: Client,
    base_url: Arc<str>,
    rest_path: Arc<str>,
    auth_path: Arc<str>,
    anon_key: Arc<str>,
    access_token: Option<Arc<str>>,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
}

impl PostgrestStore {
    /// Build a client for the configured project and verify the REST endpoint answers.
    pub async fn connect(config: PostgrestConfig) -> PostgrestResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| PostgrestError::ClientBuilder { source })?;

        let store = Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            rest_path: Arc::from(config.rest_path.trim_matches('/')),
            auth_path: Arc::from(config.auth_path.trim_matches('/')),
            anon_key: Arc::from(config.anon_key),
            access_token: None,
        };

        store.ping().await?;
        Ok(store)
    }

    fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(self.anon_key.as_ref())
    }

    fn request(&self, method: Method, table: Table) -> RequestBuilder {
        let url = format!("{}/{}/{}", self.base_url, self.rest_path, table.name());
        self.client
            .request(method, url)
            .header("apikey", self.anon_key.as_ref())
            .bearer_auth(self.bearer())
    }

    async fn ping(&self) -> PostgrestResult<()> {
        let path = format!("{}/", self.rest_path);
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header("apikey", self.anon_key.as_ref())
            .send()
            .await
            .map_err(|source| PostgrestError::RequestSend {
                path: path.clone(),
                source,
            })?;

        ensure_success(response, &path).await.map(|_| ())
    }

    async fn send_rows(&self, table: Table, builder: RequestBuilder) -> PostgrestResult<Vec<Row>> {
        let path = table.name().to_string();
        let response = builder
            .send()
            .await
            .map_err(|source| PostgrestError::RequestSend {
                path: path.clone(),
                source,
            })?;

        let response = ensure_success(response, &path).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        response
            .json::<Vec<Row>>()
            .await
            .map_err(|source| PostgrestError::DecodeResponse { path, source })
    }

    async fn fetch_user(&self, access_token: String) -> PostgrestResult<Option<Uuid>> {
        let path = format!("{}/user", self.auth_path);
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header("apikey", self.anon_key.as_ref())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|source| PostgrestError::RequestSend {
                path: path.clone(),
                source,
            })?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Ok(None);
        }

        let response = ensure_success(response, &path).await?;
        let user = response
            .json::<AuthUser>()
            .await
            .map_err(|source| PostgrestError::DecodeResponse { path, source })?;
        Ok(Some(user.id))
    }
}

impl TableStore for PostgrestStore {
    fn select(&self, table: Table, query: Query) -> BoxFuture<'static, StorageResult<Vec<Row>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut params = vec![("select".to_string(), "*".to_string())];
            params.extend(encode_filters(&query.filters));
            if let Some(order) = encode_order(&query.order) {
                params.push(("order".into(), order));
            }
            if let Some(limit) = query.limit {
                params.push(("limit".into(), limit.to_string()));
            }

            let builder = store.request(Method::GET, table).query(&params);
            store.send_rows(table, builder).await.map_err(Into::into)
        })
    }

    fn insert(&self, table: Table, rows: Vec<Row>) -> BoxFuture<'static, StorageResult<Vec<Row>>> {
        let store = self.clone();
        Box::pin(async move {
            let builder = store
                .request(Method::POST, table)
                .header("Prefer", "return=representation")
                .json(&rows);
            store.send_rows(table, builder).await.map_err(Into::into)
        })
    }

    fn upsert(
        &self,
        table: Table,
        rows: Vec<Row>,
        conflict: Conflict,
    ) -> BoxFuture<'static, StorageResult<Vec<Row>>> {
        let store = self.clone();
        Box::pin(async move {
            let resolution = if conflict.ignore_duplicates {
                "resolution=ignore-duplicates,return=representation"
            } else {
                "resolution=merge-duplicates,return=representation"
            };
            let builder = store
                .request(Method::POST, table)
                .query(&[("on_conflict", conflict.columns.join(","))])
                .header("Prefer", resolution)
                .json(&rows);
            store.send_rows(table, builder).await.map_err(Into::into)
        })
    }

    fn update(
        &self,
        table: Table,
        filters: Vec<Filter>,
        patch: Row,
    ) -> BoxFuture<'static, StorageResult<Vec<Row>>> {
        let store = self.clone();
        Box::pin(async move {
            let builder = store
                .request(Method::PATCH, table)
                .query(&encode_filters(&filters))
                .header("Prefer", "return=representation")
                .json(&patch);
            store.send_rows(table, builder).await.map_err(Into::into)
        })
    }

    fn delete(
        &self,
        table: Table,
        filters: Vec<Filter>,
    ) -> BoxFuture<'static, StorageResult<Vec<Row>>> {
        let store = self.clone();
        Box::pin(async move {
            let builder = store
                .request(Method::DELETE, table)
                .query(&encode_filters(&filters))
                .header("Prefer", "return=representation");
            store.send_rows(table, builder).await.map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }

    fn resolve_user(&self, access_token: &str) -> BoxFuture<'static, StorageResult<Option<Uuid>>> {
        let store = self.clone();
        let access_token = access_token.to_string();
        Box::pin(async move { store.fetch_user(access_token).await.map_err(Into::into) })
    }

    fn scoped(&self, access_token: &str) -> Arc<dyn TableStore> {
        let mut scoped = self.clone();
        scoped.access_token = Some(Arc::from(access_token));
        Arc::new(scoped)
    }
}

async fn ensure_success(response: Response, path: &str) -> PostgrestResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorPayload>(&body)
        .ok()
        .and_then(|payload| payload.message.or(payload.msg))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("unexpected status {status} for `{path}`"));

    Err(PostgrestError::Rejected {
        path: path.to_string(),
        status,
        message,
    })
}

fn encode_filters(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|filter| {
            let encoded = match filter {
                Filter::Eq(_, value) => format!("eq.{}", scalar(value)),
                Filter::In(_, values) => {
                    let list = values.iter().map(quoted).collect::<Vec<_>>().join(",");
                    format!("in.({list})")
                }
                Filter::Gte(_, value) => format!("gte.{}", scalar(value)),
                Filter::IsNull(_) => "is.null".to_string(),
                Filter::NotNull(_) => "not.is.null".to_string(),
            };
            (filter.column().to_string(), encoded)
        })
        .collect()
}

fn encode_order(order: &[Order]) -> Option<String> {
    if order.is_empty() {
        return None;
    }
    Some(
        order
            .iter()
            .map(|clause| {
                let direction = if clause.ascending { "asc" } else { "desc" };
                format!("{}.{direction}.nullslast", clause.column)
            })
            .collect::<Vec<_>>()
            .join(","),
    )
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".into(),
        other => other.to_string(),
    }
}

fn quoted(value: &Value) -> String {
    match value {
        Value::String(text) => format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\"")),
        other => scalar(other),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path, query_param},
    };

    use super::*;
    use crate::dao::table_store::patch;

    async fn connected(server: &MockServer) -> PostgrestStore {
        Mock::given(method("GET"))
            .and(path("/rest/v1/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;

        PostgrestStore::connect(PostgrestConfig::new(server.uri(), "anon"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn select_encodes_filters_order_and_limit() {
        let server = MockServer::start().await;
        let store = connected(&server).await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/strokes"))
            .and(query_param("round_id", "eq.r1"))
            .and(query_param("hole_number", "in.(1,2)"))
            .and(query_param("order", "seq.asc.nullslast"))
            .and(query_param("limit", "5"))
            .and(header("apikey", "anon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "s1", "seq": 1}])))
            .mount(&server)
            .await;

        let rows = store
            .select(
                Table::Strokes,
                Query::new()
                    .eq("round_id", "r1")
                    .filter(Filter::is_in("hole_number", [1, 2]))
                    .asc("seq")
                    .limit(5),
            )
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!("s1"));
    }

    #[tokio::test]
    async fn scoped_store_sends_session_token() {
        let server = MockServer::start().await;
        let store = connected(&server).await;

        Mock::given(method("PATCH"))
            .and(path("/rest/v1/rounds"))
            .and(query_param("id", "eq.r1"))
            .and(header("authorization", "Bearer user-token"))
            .and(header("prefer", "return=representation"))
            .and(body_json(json!({"status": "complete"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "r1"}])))
            .mount(&server)
            .await;

        let updated = store
            .scoped("user-token")
            .update(
                Table::Rounds,
                vec![Filter::eq("id", "r1")],
                patch([("status", json!("complete"))]),
            )
            .await
            .unwrap();

        assert_eq!(updated.len(), 1);
    }

    #[tokio::test]
    async fn rejected_request_surfaces_store_message() {
        let server = MockServer::start().await;
        let store = connected(&server).await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/bag_clubs"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "23505",
                "message": "duplicate key value violates unique constraint \"bag_clubs_user_id_label_key\""
            })))
            .mount(&server)
            .await;

        let err = store
            .insert(Table::BagClubs, vec![patch([("label", json!("7i"))])])
            .await
            .unwrap_err();

        assert!(err.is_duplicate());
        assert!(err.to_string().starts_with("duplicate key value"));
    }

    #[tokio::test]
    async fn upsert_sends_conflict_target() {
        let server = MockServer::start().await;
        let store = connected(&server).await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/round_holes"))
            .and(query_param("on_conflict", "round_id,hole_number"))
            .and(header(
                "prefer",
                "resolution=ignore-duplicates,return=representation",
            ))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
            .mount(&server)
            .await;

        let written = store
            .upsert(
                Table::RoundHoles,
                vec![patch([("hole_number", json!(1))])],
                Conflict {
                    columns: vec!["round_id", "hole_number"],
                    ignore_duplicates: true,
                },
            )
            .await
            .unwrap();

        assert!(written.is_empty());
    }

    #[tokio::test]
    async fn resolve_user_maps_unauthorized_to_none() {
        let server = MockServer::start().await;
        let store = connected(&server).await;
        let user_id = Uuid::new_v4();

        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": user_id})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer bad"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        assert_eq!(store.resolve_user("good").await.unwrap(), Some(user_id));
        assert_eq!(store.resolve_user("bad").await.unwrap(), None);
    }

    #[test]
    fn in_lists_quote_text_values() {
        let encoded = encode_filters(&[Filter::is_in("id", ["a,b", "c"])]);
        assert_eq!(encoded[0].1, "in.(\"a,b\",\"c\")");
    }
}
