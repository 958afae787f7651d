/// Firestore 课程存储
///
/// 通过 Firestore REST v1 接口读写课程集合。
/// Firestore 的类型化字段（stringValue / integerValue / ...）在这里统一转换为普通 JSON
use crate::clients::CourseStore;
use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError, StoreError};
use crate::models::{Course, CourseRecord};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const PAGE_SIZE: usize = 300;

/// Firestore 存储客户端
pub struct FirestoreStore {
    client: Client,
    documents_url: Url,
    api_key: Option<String>,
    auth_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    #[serde(default)]
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl FirestoreStore {
    /// 创建新的存储客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        if config.firestore_project_id.trim().is_empty() {
            return Err(ConfigError::MissingValue {
                key: "firestore_project_id".to_string(),
            }
            .into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::store_request_failed("build client", e))?;

        let documents_url = format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            config.firestore_base_url.trim_end_matches('/'),
            config.firestore_project_id,
            config.firestore_collection
        );
        let documents_url = Url::parse(&documents_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "firestore_base_url".to_string(),
                reason: documents_url.clone(),
            })?;

        Ok(Self {
            client,
            documents_url,
            api_key: config.firestore_api_key.clone(),
            auth_token: config.firestore_auth_token.clone(),
        })
    }

    /// 单个文档的地址，ID 作为一个路径段编码
    fn document_url(&self, id: &str) -> Url {
        let mut url = self.documents_url.clone();
        // new() 已保证可以作为 base
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    /// 附加认证信息
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        match &self.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        }
    }

    /// 发送请求，非 2xx 转为错误
    async fn send(&self, operation: &str, request: RequestBuilder) -> AppResult<reqwest::Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| AppError::store_request_failed(operation, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::store_bad_response(operation, status.as_u16(), body))
    }
}

#[async_trait]
impl CourseStore for FirestoreStore {
    async fn list(&self) -> AppResult<Vec<CourseRecord>> {
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.documents_url.clone())
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: ListDocumentsResponse = self
                .send("list", request)
                .await?
                .json()
                .await
                .map_err(|e| AppError::store_request_failed("list", e))?;

            debug!("读取到 {} 个课程文档", page.documents.len());

            for document in page.documents {
                if document_id(&document.name).is_empty() {
                    warn!("⚠️ 跳过没有名称的课程文档");
                    continue;
                }
                match document_to_record(document) {
                    Ok(record) => records.push(record),
                    Err(e) => warn!("⚠️ 跳过无法识别的课程文档: {}", e),
                }
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(records)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let url = self.document_url(id);
        match self.send("delete", self.client.delete(url)).await {
            Ok(_) => Ok(()),
            Err(AppError::Store(StoreError::BadResponse { status, .. }))
                if status == StatusCode::NOT_FOUND.as_u16() =>
            {
                Err(StoreError::NotFound { id: id.to_string() }.into())
            }
            Err(e) => Err(e),
        }
    }

    async fn create(&self, course: &Course) -> AppResult<String> {
        let Value::Object(course_fields) = serde_json::to_value(course)? else {
            return Err(AppError::Other("课程序列化结果不是对象".to_string()));
        };

        let mut fields = encode_fields(&course_fields);
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        fields.insert("createdAt".to_string(), json!({ "timestampValue": now }));
        fields.insert("updatedAt".to_string(), json!({ "timestampValue": now }));

        let request = self
            .client
            .post(self.documents_url.clone())
            .json(&json!({ "fields": fields }));

        let document: Document = self
            .send("create", request)
            .await?
            .json()
            .await
            .map_err(|e| AppError::store_request_failed("create", e))?;

        match document_id(&document.name) {
            "" => Err(AppError::store_bad_response("create", 200, "响应中缺少文档名称")),
            id => Ok(id.to_string()),
        }
    }
}

/// 文档名的最后一段就是ID
fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn document_to_record(document: Document) -> AppResult<CourseRecord> {
    let mut object = decode_fields(&document.fields);
    object.insert("id".to_string(), Value::String(document_id(&document.name).to_string()));

    serde_json::from_value(Value::Object(object)).map_err(|e| {
        StoreError::MalformedDocument {
            name: document.name.clone(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// 普通 JSON → Firestore 类型化值
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) if n.is_i64() || n.is_u64() => json!({ "integerValue": n.to_string() }),
        Value::Number(n) => json!({ "doubleValue": n }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn encode_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

/// Firestore 类型化值 → 普通 JSON，未知类型转为 null
pub fn decode_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Value::Null;
    };

    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Bool(inner.as_bool().unwrap_or(false)),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .or_else(|| inner.as_i64())
            .map(Value::from)
            .unwrap_or(Value::Null),
        "doubleValue" => inner
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "geoPointValue" => inner.clone(),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .unwrap_or_default(),
        ),
        _ => Value::Null,
    }
}

pub fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scan_for_duplicates;
    use chrono::TimeZone;

    #[test]
    fn test_encode_decode_round_trip() {
        let original = json!({
            "title": "Rust 101",
            "price": 0,
            "rating": 4.5,
            "published": false,
            "image": null,
            "modules": [
                { "id": "module-1", "order": 0, "lessons": [ { "id": "abc", "duration": "4:05" } ] }
            ]
        });

        let encoded = encode_value(&original);
        assert_eq!(encoded["mapValue"]["fields"]["price"], json!({ "integerValue": "0" }));
        assert_eq!(encoded["mapValue"]["fields"]["rating"], json!({ "doubleValue": 4.5 }));

        assert_eq!(decode_value(&encoded), original);
    }

    #[test]
    fn test_document_to_record() {
        let document: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/courses/abc123",
            "fields": {
                "title": { "stringValue": "Intro" },
                "instructorName": { "stringValue": "Ada" },
                "createdAt": { "timestampValue": "2024-01-02T03:04:05.000Z" },
                "price": { "integerValue": "15" },
                "tags": { "arrayValue": {} }
            },
            "createTime": "2020-01-01T00:00:00Z"
        }))
        .unwrap();

        let record = document_to_record(document).unwrap();

        assert_eq!(record.id, "abc123");
        assert_eq!(record.title.as_deref(), Some("Intro"));
        assert_eq!(record.instructor.as_deref(), Some("Ada"));
        assert_eq!(record.price, Some(15.0));
        assert_eq!(
            record.created_at,
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single()
        );
    }

    #[test]
    fn test_document_without_created_at_is_earliest() {
        let legacy: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/courses/old",
            "fields": { "title": { "stringValue": "Legacy" } },
            "createTime": "2030-01-01T00:00:00Z"
        }))
        .unwrap();
        let dated: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/courses/new",
            "fields": {
                "title": { "stringValue": "legacy" },
                "createdAt": { "timestampValue": "2024-01-01T00:00:00Z" }
            }
        }))
        .unwrap();

        let legacy = document_to_record(legacy).unwrap();
        assert_eq!(legacy.created_at, None);

        let records = vec![document_to_record(dated).unwrap(), legacy];
        let groups = scan_for_duplicates(&records);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].keeper().map(|r| r.id.as_str()), Some("old"));
    }

    #[test]
    fn test_bad_field_keeps_document() {
        let document: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/courses/odd",
            "fields": {
                "title": { "integerValue": "7" },
                "createdAt": { "stringValue": "yesterday" },
                "instructorName": { "stringValue": "Ada" }
            }
        }))
        .unwrap();

        let record = document_to_record(document).unwrap();

        assert_eq!(record.id, "odd");
        assert_eq!(record.title, None);
        assert_eq!(record.created_at, None);
        assert_eq!(record.instructor.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_document_url_encodes_id() {
        let config = Config {
            firestore_base_url: "https://firestore.example.com/v1".to_string(),
            firestore_project_id: "demo".to_string(),
            ..Default::default()
        };
        let store = FirestoreStore::new(&config).unwrap();

        assert_eq!(
            store.document_url("a b/c").as_str(),
            "https://firestore.example.com/v1/projects/demo/databases/(default)/documents/courses/a%20b%2Fc"
        );
        assert_eq!(
            store.document_url("abc123").path(),
            "/v1/projects/demo/databases/(default)/documents/courses/abc123"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let config = Config {
            firestore_base_url: "not a url".to_string(),
            firestore_project_id: "demo".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            FirestoreStore::new(&config),
            Err(AppError::Config(ConfigError::InvalidValue { .. }))
        ));
    }
}
