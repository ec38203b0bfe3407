//! Response bodies for mutations and list metadata.

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Header carrying the total number of records on list responses.
pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

/// `{"detail": ...}` body returned by update and delete.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Detail {
    pub detail: String,
}

/// Body returned by create: a message and the generated id.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Created {
    pub detail: String,
    pub id: i32,
}

pub fn detail(message: impl Into<String>) -> (StatusCode, Json<Detail>) {
    (
        StatusCode::OK,
        Json(Detail {
            detail: message.into(),
        }),
    )
}

pub fn created(id: i32) -> (StatusCode, Json<Created>) {
    (
        StatusCode::CREATED,
        Json(Created {
            detail: "Pokemon added.".into(),
            id,
        }),
    )
}

pub fn total_count_headers(total: i64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(total));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_reports_id_with_201() {
        let (status, Json(body)) = created(7);
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.id, 7);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"detail": "Pokemon added.", "id": 7})
        );
    }

    #[test]
    fn total_count_header_is_set() {
        let headers = total_count_headers(42);
        assert_eq!(headers.get("x-total-count").unwrap(), "42");
    }
}
