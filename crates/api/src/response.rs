//! Shared response envelope types for API handlers.

use serde::Serialize;

/// A filtered list together with the totals computed over it.
///
/// ```ignore
/// Ok(Json(SummarizedList { data: fabrics, summary }))
/// ```
#[derive(Debug, Serialize)]
pub struct SummarizedList<T: Serialize, S: Serialize> {
    pub data: Vec<T>,
    pub summary: S,
}

/// Result of a bulk operation: how many rows it touched.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

/// A file download: body plus `Content-Type` and an attachment
/// `Content-Disposition` carrying `file_name`.
pub fn file_download(
    content_type: &str,
    file_name: &str,
    body: impl Into<axum::body::Body>,
) -> axum::response::Response {
    use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
    use axum::response::IntoResponse;

    (
        [
            (CONTENT_TYPE, content_type.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body.into(),
    )
        .into_response()
}
