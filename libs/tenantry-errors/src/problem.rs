//! RFC 9457 problem documents.

use http::StatusCode;
use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Body of every non-2xx response.
///
/// `code` is the stable machine-readable identifier clients should branch
/// on; `title` and `detail` are for humans and may change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[cfg_attr(feature = "utoipa", schema(title = "Problem"))]
#[must_use]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    #[serde(with = "status_as_u16")]
    #[cfg_attr(feature = "utoipa", schema(value_type = u16, example = 409))]
    pub status: StatusCode,
    pub detail: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Present on 422 responses only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationViolation>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct ValidationViolation {
    /// Request field as the client spelled it, e.g. `adminEmail`.
    pub field: String,
    pub message: String,
}

mod status_as_u16 {
    use http::StatusCode;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(status: &StatusCode, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u16(status.as_u16())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<StatusCode, D::Error> {
        StatusCode::from_u16(u16::deserialize(d)?).map_err(D::Error::custom)
    }
}

impl Problem {
    /// A problem whose title is the canonical reason phrase of `status`.
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: status.canonical_reason().unwrap_or("Error").to_owned(),
            status,
            detail: detail.into(),
            code: String::new(),
            trace_id: None,
            errors: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets `trace_id` when one is known.
    pub fn with_trace_id(mut self, trace_id: Option<String>) -> Self {
        self.trace_id = trace_id;
        self
    }

    pub fn with_violation(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors.get_or_insert_with(Vec::new).push(ValidationViolation {
            field: field.into(),
            message: message.into(),
        });
        self
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for Problem {
    fn into_response(self) -> axum::response::Response {
        let status = self.status;
        (
            status,
            [(http::header::CONTENT_TYPE, APPLICATION_PROBLEM_JSON)],
            axum::Json(self),
        )
            .into_response()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn title_defaults_to_reason_phrase() {
        let p = Problem::new(StatusCode::CONFLICT, "Subdomain already in use");
        assert_eq!(p.title, "Conflict");
        assert_eq!(p.type_url, "about:blank");
        assert!(p.errors.is_none());
    }

    #[test]
    fn violations_accumulate() {
        let p = Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Invalid registration")
            .with_violation("subdomain", "must not be empty")
            .with_violation("adminEmail", "must contain '@'");
        let fields: Vec<_> = p
            .errors
            .unwrap()
            .into_iter()
            .map(|v| v.field)
            .collect();
        assert_eq!(fields, ["subdomain", "adminEmail"]);
    }

    #[test]
    fn wire_shape() {
        let p = Problem::new(StatusCode::NOT_FOUND, "Tenant not found").with_code("TENANCY_NOT_FOUND");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["status"], 404);
        assert_eq!(json["type"], "about:blank");
        assert_eq!(json["code"], "TENANCY_NOT_FOUND");
        assert!(json.get("trace_id").is_none());
        assert!(json.get("errors").is_none());

        let back: Problem = serde_json::from_value(json).unwrap();
        assert_eq!(back.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn out_of_range_status_is_rejected() {
        let json = r#"{"type":"about:blank","title":"x","status":42,"detail":"","code":""}"#;
        assert!(serde_json::from_str::<Problem>(json).is_err());
    }

    #[cfg(feature = "axum")]
    #[test]
    fn response_carries_problem_content_type() {
        use axum::response::IntoResponse;

        let resp = Problem::new(StatusCode::UNAUTHORIZED, "Invalid credentials").into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers()[http::header::CONTENT_TYPE],
            APPLICATION_PROBLEM_JSON
        );
    }
}
