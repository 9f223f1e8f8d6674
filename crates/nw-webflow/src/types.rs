//! Webflow asset API types.

use serde::{Deserialize, Serialize};

/// Body of `POST /sites/{site_id}/assets`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetRequest {
    pub file_name: String,
    /// MD5 hex digest of the file bytes.
    pub file_hash: String,
}

/// Response of asset creation: where and how to upload the bytes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetResponse {
    #[serde(default)]
    pub upload_url: Option<String>,
    #[serde(default)]
    pub upload_details: Option<UploadDetails>,
    #[serde(default)]
    pub hosted_url: Option<String>,
}

/// Presigned form fields for the storage upload.
///
/// The API returns the form field names; the camelCase aliases are accepted
/// as well.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadDetails {
    #[serde(default)]
    pub acl: Option<String>,
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(rename = "X-Amz-Algorithm", alias = "xAmzAlgorithm", default)]
    pub x_amz_algorithm: Option<String>,
    #[serde(rename = "X-Amz-Credential", alias = "xAmzCredential", default)]
    pub x_amz_credential: Option<String>,
    #[serde(rename = "X-Amz-Date", alias = "xAmzDate", default)]
    pub x_amz_date: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(rename = "Policy", alias = "policy", default)]
    pub policy: Option<String>,
    #[serde(rename = "X-Amz-Signature", alias = "xAmzSignature", default)]
    pub x_amz_signature: Option<String>,
    #[serde(
        rename = "success_action_status",
        alias = "successActionStatus",
        default
    )]
    pub success_action_status: Option<String>,
    #[serde(rename = "content-type", alias = "contentType", alias = "Content-Type", default)]
    pub content_type: Option<String>,
    #[serde(rename = "Cache-Control", alias = "cacheControl", default)]
    pub cache_control: Option<String>,
}

impl UploadDetails {
    /// Form fields in upload order. Absent values are sent empty.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("acl", &self.acl),
            ("bucket", &self.bucket),
            ("X-Amz-Algorithm", &self.x_amz_algorithm),
            ("X-Amz-Credential", &self.x_amz_credential),
            ("X-Amz-Date", &self.x_amz_date),
            ("key", &self.key),
            ("Policy", &self.policy),
            ("X-Amz-Signature", &self.x_amz_signature),
            ("success_action_status", &self.success_action_status),
            ("Content-Type", &self.content_type),
            ("Cache-Control", &self.cache_control),
        ]
        .into_iter()
        .map(|(name, value)| (name, value.as_deref().unwrap_or_default()))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_is_camel_case() {
        let body = serde_json::to_value(CreateAssetRequest {
            file_name: "cat.png".to_owned(),
            file_hash: "abc".to_owned(),
        })
        .unwrap();
        assert_eq!(body, json!({ "fileName": "cat.png", "fileHash": "abc" }));
    }

    #[test]
    fn test_upload_details_form_names() {
        let response: CreateAssetResponse = serde_json::from_value(json!({
            "uploadUrl": "https://bucket.s3.amazonaws.com",
            "hostedUrl": "https://cdn.example.com/cat.png",
            "uploadDetails": {
                "acl": "public-read",
                "bucket": "bucket",
                "X-Amz-Algorithm": "AWS4-HMAC-SHA256",
                "X-Amz-Credential": "cred",
                "X-Amz-Date": "20260101T000000Z",
                "key": "site/cat.png",
                "Policy": "policy",
                "X-Amz-Signature": "sig",
                "success_action_status": "201",
                "content-type": "image/png",
                "Cache-Control": "max-age=31536000, must-revalidate"
            }
        }))
        .unwrap();

        let details = response.upload_details.unwrap();
        let fields = details.form_fields();

        assert_eq!(fields.len(), 11);
        assert_eq!(fields[0], ("acl", "public-read"));
        assert_eq!(fields[2], ("X-Amz-Algorithm", "AWS4-HMAC-SHA256"));
        assert_eq!(fields[9], ("Content-Type", "image/png"));
        assert_eq!(fields[10].0, "Cache-Control");
    }

    #[test]
    fn test_upload_details_camel_case_aliases() {
        let details: UploadDetails = serde_json::from_value(json!({
            "xAmzAlgorithm": "AWS4-HMAC-SHA256",
            "successActionStatus": "201",
            "contentType": "image/jpeg",
            "cacheControl": "no-cache"
        }))
        .unwrap();

        assert_eq!(details.x_amz_algorithm.as_deref(), Some("AWS4-HMAC-SHA256"));
        assert_eq!(details.success_action_status.as_deref(), Some("201"));
        assert_eq!(details.content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(details.cache_control.as_deref(), Some("no-cache"));
    }
}
