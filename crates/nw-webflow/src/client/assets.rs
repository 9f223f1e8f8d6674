//! Asset operations for the Webflow API.
//!
//! Uploading is two requests: asset creation returns a presigned storage form
//! and the final hosted URL, then the bytes are posted to storage.

use md5::{Digest, Md5};
use tracing::{debug, info};

use super::WebflowClient;
use super::multipart::MultipartForm;
use crate::error::WebflowError;
use crate::types::{CreateAssetRequest, CreateAssetResponse};

impl WebflowClient {
    /// Upload bytes as a site asset and return its hosted URL.
    pub fn upload_asset(
        &self,
        data: &[u8],
        content_type: &str,
        file_name: &str,
    ) -> Result<String, WebflowError> {
        let file_hash = hex::encode(Md5::digest(data));
        let created = self.create_asset(file_name, &file_hash)?;

        let upload_url = created
            .upload_url
            .ok_or(WebflowError::MissingField("uploadUrl"))?;
        let details = created
            .upload_details
            .ok_or(WebflowError::MissingField("uploadDetails"))?;
        let hosted_url = created
            .hosted_url
            .ok_or(WebflowError::MissingField("hostedUrl"))?;

        let mut form = MultipartForm::new();
        for (name, value) in details.form_fields() {
            form.text(name, value);
        }
        form.file("file", file_name, content_type, data);
        let form_type = form.content_type();
        let body = form.finish();

        debug!(file = file_name, bytes = data.len(), "Uploading asset to storage");

        let response = self
            .agent
            .post(&upload_url)
            .header("Content-Type", &form_type)
            .send(&body[..])?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let error_body = response
                .into_body()
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(WebflowError::HttpResponse {
                status,
                body: error_body,
            });
        }

        info!("Uploaded asset '{}' to {}", file_name, hosted_url);
        Ok(hosted_url)
    }

    /// Register an asset and obtain its upload form.
    fn create_asset(
        &self,
        file_name: &str,
        file_hash: &str,
    ) -> Result<CreateAssetResponse, WebflowError> {
        let request = CreateAssetRequest {
            file_name: file_name.to_owned(),
            file_hash: file_hash.to_owned(),
        };
        let payload = serde_json::to_vec(&request)?;

        let response = self
            .agent
            .post(&self.assets_url())
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload[..])?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(WebflowError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let body = body_reader.read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }
}
