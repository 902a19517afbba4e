use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::applications::{ApplicantField, ApplicationDraft};
use crate::errors::AppError;

const DEFAULT_CONFIRMATION: &str = "Your application has been successfully submitted";

#[derive(Debug, Deserialize)]
struct RemoteSubmitResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionReceipt {
    pub success: bool,
    pub message: String,
}

/// Forwards validated applications to `{base}/api/applications`.
#[derive(Clone)]
pub struct ApplicationClient {
    client: Client,
    base_url: String,
}

impl ApplicationClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn build_form(draft: &ApplicationDraft) -> Result<Form, AppError> {
        let mut form = Form::new();
        for field in ApplicantField::ALL {
            let value = draft.field(field);
            if !value.is_empty() {
                form = form.text(field.field_name(), value.to_string());
            }
        }
        for (kind, file) in draft.attachments() {
            let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.file_name.clone());
            if let Some(content_type) = &file.content_type {
                part = part
                    .mime_str(content_type)
                    .map_err(|e| AppError::Validation(format!("Invalid content type: {e}")))?;
            }
            form = form.part(kind.field_name(), part);
        }
        Ok(form)
    }

    pub async fn submit(&self, draft: &ApplicationDraft) -> Result<SubmissionReceipt, AppError> {
        let url = format!("{}/api/applications", self.base_url);
        let form = Self::build_form(draft)?;
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("POST {url}: {e}")))?;

        let status = response.status();
        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "POST {url} returned {status}: {body}"
            )));
        }

        // An empty or non-JSON success body still counts as accepted.
        let data = response.json::<RemoteSubmitResponse>().await.ok();
        let message = data
            .as_ref()
            .and_then(|d| d.message.clone())
            .filter(|m| !m.trim().is_empty());

        if status.is_success() && data.as_ref().map_or(true, |d| d.success) {
            info!(email = %draft.email, files = draft.attachments().len(), "Application submitted");
            Ok(SubmissionReceipt {
                success: true,
                message: message.unwrap_or_else(|| DEFAULT_CONFIRMATION.to_string()),
            })
        } else {
            warn!(status = %status, "Application rejected by remote API");
            Err(AppError::Validation(message.unwrap_or_else(|| {
                "Your application could not be submitted".to_string()
            })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::Attachment;
    use bytes::Bytes;

    #[test]
    fn test_form_rejects_bad_content_type() {
        let mut draft = ApplicationDraft::default();
        draft
            .attach_resume(
                Attachment {
                    file_name: "cv.pdf".to_string(),
                    content_type: Some("not a mime".to_string()),
                    bytes: Bytes::from_static(b"%PDF-1.4"),
                },
                1024,
            )
            .unwrap();
        assert!(matches!(
            ApplicationClient::build_form(&draft),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_upstream_error() {
        let client = ApplicationClient::new(Client::new(), "http://127.0.0.1:9");
        let result = client.submit(&ApplicationDraft::default()).await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
    }
}
