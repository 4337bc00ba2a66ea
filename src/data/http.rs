//! HTTP binding of [`RemoteFileService`] for the drive's REST API.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::DriveConfig;
use crate::data::remote::{RemoteFileService, RemoteFuture};
use crate::error::AppError;
use crate::models::file_entry::{EntryId, FileEntry, UploadFile};

const MAX_ERROR_MESSAGE_CHARS: usize = 200;

pub struct HttpFileService {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpFileService {
    pub fn from_config(config: &DriveConfig) -> Result<Self, AppError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: parse_base_url(config.base_url())?,
            token: config.api_token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    fn resolve_content_url(&self, content_url: &str) -> Result<Url, AppError> {
        self.base_url
            .join(content_url)
            .map_err(|e| AppError::General(format!("invalid content url {content_url}: {e}")))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, AppError> {
        let response = ensure_success(self.authorized(builder).send().await?).await?;
        Ok(response.json::<T>().await?)
    }
}

fn parse_base_url(base: &str) -> Result<Url, AppError> {
    // Trailing slash keeps the last path segment when joining relative locators.
    Url::parse(&format!("{}/", base.trim_end_matches('/')))
        .map_err(|e| AppError::Config(format!("invalid api_base_url {base}: {e}")))
}

fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

async fn ensure_success(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    Err(AppError::Remote {
        status: status.as_u16(),
        message,
    })
}

fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["message", "msg", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return Some(text.to_string());
            }
        }
    }
    Some(trimmed.chars().take(MAX_ERROR_MESSAGE_CHARS).collect())
}

impl RemoteFileService for HttpFileService {
    fn list_folder_contents<'a>(
        &'a self,
        parent_id: Option<&'a EntryId>,
    ) -> RemoteFuture<'a, Vec<FileEntry>> {
        Box::pin(async move {
            let mut request = self.client.get(self.endpoint("/files"));
            if let Some(parent) = parent_id {
                request = request.query(&[("parent", parent.as_str())]);
            }
            self.send_json(request).await
        })
    }

    fn list_all_folders<'a>(&'a self) -> RemoteFuture<'a, Vec<FileEntry>> {
        Box::pin(async move {
            self.send_json(self.client.get(self.endpoint("/files/folders")))
                .await
        })
    }

    fn create_entry<'a>(
        &'a self,
        file: &'a UploadFile,
        parent_id: Option<&'a EntryId>,
    ) -> RemoteFuture<'a, FileEntry> {
        Box::pin(async move {
            let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
            let mut form = Form::new().part("file", part);
            if let Some(parent) = parent_id {
                form = form.text("parentId", parent.to_string());
            }
            self.send_json(
                self.client
                    .post(self.endpoint("/files/upload"))
                    .multipart(form),
            )
            .await
        })
    }

    fn create_folder_entry<'a>(
        &'a self,
        name: &'a str,
        parent_id: Option<&'a EntryId>,
    ) -> RemoteFuture<'a, FileEntry> {
        Box::pin(async move {
            self.send_json(
                self.client
                    .post(self.endpoint("/files/folder"))
                    .json(&json!({ "name": name, "parentId": parent_id })),
            )
            .await
        })
    }

    fn rename_entry<'a>(
        &'a self,
        id: &'a EntryId,
        new_name: &'a str,
    ) -> RemoteFuture<'a, FileEntry> {
        Box::pin(async move {
            self.send_json(
                self.client
                    .put(self.endpoint(&format!("/files/{id}")))
                    .json(&json!({ "name": new_name })),
            )
            .await
        })
    }

    fn delete_entry<'a>(&'a self, id: &'a EntryId) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let request = self.client.delete(self.endpoint(&format!("/files/{id}")));
            ensure_success(self.authorized(request).send().await?).await?;
            Ok(())
        })
    }

    fn fetch_bytes<'a>(&'a self, content_url: &'a str) -> RemoteFuture<'a, Vec<u8>> {
        Box::pin(async move {
            let url = self.resolve_content_url(content_url)?;
            let mut request = self.client.get(url.clone());
            // Content often lives on a CDN; the API token only goes to the API host.
            if same_origin(&url, &self.base_url) {
                request = self.authorized(request);
            }
            let response = ensure_success(request.send().await?).await?;
            Ok(response.bytes().await?.to_vec())
        })
    }
}
