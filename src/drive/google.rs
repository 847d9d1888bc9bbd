//! Google Drive v3 client.
//!
//! Uses the REST API directly with a bearer token obtained by the page's OAuth
//! flow. Metadata calls go to `api_base`, content uploads to `upload_base`.
//!
//! HTTP 401 maps to `DriveError::Auth` so the page can force a fresh login;
//! every other non-success reply becomes `DriveError::Status` carrying Google's
//! own error message. No retries.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{
    DirectoryClient, FileContent, LIST_PAGE_SIZE, RECENT_PAGE_SIZE, SEARCH_PAGE_SIZE, guess_mime,
    query,
};
use crate::config::DriveEndpoints;
use crate::error::{DriveError, DriveResult};
use crate::models::{FOLDER_MIME, FileRecord, Quota, ROOT_ID, UserInfo};

const FILE_FIELDS: &str = "id,name,mimeType,size,createdTime,modifiedTime,parents,webViewLink,thumbnailLink,iconLink,shared,starred,trashed";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    #[serde(default)]
    mime_type: String,
    /// Decimal string in the v3 API.
    size: Option<String>,
    created_time: Option<DateTime<Utc>>,
    modified_time: Option<DateTime<Utc>>,
    #[serde(default)]
    parents: Vec<String>,
    web_view_link: Option<String>,
    thumbnail_link: Option<String>,
    icon_link: Option<String>,
    #[serde(default)]
    shared: bool,
    #[serde(default)]
    starred: bool,
    #[serde(default)]
    trashed: bool,
}

impl From<DriveFile> for FileRecord {
    fn from(file: DriveFile) -> Self {
        let is_folder = file.mime_type == FOLDER_MIME;
        FileRecord {
            size: if is_folder {
                None
            } else {
                file.size.as_deref().and_then(|s| s.parse().ok())
            },
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
            created_time: file.created_time,
            modified_time: file.modified_time,
            parents: file.parents,
            web_view_link: file.web_view_link,
            thumbnail_link: file.thumbnail_link,
            icon_link: file.icon_link,
            shared: file.shared,
            starred: file.starred,
            trashed: file.trashed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AboutResponse {
    storage_quota: StorageQuota,
}

#[derive(Debug, Deserialize)]
struct StorageQuota {
    limit: Option<String>,
    usage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
}

pub struct GoogleDriveClient {
    http: reqwest::Client,
    endpoints: DriveEndpoints,
    token: RwLock<Option<SecretString>>,
}

impl GoogleDriveClient {
    pub fn new(endpoints: DriveEndpoints, access_token: &str) -> DriveResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .connect_timeout(std::time::Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http,
            endpoints,
            token: RwLock::new(Some(SecretString::from(access_token.to_string()))),
        })
    }

    fn bearer(&self) -> DriveResult<String> {
        let token = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match token.as_ref() {
            Some(token) => Ok(format!("Bearer {}", token.expose_secret())),
            None => Err(DriveError::NotInitialized),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.endpoints.api_base, path)
    }

    fn upload_url(&self, path: &str) -> String {
        format!("{}{}", self.endpoints.upload_base, path)
    }

    fn file_url(&self, id: &str) -> DriveResult<Url> {
        file_url(&self.endpoints.api_base, id)
    }

    async fn send(&self, request: RequestBuilder) -> DriveResult<Response> {
        let response = request.header(AUTHORIZATION, self.bearer()?).send().await?;
        check_status(response).await
    }

    async fn list_files(&self, q: String, order_by: &str, page_size: u32) -> DriveResult<Vec<FileRecord>> {
        debug!("Drive list q={}", q);
        let request = self.http.get(self.api_url("/files")).query(&[
            ("q", q),
            ("fields", format!("files({})", FILE_FIELDS)),
            ("orderBy", order_by.to_string()),
            ("pageSize", page_size.to_string()),
        ]);
        let list: DriveFileList = decode(self.send(request).await?).await?;
        Ok(list.files.into_iter().map(FileRecord::from).collect())
    }
}

/// `<base>/files/<id>` with the id as one percent-encoded path segment.
fn file_url(base: &str, id: &str) -> DriveResult<Url> {
    let mut url =
        Url::parse(base).map_err(|e| DriveError::Endpoint(format!("{}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| DriveError::Endpoint(base.to_string()))?
        .pop_if_empty()
        .push("files")
        .push(id);
    Ok(url)
}

async fn check_status(response: Response) -> DriveResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GoogleErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());

    match status {
        StatusCode::UNAUTHORIZED => Err(DriveError::Auth(message)),
        StatusCode::NOT_FOUND => Err(DriveError::NotFound(message)),
        _ => Err(DriveError::Status {
            status: status.as_u16(),
            message,
        }),
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> DriveResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| DriveError::Decode(e.to_string()))
}

fn parents_of(parent: Option<&str>) -> Vec<&str> {
    vec![parent.unwrap_or(ROOT_ID)]
}

#[async_trait]
impl DirectoryClient for GoogleDriveClient {
    async fn user_info(&self) -> DriveResult<UserInfo> {
        let request = self.http.get(&self.endpoints.userinfo_url);
        decode(self.send(request).await?).await
    }

    async fn list(&self, parent: Option<&str>, filter: Option<&str>) -> DriveResult<Vec<FileRecord>> {
        self.list_files(query::children(parent, filter), "folder,name", LIST_PAGE_SIZE)
            .await
    }

    async fn search(&self, text: &str) -> DriveResult<Vec<FileRecord>> {
        self.list_files(query::search(text), "relevance", SEARCH_PAGE_SIZE)
            .await
    }

    async fn get(&self, id: &str) -> DriveResult<FileRecord> {
        let request = self
            .http
            .get(self.file_url(id)?)
            .query(&[("fields", FILE_FIELDS)]);
        let file: DriveFile = decode(self.send(request).await?).await?;
        Ok(file.into())
    }

    async fn create_container(&self, name: &str, parent: Option<&str>) -> DriveResult<FileRecord> {
        let metadata = json!({
            "name": name,
            "mimeType": FOLDER_MIME,
            "parents": parents_of(parent),
        });
        let request = self
            .http
            .post(self.api_url("/files"))
            .query(&[("fields", FILE_FIELDS)])
            .json(&metadata);
        let file: DriveFile = decode(self.send(request).await?).await?;
        Ok(file.into())
    }

    async fn create_file(&self, name: &str, content: &str, parent: Option<&str>) -> DriveResult<FileRecord> {
        let mime = guess_mime(name);
        let metadata = json!({
            "name": name,
            "mimeType": mime,
            "parents": parents_of(parent),
        });

        let form = Form::new()
            .part(
                "metadata",
                Part::text(metadata.to_string()).mime_str("application/json")?,
            )
            .part("file", Part::text(content.to_string()).mime_str(&mime)?);

        let request = self
            .http
            .post(self.upload_url("/files"))
            .query(&[("uploadType", "multipart"), ("fields", FILE_FIELDS)])
            .multipart(form);
        let file: DriveFile = decode(self.send(request).await?).await?;
        Ok(file.into())
    }

    async fn get_content(&self, id: &str) -> DriveResult<FileContent> {
        let request = self
            .http
            .get(self.file_url(id)?)
            .query(&[("alt", "media")]);
        let response = self.send(request).await?;

        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let bytes = response.bytes().await?;
        Ok(FileContent::from_bytes(&mime, bytes.to_vec()))
    }

    async fn set_content(&self, id: &str, text: &str) -> DriveResult<()> {
        let request = self
            .http
            .patch(file_url(&self.endpoints.upload_base, id)?)
            .query(&[("uploadType", "media")])
            .header(CONTENT_TYPE, "text/plain")
            .body(text.to_string());
        self.send(request).await?;
        Ok(())
    }

    async fn rename(&self, id: &str, name: &str) -> DriveResult<()> {
        let request = self
            .http
            .patch(self.file_url(id)?)
            .json(&json!({ "name": name }));
        self.send(request).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DriveResult<()> {
        let request = self.http.delete(self.file_url(id)?);
        self.send(request).await?;
        Ok(())
    }

    async fn recent(&self) -> DriveResult<Vec<FileRecord>> {
        self.list_files(query::recent(), "modifiedTime desc", RECENT_PAGE_SIZE)
            .await
    }

    async fn quota(&self) -> DriveResult<Quota> {
        let request = self
            .http
            .get(self.api_url("/about"))
            .query(&[("fields", "storageQuota")]);
        let about: AboutResponse = decode(self.send(request).await?).await?;

        let used = about
            .storage_quota
            .usage
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let total = about.storage_quota.limit.as_deref().and_then(|s| s.parse().ok());
        Ok(Quota { used, total })
    }

    async fn sign_out(&self) -> DriveResult<()> {
        let token = self
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(DriveError::NotInitialized)?;

        let response = self
            .http
            .post(&self.endpoints.revoke_url)
            .form(&[("token", token.expose_secret())])
            .send()
            .await?;
        if !response.status().is_success() {
            warn!("Token revocation returned {}", response.status());
        }
        Ok(())
    }
}
