//! Клиент GitHub Contents API: репозитории как папки файлового пространства.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL};
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::ClientConfig;
use crate::api::{ConnectionStatus, GitHubApi, GitHubContent, GitHubContentKind, GitHubRepo};
use crate::error::{AdminClientError, AdminClientResult};
use crate::models::LocalFileSpace;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const NO_CACHE: &str = "no-cache, max-age=0";
const CONNECTION_CHECK_TIMEOUT: Duration = Duration::from_secs(10);
const FOLDER_PLACEHOLDER: &str = ".gitkeep";

#[derive(Debug, Deserialize)]
struct RepoDto {
    id: i64,
    name: String,
    full_name: String,
    description: Option<String>,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct ContentDto {
    name: String,
    path: String,
    sha: String,
    #[serde(default)]
    size: u64,
    download_url: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsDto {
    Many(Vec<ContentDto>),
    One(Box<ContentDto>),
}

impl ContentsDto {
    fn into_vec(self) -> Vec<ContentDto> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![*item],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubErrorDto {
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutContentDto<'a> {
    message: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct DeleteContentDto<'a> {
    message: &'a str,
    sha: &'a str,
}

impl From<RepoDto> for GitHubRepo {
    fn from(value: RepoDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            full_name: value.full_name,
            description: value.description,
            html_url: value.html_url,
        }
    }
}

impl From<ContentDto> for GitHubContent {
    fn from(value: ContentDto) -> Self {
        let kind = match value.kind.as_str() {
            "dir" => GitHubContentKind::Dir,
            "symlink" => GitHubContentKind::Symlink,
            "submodule" => GitHubContentKind::Submodule,
            _ => GitHubContentKind::File,
        };
        Self {
            name: value.name,
            path: value.path,
            sha: value.sha,
            size: value.size,
            download_url: value.download_url,
            kind,
        }
    }
}

impl From<GitHubContent> for LocalFileSpace {
    fn from(value: GitHubContent) -> Self {
        Self {
            folder: value.kind == GitHubContentKind::Dir,
            name: value.name,
            url: value.download_url.unwrap_or_default(),
        }
    }
}

impl From<GitHubRepo> for LocalFileSpace {
    fn from(value: GitHubRepo) -> Self {
        Self {
            folder: true,
            name: value.name,
            url: value.html_url,
        }
    }
}

#[derive(Debug, Clone)]
/// HTTP-клиент GitHub REST API с персональным токеном доступа.
pub struct GitHubClient {
    base_url: String,
    client: Client,
    token: Arc<RwLock<Option<String>>>,
}

impl GitHubClient {
    /// Создаёт клиент по конфигурации.
    pub fn new(config: &ClientConfig) -> AdminClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            base_url: config.github_api_url.clone(),
            client,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Устанавливает токен; пустая строка удаляет его.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        let value = if token.trim().is_empty() {
            None
        } else {
            Some(token.trim().to_string())
        };
        match self.token.write() {
            Ok(mut slot) => *slot = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }

    /// Текущий токен.
    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> AdminClientResult<RequestBuilder> {
        let token = self.token().ok_or(AdminClientError::GitHubTokenRequired)?;
        Ok(self
            .client
            .request(method, self.endpoint(path))
            .header(AUTHORIZATION, format!("token {token}"))
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(CACHE_CONTROL, NO_CACHE))
    }

    async fn send(&self, request: RequestBuilder) -> AdminClientResult<reqwest::Response> {
        let response = request.send().await.map_err(|err| AdminClientError::GitHub {
            status: err.status().map(|status| status.as_u16()).unwrap_or_default(),
            message: err.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<GitHubErrorDto>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        Err(AdminClientError::GitHub {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T>(&self, request: RequestBuilder) -> AdminClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(request).await?;
        let body = response.bytes().await.map_err(AdminClientError::from_reqwest)?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Создаёт (или перезаписывает новым) файл с содержимым `bytes`.
    pub async fn create_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        bytes: &[u8],
        message: &str,
    ) -> AdminClientResult<()> {
        let encoded = STANDARD.encode(bytes);
        self.put_content(owner, repo, path, &encoded, message).await
    }

    async fn put_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        encoded: &str,
        message: &str,
    ) -> AdminClientResult<()> {
        let path = path.trim_start_matches('/');
        tracing::debug!(owner, repo, path, "PUT github contents");
        let request = self
            .request(Method::PUT, &format!("/repos/{owner}/{repo}/contents/{path}"))?
            .json(&PutContentDto {
                message,
                content: encoded,
            });
        self.send(request).await?;
        Ok(())
    }

    /// Содержимое файла в base64 для копии при переименовании.
    ///
    /// Файлы больше 1 МБ Contents API отдаёт без `content`; их байты
    /// скачиваются по `download_url`.
    async fn original_content(&self, original: &ContentDto) -> AdminClientResult<String> {
        // GitHub отдаёт base64 с переносами строк
        let inline: String = original
            .content
            .as_deref()
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if !inline.is_empty() || original.size == 0 {
            return Ok(inline);
        }

        let Some(url) = original.download_url.as_deref() else {
            return Err(AdminClientError::InvalidRequest(format!(
                "content of {} is not available for copying",
                original.path
            )));
        };
        tracing::debug!(path = %original.path, size = original.size, "downloading raw file");
        let token = self.token().ok_or(AdminClientError::GitHubTokenRequired)?;
        let request = self
            .client
            .request(Method::GET, url)
            .header(AUTHORIZATION, format!("token {token}"));
        let bytes = self
            .send(request)
            .await?
            .bytes()
            .await
            .map_err(AdminClientError::from_reqwest)?;
        if bytes.len() as u64 != original.size {
            return Err(AdminClientError::InvalidRequest(format!(
                "downloaded {} bytes of {}, expected {}",
                bytes.len(),
                original.path,
                original.size
            )));
        }
        Ok(STANDARD.encode(&bytes))
    }

    /// Проверяет доступность GitHub API (`/zen`).
    ///
    /// Токен необязателен; ошибки не возвращаются, а описываются в статусе.
    pub async fn test_connection(&self) -> ConnectionStatus {
        let mut request = self
            .client
            .request(Method::GET, self.endpoint("/zen"))
            .header(ACCEPT, GITHUB_ACCEPT)
            .timeout(CONNECTION_CHECK_TIMEOUT);
        if let Some(token) = self.token() {
            request = request.header(AUTHORIZATION, format!("token {token}"));
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => ConnectionStatus {
                ok: true,
                message: "GitHub API доступен".to_string(),
            },
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                ConnectionStatus {
                    ok: false,
                    message: format!("GitHub API ответил {status}: {}", body.trim()),
                }
            }
            Err(err) if err.is_timeout() => ConnectionStatus {
                ok: false,
                message: format!(
                    "GitHub API не ответил за {} с: проверьте сеть и статус GitHub",
                    CONNECTION_CHECK_TIMEOUT.as_secs()
                ),
            },
            Err(err) => ConnectionStatus {
                ok: false,
                message: format!(
                    "не удалось подключиться к GitHub API: {err}; проверьте сеть, прокси и токен"
                ),
            },
        }
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    fn has_token(&self) -> bool {
        self.token().is_some()
    }

    fn replace_token(&self, token: Option<String>) {
        self.set_token(token.unwrap_or_default());
    }

    async fn list_own_repos(&self) -> AdminClientResult<Vec<GitHubRepo>> {
        let request = self.request(Method::GET, "/user/repos")?;
        let repos: Vec<RepoDto> = self.send_json(request).await?;
        Ok(repos.into_iter().map(GitHubRepo::from).collect())
    }

    async fn list_user_repos(&self, user: &str) -> AdminClientResult<Vec<GitHubRepo>> {
        let request = self.request(Method::GET, &format!("/users/{user}/repos"))?;
        let repos: Vec<RepoDto> = self.send_json(request).await?;
        Ok(repos.into_iter().map(GitHubRepo::from).collect())
    }

    async fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> AdminClientResult<Vec<GitHubContent>> {
        let path = path.trim_start_matches('/');
        let request = self.request(Method::GET, &format!("/repos/{owner}/{repo}/contents/{path}"))?;
        let contents: ContentsDto = self.send_json(request).await?;
        Ok(contents
            .into_vec()
            .into_iter()
            .map(GitHubContent::from)
            .collect())
    }

    async fn create_folder(&self, owner: &str, repo: &str, path: &str) -> AdminClientResult<()> {
        let path = path.trim_matches('/');
        let placeholder = format!("{path}/{FOLDER_PLACEHOLDER}");
        self.create_file(owner, repo, &placeholder, &[], &format!("Create folder {path}"))
            .await
    }

    async fn rename_file(
        &self,
        owner: &str,
        repo: &str,
        old_path: &str,
        new_path: &str,
    ) -> AdminClientResult<()> {
        let old_path = old_path.trim_start_matches('/');
        let request = self.request(
            Method::GET,
            &format!("/repos/{owner}/{repo}/contents/{old_path}"),
        )?;
        let original = match self.send_json::<ContentsDto>(request).await? {
            ContentsDto::One(item) => *item,
            ContentsDto::Many(_) => {
                return Err(AdminClientError::InvalidRequest(
                    "renaming folders is not supported".to_string(),
                ));
            }
        };

        let encoded = self.original_content(&original).await?;
        let message = format!("Rename {old_path} to {new_path}");
        self.put_content(owner, repo, new_path, &encoded, &message)
            .await?;

        let request = self
            .request(
                Method::DELETE,
                &format!("/repos/{owner}/{repo}/contents/{old_path}"),
            )?
            .json(&DeleteContentDto {
                message: &message,
                sha: &original.sha,
            });
        if let Err(err) = self.send(request).await {
            tracing::warn!(
                owner,
                repo,
                old_path,
                new_path,
                error = %err,
                "copy created but original file was not deleted"
            );
            return Err(err);
        }
        Ok(())
    }

    async fn upload_file(
        &self,
        owner: &str,
        repo: &str,
        dir: &str,
        file_name: &str,
        bytes: Vec<u8>,
        message: &str,
    ) -> AdminClientResult<()> {
        let dir = dir.trim_matches('/');
        let full_path = if dir.is_empty() {
            file_name.to_string()
        } else {
            format!("{dir}/{file_name}")
        };
        self.create_file(owner, repo, &full_path, &bytes, message)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_content_object_is_normalized_to_list() {
        let raw = r#"{"name":"a.md","path":"docs/a.md","sha":"1","size":3,"download_url":"https://raw/a.md","type":"file","content":"YWJj\n"}"#;
        let contents: ContentsDto = serde_json::from_str(raw).expect("must parse");
        let items = contents.into_vec();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].path, "docs/a.md");
    }

    #[test]
    fn content_conversion_marks_dirs_as_folders() {
        let dir = GitHubContent {
            name: "src".to_string(),
            path: "src".to_string(),
            sha: "s".to_string(),
            size: 0,
            download_url: None,
            kind: GitHubContentKind::Dir,
        };
        let entry = LocalFileSpace::from(dir);
        assert!(entry.folder);
        assert_eq!(entry.url, "");
    }

    #[test]
    fn repo_conversion_uses_html_url() {
        let repo = GitHubRepo {
            id: 1,
            name: "blog".to_string(),
            full_name: "alice/blog".to_string(),
            description: None,
            html_url: "https://github.com/alice/blog".to_string(),
        };
        assert_eq!(repo.owner(), "alice");
        let entry = LocalFileSpace::from(repo);
        assert!(entry.folder);
        assert_eq!(entry.name, "blog");
        assert_eq!(entry.url, "https://github.com/alice/blog");
    }

    #[test]
    fn requests_without_token_are_rejected() {
        let client = GitHubClient::new(&ClientConfig::default()).expect("client must build");
        let err = client
            .request(Method::GET, "/user/repos")
            .expect_err("token is required");
        assert!(matches!(err, AdminClientError::GitHubTokenRequired));
    }
}
