//! Клиентская библиотека консоли администратора блога.
//!
//! Предоставляет единую точку входа (`AdminClient`) поверх двух удалённых
//! API:
//! - JSON API блога (`reqwest`): посты, категории, теги, файловое пространство;
//! - GitHub Contents API: репозитории как второе файловое хранилище.
//!
//! Поверх клиентов построены контроллеры экранов: таблица постов
//! ([`BlogListController`]), редактор поста с автосохранением
//! ([`BlogEditorSession`], [`Autosave`]), файловый браузер ([`FileBrowser`]).
//! Контроллеры не зависят от способа отображения и сообщают о результатах
//! через [`Notifier`].
#![warn(missing_docs)]

mod api;
mod autosave;
mod blog_editor;
mod blog_list;
mod clipboard;
pub mod editor;
mod error;
mod file_browser;
mod github;
mod github_path;
mod http_client;
mod models;
mod notify;
mod svg;
#[cfg(test)]
mod testing;
mod visibility;

use std::sync::Arc;
use std::time::Duration;

pub use api::{
    BlogApi, ConnectionStatus, FileSpaceApi, GitHubApi, GitHubContent, GitHubContentKind,
    GitHubRepo,
};
pub use autosave::{Autosave, DEFAULT_AUTOSAVE_INTERVAL};
pub use blog_editor::{
    BlogEditorSession, BlogForm, ContentStats, PublishOutcome, SaveMode, SaveOutcome,
    WORDS_PER_MINUTE, read_time_minutes, resolve_category, resolve_tags,
};
pub use blog_list::{BlogFlag, BlogListController, BlogQuery, TableResult, VisibilityModal};
pub use clipboard::{Clipboard, MemoryClipboard, Osc52Clipboard};
pub use error::{AdminClientError, AdminClientResult, ErrorShowType};
pub use file_browser::{
    ContextAction, FileBrowser, OpenTarget, StorageKind, TokenChange, sort_entries,
};
pub use github::GitHubClient;
pub use github_path::{
    Breadcrumb, CrumbKind, GitHubPath, breadcrumbs, child_path, github_parent_path, is_repo_path,
    local_parent_path, parse_github_path, repo_path_from_url,
};
pub use http_client::HttpClient;
pub use models::{
    BlogItem, BlogListItem, BlogPageParams, BlogSaveReq, CategoryListItem, LocalFileSpace, Page,
    TagListItem, UploadVO, VisibilityBlogReq,
};
pub use notify::{Notice, Notifier, RecordingNotifier, TracingNotifier};
pub use svg::{
    SVG_MIME, SvgPreview, convert as convert_svg, data_url as svg_data_url, load_svg,
    mime_from_file_name,
};
pub use visibility::{FeatureFlags, MIN_PASSWORD_LEN, VisibilitySettings, VisibilityType};

/// Адрес API блога по умолчанию.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";
/// Адрес GitHub API по умолчанию.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Параметры подключения к удалённым API.
pub struct ClientConfig {
    /// Базовый URL API блога, например `http://127.0.0.1:8080/api`.
    pub api_base_url: String,
    /// Базовый URL GitHub API.
    pub github_api_url: String,
    /// Таймаут установки соединения.
    pub connect_timeout: Duration,
    /// Таймаут запроса целиком.
    pub request_timeout: Duration,
    /// Заголовок `User-Agent` (GitHub требует его в каждом запросе).
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(15),
            user_agent: concat!("blog-admin/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
/// Единый клиент консоли: API блога и GitHub с общими настройками.
///
/// Клонирование дешёвое: клоны делят токены и пул соединений.
pub struct AdminClient {
    http: HttpClient,
    github: GitHubClient,
}

impl AdminClient {
    /// Создаёт оба HTTP-клиента по конфигурации.
    pub fn new(config: &ClientConfig) -> AdminClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
            github: GitHubClient::new(config)?,
        })
    }

    /// Клиент API блога.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Клиент GitHub.
    pub fn github(&self) -> &GitHubClient {
        &self.github
    }

    /// Устанавливает токен API блога.
    pub fn set_token(&self, token: impl Into<String>) {
        self.http.set_token(token);
    }

    /// Текущий токен API блога.
    pub fn token(&self) -> Option<String> {
        self.http.token()
    }

    /// Сбрасывает токен API блога.
    pub fn clear_token(&self) {
        self.http.clear_token();
    }

    /// Устанавливает токен GitHub (пустая строка удаляет его).
    pub fn set_github_token(&self, token: impl Into<String>) {
        self.github.set_token(token);
    }

    /// Контроллер таблицы постов.
    pub fn blog_list(&self, notifier: Arc<dyn Notifier>) -> BlogListController<HttpClient> {
        BlogListController::new(self.http.clone(), notifier)
    }

    /// Открывает редактор поста (`id = None` для нового поста).
    pub async fn open_editor(
        &self,
        notifier: Arc<dyn Notifier>,
        id: Option<i64>,
    ) -> AdminClientResult<BlogEditorSession<HttpClient>> {
        BlogEditorSession::open(self.http.clone(), notifier, id).await
    }

    /// Файловый браузер над локальным хранилищем и GitHub.
    pub fn file_browser(
        &self,
        notifier: Arc<dyn Notifier>,
        clipboard: Arc<dyn Clipboard>,
    ) -> FileBrowser<HttpClient, GitHubClient> {
        FileBrowser::new(self.http.clone(), self.github.clone(), notifier, clipboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_to_local_api_and_github() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.github_api_url, DEFAULT_GITHUB_API_URL);
        assert!(config.user_agent.starts_with("blog-admin/"));
    }

    #[test]
    fn clones_share_tokens() {
        let client = AdminClient::new(&ClientConfig::default()).expect("client must build");
        let clone = client.clone();
        client.set_token("abc");
        assert_eq!(clone.token().as_deref(), Some("abc"));

        clone.clear_token();
        assert_eq!(client.token(), None);
    }

    #[test]
    fn github_token_is_shared_with_browser_client() {
        let client = AdminClient::new(&ClientConfig::default()).expect("client must build");
        client.set_github_token("ghp_x");
        assert!(client.github().has_token());
        client.set_github_token("");
        assert!(!client.github().has_token());
    }
}
