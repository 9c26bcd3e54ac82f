//! Файловый браузер с двумя хранилищами: локальным пространством сервера
//! и репозиториями GitHub.

use std::sync::Arc;

use crate::api::{FileSpaceApi, GitHubApi};
use crate::clipboard::Clipboard;
use crate::error::{AdminClientError, AdminClientResult};
use crate::github_path::{
    Breadcrumb, breadcrumbs, child_path, github_parent_path, is_repo_path, local_parent_path,
    parse_github_path, repo_path_from_url, segments,
};
use crate::models::LocalFileSpace;
use crate::notify::{Notice, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Хранилище файлов.
pub enum StorageKind {
    /// Файловое пространство сервера блога.
    #[default]
    Local,
    /// Репозитории GitHub.
    GitHub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Действие контекстного меню.
pub enum ContextAction {
    /// Переименовать элемент.
    Rename,
    /// Скопировать ссылку на файл.
    CopyUrl,
    /// Обновить список.
    Refresh,
    /// Вернуться на уровень выше.
    GoBack,
    /// Создать папку.
    NewFolder,
    /// Загрузить файл.
    Upload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Результат открытия элемента.
pub enum OpenTarget {
    /// Перешли в папку.
    Folder(String),
    /// Файл, который нужно открыть по ссылке.
    File(String),
    /// Открывать нечего.
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Что стало с токеном GitHub.
pub enum TokenChange {
    /// Токен сохранён.
    Saved,
    /// Токен удалён; браузер GitHub вернулся к локальному хранилищу.
    Cleared,
}

/// Сортирует элементы: сначала папки, затем по имени без учёта регистра.
pub fn sort_entries(items: &mut [LocalFileSpace]) {
    items.sort_by(|a, b| {
        b.folder
            .cmp(&a.folder)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

fn normalize_path(path: &str) -> String {
    let parts = segments(path);
    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

fn join_repo_path(dir: &str, name: &str) -> String {
    let dir = dir.trim_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Контроллер файлового браузера.
pub struct FileBrowser<L: FileSpaceApi, G: GitHubApi> {
    local: L,
    github: G,
    notifier: Arc<dyn Notifier>,
    clipboard: Arc<dyn Clipboard>,
    storage: StorageKind,
    path: String,
    items: Vec<LocalFileSpace>,
    token_prompt: bool,
}

impl<L: FileSpaceApi, G: GitHubApi> FileBrowser<L, G> {
    /// Создаёт браузер в корне локального хранилища.
    pub fn new(
        local: L,
        github: G,
        notifier: Arc<dyn Notifier>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            local,
            github,
            notifier,
            clipboard,
            storage: StorageKind::Local,
            path: "/".to_string(),
            items: Vec::new(),
            token_prompt: false,
        }
    }

    /// Текущее хранилище.
    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    /// Текущий путь.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Элементы текущей папки.
    pub fn items(&self) -> &[LocalFileSpace] {
        &self.items
    }

    /// Нужно ли запросить токен GitHub у пользователя.
    pub fn token_prompt_open(&self) -> bool {
        self.token_prompt
    }

    /// Закрывает запрос токена.
    pub fn dismiss_token_prompt(&mut self) {
        self.token_prompt = false;
    }

    fn at_root(&self) -> bool {
        segments(&self.path).is_empty()
    }

    /// Переключает хранилище; путь сбрасывается в корень.
    pub async fn switch_storage(&mut self, storage: StorageKind) -> &[LocalFileSpace] {
        self.storage = storage;
        self.path = "/".to_string();
        self.refresh().await
    }

    /// Переходит по пути.
    pub async fn navigate_to(&mut self, path: &str) -> &[LocalFileSpace] {
        self.path = normalize_path(path);
        self.refresh().await
    }

    /// Открывает путь в указанном хранилище одним запросом.
    pub async fn open_location(&mut self, storage: StorageKind, path: &str) -> &[LocalFileSpace] {
        self.storage = storage;
        self.navigate_to(path).await
    }

    /// Перечитывает текущую папку.
    pub async fn refresh(&mut self) -> &[LocalFileSpace] {
        let mut items = match self.storage {
            StorageKind::Local => self.fetch_local().await,
            StorageKind::GitHub => self.fetch_github().await,
        };
        sort_entries(&mut items);
        self.items = items;
        &self.items
    }

    async fn fetch_local(&self) -> Vec<LocalFileSpace> {
        match self.local.list_space(&self.path).await {
            Ok(items) => items,
            Err(err) => {
                tracing::error!(path = %self.path, error = %err, "failed to list local files");
                self.report(&err, "не удалось загрузить файлы");
                Vec::new()
            }
        }
    }

    async fn fetch_github(&mut self) -> Vec<LocalFileSpace> {
        if !self.github.has_token() {
            self.token_prompt = true;
            self.notifier
                .notify(Notice::Info("укажите токен GitHub".to_string()));
            return Vec::new();
        }

        match self.fetch_github_listing().await {
            Ok(items) => items,
            Err(err) => {
                tracing::error!(path = %self.path, error = %err, "failed to load github listing");
                self.notifier.notify(Notice::Error(
                    "не удалось загрузить данные GitHub, проверьте токен".to_string(),
                ));
                self.token_prompt = true;
                Vec::new()
            }
        }
    }

    async fn fetch_github_listing(&mut self) -> AdminClientResult<Vec<LocalFileSpace>> {
        let parsed = parse_github_path(&self.path);

        if parsed.owner.is_empty() {
            let repos = self.github.list_own_repos().await?;
            return Ok(repos.into_iter().map(LocalFileSpace::from).collect());
        }

        if parsed.repo.is_empty() {
            if let Some(repo) = self.github.find_own_repo(&parsed.owner).await {
                let contents = self
                    .github
                    .get_contents(repo.owner(), &repo.name, "")
                    .await?;
                return Ok(contents.into_iter().map(LocalFileSpace::from).collect());
            }
            return match self.github.list_user_repos(&parsed.owner).await {
                Ok(repos) => Ok(repos.into_iter().map(LocalFileSpace::from).collect()),
                Err(err) => {
                    tracing::warn!(owner = %parsed.owner, error = %err, "failed to list user repositories");
                    self.notifier.notify(Notice::Error(format!(
                        "не удалось загрузить репозитории {}",
                        parsed.owner
                    )));
                    Ok(Vec::new())
                }
            };
        }

        match self
            .github
            .get_contents(&parsed.owner, &parsed.repo, &parsed.file_path)
            .await
        {
            Ok(contents) => Ok(contents.into_iter().map(LocalFileSpace::from).collect()),
            Err(err) => {
                tracing::warn!(
                    owner = %parsed.owner,
                    repo = %parsed.repo,
                    error = %err,
                    "failed to load repository contents, trying user repositories"
                );
                match self.github.list_user_repos(&parsed.owner).await {
                    Ok(repos) if !repos.is_empty() => {
                        self.notifier.notify(Notice::Info(format!(
                            "{} не найден, показаны репозитории {}",
                            parsed.repo, parsed.owner
                        )));
                        self.path = format!("/{}", parsed.owner);
                        Ok(repos.into_iter().map(LocalFileSpace::from).collect())
                    }
                    _ => {
                        self.notifier.notify(Notice::Error(format!(
                            "не удалось открыть {}/{}",
                            parsed.owner, parsed.repo
                        )));
                        Ok(Vec::new())
                    }
                }
            }
        }
    }

    /// Открывает элемент: папку как новый путь, файл как ссылку.
    pub async fn open(&mut self, item: &LocalFileSpace) -> OpenTarget {
        if !item.folder {
            if item.url.is_empty() {
                self.notifier
                    .notify(Notice::Info("у файла нет ссылки".to_string()));
                return OpenTarget::Nothing;
            }
            return OpenTarget::File(item.url.clone());
        }

        let next = match self.storage {
            StorageKind::GitHub if self.at_root() => repo_path_from_url(&item.url)
                .unwrap_or_else(|| child_path(&self.path, &item.name)),
            _ => child_path(&self.path, &item.name),
        };
        self.path = next;
        self.refresh().await;
        OpenTarget::Folder(self.path.clone())
    }

    /// Возвращается на уровень выше.
    pub async fn go_back(&mut self) -> &[LocalFileSpace] {
        if !self.at_root() {
            self.path = match self.storage {
                StorageKind::Local => local_parent_path(&self.path),
                StorageKind::GitHub => github_parent_path(&self.path),
            };
        }
        self.refresh().await
    }

    /// «Хлебные крошки» текущего пути.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        breadcrumbs(&self.path, self.storage == StorageKind::GitHub)
    }

    /// Доступные действия контекстного меню для элемента (или пустого места).
    pub fn available_actions(&self, item: Option<&LocalFileSpace>) -> Vec<ContextAction> {
        let mut actions = Vec::new();
        if let Some(item) = item {
            actions.push(ContextAction::Rename);
            if !item.folder && !item.url.is_empty() {
                actions.push(ContextAction::CopyUrl);
            }
        }
        actions.push(ContextAction::Refresh);
        if !self.at_root() {
            actions.push(ContextAction::GoBack);
        }
        let github = self.storage == StorageKind::GitHub;
        if !(github && self.at_root()) {
            actions.push(ContextAction::NewFolder);
        }
        if !github || is_repo_path(&self.path) {
            actions.push(ContextAction::Upload);
        }
        actions
    }

    /// Проверяет токен GitHub перед изменяющей операцией.
    async fn ensure_github_access(&mut self) -> bool {
        match self.github.list_own_repos().await {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(error = %err, "github token check failed");
                self.notifier.notify(Notice::Error(
                    "токен GitHub недействителен или истёк".to_string(),
                ));
                self.token_prompt = true;
                false
            }
        }
    }

    fn require_repo_path(&self, action: &str) -> bool {
        if is_repo_path(&self.path) {
            return true;
        }
        self.notifier.notify(Notice::Warning(format!(
            "{action}: откройте папку внутри репозитория"
        )));
        false
    }

    /// Создаёт папку в текущем каталоге.
    pub async fn create_folder(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            self.notifier
                .notify(Notice::Warning("введите имя папки".to_string()));
            return false;
        }

        let result = match self.storage {
            StorageKind::Local => self
                .local
                .create_folder(&child_path(&self.path, name))
                .await
                .map(|_| ()),
            StorageKind::GitHub => {
                if !self.require_repo_path("создание папки") || !self.ensure_github_access().await
                {
                    return false;
                }
                let parsed = parse_github_path(&self.path);
                self.github
                    .create_folder(
                        &parsed.owner,
                        &parsed.repo,
                        &join_repo_path(&parsed.file_path, name),
                    )
                    .await
            }
        };
        self.finish(result, "папка создана", "не удалось создать папку")
            .await
    }

    /// Переименовывает элемент текущей папки.
    ///
    /// Пустое или неизменённое имя ничего не делает.
    pub async fn rename(&mut self, item: &LocalFileSpace, new_name: &str) -> bool {
        let new_name = new_name.trim();
        if new_name.is_empty() || new_name == item.name {
            return false;
        }

        let result = match self.storage {
            StorageKind::Local => self
                .local
                .rename(&child_path(&self.path, &item.name), new_name)
                .await
                .map(|_| ()),
            StorageKind::GitHub => {
                if !self.require_repo_path("переименование") {
                    return false;
                }
                if item.folder {
                    self.notifier.notify(Notice::Warning(
                        "переименование папок в GitHub не поддерживается".to_string(),
                    ));
                    return false;
                }
                if !self.ensure_github_access().await {
                    return false;
                }
                let parsed = parse_github_path(&self.path);
                self.github
                    .rename_file(
                        &parsed.owner,
                        &parsed.repo,
                        &join_repo_path(&parsed.file_path, &item.name),
                        &join_repo_path(&parsed.file_path, new_name),
                    )
                    .await
            }
        };
        self.finish(result, "переименовано", "не удалось переименовать")
            .await
    }

    /// Загружает файл в текущую папку.
    pub async fn upload(&mut self, file_name: &str, bytes: Vec<u8>) -> bool {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            self.notifier
                .notify(Notice::Warning("не указано имя файла".to_string()));
            return false;
        }

        let result = match self.storage {
            StorageKind::Local => self
                .local
                .upload(&child_path(&self.path, file_name), file_name, bytes)
                .await
                .map(|uploaded| {
                    tracing::info!(url = %uploaded.url, "file uploaded");
                }),
            StorageKind::GitHub => {
                if !self.require_repo_path("загрузка") || !self.ensure_github_access().await {
                    return false;
                }
                let parsed = parse_github_path(&self.path);
                self.github
                    .upload_file(
                        &parsed.owner,
                        &parsed.repo,
                        &parsed.file_path,
                        file_name,
                        bytes,
                        &format!("Upload {file_name}"),
                    )
                    .await
            }
        };
        self.finish(result, "файл загружен", "не удалось загрузить файл")
            .await
    }

    /// Копирует ссылку на файл в буфер обмена.
    pub fn copy_url(&self, item: &LocalFileSpace) -> bool {
        if item.folder || item.url.is_empty() {
            self.notifier
                .notify(Notice::Warning("у элемента нет ссылки".to_string()));
            return false;
        }
        match self.clipboard.copy(&item.url) {
            Ok(()) => {
                self.notifier
                    .notify(Notice::Success("ссылка скопирована".to_string()));
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to copy url");
                self.report(&err, "не удалось скопировать ссылку");
                false
            }
        }
    }

    /// Устанавливает токен GitHub; пустой токен удаляет его и возвращает
    /// браузер к локальному хранилищу.
    pub async fn set_github_token(&mut self, token: &str) -> TokenChange {
        let token = token.trim();
        if token.is_empty() {
            self.github.replace_token(None);
            self.token_prompt = false;
            self.notifier
                .notify(Notice::Info("токен GitHub удалён".to_string()));
            if self.storage == StorageKind::GitHub {
                self.switch_storage(StorageKind::Local).await;
            }
            return TokenChange::Cleared;
        }

        self.github.replace_token(Some(token.to_string()));
        self.token_prompt = false;
        self.notifier
            .notify(Notice::Success("токен GitHub сохранён".to_string()));
        if self.storage == StorageKind::GitHub {
            self.refresh().await;
        }
        TokenChange::Saved
    }

    async fn finish(
        &mut self,
        result: AdminClientResult<()>,
        success: &str,
        fallback: &str,
    ) -> bool {
        match result {
            Ok(()) => {
                self.notifier.notify(Notice::Success(success.to_string()));
                self.refresh().await;
                true
            }
            Err(err) => {
                tracing::error!(path = %self.path, error = %err, "{fallback}");
                self.report(&err, fallback);
                false
            }
        }
    }

    fn report(&self, err: &AdminClientError, fallback: &str) {
        let notice = match err {
            AdminClientError::GitHub { message, .. } => {
                Some(Notice::Error(format!("{fallback}: {message}")))
            }
            _ => err.notice(fallback),
        };
        if let Some(notice) = notice {
            self.notifier.notify(notice);
        }
    }
}
