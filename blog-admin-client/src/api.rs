//! Контракты удалённых API, через которые работают экраны консоли.
//!
//! HTTP-реализации живут в [`crate::http_client`] и [`crate::github`]; в тестах
//! контроллеры получают подставные реализации.

use async_trait::async_trait;

use crate::error::AdminClientResult;
use crate::models::{
    BlogItem, BlogListItem, BlogPageParams, BlogSaveReq, CategoryListItem, LocalFileSpace, Page,
    TagListItem, UploadVO, VisibilityBlogReq,
};

#[async_trait]
/// Операции с постами, категориями и тегами.
pub trait BlogApi: Send + Sync {
    /// Страница списка постов.
    async fn page_blogs(&self, params: BlogPageParams) -> AdminClientResult<Page<BlogListItem>>;
    /// Удаляет пост.
    async fn delete_blog(&self, id: i64) -> AdminClientResult<bool>;
    /// Меняет флаг «рекомендуемый».
    async fn update_recommend(&self, id: i64, recommend: bool) -> AdminClientResult<bool>;
    /// Меняет флаг «закреплён».
    async fn update_top(&self, id: i64, top: bool) -> AdminClientResult<bool>;
    /// Меняет видимость, пароль и функции поста.
    async fn update_visibility(&self, req: VisibilityBlogReq) -> AdminClientResult<bool>;
    /// Полная карточка поста.
    async fn get_blog(&self, id: i64) -> AdminClientResult<BlogItem>;
    /// Пост по токену публичной ссылки.
    async fn get_shared_blog(&self, token: &str) -> AdminClientResult<BlogItem>;
    /// Создаёт пост и возвращает его идентификатор.
    async fn save_blog(&self, req: BlogSaveReq) -> AdminClientResult<i64>;
    /// Обновляет существующий пост.
    async fn update_blog(&self, req: BlogSaveReq) -> AdminClientResult<bool>;
    /// Все категории.
    async fn list_categories(&self) -> AdminClientResult<Vec<CategoryListItem>>;
    /// Все теги.
    async fn list_tags(&self) -> AdminClientResult<Vec<TagListItem>>;
}

#[async_trait]
/// Локальное файловое пространство сервера.
pub trait FileSpaceApi: Send + Sync {
    /// Содержимое папки.
    async fn list_space(&self, path: &str) -> AdminClientResult<Vec<LocalFileSpace>>;
    /// Загружает файл по полному пути `file_path`.
    async fn upload(
        &self,
        file_path: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> AdminClientResult<UploadVO>;
    /// Переименовывает файл или папку.
    async fn rename(&self, path: &str, new_name: &str) -> AdminClientResult<bool>;
    /// Создаёт папку.
    async fn create_folder(&self, folder_path: &str) -> AdminClientResult<bool>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Репозиторий GitHub.
pub struct GitHubRepo {
    /// Идентификатор.
    pub id: i64,
    /// Имя репозитория.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// Описание.
    pub description: Option<String>,
    /// Страница репозитория.
    pub html_url: String,
}

impl GitHubRepo {
    /// Владелец из `full_name`.
    pub fn owner(&self) -> &str {
        self.full_name
            .split('/')
            .next()
            .filter(|owner| !owner.is_empty())
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Тип элемента содержимого репозитория.
pub enum GitHubContentKind {
    /// Файл.
    File,
    /// Папка.
    Dir,
    /// Символическая ссылка.
    Symlink,
    /// Подмодуль.
    Submodule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Элемент содержимого репозитория.
pub struct GitHubContent {
    /// Имя.
    pub name: String,
    /// Путь внутри репозитория.
    pub path: String,
    /// SHA blob-объекта.
    pub sha: String,
    /// Размер в байтах.
    pub size: u64,
    /// Прямая ссылка на скачивание.
    pub download_url: Option<String>,
    /// Тип элемента.
    pub kind: GitHubContentKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Результат проверки доступности GitHub API.
pub struct ConnectionStatus {
    /// API ответил успешно.
    pub ok: bool,
    /// Описание результата.
    pub message: String,
}

#[async_trait]
/// Хранилище файлов в GitHub-репозиториях.
pub trait GitHubApi: Send + Sync {
    /// Установлен ли токен.
    fn has_token(&self) -> bool;
    /// Заменяет токен; `None` удаляет его.
    fn replace_token(&self, token: Option<String>);
    /// Репозитории текущего пользователя.
    async fn list_own_repos(&self) -> AdminClientResult<Vec<GitHubRepo>>;
    /// Репозитории указанного пользователя или организации.
    async fn list_user_repos(&self, user: &str) -> AdminClientResult<Vec<GitHubRepo>>;
    /// Содержимое папки (или один файл) репозитория.
    async fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> AdminClientResult<Vec<GitHubContent>>;
    /// Создаёт папку через файл-заглушку `.gitkeep`.
    async fn create_folder(&self, owner: &str, repo: &str, path: &str) -> AdminClientResult<()>;
    /// Переименовывает файл: чтение, создание копии, удаление оригинала.
    async fn rename_file(
        &self,
        owner: &str,
        repo: &str,
        old_path: &str,
        new_path: &str,
    ) -> AdminClientResult<()>;
    /// Загружает файл в папку `dir` репозитория.
    async fn upload_file(
        &self,
        owner: &str,
        repo: &str,
        dir: &str,
        file_name: &str,
        bytes: Vec<u8>,
        message: &str,
    ) -> AdminClientResult<()>;

    /// Ищет среди своих репозиториев репозиторий с именем `name`.
    ///
    /// Любая ошибка запроса означает «не найден».
    async fn find_own_repo(&self, name: &str) -> Option<GitHubRepo> {
        match self.list_own_repos().await {
            Ok(repos) => repos.into_iter().find(|repo| repo.name == name),
            Err(err) => {
                tracing::warn!(error = %err, "failed to check repository ownership");
                None
            }
        }
    }
}
