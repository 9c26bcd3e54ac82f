use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Категория блога.
pub struct CategoryListItem {
    /// Идентификатор; `None` у категории, введённой в форме и ещё не
    /// созданной на сервере.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Название.
    pub name: String,
}

impl CategoryListItem {
    /// Категория, которую сервер создаст при сохранении поста.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Признак того, что категория уже существует на сервере.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Тег блога.
pub struct TagListItem {
    /// Идентификатор; `None` у ещё не созданного тега.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Название.
    pub name: String,
    /// Цвет тега.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TagListItem {
    /// Тег, который сервер создаст при сохранении поста.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: None,
        }
    }

    /// Признак того, что тег уже существует на сервере.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Строка таблицы постов.
pub struct BlogListItem {
    /// Идентификатор поста.
    pub id: i64,
    /// Категория.
    #[serde(default)]
    pub category: Option<CategoryListItem>,
    /// Теги.
    #[serde(default)]
    pub tags: Vec<TagListItem>,
    /// Автор.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Заголовок.
    pub title: String,
    /// URL обложки.
    #[serde(default)]
    pub first_picture: Option<String>,
    /// Сериализованный документ редактора.
    #[serde(default)]
    pub content: String,
    /// Краткое описание.
    #[serde(default)]
    pub description: String,
    /// Опубликован ли пост.
    #[serde(default)]
    pub published: bool,
    /// Рекомендуемый пост.
    #[serde(default)]
    pub recommend: bool,
    /// Включены донаты.
    #[serde(default)]
    pub appreciation: bool,
    /// Включены комментарии.
    #[serde(default)]
    pub comment_enabled: bool,
    /// Закреплённый пост.
    #[serde(default)]
    pub top: bool,
    /// Время создания в формате сервера.
    #[serde(default)]
    pub create_time: Option<String>,
    /// Время последнего обновления в формате сервера.
    #[serde(default)]
    pub update_time: Option<String>,
    /// Просмотры.
    #[serde(default)]
    pub views: u64,
    /// Количество слов.
    #[serde(default)]
    pub words: u64,
    /// Время чтения, минуты.
    #[serde(default)]
    pub read_time: u64,
    /// Пароль доступа.
    #[serde(default)]
    pub password: Option<String>,
}

impl BlogListItem {
    /// Время создания, если сервер прислал его в известном формате.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.create_time.as_deref().and_then(parse_server_time)
    }

    /// Время последнего обновления.
    pub fn updated_at(&self) -> Option<NaiveDateTime> {
        self.update_time.as_deref().and_then(parse_server_time)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Полная карточка поста (`/blog/detail`).
pub struct BlogItem {
    /// Идентификатор поста.
    #[serde(default)]
    pub id: Option<i64>,
    /// Заголовок.
    pub title: String,
    /// Сериализованный документ редактора.
    #[serde(default)]
    pub content: String,
    /// URL обложки.
    #[serde(default)]
    pub first_picture: String,
    /// Краткое описание.
    #[serde(default)]
    pub description: String,
    /// Опубликован ли пост.
    #[serde(default)]
    pub published: bool,
    /// Пароль доступа.
    #[serde(default)]
    pub password: Option<String>,
    /// Категория.
    #[serde(default)]
    pub category: Option<CategoryListItem>,
    /// Теги.
    #[serde(default)]
    pub tags: Vec<TagListItem>,
    /// Количество слов.
    #[serde(default)]
    pub words: u64,
    /// Время чтения, минуты.
    #[serde(default)]
    pub read_time: Option<u64>,
    /// Включены донаты.
    #[serde(default)]
    pub appreciation: Option<bool>,
    /// Рекомендуемый пост.
    #[serde(default)]
    pub recommend: Option<bool>,
    /// Включены комментарии.
    #[serde(default)]
    pub comment_enabled: Option<bool>,
    /// Закреплённый пост.
    #[serde(default)]
    pub top: Option<bool>,
    /// Просмотры.
    #[serde(default)]
    pub views: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Параметры страницы списка постов.
pub struct BlogPageParams {
    /// Номер страницы, с 1.
    pub page_no: u32,
    /// Размер страницы.
    pub page_size: u32,
    /// Фильтр по категории.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    /// Фильтр по тегу.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<i64>,
    /// Поиск по заголовку.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Тело `/blog/save` и `/blog/update`.
pub struct BlogSaveReq {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Идентификатор (только для обновления).
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Заголовок.
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// URL обложки.
    pub first_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Сериализованный документ редактора.
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Краткое описание.
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Опубликован ли пост.
    pub published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Рекомендуемый пост.
    pub recommend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Включены донаты.
    pub appreciation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Включены комментарии.
    pub comment_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Закреплённый пост.
    pub top: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Просмотры.
    pub views: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Количество слов.
    pub words: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Время чтения, минуты.
    pub read_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Пароль доступа (пустая строка снимает защиту).
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Категория.
    pub category: Option<CategoryListItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Теги.
    pub tags: Option<Vec<TagListItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Тело `/blog/visible`.
pub struct VisibilityBlogReq {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Идентификатор поста.
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Включены донаты.
    pub appreciation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Рекомендуемый пост.
    pub recommend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Включены комментарии.
    pub comment_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Закреплённый пост.
    pub top: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Опубликован ли пост.
    pub published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Пароль доступа.
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
/// Страница списка с общим количеством записей.
pub struct Page<T> {
    /// Записи текущей страницы.
    pub items: Vec<T>,
    /// Номер страницы.
    pub page_no: u32,
    /// Размер страницы.
    pub page_size: u32,
    /// Общее количество записей.
    pub total: u64,
    /// Есть ли следующая страница.
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Элемент файлового пространства: общий вид для локального хранилища и
/// GitHub-репозиториев.
pub struct LocalFileSpace {
    /// Папка или файл.
    pub folder: bool,
    /// Имя.
    pub name: String,
    /// URL файла (или страницы репозитория).
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Результат загрузки файла.
pub struct UploadVO {
    /// Имя сохранённого файла.
    pub file_name: String,
    /// URL файла.
    pub url: String,
}

fn parse_server_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value.naive_utc());
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}
