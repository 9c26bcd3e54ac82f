//! Таблица постов: фильтры, пагинация, переключатели и модальное окно
//! видимости.

use std::sync::Arc;

use crate::api::BlogApi;
use crate::error::AdminClientError;
use crate::models::{BlogListItem, BlogPageParams, CategoryListItem, TagListItem};
use crate::notify::{Notice, Notifier};
use crate::visibility::VisibilitySettings;

const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Запрос таблицы: страница и фильтры.
pub struct BlogQuery {
    /// Номер страницы, с 1.
    pub page_no: u32,
    /// Размер страницы.
    pub page_size: u32,
    /// Поиск по заголовку.
    pub title: Option<String>,
    /// Фильтр по категории.
    pub category_id: Option<i64>,
    /// Фильтр по тегу.
    pub tag_id: Option<i64>,
}

impl Default for BlogQuery {
    fn default() -> Self {
        Self {
            page_no: 1,
            page_size: DEFAULT_PAGE_SIZE,
            title: None,
            category_id: None,
            tag_id: None,
        }
    }
}

impl From<&BlogQuery> for BlogPageParams {
    fn from(query: &BlogQuery) -> Self {
        Self {
            page_no: query.page_no.max(1),
            page_size: query.page_size.max(1),
            category_id: query.category_id,
            tag_id: query.tag_id,
            title: query
                .title
                .as_deref()
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Переключаемый прямо в таблице флаг.
pub enum BlogFlag {
    /// Закреплён.
    Top,
    /// Рекомендуемый.
    Recommend,
}

#[derive(Debug, Clone, PartialEq)]
/// Результат загрузки страницы.
pub struct TableResult {
    /// Строки.
    pub rows: Vec<BlogListItem>,
    /// Всего записей.
    pub total: u64,
    /// Загрузка прошла успешно.
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Состояние модального окна видимости.
pub struct VisibilityModal {
    /// Окно открыто.
    pub open: bool,
    /// Редактируемый пост.
    pub current: Option<BlogListItem>,
}

/// Контроллер экрана со списком постов.
pub struct BlogListController<A: BlogApi> {
    api: A,
    notifier: Arc<dyn Notifier>,
    query: BlogQuery,
    rows: Vec<BlogListItem>,
    total: u64,
    categories: Vec<CategoryListItem>,
    tags: Vec<TagListItem>,
    selected: Vec<BlogListItem>,
    modal: VisibilityModal,
}

impl<A: BlogApi> BlogListController<A> {
    /// Создаёт контроллер с пустым состоянием.
    pub fn new(api: A, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            query: BlogQuery::default(),
            rows: Vec::new(),
            total: 0,
            categories: Vec::new(),
            tags: Vec::new(),
            selected: Vec::new(),
            modal: VisibilityModal::default(),
        }
    }

    /// Загружает категории и теги для фильтров одновременно.
    ///
    /// При ошибке списки остаются пустыми.
    pub async fn fetch_initial_data(&mut self) -> bool {
        match tokio::try_join!(self.api.list_categories(), self.api.list_tags()) {
            Ok((categories, tags)) => {
                self.categories = categories;
                self.tags = tags;
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load categories and tags");
                self.categories.clear();
                self.tags.clear();
                self.report(&err, "не удалось загрузить справочники");
                false
            }
        }
    }

    /// Загружает страницу по запросу и запоминает запрос для `reload`.
    pub async fn load_page(&mut self, query: BlogQuery) -> TableResult {
        self.query = query;
        match self.api.page_blogs(BlogPageParams::from(&self.query)).await {
            Ok(page) => {
                self.rows = page.items;
                self.total = page.total;
                TableResult {
                    rows: self.rows.clone(),
                    total: self.total,
                    success: true,
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load blog page");
                self.rows.clear();
                self.total = 0;
                TableResult {
                    rows: Vec::new(),
                    total: 0,
                    success: false,
                }
            }
        }
    }

    /// Повторяет последний запрос.
    pub async fn reload(&mut self) -> TableResult {
        let query = self.query.clone();
        self.load_page(query).await
    }

    /// Переключает флаг поста; при успехе перезагружает таблицу.
    pub async fn switch_flag(&mut self, flag: BlogFlag, id: i64, value: bool) -> bool {
        let result = match flag {
            BlogFlag::Top => self.api.update_top(id, value).await,
            BlogFlag::Recommend => self.api.update_recommend(id, value).await,
        };
        match result {
            Ok(_) => {
                self.notifier
                    .notify(Notice::Success("статус обновлён".to_string()));
                self.reload().await;
                true
            }
            Err(err) => {
                self.report(&err, "не удалось обновить статус");
                false
            }
        }
    }

    /// Открывает окно видимости, заполненное по строке таблицы.
    pub fn open_visibility(&mut self, blog: &BlogListItem) -> VisibilitySettings {
        self.modal = VisibilityModal {
            open: true,
            current: Some(blog.clone()),
        };
        VisibilitySettings::from_row(blog)
    }

    /// Закрывает окно видимости без сохранения.
    pub fn close_visibility(&mut self) {
        self.modal = VisibilityModal::default();
    }

    /// Сохраняет настройки видимости.
    ///
    /// При ошибке окно остаётся открытым.
    pub async fn submit_visibility(&mut self, settings: VisibilitySettings) -> bool {
        let Some(id) = self.modal.current.as_ref().map(|blog| blog.id) else {
            self.notifier
                .notify(Notice::Error("пост для изменения не выбран".to_string()));
            return false;
        };

        let result = match settings.into_request(id) {
            Ok(req) => self.api.update_visibility(req).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(_) => {
                self.notifier
                    .notify(Notice::Success("видимость обновлена".to_string()));
                self.close_visibility();
                self.reload().await;
                true
            }
            Err(err) => {
                self.report(&err, "не удалось обновить видимость");
                false
            }
        }
    }

    /// Удаляет пост.
    pub async fn delete(&mut self, id: i64) -> bool {
        match self.api.delete_blog(id).await {
            Ok(_) => {
                self.notifier
                    .notify(Notice::Success("пост удалён".to_string()));
                self.selected.retain(|blog| blog.id != id);
                self.reload().await;
                true
            }
            Err(err) => {
                self.report(&err, "не удалось удалить пост");
                false
            }
        }
    }

    /// Запоминает выбранные строки.
    pub fn set_selected(&mut self, rows: Vec<BlogListItem>) {
        self.selected = rows;
    }

    /// Выбранные строки.
    pub fn selected(&self) -> &[BlogListItem] {
        &self.selected
    }

    /// Строки последней загруженной страницы.
    pub fn rows(&self) -> &[BlogListItem] {
        &self.rows
    }

    /// Общее количество записей.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Текущий запрос.
    pub fn query(&self) -> &BlogQuery {
        &self.query
    }

    /// Категории для фильтра.
    pub fn categories(&self) -> &[CategoryListItem] {
        &self.categories
    }

    /// Теги для фильтра.
    pub fn tags(&self) -> &[TagListItem] {
        &self.tags
    }

    /// Состояние окна видимости.
    pub fn visibility_modal(&self) -> &VisibilityModal {
        &self.modal
    }

    fn report(&self, err: &AdminClientError, fallback: &str) {
        if let Some(notice) = err.notice(fallback) {
            self.notifier.notify(notice);
        }
    }
}
