//! Экран написания и редактирования поста.
//!
//! Сессия держит форму, загруженный с сервера пост и кэш статистики
//! текста. Сохранение защищено флагом «в процессе»: пока идёт одно
//! сохранение, следующее не ставится в очередь, а пропускается.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use validator::{Validate, ValidationError};

use crate::api::BlogApi;
use crate::editor::EditorDocument;
use crate::error::{AdminClientError, AdminClientResult};
use crate::models::{BlogItem, BlogSaveReq, CategoryListItem, TagListItem};
use crate::notify::{Notice, Notifier};
use crate::visibility::{FeatureFlags, VisibilitySettings, VisibilityType, check_password};

/// Скорость чтения, слов в минуту.
pub const WORDS_PER_MINUTE: u64 = 300;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("введите заголовок")));
    }
    Ok(())
}

fn validate_picture_url(value: &str) -> Result<(), ValidationError> {
    let valid = reqwest::Url::parse(value.trim())
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("picture_url")
            .with_message(Cow::Borrowed("укажите ссылку на обложку (http или https)")))
    }
}

fn validate_form_password(form: &BlogForm) -> Result<(), ValidationError> {
    match form.visibility {
        Some(visibility) => check_password(visibility, &form.password),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
#[validate(schema(function = "validate_form_password"))]
/// Форма поста.
pub struct BlogForm {
    /// Заголовок.
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    /// Категория.
    #[validate(required(message = "выберите категорию"))]
    pub category: Option<CategoryListItem>,
    /// Теги.
    #[validate(length(min = 1, message = "добавьте хотя бы один тег"))]
    pub tags: Vec<TagListItem>,
    /// URL обложки.
    #[validate(custom(function = "validate_picture_url"))]
    pub first_picture: String,
    /// Краткое описание.
    pub description: String,
    /// Сериализованный документ редактора.
    pub content: String,
    /// Видимость.
    #[validate(required(message = "выберите видимость"))]
    pub visibility: Option<VisibilityType>,
    /// Пароль (для защищённого поста).
    pub password: String,
    /// Функции поста.
    pub flags: FeatureFlags,
}

impl BlogForm {
    /// Форма нового поста.
    pub fn new_post() -> Self {
        Self {
            visibility: Some(VisibilityType::Public),
            ..Self::default()
        }
    }

    /// Форма, заполненная по загруженному посту.
    pub fn from_item(item: &BlogItem) -> Self {
        let settings = VisibilitySettings::from_item(item);
        Self {
            title: item.title.clone(),
            category: item.category.clone(),
            tags: item.tags.clone(),
            first_picture: item.first_picture.clone(),
            description: item.description.clone(),
            content: item.content.clone(),
            visibility: Some(settings.visibility),
            password: settings.password,
            flags: settings.flags,
        }
    }
}

/// Категория по имени: существующая запись или новая без идентификатора.
pub fn resolve_category(known: &[CategoryListItem], name: &str) -> Option<CategoryListItem> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(
        known
            .iter()
            .find(|category| category.name == name)
            .cloned()
            .unwrap_or_else(|| CategoryListItem::pending(name)),
    )
}

/// Теги по именам без повторов, в порядке ввода.
pub fn resolve_tags<I, S>(known: &[TagListItem], names: I) -> Vec<TagListItem>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref().trim().to_string();
            if name.is_empty() || !seen.insert(name.clone()) {
                return None;
            }
            Some(
                known
                    .iter()
                    .find(|tag| tag.name == name)
                    .cloned()
                    .unwrap_or_else(|| TagListItem::pending(name)),
            )
        })
        .collect()
}

/// Время чтения в минутах: не меньше минуты для непустого текста.
pub fn read_time_minutes(words: u64) -> u64 {
    words.div_ceil(WORDS_PER_MINUTE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Кто инициировал сохранение.
pub enum SaveMode {
    /// Пользователь: успех и ошибки валидации показываются.
    Manual,
    /// Таймер автосохранения: успех не показывается, неполная форма
    /// пропускается.
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Результат сохранения.
pub enum SaveOutcome {
    /// Создан новый пост.
    Created(i64),
    /// Обновлён существующий пост.
    Updated(i64),
    /// Уже идёт другое сохранение.
    Skipped,
    /// Форма не прошла проверку.
    Invalid,
    /// Сервер вернул ошибку.
    Failed,
}

impl SaveOutcome {
    /// Идентификатор сохранённого поста.
    pub fn saved_id(self) -> Option<i64> {
        match self {
            Self::Created(id) | Self::Updated(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Результат публикации.
pub struct PublishOutcome {
    /// Результат сохранения.
    pub save: SaveOutcome,
    /// Пост для предпросмотра, если он запрошен и сохранение удалось.
    pub preview_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Статистика текста поста.
pub struct ContentStats {
    /// Слова.
    pub words: u64,
    /// Время чтения, минуты.
    pub read_time: u64,
}

#[derive(Debug)]
struct StatsCache {
    content: String,
    stats: ContentStats,
}

impl StatsCache {
    fn compute(content: &str) -> Self {
        let words = EditorDocument::load(Some(content)).word_count();
        Self {
            content: content.to_string(),
            stats: ContentStats {
                words,
                read_time: read_time_minutes(words),
            },
        }
    }
}

#[derive(Debug)]
struct EditorState {
    form: BlogForm,
    blog_id: Option<i64>,
    original: Option<BlogItem>,
    stats: StatsCache,
}

impl EditorState {
    fn refresh_stats(&mut self) -> ContentStats {
        if self.stats.content != self.form.content {
            self.stats = StatsCache::compute(&self.form.content);
        }
        self.stats.stats
    }

    fn save_request(&mut self) -> BlogSaveReq {
        let stats = self.refresh_stats();
        let form = &self.form;
        let (published, password) = form
            .visibility
            .unwrap_or_default()
            .apply(&form.password);

        BlogSaveReq {
            id: self.blog_id,
            title: Some(form.title.trim().to_string()),
            first_picture: Some(form.first_picture.trim().to_string()),
            content: Some(form.content.clone()),
            description: Some(form.description.clone()),
            published: Some(published),
            recommend: Some(form.flags.recommend),
            appreciation: Some(form.flags.appreciation),
            comment_enabled: Some(form.flags.comment_enabled),
            top: Some(form.flags.top),
            views: self.original.as_ref().and_then(|blog| blog.views),
            words: Some(stats.words),
            read_time: Some(stats.read_time),
            password: Some(password),
            category: form.category.clone(),
            tags: Some(form.tags.clone()),
        }
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Сессия редактирования одного поста.
pub struct BlogEditorSession<A: BlogApi> {
    api: A,
    notifier: Arc<dyn Notifier>,
    categories: Vec<CategoryListItem>,
    tags: Vec<TagListItem>,
    state: Mutex<EditorState>,
    saving: AtomicBool,
}

impl<A: BlogApi> BlogEditorSession<A> {
    /// Открывает редактор: загружает категории и теги, а для `id` и сам
    /// пост.
    ///
    /// Ошибка загрузки справочников не мешает работе (списки пустые);
    /// ошибка загрузки поста возвращается.
    pub async fn open(
        api: A,
        notifier: Arc<dyn Notifier>,
        id: Option<i64>,
    ) -> AdminClientResult<Self> {
        let (categories, tags) =
            match tokio::try_join!(api.list_categories(), api.list_tags()) {
                Ok(lookups) => lookups,
                Err(err) => {
                    tracing::error!(error = %err, "failed to load categories and tags");
                    if let Some(notice) = err.notice("не удалось загрузить справочники") {
                        notifier.notify(notice);
                    }
                    (Vec::new(), Vec::new())
                }
            };

        let state = match id {
            Some(id) => {
                let blog = api.get_blog(id).await?;
                let stats = StatsCache {
                    content: blog.content.clone(),
                    stats: ContentStats {
                        words: blog.words,
                        read_time: blog
                            .read_time
                            .unwrap_or_else(|| read_time_minutes(blog.words)),
                    },
                };
                EditorState {
                    form: BlogForm::from_item(&blog),
                    blog_id: Some(blog.id.unwrap_or(id)),
                    original: Some(blog),
                    stats,
                }
            }
            None => EditorState {
                form: BlogForm::new_post(),
                blog_id: None,
                original: None,
                stats: StatsCache::compute(""),
            },
        };

        Ok(Self {
            api,
            notifier,
            categories,
            tags,
            state: Mutex::new(state),
            saving: AtomicBool::new(false),
        })
    }

    fn state(&self) -> MutexGuard<'_, EditorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Копия текущей формы.
    pub fn form(&self) -> BlogForm {
        self.state().form.clone()
    }

    /// Изменяет форму.
    pub fn update_form(&self, edit: impl FnOnce(&mut BlogForm)) {
        edit(&mut self.state().form);
    }

    /// Заменяет содержимое поста.
    pub fn set_content(&self, content: impl Into<String>) {
        self.state().form.content = content.into();
    }

    /// Выбирает категорию по имени (новое имя создаст категорию при
    /// сохранении).
    pub fn set_category(&self, name: &str) {
        let category = resolve_category(&self.categories, name);
        self.state().form.category = category;
    }

    /// Выбирает теги по именам.
    pub fn set_tags<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = resolve_tags(&self.tags, names);
        self.state().form.tags = tags;
    }

    /// Идентификатор поста (после первого сохранения нового поста тоже).
    pub fn blog_id(&self) -> Option<i64> {
        self.state().blog_id
    }

    /// Известные категории.
    pub fn categories(&self) -> &[CategoryListItem] {
        &self.categories
    }

    /// Известные теги.
    pub fn tags(&self) -> &[TagListItem] {
        &self.tags
    }

    /// Статистика текста; пересчитывается только при изменении содержимого.
    pub fn stats(&self) -> ContentStats {
        self.state().refresh_stats()
    }

    /// Идёт ли сейчас сохранение.
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    /// Сохраняет пост: новый через `/blog/save`, существующий через
    /// `/blog/update`.
    pub async fn save(&self, mode: SaveMode) -> SaveOutcome {
        if self
            .saving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(?mode, "save already in flight, skipping");
            return SaveOutcome::Skipped;
        }
        let _guard = InFlight(&self.saving);

        let prepared = {
            let mut state = self.state();
            match state.form.validate() {
                Ok(()) => Ok((state.save_request(), state.blog_id)),
                Err(errors) => Err(AdminClientError::from(errors)),
            }
        };

        let (req, blog_id) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                match mode {
                    SaveMode::Manual => self.report(&err, "проверьте форму"),
                    SaveMode::Auto => tracing::debug!(error = %err, "autosave skipped: form incomplete"),
                }
                return SaveOutcome::Invalid;
            }
        };

        let result = match blog_id {
            None => self.api.save_blog(req).await.map(SaveOutcome::Created),
            Some(id) => self
                .api
                .update_blog(req)
                .await
                .map(|_| SaveOutcome::Updated(id)),
        };

        match result {
            Ok(outcome) => {
                if let SaveOutcome::Created(id) = outcome {
                    self.state().blog_id = Some(id);
                }
                tracing::info!(?mode, ?outcome, "blog saved");
                if mode == SaveMode::Manual {
                    self.notifier
                        .notify(Notice::Success("пост сохранён".to_string()));
                }
                outcome
            }
            Err(err) => {
                tracing::error!(?mode, error = %err, "failed to save blog");
                self.report(&err, "не удалось сохранить пост");
                SaveOutcome::Failed
            }
        }
    }

    /// Применяет настройки публикации и сохраняет пост.
    pub async fn publish(&self, settings: VisibilitySettings, preview: bool) -> PublishOutcome {
        if let Err(errors) = settings.validate() {
            self.report(&AdminClientError::from(errors), "проверьте настройки");
            return PublishOutcome {
                save: SaveOutcome::Invalid,
                preview_id: None,
            };
        }

        self.update_form(|form| {
            form.visibility = Some(settings.visibility);
            form.password = settings.password;
            form.flags = settings.flags;
        });

        let save = self.save(SaveMode::Manual).await;
        PublishOutcome {
            save,
            preview_id: save.saved_id().filter(|_| preview),
        }
    }

    fn report(&self, err: &AdminClientError, fallback: &str) {
        if let Some(notice) = err.notice(fallback) {
            self.notifier.notify(notice);
        }
    }
}
