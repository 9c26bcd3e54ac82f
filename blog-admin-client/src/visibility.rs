//! Видимость поста: публичный, приватный или защищённый паролем.
//!
//! На сервере видимость хранится двумя полями (`published`, `password`);
//! тип видимости из них выводится и обратно в них раскладывается.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::error::AdminClientResult;
use crate::models::{BlogItem, BlogListItem, VisibilityBlogReq};

/// Минимальная длина пароля поста.
pub const MIN_PASSWORD_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[repr(u8)]
/// Тип видимости поста.
pub enum VisibilityType {
    /// Опубликован и открыт всем.
    #[default]
    Public = 1,
    /// Не опубликован.
    Private = 2,
    /// Опубликован, доступ по паролю.
    PasswordProtected = 3,
}

impl VisibilityType {
    /// Все варианты в порядке отображения.
    pub const ALL: [VisibilityType; 3] = [Self::Public, Self::Private, Self::PasswordProtected];

    /// Выводит тип видимости из полей поста.
    pub fn derive(published: bool, password: Option<&str>) -> Self {
        if !published {
            Self::Private
        } else if password.is_some_and(|password| !password.is_empty()) {
            Self::PasswordProtected
        } else {
            Self::Public
        }
    }

    /// Раскладывает тип обратно в `(published, password)`.
    ///
    /// Пароль сохраняется только для защищённого поста, иначе пустая строка.
    pub fn apply(self, password: &str) -> (bool, String) {
        let published = self != Self::Private;
        let password = if self == Self::PasswordProtected {
            password.to_string()
        } else {
            String::new()
        };
        (published, password)
    }

    /// Числовой код (1, 2, 3).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Подпись для интерфейса.
    pub fn label(self) -> &'static str {
        match self {
            Self::Public => "Публичный",
            Self::Private => "Приватный",
            Self::PasswordProtected => "По паролю",
        }
    }

    /// Цвет метки.
    pub fn color(self) -> &'static str {
        match self {
            Self::Public => "green",
            Self::Private => "amber",
            Self::PasswordProtected => "blue",
        }
    }
}

impl fmt::Display for VisibilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VisibilityType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "public" => Ok(Self::Public),
            "2" | "private" => Ok(Self::Private),
            "3" | "password" | "protected" => Ok(Self::PasswordProtected),
            other => Err(format!(
                "unknown visibility '{other}', expected public, private or password"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Переключаемые функции поста.
pub struct FeatureFlags {
    /// Донаты.
    pub appreciation: bool,
    /// Рекомендуемый.
    pub recommend: bool,
    /// Комментарии.
    pub comment_enabled: bool,
    /// Закреплён.
    pub top: bool,
}

impl FeatureFlags {
    /// Флаги строки таблицы.
    pub fn from_row(row: &BlogListItem) -> Self {
        Self {
            appreciation: row.appreciation,
            recommend: row.recommend,
            comment_enabled: row.comment_enabled,
            top: row.top,
        }
    }

    /// Флаги полной карточки; неизвестные считаются выключенными.
    pub fn from_item(item: &BlogItem) -> Self {
        Self {
            appreciation: item.appreciation.unwrap_or_default(),
            recommend: item.recommend.unwrap_or_default(),
            comment_enabled: item.comment_enabled.unwrap_or_default(),
            top: item.top.unwrap_or_default(),
        }
    }
}

pub(crate) fn check_password(
    visibility: VisibilityType,
    password: &str,
) -> Result<(), ValidationError> {
    if visibility != VisibilityType::PasswordProtected {
        return Ok(());
    }
    if password.trim().is_empty() {
        return Err(ValidationError::new("password_required")
            .with_message(Cow::Borrowed("введите пароль")));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new("password_too_short")
            .with_message(Cow::Borrowed("пароль не короче 4 символов")));
    }
    Ok(())
}

fn validate_settings_password(settings: &VisibilitySettings) -> Result<(), ValidationError> {
    check_password(settings.visibility, &settings.password)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
#[validate(schema(function = "validate_settings_password"))]
/// Форма настроек видимости.
pub struct VisibilitySettings {
    /// Тип видимости.
    pub visibility: VisibilityType,
    /// Пароль; учитывается только для защищённого поста.
    pub password: String,
    /// Функции поста.
    pub flags: FeatureFlags,
}

impl VisibilitySettings {
    /// Заполняет форму по строке таблицы.
    pub fn from_row(row: &BlogListItem) -> Self {
        Self {
            visibility: VisibilityType::derive(row.published, row.password.as_deref()),
            password: row.password.clone().unwrap_or_default(),
            flags: FeatureFlags::from_row(row),
        }
    }

    /// Заполняет форму по полной карточке поста.
    pub fn from_item(item: &BlogItem) -> Self {
        Self {
            visibility: VisibilityType::derive(item.published, item.password.as_deref()),
            password: item.password.clone().unwrap_or_default(),
            flags: FeatureFlags::from_item(item),
        }
    }

    /// Поля `(published, password)` для сохранения.
    pub fn published_and_password(&self) -> (bool, String) {
        self.visibility.apply(&self.password)
    }

    /// Проверяет форму и собирает запрос `/blog/visible`.
    pub fn into_request(self, id: i64) -> AdminClientResult<VisibilityBlogReq> {
        self.validate()?;
        let (published, password) = self.published_and_password();
        Ok(VisibilityBlogReq {
            id: Some(id),
            appreciation: Some(self.flags.appreciation),
            recommend: Some(self.flags.recommend),
            comment_enabled: Some(self.flags.comment_enabled),
            top: Some(self.flags.top),
            published: Some(published),
            password: Some(password),
        })
    }
}
