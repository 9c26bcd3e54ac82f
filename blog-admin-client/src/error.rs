use thiserror::Error;
use validator::ValidationErrors;

use crate::notify::Notice;

const DEFAULT_BUSINESS_MESSAGE: &str = "операция не выполнена";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Подсказка сервера о том, как показать бизнес-ошибку пользователю.
pub enum ErrorShowType {
    /// Не показывать ничего.
    Silent,
    /// Предупреждение.
    WarnMessage,
    /// Сообщение об ошибке.
    ErrorMessage,
    /// Постоянное уведомление.
    Notification,
    /// Требуется повторный вход.
    Redirect,
}

impl ErrorShowType {
    /// Разбирает числовой код `showType`; неизвестные значения считаются
    /// обычным сообщением об ошибке.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => Self::Silent,
            Some(1) => Self::WarnMessage,
            Some(3) => Self::Notification,
            Some(9) => Self::Redirect,
            _ => Self::ErrorMessage,
        }
    }
}

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `blog-admin-client`.
pub enum AdminClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// API вернул `success = false`.
    #[error("business error {code}: {message}")]
    Business {
        /// Код ошибки из ответа.
        code: i64,
        /// Текст ошибки.
        message: String,
        /// Как показывать ошибку.
        show_type: ErrorShowType,
    },

    /// Требуется авторизация (отсутствует/просрочен токен).
    #[error("unauthorized")]
    Unauthorized,

    /// Запрошенный ресурс не найден.
    #[error("not found")]
    NotFound,

    /// Некорректный запрос или неожиданный ответ.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Ответ не удалось разобрать.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Ошибка GitHub API.
    #[error("github error {status}: {message}")]
    GitHub {
        /// HTTP-статус ответа GitHub (0, если ответа не было).
        status: u16,
        /// Описание ошибки.
        message: String,
    },

    /// Для операции с GitHub нужен токен.
    #[error("github token is required")]
    GitHubTokenRequired,

    /// Форма не прошла валидацию.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Ошибка документа редактора.
    #[error("editor error: {0}")]
    Editor(String),

    /// Ошибка ввода-вывода (буфер обмена терминала).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Результат операций `blog-admin-client`.
pub type AdminClientResult<T> = Result<T, AdminClientError>;

impl AdminClientError {
    pub(crate) fn business(
        code: Option<i64>,
        message: Option<String>,
        show_type: Option<i64>,
    ) -> Self {
        Self::Business {
            code: code.unwrap_or_default(),
            message: message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BUSINESS_MESSAGE.to_string()),
            show_type: ErrorShowType::from_code(show_type),
        }
    }

    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED => Self::Unauthorized,
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            _ => {
                let message = message.unwrap_or_else(|| format!("http status {status}"));
                Self::InvalidRequest(message)
            }
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }

    /// Признак ошибки авторизации (сессию нужно сбросить).
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized
                | Self::Business {
                    show_type: ErrorShowType::Redirect,
                    ..
                }
        )
    }

    /// Уведомление для пользователя.
    ///
    /// Бизнес-ошибки показываются согласно `showType`, ошибки авторизации
    /// превращаются в требование повторного входа, а все остальные ошибки
    /// получают общий текст `fallback`. `None` означает «ничего не показывать».
    pub fn notice(&self, fallback: &str) -> Option<Notice> {
        match self {
            _ if self.is_unauthorized() => Some(Notice::LoginRequired),
            Self::Business {
                message, show_type, ..
            } => match show_type {
                ErrorShowType::Silent => None,
                ErrorShowType::WarnMessage => Some(Notice::Warning(message.clone())),
                ErrorShowType::Notification => Some(Notice::Notification {
                    title: "Системная ошибка".to_string(),
                    description: message.clone(),
                }),
                ErrorShowType::ErrorMessage | ErrorShowType::Redirect => {
                    Some(Notice::Error(message.clone()))
                }
            },
            Self::Validation(errors) => Some(Notice::Error(format!("{fallback}: {errors}"))),
            _ => Some(Notice::Error(fallback.to_string())),
        }
    }

    /// Текст для транспортных ошибок в духе «нет ответа / плохой статус».
    pub fn transport_summary(&self) -> Option<String> {
        match self {
            Self::Http(err) => Some(match err.status() {
                Some(status) => format!("ошибка запроса {status}"),
                None => "сетевая ошибка, проверьте подключение".to_string(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_type_defaults_to_error_message() {
        assert_eq!(ErrorShowType::from_code(None), ErrorShowType::ErrorMessage);
        assert_eq!(ErrorShowType::from_code(Some(42)), ErrorShowType::ErrorMessage);
        assert_eq!(ErrorShowType::from_code(Some(9)), ErrorShowType::Redirect);
    }

    #[test]
    fn business_error_uses_default_message_when_blank() {
        let err = AdminClientError::business(Some(500), Some("  ".to_string()), None);
        match err {
            AdminClientError::Business { code, message, .. } => {
                assert_eq!(code, 500);
                assert_eq!(message, DEFAULT_BUSINESS_MESSAGE);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn silent_business_error_has_no_notice() {
        let err = AdminClientError::business(Some(1), Some("hidden".to_string()), Some(0));
        assert!(err.notice("fallback").is_none());
    }

    #[test]
    fn warn_business_error_maps_to_warning() {
        let err = AdminClientError::business(Some(1), Some("careful".to_string()), Some(1));
        assert_eq!(
            err.notice("fallback"),
            Some(Notice::Warning("careful".to_string()))
        );
    }

    #[test]
    fn redirect_business_error_requires_login() {
        let err = AdminClientError::business(Some(1), Some("expired".to_string()), Some(9));
        assert!(err.is_unauthorized());
        assert_eq!(err.notice("fallback"), Some(Notice::LoginRequired));
    }

    #[test]
    fn other_errors_use_fallback_message() {
        let err = AdminClientError::NotFound;
        assert_eq!(
            err.notice("не удалось удалить"),
            Some(Notice::Error("не удалось удалить".to_string()))
        );
    }
}
