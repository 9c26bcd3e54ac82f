use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Короткое уведомление для пользователя.
pub enum Notice {
    /// Операция выполнена.
    Success(String),
    /// Информационное сообщение.
    Info(String),
    /// Предупреждение.
    Warning(String),
    /// Ошибка.
    Error(String),
    /// Постоянное уведомление с заголовком.
    Notification {
        /// Заголовок.
        title: String,
        /// Текст уведомления.
        description: String,
    },
    /// Сессия истекла: токен сброшен, нужен повторный вход.
    LoginRequired,
}

/// Получатель уведомлений (консоль, лог, тестовый буфер).
pub trait Notifier: Send + Sync {
    /// Показывает уведомление.
    fn notify(&self, notice: Notice);
}

#[derive(Debug, Default, Clone, Copy)]
/// Пишет уведомления в `tracing`.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Success(message) | Notice::Info(message) => tracing::info!("{message}"),
            Notice::Warning(message) => tracing::warn!("{message}"),
            Notice::Error(message) => tracing::error!("{message}"),
            Notice::Notification { title, description } => {
                tracing::error!("{title}: {description}")
            }
            Notice::LoginRequired => tracing::warn!("login required"),
        }
    }
}

#[derive(Debug, Default, Clone)]
/// Запоминает уведомления; удобен в тестах и для отложенного вывода.
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    /// Создаёт пустой буфер уведомлений.
    pub fn new() -> Self {
        Self::default()
    }

    /// Забирает накопленные уведомления.
    pub fn take(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(mut notices) => std::mem::take(&mut *notices),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        match self.notices.lock() {
            Ok(mut notices) => notices.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}
