use blog_admin_client::{Notice, Notifier};

use crate::token_store::TokenStore;

/// Печатает уведомления в терминал.
///
/// `LoginRequired` удаляет сохранённый токен API.
pub struct TerminalNotifier {
    api_token: TokenStore,
}

impl TerminalNotifier {
    pub fn new(api_token: TokenStore) -> Self {
        Self { api_token }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        if notice == Notice::LoginRequired {
            if let Err(err) = self.api_token.clear() {
                tracing::warn!(path = %self.api_token.path().display(), error = %err, "failed to remove token file");
            }
        }
        match render(&notice) {
            Line::Out(line) => println!("{line}"),
            Line::Err(line) => eprintln!("{line}"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Line {
    Out(String),
    Err(String),
}

fn render(notice: &Notice) -> Line {
    match notice {
        Notice::Success(message) => Line::Out(format!("OK: {message}")),
        Notice::Info(message) => Line::Out(message.clone()),
        Notice::Warning(message) => Line::Err(format!("Внимание: {message}")),
        Notice::Error(message) => Line::Err(format!("Ошибка: {message}")),
        Notice::Notification { title, description } => {
            Line::Err(format!("{title}\n  {description}"))
        }
        Notice::LoginRequired => Line::Err(
            "требуется авторизация: выполните `blog-admin auth token <TOKEN>`".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_goes_to_stdout() {
        assert_eq!(
            render(&Notice::Success("пост удалён".to_string())),
            Line::Out("OK: пост удалён".to_string())
        );
    }

    #[test]
    fn errors_go_to_stderr() {
        assert!(matches!(
            render(&Notice::Error("boom".to_string())),
            Line::Err(line) if line == "Ошибка: boom"
        ));
    }

    #[test]
    fn login_required_removes_api_token() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TokenStore::new(dir.path().join("token"));
        store.persist(Some("expired")).expect("persist");

        TerminalNotifier::new(store.clone()).notify(Notice::LoginRequired);
        assert_eq!(store.load().expect("load"), None);
    }
}
