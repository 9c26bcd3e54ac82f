use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Файл с токеном: локальное хранилище консоли между запусками.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> io::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)?;
        Ok(parse_token_content(&raw))
    }

    /// Пустой токен удаляет файл.
    pub fn persist(&self, token: Option<&str>) -> io::Result<()> {
        match token.and_then(parse_token_content) {
            Some(token) => fs::write(&self.path, token),
            None => self.clear(),
        }
    }

    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> TokenStore {
        TokenStore::new(dir.path().join(".blog_admin_token"))
    }

    #[test]
    fn parse_token_content_trims_whitespace() {
        assert_eq!(
            parse_token_content("  abc.def.ghi \n").as_deref(),
            Some("abc.def.ghi")
        );
        assert!(parse_token_content("   ").is_none());
    }

    #[test]
    fn missing_file_means_no_token() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(store_in(&dir).load().expect("load"), None);
    }

    #[test]
    fn persisted_token_is_loaded_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.persist(Some(" secret ")).expect("persist");
        assert_eq!(store.load().expect("load").as_deref(), Some("secret"));
    }

    #[test]
    fn blank_token_removes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store.persist(Some("secret")).expect("persist");

        store.persist(Some("  ")).expect("persist blank");
        assert!(!store.path().exists());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store.clear().expect("clear missing");
        store.persist(Some("secret")).expect("persist");
        store.clear().expect("clear");
        store.clear().expect("clear again");
        assert_eq!(store.load().expect("load"), None);
    }
}
