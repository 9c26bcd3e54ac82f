//! Буфер обмена.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::AdminClientResult;

/// Куда копируются ссылки на файлы.
pub trait Clipboard: Send + Sync {
    /// Копирует текст.
    fn copy(&self, text: &str) -> AdminClientResult<()>;
}

/// Буфер обмена терминала через управляющую последовательность OSC 52.
pub struct Osc52Clipboard {
    out: Mutex<Box<dyn Write + Send>>,
}

impl Osc52Clipboard {
    /// Пишет последовательность в stdout.
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Пишет последовательность в указанный поток.
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Управляющая последовательность для текста.
    pub fn sequence(text: &str) -> String {
        format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
    }
}

impl Clipboard for Osc52Clipboard {
    fn copy(&self, text: &str) -> AdminClientResult<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(Self::sequence(text).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
/// Буфер обмена в памяти.
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    /// Пустой буфер.
    pub fn new() -> Self {
        Self::default()
    }

    /// Последний скопированный текст.
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&self, text: &str) -> AdminClientResult<()> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("buffer mutex poisoned").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn osc52_wraps_base64_payload() {
        assert_eq!(Osc52Clipboard::sequence("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn osc52_writes_sequence_to_stream() {
        let buffer = SharedBuffer::default();
        let clipboard = Osc52Clipboard::new(Box::new(buffer.clone()));
        clipboard.copy("https://x").expect("copy must succeed");
        let written = buffer.0.lock().expect("buffer mutex poisoned").clone();
        assert_eq!(
            String::from_utf8(written).expect("utf8"),
            Osc52Clipboard::sequence("https://x")
        );
    }

    #[test]
    fn memory_clipboard_keeps_last_value() {
        let clipboard = MemoryClipboard::new();
        clipboard.copy("a").expect("copy");
        clipboard.copy("b").expect("copy");
        assert_eq!(clipboard.contents().as_deref(), Some("b"));
    }
}
