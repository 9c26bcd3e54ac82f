//! Документ редактора постов и операции над ним.
//!
//! Содержимое поста хранится как JSON-дерево узлов
//! (`{"root": {"type": "root", "children": [...]}}`). Редактор понимает
//! абзацы, заголовки, текст и переносы строк; остальные узлы и неизвестные
//! поля сохраняются как есть.

mod toc;

pub use toc::{
    FRAME_INTERVAL, HeadingGeometry, MANUAL_SELECTION_HOLD, MAX_LABEL_CHARS, TocEntry, TocItem,
    TocNode, TocTracker, TocView, build_toc_tree, select_nearest_heading, truncate_label,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AdminClientError, AdminClientResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Узел сериализованного документа.
pub struct SerializedNode {
    /// Тип узла (`root`, `paragraph`, `heading`, `text`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Тег заголовка (`h1`..`h6`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Текст текстового узла.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Дочерние узлы.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SerializedNode>>,
    /// Прочие поля узла.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SerializedNode {
    fn element(kind: &str, children: Vec<SerializedNode>) -> Self {
        let mut extra = Map::new();
        extra.insert("direction".to_string(), Value::String("ltr".to_string()));
        extra.insert("format".to_string(), Value::String(String::new()));
        extra.insert("indent".to_string(), Value::from(0));
        extra.insert("version".to_string(), Value::from(1));
        Self {
            kind: kind.to_string(),
            tag: None,
            text: None,
            children: Some(children),
            extra,
        }
    }

    /// Текстовый узел.
    pub fn text(text: impl Into<String>) -> Self {
        let mut extra = Map::new();
        extra.insert("detail".to_string(), Value::from(0));
        extra.insert("format".to_string(), Value::from(0));
        extra.insert("mode".to_string(), Value::String("normal".to_string()));
        extra.insert("style".to_string(), Value::String(String::new()));
        extra.insert("version".to_string(), Value::from(1));
        Self {
            kind: "text".to_string(),
            tag: None,
            text: Some(text.into()),
            children: None,
            extra,
        }
    }

    /// Абзац с одним текстовым узлом (пустой текст даёт пустой абзац).
    pub fn paragraph(text: &str) -> Self {
        let children = if text.is_empty() {
            Vec::new()
        } else {
            vec![Self::text(text)]
        };
        Self::element("paragraph", children)
    }

    /// Заголовок уровня `level` (ограничивается 1..=6).
    pub fn heading(level: u8, text: &str) -> Self {
        let mut node = Self::element("heading", vec![Self::text(text)]);
        node.tag = Some(format!("h{}", level.clamp(1, 6)));
        node
    }

    /// Дочерние узлы (пустой срез у листьев).
    pub fn children(&self) -> &[SerializedNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Уровень заголовка по тегу; неизвестный или отсутствующий тег даёт 1.
    pub fn heading_level(&self) -> u8 {
        self.tag
            .as_deref()
            .and_then(|tag| tag.strip_prefix('h'))
            .and_then(|level| level.parse::<u8>().ok())
            .filter(|level| (1..=6).contains(level))
            .unwrap_or(1)
    }

    fn inline_text(&self, out: &mut String) {
        match self.kind.as_str() {
            "text" => out.push_str(self.text.as_deref().unwrap_or_default()),
            "linebreak" => out.push('\n'),
            "tab" => out.push('\t'),
            _ => {}
        }
        for child in self.children() {
            if child.is_block() && !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            child.inline_text(out);
        }
    }

    fn is_block(&self) -> bool {
        !matches!(self.kind.as_str(), "text" | "linebreak" | "tab" | "link")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Сериализованный документ редактора.
pub struct EditorDocument {
    /// Корневой узел.
    pub root: SerializedNode,
}

impl Default for EditorDocument {
    fn default() -> Self {
        Self::empty()
    }
}

impl EditorDocument {
    /// Пустой документ.
    pub fn empty() -> Self {
        Self {
            root: SerializedNode::element("root", Vec::new()),
        }
    }

    /// Загружает документ из сохранённого состояния.
    ///
    /// Пустое состояние даёт пустой документ. Если состояние не разбирается,
    /// ошибка пишется в лог, а содержимое вставляется как обычный текст.
    pub fn load(initial: Option<&str>) -> Self {
        let Some(raw) = initial.filter(|raw| !raw.trim().is_empty()) else {
            return Self::empty();
        };
        match serde_json::from_str::<EditorDocument>(raw) {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!(error = %err, "editor state is not valid json, loading as plain text");
                Self::from_plain_text(raw)
            }
        }
    }

    /// Документ из обычного текста: абзац на каждую строку.
    pub fn from_plain_text(text: &str) -> Self {
        let paragraphs = text.lines().map(SerializedNode::paragraph).collect();
        Self {
            root: SerializedNode::element("root", paragraphs),
        }
    }

    /// Сериализует документ в JSON-строку.
    pub fn to_json(&self) -> AdminClientResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Блоки верхнего уровня.
    pub fn blocks(&self) -> &[SerializedNode] {
        self.root.children()
    }

    fn blocks_mut(&mut self) -> &mut Vec<SerializedNode> {
        self.root.children.get_or_insert_with(Vec::new)
    }

    /// Текст документа: блоки разделяются переводом строки.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.root.inline_text(&mut out);
        out.trim_end().to_string()
    }

    /// Количество слов в тексте документа.
    pub fn word_count(&self) -> u64 {
        count_words(&self.plain_text())
    }

    /// Плоский список заголовков в порядке документа.
    pub fn headings(&self) -> Vec<TocEntry> {
        let mut entries = Vec::new();
        collect_headings(self.root.children(), "", &mut entries);
        entries
    }
}

fn collect_headings(nodes: &[SerializedNode], prefix: &str, entries: &mut Vec<TocEntry>) {
    for (index, node) in nodes.iter().enumerate() {
        let key = if prefix.is_empty() {
            index.to_string()
        } else {
            format!("{prefix}.{index}")
        };
        if node.kind == "heading" {
            let mut text = String::new();
            node.inline_text(&mut text);
            entries.push(TocEntry {
                key: key.clone(),
                text: text.trim().to_string(),
                level: node.heading_level(),
            });
        }
        collect_headings(node.children(), &key, entries);
    }
}

fn is_cjk(c: char) -> bool {
    matches!(c as u32,
        0x3040..=0x30FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xAC00..=0xD7AF
        | 0xF900..=0xFAFF
        | 0x20000..=0x2A6DF)
}

/// Считает слова: каждый иероглиф отдельное слово, остальной текст делится
/// по пробелам.
pub fn count_words(text: &str) -> u64 {
    let mut count = 0u64;
    let mut in_word = false;
    for c in text.chars() {
        if is_cjk(c) {
            count += 1;
            in_word = false;
        } else if c.is_whitespace() {
            in_word = false;
        } else if !in_word {
            count += 1;
            in_word = true;
        }
    }
    count
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Параметры редактора.
pub struct EditorOptions {
    /// Только чтение.
    pub read_only: bool,
    /// Показывать оглавление.
    pub show_table_of_contents: bool,
}

type ChangeCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Редактор документа поста.
///
/// Каждое принятое изменение передаёт сериализованное состояние в
/// обработчик `on_change`.
pub struct Editor {
    document: EditorDocument,
    options: EditorOptions,
    on_change: Option<ChangeCallback>,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("document", &self.document)
            .field("options", &self.options)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl Editor {
    /// Создаёт редактор с начальным состоянием.
    pub fn new(initial: Option<&str>, options: EditorOptions) -> Self {
        Self {
            document: EditorDocument::load(initial),
            options,
            on_change: None,
        }
    }

    /// Регистрирует обработчик изменений.
    pub fn on_change(&mut self, callback: impl Fn(&str) + Send + Sync + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Документ.
    pub fn document(&self) -> &EditorDocument {
        &self.document
    }

    /// Параметры.
    pub fn options(&self) -> EditorOptions {
        self.options
    }

    /// Включает или выключает режим только для чтения.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.options.read_only = read_only;
    }

    /// Сериализованное состояние.
    pub fn serialized(&self) -> AdminClientResult<String> {
        self.document.to_json()
    }

    /// Заменяет документ целиком.
    pub fn replace_document(&mut self, document: EditorDocument) -> AdminClientResult<()> {
        self.commit(|current| *current = document)
    }

    /// Добавляет абзац в конец документа.
    pub fn append_paragraph(&mut self, text: &str) -> AdminClientResult<()> {
        self.commit(|document| document.blocks_mut().push(SerializedNode::paragraph(text)))
    }

    /// Добавляет заголовок в конец документа.
    pub fn append_heading(&mut self, level: u8, text: &str) -> AdminClientResult<()> {
        self.commit(|document| {
            document
                .blocks_mut()
                .push(SerializedNode::heading(level, text))
        })
    }

    /// Заменяет содержимое обычным текстом.
    pub fn set_plain_text(&mut self, text: &str) -> AdminClientResult<()> {
        self.commit(|document| *document = EditorDocument::from_plain_text(text))
    }

    /// Оглавление, если оно включено.
    pub fn table_of_contents(&self) -> Option<TocView> {
        self.options
            .show_table_of_contents
            .then(|| TocView::new(build_toc_tree(&self.document.headings())))
    }

    fn commit(&mut self, edit: impl FnOnce(&mut EditorDocument)) -> AdminClientResult<()> {
        if self.options.read_only {
            return Err(AdminClientError::Editor(
                "редактор открыт только для чтения".to_string(),
            ));
        }
        edit(&mut self.document);
        if let Some(callback) = &self.on_change {
            let state = self.document.to_json()?;
            callback(&state);
        }
        Ok(())
    }
}
