//! Оглавление документа: дерево заголовков, выбор текущего заголовка при
//! прокрутке и состояние раскрытия.

use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Минимальный интервал между пересчётами при прокрутке (один кадр).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// Сколько ручной выбор заголовка блокирует автоматический.
pub const MANUAL_SELECTION_HOLD: Duration = Duration::from_secs(3);
/// Максимальная длина подписи пункта оглавления.
pub const MAX_LABEL_CHARS: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Заголовок документа.
pub struct TocEntry {
    /// Ключ узла (путь в документе, например `0.2`).
    pub key: String,
    /// Текст заголовка.
    pub text: String,
    /// Уровень 1..=6.
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Узел дерева оглавления.
pub struct TocNode {
    /// Заголовок.
    pub entry: TocEntry,
    /// Вложенные заголовки.
    pub children: Vec<TocNode>,
}

/// Строит дерево из плоского списка заголовков.
///
/// Заголовок вкладывается в ближайший предшествующий заголовок меньшего
/// уровня; пропущенные уровни (h1 → h3) не создают пустых узлов.
pub fn build_toc_tree(entries: &[TocEntry]) -> Vec<TocNode> {
    let mut roots: Vec<TocNode> = Vec::new();
    // (уровень, индекс среди соседей) для цепочки предков
    let mut stack: Vec<(u8, usize)> = Vec::new();

    for entry in entries {
        while stack.last().is_some_and(|(level, _)| *level >= entry.level) {
            stack.pop();
        }

        let mut siblings = &mut roots;
        for &(_, index) in &stack {
            siblings = &mut siblings[index].children;
        }
        siblings.push(TocNode {
            entry: entry.clone(),
            children: Vec::new(),
        });
        let index = siblings.len() - 1;
        stack.push((entry.level, index));
    }

    roots
}

#[derive(Debug, Clone, PartialEq)]
/// Положение заголовка относительно окна просмотра.
pub struct HeadingGeometry {
    /// Ключ заголовка.
    pub key: String,
    /// Верхняя граница относительно верха окна.
    pub top: f64,
    /// Высота.
    pub height: f64,
}

/// Выбирает заголовок, который считается текущим.
///
/// Сначала видимые (ближайший центром к центру окна), затем ближайший выше
/// окна, затем ближайший ниже, иначе первый.
pub fn select_nearest_heading(headings: &[HeadingGeometry], viewport_height: f64) -> Option<&str> {
    let mut visible: Option<(f64, &HeadingGeometry)> = None;
    let mut above: Option<(f64, &HeadingGeometry)> = None;
    let mut below: Option<(f64, &HeadingGeometry)> = None;

    for heading in headings {
        let bottom = heading.top + heading.height;
        let (slot, distance) = if bottom < 0.0 {
            (&mut above, bottom.abs())
        } else if heading.top > viewport_height {
            (&mut below, (heading.top - viewport_height).abs())
        } else {
            let center = heading.top + heading.height / 2.0;
            (&mut visible, (center - viewport_height / 2.0).abs())
        };
        if slot.is_none_or(|(best, _)| distance < best) {
            *slot = Some((distance, heading));
        }
    }

    visible
        .or(above)
        .or(below)
        .map(|(_, heading)| heading)
        .or_else(|| headings.first())
        .map(|heading| heading.key.as_str())
}

#[derive(Debug, Clone, Default)]
/// Отслеживает текущий заголовок при прокрутке.
pub struct TocTracker {
    selected: Option<String>,
    last_evaluation: Option<Instant>,
    hold_until: Option<Instant>,
}

impl TocTracker {
    /// Создаёт трекер без выбранного заголовка.
    pub fn new() -> Self {
        Self::default()
    }

    /// Текущий заголовок.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Обрабатывает событие прокрутки.
    ///
    /// Пересчёт выполняется не чаще раза за кадр и не выполняется, пока
    /// действует ручной выбор. Возвращает `true`, если выбор изменился.
    pub fn on_scroll(
        &mut self,
        now: Instant,
        headings: &[HeadingGeometry],
        viewport_height: f64,
    ) -> bool {
        if self.hold_until.is_some_and(|until| now < until) {
            return false;
        }
        self.hold_until = None;

        if self
            .last_evaluation
            .is_some_and(|last| now.saturating_duration_since(last) < FRAME_INTERVAL)
        {
            return false;
        }
        self.last_evaluation = Some(now);

        let next = select_nearest_heading(headings, viewport_height).map(str::to_string);
        if next == self.selected {
            return false;
        }
        self.selected = next;
        true
    }

    /// Выбор заголовка кликом: автоматический выбор приостанавливается.
    pub fn select_manually(&mut self, key: impl Into<String>, now: Instant) {
        self.selected = Some(key.into());
        self.hold_until = Some(now + MANUAL_SELECTION_HOLD);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Видимая строка оглавления.
pub struct TocItem {
    /// Ключ заголовка.
    pub key: String,
    /// Подпись (усечённая).
    pub label: String,
    /// Уровень заголовка.
    pub level: u8,
    /// Глубина в дереве.
    pub depth: usize,
    /// Есть вложенные заголовки.
    pub has_children: bool,
    /// Узел раскрыт.
    pub expanded: bool,
}

/// Усекает подпись до 24 символов с многоточием.
pub fn truncate_label(text: &str) -> String {
    if text.chars().count() > MAX_LABEL_CHARS {
        let head: String = text.chars().take(MAX_LABEL_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

#[derive(Debug, Clone, Default)]
/// Дерево оглавления с состоянием раскрытия узлов.
pub struct TocView {
    tree: Vec<TocNode>,
    expanded: HashSet<String>,
}

impl TocView {
    /// Создаёт вид; разделы h1 изначально раскрыты.
    pub fn new(tree: Vec<TocNode>) -> Self {
        let mut expanded = HashSet::new();
        collect_keys(&tree, &mut |node| {
            if node.entry.level == 1 && !node.children.is_empty() {
                expanded.insert(node.entry.key.clone());
            }
        });
        Self { tree, expanded }
    }

    /// Дерево оглавления.
    pub fn tree(&self) -> &[TocNode] {
        &self.tree
    }

    /// Раскрыт ли узел.
    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    /// Переключает раскрытие одного узла.
    pub fn toggle(&mut self, key: &str) {
        if !self.expanded.remove(key) {
            self.expanded.insert(key.to_string());
        }
    }

    /// Раскрывает все узлы, а если все уже раскрыты, сворачивает все.
    pub fn toggle_all(&mut self) {
        let mut expandable = Vec::new();
        collect_keys(&self.tree, &mut |node| {
            if !node.children.is_empty() {
                expandable.push(node.entry.key.clone());
            }
        });

        if expandable.iter().all(|key| self.expanded.contains(key)) {
            self.expanded.clear();
        } else {
            self.expanded.extend(expandable);
        }
    }

    /// Строки, видимые с учётом свёрнутых узлов.
    pub fn visible_items(&self) -> Vec<TocItem> {
        let mut items = Vec::new();
        self.push_visible(&self.tree, 0, &mut items);
        items
    }

    fn push_visible(&self, nodes: &[TocNode], depth: usize, items: &mut Vec<TocItem>) {
        for node in nodes {
            let expanded = self.expanded.contains(&node.entry.key);
            items.push(TocItem {
                key: node.entry.key.clone(),
                label: truncate_label(&node.entry.text),
                level: node.entry.level,
                depth,
                has_children: !node.children.is_empty(),
                expanded,
            });
            if expanded {
                self.push_visible(&node.children, depth + 1, items);
            }
        }
    }
}

fn collect_keys(nodes: &[TocNode], visit: &mut impl FnMut(&TocNode)) {
    for node in nodes {
        visit(node);
        collect_keys(&node.children, visit);
    }
}
