//! Позиционный разбор путей файлового браузера в режиме GitHub.
//!
//! Путь `/owner/repo/dir/file` читается по позициям: первый сегмент всегда
//! владелец, второй репозиторий, остальное путь внутри репозитория. Вложенные
//! организации и совпадающие имена пользователей и репозиториев этим
//! разбором не различаются.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Разобранный путь GitHub.
pub struct GitHubPath {
    /// Владелец (пользователь или организация).
    pub owner: String,
    /// Репозиторий.
    pub repo: String,
    /// Путь внутри репозитория.
    pub file_path: String,
}

/// Разбирает путь на владельца, репозиторий и путь внутри репозитория.
pub fn parse_github_path(path: &str) -> GitHubPath {
    let segments = segments(path);
    match segments.as_slice() {
        [] => GitHubPath::default(),
        [owner] => GitHubPath {
            owner: owner.to_string(),
            ..GitHubPath::default()
        },
        [owner, repo] => GitHubPath {
            owner: owner.to_string(),
            repo: repo.to_string(),
            file_path: String::new(),
        },
        [owner, repo, rest @ ..] => GitHubPath {
            owner: owner.to_string(),
            repo: repo.to_string(),
            file_path: rest.join("/"),
        },
    }
}

/// Путь указывает внутрь репозитория (есть владелец и репозиторий).
pub fn is_repo_path(path: &str) -> bool {
    let parsed = parse_github_path(path);
    !parsed.owner.is_empty() && !parsed.repo.is_empty()
}

/// Непустые сегменты пути.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|part| !part.is_empty()).collect()
}

/// Путь дочернего элемента `name` внутри `current`.
pub fn child_path(current: &str, name: &str) -> String {
    if current == "/" || current.is_empty() {
        format!("/{name}")
    } else {
        format!("{}/{name}", current.trim_end_matches('/'))
    }
}

/// Родительский путь в локальном хранилище.
pub fn local_parent_path(current: &str) -> String {
    let mut parts = segments(current);
    parts.pop();
    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

/// Родительский путь в GitHub: из репозитория и с уровня владельца
/// возврат идёт сразу в корень.
pub fn github_parent_path(current: &str) -> String {
    if segments(current).len() <= 2 {
        "/".to_string()
    } else {
        local_parent_path(current)
    }
}

/// Путь `/owner/repo` по адресу страницы репозитория
/// `https://github.com/owner/repo`.
pub fn repo_path_from_url(url: &str) -> Option<String> {
    if !url.contains("github.com/") {
        return None;
    }
    let parts: Vec<&str> = url.split('/').collect();
    if parts.len() < 5 {
        return None;
    }
    let (owner, repo) = (parts[3], parts[4]);
    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some(format!("/{owner}/{repo}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Роль сегмента в «хлебных крошках».
pub enum CrumbKind {
    /// Корень хранилища.
    Root,
    /// Владелец репозитория (только GitHub).
    Owner,
    /// Репозиторий (только GitHub).
    Repository,
    /// Обычная папка.
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Один элемент «хлебных крошек».
pub struct Breadcrumb {
    /// Подпись.
    pub label: String,
    /// Путь перехода.
    pub path: String,
    /// Роль сегмента.
    pub kind: CrumbKind,
}

/// «Хлебные крошки» для текущего пути: корень и по одной на каждый префикс.
pub fn breadcrumbs(path: &str, github: bool) -> Vec<Breadcrumb> {
    let root_label = if github { "GitHub" } else { "Локальные файлы" };
    let mut crumbs = vec![Breadcrumb {
        label: root_label.to_string(),
        path: "/".to_string(),
        kind: CrumbKind::Root,
    }];

    let parts = segments(path);
    for (index, part) in parts.iter().enumerate() {
        let kind = match (github, index) {
            (true, 0) => CrumbKind::Owner,
            (true, 1) => CrumbKind::Repository,
            _ => CrumbKind::Folder,
        };
        crumbs.push(Breadcrumb {
            label: part.to_string(),
            path: format!("/{}", parts[..=index].join("/")),
            kind,
        });
    }
    crumbs
}
