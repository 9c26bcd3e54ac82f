mod logging;
mod notifier;
mod settings;
mod token_store;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use blog_admin_client::editor::{Editor, EditorDocument, EditorOptions, TocView};
use blog_admin_client::{
    AdminClient, AdminClientError, Autosave, BlogApi, BlogEditorSession, BlogFlag, BlogItem,
    BlogListItem, BlogQuery, ContentStats, FeatureFlags, FileBrowser, FileSpaceApi, GitHubApi,
    HttpClient, LocalFileSpace, Notice, Notifier, Osc52Clipboard, SaveMode, SaveOutcome,
    StorageKind, TokenChange, VisibilitySettings, VisibilityType, convert_svg, load_svg,
    mime_from_file_name, read_time_minutes,
};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::notifier::TerminalNotifier;
use crate::settings::Settings;
use crate::token_store::TokenStore;

const CONTENT_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Parser)]
#[command(name = "blog-admin", version, about = "Консоль администратора блога")]
struct Cli {
    /// Адрес API блога (перекрывает BLOG_ADMIN_API_URL).
    #[arg(long, global = true)]
    server: Option<String>,

    /// Адрес GitHub API (перекрывает GITHUB_API_URL).
    #[arg(long, global = true)]
    github_api: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Посты.
    Posts {
        #[command(subcommand)]
        command: PostsCommand,
    },
    /// Список категорий.
    Categories,
    /// Список тегов.
    Tags,
    /// Файловое пространство сервера или GitHub.
    Files {
        /// Работать с репозиториями GitHub.
        #[arg(long)]
        github: bool,
        #[command(subcommand)]
        command: FilesCommand,
    },
    /// Токен API блога.
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
    /// SVG-файлы.
    Svg {
        #[command(subcommand)]
        command: SvgCommand,
    },
}

#[derive(Debug, Subcommand)]
enum PostsCommand {
    /// Страница таблицы постов.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
        /// Поиск по заголовку.
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category_id: Option<i64>,
        #[arg(long)]
        tag_id: Option<i64>,
    },
    /// Карточка поста.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Удаление поста.
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Закрепление поста.
    Top {
        #[arg(long)]
        id: i64,
        #[arg(value_enum)]
        state: Switch,
    },
    /// Пометка «рекомендуемый».
    Recommend {
        #[arg(long)]
        id: i64,
        #[arg(value_enum)]
        state: Switch,
    },
    /// Видимость, пароль и функции поста.
    Visibility(VisibilityArgs),
    /// Предпросмотр: оглавление и текст.
    Preview {
        #[arg(long)]
        id: i64,
        /// Раскрыть все разделы оглавления.
        #[arg(long)]
        expand_all: bool,
    },
    /// Пост по токену публичной ссылки.
    Share {
        #[arg(long)]
        token: String,
    },
    /// Создание или редактирование поста.
    Write(WriteArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl From<Switch> for bool {
    fn from(value: Switch) -> Self {
        value == Switch::On
    }
}

#[derive(Debug, Args)]
struct FlagArgs {
    /// Донаты.
    #[arg(long, value_enum)]
    appreciation: Option<Switch>,
    /// Рекомендуемый.
    #[arg(long, value_enum)]
    recommend: Option<Switch>,
    /// Комментарии.
    #[arg(long, value_enum)]
    comments: Option<Switch>,
    /// Закреплён.
    #[arg(long, value_enum)]
    top: Option<Switch>,
}

impl FlagArgs {
    fn apply(&self, flags: &mut FeatureFlags) {
        let overrides = [
            (&mut flags.appreciation, self.appreciation),
            (&mut flags.recommend, self.recommend),
            (&mut flags.comment_enabled, self.comments),
            (&mut flags.top, self.top),
        ];
        for (flag, value) in overrides {
            if let Some(value) = value {
                *flag = value.into();
            }
        }
    }
}

#[derive(Debug, Args)]
struct VisibilityArgs {
    #[arg(long)]
    id: i64,
    /// Страница таблицы, на которой находится пост.
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// public, private или password.
    #[arg(long)]
    visibility: Option<VisibilityType>,
    #[arg(long)]
    password: Option<String>,
    #[command(flatten)]
    flags: FlagArgs,
}

#[derive(Debug, Args)]
struct WriteArgs {
    /// Пост для редактирования; без него создаётся новый.
    #[arg(long)]
    id: Option<i64>,
    #[arg(long)]
    title: Option<String>,
    /// Категория по имени; новое имя создаст категорию.
    #[arg(long)]
    category: Option<String>,
    /// Тег по имени (можно повторять).
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// URL обложки.
    #[arg(long)]
    picture: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Текст поста: `.json` с состоянием редактора или обычный текст,
    /// где строки с `#` становятся заголовками.
    #[arg(long)]
    content_file: Option<PathBuf>,
    /// public, private или password.
    #[arg(long)]
    visibility: Option<VisibilityType>,
    #[arg(long)]
    password: Option<String>,
    #[command(flatten)]
    flags: FlagArgs,
    /// Применить настройки видимости и сохранить.
    #[arg(long)]
    publish: bool,
    /// После публикации показать предпросмотр.
    #[arg(long, requires = "publish")]
    preview: bool,
    /// Автосохранение до Ctrl-C; файл содержимого перечитывается при изменении.
    #[arg(long)]
    watch: bool,
}

#[derive(Debug, Subcommand)]
enum FilesCommand {
    /// Содержимое папки.
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Новая папка.
    Mkdir {
        #[arg(long, default_value = "/")]
        path: String,
        #[arg(long)]
        name: String,
    },
    /// Переименование файла.
    Rename {
        #[arg(long, default_value = "/")]
        path: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        new_name: String,
    },
    /// Загрузка файла в папку.
    Upload {
        #[arg(long, default_value = "/")]
        path: String,
        #[arg(long)]
        file: PathBuf,
        /// Имя в хранилище (по умолчанию имя локального файла).
        #[arg(long)]
        name: Option<String>,
    },
    /// Копирует ссылку на файл в буфер обмена терминала.
    CopyUrl {
        #[arg(long, default_value = "/")]
        path: String,
        #[arg(long)]
        name: String,
    },
    /// Сохраняет токен GitHub; без значения удаляет его.
    Token { token: Option<String> },
    /// Проверка доступности GitHub API.
    Check,
}

#[derive(Debug, Subcommand)]
enum AuthCommand {
    /// Сохраняет токен API блога.
    Token { token: String },
    /// Удаляет сохранённый токен.
    Clear,
}

#[derive(Debug, Subcommand)]
enum SvgCommand {
    /// Проверяет SVG и печатает data URL для предпросмотра.
    Preview {
        #[arg(long)]
        file: PathBuf,
        /// MIME-тип (по умолчанию по расширению).
        #[arg(long)]
        mime: Option<String>,
    },
    /// Конвертация в растровый формат.
    Convert {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = "png")]
        format: String,
    },
}

struct App {
    settings: Settings,
    client: AdminClient,
    notifier: Arc<dyn Notifier>,
    api_tokens: TokenStore,
    github_tokens: TokenStore,
}

impl App {
    fn client_error(&self, err: AdminClientError) -> anyhow::Error {
        if err.is_unauthorized() {
            self.notifier.notify(Notice::LoginRequired);
        }
        map_client_error(err)
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = Settings::from_env()?.with_overrides(cli.server, cli.github_api);
    logging::init_logging(&settings.log_level)?;

    let client =
        AdminClient::new(&settings.client_config()).context("не удалось создать HTTP-клиент")?;
    let api_tokens = TokenStore::new(&settings.token_file);
    let github_tokens = TokenStore::new(&settings.github_token_file);

    if let Some(token) = api_tokens
        .load()
        .with_context(|| format!("не удалось прочитать {}", api_tokens.path().display()))?
    {
        client.set_token(token);
    }
    if let Some(token) = github_tokens
        .load()
        .with_context(|| format!("не удалось прочитать {}", github_tokens.path().display()))?
    {
        client.set_github_token(token);
    }

    let app = App {
        notifier: Arc::new(TerminalNotifier::new(api_tokens.clone())),
        settings,
        client,
        api_tokens,
        github_tokens,
    };

    match cli.command {
        Command::Posts { command } => run_posts(&app, command).await,
        Command::Categories => {
            let categories = app
                .client
                .http()
                .list_categories()
                .await
                .map_err(|err| app.client_error(err))?;
            println!("Категорий: {}", categories.len());
            for category in categories {
                println!("- [{}] {}", display_id(category.id), category.name);
            }
            Ok(())
        }
        Command::Tags => {
            let tags = app
                .client
                .http()
                .list_tags()
                .await
                .map_err(|err| app.client_error(err))?;
            println!("Тегов: {}", tags.len());
            for tag in tags {
                match tag.color {
                    Some(color) => println!("- [{}] {} ({color})", display_id(tag.id), tag.name),
                    None => println!("- [{}] {}", display_id(tag.id), tag.name),
                }
            }
            Ok(())
        }
        Command::Files { github, command } => run_files(&app, github, command).await,
        Command::Auth { command } => run_auth(&app, command),
        Command::Svg { command } => run_svg(command).await,
    }
}

async fn run_posts(app: &App, command: PostsCommand) -> Result<()> {
    let mut list = app.client.blog_list(app.notifier.clone());

    match command {
        PostsCommand::List {
            page,
            size,
            title,
            category_id,
            tag_id,
        } => {
            let query = BlogQuery {
                page_no: page,
                page_size: size,
                title,
                category_id,
                tag_id,
            };
            let result = list.load_page(query).await;
            ensure_done(result.success, "не удалось загрузить посты")?;
            print_list(list.rows(), list.query(), list.total());
        }
        PostsCommand::Get { id } => {
            let blog = app
                .client
                .http()
                .get_blog(id)
                .await
                .map_err(|err| app.client_error(err))?;
            print_blog("Пост", &blog);
        }
        PostsCommand::Delete { id } => {
            ensure_done(list.delete(id).await, "пост не удалён")?;
        }
        PostsCommand::Top { id, state } => {
            ensure_done(
                list.switch_flag(BlogFlag::Top, id, state.into()).await,
                "статус не изменён",
            )?;
        }
        PostsCommand::Recommend { id, state } => {
            ensure_done(
                list.switch_flag(BlogFlag::Recommend, id, state.into()).await,
                "статус не изменён",
            )?;
        }
        PostsCommand::Visibility(args) => {
            let query = BlogQuery {
                page_no: args.page,
                ..BlogQuery::default()
            };
            ensure_done(
                list.load_page(query).await.success,
                "не удалось загрузить посты",
            )?;
            let row = list
                .rows()
                .iter()
                .find(|row| row.id == args.id)
                .cloned()
                .ok_or_else(|| {
                    anyhow!(
                        "пост {} не найден на странице {}; укажите --page",
                        args.id,
                        args.page
                    )
                })?;

            let mut settings = list.open_visibility(&row);
            if let Some(visibility) = args.visibility {
                settings.visibility = visibility;
            }
            if let Some(password) = args.password {
                settings.password = password;
            }
            args.flags.apply(&mut settings.flags);

            let saved = list.submit_visibility(settings).await;
            if !saved {
                list.close_visibility();
            }
            ensure_done(saved, "видимость не изменена")?;
        }
        PostsCommand::Preview { id, expand_all } => {
            let blog = app
                .client
                .http()
                .get_blog(id)
                .await
                .map_err(|err| app.client_error(err))?;
            print_preview(&blog, expand_all);
        }
        PostsCommand::Share { token } => {
            let blog = app
                .client
                .http()
                .get_shared_blog(&token)
                .await
                .map_err(|err| app.client_error(err))?;
            print_blog("Пост по ссылке", &blog);
        }
        PostsCommand::Write(args) => run_write(app, args).await?,
    }

    Ok(())
}

async fn run_write(app: &App, args: WriteArgs) -> Result<()> {
    let session = Arc::new(
        app.client
            .open_editor(app.notifier.clone(), args.id)
            .await
            .map_err(|err| app.client_error(err))?,
    );
    apply_write_args(&session, &args);

    let mut editor = Editor::new(Some(&session.form().content), EditorOptions::default());
    {
        let session = Arc::clone(&session);
        editor.on_change(move |state| session.set_content(state));
    }

    let mut loaded = None;
    if let Some(path) = &args.content_file {
        let raw = read_text(path).await?;
        editor
            .replace_document(document_from_file(path, &raw)?)
            .map_err(map_client_error)?;
        loaded = Some(raw);
    }

    if args.watch {
        watch(app, &session, &mut editor, args.content_file.as_deref(), loaded).await?;
    }

    let outcome = if args.publish {
        let form = session.form();
        let settings = VisibilitySettings {
            visibility: form.visibility.unwrap_or_default(),
            password: form.password,
            flags: form.flags,
        };
        let published = session.publish(settings, args.preview).await;
        if let Some(id) = published.preview_id {
            let blog = app
                .client
                .http()
                .get_blog(id)
                .await
                .map_err(|err| app.client_error(err))?;
            print_preview(&blog, false);
        }
        published.save
    } else {
        session.save(SaveMode::Manual).await
    };

    print_save(outcome, session.stats());
    ensure_done(outcome.saved_id().is_some(), "пост не сохранён")
}

fn apply_write_args(session: &BlogEditorSession<HttpClient>, args: &WriteArgs) {
    session.update_form(|form| {
        if let Some(title) = &args.title {
            form.title = title.clone();
        }
        if let Some(picture) = &args.picture {
            form.first_picture = picture.clone();
        }
        if let Some(description) = &args.description {
            form.description = description.clone();
        }
        if let Some(visibility) = args.visibility {
            form.visibility = Some(visibility);
        }
        if let Some(password) = &args.password {
            form.password = password.clone();
        }
        args.flags.apply(&mut form.flags);
    });
    if let Some(category) = &args.category {
        session.set_category(category);
    }
    if !args.tags.is_empty() {
        session.set_tags(&args.tags);
    }
}

async fn watch(
    app: &App,
    session: &Arc<BlogEditorSession<HttpClient>>,
    editor: &mut Editor,
    content_file: Option<&Path>,
    mut loaded: Option<String>,
) -> Result<()> {
    let period = app.settings.autosave_interval();
    println!(
        "Автосохранение каждые {} с, Ctrl-C для завершения",
        period.as_secs()
    );
    let autosave = Autosave::spawn(Arc::clone(session), period);

    let mut poll = tokio::time::interval(CONTENT_POLL_INTERVAL);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result.context("не удалось дождаться Ctrl-C")?;
                break;
            }
            _ = poll.tick() => {
                let Some(path) = content_file else { continue };
                match tokio::fs::read_to_string(path).await {
                    Ok(raw) if loaded.as_deref() != Some(raw.as_str()) => {
                        match document_from_file(path, &raw) {
                            Ok(document) => {
                                editor.replace_document(document).map_err(map_client_error)?;
                                tracing::debug!(path = %path.display(), "content file reloaded");
                                loaded = Some(raw);
                            }
                            Err(err) => tracing::warn!(error = %err, "failed to convert content file"),
                        }
                    }
                    Ok(_) => {}
                    Err(err) => tracing::warn!(path = %path.display(), error = %err, "failed to read content file"),
                }
            }
        }
    }

    autosave.stop().await;
    Ok(())
}

async fn run_files(app: &App, github: bool, command: FilesCommand) -> Result<()> {
    let mut browser = app
        .client
        .file_browser(app.notifier.clone(), Arc::new(Osc52Clipboard::stdout()));

    match &command {
        FilesCommand::Token { token } => {
            let token = token.clone().unwrap_or_default();
            let stored = match browser.set_github_token(&token).await {
                TokenChange::Saved => app.github_tokens.persist(Some(&token)),
                TokenChange::Cleared => app.github_tokens.clear(),
            };
            stored.with_context(|| {
                format!("не удалось записать {}", app.github_tokens.path().display())
            })?;
            return Ok(());
        }
        FilesCommand::Check => {
            let status = app.client.github().test_connection().await;
            println!("{}", status.message);
            return ensure_done(status.ok, "GitHub API недоступен");
        }
        _ => {}
    }

    let storage = if github {
        StorageKind::GitHub
    } else {
        StorageKind::Local
    };

    let done = match command {
        FilesCommand::Ls { path } => {
            browser.open_location(storage, &path).await;
            print_folder(&browser);
            true
        }
        FilesCommand::Mkdir { path, name } => {
            browser.open_location(storage, &path).await;
            browser.create_folder(&name).await
        }
        FilesCommand::Rename {
            path,
            name,
            new_name,
        } => {
            browser.open_location(storage, &path).await;
            let item = find_item(&browser, &name)?;
            browser.rename(&item, &new_name).await
        }
        FilesCommand::Upload { path, file, name } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("не удалось прочитать {}", file.display()))?;
            let name = match name {
                Some(name) => name,
                None => file_name(&file)?,
            };
            browser.open_location(storage, &path).await;
            browser.upload(&name, bytes).await
        }
        FilesCommand::CopyUrl { path, name } => {
            browser.open_location(storage, &path).await;
            let item = find_item(&browser, &name)?;
            let copied = browser.copy_url(&item);
            if copied {
                println!("{}", item.url);
            }
            copied
        }
        FilesCommand::Token { .. } | FilesCommand::Check => true,
    };

    if browser.token_prompt_open() {
        eprintln!("нужен токен GitHub: выполните `blog-admin files token <TOKEN>`");
    }
    ensure_done(done, "операция не выполнена")
}

fn run_auth(app: &App, command: AuthCommand) -> Result<()> {
    match command {
        AuthCommand::Token { token } => {
            app.client.set_token(token);
            let token = app
                .client
                .token()
                .ok_or_else(|| anyhow!("токен не может быть пустым"))?;
            app.api_tokens
                .persist(Some(&token))
                .context("не удалось сохранить токен")?;
            println!("Токен сохранён в {}", app.api_tokens.path().display());
        }
        AuthCommand::Clear => {
            app.client.clear_token();
            app.api_tokens
                .clear()
                .context("не удалось удалить токен")?;
            println!("Токен удалён");
        }
    }
    Ok(())
}

async fn run_svg(command: SvgCommand) -> Result<()> {
    match command {
        SvgCommand::Preview { file, mime } => {
            let preview = read_svg(&file, mime.as_deref()).await?;
            println!("Файл: {}", preview.file_name);
            println!("Размер: {} байт", preview.source.len());
            println!("{}", preview.data_url);
        }
        SvgCommand::Convert { file, format } => {
            let preview = read_svg(&file, None).await?;
            convert_svg(&preview, &format).map_err(map_client_error)?;
        }
    }
    Ok(())
}

async fn read_svg(file: &Path, mime: Option<&str>) -> Result<blog_admin_client::SvgPreview> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("не удалось прочитать {}", file.display()))?;
    let name = file_name(file)?;
    let mime = mime.or_else(|| mime_from_file_name(&name));
    load_svg(&name, mime, &bytes).map_err(map_client_error)
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("не удалось прочитать {}", path.display()))
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("{}: не указано имя файла", path.display()))
}

fn find_item<L, G>(browser: &FileBrowser<L, G>, name: &str) -> Result<LocalFileSpace>
where
    L: FileSpaceApi,
    G: GitHubApi,
{
    browser
        .items()
        .iter()
        .find(|item| item.name == name)
        .cloned()
        .ok_or_else(|| anyhow!("{name}: не найден в {}", browser.path()))
}

/// `.json` читается как состояние редактора, остальное как текст, где
/// строки `# ...` становятся заголовками.
fn document_from_file(path: &Path, raw: &str) -> Result<EditorDocument> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        return Ok(EditorDocument::load(Some(raw)));
    }
    document_from_text(raw)
}

fn document_from_text(raw: &str) -> Result<EditorDocument> {
    let mut scratch = Editor::new(None, EditorOptions::default());
    for line in raw.lines() {
        let appended = match parse_heading(line) {
            Some((level, text)) => scratch.append_heading(level, text),
            None => scratch.append_paragraph(line),
        };
        appended.map_err(map_client_error)?;
    }
    Ok(scratch.document().clone())
}

fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let text = line[level..].strip_prefix(' ')?.trim();
    (!text.is_empty()).then_some((level as u8, text))
}

fn ensure_done(done: bool, message: &str) -> Result<()> {
    if done {
        return Ok(());
    }
    Err(anyhow!("{message}"))
}

fn map_client_error(err: AdminClientError) -> anyhow::Error {
    let message = match err {
        AdminClientError::Unauthorized => {
            "требуется авторизация: выполните `blog-admin auth token <TOKEN>`".to_string()
        }
        AdminClientError::NotFound => "ресурс не найден".to_string(),
        AdminClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        AdminClientError::Business { code, message, .. } => format!("{message} (code={code})"),
        AdminClientError::GitHub { status, message } => format!("GitHub {status}: {message}"),
        AdminClientError::GitHubTokenRequired => {
            "нужен токен GitHub: выполните `blog-admin files token <TOKEN>`".to_string()
        }
        other => match other.transport_summary() {
            Some(summary) => summary,
            None => other.to_string(),
        },
    };
    anyhow!(message)
}

fn display_id(id: Option<i64>) -> String {
    id.map_or_else(|| "-".to_string(), |id| id.to_string())
}

fn print_list(rows: &[BlogListItem], query: &BlogQuery, total: u64) {
    println!(
        "Постов: {} (страница {}, по {}, всего {total})",
        rows.len(),
        query.page_no,
        query.page_size
    );

    for row in rows {
        let visibility = VisibilityType::derive(row.published, row.password.as_deref());
        let category = row
            .category
            .as_ref()
            .map_or("-", |category| category.name.as_str());
        let mut marks = Vec::new();
        if row.top {
            marks.push("top");
        }
        if row.recommend {
            marks.push("recommend");
        }
        println!(
            "- [{}] {} | {category} | {visibility} | views={} | {}{}",
            row.id,
            row.title,
            row.views,
            row.updated_at()
                .or_else(|| row.created_at())
                .map_or_else(|| "-".to_string(), |time| time.format("%Y-%m-%d %H:%M").to_string()),
            if marks.is_empty() {
                String::new()
            } else {
                format!(" | {}", marks.join(","))
            }
        );
    }
}

fn print_blog(title: &str, blog: &BlogItem) {
    let settings = VisibilitySettings::from_item(blog);
    println!("{title}");
    println!("id: {}", display_id(blog.id));
    println!("title: {}", blog.title);
    println!("visibility: {}", settings.visibility);
    println!(
        "category: {}",
        blog.category.as_ref().map_or("-", |category| category.name.as_str())
    );
    let tags: Vec<&str> = blog.tags.iter().map(|tag| tag.name.as_str()).collect();
    println!("tags: {}", tags.join(", "));
    println!("first_picture: {}", blog.first_picture);
    println!("description: {}", blog.description);
    println!(
        "flags: appreciation={} recommend={} comments={} top={}",
        settings.flags.appreciation,
        settings.flags.recommend,
        settings.flags.comment_enabled,
        settings.flags.top
    );
    println!("views: {}", blog.views.unwrap_or_default());
    println!(
        "words: {} (read_time={} min)",
        blog.words,
        blog.read_time.unwrap_or_else(|| read_time_minutes(blog.words))
    );
}

fn print_preview(blog: &BlogItem, expand_all: bool) {
    let editor = Editor::new(
        Some(&blog.content),
        EditorOptions {
            read_only: true,
            show_table_of_contents: true,
        },
    );
    let document = editor.document();
    let words = document.word_count();

    println!("# {}", blog.title);
    println!("слов: {words}, чтение: {} мин", read_time_minutes(words));
    if let Some(mut toc) = editor.table_of_contents() {
        if expand_all {
            toc.toggle_all();
        }
        print_toc(&toc);
    }
    println!();
    println!("{}", document.plain_text());
}

fn print_toc(toc: &TocView) {
    let items = toc.visible_items();
    if items.is_empty() {
        return;
    }
    println!("Оглавление:");
    for item in items {
        let marker = match (item.has_children, item.expanded) {
            (false, _) => " ",
            (true, true) => "-",
            (true, false) => "+",
        };
        println!("{}{marker} {}", "  ".repeat(item.depth + 1), item.label);
    }
}

fn print_save(outcome: SaveOutcome, stats: ContentStats) {
    match outcome {
        SaveOutcome::Created(id) => println!("Пост создан: id={id}"),
        SaveOutcome::Updated(id) => println!("Пост обновлён: id={id}"),
        SaveOutcome::Skipped => println!("Сохранение уже выполняется"),
        SaveOutcome::Invalid | SaveOutcome::Failed => {}
    }
    println!(
        "слов: {}, чтение: {} мин",
        stats.words, stats.read_time
    );
}

fn print_folder<L, G>(browser: &FileBrowser<L, G>)
where
    L: FileSpaceApi,
    G: GitHubApi,
{
    let breadcrumbs = browser.breadcrumbs();
    let crumbs: Vec<&str> = breadcrumbs
        .iter()
        .map(|crumb| crumb.label.as_str())
        .collect();
    println!("{}", crumbs.join(" / "));
    for item in browser.items() {
        if item.folder {
            println!("  [dir] {}", item.name);
        } else {
            println!("        {}  {}", item.name, item.url);
        }
    }
}
