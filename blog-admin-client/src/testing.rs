//! Подставные реализации API для тестов контроллеров.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::api::{BlogApi, FileSpaceApi, GitHubApi, GitHubContent, GitHubContentKind, GitHubRepo};
use crate::error::{AdminClientError, AdminClientResult};
use crate::models::{
    BlogItem, BlogListItem, BlogPageParams, BlogSaveReq, CategoryListItem, LocalFileSpace, Page,
    TagListItem, UploadVO, VisibilityBlogReq,
};

pub(crate) fn business_error(message: &str) -> AdminClientError {
    AdminClientError::Business {
        code: 500,
        message: message.to_string(),
        show_type: crate::error::ErrorShowType::ErrorMessage,
    }
}

pub(crate) fn sample_row(id: i64, title: &str) -> BlogListItem {
    BlogListItem {
        id,
        category: Some(CategoryListItem {
            id: Some(1),
            name: "rust".to_string(),
        }),
        tags: vec![TagListItem {
            id: Some(10),
            name: "async".to_string(),
            color: None,
        }],
        user_id: Some(1),
        title: title.to_string(),
        first_picture: Some("https://img.example/cover.png".to_string()),
        content: String::new(),
        description: String::new(),
        published: true,
        recommend: false,
        appreciation: false,
        comment_enabled: true,
        top: false,
        create_time: None,
        update_time: None,
        views: 0,
        words: 0,
        read_time: 0,
        password: None,
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeBlogApi {
    pub(crate) page_result: Arc<Mutex<Option<Page<BlogListItem>>>>,
    pub(crate) page_calls: Arc<Mutex<Vec<BlogPageParams>>>,
    pub(crate) categories: Arc<Mutex<Vec<CategoryListItem>>>,
    pub(crate) tags: Arc<Mutex<Vec<TagListItem>>>,
    pub(crate) fail_lookups: Arc<Mutex<bool>>,
    pub(crate) fail_mutations: Arc<Mutex<bool>>,
    pub(crate) flag_calls: Arc<Mutex<Vec<(&'static str, i64, bool)>>>,
    pub(crate) visibility_calls: Arc<Mutex<Vec<VisibilityBlogReq>>>,
    pub(crate) delete_calls: Arc<Mutex<Vec<i64>>>,
    pub(crate) blog: Arc<Mutex<Option<BlogItem>>>,
    pub(crate) saved: Arc<Mutex<Vec<BlogSaveReq>>>,
    pub(crate) updated: Arc<Mutex<Vec<BlogSaveReq>>>,
    pub(crate) next_id: Arc<Mutex<i64>>,
    pub(crate) save_gate: Arc<Mutex<Option<Arc<Notify>>>>,
}

impl FakeBlogApi {
    pub(crate) fn new() -> Self {
        let api = Self::default();
        *api.next_id.lock().expect("next_id mutex poisoned") = 100;
        *api.categories.lock().expect("categories mutex poisoned") = vec![CategoryListItem {
            id: Some(1),
            name: "rust".to_string(),
        }];
        *api.tags.lock().expect("tags mutex poisoned") = vec![
            TagListItem {
                id: Some(10),
                name: "async".to_string(),
                color: Some("blue".to_string()),
            },
            TagListItem {
                id: Some(11),
                name: "web".to_string(),
                color: None,
            },
        ];
        api
    }

    fn mutation_result(&self) -> AdminClientResult<()> {
        if *self.fail_mutations.lock().expect("fail_mutations mutex poisoned") {
            Err(business_error("mutation rejected"))
        } else {
            Ok(())
        }
    }

    async fn wait_gate(&self) {
        let gate = self
            .save_gate
            .lock()
            .expect("save_gate mutex poisoned")
            .clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl BlogApi for FakeBlogApi {
    async fn page_blogs(&self, params: BlogPageParams) -> AdminClientResult<Page<BlogListItem>> {
        self.page_calls
            .lock()
            .expect("page_calls mutex poisoned")
            .push(params);
        self.page_result
            .lock()
            .expect("page_result mutex poisoned")
            .clone()
            .ok_or_else(|| business_error("page failed"))
    }

    async fn delete_blog(&self, id: i64) -> AdminClientResult<bool> {
        self.delete_calls
            .lock()
            .expect("delete_calls mutex poisoned")
            .push(id);
        self.mutation_result().map(|_| true)
    }

    async fn update_recommend(&self, id: i64, recommend: bool) -> AdminClientResult<bool> {
        self.flag_calls
            .lock()
            .expect("flag_calls mutex poisoned")
            .push(("recommend", id, recommend));
        self.mutation_result().map(|_| true)
    }

    async fn update_top(&self, id: i64, top: bool) -> AdminClientResult<bool> {
        self.flag_calls
            .lock()
            .expect("flag_calls mutex poisoned")
            .push(("top", id, top));
        self.mutation_result().map(|_| true)
    }

    async fn update_visibility(&self, req: VisibilityBlogReq) -> AdminClientResult<bool> {
        self.visibility_calls
            .lock()
            .expect("visibility_calls mutex poisoned")
            .push(req);
        self.mutation_result().map(|_| true)
    }

    async fn get_blog(&self, id: i64) -> AdminClientResult<BlogItem> {
        self.blog
            .lock()
            .expect("blog mutex poisoned")
            .clone()
            .filter(|blog| blog.id == Some(id))
            .ok_or(AdminClientError::NotFound)
    }

    async fn get_shared_blog(&self, _token: &str) -> AdminClientResult<BlogItem> {
        self.blog
            .lock()
            .expect("blog mutex poisoned")
            .clone()
            .ok_or(AdminClientError::NotFound)
    }

    async fn save_blog(&self, req: BlogSaveReq) -> AdminClientResult<i64> {
        self.wait_gate().await;
        self.mutation_result()?;
        self.saved.lock().expect("saved mutex poisoned").push(req);
        let mut next_id = self.next_id.lock().expect("next_id mutex poisoned");
        *next_id += 1;
        Ok(*next_id)
    }

    async fn update_blog(&self, req: BlogSaveReq) -> AdminClientResult<bool> {
        self.wait_gate().await;
        self.mutation_result()?;
        self.updated.lock().expect("updated mutex poisoned").push(req);
        Ok(true)
    }

    async fn list_categories(&self) -> AdminClientResult<Vec<CategoryListItem>> {
        if *self.fail_lookups.lock().expect("fail_lookups mutex poisoned") {
            return Err(business_error("categories failed"));
        }
        Ok(self
            .categories
            .lock()
            .expect("categories mutex poisoned")
            .clone())
    }

    async fn list_tags(&self) -> AdminClientResult<Vec<TagListItem>> {
        if *self.fail_lookups.lock().expect("fail_lookups mutex poisoned") {
            return Err(business_error("tags failed"));
        }
        Ok(self.tags.lock().expect("tags mutex poisoned").clone())
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeFileSpace {
    pub(crate) listing: Arc<Mutex<Option<Vec<LocalFileSpace>>>>,
    pub(crate) list_calls: Arc<Mutex<Vec<String>>>,
    pub(crate) fail_mutations: Arc<Mutex<bool>>,
    pub(crate) uploads: Arc<Mutex<Vec<(String, String, usize)>>>,
    pub(crate) renames: Arc<Mutex<Vec<(String, String)>>>,
    pub(crate) folders: Arc<Mutex<Vec<String>>>,
}

impl FakeFileSpace {
    fn mutation_result(&self) -> AdminClientResult<()> {
        if *self.fail_mutations.lock().expect("fail_mutations mutex poisoned") {
            Err(business_error("file operation rejected"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FileSpaceApi for FakeFileSpace {
    async fn list_space(&self, path: &str) -> AdminClientResult<Vec<LocalFileSpace>> {
        self.list_calls
            .lock()
            .expect("list_calls mutex poisoned")
            .push(path.to_string());
        self.listing
            .lock()
            .expect("listing mutex poisoned")
            .clone()
            .ok_or_else(|| business_error("listing failed"))
    }

    async fn upload(
        &self,
        file_path: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> AdminClientResult<UploadVO> {
        self.mutation_result()?;
        self.uploads.lock().expect("uploads mutex poisoned").push((
            file_path.to_string(),
            file_name.to_string(),
            bytes.len(),
        ));
        Ok(UploadVO {
            file_name: file_name.to_string(),
            url: format!("http://files.local{file_path}"),
        })
    }

    async fn rename(&self, path: &str, new_name: &str) -> AdminClientResult<bool> {
        self.mutation_result()?;
        self.renames
            .lock()
            .expect("renames mutex poisoned")
            .push((path.to_string(), new_name.to_string()));
        Ok(true)
    }

    async fn create_folder(&self, folder_path: &str) -> AdminClientResult<bool> {
        self.mutation_result()?;
        self.folders
            .lock()
            .expect("folders mutex poisoned")
            .push(folder_path.to_string());
        Ok(true)
    }
}

pub(crate) fn repo(owner: &str, name: &str) -> GitHubRepo {
    GitHubRepo {
        id: 1,
        name: name.to_string(),
        full_name: format!("{owner}/{name}"),
        description: None,
        html_url: format!("https://github.com/{owner}/{name}"),
    }
}

pub(crate) fn content(name: &str, dir: bool) -> GitHubContent {
    GitHubContent {
        name: name.to_string(),
        path: name.to_string(),
        sha: format!("sha-{name}"),
        size: 0,
        download_url: (!dir).then(|| format!("https://raw.example/{name}")),
        kind: if dir {
            GitHubContentKind::Dir
        } else {
            GitHubContentKind::File
        },
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeGitHub {
    pub(crate) token: Arc<Mutex<bool>>,
    pub(crate) own_repos: Arc<Mutex<Option<Vec<GitHubRepo>>>>,
    pub(crate) own_repo_calls: Arc<Mutex<usize>>,
    pub(crate) user_repos: Arc<Mutex<Option<Vec<GitHubRepo>>>>,
    pub(crate) contents: Arc<Mutex<Option<Vec<GitHubContent>>>>,
    pub(crate) contents_calls: Arc<Mutex<Vec<(String, String, String)>>>,
    pub(crate) user_repo_calls: Arc<Mutex<Vec<String>>>,
    pub(crate) fail_mutations: Arc<Mutex<bool>>,
    pub(crate) folders: Arc<Mutex<Vec<(String, String, String)>>>,
    pub(crate) renames: Arc<Mutex<Vec<(String, String, String, String)>>>,
    pub(crate) uploads: Arc<Mutex<Vec<(String, String, String, String)>>>,
}

impl FakeGitHub {
    pub(crate) fn with_token() -> Self {
        let github = Self::default();
        *github.token.lock().expect("token mutex poisoned") = true;
        *github.own_repos.lock().expect("own_repos mutex poisoned") = Some(Vec::new());
        github
    }

    fn mutation_result(&self) -> AdminClientResult<()> {
        if *self.fail_mutations.lock().expect("fail_mutations mutex poisoned") {
            Err(AdminClientError::GitHub {
                status: 409,
                message: "conflict".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

fn github_not_found() -> AdminClientError {
    AdminClientError::GitHub {
        status: 404,
        message: "Not Found".to_string(),
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    fn has_token(&self) -> bool {
        *self.token.lock().expect("token mutex poisoned")
    }

    fn replace_token(&self, token: Option<String>) {
        *self.token.lock().expect("token mutex poisoned") = token.is_some();
    }

    async fn list_own_repos(&self) -> AdminClientResult<Vec<GitHubRepo>> {
        *self
            .own_repo_calls
            .lock()
            .expect("own_repo_calls mutex poisoned") += 1;
        self.own_repos
            .lock()
            .expect("own_repos mutex poisoned")
            .clone()
            .ok_or(AdminClientError::GitHub {
                status: 401,
                message: "Bad credentials".to_string(),
            })
    }

    async fn list_user_repos(&self, user: &str) -> AdminClientResult<Vec<GitHubRepo>> {
        self.user_repo_calls
            .lock()
            .expect("user_repo_calls mutex poisoned")
            .push(user.to_string());
        self.user_repos
            .lock()
            .expect("user_repos mutex poisoned")
            .clone()
            .ok_or_else(github_not_found)
    }

    async fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> AdminClientResult<Vec<GitHubContent>> {
        self.contents_calls
            .lock()
            .expect("contents_calls mutex poisoned")
            .push((owner.to_string(), repo.to_string(), path.to_string()));
        self.contents
            .lock()
            .expect("contents mutex poisoned")
            .clone()
            .ok_or_else(github_not_found)
    }

    async fn create_folder(&self, owner: &str, repo: &str, path: &str) -> AdminClientResult<()> {
        self.mutation_result()?;
        self.folders.lock().expect("folders mutex poisoned").push((
            owner.to_string(),
            repo.to_string(),
            path.to_string(),
        ));
        Ok(())
    }

    async fn rename_file(
        &self,
        owner: &str,
        repo: &str,
        old_path: &str,
        new_path: &str,
    ) -> AdminClientResult<()> {
        self.mutation_result()?;
        self.renames.lock().expect("renames mutex poisoned").push((
            owner.to_string(),
            repo.to_string(),
            old_path.to_string(),
            new_path.to_string(),
        ));
        Ok(())
    }

    async fn upload_file(
        &self,
        owner: &str,
        repo: &str,
        dir: &str,
        file_name: &str,
        _bytes: Vec<u8>,
        _message: &str,
    ) -> AdminClientResult<()> {
        self.mutation_result()?;
        self.uploads.lock().expect("uploads mutex poisoned").push((
            owner.to_string(),
            repo.to_string(),
            dir.to_string(),
            file_name.to_string(),
        ));
        Ok(())
    }
}
