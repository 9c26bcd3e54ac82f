use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, multipart};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::ClientConfig;
use crate::api::{BlogApi, FileSpaceApi};
use crate::error::{AdminClientError, AdminClientResult};
use crate::models::{
    BlogItem, BlogListItem, BlogPageParams, BlogSaveReq, CategoryListItem, LocalFileSpace, Page,
    TagListItem, UploadVO, VisibilityBlogReq,
};

const UNAUTHORIZED_CODE: i64 = 401;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeDto<T> {
    code: Option<i64>,
    data: Option<T>,
    msg: Option<String>,
    success: Option<bool>,
    error_message: Option<String>,
    show_type: Option<i64>,
    has_next: Option<bool>,
    page_no: Option<u32>,
    page_size: Option<u32>,
    total: Option<i64>,
}

impl<T> EnvelopeDto<T> {
    fn require_data(self) -> AdminClientResult<T> {
        self.data
            .ok_or_else(|| AdminClientError::InvalidRequest("response has no data".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct IdRequestDto {
    id: i64,
}

#[derive(Debug, Serialize)]
struct RecommendRequestDto {
    id: i64,
    recommend: bool,
}

#[derive(Debug, Serialize)]
struct TopRequestDto {
    id: i64,
    top: bool,
}

#[derive(Debug, Serialize)]
struct FileSpaceRequestDto<'a> {
    path: &'a str,
}

#[derive(Debug, Serialize)]
struct RenameQuery<'a> {
    path: &'a str,
    #[serde(rename = "newName")]
    new_name: &'a str,
}

#[derive(Debug, Serialize)]
struct NewFolderQuery<'a> {
    #[serde(rename = "folderPath")]
    folder_path: &'a str,
}

#[derive(Debug, Serialize)]
struct ShareQuery<'a> {
    token: &'a str,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для JSON API блога (`/blog`, `/category`, `/tag`, `/file`).
///
/// Токен хранится внутри клиента и добавляется в каждый запрос как
/// `Authorization: Bearer ...`. Ответ 401 (HTTP или `code` в конверте)
/// сбрасывает токен.
pub struct HttpClient {
    base_url: String,
    client: Client,
    token: Arc<RwLock<Option<String>>>,
}

impl HttpClient {
    /// Создаёт клиент по конфигурации.
    pub fn new(config: &ClientConfig) -> AdminClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            base_url: config.api_base_url.clone(),
            client,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Устанавливает токен доступа.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        let value = if token.trim().is_empty() {
            None
        } else {
            Some(token)
        };
        match self.token.write() {
            Ok(mut slot) => *slot = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }

    /// Текущий токен доступа.
    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Сбрасывает токен доступа.
    pub fn clear_token(&self) {
        match self.token.write() {
            Ok(mut slot) => *slot = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: reqwest::Response) -> AdminClientError {
        let status = response.status();

        let message = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<EnvelopeDto<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.error_message.or(envelope.msg))
                .unwrap_or_else(|| format!("http status {status}")),
            Err(_) => format!("http status {status}"),
        };
        AdminClientError::from_http_status(status, Some(message))
    }

    /// Проверяет конверт ответа: 401 сбрасывает токен, `success != true`
    /// превращается в бизнес-ошибку.
    fn accept<T>(&self, envelope: EnvelopeDto<T>) -> AdminClientResult<EnvelopeDto<T>> {
        if envelope.code == Some(UNAUTHORIZED_CODE) {
            self.clear_token();
            return Err(AdminClientError::Unauthorized);
        }

        if envelope.success != Some(true) {
            let err = AdminClientError::business(
                envelope.code,
                envelope.error_message.or(envelope.msg),
                envelope.show_type,
            );
            if err.is_unauthorized() {
                self.clear_token();
            }
            return Err(err);
        }

        Ok(envelope)
    }

    async fn execute<T>(&self, request: RequestBuilder) -> AdminClientResult<EnvelopeDto<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(AdminClientError::from_reqwest)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.clear_token();
            return Err(AdminClientError::Unauthorized);
        }
        if !status.is_success() {
            return Err(Self::decode_error(response).await);
        }

        let body = response
            .bytes()
            .await
            .map_err(AdminClientError::from_reqwest)?;
        let envelope = serde_json::from_slice::<EnvelopeDto<T>>(&body)?;
        self.accept(envelope)
    }

    /// универсальный helper для POST с json-payload
    async fn post_json<TReq, TRes>(
        &self,
        path: &str,
        body: &TReq,
    ) -> AdminClientResult<EnvelopeDto<TRes>>
    where
        TReq: Serialize + ?Sized,
        TRes: DeserializeOwned,
    {
        tracing::debug!(path, "POST json");
        let request = self
            .client
            .request(Method::POST, self.endpoint(path))
            .json(body);
        self.execute(request).await
    }

    async fn post_query<TQuery, TRes>(
        &self,
        path: &str,
        query: &TQuery,
    ) -> AdminClientResult<EnvelopeDto<TRes>>
    where
        TQuery: Serialize + ?Sized,
        TRes: DeserializeOwned,
    {
        tracing::debug!(path, "POST query");
        let request = self
            .client
            .request(Method::POST, self.endpoint(path))
            .query(query);
        self.execute(request).await
    }

    async fn post_empty<TRes>(&self, path: &str) -> AdminClientResult<EnvelopeDto<TRes>>
    where
        TRes: DeserializeOwned,
    {
        tracing::debug!(path, "POST");
        let request = self.client.request(Method::POST, self.endpoint(path));
        self.execute(request).await
    }
}

#[async_trait]
impl BlogApi for HttpClient {
    async fn page_blogs(&self, params: BlogPageParams) -> AdminClientResult<Page<BlogListItem>> {
        let envelope: EnvelopeDto<Vec<BlogListItem>> =
            self.post_json("/blog/page", &params).await?;

        let total = envelope.total.unwrap_or_default().max(0) as u64;
        Ok(Page {
            page_no: envelope.page_no.unwrap_or(params.page_no),
            page_size: envelope.page_size.unwrap_or(params.page_size),
            has_next: envelope.has_next.unwrap_or(false),
            total,
            items: envelope.data.unwrap_or_default(),
        })
    }

    async fn delete_blog(&self, id: i64) -> AdminClientResult<bool> {
        let envelope: EnvelopeDto<bool> = self.post_json("/blog/del", &IdRequestDto { id }).await?;
        Ok(envelope.data.unwrap_or(true))
    }

    async fn update_recommend(&self, id: i64, recommend: bool) -> AdminClientResult<bool> {
        let payload = RecommendRequestDto { id, recommend };
        let envelope: EnvelopeDto<bool> = self.post_json("/blog/recommend", &payload).await?;
        Ok(envelope.data.unwrap_or(true))
    }

    async fn update_top(&self, id: i64, top: bool) -> AdminClientResult<bool> {
        let payload = TopRequestDto { id, top };
        let envelope: EnvelopeDto<bool> = self.post_json("/blog/top", &payload).await?;
        Ok(envelope.data.unwrap_or(true))
    }

    async fn update_visibility(&self, req: VisibilityBlogReq) -> AdminClientResult<bool> {
        let envelope: EnvelopeDto<bool> = self.post_json("/blog/visible", &req).await?;
        Ok(envelope.data.unwrap_or(true))
    }

    async fn get_blog(&self, id: i64) -> AdminClientResult<BlogItem> {
        let envelope: EnvelopeDto<BlogItem> =
            self.post_json("/blog/detail", &IdRequestDto { id }).await?;
        envelope.require_data()
    }

    async fn get_shared_blog(&self, token: &str) -> AdminClientResult<BlogItem> {
        let envelope: EnvelopeDto<BlogItem> =
            self.post_query("/blog/share", &ShareQuery { token }).await?;
        envelope.require_data()
    }

    async fn save_blog(&self, req: BlogSaveReq) -> AdminClientResult<i64> {
        let envelope: EnvelopeDto<i64> = self.post_json("/blog/save", &req).await?;
        envelope.require_data()
    }

    async fn update_blog(&self, req: BlogSaveReq) -> AdminClientResult<bool> {
        let envelope: EnvelopeDto<bool> = self.post_json("/blog/update", &req).await?;
        Ok(envelope.data.unwrap_or(true))
    }

    async fn list_categories(&self) -> AdminClientResult<Vec<CategoryListItem>> {
        let envelope: EnvelopeDto<Vec<CategoryListItem>> =
            self.post_empty("/category/listAll").await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn list_tags(&self) -> AdminClientResult<Vec<TagListItem>> {
        let envelope: EnvelopeDto<Vec<TagListItem>> = self.post_empty("/tag/listAll").await?;
        Ok(envelope.data.unwrap_or_default())
    }
}

#[async_trait]
impl FileSpaceApi for HttpClient {
    async fn list_space(&self, path: &str) -> AdminClientResult<Vec<LocalFileSpace>> {
        let envelope: EnvelopeDto<Vec<LocalFileSpace>> = self
            .post_json("/file/space", &FileSpaceRequestDto { path })
            .await?;
        envelope.require_data()
    }

    async fn upload(
        &self,
        file_path: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> AdminClientResult<UploadVO> {
        tracing::debug!(file_path, size = bytes.len(), "POST multipart upload");
        let form = multipart::Form::new()
            .part(
                "file",
                multipart::Part::bytes(bytes).file_name(file_name.to_string()),
            )
            .text("filePath", file_path.to_string());
        let request = self
            .client
            .request(Method::POST, self.endpoint("/file/upload"))
            .multipart(form);

        let envelope: EnvelopeDto<UploadVO> = self.execute(request).await?;
        envelope.require_data()
    }

    async fn rename(&self, path: &str, new_name: &str) -> AdminClientResult<bool> {
        let envelope: EnvelopeDto<bool> = self
            .post_query("/file/rename", &RenameQuery { path, new_name })
            .await?;
        Ok(envelope.data.unwrap_or(true))
    }

    async fn create_folder(&self, folder_path: &str) -> AdminClientResult<bool> {
        let envelope: EnvelopeDto<bool> = self
            .post_query("/file/newFolder", &NewFolderQuery { folder_path })
            .await?;
        Ok(envelope.data.unwrap_or(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpClient {
        let config = ClientConfig {
            api_base_url: "http://localhost:8080/api/".to_string(),
            ..ClientConfig::default()
        };
        HttpClient::new(&config).expect("client must build")
    }

    fn envelope(raw: &str) -> EnvelopeDto<serde_json::Value> {
        serde_json::from_str(raw).expect("envelope must parse")
    }

    #[test]
    fn endpoint_normalizes_slashes() {
        let client = client();
        assert_eq!(
            client.endpoint("/blog/page"),
            "http://localhost:8080/api/blog/page"
        );
    }

    #[test]
    fn accept_passes_successful_envelope() {
        let client = client();
        let accepted = client
            .accept(envelope(r#"{"code":200,"success":true,"data":[1,2]}"#))
            .expect("must be accepted");
        assert_eq!(accepted.data, Some(serde_json::json!([1, 2])));
    }

    #[test]
    fn accept_clears_token_on_code_401() {
        let client = client();
        client.set_token("abc");

        let err = client
            .accept(envelope(r#"{"code":401,"success":false,"msg":"expired"}"#))
            .expect_err("must be rejected");
        assert!(matches!(err, AdminClientError::Unauthorized));
        assert!(client.token().is_none());
    }

    #[test]
    fn accept_turns_failure_into_business_error() {
        let client = client();
        client.set_token("abc");

        let err = client
            .accept(envelope(
                r#"{"code":500,"success":false,"msg":"boom","showType":1}"#,
            ))
            .expect_err("must be rejected");
        match err {
            AdminClientError::Business {
                code,
                message,
                show_type,
            } => {
                assert_eq!(code, 500);
                assert_eq!(message, "boom");
                assert_eq!(show_type, crate::error::ErrorShowType::WarnMessage);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(client.token().as_deref(), Some("abc"));
    }

    #[test]
    fn accept_prefers_error_message_over_msg() {
        let client = client();
        let err = client
            .accept(envelope(
                r#"{"success":false,"msg":"generic","errorMessage":"specific"}"#,
            ))
            .expect_err("must be rejected");
        assert!(matches!(
            err,
            AdminClientError::Business { ref message, .. } if message == "specific"
        ));
    }

    #[test]
    fn set_token_ignores_blank_values() {
        let client = client();
        client.set_token("   ");
        assert!(client.token().is_none());
    }
}
