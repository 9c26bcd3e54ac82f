use blog_admin_client::{
    AdminClientError, ClientConfig, GitHubApi, GitHubClient, GitHubContentKind,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GitHubClient {
    let config = ClientConfig {
        github_api_url: server.uri(),
        ..ClientConfig::default()
    };
    let client = GitHubClient::new(&config).expect("client must build");
    client.set_token("ghp_test");
    client
}

fn file_json(path: &str, sha: &str, content: Option<&str>) -> serde_json::Value {
    let name = path.rsplit('/').next().unwrap_or(path);
    json!({
        "name": name,
        "path": path,
        "sha": sha,
        "size": 3,
        "type": "file",
        "download_url": format!("https://raw.example/{path}"),
        "content": content
    })
}

#[tokio::test]
async fn contents_request_sends_github_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/alice/blog/contents/docs"))
        .and(header("authorization", "token ghp_test"))
        .and(header("accept", "application/vnd.github.v3+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "img", "path": "docs/img", "sha": "1", "size": 0, "type": "dir", "download_url": null},
            file_json("docs/a.md", "2", None)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let contents = client
        .get_contents("alice", "blog", "/docs")
        .await
        .expect("contents must load");

    assert_eq!(contents.len(), 2);
    assert_eq!(contents[0].kind, GitHubContentKind::Dir);
    assert_eq!(contents[1].download_url.as_deref(), Some("https://raw.example/docs/a.md"));
}

#[tokio::test]
async fn single_file_response_becomes_one_element_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/alice/blog/contents/a.md"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json("a.md", "9", Some("YQ=="))))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let contents = client.get_contents("alice", "blog", "a.md").await.expect("file");
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0].sha, "9");
}

#[tokio::test]
async fn create_folder_puts_gitkeep_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/repos/alice/blog/contents/docs/img/.gitkeep"))
        .and(body_partial_json(json!({"message": "Create folder docs/img", "content": ""})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .create_folder("alice", "blog", "docs/img")
        .await
        .expect("folder must be created");
}

#[tokio::test]
async fn upload_at_repository_root_uses_file_name_only() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/repos/alice/blog/contents/logo.svg"))
        .and(body_partial_json(json!({"message": "Upload logo.svg", "content": "PHN2Zy8+"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .upload_file("alice", "blog", "", "logo.svg", b"<svg/>".to_vec(), "Upload logo.svg")
        .await
        .expect("upload must succeed");
}

#[tokio::test]
async fn rename_copies_content_then_deletes_original() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/alice/blog/contents/docs/a.md"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(file_json("docs/a.md", "old-sha", Some("aGVs\nbG8=\n"))),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/repos/alice/blog/contents/docs/b.md"))
        .and(body_partial_json(json!({
            "message": "Rename docs/a.md to docs/b.md",
            "content": "aGVsbG8="
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/repos/alice/blog/contents/docs/a.md"))
        .and(body_partial_json(json!({"sha": "old-sha"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .rename_file("alice", "blog", "docs/a.md", "docs/b.md")
        .await
        .expect("rename must succeed");
}

#[tokio::test]
async fn rename_of_large_file_copies_downloaded_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/alice/blog/contents/big.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "big.bin",
            "path": "big.bin",
            "sha": "s1",
            "size": 9,
            "type": "file",
            "encoding": "none",
            "download_url": format!("{}/raw/big.bin", server.uri()),
            "content": ""
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw/big.bin"))
        .and(header("authorization", "token ghp_test"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello big".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/repos/alice/blog/contents/big2.bin"))
        .and(body_partial_json(json!({"content": "aGVsbG8gYmln"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/repos/alice/blog/contents/big.bin"))
        .and(body_partial_json(json!({"sha": "s1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .rename_file("alice", "blog", "big.bin", "big2.bin")
        .await
        .expect("rename must succeed");
}

#[tokio::test]
async fn rename_without_available_content_keeps_original() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/alice/blog/contents/big.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "big.bin",
            "path": "big.bin",
            "sha": "s1",
            "size": 2_000_000,
            "type": "file",
            "encoding": "none",
            "download_url": null,
            "content": ""
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .rename_file("alice", "blog", "big.bin", "big2.bin")
        .await
        .expect_err("rename must not lose data");
    assert!(matches!(err, AdminClientError::InvalidRequest(_)));
}

#[tokio::test]
async fn renaming_directory_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/alice/blog/contents/docs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([file_json("docs/a.md", "1", None)])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .rename_file("alice", "blog", "docs", "documents")
        .await
        .expect_err("directories cannot be renamed");
    assert!(matches!(err, AdminClientError::InvalidRequest(_)));
}

#[tokio::test]
async fn github_errors_carry_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.list_own_repos().await.expect_err("bad token");
    match err {
        AdminClientError::GitHub { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Bad credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(client.find_own_repo("blog").await.is_none());
}

#[tokio::test]
async fn user_repositories_are_listed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/bob/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "name": "tools",
            "full_name": "bob/tools",
            "description": null,
            "html_url": "https://github.com/bob/tools"
        }])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let repos = client.list_user_repos("bob").await.expect("repos");
    assert_eq!(repos[0].owner(), "bob");
}

#[tokio::test]
async fn connection_check_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zen"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Keep it logically awesome."))
        .mount(&server)
        .await;

    let status = client_for(&server).test_connection().await;
    assert!(status.ok);

    let down = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zen"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&down)
        .await;
    let status = client_for(&down).test_connection().await;
    assert!(!status.ok);
    assert!(status.message.contains("503"));
}

#[tokio::test]
async fn requests_without_token_fail_fast() {
    let server = MockServer::start().await;
    let client = GitHubClient::new(&ClientConfig {
        github_api_url: server.uri(),
        ..ClientConfig::default()
    })
    .expect("client must build");

    let err = client.list_own_repos().await.expect_err("token required");
    assert!(matches!(err, AdminClientError::GitHubTokenRequired));
}
