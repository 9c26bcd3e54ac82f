use std::sync::Arc;

use blog_admin_client::{
    AdminClient, BlogQuery, ClientConfig, GitHubApi, RecordingNotifier, SaveMode, SaveOutcome,
};

fn live_client() -> AdminClient {
    let config = ClientConfig {
        api_base_url: std::env::var("BLOG_ADMIN_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080/api".to_string()),
        ..ClientConfig::default()
    };
    let client = AdminClient::new(&config).expect("client must build");
    if let Ok(token) = std::env::var("BLOG_ADMIN_TOKEN") {
        client.set_token(token);
    }
    client
}

#[tokio::test]
#[ignore = "requires running blog API and BLOG_ADMIN_TOKEN"]
async fn blog_list_and_editor_smoke_flow() {
    let client = live_client();
    let notifier = RecordingNotifier::new();

    let mut list = client.blog_list(Arc::new(notifier.clone()));
    assert!(list.fetch_initial_data().await, "{:?}", notifier.take());
    let page = list.load_page(BlogQuery::default()).await;
    assert!(page.success);

    let session = client
        .open_editor(Arc::new(notifier.clone()), None)
        .await
        .expect("editor must open");
    session.update_form(|form| {
        form.title = "smoke post".to_string();
        form.first_picture = "https://picsum.photos/200".to_string();
        form.content = r#"{"root":{"type":"root","children":[]}}"#.to_string();
    });
    session.set_category("smoke");
    session.set_tags(["smoke"]);

    let outcome = session.save(SaveMode::Manual).await;
    let Some(id) = outcome.saved_id() else {
        panic!("save failed: {outcome:?} {:?}", notifier.take());
    };
    assert!(matches!(outcome, SaveOutcome::Created(_)));
    assert!(list.delete(id).await);
}

#[tokio::test]
#[ignore = "requires network access and GITHUB_TOKEN"]
async fn github_smoke_flow() {
    let client = live_client();
    let token = std::env::var("GITHUB_TOKEN").expect("GITHUB_TOKEN must be set");
    client.set_github_token(token);

    let status = client.github().test_connection().await;
    assert!(status.ok, "{}", status.message);
    client
        .github()
        .list_own_repos()
        .await
        .expect("own repositories must load");
}
