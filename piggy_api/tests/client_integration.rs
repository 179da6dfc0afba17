use std::time::Duration;

use piggy_api::types::{AuthToken, Credentials, Repo, TransactionQuery};
use piggy_api::{ApiConfig, Client, Problem};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn sample_query() -> TransactionQuery {
    TransactionQuery::new(
        "tenant",
        "2024-01-15T00:00:00.000Z",
        "2024-03-31T23:59:59.999Z",
    )
}

#[tokio::test]
async fn get_repo_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/Hello-World"))
        .and(header("Accept", "application/vnd.github.v3+json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("repo.json")))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let repo = client.get_repo("octocat/Hello-World").await.unwrap();

    assert_eq!(
        repo,
        Repo {
            id: 1296269,
            name: "Hello-World".to_string(),
            owner: "octocat".to_string(),
        }
    );
}

#[tokio::test]
async fn get_repo_missing_owner_is_bad_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/Hello-World"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("repo_missing_owner.json")),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client.get_repo("octocat/Hello-World").await;
    assert_eq!(result, Err(Problem::BadData));
}

#[tokio::test]
async fn get_repo_malformed_json_is_bad_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/Hello-World"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client.get_repo("octocat/Hello-World").await;
    assert_eq!(result, Err(Problem::BadData));
}

#[tokio::test]
async fn get_repo_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"Not Found"}"#))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client.get_repo("octocat/missing").await;
    assert_eq!(result, Err(Problem::NotFound));
}

#[tokio::test]
async fn get_repo_dot_segments_are_refused_locally() {
    let mock_server = MockServer::start().await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    for repo in ["octocat/..", "./Hello-World", "octocat//x", ""] {
        let result = client.get_repo(repo).await;
        assert_eq!(result, Err(Problem::Rejected), "repo {:?}", repo);
    }

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn get_repo_escapes_query_and_fragment_characters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client.get_repo("octocat/a?b#c").await;
    assert_eq!(result, Err(Problem::NotFound));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/repos/octocat/a%3Fb%23c");
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn status_codes_map_to_problems() {
    let cases = [
        (400u16, Problem::Rejected),
        (401, Problem::Unauthorized),
        (403, Problem::Forbidden),
        (422, Problem::Rejected),
        (500, Problem::Server),
        (503, Problem::Server),
    ];

    for (status, expected) in cases {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/Hello-World"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&mock_server)
            .await;

        let client = Client::with_base_url(&mock_server.uri()).unwrap();
        let result = client.get_repo("octocat/Hello-World").await;
        assert_eq!(result, Err(expected), "status {}", status);
    }
}

#[tokio::test]
async fn slow_server_is_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/Hello-World"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(load_fixture("repo.json"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let config = ApiConfig::default()
        .with_url(mock_server.uri())
        .with_timeout(Duration::from_millis(50));
    let client = Client::new(config).unwrap();
    let result = client.get_repo("octocat/Hello-World").await;
    assert_eq!(result, Err(Problem::Timeout));
}

#[tokio::test]
async fn unreachable_server_is_cannot_connect() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Client::with_base_url(&format!("http://{}", addr)).unwrap();
    let result = client.get_repo("octocat/Hello-World").await;
    assert_eq!(result, Err(Problem::CannotConnect));
}

#[tokio::test]
async fn authenticate_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Account/Authenticate"))
        .and(body_json(serde_json::json!({
            "tenancyName": "t",
            "usernameOrEmailAddress": "u",
            "password": "p"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("authenticate.json")))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let token = client
        .authenticate(&Credentials::new("t", "u", "p"))
        .await
        .unwrap();
    assert_eq!(token.as_str(), "abc123");
}

#[tokio::test]
async fn authenticate_missing_result_is_bad_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Account/Authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true
        })))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client.authenticate(&Credentials::new("t", "u", "p")).await;
    assert_eq!(result, Err(Problem::BadData));
}

#[tokio::test]
async fn authenticate_wrong_password_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Account/Authenticate"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "success": false,
            "error": { "message": "Login failed!" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client.authenticate(&Credentials::new("t", "u", "wrong")).await;
    assert_eq!(result, Err(Problem::Server));
}

#[tokio::test]
async fn get_transactions_sends_bearer_token_and_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/app/transaction/GetTransactionsAsync"))
        .and(header("Authorization", "Bearer stored-token"))
        .and(body_json(serde_json::json!({
            "type": "tenant",
            "accountId": "acc-1",
            "startDate": "2024-01-15T00:00:00.000Z",
            "endDate": "2024-03-31T23:59:59.999Z"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("transactions.json")),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let token = AuthToken::new("stored-token");
    let items = client
        .get_transactions(&sample_query().with_account_id("acc-1"), Some(&token))
        .await
        .unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].id().as_deref(), Some("9f1c0d3e-0001"));
    assert_eq!(items[0].amount_in_default_currency(), Some(-42.5));
    assert_eq!(items[2].account_name(), Some("Savings"));
}

#[tokio::test]
async fn get_transactions_without_token_omits_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/app/transaction/GetTransactionsAsync"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("transactions_empty.json")),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let items = client.get_transactions(&sample_query(), None).await.unwrap();
    assert!(items.is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("accountId").is_none());
}

#[tokio::test]
async fn concurrent_calls_keep_their_own_tokens() {
    let mock_server = MockServer::start().await;

    for user in ["alice", "bob"] {
        Mock::given(method("POST"))
            .and(path("/services/app/transaction/GetTransactionsAsync"))
            .and(header("Authorization", format!("Bearer {}", user).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": { "items": [{ "id": user }] }
            })))
            .mount(&mock_server)
            .await;
    }

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let alice = AuthToken::new("alice");
    let bob = AuthToken::new("bob");
    let query = sample_query();

    let (a, b) = tokio::join!(
        client.get_transactions(&query, Some(&alice)),
        client.get_transactions(&query, Some(&bob)),
    );

    assert_eq!(a.unwrap()[0].id().as_deref(), Some("alice"));
    assert_eq!(b.unwrap()[0].id().as_deref(), Some("bob"));
}

#[tokio::test]
async fn get_transactions_missing_items_is_bad_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/app/transaction/GetTransactionsAsync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": { "totalCount": 0 }
        })))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client.get_transactions(&sample_query(), None).await;
    assert_eq!(result, Err(Problem::BadData));
}

#[tokio::test]
async fn get_transactions_non_object_item_is_bad_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/app/transaction/GetTransactionsAsync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": { "items": [42] }
        })))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client.get_transactions(&sample_query(), None).await;
    assert_eq!(result, Err(Problem::BadData));
}

#[tokio::test]
async fn get_transactions_expired_token_is_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/app/transaction/GetTransactionsAsync"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let token = AuthToken::new("expired");
    let result = client.get_transactions(&sample_query(), Some(&token)).await;
    assert_eq!(result, Err(Problem::Unauthorized));
}
