#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use bearer_gateway::{
	_preludet::*,
	api::{AuthApi, LoginRequest, NewUser, PageQuery, UserUpdate, UsersApi},
	error::{ApiError, TransportError},
	gateway::RequestOptions,
	http::MultipartPart,
	store::{CredentialStore, StorageKey},
};

#[tokio::test]
async fn verbs_attach_bearer_and_decode_envelopes() {
	let server = MockServer::start_async().await;
	let (gateway, store) = build_reqwest_test_gateway(&server.base_url());

	seed_tokens(&store, "T1", "R1").await;

	let created = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/users")
				.header("authorization", "Bearer T1")
				.json_body(json!({ "name": "Ada", "email": "ada@example.com" }));
			then.status(201).header("content-type", "application/json").body(
				"{\"success\":true,\"data\":{\"id\":7,\"name\":\"Ada\",\"email\":\"ada@example.com\"}}",
			);
		})
		.await;
	let updated = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path("/api/users/7")
				.header("authorization", "Bearer T1")
				.json_body(json!({ "name": "Ada Lovelace" }));
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"data\":{\"id\":7,\"name\":\"Ada Lovelace\",\"email\":\"ada@example.com\"}}",
			);
		})
		.await;
	let deleted = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/users/7").header("authorization", "Bearer T1");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"success\":true}");
		})
		.await;
	let users = UsersApi::new(gateway);
	let user = users
		.create(&NewUser { name: "Ada".into(), email: "ada@example.com".into() })
		.await
		.expect("Create should succeed against the mock backend.");

	assert_eq!(user.id, 7);

	let user = users
		.update(7, &UserUpdate { name: Some("Ada Lovelace".into()), email: None })
		.await
		.expect("Update should succeed against the mock backend.");

	assert_eq!(user.name, "Ada Lovelace");
	assert_eq!(
		users.delete(7).await.expect("Delete should succeed against the mock backend."),
		None,
	);

	created.assert_async().await;
	updated.assert_async().await;
	deleted.assert_async().await;
}

#[tokio::test]
async fn list_and_search_apply_pagination_query() {
	let server = MockServer::start_async().await;
	let (gateway, store) = build_reqwest_test_gateway(&server.base_url());

	seed_tokens(&store, "T1", "R1").await;

	let listed = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/users")
				.query_param("page", "2")
				.query_param("limit", "5");
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"data\":{\"data\":[{\"id\":6,\"name\":\"Ada\",\"email\":\"ada@example.com\"}],\"total\":11,\"page\":2,\"limit\":5}}",
			);
		})
		.await;
	let searched = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/users/search")
				.query_param("q", "ada")
				.query_param("page", "1")
				.query_param("limit", "20");
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"data\":{\"data\":[],\"total\":0,\"page\":1,\"limit\":20}}",
			);
		})
		.await;
	let users = UsersApi::new(gateway);
	let page = users
		.list(PageQuery { page: 2, limit: 5 })
		.await
		.expect("Listing should succeed against the mock backend.");

	assert_eq!(page.items.len(), 1);
	assert_eq!(page.total, 11);

	let empty = users
		.search("ada", PageQuery::default())
		.await
		.expect("Search should succeed against the mock backend.");

	assert!(empty.items.is_empty());

	listed.assert_async().await;
	searched.assert_async().await;
}

#[tokio::test]
async fn login_persists_session_and_logout_clears_it() {
	let server = MockServer::start_async().await;
	let (gateway, store) = build_reqwest_test_gateway(&server.base_url());
	let login = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/login")
				.json_body(json!({ "email": "ada@example.com", "password": "hunter2" }));
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"data\":{\"user\":{\"id\":1,\"name\":\"Ada\",\"email\":\"ada@example.com\"},\"token\":\"T1\",\"refreshToken\":\"R1\"}}",
			);
		})
		.await;
	let logout = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/logout").header("authorization", "Bearer T1");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"success\":true}");
		})
		.await;
	let auth = AuthApi::new(gateway);
	let session = auth
		.login(&LoginRequest { email: "ada@example.com".into(), password: "hunter2".into() })
		.await
		.expect("Login should succeed against the mock backend.");

	assert_eq!(session.user.name, "Ada");
	assert_eq!(
		store.get(StorageKey::AccessToken).await.expect("Store read should succeed."),
		Some("T1".into()),
	);
	assert_eq!(
		store.get(StorageKey::RefreshToken).await.expect("Store read should succeed."),
		Some("R1".into()),
	);

	auth.logout().await.expect("Logout should succeed against the mock backend.");

	assert_eq!(store.get(StorageKey::AccessToken).await.expect("Store read should succeed."), None);
	assert_eq!(
		store.get(StorageKey::RefreshToken).await.expect("Store read should succeed."),
		None,
	);

	login.assert_async().await;
	logout.assert_async().await;
}

#[tokio::test]
async fn server_errors_surface_once_without_touching_the_refresh_path() {
	let server = MockServer::start_async().await;
	let (gateway, store) = build_reqwest_test_gateway(&server.base_url());

	seed_tokens(&store, "T1", "R1").await;

	let failing = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/users");
			then.status(500)
				.header("content-type", "application/json")
				.body("{\"success\":false,\"message\":\"Database unavailable.\"}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token\":\"T2\"}");
		})
		.await;
	let err = gateway
		.get::<Value>("/api/users", RequestOptions::new())
		.await
		.expect_err("A 500 should surface to the caller.");

	match err {
		Error::Api(ApiError::Status { status, message }) => {
			assert_eq!(status, 500);
			assert_eq!(message, "Database unavailable.");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	// Only 401 opens the recovery path.
	failing.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;

	assert!(!gateway.refresh_gate().is_refreshing());
	assert_eq!(gateway.refresh_metrics.attempts(), 0);
	// The stored credential is untouched by non-401 failures.
	assert_eq!(
		store.get(StorageKey::AccessToken).await.expect("Store read should succeed."),
		Some("T1".into()),
	);
}

#[tokio::test]
async fn timeouts_map_to_transport_errors_without_retry() {
	let server = MockServer::start_async().await;
	let (gateway, _store) = build_reqwest_test_gateway(&server.base_url());
	let slow = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/slow");
			then.status(200)
				.delay(Duration::from_millis(500))
				.header("content-type", "application/json")
				.body("{\"success\":true}");
		})
		.await;
	let err = gateway
		.get::<Value>(
			"/api/slow",
			RequestOptions::new().with_timeout(Duration::from_millis(50)),
		)
		.await
		.expect_err("The per-call timeout should fire before the mock responds.");

	assert!(matches!(err, Error::Transport(TransportError::Timeout)));

	slow.assert_calls_async(1).await;
}

#[tokio::test]
async fn upload_sends_multipart_and_download_returns_raw_bytes() {
	let server = MockServer::start_async().await;
	let (gateway, store) = build_reqwest_test_gateway(&server.base_url());

	seed_tokens(&store, "T1", "R1").await;

	let uploaded = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/files")
				.header("authorization", "Bearer T1")
				.body_includes("report contents");
			then.status(201)
				.header("content-type", "application/json")
				.body("{\"success\":true,\"data\":{\"id\":3}}");
		})
		.await;
	let downloaded = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/files/3").header("authorization", "Bearer T1");
			then.status(200)
				.header("content-type", "application/octet-stream")
				.body("report contents");
		})
		.await;
	let part = MultipartPart::new("file", "report contents".as_bytes())
		.with_file_name("report.txt")
		.with_mime("text/plain");
	let response = gateway
		.upload::<Value>("/api/files", vec![part], RequestOptions::new())
		.await
		.expect("Upload should succeed against the mock backend.");

	assert_eq!(response.body["data"]["id"], 3);

	let bytes = gateway
		.download("/api/files/3", RequestOptions::new())
		.await
		.expect("Download should succeed against the mock backend.");

	assert_eq!(bytes.body, b"report contents");

	uploaded.assert_async().await;
	downloaded.assert_async().await;
}

#[tokio::test]
async fn per_call_headers_reach_the_server() {
	let server = MockServer::start_async().await;
	let (gateway, _store) = build_reqwest_test_gateway(&server.base_url());
	let traced = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/health").header("x-request-id", "trace-42");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"success\":true,\"data\":{\"ok\":true}}");
		})
		.await;
	let response = gateway
		.get::<Value>("/api/health", RequestOptions::new().header("x-request-id", "trace-42"))
		.await
		.expect("Request with extra headers should succeed.");

	assert_eq!(response.body["data"]["ok"], true);

	traced.assert_async().await;
}
