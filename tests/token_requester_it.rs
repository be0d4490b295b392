// crates.io
use httpmock::prelude::*;
// self
use propwise_sdk::{
	config::USER_AGENT,
	http::{HttpTokenRequester, TokenRequestParams, TokenRequester},
};

fn password_params() -> TokenRequestParams {
	let mut params = TokenRequestParams::new();

	params.insert("client_id", "cid".into());
	params.insert("grant_type", "password".into());
	params.insert("password", "hunter2".into());
	params.insert("username", "user@example.org".into());

	params
}

#[tokio::test]
async fn exchange_posts_the_sorted_form_with_sdk_headers() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.header("accept", "application/json")
				.header("content-type", "application/x-www-form-urlencoded")
				.header("user-agent", USER_AGENT)
				.body("client_id=cid&grant_type=password&password=hunter2&username=user%40example.org");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"atk\",\"refresh_token\":\"rtk\",\"expires_in\":14400,\"token_type\":\"Bearer\"}");
		})
		.await;
	let requester = HttpTokenRequester::new(server.url("/oauth/token"))
		.expect("The default reqwest client should build.");
	let token = requester
		.request_token(password_params())
		.await
		.expect("A 200 token document should decode.");

	token_mock.assert_calls_async(1).await;

	assert_eq!(token.access_token(), "atk");
	assert_eq!(token.refresh_token(), Some("rtk"));
	assert_eq!(token.expires_in(), Some(14_400));
}

#[tokio::test]
async fn non_200_statuses_format_the_contract_message() {
	let server = MockServer::start_async().await;
	let _token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(400);
		})
		.await;
	let requester = HttpTokenRequester::new(server.url("/oauth/token"))
		.expect("The default reqwest client should build.");
	let error = requester
		.request_token(password_params())
		.await
		.expect_err("A 400 must fail the exchange.");

	assert_eq!(error.to_string(), "HTTP 400 — Bad Request. Could not get token.");
}

#[tokio::test]
async fn malformed_token_documents_fail_to_decode() {
	let server = MockServer::start_async().await;
	let _token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"expires_in\":900}");
		})
		.await;
	let requester = HttpTokenRequester::new(server.url("/oauth/token"))
		.expect("The default reqwest client should build.");
	let error = requester
		.request_token(password_params())
		.await
		.expect_err("A token document without an access token must fail.");

	assert!(
		error.to_string().starts_with("Malformed token endpoint response"),
		"Unexpected message: {error}",
	);
}
