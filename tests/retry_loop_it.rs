// std
use std::time::Duration;
// crates.io
use httpmock::prelude::*;
// self
use propwise_sdk::{
	client::RestClient,
	config::ClientOptions,
	rest::RequestPayload,
};

fn options(server: &MockServer) -> propwise_sdk::config::ClientOptionsBuilder {
	ClientOptions::builder()
		.api_url(server.base_url())
		.oauth_url(server.base_url())
		.request_back_off_interval(Duration::from_millis(1))
}

#[tokio::test]
async fn permanent_503_exhausts_the_retry_budget_after_three_attempts() {
	let server = MockServer::start_async().await;
	let api_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/me");
			then.status(503);
		})
		.await;
	let client = RestClient::new(
		options(&server).access_token("seeded-access").request_max_retries(2).build(),
	)
	.expect("A seeded access token should satisfy the credential check.");
	let error = client
		.get("/v1/me", RequestPayload::new())
		.await
		.expect_err("A permanent 503 must exhaust the retry budget.");

	assert_eq!(error.to_string(), "Maximum number of retries reached");
	// Initial attempt plus two retries.
	api_mock.assert_calls_async(3).await;
	assert_eq!(client.metrics().attempts(), 3);
	assert_eq!(client.metrics().retries(), 3);
	assert_eq!(client.metrics().failures(), 1);
}

#[tokio::test]
async fn a_401_forces_one_refresh_and_the_retry_succeeds() {
	let server = MockServer::start_async().await;
	// The stale and fresh tokens key the two API mocks apart, so the mock pair encodes
	// the 401-then-200 sequence without any call counting.
	let stale_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/me").header("authorization", "Bearer stale-access");
			then.status(401);
		})
		.await;
	let fresh_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/me").header("authorization", "Bearer fresh-access");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"u-1\",\"email\":\"resident@example.org\"}");
		})
		.await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/token")
				.body_includes("grant_type=refresh_token")
				.body_includes("refresh_token=seeded-refresh");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"fresh-access\",\"refresh_token\":\"rotated-refresh\",\"expires_in\":900}");
		})
		.await;
	let client = RestClient::new(
		options(&server)
			.client_id("cid")
			.access_token("stale-access")
			.refresh_token("seeded-refresh")
			.build(),
	)
	.expect("A client id should satisfy the credential check.");
	let body = client
		.get("/v1/me", RequestPayload::new())
		.await
		.expect("The retry after the token rotation should succeed.");

	assert_eq!(body["id"], "u-1");
	stale_mock.assert_calls_async(1).await;
	token_mock.assert_calls_async(1).await;
	fresh_mock.assert_calls_async(1).await;
	assert_eq!(client.metrics().refreshes(), 1);
}

#[tokio::test]
async fn refresh_failure_is_wrapped_with_context() {
	let server = MockServer::start_async().await;
	let api_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/me");
			then.status(401);
		})
		.await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(400);
		})
		.await;
	let client = RestClient::new(
		options(&server)
			.client_id("cid")
			.access_token("stale-access")
			.refresh_token("seeded-refresh")
			.build(),
	)
	.expect("A client id should satisfy the credential check.");
	let error = client
		.get("/v1/me", RequestPayload::new())
		.await
		.expect_err("A failing token endpoint must abort the request.");

	assert_eq!(
		error.to_string(),
		"Failed to refresh access token: HTTP 400 — Bad Request. Could not get token.",
	);
	api_mock.assert_calls_async(1).await;
	token_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn requests_without_any_eligible_grant_fail_without_dispatching() {
	let server = MockServer::start_async().await;
	let api_mock = server
		.mock_async(|when, then| {
			when.method(GET).path_includes("/api");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	// Only a client id: no grant in the chain is eligible and the store stays empty.
	let client = RestClient::new(options(&server).client_id("cid").build())
		.expect("A client id should satisfy the credential check.");
	let error = client
		.get("/v1/me", RequestPayload::new())
		.await
		.expect_err("Without a token the request must fail before dispatch.");

	assert_eq!(error.to_string(), "No access token to perform the request");
	api_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn terminal_statuses_carry_status_and_body_text() {
	let server = MockServer::start_async().await;
	let _api_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/me");
			then.status(404).body("{\"message\":\"no such resource\"}");
		})
		.await;
	let client = RestClient::new(options(&server).access_token("seeded-access").build())
		.expect("A seeded access token should satisfy the credential check.");
	let error = client
		.get("/v1/me", RequestPayload::new())
		.await
		.expect_err("A 404 is terminal and must not be retried.");

	assert_eq!(error.to_string(), "404 Not Found\n\n{\"message\":\"no such resource\"}");
}

#[tokio::test]
async fn raw_requests_resolve_to_status_and_body() {
	let server = MockServer::start_async().await;
	let _api_mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/v1/units/u-1");
			then.status(204);
		})
		.await;
	let client = RestClient::new(options(&server).access_token("seeded-access").build())
		.expect("A seeded access token should satisfy the credential check.");
	let response = client
		.request_raw(propwise_sdk::rest::HttpVerb::Delete, "/v1/units/u-1", RequestPayload::new())
		.await
		.expect("A 204 resolves to an empty body.");

	assert_eq!(response.status, 204);
	assert_eq!(response.body, serde_json::Value::Null);
}
