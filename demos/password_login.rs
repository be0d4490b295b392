//! Demonstrates a password-grant login against a mocked platform, then reads the current user
//! through the retrying client.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use propwise_sdk::{client::RestClient, config::ClientOptions};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let _token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token").body_includes("grant_type=password");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"refresh_token\":\"demo-refresh\",\"expires_in\":900}",
			);
		})
		.await;
	let _me_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/me").header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body(
				"{\"id\":\"u-1\",\"username\":\"resident-17\",\"email\":\"resident@example.org\",\"locale\":\"de_DE\"}",
			);
		})
		.await;
	let client = RestClient::new(
		ClientOptions::builder()
			.api_url(server.base_url())
			.oauth_url(server.base_url())
			.client_id("demo-client")
			.username("resident@example.org")
			.password("hunter2")
			.build(),
	)?;
	// The first API call triggers the password exchange transparently.
	let user = client.users().current().await?;

	println!("Logged in as {} <{}>.", user.username, user.email);
	println!("Dispatched {} attempt(s), {} refresh(es).", client.metrics().attempts(), client.metrics().refreshes());

	Ok(())
}
