//! Fires a burst of requests larger than the admission reservoir and shows the token bucket
//! pacing the overflow onto refill ticks.

// std
use std::{sync::Arc, time::Instant};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use propwise_sdk::{
	client::RestClient,
	config::ClientOptions,
	rest::RequestPayload,
};

const BURST: usize = 8;

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let _ping_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/ping");
			then.status(200).header("content-type", "application/json").body("{\"pong\":true}");
		})
		.await;
	// Reservoir of 3: the first three requests go out immediately, the rest wait for
	// one refill tick each (~166 ms apart).
	let client = Arc::new(RestClient::new(
		ClientOptions::builder()
			.api_url(server.base_url())
			.oauth_url(server.base_url())
			.access_token("demo-access")
			.queue_reservoir(3)
			.build(),
	)?);
	let started = Instant::now();
	let mut tasks = Vec::with_capacity(BURST);

	for index in 0..BURST {
		let client = client.clone();

		tasks.push(tokio::spawn(async move {
			client.get("/v1/ping", RequestPayload::new()).await?;

			Ok::<_, propwise_sdk::error::Error>((index, started.elapsed()))
		}));
	}

	for task in tasks {
		let (index, elapsed) = task.await??;

		println!("Request {index} completed after {elapsed:?}.");
	}

	println!(
		"{BURST} requests, {} attempts, finished in {:?}.",
		client.metrics().attempts(),
		started.elapsed(),
	);

	Ok(())
}
