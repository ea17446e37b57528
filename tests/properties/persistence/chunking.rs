use alloy::primitives::{B256, U256};
use mockito::Server;
use proptest::{prelude::*, test_runner::Config};
use reqwest_retry::DefaultRetryableStrategy;
use tx_rule_monitor::{
	models::TransactionCandidate,
	services::persistence::{HttpBatchPersistence, TransactionSink},
	utils::{
		http::{create_base_http_client, create_retryable_http_client, RetryConfig},
		tests::builders::evm::transaction::TransactionBuilder,
	},
};

fn candidates(count: usize) -> Vec<TransactionCandidate> {
	(0..count)
		.map(|i| {
			let transaction = TransactionBuilder::new()
				.hash(B256::from(U256::from(i)))
				.build();
			TransactionCandidate::new(&transaction, vec![1])
		})
		.collect()
}

proptest! {
	#![proptest_config(Config {
		cases: 16,
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_one_request_per_chunk(count in 0usize..350, batch_size in 1usize..=100) {
		let runtime = tokio::runtime::Runtime::new().unwrap();
		runtime.block_on(async {
			let mut server = Server::new_async().await;
			let expected = count.div_ceil(batch_size);
			let mock = server
				.mock("POST", "/transactions/batch")
				.with_status(201)
				.expect(expected)
				.create_async()
				.await;

			let client = create_retryable_http_client(
				&RetryConfig::default(),
				create_base_http_client().unwrap(),
				Some(DefaultRetryableStrategy),
			);
			let sink = HttpBatchPersistence::new(client, &server.url()).with_batch_size(batch_size);

			sink.persist(&candidates(count)).await.unwrap();
			mock.assert_async().await;
		});
	}
}
