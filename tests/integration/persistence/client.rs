use alloy::primitives::{B256, U256};
use mockito::{Matcher, Server};
use tx_rule_monitor::{
	models::TransactionCandidate,
	services::persistence::{HttpBatchPersistence, PersistenceError, TransactionSink},
	utils::tests::builders::evm::transaction::TransactionBuilder,
};

use crate::integration::mocks::create_test_http_client;

fn candidates(count: usize) -> Vec<TransactionCandidate> {
	(0..count)
		.map(|i| {
			let transaction = TransactionBuilder::new()
				.hash(B256::from(U256::from(i)))
				.value(U256::from(i))
				.build();
			TransactionCandidate::new(&transaction, vec![1])
		})
		.collect()
}

#[tokio::test]
async fn test_large_match_set_is_split_into_batches() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/transactions/batch")
		.match_header("content-type", "application/json")
		.with_status(201)
		.expect(3)
		.create_async()
		.await;

	let sink = HttpBatchPersistence::new(create_test_http_client(), &server.url());
	sink.persist(&candidates(201)).await.unwrap();

	mock.assert();
}

#[tokio::test]
async fn test_batch_body_lists_transactions() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/transactions/batch")
		.match_body(Matcher::AllOf(vec![
			Matcher::Regex(r#"^\{"transactions":\["#.to_string()),
			Matcher::Regex(r#""value":"0""#.to_string()),
			Matcher::Regex(r#""value":"1""#.to_string()),
			Matcher::Regex(r#""ruleIds":\[1\]"#.to_string()),
		]))
		.with_status(201)
		.expect(1)
		.create_async()
		.await;

	let sink = HttpBatchPersistence::new(create_test_http_client(), &format!("{}/", server.url()));
	sink.persist(&candidates(2)).await.unwrap();

	mock.assert();
}

#[tokio::test]
async fn test_rejected_batch_fails_persist() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/transactions/batch")
		.with_status(422)
		.with_body("invalid transaction")
		.create_async()
		.await;

	let sink = HttpBatchPersistence::new(create_test_http_client(), &server.url());
	let result = sink.persist(&candidates(1)).await;
	mock.assert();

	match result {
		Err(PersistenceError::BatchRejected(ctx)) => {
			assert!(ctx.message.contains("422"));
			assert!(ctx.message.contains("invalid transaction"));
		}
		other => panic!("unexpected result: {:?}", other),
	}
}
