//! Integration tests for the block monitor pipeline.
//!
//! The chain, the rule source and the sink are mocked; the monitor, the queue,
//! the processing units and the matcher are the real ones.

use std::{
	sync::{Arc, Mutex},
	time::Duration,
};

use alloy::primitives::{Address, U256};
use futures::{stream, StreamExt};
use tokio::sync::watch;
use tx_rule_monitor::{
	models::{EVMBlock, TransactionCandidate},
	services::blockwatcher::{
		BlockMonitor, MonitorHandle, MonitorSettings, ProcessingContext, QueueSnapshot,
	},
	utils::tests::builders::{
		evm::{block::BlockBuilder, transaction::TransactionBuilder},
		rule::RuleBuilder,
	},
};

use crate::integration::mocks::{
	MockBlockChainClientTrait, MockBlockSubscriberTrait, MockRuleSourceTrait,
	MockTransactionSinkTrait, RECIPIENT,
};

fn recipient() -> Address {
	RECIPIENT.parse().unwrap()
}

/// Every block carries one transfer to [`RECIPIENT`] and one to another address
fn chain_with_transfers() -> MockBlockChainClientTrait {
	let mut client = MockBlockChainClientTrait::new();
	client
		.expect_get_block_with_transactions()
		.returning(|number| Ok(block_with_transfers(number)));
	client
}

fn block_with_transfers(number: u64) -> EVMBlock {
	BlockBuilder::new()
		.number(number)
		.transaction(
			TransactionBuilder::new()
				.hash(alloy::primitives::B256::with_last_byte(number as u8))
				.to(recipient())
				.value(U256::from(1_000u64))
				.build(),
		)
		.transaction(
			TransactionBuilder::new()
				.hash(alloy::primitives::B256::with_last_byte(0xf0))
				.to(Address::repeat_byte(0x01))
				.build(),
		)
		.build()
}

/// Sink recording every persisted candidate
fn recording_sink(persisted: Arc<Mutex<Vec<TransactionCandidate>>>) -> MockTransactionSinkTrait {
	let mut sink = MockTransactionSinkTrait::new();
	sink.expect_persist().returning(move |candidates| {
		persisted.lock().unwrap().extend_from_slice(candidates);
		Ok(())
	});
	sink
}

fn start_monitor(
	rule_source: MockRuleSourceTrait,
	client: MockBlockChainClientTrait,
	sink: MockTransactionSinkTrait,
) -> (
	MonitorHandle,
	watch::Sender<bool>,
	tokio::task::JoinHandle<QueueSnapshot>,
) {
	let monitor = BlockMonitor::new(
		ProcessingContext {
			rule_source: Arc::new(rule_source),
			client: Arc::new(client),
			sink: Arc::new(sink),
			verbose_logging: true,
		},
		MonitorSettings::default(),
	);
	let handle = monitor.handle();
	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let task = tokio::spawn(monitor.run(shutdown_rx));
	(handle, shutdown_tx, task)
}

async fn wait_for_pending(handle: &MonitorHandle, expected: &[u64]) {
	tokio::time::timeout(
		Duration::from_secs(5),
		handle.wait_for(|snapshot| snapshot.pending == expected),
	)
	.await
	.unwrap_or_else(|_| panic!("queue never became {:?}: {:?}", expected, handle.snapshot()))
	.expect("monitor stopped");
}

async fn wait_for_retired(handle: &MonitorHandle, retired: u64) -> QueueSnapshot {
	tokio::time::timeout(
		Duration::from_secs(5),
		handle.wait_for(|snapshot| snapshot.retired == retired),
	)
	.await
	.unwrap_or_else(|_| panic!("{} blocks never retired: {:?}", retired, handle.snapshot()))
	.expect("monitor stopped")
}

#[tokio::test]
async fn test_recipient_rule_with_one_block_delay() {
	let mut rule_source = MockRuleSourceTrait::new();
	rule_source.expect_fetch_rules().returning(|| {
		Ok(vec![RuleBuilder::new()
			.id(7)
			.to_address(RECIPIENT)
			.block_delay(1)
			.build()])
	});
	let persisted = Arc::new(Mutex::new(Vec::new()));

	let (handle, shutdown, task) = start_monitor(
		rule_source,
		chain_with_transfers(),
		recording_sink(persisted.clone()),
	);

	// [100]: count 1, not applicable
	handle.notify_new_block(100).await.unwrap();
	wait_for_pending(&handle, &[100]).await;
	tokio::time::sleep(Duration::from_millis(50)).await;
	assert_eq!(handle.snapshot().pending, vec![100]);
	assert!(persisted.lock().unwrap().is_empty());

	// [100, 101]: 100 processed with count 2 and retired
	handle.notify_new_block(101).await.unwrap();
	wait_for_pending(&handle, &[101]).await;

	assert_eq!(handle.snapshot().retired, 1);

	let persisted = persisted.lock().unwrap().clone();
	assert_eq!(persisted.len(), 1);
	assert_eq!(persisted[0].rule_ids, vec![7]);
	assert_eq!(persisted[0].to, Some(recipient()));
	assert_eq!(persisted[0].hash, alloy::primitives::B256::with_last_byte(100));

	shutdown.send(true).unwrap();
	assert_eq!(task.await.unwrap().pending, vec![101]);
}

#[tokio::test]
async fn test_recipient_rule_with_two_block_delay() {
	let mut rule_source = MockRuleSourceTrait::new();
	rule_source.expect_fetch_rules().returning(|| {
		Ok(vec![RuleBuilder::new()
			.id(7)
			.to_address(RECIPIENT)
			.block_delay(2)
			.build()])
	});
	let persisted = Arc::new(Mutex::new(Vec::new()));

	let (handle, shutdown, task) = start_monitor(
		rule_source,
		chain_with_transfers(),
		recording_sink(persisted.clone()),
	);

	handle.notify_new_block(100).await.unwrap();
	wait_for_pending(&handle, &[100]).await;
	handle.notify_new_block(101).await.unwrap();
	wait_for_pending(&handle, &[100, 101]).await;
	tokio::time::sleep(Duration::from_millis(50)).await;
	assert_eq!(handle.snapshot().pending, vec![100, 101]);

	handle.notify_new_block(102).await.unwrap();
	wait_for_pending(&handle, &[101, 102]).await;

	let persisted = persisted.lock().unwrap().clone();
	assert_eq!(persisted.len(), 1);
	assert_eq!(persisted[0].rule_ids, vec![7]);

	shutdown.send(true).unwrap();
	assert_eq!(task.await.unwrap().pending, vec![101, 102]);
}

#[tokio::test]
async fn test_empty_rule_set_retires_without_persisting() {
	let mut rule_source = MockRuleSourceTrait::new();
	rule_source.expect_fetch_rules().returning(|| Ok(vec![]));

	let mut sink = MockTransactionSinkTrait::new();
	sink.expect_persist().never();

	let (handle, shutdown, task) = start_monitor(rule_source, chain_with_transfers(), sink);

	for (retired, number) in [1u64, 2, 3].into_iter().enumerate() {
		handle.notify_new_block(number).await.unwrap();
		let snapshot = wait_for_retired(&handle, retired as u64 + 1).await;
		assert!(snapshot.pending.is_empty());
	}

	shutdown.send(true).unwrap();
	let snapshot = task.await.unwrap();
	assert!(snapshot.pending.is_empty());
	assert_eq!(snapshot.retired, 3);
}

#[tokio::test]
async fn test_burst_of_blocks_is_fully_processed() {
	let mut rule_source = MockRuleSourceTrait::new();
	rule_source
		.expect_fetch_rules()
		.returning(|| Ok(vec![RuleBuilder::new().id(3).to_address(RECIPIENT).build()]));
	let persisted = Arc::new(Mutex::new(Vec::new()));

	let (handle, shutdown, task) = start_monitor(
		rule_source,
		chain_with_transfers(),
		recording_sink(persisted.clone()),
	);

	// Notified back to back, as a polling round that skipped several heads does
	for number in [10u64, 11, 12] {
		handle.notify_new_block(number).await.unwrap();
	}
	let snapshot = wait_for_retired(&handle, 3).await;
	assert!(snapshot.pending.is_empty());

	shutdown.send(true).unwrap();
	task.await.unwrap();

	let mut hashes: Vec<_> = persisted.lock().unwrap().iter().map(|c| c.hash).collect();
	hashes.sort();
	assert_eq!(
		hashes,
		[10u8, 11, 12]
			.map(alloy::primitives::B256::with_last_byte)
			.to_vec()
	);
}

#[tokio::test]
async fn test_chain_failure_leaves_head_pending() {
	let mut rule_source = MockRuleSourceTrait::new();
	rule_source
		.expect_fetch_rules()
		.returning(|| Ok(vec![RuleBuilder::new().to_address(RECIPIENT).build()]));

	let mut client = MockBlockChainClientTrait::new();
	client
		.expect_get_block_with_transactions()
		.returning(|number| Err(anyhow::anyhow!("block {} unavailable", number)));

	let mut sink = MockTransactionSinkTrait::new();
	sink.expect_persist().never();

	let (handle, shutdown, task) = start_monitor(rule_source, client, sink);

	handle.notify_new_block(5).await.unwrap();
	wait_for_pending(&handle, &[5]).await;
	tokio::time::sleep(Duration::from_millis(50)).await;

	// A later block is queued behind the stuck head
	handle.notify_new_block(6).await.unwrap();
	wait_for_pending(&handle, &[5, 6]).await;

	shutdown.send(true).unwrap();
	assert_eq!(task.await.unwrap().pending, vec![5, 6]);
}

#[tokio::test]
async fn test_start_consumes_subscription() {
	let mut rule_source = MockRuleSourceTrait::new();
	rule_source
		.expect_fetch_rules()
		.returning(|| Ok(vec![RuleBuilder::new().id(1).to_address(RECIPIENT).build()]));
	let persisted = Arc::new(Mutex::new(Vec::new()));

	let mut subscriber = MockBlockSubscriberTrait::new();
	subscriber
		.expect_subscribe()
		.times(1)
		.returning(|| Ok(stream::iter(vec![42u64]).boxed()));

	let monitor = BlockMonitor::new(
		ProcessingContext {
			rule_source: Arc::new(rule_source),
			client: Arc::new(chain_with_transfers()),
			sink: Arc::new(recording_sink(persisted.clone())),
			verbose_logging: false,
		},
		MonitorSettings::default(),
	);
	let (_shutdown_tx, shutdown_rx) = watch::channel(false);

	let snapshot = tokio::time::timeout(
		Duration::from_secs(5),
		monitor.start(&subscriber, shutdown_rx),
	)
	.await
	.unwrap()
	.unwrap();

	assert!(snapshot.pending.is_empty());
	let persisted = persisted.lock().unwrap();
	assert_eq!(persisted.len(), 1);
	assert_eq!(persisted[0].rule_ids, vec![1]);
}

#[tokio::test]
async fn test_start_fails_when_subscription_fails() {
	let mut subscriber = MockBlockSubscriberTrait::new();
	subscriber
		.expect_subscribe()
		.returning(|| Err(anyhow::anyhow!("connection refused")));

	let monitor = BlockMonitor::new(
		ProcessingContext {
			rule_source: Arc::new(MockRuleSourceTrait::new()),
			client: Arc::new(MockBlockChainClientTrait::new()),
			sink: Arc::new(MockTransactionSinkTrait::new()),
			verbose_logging: false,
		},
		MonitorSettings::default(),
	);
	let (_shutdown_tx, shutdown_rx) = watch::channel(false);

	assert!(monitor.start(&subscriber, shutdown_rx).await.is_err());
}
