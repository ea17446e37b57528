//! Block monitor / dispatcher.
//!
//! A single task owns the [`PendingBlockQueue`]. New-block notifications and unit
//! completions both reach it as [`MonitorEvent`]s on one channel, so every queue
//! mutation happens in one place and in arrival order. For each notification the
//! dispatcher takes the queue head and the queue length as
//! `(block_number, confirmation_count)` and spawns a [`BlockProcessingUnit`]
//! without waiting for it.
//!
//! A block that was queued behind the head was never dispatched at the counts it
//! reached meanwhile. When the head retires, the new head is dispatched once for
//! every count from 1 up to the current queue length, so the round matching its
//! rule snapshot still runs. Later notifications continue from the next count.

use std::{collections::HashMap, sync::Arc};

use futures::StreamExt;
use tokio::{
	sync::{mpsc, watch, Semaphore},
	task::JoinSet,
};

use crate::{
	models::ServiceConfig,
	services::{
		blockchain::BlockSubscriber,
		blockwatcher::{
			BlockProcessingUnit, BlockWatcherError, PendingBlockQueue, ProcessingContext,
			QueueSnapshot, UnitOutcome,
		},
	},
	utils::{constants::DEFAULT_MAX_CONCURRENT_UNITS, http::RetryConfig},
};

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Messages handled by the dispatcher task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
	/// The chain produced a new block
	NewBlock(u64),
	/// A processing unit finished
	UnitFinished(UnitOutcome),
	/// The block subscription ended
	SubscriptionEnded,
}

/// Scheduling settings of the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
	/// Maximum number of units running at the same time
	pub max_concurrent_units: usize,
	/// Retry policy of failed units
	pub unit_retry: RetryConfig,
	/// Dead-letter the head block when its unit gives up
	pub dead_letter: bool,
}

impl Default for MonitorSettings {
	fn default() -> Self {
		Self {
			max_concurrent_units: DEFAULT_MAX_CONCURRENT_UNITS,
			unit_retry: RetryConfig::default(),
			dead_letter: false,
		}
	}
}

impl From<&ServiceConfig> for MonitorSettings {
	fn from(config: &ServiceConfig) -> Self {
		Self {
			max_concurrent_units: config.max_concurrent_units,
			unit_retry: config.unit_retry.clone(),
			dead_letter: config.dead_letter,
		}
	}
}

/// Cloneable handle for feeding and observing a running [`BlockMonitor`]
#[derive(Clone, Debug)]
pub struct MonitorHandle {
	events: mpsc::Sender<MonitorEvent>,
	snapshot: watch::Receiver<QueueSnapshot>,
}

impl MonitorHandle {
	/// Delivers a new-block notification to the dispatcher
	pub async fn notify_new_block(&self, block_number: u64) -> Result<(), BlockWatcherError> {
		self.events
			.send(MonitorEvent::NewBlock(block_number))
			.await
			.map_err(|e| {
				BlockWatcherError::dispatcher_error(
					"Dispatcher is not running",
					Some(Box::new(e)),
					Some(HashMap::from([(
						"block_number".to_string(),
						block_number.to_string(),
					)])),
				)
			})
	}

	/// Latest published state of the pending queue
	pub fn snapshot(&self) -> QueueSnapshot {
		self.snapshot.borrow().clone()
	}

	/// Waits until the published queue state satisfies `predicate`
	pub async fn wait_for<F>(&self, mut predicate: F) -> Option<QueueSnapshot>
	where
		F: FnMut(&QueueSnapshot) -> bool,
	{
		let mut receiver = self.snapshot.clone();
		let snapshot = match receiver.wait_for(|snapshot| predicate(snapshot)).await {
			Ok(snapshot) => snapshot.clone(),
			Err(_) => return None,
		};
		Some(snapshot)
	}
}

/// Owns the pending queue and schedules processing units
pub struct BlockMonitor {
	context: Arc<ProcessingContext>,
	settings: MonitorSettings,
	queue: PendingBlockQueue,
	permits: Arc<Semaphore>,
	units: JoinSet<()>,
	in_flight: usize,
	events_tx: mpsc::Sender<MonitorEvent>,
	events_rx: mpsc::Receiver<MonitorEvent>,
	snapshot_tx: watch::Sender<QueueSnapshot>,
	snapshot_rx: watch::Receiver<QueueSnapshot>,
}

impl BlockMonitor {
	/// Creates a dispatcher with an empty queue
	///
	/// # Arguments
	/// * `context` - Rule source, chain client and sink shared by all units
	/// * `settings` - Concurrency cap and retry behaviour of units
	pub fn new(context: ProcessingContext, settings: MonitorSettings) -> Self {
		let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
		let (snapshot_tx, snapshot_rx) = watch::channel(QueueSnapshot::default());
		let permits = Arc::new(Semaphore::new(settings.max_concurrent_units.max(1)));

		Self {
			context: Arc::new(context),
			settings,
			queue: PendingBlockQueue::new(),
			permits,
			units: JoinSet::new(),
			in_flight: 0,
			events_tx,
			events_rx,
			snapshot_tx,
			snapshot_rx,
		}
	}

	pub fn handle(&self) -> MonitorHandle {
		MonitorHandle {
			events: self.events_tx.clone(),
			snapshot: self.snapshot_rx.clone(),
		}
	}

	/// Subscribes to new blocks and runs until the subscription ends or shutdown is requested.
	///
	/// When the subscription ends, units still running are awaited before returning.
	///
	/// # Returns
	/// * `Result<QueueSnapshot, BlockWatcherError>` - Final queue state or subscription error
	pub async fn start(
		self,
		subscriber: &dyn BlockSubscriber,
		shutdown: watch::Receiver<bool>,
	) -> Result<QueueSnapshot, BlockWatcherError> {
		let mut blocks = subscriber.subscribe().await.map_err(|e| {
			BlockWatcherError::subscription_error(
				"Failed to subscribe to new blocks",
				Some(e.into()),
				None,
			)
		})?;

		let events = self.events_tx.clone();
		let forwarder = tokio::spawn(async move {
			while let Some(block_number) = blocks.next().await {
				if events.send(MonitorEvent::NewBlock(block_number)).await.is_err() {
					return;
				}
			}
			let _ = events.send(MonitorEvent::SubscriptionEnded).await;
		});

		let snapshot = self.run(shutdown).await;
		forwarder.abort();
		Ok(snapshot)
	}

	/// Processes events until shutdown is requested or the subscription ended and no
	/// unit is left running.
	pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> QueueSnapshot {
		let mut subscription_ended = false;

		loop {
			tokio::select! {
				changed = shutdown.changed() => {
					if changed.is_err() || *shutdown.borrow() {
						tracing::info!(
							pending = self.queue.len(),
							in_flight = self.in_flight,
							"Shutting down block monitor"
						);
						break;
					}
				}
				Some(event) = self.events_rx.recv() => {
					match event {
						MonitorEvent::NewBlock(block_number) => self.on_new_block(block_number),
						MonitorEvent::UnitFinished(outcome) => self.on_unit_finished(outcome),
						MonitorEvent::SubscriptionEnded => {
							tracing::warn!("Block subscription ended");
							subscription_ended = true;
						}
					}
				}
			}

			while self.units.try_join_next().is_some() {}

			if subscription_ended && self.in_flight == 0 {
				break;
			}
		}

		self.units.abort_all();
		self.queue.snapshot()
	}

	/// Appends the block and launches a unit for the current head.
	fn on_new_block(&mut self, block_number: u64) {
		let queue_length = self.queue.push(block_number);
		tracing::info!(block = block_number, queue_length, "New block received");
		self.publish_snapshot();

		let Some((target, confirmation_count)) = self.queue.dispatch_target() else {
			return;
		};
		self.spawn_unit(target, confirmation_count);
	}

	/// Dispatches a newly exposed head at every count it has reached so far.
	fn dispatch_new_head(&mut self) {
		let Some((target, queue_length)) = self.queue.dispatch_target() else {
			return;
		};
		for confirmation_count in 1..=queue_length {
			self.spawn_unit(target, confirmation_count);
		}
	}

	/// Retires or dead-letters the head when the outcome names it, then dispatches
	/// the new head.
	fn on_unit_finished(&mut self, outcome: UnitOutcome) {
		self.in_flight = self.in_flight.saturating_sub(1);

		let changed = match outcome {
			UnitOutcome::Completed { block_number } => {
				let retired = self.queue.complete(block_number);
				if retired {
					tracing::info!(
						block = block_number,
						queue_length = self.queue.len(),
						"Retired block"
					);
				} else {
					tracing::debug!(
						block = block_number,
						head = ?self.queue.head(),
						"Ignoring completion for a block that is not the queue head"
					);
				}
				retired
			}
			UnitOutcome::DeadLettered { block_number } => {
				let moved = self.queue.dead_letter(block_number);
				if moved {
					tracing::warn!(
						block = block_number,
						dead_letters = self.queue.dead_letters().len(),
						"Moved block to dead-letter list"
					);
				}
				moved
			}
			UnitOutcome::NotApplicable { .. } | UnitOutcome::Failed { .. } => false,
		};

		if changed {
			self.publish_snapshot();
			self.dispatch_new_head();
		}
	}

	fn spawn_unit(&mut self, block_number: u64, confirmation_count: u64) {
		let unit = BlockProcessingUnit::new(block_number, confirmation_count, self.context.clone());
		let permits = self.permits.clone();
		let events = self.events_tx.clone();
		let retry = self.settings.unit_retry.clone();
		let dead_letter = self.settings.dead_letter;

		tracing::debug!(
			block = block_number,
			confirmations = confirmation_count,
			"Dispatching processing unit"
		);

		self.in_flight += 1;
		self.units.spawn(async move {
			let outcome = match permits.acquire_owned().await {
				Ok(_permit) => unit.run(&retry, dead_letter).await,
				Err(e) => {
					tracing::error!(block = block_number, error = %e, "Unit permit unavailable");
					UnitOutcome::Failed { block_number }
				}
			};
			let _ = events.send(MonitorEvent::UnitFinished(outcome)).await;
		});
	}

	fn publish_snapshot(&self) {
		self.snapshot_tx.send_replace(self.queue.snapshot());
	}
}
