//! Pending-block queue.
//!
//! Blocks are appended in arrival order, including repeated numbers, and leave the
//! queue only from the head: when the unit for the head block completes, or, with
//! dead-lettering enabled, when it exhausted its retries.

use std::collections::VecDeque;

/// Copy of the queue state published after every mutation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueSnapshot {
	/// Blocks observed but not yet retired, head first
	pub pending: Vec<u64>,
	/// Blocks removed from the head after their unit gave up
	pub dead_letters: Vec<u64>,
	/// Number of entries removed from the head so far, dead letters included
	pub retired: u64,
}

/// FIFO queue of observed blocks
#[derive(Debug, Default)]
pub struct PendingBlockQueue {
	entries: VecDeque<u64>,
	dead_letters: Vec<u64>,
	retired: u64,
}

impl PendingBlockQueue {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a block to the tail and returns the new queue length
	pub fn push(&mut self, block_number: u64) -> usize {
		self.entries.push_back(block_number);
		self.entries.len()
	}

	pub fn head(&self) -> Option<u64> {
		self.entries.front().copied()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// The block to process next and its confirmation count: the head and the queue length
	pub fn dispatch_target(&self) -> Option<(u64, u64)> {
		self.head().map(|head| (head, self.entries.len() as u64))
	}

	/// Retires the head if it equals `block_number`. Returns whether an entry was removed.
	pub fn complete(&mut self, block_number: u64) -> bool {
		if self.head() == Some(block_number) {
			self.entries.pop_front();
			self.retired += 1;
			true
		} else {
			false
		}
	}

	/// Moves the head to the dead-letter list if it equals `block_number`.
	pub fn dead_letter(&mut self, block_number: u64) -> bool {
		if self.complete(block_number) {
			self.dead_letters.push(block_number);
			true
		} else {
			false
		}
	}

	pub fn dead_letters(&self) -> &[u64] {
		&self.dead_letters
	}

	pub fn snapshot(&self) -> QueueSnapshot {
		QueueSnapshot {
			pending: self.entries.iter().copied().collect(),
			dead_letters: self.dead_letters.clone(),
			retired: self.retired,
		}
	}
}
