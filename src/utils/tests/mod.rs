//! Test helper utilities
//!
//! This module contains test helper utilities for the application.
//!
//! - `builders`: Test helper utilities for creating test instances of models

pub mod builders {
	// Chain specific test helpers
	pub mod evm {
		pub mod block;
		pub mod transaction;
	}

	// Chain agnostic test helpers
	pub mod network;
	pub mod rule;
	pub mod service;
}

pub use builders::*;
