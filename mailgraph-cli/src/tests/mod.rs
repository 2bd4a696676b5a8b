//! Unit tests for mailgraph-cli, organized by module.
//!
//! Each submodule documents the behaviour under test.

use std::sync::{Mutex, MutexGuard};


/// Serializes tests that read or write process environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}
