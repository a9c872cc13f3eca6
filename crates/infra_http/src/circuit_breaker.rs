//! Circuit breaker shared by the HTTP adapters
//!
//! Closed: calls go through and consecutive failures are counted. After
//! `failure_threshold` failures the circuit opens and calls fail fast with
//! `ServiceUnavailable`. Once `reset_timeout` has elapsed the circuit is
//! half-open: calls are let through, and `success_threshold` successes close
//! it again while a single failure reopens it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use core_kernel::{CircuitBreakerConfig, PortError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    failure_count: AtomicU64,
    success_count: AtomicU64,
    is_open: AtomicBool,
    opened_at: RwLock<Option<Instant>>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            failure_count: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            is_open: AtomicBool::new(false),
            opened_at: RwLock::new(None),
        }
    }

    pub async fn state(&self) -> CircuitState {
        if !self.is_open.load(Ordering::Relaxed) {
            return CircuitState::Closed;
        }

        match *self.opened_at.read().await {
            Some(time) if time.elapsed() >= self.config.reset_timeout() => CircuitState::HalfOpen,
            _ => CircuitState::Open,
        }
    }

    pub async fn is_available(&self) -> bool {
        self.state().await != CircuitState::Open
    }

    /// Fails fast while the circuit is open
    pub async fn guard(&self) -> Result<(), PortError> {
        if self.is_available().await {
            Ok(())
        } else {
            Err(PortError::ServiceUnavailable {
                service: format!("{} (circuit breaker open)", self.name),
            })
        }
    }

    pub fn record_success(&self) {
        self.failure_count.store(0, Ordering::Relaxed);
        if !self.is_open.load(Ordering::Relaxed) {
            return;
        }

        let successes = self.success_count.fetch_add(1, Ordering::Relaxed) + 1;
        if successes >= u64::from(self.config.success_threshold) {
            self.is_open.store(false, Ordering::Relaxed);
            self.success_count.store(0, Ordering::Relaxed);
            info!(breaker = %self.name, "Circuit breaker closed");
        }
    }

    pub async fn record_failure(&self) {
        self.success_count.store(0, Ordering::Relaxed);
        let failures = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;

        // A failed trial call in half-open reopens immediately
        let reopen = self.is_open.load(Ordering::Relaxed);
        if reopen || failures >= u64::from(self.config.failure_threshold) {
            if !self.is_open.swap(true, Ordering::Relaxed) {
                warn!(breaker = %self.name, failures, "Circuit breaker opened");
            }
            *self.opened_at.write().await = Some(Instant::now());
        }
    }
}
