use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::use_cases::field_errors::FieldErrorRegistry;

pub const DEFAULT_TOOLTIP_DURATION: Duration = Duration::from_millis(4000);

/// Tooltip that hides itself after `duration`.
///
/// Every `show` cancels the pending timer before arming a new one. Timers
/// only act when their generation is still current and the owner is alive.
pub struct TimedTooltip {
    registry: Arc<Mutex<FieldErrorRegistry>>,
    duration: Duration,
    generation: Arc<AtomicU64>,
    timer: Option<JoinHandle<()>>,
}

impl TimedTooltip {
    pub fn new(registry: Arc<Mutex<FieldErrorRegistry>>, duration: Duration) -> Self {
        Self {
            registry,
            duration,
            generation: Arc::new(AtomicU64::new(0)),
            timer: None,
        }
    }

    pub fn registry(&self) -> &Arc<Mutex<FieldErrorRegistry>> {
        &self.registry
    }

    pub fn show(&mut self, field: &str, message: &str) {
        self.cancel_timer();
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .show_field_error(field, message);
        self.arm_timer();
    }

    // Hides the visible tooltip (or forgets `field`) and disarms the timer.
    pub fn hide(&mut self, field: Option<&str>) {
        self.cancel_timer();
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .hide_field_error(field);
    }

    pub fn is_armed(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    fn arm_timer(&mut self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no async runtime; tooltip stays until hidden");
            return;
        };

        let generation = self.generation.load(Ordering::SeqCst);
        let current = Arc::downgrade(&self.generation);
        let registry = Arc::downgrade(&self.registry);
        let duration = self.duration;

        self.timer = Some(runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            expire(&current, &registry, generation);
        }));
    }

    fn cancel_timer(&mut self) {
        // Bumping first makes an already-woken timer a no-op.
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for TimedTooltip {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

fn expire(current: &Weak<AtomicU64>, registry: &Weak<Mutex<FieldErrorRegistry>>, generation: u64) {
    let Some(current) = current.upgrade() else {
        return;
    };
    if current.load(Ordering::SeqCst) != generation {
        return;
    }
    if let Some(registry) = registry.upgrade() {
        registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .hide_field_error(None);
    }
}
