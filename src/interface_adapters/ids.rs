use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Returns a process-unique form id such as `booking-3`.
///
/// Two instances of the same form mounted at once must not share a handler slot.
pub fn form_instance_id(prefix: &str) -> String {
    format!("{prefix}-{}", NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
}
