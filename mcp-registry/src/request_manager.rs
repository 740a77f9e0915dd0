//! Tracks in-flight (and briefly completed) requests so
//! `notifications/cancel` can reach a running call by id.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::sleep;
use uuid::Uuid;

use crate::context::CancelFlag;
use crate::error::RegistryError;

/// How long a completed request's entry is kept around after it
/// finishes, so a cancellation notification racing the result doesn't
/// look like it targeted an unknown id.
const RETENTION: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Completed,
}

struct Entry {
    cancel: CancelFlag,
    state: State,
}

/// The set of requests currently executing or recently finished.
#[derive(Default)]
pub struct RequestManager {
    requests: Arc<DashMap<Uuid, Entry>>,
}

impl RequestManager {
    /// Builds an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new in-flight request and returns the cancellation
    /// flag its handler should poll.
    #[must_use]
    pub fn begin(&self, request_id: Uuid) -> CancelFlag {
        let cancel = CancelFlag::new();
        self.requests.insert(
            request_id,
            Entry {
                cancel: cancel.clone(),
                state: State::Running,
            },
        );
        cancel
    }

    /// Marks a request as cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownRequest`] if `request_id` is
    /// neither running nor within its post-completion retention window.
    pub fn cancel(&self, request_id: Uuid) -> Result<(), RegistryError> {
        let entry = self
            .requests
            .get(&request_id)
            .ok_or_else(|| RegistryError::UnknownRequest(request_id.to_string()))?;
        entry.cancel.cancel();
        Ok(())
    }

    /// Marks a request as completed and schedules its entry for removal
    /// after [`RETENTION`].
    pub fn complete(&self, request_id: Uuid) {
        if let Some(mut entry) = self.requests.get_mut(&request_id) {
            entry.state = State::Completed;
        }
        self.schedule_sweep(request_id);
    }

    fn schedule_sweep(&self, request_id: Uuid) {
        let requests = Arc::clone(&self.requests);
        tokio::spawn(async move {
            sleep(RETENTION).await;
            requests.remove(&request_id);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_then_cancel_marks_the_flag() {
        let manager = RequestManager::new();
        let id = Uuid::new_v4();
        let flag = manager.begin(id);
        assert!(!flag.is_cancelled());
        manager.cancel(id).expect("request should be known");
        assert!(flag.is_cancelled());
    }

    #[test]
    fn cancelling_an_unknown_request_is_an_error() {
        let manager = RequestManager::new();
        let err = manager.cancel(Uuid::new_v4()).expect_err("unknown request");
        assert!(matches!(err, RegistryError::UnknownRequest(_)));
    }
}
