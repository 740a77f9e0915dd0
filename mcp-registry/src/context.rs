//! Per-call execution context: cancellation and telemetry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use mcp_proto::payment::PaymentInfo;
use mcp_telemetry::TelemetryEmitter;
use uuid::Uuid;

/// Cooperative cancellation flag shared between a call's owning request
/// handle and the running handler. The handler is expected to poll
/// [`Context::is_cancelled`] at its natural yield points (before each
/// progress frame, around awaits on external I/O); nothing forcibly
/// interrupts it.
#[derive(Debug, Clone)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a fresh, not-yet-cancelled flag.
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Marks the flag as cancelled. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once [`Self::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for CancelFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a tool handler needs beyond its own arguments: identity,
/// cancellation, timing, and a way to emit telemetry without knowing
/// how it gets there.
#[derive(Clone)]
pub struct Context {
    request_id: Uuid,
    cancel: CancelFlag,
    started_at: Instant,
    telemetry: Option<TelemetryEmitter>,
    payment: Option<PaymentInfo>,
}

impl Context {
    /// Builds a new context for a request about to start executing.
    ///
    /// `payment` is the verified (pre-settlement) payment snapshot when
    /// this call was payment-gated, or `None` for a free tool.
    #[must_use]
    pub fn new(
        request_id: Uuid,
        cancel: CancelFlag,
        telemetry: Option<TelemetryEmitter>,
        payment: Option<PaymentInfo>,
    ) -> Self {
        Self {
            request_id,
            cancel,
            started_at: Instant::now(),
            telemetry,
            payment,
        }
    }

    /// The correlation id for this call.
    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Whether the client has asked to cancel this call. Handlers should
    /// check this between units of work and stop promptly, but are not
    /// forcibly preempted if they don't.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Milliseconds elapsed since this context was created.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// The telemetry emitter, if telemetry is enabled for this server.
    #[must_use]
    pub fn telemetry(&self) -> Option<&TelemetryEmitter> {
        self.telemetry.as_ref()
    }

    /// A read-only view of this call's verified payment, if it was
    /// payment-gated. Reflects the state at verification time — handlers
    /// run before settlement, so `settlement_result` here is always
    /// `Pending`.
    #[must_use]
    pub fn payment(&self) -> Option<&PaymentInfo> {
        self.payment.as_ref()
    }
}
