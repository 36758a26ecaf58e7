//! Stage spans and count events, compiled out unless the `tracing` feature is on.
//!
//! Every pipeline stage opens a span (`filter`, `rank`, `triplets`, `score`,
//! `batch`) and closes with one event carrying its counts. Without the
//! feature the macros expand to a [`NoopSpan`] and a discarded tuple.

/// Opens an info-level span for a pipeline stage.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {{
        let _: &'static str = $name;
        $crate::trace::NoopSpan
    }};
}

/// Emits an info-level event with `key = value` counts.
///
/// Without the feature the values are still evaluated so call sites stay
/// warning-free.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::info!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
    ($name:expr) => {};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Span names, one per stage. Subscribers filter on these.
pub(crate) mod stage {
    pub(crate) const FILTER: &str = "filter";
    pub(crate) const RANK: &str = "rank";
    pub(crate) const TRIPLETS: &str = "triplets";
    pub(crate) const SCORE: &str = "score";
    /// Wraps one `process_batch` call around the per-event stages.
    pub(crate) const BATCH: &str = "batch";
}

/// Stand-in span guard so `trace_span!(..).entered()` compiles without tracing.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Returns self, like `Span::entered`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
