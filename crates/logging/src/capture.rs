//! A tracing layer that keeps events at or above a level in a shared buffer.
//!
//! Tooling installs it next to the console formatter to find out afterwards whether
//! anything worth failing on was logged.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::fmt::{RenderedLog, render_event};

/// Tracing layer that records matching events.
#[derive(Debug, Clone)]
pub struct CaptureLayer {
    /// Least severe level recorded.
    min: Level,
    /// Shared with the [`Captured`] handle.
    buffer: Arc<Mutex<Vec<RenderedLog>>>,
}

/// Read side of a [`CaptureLayer`].
#[derive(Debug, Clone)]
pub struct Captured {
    /// Events recorded so far.
    buffer: Arc<Mutex<Vec<RenderedLog>>>,
}

impl CaptureLayer {
    /// A layer recording events at `min` or more severe, and the handle to read them.
    pub fn new(min: Level) -> (Self, Captured) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let handle = Captured {
            buffer: Arc::clone(&buffer),
        };
        (Self { min, buffer }, handle)
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // More verbose levels compare greater.
        if *event.metadata().level() <= self.min {
            self.buffer.lock().push(render_event(event));
        }
    }
}

impl Captured {
    /// A copy of everything recorded so far.
    pub fn entries(&self) -> Vec<RenderedLog> {
        self.buffer.lock().clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use tracing::{debug, error, info, subscriber::with_default, warn};
    use tracing_subscriber::{layer::SubscriberExt, registry};

    use super::*;

    #[test]
    fn records_only_at_or_above_min() {
        let (layer, captured) = CaptureLayer::new(Level::WARN);
        with_default(registry().with(layer), || {
            debug!("quiet");
            info!("still quiet");
            warn!("first");
            error!("second");
        });
        let levels: Vec<String> = captured.entries().into_iter().map(|e| e.level).collect();
        assert_eq!(levels, vec!["WARN", "ERROR"]);
        assert_eq!(captured.len(), 2);
        captured.clear();
        assert!(captured.is_empty());
    }
}
