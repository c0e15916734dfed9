//! Image slider: index arithmetic and auto-advance.
//!
//! The slider shows `visible` consecutive items out of `item_count`, so it has
//! `item_count - visible + 1` positions. `next` and `prev` wrap around those
//! positions; `seek` maps a pointer position on the scrollbar track to one.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderState {
    current_index: usize,
    item_count: usize,
    visible: usize,
}

impl SliderState {
    /// One item visible at a time
    pub fn new(item_count: usize) -> Self {
        Self::with_window(item_count, 1)
    }

    /// `visible` items shown side by side; `visible` of 0 counts as 1
    pub fn with_window(item_count: usize, visible: usize) -> Self {
        Self {
            current_index: 0,
            item_count,
            visible: visible.max(1),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Number of distinct positions; 0 only when there are no items
    pub fn positions(&self) -> usize {
        if self.item_count == 0 {
            0
        } else {
            self.item_count.saturating_sub(self.visible) + 1
        }
    }

    pub fn next(&mut self) -> usize {
        let positions = self.positions();
        if positions > 0 {
            self.current_index = (self.current_index + 1) % positions;
        }
        self.current_index
    }

    pub fn prev(&mut self) -> usize {
        let positions = self.positions();
        if positions > 0 {
            self.current_index = (self.current_index + positions - 1) % positions;
        }
        self.current_index
    }

    /// Jump to the position under the pointer.
    ///
    /// `position` is measured from the left edge of a track `track_width`
    /// wide; out-of-range and non-finite positions are clamped.
    pub fn seek(&mut self, position: f64, track_width: f64) -> usize {
        let positions = self.positions();
        if positions == 0 || !(track_width > 0.0) {
            return self.current_index;
        }

        let fraction = position / track_width;
        let target = if fraction.is_finite() && fraction > 0.0 {
            (fraction * self.item_count as f64).floor() as usize
        } else {
            0
        };
        self.current_index = target.min(positions - 1);
        self.current_index
    }

    /// Horizontal offset of the slide strip, in percent of the viewport
    pub fn translate_percent(&self) -> f64 {
        self.current_index as f64 * 100.0 / self.visible as f64
    }

    /// Scrollbar thumb width, in percent of the track
    pub fn thumb_width_percent(&self) -> f64 {
        if self.item_count == 0 {
            100.0
        } else {
            100.0 / self.item_count as f64
        }
    }

    /// Scrollbar thumb offset, in percent of the track
    pub fn thumb_left_percent(&self) -> f64 {
        self.current_index as f64 * self.thumb_width_percent()
    }
}

/// Slider with a repeating advance timer.
///
/// The timer task is owned here: starting a new one always aborts the old
/// one first, so at most one task advances the index.
pub struct AutoAdvance {
    state: Arc<Mutex<SliderState>>,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
    index_tx: watch::Sender<usize>,
}

impl AutoAdvance {
    pub fn new(state: SliderState, interval: Duration) -> Self {
        let (index_tx, _) = watch::channel(state.current_index());
        Self {
            state: Arc::new(Mutex::new(state)),
            interval,
            handle: None,
            index_tx,
        }
    }

    /// Receive the index after every change, manual or timed
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.index_tx.subscribe()
    }

    pub fn snapshot(&self) -> SliderState {
        lock(&self.state).clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start (or restart) the timer; the first advance happens one interval from now
    pub fn start(&mut self) {
        self.stop();

        let state = Arc::clone(&self.state);
        let index_tx = self.index_tx.clone();
        let period = self.interval;

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let index = lock(&state).next();
                debug!(index, "Slider advanced");
                index_tx.send_replace(index);
            }
        }));
    }

    /// Cancel the timer if one is running
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Pointer entered the slider: pause
    pub fn pointer_enter(&mut self) {
        self.stop();
    }

    /// Pointer left the slider: resume when there is something to show
    pub fn pointer_leave(&mut self) {
        if lock(&self.state).item_count() > 0 {
            self.start();
        }
    }

    pub fn next(&mut self) -> usize {
        self.update(SliderState::next)
    }

    pub fn prev(&mut self) -> usize {
        self.update(SliderState::prev)
    }

    pub fn seek(&mut self, position: f64, track_width: f64) -> usize {
        self.update(|state| state.seek(position, track_width))
    }

    fn update(&mut self, f: impl FnOnce(&mut SliderState) -> usize) -> usize {
        let index = f(&mut lock(&self.state));
        self.index_tx.send_replace(index);
        index
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(state: &Mutex<SliderState>) -> MutexGuard<'_, SliderState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}
