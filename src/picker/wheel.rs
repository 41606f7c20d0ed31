//! Magnitude picker — a snap-to-integer scrolling wheel over `[min, max]`.
//!
//! The wheel is a headless model: the host feeds it scroll offsets and
//! gesture boundaries, and renders whatever `render_window` returns. Row `i`
//! holds value `min + i` and is centered when the offset is `i * item_extent`.
//!
//! A picker is never re-targeted. When the bounds change (unit toggle), the
//! owner drops it and builds a new one, so no scroll or emphasis state
//! survives across ranges.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use crate::config::WizardConfig;
use crate::error::PickerError;
use crate::onboarding::collaborators::HapticSink;
use crate::onboarding::steps::LabelFormat;
use crate::units::{ValueRange, format_feet_inches};

use super::recenter::{CommandSender, PickerCommand, RecenterTimer};
use super::window::{Emphasis, PickerItem, visible_window};

/// Formats a row value for display.
pub type LabelFormatter = Arc<dyn Fn(i32) -> String + Send + Sync>;

/// Default formatter: plain integer.
pub fn plain_label() -> LabelFormatter {
    Arc::new(|value: i32| value.to_string())
}

/// Formatter for inch values shown as `feet'inches"`.
pub fn feet_inches_label() -> LabelFormatter {
    Arc::new(format_feet_inches)
}

impl LabelFormat {
    pub fn formatter(self) -> LabelFormatter {
        match self {
            Self::Plain => plain_label(),
            Self::FeetInches => feet_inches_label(),
        }
    }
}

/// Where the user is in a scroll gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    Idle,
    Dragging,
    Momentum,
}

/// Emitted when a settle commits a value different from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueChanged {
    pub picker: Uuid,
    pub value: i32,
}

/// Result of settling at an offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettleOutcome {
    /// Value under the center line after snapping.
    pub value: i32,
    /// Offset the wheel was snapped to.
    pub snapped_offset: f32,
    /// Set only when `value` differs from the previously committed value.
    pub changed: Option<ValueChanged>,
}

/// Pure commit rule: returns the new committed value and whether it changed.
pub fn commit_transition(previous: i32, settled: i32) -> (i32, bool) {
    (settled, settled != previous)
}

/// Construction inputs for a picker.
#[derive(Debug, Clone, Copy)]
pub struct PickerSpec {
    pub range: ValueRange,
    pub initial_value: i32,
    pub item_extent: f32,
}

pub struct MagnitudePicker {
    id: Uuid,
    range: ValueRange,
    item_extent: f32,
    viewport_items: usize,
    overscan: usize,
    velocity_epsilon: f32,
    offset: f32,
    center_index: usize,
    committed: i32,
    phase: ScrollPhase,
    formatter: LabelFormatter,
    haptics: Arc<dyn HapticSink>,
    recenter: Option<RecenterTimer>,
}

impl fmt::Debug for MagnitudePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MagnitudePicker")
            .field("id", &self.id)
            .field("range", &self.range)
            .field("offset", &self.offset)
            .field("center_index", &self.center_index)
            .field("committed", &self.committed)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl MagnitudePicker {
    /// Build a picker positioned on `spec.initial_value`.
    ///
    /// Positioning is programmatic and emits no change event.
    pub fn new(
        spec: PickerSpec,
        config: &WizardConfig,
        formatter: LabelFormatter,
        haptics: Arc<dyn HapticSink>,
    ) -> Result<Self, PickerError> {
        let PickerSpec {
            range,
            initial_value,
            item_extent,
        } = spec;
        if !range.is_valid() {
            return Err(PickerError::InvertedRange {
                min: range.min,
                max: range.max,
            });
        }
        if !range.contains(initial_value) {
            return Err(PickerError::InitialOutOfRange {
                value: initial_value,
                min: range.min,
                max: range.max,
            });
        }
        if !item_extent.is_finite() || item_extent <= 0.0 {
            return Err(PickerError::InvalidItemExtent(item_extent));
        }

        let index = (i64::from(initial_value) - i64::from(range.min)) as usize;
        let picker = Self {
            id: Uuid::new_v4(),
            range,
            item_extent,
            viewport_items: config.viewport_items,
            overscan: config.overscan,
            velocity_epsilon: config.velocity_epsilon,
            offset: index as f32 * item_extent,
            center_index: index,
            committed: initial_value,
            phase: ScrollPhase::Idle,
            formatter,
            haptics,
            recenter: None,
        };
        debug!(picker_id = %picker.id, range = %range, initial_value, "Picker mounted");
        Ok(picker)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn range(&self) -> ValueRange {
        self.range
    }

    pub fn item_extent(&self) -> f32 {
        self.item_extent
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    /// Last committed value.
    pub fn value(&self) -> i32 {
        self.committed
    }

    /// Index currently under the center line (live, not committed).
    pub fn center_index(&self) -> usize {
        self.center_index
    }

    /// Value currently under the center line (live, not committed).
    pub fn centered_value(&self) -> i32 {
        self.value_at(self.center_index)
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Value of row `index`. Indices past the end read as `max`.
    pub fn value_at(&self, index: usize) -> i32 {
        let index = i64::try_from(index).unwrap_or(i64::MAX);
        let value = i64::from(self.range.min).saturating_add(index);
        value.min(i64::from(self.range.max)) as i32
    }

    /// Offset that centers `value`, after clamping it into range.
    pub fn offset_for_value(&self, value: i32) -> f32 {
        let index = i64::from(self.range.clamp(value)) - i64::from(self.range.min);
        index as f32 * self.item_extent
    }

    /// Row index nearest to `offset`, clamped to the list.
    pub fn index_for_offset(&self, offset: f32) -> usize {
        let last = self.len() - 1;
        if !offset.is_finite() {
            return if offset > 0.0 { last } else { 0 };
        }
        let raw = (offset / self.item_extent).round();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(last)
        }
    }

    pub fn label(&self, value: i32) -> String {
        (self.formatter)(value)
    }

    /// The finger went down. A pending mount re-center is dropped so it
    /// cannot yank the wheel away from the gesture.
    pub fn begin_drag(&mut self) {
        self.cancel_recenter();
        self.phase = ScrollPhase::Dragging;
    }

    /// Track a scroll position update. Only moves the live center; nothing
    /// is committed until the gesture settles.
    pub fn scroll_to(&mut self, offset: f32) -> usize {
        self.offset = offset;
        self.center_index = self.index_for_offset(offset);
        self.center_index
    }

    /// The finger lifted. Settles now unless there is momentum to play out.
    pub fn end_drag(&mut self, offset: f32, velocity: f32) -> Option<SettleOutcome> {
        self.scroll_to(offset);
        if velocity.abs() > self.velocity_epsilon {
            self.phase = ScrollPhase::Momentum;
            None
        } else {
            Some(self.settle(offset))
        }
    }

    /// Momentum finished at `offset`.
    pub fn end_momentum(&mut self, offset: f32) -> SettleOutcome {
        self.settle(offset)
    }

    /// Snap to the row nearest `offset` and commit its value.
    ///
    /// Settling twice on the same row reports a change only the first time.
    pub fn settle(&mut self, offset: f32) -> SettleOutcome {
        let index = self.index_for_offset(offset);
        let snapped_offset = index as f32 * self.item_extent;
        self.offset = snapped_offset;
        self.center_index = index;
        self.phase = ScrollPhase::Idle;

        let settled = self.value_at(index);
        let (committed, changed) = commit_transition(self.committed, settled);
        self.committed = committed;

        let changed = if changed {
            self.haptics.tick();
            debug!(picker_id = %self.id, value = committed, "Picker value committed");
            Some(ValueChanged {
                picker: self.id,
                value: committed,
            })
        } else {
            None
        };

        SettleOutcome {
            value: committed,
            snapped_offset,
            changed,
        }
    }

    /// Move the wheel back onto the committed value without emitting.
    pub fn recenter(&mut self) {
        self.offset = self.offset_for_value(self.committed);
        self.center_index = self.index_for_offset(self.offset);
        self.phase = ScrollPhase::Idle;
        self.recenter = None;
    }

    /// Arrange for a re-center after `delay`. Outside a tokio runtime the
    /// re-center happens immediately.
    pub fn schedule_recenter(&mut self, delay: Duration, tx: CommandSender) {
        match RecenterTimer::spawn(self.id, delay, tx) {
            Some(timer) => self.recenter = Some(timer),
            None => self.recenter(),
        }
    }

    pub fn has_pending_recenter(&self) -> bool {
        self.recenter.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel a pending re-center, if any.
    pub fn cancel_recenter(&mut self) {
        if let Some(timer) = self.recenter.take() {
            timer.cancel();
        }
    }

    /// Apply a command from the event loop. Returns false when the command
    /// targets a different picker instance, or is a re-center arriving
    /// while a gesture is in progress.
    pub fn apply(&mut self, command: PickerCommand) -> bool {
        if command.picker_id() != self.id {
            debug!(
                picker_id = %self.id,
                stale = %command.picker_id(),
                "Ignoring stale picker command"
            );
            return false;
        }
        match command {
            PickerCommand::Recenter { .. } => {
                if self.phase != ScrollPhase::Idle {
                    debug!(
                        picker_id = %self.id,
                        phase = ?self.phase,
                        "Re-center skipped mid-gesture"
                    );
                    self.recenter = None;
                    return false;
                }
                self.recenter();
            }
        }
        true
    }

    pub fn emphasis(&self, index: usize) -> Emphasis {
        Emphasis::from_distance(index.abs_diff(self.center_index))
    }

    /// Absolute indices worth realizing around the live center.
    pub fn visible_window(&self) -> Range<usize> {
        visible_window(self.center_index, self.len(), self.viewport_items, self.overscan)
    }

    /// Realized rows for the current window, keyed by absolute index.
    pub fn render_window(&self) -> Vec<PickerItem> {
        self.visible_window()
            .map(|index| {
                let value = self.value_at(index);
                PickerItem {
                    key: index,
                    value,
                    label: self.label(value),
                    emphasis: self.emphasis(index),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::picker::recenter::command_channel;

    #[derive(Default)]
    struct CountingHaptics(AtomicUsize);

    impl HapticSink for CountingHaptics {
        fn tick(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn make_picker(min: i32, max: i32, initial: i32) -> (MagnitudePicker, Arc<CountingHaptics>) {
        let haptics = Arc::new(CountingHaptics::default());
        let picker = MagnitudePicker::new(
            PickerSpec {
                range: ValueRange::new(min, max),
                initial_value: initial,
                item_extent: 40.0,
            },
            &WizardConfig::default(),
            plain_label(),
            haptics.clone(),
        )
        .unwrap();
        (picker, haptics)
    }

    #[test]
    fn mounts_centered_on_initial_value() {
        let (picker, haptics) = make_picker(120, 220, 165);
        assert_eq!(picker.offset(), 45.0 * 40.0);
        assert_eq!(picker.centered_value(), 165);
        assert_eq!(picker.value(), 165);
        assert_eq!(haptics.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn rejects_bad_construction() {
        let haptics: Arc<dyn HapticSink> = Arc::new(CountingHaptics::default());
        let config = WizardConfig::default();
        let inverted = MagnitudePicker::new(
            PickerSpec {
                range: ValueRange::new(10, 5),
                initial_value: 7,
                item_extent: 40.0,
            },
            &config,
            plain_label(),
            haptics.clone(),
        );
        assert!(matches!(inverted, Err(PickerError::InvertedRange { .. })));

        let outside = MagnitudePicker::new(
            PickerSpec {
                range: ValueRange::new(0, 5),
                initial_value: 9,
                item_extent: 40.0,
            },
            &config,
            plain_label(),
            haptics.clone(),
        );
        assert!(matches!(outside, Err(PickerError::InitialOutOfRange { .. })));

        let flat = MagnitudePicker::new(
            PickerSpec {
                range: ValueRange::new(0, 5),
                initial_value: 1,
                item_extent: 0.0,
            },
            &config,
            plain_label(),
            haptics,
        );
        assert!(matches!(flat, Err(PickerError::InvalidItemExtent(_))));
    }

    #[test]
    fn scrolling_moves_live_center_without_committing() {
        let (mut picker, haptics) = make_picker(0, 100, 10);
        picker.begin_drag();
        assert_eq!(picker.scroll_to(419.0), 10);
        assert_eq!(picker.scroll_to(421.0), 11);
        assert_eq!(picker.centered_value(), 11);
        assert_eq!(picker.value(), 10);
        assert_eq!(picker.phase(), ScrollPhase::Dragging);
        assert_eq!(haptics.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn center_index_is_clamped_to_the_list() {
        let (mut picker, _) = make_picker(0, 10, 5);
        assert_eq!(picker.scroll_to(-300.0), 0);
        assert_eq!(picker.scroll_to(10_000.0), 10);
        assert_eq!(picker.scroll_to(f32::INFINITY), 10);
        assert_eq!(picker.scroll_to(f32::NAN), 0);
    }

    #[test]
    fn settle_snaps_and_commits() {
        let (mut picker, haptics) = make_picker(0, 100, 10);
        let outcome = picker.settle(493.0);
        assert_eq!(outcome.value, 12);
        assert_eq!(outcome.snapped_offset, 480.0);
        assert_eq!(picker.offset(), 480.0);
        assert_eq!(
            outcome.changed,
            Some(ValueChanged {
                picker: picker.id(),
                value: 12
            })
        );
        assert_eq!(haptics.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn settling_twice_at_same_offset_emits_once() {
        let (mut picker, haptics) = make_picker(0, 100, 10);
        assert!(picker.settle(600.0).changed.is_some());
        assert!(picker.settle(600.0).changed.is_none());
        assert_eq!(haptics.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn settling_on_initial_value_is_silent() {
        let (mut picker, haptics) = make_picker(0, 100, 10);
        assert!(picker.settle(401.0).changed.is_none());
        assert_eq!(haptics.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn commit_transition_reports_change() {
        assert_eq!(commit_transition(5, 5), (5, false));
        assert_eq!(commit_transition(5, 6), (6, true));
    }

    #[test]
    fn slow_release_settles_fast_release_coasts() {
        let (mut picker, _) = make_picker(0, 100, 10);
        picker.begin_drag();
        assert!(picker.end_drag(520.0, 0.0).is_some());

        picker.begin_drag();
        assert!(picker.end_drag(600.0, 900.0).is_none());
        assert_eq!(picker.phase(), ScrollPhase::Momentum);
        let outcome = picker.end_momentum(1_205.0);
        assert_eq!(outcome.value, 30);
        assert_eq!(picker.phase(), ScrollPhase::Idle);
    }

    #[test]
    fn render_window_keys_and_emphasis() {
        let (picker, _) = make_picker(120, 220, 165);
        let items = picker.render_window();
        assert_eq!(items.first().unwrap().key, 40);
        assert_eq!(items.last().unwrap().key, 50);

        let centered: Vec<_> = items
            .iter()
            .filter(|i| i.emphasis == Emphasis::Full)
            .collect();
        assert_eq!(centered.len(), 1);
        assert_eq!(centered[0].value, 165);

        let strong: Vec<i32> = items
            .iter()
            .filter(|i| i.emphasis == Emphasis::Strong)
            .map(|i| i.value)
            .collect();
        assert_eq!(strong, vec![164, 166]);
    }

    #[test]
    fn custom_formatter_is_used_for_labels() {
        let picker = MagnitudePicker::new(
            PickerSpec {
                range: ValueRange::new(48, 87),
                initial_value: 65,
                item_extent: 40.0,
            },
            &WizardConfig::default(),
            feet_inches_label(),
            Arc::new(CountingHaptics::default()),
        )
        .unwrap();
        assert_eq!(picker.label(picker.value()), "5'5\"");
    }

    #[test]
    fn recenter_restores_committed_position_silently() {
        let (mut picker, haptics) = make_picker(0, 100, 10);
        picker.scroll_to(0.0);
        picker.recenter();
        assert_eq!(picker.offset(), 400.0);
        assert_eq!(picker.center_index(), 10);
        assert_eq!(haptics.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn stale_commands_are_ignored() {
        let (mut picker, _) = make_picker(0, 100, 10);
        picker.scroll_to(0.0);
        let stale = PickerCommand::Recenter {
            picker: Uuid::new_v4(),
        };
        assert!(!picker.apply(stale));
        assert_eq!(picker.offset(), 0.0);

        let own = PickerCommand::Recenter { picker: picker.id() };
        assert!(picker.apply(own));
        assert_eq!(picker.offset(), 400.0);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_recenter_arrives_for_this_picker() {
        let (mut picker, _) = make_picker(0, 100, 10);
        let (tx, mut rx) = command_channel();
        picker.schedule_recenter(Duration::from_millis(50), tx);
        assert!(picker.has_pending_recenter());

        picker.scroll_to(0.0);
        let cmd = rx.recv().await.unwrap();
        assert!(picker.apply(cmd));
        assert_eq!(picker.offset(), 400.0);
        assert!(!picker.has_pending_recenter());
    }

    #[tokio::test(start_paused = true)]
    async fn drag_before_recenter_cancels_it() {
        let (mut picker, _) = make_picker(0, 100, 10);
        let (tx, mut rx) = command_channel();
        picker.schedule_recenter(Duration::from_millis(50), tx);

        picker.begin_drag();
        assert!(!picker.has_pending_recenter());
        picker.scroll_to(1_200.0);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(picker.phase(), ScrollPhase::Dragging);
        assert_eq!(picker.centered_value(), 30);
    }

    #[test]
    fn queued_recenter_is_skipped_mid_gesture() {
        let (mut picker, _) = make_picker(0, 100, 10);
        picker.begin_drag();
        picker.scroll_to(1_200.0);

        assert!(!picker.apply(PickerCommand::Recenter { picker: picker.id() }));
        assert_eq!(picker.phase(), ScrollPhase::Dragging);
        assert_eq!(picker.offset(), 1_200.0);

        picker.settle(1_200.0);
        assert!(picker.apply(PickerCommand::Recenter { picker: picker.id() }));
        assert_eq!(picker.offset(), 1_200.0);
    }

    #[test]
    fn full_width_range_maps_rows_without_overflow() {
        let (picker, _) = make_picker(i32::MIN, i32::MAX, 0);
        let last = picker.len() - 1;
        assert_eq!(picker.value_at(0), i32::MIN);
        assert_eq!(picker.value_at(last), i32::MAX);
        assert_eq!(picker.value_at(usize::MAX), i32::MAX);
        assert_eq!(picker.centered_value(), 0);
        assert!(picker.offset_for_value(i32::MAX) > 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_picker_cancels_recenter() {
        let (mut picker, _) = make_picker(0, 100, 10);
        let (tx, mut rx) = command_channel();
        picker.schedule_recenter(Duration::from_millis(50), tx);
        drop(picker);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn schedule_outside_runtime_recenters_immediately() {
        let (mut picker, _) = make_picker(0, 100, 10);
        let (tx, _rx) = command_channel();
        picker.scroll_to(0.0);
        picker.schedule_recenter(Duration::from_millis(50), tx);
        assert_eq!(picker.offset(), 400.0);
        assert!(!picker.has_pending_recenter());
    }
}
