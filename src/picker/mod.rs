//! Scrolling magnitude picker used by numeric wizard steps.

pub mod recenter;
pub mod wheel;
pub mod window;

pub use recenter::{CommandReceiver, CommandSender, PickerCommand, RecenterTimer, command_channel};
pub use wheel::{
    LabelFormatter, MagnitudePicker, PickerSpec, ScrollPhase, SettleOutcome, ValueChanged,
    commit_transition, feet_inches_label, plain_label,
};
pub use window::{Emphasis, PickerItem, visible_window};
