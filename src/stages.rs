/// Presentation stages and shared palette.
use bevy::prelude::*;
use strum::Display;

/// Phases of the intro/dashboard sequence. Advances Galaxy → Earth →
/// Dashboard under the sequencer's timers, or jumps straight to Dashboard
/// via the skip control. Dashboard is terminal.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Stage {
    #[default]
    Galaxy,
    Earth,
    Dashboard,
}

pub const ACCENT_GREEN: Color = Color::srgb(0.0, 1.0, 0.53);
pub const ALERT_RED: Color = Color::srgb(1.0, 0.24, 0.24);
