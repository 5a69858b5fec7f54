#![forbid(unsafe_code)]

//! Raw input events delivered by the host.
//!
//! Coordinates are vertical positions in whatever space the host measures
//! (CSS pixels, terminal rows scaled to pixels, ...). Thresholds in
//! [`GestureConfig`](crate::gesture::GestureConfig) are in the same units.
//!
//! # Design Notes
//!
//! - Pointer drags and touches are separate channels: a touch does not end
//!   a pointer drag and vice versa.
//! - Wheel deltas follow the browser convention: positive scrolls down,
//!   which reads as "next clip".

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer button pressed at vertical position `y`.
    DragStart {
        y: f32,
    },
    /// Pointer button released at vertical position `y`.
    DragEnd {
        y: f32,
    },
    /// Wheel scrolled by `delta_y`.
    Wheel {
        delta_y: f32,
    },
    /// Finger down at vertical position `y`.
    TouchStart {
        y: f32,
    },
    /// Finger lifted at vertical position `y`.
    TouchEnd {
        y: f32,
    },
}

impl InputEvent {
    /// Short, stable label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DragStart { .. } => "drag_start",
            Self::DragEnd { .. } => "drag_end",
            Self::Wheel { .. } => "wheel",
            Self::TouchStart { .. } => "touch_start",
            Self::TouchEnd { .. } => "touch_end",
        }
    }
}

/// Direction of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavIntent {
    /// Next clip (swipe up, wheel down).
    Forward,
    /// Previous clip (swipe down, wheel up).
    Backward,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels_are_distinct() {
        let events = [
            InputEvent::DragStart { y: 0.0 },
            InputEvent::DragEnd { y: 0.0 },
            InputEvent::Wheel { delta_y: 0.0 },
            InputEvent::TouchStart { y: 0.0 },
            InputEvent::TouchEnd { y: 0.0 },
        ];
        let mut kinds: Vec<&str> = events.iter().map(InputEvent::kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), events.len());
    }
}
