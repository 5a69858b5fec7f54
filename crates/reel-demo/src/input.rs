#![forbid(unsafe_code)]

//! Terminal input to viewer input.
//!
//! | Terminal | Viewer |
//! |---|---|
//! | wheel down / up | `Wheel { ±WHEEL_STEP }` |
//! | left press / release | `DragStart` / `DragEnd`, rows scaled to pixels |
//! | `j` `Down` / `k` `Up` | wheel step |
//! | `m` `Enter`, press on the affordance row | unmute |
//! | `q` `Esc` `Ctrl-C` | quit |

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use reel_core::InputEvent;

/// Wheel delta reported per notch or key press.
pub const WHEEL_STEP: f32 = 100.0;

/// Pixels per terminal row when converting drags.
pub const ROW_PX: f32 = 16.0;

/// What the host loop should do with one terminal event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Input(InputEvent),
    Unmute,
    Redraw,
    Quit,
    Ignore,
}

/// Screen facts the mapping depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitMap {
    /// Row of the "enable sound" affordance, when it is shown.
    pub unmute_row: Option<u16>,
}

#[must_use]
pub fn map_event(event: &Event, hits: HitMap) -> Action {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => map_mouse(mouse, hits),
        Event::Resize(..) => Action::Redraw,
        _ => Action::Ignore,
    }
}

fn map_key(key: &KeyEvent) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::Ignore;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down | KeyCode::PageDown => Action::Input(InputEvent::Wheel {
            delta_y: WHEEL_STEP,
        }),
        KeyCode::Char('k') | KeyCode::Up | KeyCode::PageUp => Action::Input(InputEvent::Wheel {
            delta_y: -WHEEL_STEP,
        }),
        KeyCode::Char('m') | KeyCode::Enter => Action::Unmute,
        _ => Action::Ignore,
    }
}

fn map_mouse(mouse: &MouseEvent, hits: HitMap) -> Action {
    let y = f32::from(mouse.row) * ROW_PX;
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::Input(InputEvent::Wheel {
            delta_y: WHEEL_STEP,
        }),
        MouseEventKind::ScrollUp => Action::Input(InputEvent::Wheel {
            delta_y: -WHEEL_STEP,
        }),
        MouseEventKind::Down(MouseButton::Left) if hits.unmute_row == Some(mouse.row) => {
            Action::Unmute
        }
        MouseEventKind::Down(MouseButton::Left) => Action::Input(InputEvent::DragStart { y }),
        MouseEventKind::Up(MouseButton::Left) => Action::Input(InputEvent::DragEnd { y }),
        _ => Action::Ignore,
    }
}
