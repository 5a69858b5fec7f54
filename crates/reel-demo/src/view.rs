#![forbid(unsafe_code)]

//! Frame composition and painting.
//!
//! [`compose`] is pure: it turns the overlay and what the surface is doing
//! into positioned text plus the [`HitMap`] the input mapping needs.
//! [`paint`] writes a composed frame with crossterm commands.

use std::io::{self, Write};

use crossterm::{cursor, queue, style, terminal};
use reel_runtime::Overlay;

use crate::input::HitMap;
use crate::surface::NowPlaying;

pub const UNMUTE_LABEL: &str = "[ Tap for sound ]";
pub const HELP: &str = "wheel/drag/j/k: scroll   m: sound   q: quit";

/// One line of text at a fixed position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placed {
    pub col: u16,
    pub row: u16,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<Placed>,
    pub hits: HitMap,
}

fn centered(width: u16, row: u16, text: String) -> Placed {
    let len = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    Placed {
        col: width.saturating_sub(len) / 2,
        row,
        text,
    }
}

/// Lay out one frame for a `width` x `height` terminal.
#[must_use]
pub fn compose(overlay: &Overlay, now: Option<&NowPlaying>, width: u16, height: u16) -> Frame {
    let mut lines = Vec::new();

    let indicator = overlay.indicator();
    let len = u16::try_from(indicator.len()).unwrap_or(u16::MAX);
    lines.push(Placed {
        col: width.saturating_sub(len + 1),
        row: 0,
        text: indicator,
    });

    let mid = height / 2;
    lines.push(centered(width, mid, overlay.clip.to_string()));
    if let Some(now) = now {
        let state = match (now.playing, now.muted) {
            (false, _) => "starting",
            (true, true) => "playing (muted)",
            (true, false) => "playing",
        };
        let looped = if now.looping { ", looping" } else { "" };
        lines.push(centered(width, mid + 1, format!("{state}{looped}")));
    }

    let mut unmute_row = None;
    if overlay.show_unmute() && height >= 3 {
        let row = height - 2;
        let label = if overlay.unmute_pending {
            "[ enabling sound... ]".to_string()
        } else {
            UNMUTE_LABEL.to_string()
        };
        lines.push(centered(width, row, label));
        unmute_row = Some(row);
    }

    if height >= 1 {
        lines.push(Placed {
            col: 0,
            row: height - 1,
            text: HELP.to_string(),
        });
    }

    Frame {
        lines,
        hits: HitMap { unmute_row },
    }
}

/// Clear the screen and write `frame`.
///
/// # Errors
///
/// Returns an error if the terminal cannot be written.
pub fn paint(out: &mut impl Write, frame: &Frame) -> io::Result<()> {
    queue!(out, terminal::Clear(terminal::ClearType::All))?;
    for line in &frame.lines {
        queue!(
            out,
            cursor::MoveTo(line.col, line.row),
            style::Print(&line.text)
        )?;
    }
    out.flush()
}
