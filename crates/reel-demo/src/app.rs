#![forbid(unsafe_code)]

//! The host loop.
//!
//! One thread, one loop: wait for terminal input or the gesture-lock
//! deadline, whichever comes first, feed the viewer, settle queued play
//! requests, and repaint when the overlay changed.

use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event;
use reel_runtime::FeedViewer;
use web_time::Instant;

use crate::input::{Action, HitMap, map_event};
use crate::surface::TerminalSurface;
use crate::view;

/// Upper bound on one input wait when no lock deadline is pending.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Owns the viewer and the state the loop needs between events.
#[derive(Debug)]
pub struct App {
    viewer: FeedViewer<TerminalSurface>,
    hits: HitMap,
    dirty: Rc<Cell<bool>>,
}

/// Whether the loop should keep running after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl App {
    #[must_use]
    pub fn new(viewer: FeedViewer<TerminalSurface>) -> Self {
        Self {
            viewer,
            hits: HitMap { unmute_row: None },
            dirty: Rc::new(Cell::new(true)),
        }
    }

    /// Run until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or painting fails.
    pub fn run(&mut self) -> io::Result<()> {
        let flag = Rc::clone(&self.dirty);
        let _redraw = self.viewer.observe().subscribe(move |_| flag.set(true));
        let mut stdout = io::stdout();

        self.settle();
        loop {
            if self.dirty.replace(false) {
                let (width, height) = crossterm::terminal::size()?;
                let frame = view::compose(
                    &self.viewer.overlay(),
                    self.viewer.controller().surface().now_playing(),
                    width,
                    height,
                );
                self.hits = frame.hits;
                view::paint(&mut stdout, &frame)?;
            }

            let timeout = self
                .viewer
                .next_deadline()
                .map_or(IDLE_POLL, |at| at.saturating_duration_since(Instant::now()));
            if event::poll(timeout)? {
                let ev = event::read()?;
                if self.apply(map_event(&ev, self.hits), Instant::now()) == Flow::Quit {
                    return Ok(());
                }
            } else {
                self.viewer.tick(Instant::now());
            }
        }
    }

    /// Apply one mapped action at `now`.
    pub fn apply(&mut self, action: Action, now: Instant) -> Flow {
        // Drop an expired lock before judging new input against it.
        self.viewer.tick(now);
        match action {
            Action::Quit => return Flow::Quit,
            Action::Input(input) => {
                self.viewer.controller_mut().surface_mut().activate();
                self.viewer.handle_input(input, now);
            }
            Action::Unmute => {
                self.viewer.controller_mut().surface_mut().activate();
                self.viewer.request_unmute();
            }
            Action::Redraw => self.dirty.set(true),
            Action::Ignore => {}
        }
        self.settle();
        Flow::Continue
    }

    /// Hand every queued play outcome back to the viewer.
    ///
    /// Resolving an unmute can issue another play, so drain until quiet.
    fn settle(&mut self) {
        loop {
            let outcomes = self.viewer.controller_mut().surface_mut().drain_outcomes();
            if outcomes.is_empty() {
                break;
            }
            for (id, outcome) in outcomes {
                self.viewer.resolve_play(id, outcome);
            }
            // Surface state (playing / muted) shows in the frame.
            self.dirty.set(true);
        }
    }

    #[must_use]
    pub fn viewer(&self) -> &FeedViewer<TerminalSurface> {
        &self.viewer
    }
}
