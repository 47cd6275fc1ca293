use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;
use ratatui_image::picker::Picker;

use crate::app::{App, Message, Model, update};
use crate::diagram::EXAMPLE_DIAGRAM;

/// Debounces terminal resize events so reflow work runs once per burst.
pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Debounces render attempts: each source edit re-arms the quiet period,
/// cancelling whatever was pending, so only the most recent edit's render
/// ever fires.
pub(super) struct RenderDebouncer {
    delay_ms: u64,
    pending: Option<u64>,
}

impl RenderDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Arm (or re-arm) the quiet period starting at `now_ms`.
    pub(super) const fn queue(&mut self, now_ms: u64) {
        self.pending = Some(now_ms);
    }

    /// Take the pending render if its quiet period has elapsed.
    pub(super) fn take_ready(&mut self, now_ms: u64) -> bool {
        let Some(queued_at) = self.pending else {
            return false;
        };
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub(super) const fn cancel(&mut self) {
        self.pending = None;
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Detect the terminal's graphics protocol, falling back to half-block cells.
pub(super) fn create_picker(force_half_cell: bool) -> Option<Picker> {
    if force_half_cell {
        return Some(Picker::halfblocks());
    }

    // On Windows, skip the stdio capability query — it can leave orphaned
    // reader threads on the console input buffer. Fall back to half-blocks.
    #[cfg(not(unix))]
    {
        return Some(Picker::halfblocks());
    }

    #[cfg(unix)]
    {
        let picker = Picker::from_query_stdio().unwrap_or_else(|_| Picker::halfblocks());
        tracing::debug!(
            term = std::env::var("TERM").unwrap_or_else(|_| "<unset>".to_string()),
            protocol = ?picker.protocol_type(),
            "graphics picker created"
        );
        Some(picker)
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        // Create image picker BEFORE initializing terminal (queries stdio)
        let picker = create_picker(self.force_half_cell);

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal — mermpad requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model =
            Model::new(EXAMPLE_DIAGRAM, (size.width, size.height)).with_picker(picker);

        // First render happens before the first frame so the session opens
        // on the example diagram, not an empty pane.
        super::effects::render_preview(&mut model);

        execute!(stdout(), EnableMouseCapture)?;
        let result = Self::event_loop(&mut terminal, &mut model, self.debounce_ms);

        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        debounce_ms: u64,
    ) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut render_debouncer = RenderDebouncer::new(debounce_ms);
        let mut needs_draw = true;

        loop {
            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_draw = true;
            }

            if render_debouncer.take_ready(now_ms) {
                *model = update(std::mem::take(model), Message::RenderDiagram);
                super::effects::handle_message_side_effects(model, &Message::RenderDiagram);
                needs_draw = true;
            }

            // Handle events
            let poll_ms = if needs_draw {
                0
            } else if resize_debouncer.is_pending() || render_debouncer.is_pending() {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Refresh timestamp after poll wait so debouncers use accurate times.
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                let msg =
                    super::input::handle_event(&event::read()?, model, event_ms, &mut resize_debouncer);
                if let Some(msg) = msg {
                    let side_msg = msg.clone();
                    *model = update(std::mem::take(model), msg);
                    super::effects::handle_message_side_effects(model, &side_msg);
                    if side_msg.mutates_source() {
                        render_debouncer.queue(event_ms);
                    } else if side_msg == Message::ClearSource {
                        // Cleared and re-rendered immediately; a pending
                        // debounced render would now be redundant.
                        render_debouncer.cancel();
                    }
                    needs_draw = true;
                }

                // Coalesce key repeat bursts into a single draw.
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let msg = super::input::handle_event(
                        &event::read()?,
                        model,
                        drain_ms,
                        &mut resize_debouncer,
                    );
                    if let Some(msg) = msg {
                        let side_msg = msg.clone();
                        *model = update(std::mem::take(model), msg);
                        super::effects::handle_message_side_effects(model, &side_msg);
                        if side_msg.mutates_source() {
                            render_debouncer.queue(drain_ms);
                        } else if side_msg == Message::ClearSource {
                            render_debouncer.cancel();
                        }
                        needs_draw = true;
                    }
                }
            }

            if needs_draw {
                // Rebuild the rasterized preview if the render attempt or the
                // viewport transform changed since the last frame.
                model.ensure_preview_protocol();
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_draw = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod debouncer_tests {
    use super::*;

    #[test]
    fn test_render_debouncer_waits_out_quiet_period() {
        let mut deb = RenderDebouncer::new(300);
        deb.queue(1000);
        assert!(deb.is_pending());
        assert!(!deb.take_ready(1100));
        assert!(deb.is_pending());
        assert!(deb.take_ready(1300));
        assert!(!deb.is_pending());
    }

    #[test]
    fn test_render_debouncer_requeue_restarts_window() {
        let mut deb = RenderDebouncer::new(300);
        deb.queue(1000);
        deb.queue(1250); // edit inside the window cancels the pending render
        assert!(!deb.take_ready(1300));
        assert!(deb.take_ready(1550));
    }

    #[test]
    fn test_render_debouncer_fires_once_per_burst() {
        let mut deb = RenderDebouncer::new(300);
        for t in [0_u64, 50, 100, 150, 200] {
            deb.queue(t);
        }
        assert!(deb.take_ready(500));
        // The burst produced exactly one ready event.
        assert!(!deb.take_ready(10_000));
    }

    #[test]
    fn test_render_debouncer_cancel_discards_pending() {
        let mut deb = RenderDebouncer::new(300);
        deb.queue(1000);
        deb.cancel();
        assert!(!deb.take_ready(5000));
    }

    #[test]
    fn test_resize_debouncer_keeps_latest_size() {
        let mut deb = ResizeDebouncer::new(100);
        deb.queue(100, 40, 0);
        deb.queue(120, 50, 50);
        assert_eq!(deb.take_ready(200), Some((120, 50)));
        assert_eq!(deb.take_ready(400), None);
    }
}
