use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::DefaultTerminal;
use tracing::{debug, warn};

use crate::app::{App, Message, Model, ToastLevel, update};
use crate::watcher::FileWatcher;

/// Debounce for file change notifications.
const WATCH_DEBOUNCE: Duration = Duration::from_millis(200);

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

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization, reading the file, or the
    /// event loop encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - markwell requires an interactive terminal")?;
        let size = terminal.size()?;

        let source = std::fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;

        let mut model = Model::new(
            self.file_path.clone(),
            source,
            (size.width, size.height),
            self.strategy,
            self.nodes_per_page,
        );
        model.watch_enabled = self.watch_enabled;
        if self.fix_enabled {
            let residual = model.apply_repair();
            debug!(residual, "initial repair cycle");
        }

        let result = Self::event_loop(&mut terminal, &mut model);

        ratatui::restore();

        result
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut file_watcher = if model.watch_enabled {
            match FileWatcher::new(&model.file_path, WATCH_DEBOUNCE) {
                Ok(watcher) => Some(watcher),
                Err(err) => {
                    model.watch_enabled = false;
                    model.show_toast(ToastLevel::Warning, format!("Watch unavailable: {err}"));
                    warn!(path = %model.file_path.display(), error = %err, "watcher failed");
                    None
                }
            }
        } else {
            None
        };
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                debug!(width, height, "applying debounced resize");
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            if model.watch_enabled
                && file_watcher
                    .as_mut()
                    .is_some_and(FileWatcher::take_change_ready)
            {
                *model = update(std::mem::take(model), Message::FileChanged);
                Self::handle_message_side_effects(model, &mut file_watcher, &Message::FileChanged);
                needs_render = true;
            }

            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending() {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                let msg = Self::handle_event(&event::read()?, event_ms, &mut resize_debouncer);
                if let Some(msg) = msg {
                    let side_msg = msg.clone();
                    *model = update(std::mem::take(model), msg);
                    Self::handle_message_side_effects(model, &mut file_watcher, &side_msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let msg = Self::handle_event(&event::read()?, drain_ms, &mut resize_debouncer);
                    if let Some(msg) = msg {
                        let side_msg = msg.clone();
                        *model = update(std::mem::take(model), msg);
                        Self::handle_message_side_effects(model, &mut file_watcher, &side_msg);
                        needs_render = true;
                    }
                }
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }

    /// File I/O and watcher lifecycle effects the pure update cannot do.
    fn handle_message_side_effects(
        model: &mut Model,
        file_watcher: &mut Option<FileWatcher>,
        msg: &Message,
    ) {
        match msg {
            Message::FileChanged | Message::ForceReload => {
                match model.reload_from_disk() {
                    Ok(()) => {
                        if matches!(msg, Message::FileChanged) {
                            model.show_toast(ToastLevel::Info, "Reloaded");
                        }
                    }
                    Err(err) => {
                        model.show_toast(ToastLevel::Error, format!("Reload failed: {err}"));
                    }
                }
            }
            Message::ToggleWatch => {
                if model.watch_enabled {
                    match FileWatcher::new(&model.file_path, WATCH_DEBOUNCE) {
                        Ok(watcher) => *file_watcher = Some(watcher),
                        Err(err) => {
                            model.watch_enabled = false;
                            model.show_toast(
                                ToastLevel::Warning,
                                format!("Watch unavailable: {err}"),
                            );
                        }
                    }
                } else {
                    *file_watcher = None;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_debouncer_waits_for_delay() {
        let mut debouncer = ResizeDebouncer::new(100);
        debouncer.queue(120, 40, 0);
        assert!(debouncer.take_ready(50).is_none());
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.take_ready(100), Some((120, 40)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_resize_debouncer_keeps_latest_size() {
        let mut debouncer = ResizeDebouncer::new(100);
        debouncer.queue(120, 40, 0);
        debouncer.queue(90, 30, 60);
        assert!(debouncer.take_ready(110).is_none());
        assert_eq!(debouncer.take_ready(160), Some((90, 30)));
    }
}
