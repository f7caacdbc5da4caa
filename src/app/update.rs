use crate::app::Model;
use crate::app::model::ToastLevel;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Navigation
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),
    /// Scroll up one page
    PageUp,
    /// Scroll down one page
    PageDown,
    /// Scroll up half page
    HalfPageUp,
    /// Scroll down half page
    HalfPageDown,
    /// Go to beginning of document
    GoToTop,
    /// Go to end of document
    GoToBottom,

    // Document
    /// Toggle the diagnostics panel
    ToggleDiagnostics,
    /// Run the repair cycle on the current source
    Repair,
    /// Toggle file watching
    ToggleWatch,
    /// File changed externally, reload
    FileChanged,
    /// Force reload file
    ForceReload,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// File I/O side effects (reload, watcher rebuild) live in the event loop.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Navigation
        Message::ScrollUp(n) => model.viewport.scroll_up(n),
        Message::ScrollDown(n) => model.viewport.scroll_down(n),
        Message::PageUp => model.viewport.page_up(),
        Message::PageDown => model.viewport.page_down(),
        Message::HalfPageUp => model.viewport.half_page_up(),
        Message::HalfPageDown => model.viewport.half_page_down(),
        Message::GoToTop => model.viewport.go_to_top(),
        Message::GoToBottom => model.viewport.go_to_bottom(),

        // Document
        Message::ToggleDiagnostics => {
            model.diagnostics_visible = !model.diagnostics_visible;
        }
        Message::Repair => {
            let residual = model.apply_repair();
            if residual == 0 {
                model.show_toast(ToastLevel::Info, "Repaired: no diagnostics remain");
            } else {
                model.show_toast(
                    ToastLevel::Warning,
                    format!("Repaired: {residual} diagnostics remain"),
                );
            }
        }
        Message::ToggleWatch => {
            model.watch_enabled = !model.watch_enabled;
            let note = if model.watch_enabled {
                "Watching for changes"
            } else {
                "Watch disabled"
            };
            model.show_toast(ToastLevel::Info, note);
        }
        // Reload happens in the event loop; nothing to do here.
        Message::FileChanged | Message::ForceReload => {}

        // Window
        Message::Resize(width, height) => {
            model.viewport.resize(width, height.saturating_sub(1));
            model.relayout();
        }
        Message::Redraw => {}

        // Application
        Message::Quit => model.should_quit = true,
    }

    // Any change in visible rows may admit new pages.
    model.sync_window();
    model
}
