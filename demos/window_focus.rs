//! Window Focus Example - Two windows, buttons and a status line
//!
//! This example demonstrates everything working together:
//! - Anchored windows with borders and titles
//! - Buttons inside root containers (Tab / Shift+Tab)
//! - Window focus chain (F2 / Shift+F2)
//! - Log output through tracing (set RUST_LOG, written to termwin.log)
//!
//! Run with: cargo run --example window_focus
//! Quit with Ctrl+Q

use std::cell::Cell;
use std::fs::File;
use std::rc::Rc;
use std::sync::Mutex;

use termwin::{
    Anchor, Attr, Button, Color, CrosstermBackend, Label, Opc, Side, Style, Tui, TuiConfig,
    WindowConfig,
};
use tracing_subscriber::EnvFilter;

fn main() -> termwin::Result<()> {
    if let Ok(file) = File::create("termwin.log") {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let mut backend = CrosstermBackend::stdout()?;
    backend.enter()?;
    let mut tui = Tui::new(backend, TuiConfig::default())?;

    let pair = tui.init_color_pair(Color::Cyan, Color::Reset);
    let accent = tui.color_pair(pair).map(|p| p.style()).unwrap_or_default();

    // Left pane: fills the top-left of the screen
    let (left, left_root) = tui.create_window_with_container(
        WindowConfig::new(
            Opc::new()
                .anchor_top(Anchor::parent(Side::Top))
                .anchor_bottom(Anchor::parent(Side::Bottom).with_pad(-3))
                .anchor_left(Anchor::parent(Side::Left))
                .anchor_right(Anchor::parent(Side::Center)),
        )
        .name("actions")
        .border(true)
        .border_style(accent)
        .title("Actions"),
    )?;

    // Right pane: anchored to the left pane's right edge
    let (right, right_root) = tui.create_window_with_container(
        WindowConfig::new(
            Opc::new()
                .anchor_top(Anchor::parent(Side::Top))
                .anchor_bottom(Anchor::parent(Side::Bottom).with_pad(-3))
                .anchor_left(Anchor::window(left, Side::Right))
                .anchor_right(Anchor::parent(Side::Right)),
        )
        .name("details")
        .border(true)
        .title("Details"),
    )?;

    // Status line: not focusable
    let status = tui.create_window(
        WindowConfig::new(
            Opc::new()
                .anchor_top(Anchor::parent(Side::Bottom).with_pad(-3))
                .anchor_bottom(Anchor::parent(Side::Bottom))
                .anchor_left(Anchor::parent(Side::Left))
                .anchor_right(Anchor::parent(Side::Right)),
        )
        .border(true)
        .focusable(false),
    )?;

    let counter = Rc::new(Cell::new(0u32));
    if let Some(container) = tui
        .window_mut(left)
        .and_then(|w| w.find_widget_mut(left_root))
        .and_then(|w| w.as_container_mut())
    {
        for (row, name) in ["increment", "reset"].into_iter().enumerate() {
            let counter = counter.clone();
            let button = Button::new(Opc::fixed(1, 16, 1 + row as i32 * 2, 2), name).on_press(move || {
                if name == "reset" {
                    counter.set(0);
                } else {
                    counter.set(counter.get() + 1);
                }
            });
            container.add_widget(Box::new(button))?;
        }
    }

    if let Some(container) = tui
        .window_mut(right)
        .and_then(|w| w.find_widget_mut(right_root))
        .and_then(|w| w.as_container_mut())
    {
        let heading = Label::new(Opc::fixed(1, 30, 0, 1), "termwin demo")
            .with_style(Style::default().with_attrs(Attr::BOLD));
        let help = Label::new(
            Opc::fixed(4, 40, 2, 1),
            "Tab/Shift+Tab: next button\nF2/Shift+F2: next window\nEnter/Space: press\nCtrl+Q: quit",
        );
        container.add_widget(Box::new(heading))?;
        container.add_widget(Box::new(help))?;
        container.add_widget(Box::new(Button::new(Opc::fixed(1, 12, 7, 1), "noop")))?;
    }

    tui.init_focus_manager();
    tui.refresh_all_windows(true)?;

    while tui.is_running() {
        tui.tick()?;
        let text = format!(" count: {}", counter.get());
        if let Some(window) = tui.window_mut(status) {
            let buffer = window.buffer_mut();
            buffer.clear();
            buffer.draw_text(0, 0, &text, Style::default());
        }
        tui.refresh_window(status)?;
    }

    let mut backend = tui.destroy()?;
    backend.leave()?;
    Ok(())
}
