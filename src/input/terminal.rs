//! Keyboard source backed by crossterm.
//!
//! Translates terminal key events into [`KeyTransition`]s carrying the full set of held keys.
//! Terminals that implement the kitty keyboard protocol report releases; everywhere else a
//! press is followed by a synthetic release so momentary actions still see both edges.

use crate::error::{HotbindError, Result};
use crate::input::raw::{KeyTransition, RawInputEvent};
use crate::input::source::InputSource;
use ratatui::crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    MouseEventKind, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use ratatui::crossterm::{execute, terminal};
use std::collections::VecDeque;
use std::io;
use std::time::Duration;

/// Terminal-backed [`InputSource`].
#[derive(Debug, Default)]
pub struct TerminalSource {
    held: Vec<String>,
    pending: VecDeque<RawInputEvent>,
    clicks: VecDeque<(u16, u16)>,
    reports_releases: bool,
    quit_requested: bool,
}

impl TerminalSource {
    /// Source assuming no release reporting. See [`TerminalSource::enable_release_events`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the terminal to report key releases when it supports the kitty protocol.
    /// Returns whether release reporting is active.
    pub fn enable_release_events(&mut self) -> Result<bool> {
        let supported = terminal::supports_keyboard_enhancement()
            .map_err(|e| HotbindError::io("failed to query keyboard enhancement", e))?;
        if supported {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .map_err(|e| HotbindError::io("failed to enable key release events", e))?;
        }
        self.reports_releases = supported;
        log::debug!("terminal key release reporting: {supported}");
        Ok(supported)
    }

    /// Undo [`TerminalSource::enable_release_events`].
    pub fn disable_release_events(&mut self) -> Result<()> {
        if self.reports_releases {
            execute!(io::stdout(), PopKeyboardEnhancementFlags)
                .map_err(|e| HotbindError::io("failed to restore keyboard mode", e))?;
            self.reports_releases = false;
        }
        Ok(())
    }

    pub fn reports_releases(&self) -> bool {
        self.reports_releases
    }

    /// Ctrl+C was pressed.
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Mouse clicks (column, row) seen since the last drain.
    pub fn drain_clicks(&mut self) -> Vec<(u16, u16)> {
        self.clicks.drain(..).collect()
    }

    /// Feed one crossterm event through the translator.
    pub fn process_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.process_key(key),
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(_) = mouse.kind {
                    self.clicks.push_back((mouse.column, mouse.row));
                }
            }
            _ => {}
        }
    }

    /// Next translated event, if any is queued.
    pub fn try_flush(&mut self) -> Option<RawInputEvent> {
        self.pending.pop_front()
    }

    fn process_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit_requested = true;
            return;
        }
        let Some(name) = key_code_name(key.code) else {
            return;
        };

        if !self.reports_releases {
            if key.kind == KeyEventKind::Release {
                return;
            }
            let active = with_modifiers(key.modifiers, std::slice::from_ref(&name));
            self.pending
                .push_back(RawInputEvent::Key(KeyTransition::down(active.clone())));
            self.pending
                .push_back(RawInputEvent::Key(KeyTransition::release(active, name)));
            return;
        }

        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if !self.held.contains(&name) {
                    self.held.push(name);
                }
                let active = with_modifiers(key.modifiers, &self.held);
                self.pending
                    .push_back(RawInputEvent::Key(KeyTransition::down(active)));
            }
            KeyEventKind::Release => {
                if !self.held.contains(&name) {
                    return;
                }
                let active = with_modifiers(key.modifiers, &self.held);
                self.held.retain(|held| held != &name);
                self.pending
                    .push_back(RawInputEvent::Key(KeyTransition::release(active, name)));
            }
        }
    }
}

impl InputSource for TerminalSource {
    fn poll_event(&mut self, timeout: Option<Duration>) -> Result<Option<RawInputEvent>> {
        if let Some(event) = self.try_flush() {
            return Ok(Some(event));
        }
        let timeout = timeout.unwrap_or(Duration::ZERO);
        if event::poll(timeout).map_err(|e| HotbindError::io("failed to poll terminal", e))? {
            let event =
                event::read().map_err(|e| HotbindError::io("failed to read terminal event", e))?;
            self.process_event(event);
        }
        Ok(self.try_flush())
    }
}

fn with_modifiers(modifiers: KeyModifiers, keys: &[String]) -> Vec<String> {
    let mut active = Vec::with_capacity(keys.len() + 4);
    for (flag, name) in [
        (KeyModifiers::CONTROL, "ctrl"),
        (KeyModifiers::ALT, "alt"),
        (KeyModifiers::SHIFT, "shift"),
        (KeyModifiers::SUPER, "cmd"),
    ] {
        if modifiers.contains(flag) {
            active.push(name.to_string());
        }
    }
    for key in keys {
        if !active.contains(key) {
            active.push(key.clone());
        }
    }
    active
}

fn key_code_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_lowercase().collect(),
        KeyCode::F(n) => format!("f{n}"),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Tab | KeyCode::BackTab => "tab".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::CapsLock => "capslock".to_string(),
        _ => return None,
    };
    Some(name)
}
