//! Terminal rendering of the binding editor
//!
//! Draws the editor rows, the `[ OK ]` / `[ Edit bindings ]` button and an action log with
//! ratatui, and maps mouse clicks back onto what was drawn.

use crate::editor::model::EditorEntry;
use crate::error::{HotbindError, Result};
use ratatui::crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

const OK_BUTTON: &str = "[ OK ]";
const EDIT_BUTTON: &str = "[ Edit bindings ]";
const TITLE_WIDTH: usize = 24;

/// Colors used by the editor screen
#[derive(Debug, Clone)]
pub struct EditorTheme {
    pub title: Style,
    pub binding: Style,
    /// Row currently capturing a binding
    pub recording: Style,
    pub button: Style,
    pub log: Style,
}

impl Default for EditorTheme {
    fn default() -> Self {
        Self {
            title: Style::default().add_modifier(Modifier::BOLD),
            binding: Style::default().fg(Color::Cyan),
            recording: Style::default().fg(Color::Black).bg(Color::LightBlue),
            button: Style::default().fg(Color::Black).bg(Color::White),
            log: Style::default().fg(Color::Gray),
        }
    }
}

/// What to draw in one frame.
#[derive(Debug, Clone, Copy)]
pub struct EditorView<'a> {
    pub entries: &'a [EditorEntry],
    pub log: &'a [String],
    pub editor_open: bool,
}

/// Something clickable on the editor screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorClick {
    Entry(usize),
    Confirm,
    OpenEditor,
}

/// Screen regions of the last drawn frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub rows: Vec<Rect>,
    pub button: Rect,
    pub log: Rect,
    pub list: Rect,
    pub editor_open: bool,
}

impl ScreenLayout {
    /// Split `area` for `entry_count` editor rows.
    pub fn compute(area: Rect, entry_count: usize, editor_open: bool) -> Self {
        let list_height = if editor_open {
            u16::try_from(entry_count).unwrap_or(u16::MAX).saturating_add(2)
        } else {
            0
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(list_height),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ]
                .as_ref(),
            )
            .split(area);
        let list = chunks[0];

        let inner_height = list.height.saturating_sub(2);
        let rows = (0..inner_height.min(u16::try_from(entry_count).unwrap_or(u16::MAX)))
            .map(|i| Rect::new(list.x + 1, list.y + 1 + i, list.width.saturating_sub(2), 1))
            .collect();

        let label = if editor_open { OK_BUTTON } else { EDIT_BUTTON };
        let button_width = u16::try_from(label.len()).unwrap_or(u16::MAX);
        let button = Rect::new(
            chunks[1].x,
            chunks[1].y,
            button_width.min(chunks[1].width),
            chunks[1].height,
        );

        Self {
            rows,
            button,
            log: chunks[2],
            list,
            editor_open,
        }
    }

    /// Which element, if any, sits under the given cell.
    pub fn hit(&self, column: u16, row: u16) -> Option<EditorClick> {
        let contains = |rect: &Rect| {
            column >= rect.x
                && column < rect.x.saturating_add(rect.width)
                && row >= rect.y
                && row < rect.y.saturating_add(rect.height)
        };
        if contains(&self.button) {
            return Some(if self.editor_open {
                EditorClick::Confirm
            } else {
                EditorClick::OpenEditor
            });
        }
        self.rows.iter().position(contains).map(EditorClick::Entry)
    }
}

/// Draw one frame of the editor screen into `frame`.
pub fn render_screen(frame: &mut Frame, view: &EditorView<'_>, theme: &EditorTheme) -> ScreenLayout {
    let layout = ScreenLayout::compute(frame.size(), view.entries.len(), view.editor_open);

    if view.editor_open {
        let items: Vec<ListItem> = view
            .entries
            .iter()
            .map(|entry| {
                let style = if entry.recording {
                    theme.recording
                } else {
                    theme.binding
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<width$}", entry.title, width = TITLE_WIDTH),
                        theme.title,
                    ),
                    Span::styled(entry.label.clone(), style),
                ]))
            })
            .collect();
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Hotkeys"));
        frame.render_widget(list, layout.list);
    }

    let label = if view.editor_open { OK_BUTTON } else { EDIT_BUTTON };
    frame.render_widget(
        Paragraph::new(Span::styled(label, theme.button)),
        layout.button,
    );

    let visible = usize::from(layout.log.height.saturating_sub(2));
    let start = view.log.len().saturating_sub(visible);
    let lines: Vec<Line> = view.log[start..]
        .iter()
        .map(|line| Line::from(Span::styled(line.as_str(), theme.log)))
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Actions")),
        layout.log,
    );

    layout
}

/// Editor screen drawn on the real terminal
pub struct TerminalEditor {
    terminal: Option<CrosstermTerminal>,
    theme: EditorTheme,
    layout: ScreenLayout,
}

impl TerminalEditor {
    pub fn new() -> Self {
        Self::with_theme(EditorTheme::default())
    }

    pub fn with_theme(theme: EditorTheme) -> Self {
        Self {
            terminal: None,
            theme,
            layout: ScreenLayout::default(),
        }
    }

    /// Enter raw mode and the alternate screen, with mouse capture.
    pub fn initialize(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        self.terminal = Some(terminal);
        Ok(())
    }

    /// Restore the terminal.
    pub fn cleanup(&mut self) -> Result<()> {
        if self.terminal.is_some() {
            disable_raw_mode()?;
            execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
            self.terminal = None;
        }
        Ok(())
    }

    /// Draw one frame. Fails if [`TerminalEditor::initialize`] has not run.
    pub fn draw(&mut self, view: &EditorView<'_>) -> Result<()> {
        let terminal = self
            .terminal
            .as_mut()
            .ok_or_else(|| HotbindError::ui("terminal not initialised"))?;
        self.layout = draw_on(terminal, view, &self.theme)?;
        Ok(())
    }

    /// Map a mouse click onto the last drawn frame.
    pub fn hit(&self, column: u16, row: u16) -> Option<EditorClick> {
        self.layout.hit(column, row)
    }
}

impl Default for TerminalEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalEditor {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

fn draw_on<B: Backend>(
    terminal: &mut Terminal<B>,
    view: &EditorView<'_>,
    theme: &EditorTheme,
) -> Result<ScreenLayout> {
    let mut layout = ScreenLayout::default();
    terminal
        .draw(|frame| layout = render_screen(frame, view, theme))
        .map_err(|e| HotbindError::ui(format!("failed to draw binding editor: {e}")))?;
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::BindingKey;
    use crate::editor::model::EditorTarget;
    use ratatui::backend::TestBackend;

    fn entries() -> Vec<EditorEntry> {
        ["fire", "gear (Up)", "gear (Down)"]
            .iter()
            .map(|title| EditorEntry {
                target: EditorTarget::Click(BindingKey::new(*title)),
                title: title.to_string(),
                label: " ".to_string(),
                recording: false,
            })
            .collect()
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer.get(x, y).symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn draw_before_initialize_fails() {
        let mut editor = TerminalEditor::new();
        let entries = entries();
        let result = editor.draw(&EditorView {
            entries: &entries,
            log: &[],
            editor_open: true,
        });
        assert!(matches!(result, Err(HotbindError::UIError { .. })));
    }

    #[test]
    fn rows_are_clickable_inside_the_border() {
        let layout = ScreenLayout::compute(Rect::new(0, 0, 60, 20), 3, true);
        assert_eq!(layout.hit(5, 0), None);
        assert_eq!(layout.hit(5, 1), Some(EditorClick::Entry(0)));
        assert_eq!(layout.hit(5, 3), Some(EditorClick::Entry(2)));
        assert_eq!(layout.hit(2, 5), Some(EditorClick::Confirm));
        assert_eq!(layout.hit(30, 5), None);
    }

    #[test]
    fn closed_editor_offers_edit_button() {
        let layout = ScreenLayout::compute(Rect::new(0, 0, 60, 20), 3, false);
        assert!(layout.rows.is_empty());
        assert_eq!(layout.hit(0, 0), Some(EditorClick::OpenEditor));
    }

    #[test]
    fn renders_rows_button_and_log() {
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        let entries = entries();
        let log = vec!["fire clicked".to_string()];
        let view = EditorView {
            entries: &entries,
            log: &log,
            editor_open: true,
        };
        let layout = draw_on(&mut terminal, &view, &EditorTheme::default()).unwrap();
        assert_eq!(layout.rows.len(), 3);

        let text = screen_text(&terminal);
        assert!(text.contains("gear (Down)"));
        assert!(text.contains(OK_BUTTON));
        assert!(text.contains("fire clicked"));
    }
}
