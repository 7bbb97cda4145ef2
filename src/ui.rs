use crate::clipboard::{Clipboard, SystemClipboard};
use crate::codec;
use crate::config::Config;
use crate::daystrip;
use crate::journal::{AppendOutcome, Journal};
use crate::storage::{self, DiskStore};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io::{stdout, Stdout};
use std::time::Duration;

pub fn run(journal: Journal<DiskStore>, config: &Config) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(journal, config);
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Pane {
    Editor,
    List,
    DayStrip,
}

struct App {
    journal: Journal<DiskStore>,
    clipboard: SystemClipboard,
    focus: Pane,
    editor: String,
    selected: usize,
    strip_cursor: usize,
    /// Dates currently rendered in the strip, refreshed on every draw.
    strip_dates: Vec<String>,
    tile_width: usize,
    tile_gap: usize,
    should_quit: bool,
}

impl App {
    fn new(journal: Journal<DiskStore>, config: &Config) -> Self {
        App {
            journal,
            clipboard: SystemClipboard::new(),
            focus: Pane::Editor,
            editor: String::new(),
            selected: 0,
            strip_cursor: 0,
            strip_dates: Vec::new(),
            tile_width: config.tile_width,
            tile_gap: config.tile_gap,
            should_quit: false,
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                return Ok(());
            }
            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.focus {
            Pane::Editor => self.handle_editor_key(key),
            Pane::List => self.handle_list_key(key),
            Pane::DayStrip => self.handle_strip_key(key),
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('v') {
                self.paste_into_editor();
            }
            return;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Tab => self.blur_editor(Pane::List),
            KeyCode::BackTab => self.blur_editor(Pane::DayStrip),
            KeyCode::Enter => self.editor.push('\n'),
            KeyCode::Backspace => {
                self.editor.pop();
            }
            KeyCode::Char(c) => self.editor.push(c),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.focus = Pane::DayStrip,
            KeyCode::BackTab | KeyCode::Char('i') => self.focus_editor(),
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected += 1;
                self.clamp_selection();
            }
            // Mutation keys are inert while an append is outstanding;
            // the journal core does not mutually exclude them itself.
            KeyCode::Char(' ') if !self.journal.is_saving() => {
                self.journal.toggle_item(self.selected);
            }
            KeyCode::Char('d') if !self.journal.is_saving() => {
                self.journal.delete_item(self.selected);
                self.clamp_selection();
            }
            KeyCode::Char('y') => self.copy_viewed_day(),
            _ => {}
        }
    }

    fn handle_strip_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.focus_editor(),
            KeyCode::BackTab => self.focus = Pane::List,
            // Today sits leftmost; moving right walks back in time.
            KeyCode::Left | KeyCode::Char('h') => {
                self.strip_cursor = self.strip_cursor.saturating_sub(1)
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.strip_cursor =
                    (self.strip_cursor + 1).min(self.strip_dates.len().saturating_sub(1))
            }
            KeyCode::Enter => {
                if let Some(date) = self.strip_dates.get(self.strip_cursor).cloned() {
                    self.journal.set_view_date(&date);
                    self.selected = 0;
                }
            }
            _ => {}
        }
    }

    /// Leaving the editor is the blur event: pending text is appended
    /// to today's record. A failed append keeps the text in the box so
    /// the next blur can retry it.
    fn blur_editor(&mut self, next: Pane) {
        match self.journal.append_on_blur(&storage::today_string(), &self.editor) {
            AppendOutcome::Appended => {
                self.editor.clear();
                self.journal.set_status("Saved");
            }
            AppendOutcome::EmptyInput | AppendOutcome::DroppedWhileSaving => self.editor.clear(),
            AppendOutcome::Failed => {}
        }
        self.focus = next;
        self.clamp_selection();
    }

    /// Entering the editor is the focus event: check for a day rollover
    /// and start from an empty capture box.
    fn focus_editor(&mut self) {
        self.journal.refresh_on_focus(&storage::today_string());
        self.editor.clear();
        self.focus = Pane::Editor;
    }

    fn clamp_selection(&mut self) {
        self.selected = self
            .selected
            .min(self.journal.viewed_items().len().saturating_sub(1));
    }

    fn copy_viewed_day(&mut self) {
        let items = self.journal.viewed_items().to_vec();
        if items.is_empty() {
            self.journal.set_status("Nothing to copy");
            return;
        }
        let heading = format!("### {}", self.journal.viewed_date());
        let block = codec::format_markdown_checklist(&items, Some(&heading));
        match self.clipboard.write_text(&block) {
            Ok(()) => self.journal.set_status("Copied"),
            Err(err) => self.journal.report_error(&err),
        }
    }

    fn paste_into_editor(&mut self) {
        match self.clipboard.read_text() {
            Ok(text) => self.editor.push_str(&text),
            Err(err) => self.journal.report_error(&err),
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(frame.size());
        self.draw_day_strip(frame, chunks[0]);
        self.draw_editor(frame, chunks[1]);
        self.draw_list(frame, chunks[2]);
        self.draw_status(frame, chunks[3]);
    }

    fn pane_block(&self, title: &str, pane: Pane) -> Block<'static> {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(title.to_string());
        if self.focus == pane {
            block = block.border_style(Style::default().fg(Color::Cyan));
        }
        block
    }

    fn draw_day_strip(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(2) as usize;
        let visible = daystrip::visible_date_count(inner_width, self.tile_width, self.tile_gap);
        self.strip_dates = daystrip::build_recent_dates(self.journal.today_date(), visible);
        self.strip_cursor = self
            .strip_cursor
            .min(self.strip_dates.len().saturating_sub(1));

        let mut spans = Vec::new();
        for (idx, date) in self.strip_dates.iter().enumerate() {
            let label = format!(
                "{} {}",
                daystrip::format_view_date(date),
                self.journal.count_for(date)
            );
            let tile: String = format!("{label:<width$}", width = self.tile_width)
                .chars()
                .take(self.tile_width)
                .collect();
            let mut style = Style::default();
            if date == self.journal.viewed_date() {
                style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            }
            if self.focus == Pane::DayStrip && idx == self.strip_cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(tile, style));
            if idx + 1 != self.strip_dates.len() {
                spans.push(Span::raw(" ".repeat(self.tile_gap)));
            }
        }

        let block = self.pane_block("Days", Pane::DayStrip);
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn draw_editor(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.focus == Pane::Editor {
            "Capture (Esc saves to today)"
        } else {
            "Capture"
        };
        let block = self.pane_block(title, Pane::Editor);
        frame.render_widget(
            Paragraph::new(self.editor.as_str())
                .wrap(Wrap { trim: false })
                .block(block),
            area,
        );
    }

    fn draw_list(&mut self, frame: &mut Frame, area: Rect) {
        let viewed = self.journal.viewed_date();
        let title = if viewed == self.journal.today_date() {
            format!("{} (today)", daystrip::format_view_date(viewed))
        } else {
            daystrip::format_view_date(viewed)
        };

        let items: Vec<ListItem> = self
            .journal
            .viewed_items()
            .iter()
            .map(|stored| {
                let parsed = codec::parse_task_item(stored);
                let mut lines = Vec::new();
                for (idx, body_line) in parsed.text.split('\n').enumerate() {
                    if idx == 0 {
                        let mark = if parsed.checked { "[x] " } else { "[ ] " };
                        let mut style = Style::default();
                        if parsed.checked {
                            style = style
                                .fg(Color::DarkGray)
                                .add_modifier(Modifier::CROSSED_OUT);
                        }
                        lines.push(Line::from(vec![
                            Span::raw(mark),
                            Span::styled(body_line.to_string(), style),
                        ]));
                    } else {
                        lines.push(Line::from(format!("    {body_line}")));
                    }
                }
                ListItem::new(lines)
            })
            .collect();

        let mut state = ListState::default();
        if !items.is_empty() && self.focus == Pane::List {
            state.select(Some(self.selected.min(items.len() - 1)));
        }

        let block = self.pane_block(&title, Pane::List);
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_status(&mut self, frame: &mut Frame, area: Rect) {
        let hint = match self.focus {
            Pane::Editor => "esc save · ctrl+v paste · ctrl+c quit",
            Pane::List => "space toggle · d delete · y copy day · i capture · tab days · q quit",
            Pane::DayStrip => "h/l pick day · enter view · tab capture · q quit",
        };
        let (text, style) = match self.journal.display_message() {
            Some(message) if self.journal.has_error() => {
                (message.to_string(), Style::default().fg(Color::Red))
            }
            Some(message) => (message.to_string(), Style::default().fg(Color::Green)),
            None => (hint.to_string(), Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(Paragraph::new(Span::styled(text, style)), area);
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(out))?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
