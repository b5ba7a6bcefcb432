//! Terminal presentation layer
//!
//! Renders the decoded conversation turns as chat-style cards, shows a
//! typing indicator while a clip is processing, and follows the newest
//! content. Pure projection of the published session state; every action is
//! forwarded to the session controller.

use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::session::{SessionController, SessionPhase, SessionSnapshot};
use crate::transcript::ConversationTurn;

/// Chat-style TUI over the session state
pub struct ChatApp {
    controller: Arc<SessionController>,
    state_rx: watch::Receiver<SessionSnapshot>,
    /// Vertical scroll offset in wrapped lines
    scroll: u16,
    /// Whether the view follows the newest content
    follow: bool,
    tick: usize,
}

impl ChatApp {
    pub fn new(controller: Arc<SessionController>) -> Self {
        let state_rx = controller.subscribe();
        Self {
            controller,
            state_rx,
            scroll: 0,
            follow: true,
            tick: 0,
        }
    }

    /// Run the UI until the user quits
    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        loop {
            // New turns or a processing toggle snap the view to the newest
            // content unless the user scrolled away.
            if self.state_rx.has_changed().unwrap_or(false) {
                self.state_rx.mark_unchanged();
                if self.follow {
                    self.scroll = u16::MAX; // clamped during draw
                }
            }

            terminal.draw(|f| self.draw(f))?;
            self.tick = self.tick.wrapping_add(1);

            // Poll events every 200ms
            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            break;
                        }
                        KeyCode::Char('r') => self.toggle_recording().await,
                        KeyCode::Up => {
                            self.follow = false;
                            self.scroll = self.scroll.saturating_sub(1);
                        }
                        KeyCode::Down => {
                            self.follow = false;
                            self.scroll = self.scroll.saturating_add(1);
                        }
                        KeyCode::PageUp => {
                            self.follow = false;
                            self.scroll = self.scroll.saturating_sub(10);
                        }
                        KeyCode::PageDown => {
                            self.follow = false;
                            self.scroll = self.scroll.saturating_add(10);
                        }
                        KeyCode::End => {
                            self.follow = true;
                            self.scroll = u16::MAX;
                        }
                        _ => {}
                    }
                }
            }
        }

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    async fn toggle_recording(&self) {
        let phase = self.controller.snapshot().phase;
        let outcome = match phase {
            SessionPhase::Idle => self.controller.start().await,
            SessionPhase::Recording => self.controller.stop().await,
            // Busy rejection is a silent no-op
            SessionPhase::Processing => return,
        };
        // Failures are already published in the session state
        let _ = outcome;
    }

    fn draw(&mut self, f: &mut Frame) {
        let snapshot = self.state_rx.borrow().clone();

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(f.area());

        self.draw_header(f, sections[0], &snapshot);
        self.draw_conversation(f, sections[1], &snapshot);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect, snapshot: &SessionSnapshot) {
        let (color, status) = match snapshot.phase {
            SessionPhase::Idle => (Color::Gray, "idle".to_string()),
            SessionPhase::Recording => {
                let elapsed = snapshot
                    .recording_since
                    .map(|since| (Utc::now() - since).num_seconds())
                    .unwrap_or(0);
                (Color::Red, format!("recording {}:{:02}", elapsed / 60, elapsed % 60))
            }
            SessionPhase::Processing => (Color::Yellow, "processing".to_string()),
        };

        let header = Line::from(vec![
            Span::styled("voice-notes ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(status, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw("   r: record/stop  ↑/↓: scroll  q: quit"),
        ]);

        f.render_widget(Paragraph::new(header), area);
    }

    fn draw_conversation(&mut self, f: &mut Frame, area: Rect, snapshot: &SessionSnapshot) {
        let block = Block::default().title("conversation").borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut lines: Vec<Line> = Vec::new();

        match &snapshot.last_result {
            Some(result) => {
                for turn in &result.turns {
                    lines.extend(turn_lines(turn));
                    lines.push(Line::raw(""));
                }
                if !result.fully_transcribed {
                    lines.push(Line::styled(
                        "(partial transcription: the clip was not fully transcribed)",
                        Style::default().fg(Color::Yellow),
                    ));
                    lines.push(Line::raw(""));
                }
            }
            None if snapshot.phase == SessionPhase::Idle && snapshot.last_error.is_none() => {
                lines.push(Line::styled(
                    "Press r to record a voice note.",
                    Style::default().fg(Color::Gray),
                ));
            }
            None => {}
        }

        if snapshot.is_processing() {
            // Animated typing affordance
            let dots = ".".repeat(self.tick % 4);
            lines.push(Line::styled(
                format!("analyzing{}", dots),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
            ));
        }

        if let Some(error) = &snapshot.last_error {
            lines.push(Line::styled(
                format!("error: {}", error),
                Style::default().fg(Color::Red),
            ));
        }

        let total = wrapped_line_count(&lines, inner.width.max(1));
        let max_scroll = total.saturating_sub(inner.height);
        self.scroll = self.scroll.min(max_scroll);
        if self.follow {
            self.scroll = max_scroll;
        }

        let paragraph = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        f.render_widget(paragraph, inner);
    }
}

/// Render one turn as a card of styled lines
fn turn_lines(turn: &ConversationTurn) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(
            turn.speaker(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", turn.time_range()),
            Style::default().fg(Color::Gray),
        ),
    ]));

    lines.push(Line::raw(turn.text()));

    lines.push(Line::from(vec![
        Span::styled("tone: ", Style::default().fg(Color::Gray)),
        Span::styled(turn.tone.tone.clone(), Style::default().fg(Color::Magenta)),
        Span::styled(
            format!("  ({:.0}% confidence)", turn.confidence),
            Style::default().fg(Color::Gray),
        ),
    ]));

    for indicator in &turn.tone.indicators {
        lines.push(Line::styled(
            format!("  • {}", indicator),
            Style::default().fg(Color::Gray),
        ));
    }

    lines.push(Line::styled(
        turn.summary.clone(),
        Style::default().add_modifier(Modifier::ITALIC),
    ));

    lines
}

/// Count of display rows the lines occupy after wrapping at `width`.
/// Matches Paragraph's wrap closely enough to keep the tail in view.
fn wrapped_line_count(lines: &[Line], width: u16) -> u16 {
    let width = width as usize;
    lines
        .iter()
        .map(|line| {
            let w = line.width();
            if w == 0 {
                1u16
            } else {
                w.div_ceil(width).min(u16::MAX as usize) as u16
            }
        })
        .fold(0u16, u16::saturating_add)
}
