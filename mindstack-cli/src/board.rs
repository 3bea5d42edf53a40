use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::{self, Stdout};

use mindstack_core::{Task, TaskQueue};

use crate::config::Config;
use crate::llm;
use crate::pipeline;
use crate::speech;

pub fn run_board(queue: &mut TaskQueue, cfg: &Config) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = board_loop(&mut terminal, queue, cfg);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

fn board_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    queue: &mut TaskQueue,
    cfg: &Config,
) -> Result<()> {
    // Transient footer text: last transcript + acknowledgement, or a notice.
    let mut transcript = String::new();
    let mut notice = String::from("Press r to record a command.");
    let mut input = String::new();
    let mut typing = false;
    let mut show_help = true;
    let mut pending_record = false;

    loop {
        let window = cfg.stack.display_window;
        terminal.draw(|f| {
            let size = f.area();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(4),
                    Constraint::Min(4),
                    Constraint::Length(6),
                    Constraint::Length(4),
                ])
                .split(size);

            let splash = Paragraph::new(Text::from(vec![
                Line::from(Span::styled(
                    "MindStack",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    if show_help {
                        "r=record  t=type  ?=help  q=quit"
                    } else {
                        "type ? for shortcuts"
                    },
                    Style::default().fg(Color::Gray),
                )),
            ]))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(splash, chunks[0]);

            let stack_title = format!(
                "stack ({}/{})",
                queue.active().len(),
                queue.capacity()
            );
            let stack = Paragraph::new(Text::from(tier_lines(
                queue.active_window(window),
                "Empty stack. Say a task!",
            )))
            .block(Block::default().borders(Borders::ALL).title(stack_title))
            .wrap(Wrap { trim: false });
            f.render_widget(stack, chunks[1]);

            let backlog_title = format!("backlog ({})", queue.backlog().len());
            let backlog = Paragraph::new(Text::from(tier_lines(queue.backlog(), "Empty backlog.")))
                .block(Block::default().borders(Borders::ALL).title(backlog_title))
                .wrap(Wrap { trim: false });
            f.render_widget(backlog, chunks[2]);

            let footer_text = if typing {
                Text::from(vec![Line::from(vec![
                    Span::styled("say: ", Style::default().fg(Color::Cyan)),
                    Span::raw(input.clone()),
                ])])
            } else {
                let mut lines = Vec::new();
                if !transcript.is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!("\u{201c}{transcript}\u{201d}"),
                        Style::default().fg(Color::Gray),
                    )));
                }
                lines.push(Line::from(Span::styled(
                    notice.clone(),
                    Style::default().fg(Color::Magenta),
                )));
                Text::from(lines)
            };
            let footer = Paragraph::new(footer_text)
                .block(Block::default().borders(Borders::ALL).title("last command"))
                .wrap(Wrap { trim: false });
            f.render_widget(footer, chunks[3]);
        })?;

        // The "Recording…" notice is on screen now; safe to block on capture.
        if pending_record {
            pending_record = false;
            match speech::capture_transcript(&cfg.speech) {
                Ok(heard) => {
                    (transcript, notice) = run_command(queue, cfg, &heard);
                }
                Err(e) => {
                    notice = format!("Recording failed: {e:#}");
                }
            }
            continue;
        }

        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if typing {
                    match key.code {
                        KeyCode::Enter => {
                            let trimmed = input.trim().to_string();
                            typing = false;
                            input.clear();
                            if !trimmed.is_empty() {
                                (transcript, notice) = run_command(queue, cfg, &trimmed);
                            }
                        }
                        KeyCode::Esc => {
                            typing = false;
                            input.clear();
                        }
                        KeyCode::Backspace => {
                            input.pop();
                        }
                        KeyCode::Char(c) => {
                            input.push(c);
                        }
                        _ => {}
                    }
                    continue;
                }

                match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char('?') => {
                        show_help = !show_help;
                    }
                    KeyCode::Char('t') => {
                        typing = true;
                    }
                    KeyCode::Char('r') => {
                        notice = "Recording…".to_string();
                        pending_record = true;
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

/// Resolve + execute one transcript; returns (transcript, footer notice).
fn run_command(queue: &mut TaskQueue, cfg: &Config, transcript: &str) -> (String, String) {
    let llm_cfg = match llm::resolve_config(cfg) {
        Ok(Some(c)) => c,
        Ok(None) => {
            return (
                transcript.to_string(),
                "No classifier credentials. Run: mindstack auth paste-anthropic-token".to_string(),
            );
        }
        Err(e) => return (transcript.to_string(), format!("Config error: {e:#}")),
    };

    match pipeline::run_transcript(queue, &llm_cfg, transcript) {
        Ok(outcome) => (outcome.transcript, outcome.acknowledgement),
        Err(e) => (
            transcript.to_string(),
            format!("Couldn't resolve that: {e:#}"),
        ),
    }
}

fn tier_lines(tier: &[Task], empty_msg: &str) -> Vec<Line<'static>> {
    if tier.is_empty() {
        return vec![Line::from(Span::styled(
            empty_msg.to_string(),
            Style::default().fg(Color::Gray),
        ))];
    }
    tier.iter()
        .map(|t| {
            Line::from(vec![
                Span::styled(
                    format!("[{:>2}] ", t.priority),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(t.description.clone()),
            ])
        })
        .collect()
}
