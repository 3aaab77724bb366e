use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::ModelName;
use crate::domain::models::PromptBox;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::ChatSession;
use crate::domain::services::HistoryStore;
use crate::infrastructure::backends::BackendManager;

const RETRY_HINT: &str = "Press CTRL+R or type /retry to try again.";

struct Banner {
    title: &'static str,
    text: String,
    style: Style,
}

fn banner(app_state: &AppState) -> Option<Banner> {
    if let Some(error) = app_state.error() {
        let mut text = error.to_string();
        if app_state.can_retry() {
            text = format!("{text}\n\n{RETRY_HINT}");
        }

        return Some(Banner {
            title: "Error",
            text,
            style: Style::default().fg(Color::Red),
        });
    }

    if let Some(notice) = &app_state.notice {
        return Some(Banner {
            title: "ThinkScript KB",
            text: notice.to_string(),
            style: Style::default().fg(Color::Cyan),
        });
    }

    return None;
}

/// Rows needed to show `text` wrapped inside a bordered box of `width`.
fn banner_height(text: &str, width: u16, max_height: u16) -> u16 {
    let inner_width = width.saturating_sub(2).max(1) as usize;
    let rows: usize = text
        .split('\n')
        .map(|line| {
            let len = line.chars().count();
            return ((len + inner_width - 1) / inner_width).max(1);
        })
        .sum();

    let height = u16::try_from(rows + 2).unwrap_or(u16::MAX);
    return height.min(max_height);
}

fn render_banner<B: Backend>(frame: &mut Frame<'_, B>, rect: Rect, banner: Banner) {
    frame.render_widget(
        Paragraph::new(banner.text)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(banner.style)
                    .title(banner.title),
            ),
        rect,
    );
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);
    let mut textarea = PromptBox::create();
    let mut loading = Loading::default();

    loop {
        terminal.draw(|frame| {
            let size = frame.size();
            let banner = banner(app_state);
            let banner_rows = banner
                .as_ref()
                .map_or(0, |banner| return banner_height(&banner.text, size.width, size.height / 2));
            let prompt_rows = u16::try_from(textarea.lines().len() + 2)
                .unwrap_or(u16::MAX)
                .clamp(3, 8);

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Min(1),
                    Constraint::Length(banner_rows),
                    Constraint::Length(prompt_rows),
                ])
                .split(size);

            if layout[0].width != app_state.last_known_width
                || layout[0].height != app_state.last_known_height
            {
                app_state.set_rect(layout[0]);
            }

            app_state
                .bubble_list
                .render(frame, layout[0], app_state.scroll.position);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                layout[0].inner(&Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut app_state.scroll.scrollbar_state,
            );

            if let Some(banner) = banner {
                render_banner(frame, layout[1], banner);
            }

            if app_state.is_loading() {
                loading.render(frame, layout[2]);
            } else {
                frame.render_widget(textarea.widget(), layout[2]);
            }
        })?;

        let is_loading = app_state.is_loading();
        match events.next().await? {
            Event::BackendPromptResponse(res) => {
                app_state.handle_backend_response(res).await;
            }
            Event::BackendFailed(message) => {
                app_state.handle_backend_failed(&message).await;
            }
            Event::ClipboardFailed(message) => {
                app_state.handle_clipboard_failed(&message);
            }
            Event::KeyboardCharInput(input) => {
                if !is_loading {
                    textarea.input(input);
                }
            }
            Event::KeyboardPaste(text) => {
                if !is_loading {
                    textarea.insert_str(&text);
                }
            }
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardCTRLR() => {
                if !is_loading {
                    app_state.retry(&tx).await?;
                }
            }
            Event::KeyboardEnter() => {
                if is_loading {
                    continue;
                }

                let input = PromptBox::input(&textarea);
                if input.trim().is_empty() {
                    continue;
                }
                textarea = PromptBox::create();

                let (should_break, handled) = app_state.handle_slash_commands(&input, &tx).await?;
                if should_break {
                    break;
                }
                if !handled {
                    app_state.submit(&input, &tx).await?;
                }
            }
            Event::UIScrollDown() => {
                app_state.scroll.down();
            }
            Event::UIScrollUp() => {
                app_state.scroll.up();
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::UITick() => {
                loading.tick();
            }
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    if let Err(err) = restore_terminal(&mut io::stdout()) {
        tracing::error!(error = ?err, "Failed to restore terminal");
    }
}

fn restore_terminal<W: io::Write>(writer: &mut W) -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        writer,
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste,
        cursor::Show
    )?;

    return Ok(());
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let backend = BackendManager::get(&Config::get(ConfigKey::Backend))?;
    let model = ModelName::parse(&Config::get(ConfigKey::Model)).unwrap_or_default();
    let mut app_state = AppState::new(ChatSession::new(HistoryStore::default(), model));
    app_state.init(&backend).await;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let res = start_loop(&mut terminal, &mut app_state, tx, rx).await;

    restore_terminal(terminal.backend_mut())?;
    terminal.show_cursor()?;

    return res;
}
