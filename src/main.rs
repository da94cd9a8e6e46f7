use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use neotype::app::{App, AppScreen};
use neotype::config::{Config, SettingsOverrides};
use neotype::event::{AppEvent, EventHandler};
use neotype::ui::components::progress_bar::ProgressBar;
use neotype::ui::components::results_view::ResultsView;
use neotype::ui::components::settings_panel::SettingsPanel;
use neotype::ui::components::stats_header::StatsHeader;
use neotype::ui::components::word_stream::WordStream;
use neotype::ui::layout::{AppLayout, centered_rect, pack_hint_lines};

#[derive(Parser)]
#[command(name = "neotype", version, about = "Terminal typing speed test")]
struct Cli {
    #[arg(short, long, help = "Word list: normal, left-hand or right-hand")]
    mode: Option<String>,

    #[arg(short = 'T', long, help = "Test type: time or words")]
    test_type: Option<String>,

    #[arg(short, long, help = "Seconds per timed test")]
    duration: Option<u32>,

    #[arg(short, long, help = "Words per counted test")]
    words: Option<u32>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Append diagnostic logs to this file")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let mut config = Config::load().unwrap_or_else(|err| {
        warn!(%err, "config unreadable, using defaults");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }

    // command-line values apply to this run only until saved from the settings screen
    let overrides = SettingsOverrides {
        mode: cli.mode,
        test_type: cli.test_type,
        duration_secs: cli.duration,
        word_count: cli.words,
    };
    let settings = config
        .startup_settings(&overrides)
        .context("invalid command-line settings")?;

    let mut app = App::with_word_bank(config, settings)?;
    info!(mode = %settings.mode, test_type = %settings.test_type, "neotype starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        warn!(%err, "exited with error");
    }
    result
}

/// The terminal owns stdout, so logs only go to a file and only when asked for.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Only process Press events so key repeat reporting does not double input
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Test => handle_test_key(app, key),
        AppScreen::Results => handle_results_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_test_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('s') {
            app.open_settings();
        }
        return;
    }
    match key.code {
        KeyCode::Tab | KeyCode::Esc => app.restart(),
        KeyCode::F(2) => app.open_settings(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Tab | KeyCode::Esc | KeyCode::Enter => app.restart(),
        KeyCode::Char('s') | KeyCode::F(2) => app.open_settings(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_settings(),
        KeyCode::Enter => app.apply_settings(),
        KeyCode::Up | KeyCode::Char('k') => app.settings_move(false),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.settings_move(true),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => app.settings_cycle(true),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle(false),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Test => render_test(frame, app),
        AppScreen::Results => render_results(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn render_test(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let layout = AppLayout::new(area);

    frame.render_widget(
        StatsHeader::new(&app.engine, Instant::now(), &app.theme),
        layout.header,
    );
    if let Some(progress) = layout.progress {
        frame.render_widget(ProgressBar::for_session(&app.engine, &app.theme), progress);
    }
    frame.render_widget(WordStream::new(&app.engine, &app.theme), layout.main);

    let mut footer: Vec<Line> = Vec::new();
    if let Some(status) = &app.status {
        footer.push(Line::from(Span::styled(
            format!("  {status}"),
            Style::default().fg(colors.warning()),
        )));
    }
    let hints = ["[Tab/Esc] Restart", "[F2/Ctrl+S] Settings", "[Ctrl+C] Quit"];
    for line in pack_hint_lines(&hints, area.width as usize) {
        footer.push(Line::from(Span::styled(
            line,
            Style::default().fg(colors.text_pending()),
        )));
    }
    frame.render_widget(Paragraph::new(footer), layout.footer);
}

fn render_results(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let Some(summary) = &app.last_summary else {
        return;
    };
    let centered = centered_rect(70, 80, area);
    frame.render_widget(ResultsView::new(summary, &app.theme), centered);
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let centered = centered_rect(60, 70, area);
    frame.render_widget(
        SettingsPanel::new(
            &app.draft,
            &app.draft_theme,
            app.settings_selected,
            app.status.as_deref(),
            &app.theme,
        ),
        centered,
    );
}
