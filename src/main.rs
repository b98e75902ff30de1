use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tracing::{error, info};

use hostconsole::config::Config;
use hostconsole::dashboard::{Dashboard, DashboardOptions, HostStatus};
use hostconsole::event::{AppEvent, EventHandler};
use hostconsole::key::parse_key_script;
use hostconsole::logging;
use hostconsole::ui::Theme;

#[derive(Parser)]
#[command(name = "hostconsole", version, about = "Host management console for the terminal")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Path to config.toml")]
    config: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "Run without a terminal: feed key names (e.g. \"KEY_DOWN,KEY_ENTER\") \
                and print the final screen as JSON"
    )]
    keys: Option<String>,

    #[arg(long, default_value_t = 80, help = "Screen width for --keys")]
    width: u16,

    #[arg(long, default_value_t = 24, help = "Screen height for --keys")]
    height: u16,

    #[arg(long, help = "Write the effective config back to its file and exit")]
    save_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)?;
    if let Some(theme) = cli.theme.clone() {
        config.theme = theme;
    }
    config.normalize_theme(&Theme::available_themes());

    if cli.save_config {
        config.save_to(&config_path)?;
        println!("{}", config_path.display());
        return Ok(());
    }

    logging::init(Path::new(&config.log_file), &config.log_level)?;
    info!(theme = %config.theme, "starting");
    let theme = Theme::load(&config.theme).unwrap_or_default();

    if let Some(script) = cli.keys.as_deref() {
        return run_headless(&cli, &config, theme, script);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &config, theme);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!("{err:#}");
        eprintln!("Error: {err:?}");
    }
    info!("stopped");

    Ok(())
}

fn run_headless(cli: &Cli, config: &Config, theme: Theme, script: &str) -> Result<()> {
    let Some(keys) = parse_key_script(script) else {
        bail!("cannot parse key script `{script}`");
    };
    let area = Rect::new(0, 0, cli.width, cli.height);
    let mut dashboard =
        Dashboard::new(area, theme, HostStatus::demo(), DashboardOptions::from(config))?;
    for key in keys {
        if dashboard.should_quit() {
            break;
        }
        dashboard.handle_key(key)?;
    }
    let snapshot = dashboard.snapshot()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?
    );
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &Config,
    theme: Theme,
) -> Result<()> {
    let size = terminal.size()?;
    let area = Rect::new(0, 0, size.width, size.height);
    let mut dashboard =
        Dashboard::new(area, theme, HostStatus::demo(), DashboardOptions::from(config))?;
    let events = EventHandler::new(Duration::from_millis(config.tick_ms));
    let mut last_tick = Instant::now();

    loop {
        dashboard.render()?;
        terminal.draw(|frame| {
            dashboard.compose(frame.buffer_mut());
            if let Some(position) = dashboard.cursor_position() {
                frame.set_cursor_position(position);
            }
        })?;

        match events.next()? {
            AppEvent::Key(key) => dashboard.handle_key(key)?,
            AppEvent::Quit => dashboard.quit(),
            AppEvent::Tick => {
                dashboard.tick(last_tick.elapsed())?;
                last_tick = Instant::now();
            }
            AppEvent::Resize(width, height) => {
                dashboard.resize(Rect::new(0, 0, width, height))?;
            }
        }

        if dashboard.should_quit() {
            return Ok(());
        }
    }
}
