use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use top_headlines::app::App;
use top_headlines::config::{Config, FeedConfig, HELP};
use top_headlines::headlines::HeadlinesController;
use top_headlines::source::{HttpClient, HttpImageLoader, NewsApiLoader, NewsLoader, RssNewsLoader};
use top_headlines::{input, logging, ui};

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the panic message is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let config = Config::from_env()?;
    if config.show_help {
        print!("{HELP}");
        return Ok(());
    }
    logging::init(config.log_file.as_deref())?;
    install_panic_hook();

    // -- loaders -------------------------------------------------------------
    // Requests run on this runtime; the UI stays on the main thread.
    let runtime = tokio::runtime::Runtime::new()?;
    let http = HttpClient::new(runtime.handle().clone())?;

    let feed_loader: Arc<dyn NewsLoader> = match &config.feed {
        FeedConfig::Rss { url } => {
            info!(%url, "using RSS feed");
            Arc::new(RssNewsLoader::new(http.clone(), url.clone()))
        }
        FeedConfig::NewsApi { api_key, country } => {
            info!(%country, "using NewsAPI top headlines");
            Arc::new(NewsApiLoader::new(http.clone(), api_key.clone(), country)?)
        }
    };
    let image_loader = Arc::new(HttpImageLoader::new(http));

    let mut app = App::new(
        HeadlinesController::new(feed_loader, image_loader),
        config.prefetch_depth,
    );
    app.refresh();

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Apply loader results queued since the last tick.
    //   2. Render, then bind / unbind rows the list actually showed.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        app.tick();

        let mut visible = 0..0;
        guard.terminal.draw(|f| visible = ui::draw(&mut app, f))?;
        app.sync_visibility(visible);

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    // Cancel in-flight fetches before the runtime shuts down.
    drop(app);
    drop(guard);
    runtime.shutdown_timeout(Duration::from_secs(1));
    Ok(())
}
