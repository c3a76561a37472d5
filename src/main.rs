mod api;
mod app;
mod config;
mod filter;
mod models;
mod parser;
mod ui;
mod validator;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dotenv::dotenv;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::error::Error;
use std::io;

use crate::app::App;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file
    dotenv().ok();

    let cfg = config::load()?;

    let mut app = App::new();

    // With credentials on file, sign in up front and skip the auth screen.
    if let (Some(email), Some(password)) = (cfg.email.clone(), cfg.password.clone()) {
        match api::sign_in(&cfg, &email, &password).await {
            Ok(session) => {
                app.start_session(session);
                app.load(&cfg).await;
                app.load_profile(&cfg).await;
            }
            Err(err) => app.notice = Some(format!("Error signing in: {}", err)),
        }
    }

    // Setup terminal UI
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.hide_cursor()?;

    let res = ui::run_app(&mut terminal, app, &cfg).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
