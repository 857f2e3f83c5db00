use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

use crate::api::ApiClient;
use crate::config::DashboardConfig;
use crate::events::EventHandler;
use crate::tea::message::SystemMessage;
use crate::tea::model::ModelSettings;
use crate::tea::{update, CommandExecutor, Message, Model};
use crate::theme::Theme;
use crate::ui;

/// Terminal dashboard: owns the model and drives the TEA loop
pub struct App {
    model: Model,
    theme: Theme,
    event_handler: EventHandler,
    executor: CommandExecutor,
    receiver: mpsc::UnboundedReceiver<Message>,
    tick_rate: Duration,
}

impl App {
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let client = ApiClient::new(&config.api.base_url, config.api_timeout())
            .with_context(|| format!("Invalid API URL '{}'", config.api.base_url))?;
        let (sender, receiver) = mpsc::unbounded_channel();

        Ok(Self {
            model: Model::new(ModelSettings::from_config(config)),
            theme: Theme::from_name(&config.theme),
            event_handler: EventHandler::new(),
            executor: CommandExecutor::new(client, sender),
            receiver,
            tick_rate: config.tick_rate(),
        })
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Fold a message into the model and start the commands it produced
    pub fn dispatch(&mut self, message: Message) {
        let model = std::mem::take(&mut self.model);
        let result = update(model, message);
        self.model = result.model;

        for command in result.commands {
            let executor = self.executor.clone();
            tokio::spawn(async move {
                executor.execute(command).await;
            });
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        if !io::stdout().is_tty() {
            return Err(anyhow::anyhow!(
                "WongPrime dashboard requires a terminal (TTY). Use a subcommand such as `wongprime products` for scripted use."
            ));
        }

        enable_raw_mode().map_err(|e| {
            anyhow::anyhow!("Failed to enable raw mode: {}. Make sure you're running in a proper terminal.", e)
        })?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| anyhow::anyhow!("Failed to setup terminal: {}", e))?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal =
            Terminal::new(backend).map_err(|e| anyhow::anyhow!("Failed to create terminal: {}", e))?;

        let result = self.run_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let size = terminal.size()?;
        self.dispatch(Message::System(SystemMessage::Resize(size.width, size.height)));
        self.dispatch(Message::System(SystemMessage::Initialize));

        let mut last_tick = Instant::now();

        loop {
            // Results of finished requests
            while let Ok(message) = self.receiver.try_recv() {
                self.dispatch(message);
            }

            terminal.draw(|frame| ui::render(frame, &self.model, &self.theme))?;

            let timeout = self
                .tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => {
                        if let Some(message) = self.event_handler.handle_key_event(key, &self.model) {
                            self.dispatch(message);
                        }
                    }
                    Event::Resize(width, height) => {
                        self.dispatch(Message::System(SystemMessage::Resize(width, height)));
                    }
                    _ => {}
                }
            }

            if last_tick.elapsed() >= self.tick_rate {
                self.dispatch(Message::System(SystemMessage::Tick));
                last_tick = Instant::now();
            }

            if self.model.should_quit {
                tracing::info!("Dashboard closed");
                break;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tea::message::UIMessage;

    #[tokio::test]
    async fn test_dispatch_updates_model() {
        let mut app = App::new(&DashboardConfig::default()).unwrap();
        app.dispatch(Message::UI(UIMessage::ToggleHelp));
        assert!(app.model().modal.is_some());
        app.dispatch(Message::System(SystemMessage::Quit));
        assert!(app.model().should_quit);
    }

    #[test]
    fn test_invalid_url_is_reported() {
        let mut config = DashboardConfig::default();
        config.api.base_url = "not a url".to_string();
        assert!(App::new(&config).is_err());
    }
}
