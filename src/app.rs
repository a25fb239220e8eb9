use crate::config::Config;
use crate::data::DataClient;
use crate::error::{AppError, AppResult};
use crate::events::network::{Event as NetworkEvent, Handler as NetworkEventHandler};
use crate::events::terminal::Handler as TerminalEventHandler;
use crate::issues::AnySource;
use crate::logger::{self, LogBuffer};
use crate::state::{FileStorage, Link, State, ViewStore};
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::{self, stdout, Stdout};
use std::sync::Arc;
use tokio::sync::Mutex;

pub type NetworkEventSender = std::sync::mpsc::Sender<NetworkEvent>;
type NetworkEventReceiver = std::sync::mpsc::Receiver<NetworkEvent>;

/// Oversees event processing, state management, and terminal output.
///
pub struct App {
    state: Arc<Mutex<State>>,
}

impl App {
    /// Start a new application according to the given configuration, link
    /// and reset flag. Returns the result of the application execution.
    ///
    pub async fn start(config: Config, link: Link, reset: bool) -> Result<()> {
        let log = LogBuffer::default();
        logger::init(log.clone(), LevelFilter::Debug).map_err(AppError::from)?;

        info!("Starting application...");
        let source = config.source();
        let mut view = ViewStore::load(Box::new(FileStorage::open(
            &config.state_path().map_err(AppError::from)?,
        )));
        if reset {
            info!("Resetting persisted view state...");
            view.reset();
        }
        let (light_theme, dark_theme) = config.themes();

        let (tx, rx) = std::sync::mpsc::channel::<NetworkEvent>();
        let app = App {
            state: Arc::new(Mutex::new(State::new(
                view,
                link,
                Some(tx),
                log,
                light_theme,
                dark_theme,
            ))),
        };
        app.start_network(rx, source)?;
        app.start_ui().await?;

        info!("Exiting application...");
        Ok(())
    }

    /// Start a separate thread for asynchronous state mutations.
    ///
    fn start_network(&self, net_receiver: NetworkEventReceiver, source: AnySource) -> Result<()> {
        debug!("Creating new thread for asynchronous networking...");
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| AppError::RuntimeCreation(e.to_string()))?;
        let cloned_state = Arc::clone(&self.state);
        std::thread::spawn(move || {
            runtime.block_on(async {
                let mut client = DataClient::new(source);
                let mut network_event_handler =
                    NetworkEventHandler::new(&cloned_state, &mut client);
                while let Ok(network_event) = net_receiver.recv() {
                    match network_event_handler.handle(network_event).await {
                        Ok(_) => (),
                        Err(e) => error!("Failed to handle network event: {}", e),
                    }
                }
            })
        });
        Ok(())
    }

    /// Begin the terminal event poll on a separate thread before starting the
    /// render loop on the main thread. Return the result following an exit
    /// request or unrecoverable error.
    ///
    async fn start_ui(&self) -> Result<()> {
        debug!("Starting user interface on main thread...");
        let mut terminal = Self::setup_terminal()?;

        {
            let mut state = self.state.lock().await;
            state.request_issues().request_open_issue();
        }

        let result = self.run_ui(&mut terminal).await;
        Self::restore_terminal(&mut terminal)?;
        result
    }

    /// Enter the alternate screen in raw mode.
    ///
    fn setup_terminal() -> AppResult<Terminal<CrosstermBackend<Stdout>>> {
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        enable_raw_mode()
            .map_err(|e| AppError::Terminal(format!("Failed to enable raw mode: {}", e)))?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;
        Ok(terminal)
    }

    fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> AppResult<()> {
        disable_raw_mode()
            .map_err(|e| AppError::Terminal(format!("Failed to disable raw mode: {}", e)))?;
        execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
        terminal.show_cursor()?;
        Ok(())
    }

    async fn run_ui<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<()> {
        let terminal_event_handler = TerminalEventHandler::new();
        loop {
            let mut state = self.state.lock().await;
            terminal.draw(|frame| crate::ui::render(frame, &mut state))?;
            // Release the lock while waiting so fetch results can land.
            drop(state);
            let event = terminal_event_handler.next()?;
            let mut state = self.state.lock().await;
            if !terminal_event_handler.handle(event, &mut state) {
                debug!("Received application exit request.");
                return Ok(());
            }
        }
    }
}
