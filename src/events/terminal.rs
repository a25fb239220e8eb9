use crate::state::{Mode, State};
use anyhow::Result;
use clipboard::{ClipboardContext, ClipboardProvider};
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use log::*;
use std::{sync::mpsc, thread, time::Duration};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 60;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _tx: mpsc::Sender<Event<KeyEvent>>,
}

impl Handler {
    /// Return new instance after spawning new input polling thread.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || loop {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            match event::poll(tick_rate) {
                Ok(true) => {
                    if let Ok(CrosstermEvent::Key(key)) = event::read() {
                        if tx_clone.send(Event::Input(key)).is_err() {
                            break;
                        }
                    }
                }
                Ok(false) => (),
                Err(e) => {
                    error!("Failed to poll terminal events: {}", e);
                    break;
                }
            }
            if tx_clone.send(Event::Tick).is_err() {
                break;
            }
        });
        Handler { rx, _tx: tx }
    }

    /// Block until the next terminal event arrives.
    ///
    pub fn next(&self) -> Result<Event<KeyEvent>> {
        Ok(self.rx.recv()?)
    }

    /// Handle a terminal event. Returns true if should continue or false if
    /// exit was requested.
    ///
    pub fn handle(&self, event: Event<KeyEvent>, state: &mut State) -> bool {
        match event {
            Event::Input(event) => handle_key(state, event),
            Event::Tick => {
                state.tick();
                true
            }
        }
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply one key press to state. Returns false if exit was requested.
///
pub fn handle_key(state: &mut State, event: KeyEvent) -> bool {
    if event.kind != KeyEventKind::Press {
        return true;
    }
    if let KeyEvent {
        code: KeyCode::Char('c'),
        modifiers: KeyModifiers::CONTROL,
        ..
    } = event
    {
        debug!("Processing exit terminal event '{:?}'...", event);
        return false;
    }
    match state.mode() {
        Mode::Search => handle_search_key(state, event),
        Mode::Filters => handle_filters_key(state, event),
        Mode::Table => return handle_table_key(state, event),
    }
    true
}

fn handle_search_key(state: &mut State, event: KeyEvent) {
    match event.code {
        KeyCode::Esc | KeyCode::Enter => {
            state.exit_search_mode();
        }
        KeyCode::Backspace => {
            state.remove_search_char();
        }
        KeyCode::Char(c) if !event.modifiers.contains(KeyModifiers::CONTROL) => {
            debug!("Processing search character '{}' event '{:?}'...", c, event);
            state.add_search_char(c);
        }
        _ => debug!("Skipping processing of terminal event '{:?}'...", event),
    }
}

fn handle_filters_key(state: &mut State, event: KeyEvent) {
    match event.code {
        KeyCode::Esc | KeyCode::Char('f') => {
            state.close_filters();
        }
        KeyCode::Tab => {
            state.next_filter_category();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.next_filter_option();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.previous_filter_option();
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            state.toggle_filter_option();
        }
        KeyCode::Char('c') => {
            state.clear_filter_category();
        }
        KeyCode::Char('x') => {
            state.clear_all_filters();
        }
        _ => debug!("Skipping processing of terminal event '{:?}'...", event),
    }
}

fn handle_table_key(state: &mut State, event: KeyEvent) -> bool {
    match event.code {
        KeyCode::Char('q') => {
            debug!("Processing exit terminal event '{:?}'...", event);
            return false;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.next_row();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.previous_row();
        }
        KeyCode::Enter => {
            state.activate_selected();
        }
        KeyCode::Esc => {
            state.close_issue();
        }
        KeyCode::Char('/') => {
            state.enter_search_mode();
        }
        KeyCode::Char('f') => {
            state.open_filters();
        }
        KeyCode::Char('x') => {
            state.clear_all_filters();
        }
        KeyCode::Char('b') => {
            state.cycle_group_by();
        }
        KeyCode::Char(c @ '1'..='4') => {
            state.sort_column(c as usize - '1' as usize);
        }
        KeyCode::Char('n') | KeyCode::Right => {
            state.next_page();
        }
        KeyCode::Char('p') | KeyCode::Left => {
            state.previous_page();
        }
        KeyCode::Char('g') | KeyCode::Home => {
            state.first_page();
        }
        KeyCode::Char('G') | KeyCode::End => {
            state.last_page();
        }
        KeyCode::Char('s') => {
            state.cycle_page_size();
        }
        KeyCode::Char('t') => {
            state.toggle_dark_mode();
        }
        KeyCode::Char('r') => {
            state.refresh_issues();
        }
        KeyCode::Char('l') => {
            state.toggle_log();
        }
        KeyCode::Char('y') => copy_link(state),
        _ => debug!("Skipping processing of terminal event '{:?}'...", event),
    }
    true
}

fn copy_link(state: &mut State) {
    let link = state.share_link();
    let message = match ClipboardContext::new() {
        Ok(mut ctx) => match ctx.set_contents(link.clone()) {
            Ok(_) => {
                info!("Link copied to clipboard");
                format!("Copied {}", link)
            }
            Err(e) => {
                warn!("Failed to copy to clipboard: {}", e);
                format!("Link: {}", link)
            }
        },
        Err(e) => {
            warn!("Failed to initialize clipboard: {}", e);
            format!("Link: {}", link)
        }
    };
    state.set_status_message(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QueryState;
    use crate::issues::tests::issue;
    use crate::issues::IssueField;
    use crate::logger::LogBuffer;
    use crate::state::{Link, MemoryStorage, ViewStore};
    use crate::ui::Theme;
    use std::sync::Arc;

    fn state() -> State {
        let mut state = State::new(
            ViewStore::load(Box::new(MemoryStorage::new())),
            Link::default(),
            None,
            LogBuffer::default(),
            Theme::default(),
            Theme::tokyo_night(),
        );
        state.set_issues(QueryState::Success(Arc::new(vec![
            issue("ENG-1"),
            issue("ENG-2"),
        ])));
        state
    }

    fn press(state: &mut State, code: KeyCode) -> bool {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn quit_keys() {
        let mut state = state();
        assert!(!press(&mut state, KeyCode::Char('q')));
        assert!(!handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
    }

    #[test]
    fn search_mode_captures_letters() {
        let mut state = state();
        press(&mut state, KeyCode::Char('/'));
        assert_eq!(state.mode(), Mode::Search);
        // 'q' is text while searching.
        assert!(press(&mut state, KeyCode::Char('q')));
        press(&mut state, KeyCode::Char('x'));
        press(&mut state, KeyCode::Backspace);
        assert_eq!(state.view().search(), "q");
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.mode(), Mode::Table);
        assert_eq!(state.debounced_search(), "q");
    }

    #[test]
    fn number_keys_sort_columns() {
        let mut state = state();
        press(&mut state, KeyCode::Char('2'));
        assert_eq!(state.view().sort_field(), Some(IssueField::Priority));
        press(&mut state, KeyCode::Char('4'));
        assert_eq!(state.view().sort_field(), Some(IssueField::Estimate));
    }

    #[test]
    fn enter_opens_and_escape_closes() {
        let mut state = state();
        press(&mut state, KeyCode::Char('j'));
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.view().open_issue_id(), Some("ENG-2"));
        press(&mut state, KeyCode::Esc);
        assert_eq!(state.view().open_issue_id(), None);
    }

    #[test]
    fn filter_popover_keys() {
        let mut state = state();
        press(&mut state, KeyCode::Char('f'));
        assert_eq!(state.mode(), Mode::Filters);
        press(&mut state, KeyCode::Char(' '));
        assert!(!state.view().filters().is_empty());
        press(&mut state, KeyCode::Char('c'));
        assert!(state.view().filters().is_empty());
        press(&mut state, KeyCode::Esc);
        assert_eq!(state.mode(), Mode::Table);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = state();
        let mut event = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert!(handle_key(&mut state, event));
    }
}
