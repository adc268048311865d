use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use findrep_core::{motion::Motion, Direction, Editor, Mode};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use crate::event::{Event, EventHandler};
use crate::keys::{confirm_reply, prompt_key};
use crate::ui;

/// 普通模式下等待第二个键的前缀
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    None,
    /// g - 等待第二个 g (gg)
    G,
    /// Ctrl-W - 等待 s / w / c
    Window,
}

pub struct App {
    editor: Editor,
    event_handler: EventHandler,
    pending: Pending,
}

impl App {
    pub fn new(editor: Editor) -> Self {
        Self {
            editor,
            event_handler: EventHandler::new(Duration::from_millis(50)),
            pending: Pending::None,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn pending(&self) -> Pending {
        self.pending
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_loop(&mut terminal);

        disable_raw_mode()?;
        terminal.backend_mut().execute(LeaveAlternateScreen)?;

        if let Err(err) = &result {
            tracing::warn!(%err, "event loop failed");
        }
        result
    }

    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        loop {
            terminal.draw(|f| ui::draw(f, &mut self.editor))?;

            if self.editor.should_quit() {
                break;
            }

            match self.event_handler.next()? {
                Event::Tick | Event::Resize(_, _) => {}
                Event::Key(key) => self.handle_key_event(key),
            }
        }

        Ok(())
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        tracing::trace!(code = ?key.code, mode = self.editor.mode().name(), "key");
        match self.editor.mode() {
            Mode::Normal => self.handle_normal_mode(key),
            Mode::Insert => self.handle_insert_mode(key),
            Mode::Command => {
                if let Some(key) = prompt_key(&key) {
                    self.editor.command_key(key);
                }
            }
            Mode::Search => {
                if let Some(key) = prompt_key(&key) {
                    self.editor.search_key(key);
                }
            }
            Mode::ConfirmReplace => {
                if let Some(reply) = confirm_reply(&key) {
                    self.editor.confirm_key(reply);
                }
            }
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) {
        match std::mem::replace(&mut self.pending, Pending::None) {
            Pending::G => {
                if key.code == KeyCode::Char('g') {
                    self.editor.execute_motion(Motion::DocumentStart);
                }
                return;
            }
            Pending::Window => {
                self.handle_window_key(key);
                return;
            }
            Pending::None => {}
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('w') {
                self.pending = Pending::Window;
            }
            return;
        }

        match key.code {
            KeyCode::Char('h') | KeyCode::Left => self.editor.execute_motion(Motion::Left),
            KeyCode::Char('j') | KeyCode::Down => self.editor.execute_motion(Motion::Down),
            KeyCode::Char('k') | KeyCode::Up => self.editor.execute_motion(Motion::Up),
            KeyCode::Char('l') | KeyCode::Right => self.editor.execute_motion(Motion::Right),
            KeyCode::Char('0') | KeyCode::Home => self.editor.execute_motion(Motion::LineStart),
            KeyCode::Char('$') | KeyCode::End => self.editor.execute_motion(Motion::LineEnd),
            KeyCode::Char('g') => self.pending = Pending::G,
            KeyCode::Char('G') => self.editor.execute_motion(Motion::DocumentEnd),
            KeyCode::Char('i') => self.editor.enter_insert_mode(),
            KeyCode::Char(':') => self.editor.enter_command_mode(),
            KeyCode::Char('/') => self.editor.start_search(),
            KeyCode::Char('n') => self.find_next(Direction::Forward),
            KeyCode::Char('N') => self.find_next(Direction::Backward),
            KeyCode::Esc => self.editor.clear_messages(),
            _ => {}
        }
    }

    fn handle_window_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('s') => self.editor.split_viewport(),
            KeyCode::Char('w') => self.editor.next_viewport(),
            KeyCode::Char('c') => {
                if let Err(err) = self.editor.close_viewport() {
                    self.editor.report_error(&err);
                }
            }
            _ => {}
        }
    }

    fn find_next(&mut self, direction: Direction) {
        if let Err(err) = self.editor.find_next(direction) {
            self.editor.report_error(&err);
        }
    }

    fn handle_insert_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.editor.exit_insert_mode(),
            KeyCode::Char(c) => self.editor.insert_char(c),
            KeyCode::Enter => self.editor.insert_newline(),
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Tab => {
                for _ in 0..4 {
                    self.editor.insert_char(' ');
                }
            }
            KeyCode::Left => self.editor.execute_motion(Motion::Left),
            KeyCode::Right => self.editor.execute_motion(Motion::Right),
            KeyCode::Up => self.editor.execute_motion(Motion::Up),
            KeyCode::Down => self.editor.execute_motion(Motion::Down),
            _ => {}
        }
    }
}
