use crossterm::event::{self, KeyEvent, KeyEventKind};
use std::io;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub enum Event {
    Tick,
    Key(KeyEvent),
    Resize(u16, u16),
}

/// 终端事件轮询
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// 等待下一个事件，超时返回 `Tick`
    pub fn next(&self) -> io::Result<Event> {
        if !event::poll(self.tick_rate)? {
            return Ok(Event::Tick);
        }
        match event::read()? {
            // Windows 下按键会同时上报按下和抬起
            event::Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
            event::Event::Resize(width, height) => Ok(Event::Resize(width, height)),
            _ => Ok(Event::Tick),
        }
    }
}
