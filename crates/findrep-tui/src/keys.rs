//! 终端按键到引擎按键的解码
//!
//! crossterm 的按键事件只在这里转换一次，之后一律使用引擎的封闭枚举。

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use findrep_core::host::Key;
use findrep_core::replace::Confirmation;

fn is_ctrl(key: &KeyEvent, ch: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(ch)
}

/// 提示行（命令行、交互式搜索）按键；无关按键返回 `None`
pub fn prompt_key(key: &KeyEvent) -> Option<Key> {
    if is_ctrl(key, 'c') {
        return Some(Key::Cancel);
    }
    match key.code {
        KeyCode::Esc => Some(Key::Cancel),
        KeyCode::Enter => Some(Key::Confirm),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => Some(Key::Char(ch)),
        _ => None,
    }
}

/// 确认替换时的回答，Esc 等同于 `q`
pub fn confirm_reply(key: &KeyEvent) -> Option<Confirmation> {
    if is_ctrl(key, 'c') {
        return Some(Confirmation::Quit);
    }
    match key.code {
        KeyCode::Esc => Some(Confirmation::Quit),
        KeyCode::Char(ch) => Confirmation::from_char(ch),
        _ => None,
    }
}
