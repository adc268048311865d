//! 按键解码测试
//!
//! 对应源文件: src/keys.rs

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use findrep_core::host::Key;
use findrep_core::replace::Confirmation;
use findrep_tui::keys::{confirm_reply, prompt_key};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

// ==================== 提示行 ====================

#[test]
fn test_prompt_keys() {
    assert_eq!(prompt_key(&key(KeyCode::Esc)), Some(Key::Cancel));
    assert_eq!(prompt_key(&ctrl('c')), Some(Key::Cancel));
    assert_eq!(prompt_key(&key(KeyCode::Enter)), Some(Key::Confirm));
    assert_eq!(prompt_key(&key(KeyCode::Backspace)), Some(Key::Backspace));
    assert_eq!(prompt_key(&key(KeyCode::Char('x'))), Some(Key::Char('x')));
}

#[test]
fn test_prompt_ignores_other_keys() {
    assert_eq!(prompt_key(&key(KeyCode::Left)), None);
    assert_eq!(prompt_key(&key(KeyCode::F(1))), None);
    assert_eq!(prompt_key(&ctrl('w')), None);
}

#[test]
fn test_shifted_chars_are_chars() {
    let event = KeyEvent::new(KeyCode::Char('N'), KeyModifiers::SHIFT);
    assert_eq!(prompt_key(&event), Some(Key::Char('N')));
}

// ==================== 确认替换 ====================

#[test]
fn test_confirm_replies() {
    assert_eq!(confirm_reply(&key(KeyCode::Char('y'))), Some(Confirmation::Yes));
    assert_eq!(confirm_reply(&key(KeyCode::Char('n'))), Some(Confirmation::No));
    assert_eq!(confirm_reply(&key(KeyCode::Char('a'))), Some(Confirmation::All));
    assert_eq!(confirm_reply(&key(KeyCode::Char('q'))), Some(Confirmation::Quit));
    assert_eq!(confirm_reply(&key(KeyCode::Esc)), Some(Confirmation::Quit));
    assert_eq!(confirm_reply(&ctrl('c')), Some(Confirmation::Quit));
    assert_eq!(confirm_reply(&key(KeyCode::Char('x'))), None);
}
