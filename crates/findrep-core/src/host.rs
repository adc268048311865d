//! 宿主编辑器需要提供的能力
//!
//! 搜索引擎只通过这里的 trait 访问缓冲区、提示行和消息通道，
//! 本 crate 中的 `Buffer`、`LineEdit`、`MessageLog` 是它们的参考实现。

use std::borrow::Cow;

/// 以行为单位的文本缓冲区
pub trait TextBuffer {
    /// 取第 `line` 行（从 1 开始）的文本，不含换行符。
    /// 超出缓冲区时返回 `None`，这是搜索循环唯一的终止条件。
    fn line_text(&self, line: usize) -> Option<Cow<'_, str>>;

    /// 删除 (`line`, `column`) 处的字符，`column` 从 1 开始。
    /// 不会删除换行符，也不会改变行号。
    fn delete_char(&mut self, line: usize, column: usize) -> Option<char>;

    /// 在 (`line`, `column`) 处插入字符，`column` 从 1 开始，
    /// `column == 行长 + 1` 表示追加到行尾。
    fn insert_char(&mut self, line: usize, column: usize, ch: char) -> bool;
}

/// 交互式提示行收到的按键
///
/// 原始按键码在边界处一次性解码为这个枚举。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Esc / Ctrl-C
    Cancel,
    /// Enter
    Confirm,
    Char(char),
    Backspace,
}

/// 行编辑提示符
pub trait Prompt {
    fn clear(&mut self);
    fn feed(&mut self, key: Key);
    fn text(&self) -> &str;
}

/// 用户消息通道
pub trait Notify {
    fn info(&mut self, message: &str);
    fn error(&mut self, message: &str);
}
