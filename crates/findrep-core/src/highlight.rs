//! 匹配高亮
//!
//! 渲染管线每画一行调用一次 `highlight_line`，把高亮样式合并进该行
//! 逐字符的属性数组。光标正好停在某个匹配的起点时，该匹配使用
//! `current` 样式，其余匹配使用 `search` 样式。

use crate::cursor::Cursor;
use crate::frame::MatchFrame;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
    DarkGray,
    Rgb(u8, u8, u8),
}

/// 单个字符格的显示属性，`None` 表示沿用底层样式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attr {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub underline: bool,
    pub reverse: bool,
}

impl Attr {
    /// 叠加另一层样式：颜色覆盖，修饰符取并集
    pub fn merge(&mut self, other: &Attr) {
        if other.fg.is_some() {
            self.fg = other.fg;
        }
        if other.bg.is_some() {
            self.bg = other.bg;
        }
        self.bold |= other.bold;
        self.underline |= other.underline;
        self.reverse |= other.reverse;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightStyles {
    /// 普通匹配
    pub search: Attr,
    /// 光标所在的匹配
    pub current: Attr,
}

impl Default for HighlightStyles {
    fn default() -> Self {
        Self {
            search: Attr {
                fg: Some(Color::Black),
                bg: Some(Color::Yellow),
                ..Attr::default()
            },
            current: Attr {
                fg: Some(Color::Black),
                bg: Some(Color::Cyan),
                bold: true,
                ..Attr::default()
            },
        }
    }
}

/// 把第 `line` 行的匹配合并进 `attrs`，返回着色的匹配数
///
/// `attrs[i]` 对应该行第 `i` 个字符；超出数组的部分直接截断。
pub fn highlight_line(
    frame: &MatchFrame,
    line: usize,
    cursor: Option<&Cursor>,
    attrs: &mut [Attr],
    styles: &HighlightStyles,
) -> usize {
    let mut painted = 0;
    for m in frame.on_line(line) {
        let under_cursor = cursor.map_or(false, |c| c.line == line && c.column == m.start);
        let style = if under_cursor {
            &styles.current
        } else {
            &styles.search
        };

        let end = m.end.min(attrs.len());
        if m.start >= end {
            continue;
        }
        for attr in &mut attrs[m.start..end] {
            attr.merge(style);
        }
        painted += 1;
    }
    painted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Buffer, BufferId};
    use crate::search::search;
    use regex::Regex;

    fn frame(text: &str, pattern: &str) -> MatchFrame {
        let buffer = Buffer::from_str(BufferId::new(0), text);
        let mut frame = MatchFrame::new();
        search(&buffer, &Regex::new(pattern).unwrap(), true, &mut frame);
        frame
    }

    #[test]
    fn test_merge_keeps_base_modifiers() {
        let mut base = Attr {
            fg: Some(Color::Green),
            underline: true,
            ..Attr::default()
        };
        base.merge(&Attr {
            bg: Some(Color::Yellow),
            ..Attr::default()
        });
        assert_eq!(base.fg, Some(Color::Green));
        assert_eq!(base.bg, Some(Color::Yellow));
        assert!(base.underline);
    }

    #[test]
    fn test_cursor_match_uses_current_style() {
        let frame = frame("ab ab", "ab");
        let styles = HighlightStyles::default();
        let mut attrs = vec![Attr::default(); 5];
        let cursor = Cursor::new(1, 3);

        let painted = highlight_line(&frame, 1, Some(&cursor), &mut attrs, &styles);

        assert_eq!(painted, 2);
        assert_eq!(attrs[0].bg, styles.search.bg);
        assert_eq!(attrs[2], Attr::default());
        assert_eq!(attrs[3].bg, styles.current.bg);
        assert_eq!(attrs[4].bg, styles.current.bg);
    }

    #[test]
    fn test_short_attr_array_is_truncated() {
        let frame = frame("xxab", "ab");
        let mut attrs = vec![Attr::default(); 3];
        highlight_line(&frame, 1, None, &mut attrs, &HighlightStyles::default());
        assert!(attrs[2].bg.is_some());
    }
}
