//! 匹配导航
//!
//! 依赖 `MatchFrame` 按 (行, 起始列) 升序排列，线性扫描即可找到最近的匹配。
//! 找不到时回绕到另一端，并在 `Hit::wrapped` 中标记，由调用方决定是否提示。

use crate::frame::{Match, MatchFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// 回绕提示
    pub fn wrap_notice(self) -> &'static str {
        match self {
            Direction::Forward => "search hit BOTTOM, continuing at TOP",
            Direction::Backward => "search hit TOP, continuing at BOTTOM",
        }
    }

    /// 回绕时撞到的那一端
    pub fn edge(self) -> &'static str {
        match self {
            Direction::Forward => "BOTTOM",
            Direction::Backward => "TOP",
        }
    }
}

/// 导航结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub line: usize,
    pub column: usize,
    pub wrapped: bool,
}

impl Hit {
    fn at(m: &Match, wrapped: bool) -> Self {
        Self {
            line: m.line,
            column: m.start,
            wrapped,
        }
    }
}

/// 从 (`line`, `column`) 出发找最近的匹配，不包括光标所在位置本身
///
/// 缓存为空时返回 `None`，调用方不应移动光标。
pub fn nearest(frame: &MatchFrame, line: usize, column: usize, direction: Direction) -> Option<Hit> {
    let matches = frame.matches();
    match direction {
        Direction::Forward => matches
            .iter()
            .find(|m| (m.line == line && m.start > column) || m.line > line)
            .map(|m| Hit::at(m, false))
            .or_else(|| matches.first().map(|m| Hit::at(m, true))),
        Direction::Backward => matches
            .iter()
            .rev()
            .find(|m| (m.line == line && m.start < column) || m.line < line)
            .map(|m| Hit::at(m, false))
            .or_else(|| matches.last().map(|m| Hit::at(m, true))),
    }
}

/// 向前找第一个起点不早于 (`line`, `column`) 的匹配，交互式搜索使用
pub fn at_or_after(frame: &MatchFrame, line: usize, column: usize) -> Option<Hit> {
    let matches = frame.matches();
    matches
        .iter()
        .find(|m| (m.line == line && m.start >= column) || m.line > line)
        .map(|m| Hit::at(m, false))
        .or_else(|| matches.first().map(|m| Hit::at(m, true)))
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
    fn test_forward_same_line() {
        let frame = frame("ab ab ab", "ab");
        let hit = nearest(&frame, 1, 0, Direction::Forward).unwrap();
        assert_eq!((hit.line, hit.column, hit.wrapped), (1, 3, false));
    }

    #[test]
    fn test_forward_wraps() {
        let frame = frame("ab\nxx\nab", "ab");
        let hit = nearest(&frame, 3, 0, Direction::Forward).unwrap();
        assert_eq!((hit.line, hit.column, hit.wrapped), (1, 0, true));
    }

    #[test]
    fn test_backward_same_line() {
        let frame = frame("ab ab ab", "ab");
        let hit = nearest(&frame, 1, 6, Direction::Backward).unwrap();
        assert_eq!((hit.line, hit.column, hit.wrapped), (1, 3, false));
    }

    #[test]
    fn test_backward_wraps() {
        let frame = frame("ab\nxx\nab", "ab");
        let hit = nearest(&frame, 1, 0, Direction::Backward).unwrap();
        assert_eq!((hit.line, hit.column, hit.wrapped), (3, 0, true));
    }

    #[test]
    fn test_empty_frame() {
        let frame = MatchFrame::new();
        assert_eq!(nearest(&frame, 1, 0, Direction::Forward), None);
        assert_eq!(at_or_after(&frame, 1, 0), None);
    }

    #[test]
    fn test_at_or_after_is_inclusive() {
        let frame = frame("xab", "ab");
        let hit = at_or_after(&frame, 1, 1).unwrap();
        assert_eq!((hit.column, hit.wrapped), (1, false));
        let hit = at_or_after(&frame, 1, 2).unwrap();
        assert!(hit.wrapped);
    }
}
