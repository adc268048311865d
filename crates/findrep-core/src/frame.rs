//! 匹配缓存
//!
//! 每个视口一份 `MatchFrame`，按 (行, 起始列) 升序保存匹配。
//! 顺序由搜索引擎的单次线性扫描保证，这里从不重新排序。

use crate::window::ViewportId;
use std::collections::HashMap;

/// 一次匹配：`line` 从 1 开始，`start`/`end` 是行内字符列（半开区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl Match {
    pub fn new(line: usize, start: usize, end: usize) -> Self {
        Self { line, start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchFrame {
    matches: Vec<Match>,
}

impl MatchFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// 清空匹配，保留已分配的空间供下次搜索复用
    pub fn clear(&mut self) {
        self.matches.clear();
    }

    pub(crate) fn push(&mut self, m: Match) {
        debug_assert!(
            self.matches
                .last()
                .map_or(true, |last| (last.line, last.start) <= (m.line, m.start)),
            "matches must arrive in (line, start) order"
        );
        self.matches.push(m);
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// 某一行上的全部匹配（渲染时逐行调用）
    pub fn on_line(&self, line: usize) -> &[Match] {
        let from = self.matches.partition_point(|m| m.line < line);
        let to = self.matches.partition_point(|m| m.line <= line);
        &self.matches[from..to]
    }

    /// 1-based 序号，用于状态栏显示 "[2/5]"
    pub fn index_of(&self, line: usize, column: usize) -> Option<usize> {
        self.matches
            .iter()
            .position(|m| m.line == line && m.start == column)
            .map(|i| i + 1)
    }
}

/// 视口 -> 匹配缓存
#[derive(Debug, Default)]
pub struct MatchFrameRegistry {
    frames: HashMap<ViewportId, MatchFrame>,
}

impl MatchFrameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, viewport: ViewportId) -> &mut MatchFrame {
        self.frames.entry(viewport).or_default()
    }

    pub fn get(&self, viewport: ViewportId) -> Option<&MatchFrame> {
        self.frames.get(&viewport)
    }

    pub fn get_mut(&mut self, viewport: ViewportId) -> Option<&mut MatchFrame> {
        self.frames.get_mut(&viewport)
    }

    /// 视口关闭时调用
    pub fn remove(&mut self, viewport: ViewportId) -> Option<MatchFrame> {
        self.frames.remove(&viewport)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
