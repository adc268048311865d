//! 替换引擎
//!
//! 按 (行, 起始列) 升序逐个改写匹配。同一行里前面的替换会让后面的
//! 匹配整体左移或右移，`LineShift` 记录这个累计位移；换到新的一行时位移归零。
//! 整个过程不会在两次编辑之间重新扫描缓冲区。

use crate::frame::Match;
use crate::host::TextBuffer;
use std::collections::VecDeque;

/// 当前行上已累计的列位移
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineShift {
    line: usize,
    offset: isize,
}

impl LineShift {
    pub fn offset(&self) -> isize {
        self.offset
    }

    /// 进入 `m` 所在的行：行号变化时位移归零
    pub fn enter(self, m: &Match) -> Self {
        if m.line == self.line {
            self
        } else {
            Self {
                line: m.line,
                offset: 0,
            }
        }
    }

    /// `m` 在当前缓冲区中的起始列（从 0 开始）
    pub fn column_of(&self, m: &Match) -> usize {
        (m.start as isize + self.offset) as usize
    }

    /// 删除 `removed` 个字符并插入 `inserted` 个字符之后的位移
    pub fn after_edit(self, removed: usize, inserted: usize) -> Self {
        Self {
            line: self.line,
            offset: self.offset + inserted as isize - removed as isize,
        }
    }
}

/// 一次具体的缓冲区编辑，`column` 从 1 开始
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedEdit {
    pub line: usize,
    pub column: usize,
    pub delete: usize,
    pub insert: usize,
}

/// 把匹配列表折叠成编辑序列，全部接受时与 `ReplacePass` 的行为一致
pub fn plan_edits(matches: &[Match], replacement_len: usize) -> Vec<PlannedEdit> {
    matches
        .iter()
        .scan(LineShift::default(), |shift, m| {
            let entered = shift.enter(m);
            let edit = PlannedEdit {
                line: m.line,
                column: entered.column_of(m) + 1,
                delete: m.len(),
                insert: replacement_len,
            };
            *shift = entered.after_edit(m.len(), replacement_len);
            Some(edit)
        })
        .collect()
}

/// 在缓冲区上执行一次编辑
///
/// 先在同一位置连续删除，再把替换文本倒序逐字插入：
/// 每次插入都会把之前插入的字符往右推，倒序插入后读出来正好是正序。
fn apply_edit<B>(buffer: &mut B, edit: &PlannedEdit, replacement: &[char])
where
    B: TextBuffer + ?Sized,
{
    for _ in 0..edit.delete {
        buffer.delete_char(edit.line, edit.column);
    }
    for &ch in replacement.iter().rev() {
        buffer.insert_char(edit.line, edit.column, ch);
    }
}

/// 用户对单个替换候选的回答
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// 替换这一个
    Yes,
    /// 跳过这一个
    No,
    /// 替换这一个以及剩下的全部
    All,
    /// 停止，剩下的都不替换
    Quit,
}

impl Confirmation {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'y' | 'Y' => Some(Confirmation::Yes),
            'n' | 'N' => Some(Confirmation::No),
            'a' | 'A' => Some(Confirmation::All),
            'q' | 'Q' => Some(Confirmation::Quit),
            _ => None,
        }
    }
}

/// 一次进行中的替换
///
/// 非确认模式下直接 `run_all`；确认模式下每次按键调用一次 `answer`，
/// 位移状态在两次按键之间保留。
#[derive(Debug, Clone)]
pub struct ReplacePass {
    pending: VecDeque<Match>,
    replacement: Vec<char>,
    shift: LineShift,
    replaced: usize,
    replaced_lines: usize,
    last_replaced_line: Option<usize>,
}

impl ReplacePass {
    pub fn new(matches: impl IntoIterator<Item = Match>, replacement: &str) -> Self {
        Self {
            pending: matches.into_iter().collect(),
            replacement: replacement.chars().collect(),
            shift: LineShift::default(),
            replaced: 0,
            replaced_lines: 0,
            last_replaced_line: None,
        }
    }

    /// 下一个候选在当前缓冲区中的位置（已按位移修正）
    pub fn current(&self) -> Option<Match> {
        let m = self.pending.front()?;
        let column = self.shift.enter(m).column_of(m);
        Some(Match::new(m.line, column, column + m.len()))
    }

    pub fn replacement(&self) -> String {
        self.replacement.iter().collect()
    }

    pub fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn replaced(&self) -> usize {
        self.replaced
    }

    /// 发生过替换的行数
    pub fn replaced_lines(&self) -> usize {
        self.replaced_lines
    }

    /// 替换下一个候选
    pub fn accept<B>(&mut self, buffer: &mut B) -> bool
    where
        B: TextBuffer + ?Sized,
    {
        let Some(m) = self.pending.pop_front() else {
            return false;
        };
        let shift = self.shift.enter(&m);
        let edit = PlannedEdit {
            line: m.line,
            column: shift.column_of(&m) + 1,
            delete: m.len(),
            insert: self.replacement.len(),
        };
        apply_edit(buffer, &edit, &self.replacement);

        self.shift = shift.after_edit(edit.delete, edit.insert);
        if self.last_replaced_line != Some(m.line) {
            self.last_replaced_line = Some(m.line);
            self.replaced_lines += 1;
        }
        self.replaced += 1;
        true
    }

    /// 跳过下一个候选：缓冲区不变，位移也不变
    pub fn skip(&mut self) {
        if let Some(m) = self.pending.pop_front() {
            self.shift = self.shift.enter(&m);
        }
    }

    /// 按用户回答推进，返回是否还有后续候选
    pub fn answer<B>(&mut self, buffer: &mut B, reply: Confirmation) -> bool
    where
        B: TextBuffer + ?Sized,
    {
        match reply {
            Confirmation::Yes => {
                self.accept(buffer);
            }
            Confirmation::No => self.skip(),
            Confirmation::All => self.run_all(buffer),
            Confirmation::Quit => self.pending.clear(),
        }
        !self.is_done()
    }

    /// 替换剩下的全部候选
    pub fn run_all<B>(&mut self, buffer: &mut B)
    where
        B: TextBuffer + ?Sized,
    {
        while self.accept(buffer) {}
    }
}
