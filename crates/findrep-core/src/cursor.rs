use crate::buffer::Buffer;
use crate::host::TextBuffer;
use unicode_width::UnicodeWidthChar;

/// 视口中的光标
///
/// `line` 从 1 开始，`column` 从 0 开始，与 `Match` 使用同一套坐标。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
    pub preferred_column: Option<usize>,
}

impl Cursor {
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            preferred_column: None,
        }
    }

    pub fn at_origin() -> Self {
        Self::new(1, 0)
    }

    /// 跳转到某个位置（搜索命中、取消后恢复）
    pub fn jump_to(&mut self, line: usize, column: usize) {
        self.line = line;
        self.column = column;
        self.update_preferred_column();
    }

    pub fn move_left(&mut self, count: usize) {
        self.column = self.column.saturating_sub(count);
        self.update_preferred_column();
    }

    /// `allow_past_end` 为插入模式准备：光标可以停在最后一个字符之后
    pub fn move_right(&mut self, buffer: &Buffer, count: usize, allow_past_end: bool) {
        let max_col = max_column(buffer, self.line, allow_past_end);
        self.column = (self.column + count).min(max_col);
        self.update_preferred_column();
    }

    pub fn move_up(&mut self, buffer: &Buffer, count: usize) {
        self.line = self.line.saturating_sub(count).max(1);
        self.adjust_column(buffer);
    }

    pub fn move_down(&mut self, buffer: &Buffer, count: usize) {
        self.line = (self.line + count).min(buffer.line_count());
        self.adjust_column(buffer);
    }

    pub fn move_to_line_start(&mut self) {
        self.column = 0;
        self.update_preferred_column();
    }

    pub fn move_to_line_end(&mut self, buffer: &Buffer) {
        self.column = max_column(buffer, self.line, false);
        self.update_preferred_column();
    }

    pub fn move_to_top(&mut self, buffer: &Buffer) {
        self.line = 1;
        self.adjust_column(buffer);
    }

    pub fn move_to_bottom(&mut self, buffer: &Buffer) {
        self.line = buffer.line_count();
        self.adjust_column(buffer);
    }

    fn adjust_column(&mut self, buffer: &Buffer) {
        let max_col = max_column(buffer, self.line, false);
        let wanted = self.preferred_column.unwrap_or(self.column);
        self.column = wanted.min(max_col);
    }

    pub fn update_preferred_column(&mut self) {
        self.preferred_column = Some(self.column);
    }

    /// 把光标夹回缓冲区范围内（替换之后行可能变短）
    pub fn ensure_valid(&mut self, buffer: &Buffer, allow_past_end: bool) {
        self.line = self.line.clamp(1, buffer.line_count());
        self.column = self.column.min(max_column(buffer, self.line, allow_past_end));
    }

    /// 光标之前文本的显示宽度，供终端放置光标
    pub fn display_column(&self, buffer: &Buffer) -> usize {
        buffer
            .line_text(self.line)
            .map(|text| {
                text.chars()
                    .take(self.column)
                    .map(|ch| ch.width().unwrap_or(0))
                    .sum()
            })
            .unwrap_or(0)
    }
}

fn max_column(buffer: &Buffer, line: usize, allow_past_end: bool) -> usize {
    let len = buffer.line_len(line);
    if allow_past_end {
        len
    } else {
        len.saturating_sub(1)
    }
}
