use crate::host::TextBuffer;
use ropey::Rope;
use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Buffer {
    id: BufferId,
    rope: Rope,
    file_path: Option<PathBuf>,
    modified: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(usize);

impl BufferId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl Buffer {
    pub fn new(id: BufferId) -> Self {
        Self {
            id,
            rope: Rope::new(),
            file_path: None,
            modified: false,
        }
    }

    pub fn from_str(id: BufferId, text: &str) -> Self {
        Self {
            id,
            rope: Rope::from_str(text),
            file_path: None,
            modified: false,
        }
    }

    pub fn from_file(id: BufferId, path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let rope = Rope::from_str(&content);

        Ok(Self {
            id,
            rope,
            file_path: Some(path.to_path_buf()),
            modified: false,
        })
    }

    pub fn new_with_path(id: BufferId, path: &Path) -> Self {
        Self {
            id,
            rope: Rope::new(),
            file_path: Some(path.to_path_buf()),
            modified: false,
        }
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// 编辑器意义上的行数（从 1 开始计数）
    ///
    /// ropey 会把末尾换行之后的空串也算作一行，这里不计入。
    pub fn line_count(&self) -> usize {
        let len = self.rope.len_lines();
        if len > 1 && self.rope.line(len - 1).len_chars() == 0 {
            len - 1
        } else {
            len
        }
    }

    /// 第 `line` 行（从 1 开始）去掉换行符后的字符数
    pub fn line_len(&self, line: usize) -> usize {
        self.line_text(line)
            .map(|text| text.chars().count())
            .unwrap_or(0)
    }

    /// 把 (`line`, `column`) 转换为 rope 中的字符索引，均从 1 开始
    fn char_idx(&self, line: usize, column: usize) -> usize {
        self.rope.line_to_char(line - 1) + column - 1
    }

    /// 在 (`line`, `column`) 处断行，`column` 从 1 开始，供插入模式的回车使用
    pub fn split_line(&mut self, line: usize, column: usize) -> bool {
        if line == 0 || line > self.line_count() || column == 0 || column > self.line_len(line) + 1 {
            return false;
        }
        let idx = self.char_idx(line, column);
        self.rope.insert_char(idx, '\n');
        self.modified = true;
        true
    }

    /// 把第 `line` 行并入上一行（行首退格）
    pub fn join_with_previous(&mut self, line: usize) -> bool {
        if line < 2 || line > self.line_count() {
            return false;
        }
        let prev_start = self.rope.line_to_char(line - 2);
        let ending_start = prev_start + self.line_len(line - 1);
        let line_start = self.rope.line_to_char(line - 1);
        self.rope.remove(ending_start..line_start);
        self.modified = true;
        true
    }

    pub fn save(&mut self) -> io::Result<()> {
        if let Some(ref path) = self.file_path {
            let mut file = fs::File::create(path)?;
            for chunk in self.rope.chunks() {
                file.write_all(chunk.as_bytes())?;
            }
            // 确保文件以换行符结尾（Unix文本文件惯例）
            if self.rope.len_chars() > 0 {
                let last_char = self.rope.char(self.rope.len_chars() - 1);
                if last_char != '\n' {
                    file.write_all(b"\n")?;
                }
            }
            self.modified = false;
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "No file path set",
            ))
        }
    }

    pub fn save_as(&mut self, path: &Path) -> io::Result<()> {
        self.file_path = Some(path.to_path_buf());
        self.save()
    }

    pub fn to_string(&self) -> String {
        self.rope.to_string()
    }
}

impl TextBuffer for Buffer {
    fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        if line == 0 || line > self.line_count() {
            return None;
        }
        let slice = self.rope.line(line - 1);
        let text = match slice.as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(slice.to_string()),
        };
        Some(match text {
            Cow::Borrowed(s) => Cow::Borrowed(strip_line_ending(s)),
            Cow::Owned(s) => Cow::Owned(strip_line_ending(&s).to_string()),
        })
    }

    fn delete_char(&mut self, line: usize, column: usize) -> Option<char> {
        if column == 0 || column > self.line_len(line) {
            return None;
        }
        let idx = self.char_idx(line, column);
        let ch = self.rope.char(idx);
        self.rope.remove(idx..idx + 1);
        self.modified = true;
        Some(ch)
    }

    fn insert_char(&mut self, line: usize, column: usize, ch: char) -> bool {
        if is_line_break(ch) || line == 0 || line > self.line_count() {
            return false;
        }
        if column == 0 || column > self.line_len(line) + 1 {
            return false;
        }
        let idx = self.char_idx(line, column);
        self.rope.insert_char(idx, ch);
        self.modified = true;
        true
    }
}

/// ropey 视为断行的字符（默认开启 `unicode_lines`）
pub fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\u{000B}' | '\u{000C}' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

fn strip_line_ending(text: &str) -> &str {
    if let Some(stripped) = text.strip_suffix("\r\n") {
        return stripped;
    }
    match text.chars().next_back() {
        Some(ch) if is_line_break(ch) => &text[..text.len() - ch.len_utf8()],
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_creation() {
        let buffer = Buffer::new(BufferId::new(0));
        assert!(buffer.is_empty());
        assert!(!buffer.is_modified());
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line_text(1).as_deref(), Some(""));
    }

    #[test]
    fn test_trailing_newline_is_not_a_line() {
        let buffer = Buffer::from_str(BufferId::new(0), "one\ntwo\n");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line_text(2).as_deref(), Some("two"));
        assert!(buffer.line_text(3).is_none());
        assert!(buffer.line_text(0).is_none());
    }

    #[test]
    fn test_crlf_is_stripped() {
        let buffer = Buffer::from_str(BufferId::new(0), "one\r\ntwo");
        assert_eq!(buffer.line_text(1).as_deref(), Some("one"));
        assert_eq!(buffer.line_len(1), 3);
    }

    #[test]
    fn test_unicode_separators_are_stripped() {
        let buffer = Buffer::from_str(BufferId::new(0), "ab\u{2028}cd\u{2029}ef\u{0085}gh");
        assert_eq!(buffer.line_count(), 4);
        assert_eq!(buffer.line_text(1).as_deref(), Some("ab"));
        assert_eq!(buffer.line_text(3).as_deref(), Some("ef"));
        assert_eq!(buffer.line_len(2), 2);
    }

    #[test]
    fn test_delete_at_line_end_keeps_separator() {
        let mut buffer = Buffer::from_str(BufferId::new(0), "ab\u{2028}cd");
        assert_eq!(buffer.delete_char(1, 3), None);
        assert_eq!(buffer.delete_char(1, 2), Some('b'));
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.to_string(), "a\u{2028}cd");
        assert!(!buffer.insert_char(1, 2, '\u{2029}'));
    }

    #[test]
    fn test_join_removes_whole_line_ending() {
        let mut buffer = Buffer::from_str(BufferId::new(0), "one\r\ntwo");
        assert!(buffer.join_with_previous(2));
        assert_eq!(buffer.to_string(), "onetwo");
        assert_eq!(buffer.line_count(), 1);
    }

    #[test]
    fn test_delete_and_insert_char() {
        let mut buffer = Buffer::from_str(BufferId::new(0), "abc\ndef\n");
        assert_eq!(buffer.delete_char(2, 1), Some('d'));
        assert!(buffer.insert_char(2, 3, 'x'));
        assert_eq!(buffer.to_string(), "abc\nefx\n");
        assert!(buffer.is_modified());
    }

    #[test]
    fn test_char_ops_never_touch_newline() {
        let mut buffer = Buffer::from_str(BufferId::new(0), "ab\ncd");
        assert_eq!(buffer.delete_char(1, 3), None);
        assert!(!buffer.insert_char(1, 5, 'x'));
        assert!(!buffer.insert_char(1, 1, '\n'));
        assert_eq!(buffer.to_string(), "ab\ncd");
    }

    #[test]
    fn test_split_and_join() {
        let mut buffer = Buffer::from_str(BufferId::new(0), "hello world");
        assert!(buffer.split_line(1, 6));
        assert_eq!(buffer.to_string(), "hello\n world");
        assert!(buffer.join_with_previous(2));
        assert_eq!(buffer.to_string(), "hello world");
    }
}
