use crate::host::{Key, Prompt};

/// 命令行 / 搜索行的行编辑缓冲
#[derive(Debug, Clone, Default)]
pub struct LineEdit {
    text: String,
}

impl LineEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// 取出内容并清空（命令行回车时使用）
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}

impl Prompt for LineEdit {
    fn clear(&mut self) {
        self.text.clear();
    }

    fn feed(&mut self, key: Key) {
        match key {
            Key::Char(ch) => self.text.push(ch),
            Key::Backspace => {
                self.text.pop();
            }
            Key::Cancel | Key::Confirm => {}
        }
    }

    fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_edit() {
        let mut edit = LineEdit::new();
        for key in [Key::Char('a'), Key::Char('b'), Key::Backspace, Key::Char('c')] {
            edit.feed(key);
        }
        assert_eq!(edit.text(), "ac");

        edit.feed(Key::Confirm);
        assert_eq!(edit.text(), "ac");

        assert_eq!(edit.take(), "ac");
        assert!(edit.is_empty());
    }
}
