//! 搜索引擎
//!
//! 从第 1 行开始逐行扫描，直到缓冲区返回“没有这一行”为止。
//! 每行从偏移 0 开始匹配，记录的列号都换算成字符列；
//! `global` 为真时继续在同一行剩余部分查找，否则每行只取第一个匹配。

use crate::frame::{Match, MatchFrame};
use crate::host::TextBuffer;
use regex::Regex;

/// 重新扫描缓冲区并填充 `frame`，返回匹配数
pub fn search<B>(buffer: &B, regex: &Regex, global: bool, frame: &mut MatchFrame) -> usize
where
    B: TextBuffer + ?Sized,
{
    frame.clear();

    let mut line = 1;
    while let Some(text) = buffer.line_text(line) {
        scan_line(line, &text, regex, global, frame);
        line += 1;
    }

    tracing::debug!(
        pattern = regex.as_str(),
        lines = line - 1,
        matches = frame.len(),
        global,
        "search finished"
    );

    frame.len()
}

/// 扫描单行
///
/// `offset` 是字节偏移；`chars_before` 记录 `offset_byte` 之前的字符数，
/// 避免每个匹配都从行首重新数字符。
fn scan_line(line: usize, text: &str, regex: &Regex, global: bool, frame: &mut MatchFrame) {
    let mut offset = 0;
    let mut counted_byte = 0;
    let mut chars_before = 0;
    let mut last_end: Option<usize> = None;

    while offset <= text.len() {
        let Some(m) = regex.find_at(text, offset) else {
            break;
        };

        // 紧贴上一个匹配末尾的空匹配不算（不重叠）
        let adjacent_empty = m.start() == m.end() && last_end == Some(m.start());
        if !adjacent_empty {
            chars_before += text[counted_byte..m.start()].chars().count();
            counted_byte = m.start();
            let width = text[m.start()..m.end()].chars().count();
            frame.push(Match::new(line, chars_before, chars_before + width));

            if !global {
                break;
            }
        }

        last_end = Some(m.end());
        offset = if m.end() > m.start() {
            m.end()
        } else {
            next_char_boundary(text, m.end())
        };
    }
}

/// `byte` 之后的下一个字符边界；已在行尾时返回 `len + 1` 以结束循环
fn next_char_boundary(text: &str, byte: usize) -> usize {
    text[byte..]
        .chars()
        .next()
        .map_or(text.len() + 1, |ch| byte + ch.len_utf8())
}
