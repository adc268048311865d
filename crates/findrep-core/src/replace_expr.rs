//! 替换表达式解析
//!
//! 支持的格式：`[:]<范围>s/<查找>/<替换>[/<标志>]`
//! - 范围：空（当前行）、`N`（单行）、`%`（整个缓冲区）、`N,M`（区间）
//! - 标志：`g` 每行全部替换，`c` 逐个确认，`i` 忽略大小写
//! - 查找为空时沿用上一次的模式；替换为空表示删除匹配文本
//! - `\/` 表示字面的 `/`

use crate::error::ExpressionParseError;

/// 替换作用的行范围（行号从 1 开始，区间两端都包含）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRange {
    Current,
    Line(usize),
    Span { start: usize, end: usize },
    Whole,
}

impl LineRange {
    /// 结合光标所在行求出实际的闭区间
    pub fn resolve(self, cursor_line: usize) -> (usize, usize) {
        match self {
            LineRange::Current => (cursor_line, cursor_line),
            LineRange::Line(line) => (line, line),
            LineRange::Span { start, end } => (start, end),
            LineRange::Whole => (1, usize::MAX),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceFlags {
    pub global: bool,
    pub confirm: bool,
    pub ignore_case: bool,
}

impl ReplaceFlags {
    /// 解析 `gci` 这样的标志串
    pub fn parse(flags: &str) -> Result<Self, ExpressionParseError> {
        let mut parsed = Self::default();
        for ch in flags.chars() {
            match ch {
                'g' => parsed.global = true,
                'c' => parsed.confirm = true,
                'i' => parsed.ignore_case = true,
                other => return Err(ExpressionParseError::UnknownFlag(other)),
            }
        }
        Ok(parsed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceSpec {
    pub range: LineRange,
    /// `None` 表示沿用已保存的模式
    pub find: Option<String>,
    pub replacement: String,
    pub flags: ReplaceFlags,
}

/// 解析一条替换表达式
pub fn parse_replace_expr(expr: &str) -> Result<ReplaceSpec, ExpressionParseError> {
    let expr = expr.trim();
    let expr = expr.strip_prefix(':').unwrap_or(expr);
    if expr.is_empty() {
        return Err(ExpressionParseError::Empty);
    }

    let Some(s_pos) = expr.find("s/") else {
        return Err(ExpressionParseError::Malformed(expr.to_string()));
    };
    let range = parse_range(&expr[..s_pos])?;

    let fields = split_fields(&expr[s_pos + 2..]);
    let (find, replacement, flags) = match fields.as_slice() {
        [find, replacement] => (find, replacement, ""),
        [find, replacement, flags] => (find, replacement, flags.as_str()),
        _ => return Err(ExpressionParseError::Malformed(expr.to_string())),
    };

    let flags = ReplaceFlags::parse(flags.trim_end())?;
    let find = if find.is_empty() { None } else { Some(find.clone()) };

    Ok(ReplaceSpec {
        range,
        find,
        replacement: replacement.clone(),
        flags,
    })
}

fn parse_range(range: &str) -> Result<LineRange, ExpressionParseError> {
    let range = range.trim();
    if range.is_empty() {
        return Ok(LineRange::Current);
    }

    let (start, end) = match range.split_once(',') {
        Some((start, end)) => (start.trim(), Some(end.trim())),
        None => (range, None),
    };

    if start == "%" {
        return match end {
            None => Ok(LineRange::Whole),
            Some(_) => Err(ExpressionParseError::WholeBufferWithEnd),
        };
    }

    match end {
        None => Ok(LineRange::Line(parse_line(start)?)),
        Some("") => Err(ExpressionParseError::MissingEnd(parse_line(start)?)),
        Some(end) if start.is_empty() => Err(ExpressionParseError::MissingStart(parse_line(end)?)),
        Some(end) => {
            let start = parse_line(start)?;
            let end = parse_line(end)?;
            if start > end {
                return Err(ExpressionParseError::BackwardsRange { start, end });
            }
            Ok(LineRange::Span { start, end })
        }
    }
}

fn parse_line(text: &str) -> Result<usize, ExpressionParseError> {
    match text.parse::<usize>() {
        Ok(line) if line > 0 => Ok(line),
        _ => Err(ExpressionParseError::InvalidLine(text.to_string())),
    }
}

/// 按未转义的 `/` 切分，`\/` 还原为 `/`，其余转义原样保留
fn split_fields(body: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('/') => current.push('/'),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => current.push('\\'),
            },
            '/' => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_span_with_flags() {
        let spec = parse_replace_expr("5,10s/foo/bar/gi").unwrap();
        assert_eq!(spec.range, LineRange::Span { start: 5, end: 10 });
        assert_eq!(spec.find.as_deref(), Some("foo"));
        assert_eq!(spec.replacement, "bar");
        assert!(spec.flags.global);
        assert!(spec.flags.ignore_case);
        assert!(!spec.flags.confirm);
    }

    #[test]
    fn test_parse_without_trailing_slash() {
        let spec = parse_replace_expr(":s/old/new").unwrap();
        assert_eq!(spec.range, LineRange::Current);
        assert_eq!(spec.replacement, "new");
        assert_eq!(spec.flags, ReplaceFlags::default());
    }

    #[test]
    fn test_escaped_slash() {
        let spec = parse_replace_expr(r"s/a\/b/c\/d/").unwrap();
        assert_eq!(spec.find.as_deref(), Some("a/b"));
        assert_eq!(spec.replacement, "c/d");
    }

    #[test]
    fn test_other_escapes_kept() {
        let spec = parse_replace_expr(r"s/\d+/N/g").unwrap();
        assert_eq!(spec.find.as_deref(), Some(r"\d+"));
    }

    #[test]
    fn test_resolve() {
        assert_eq!(LineRange::Current.resolve(7), (7, 7));
        assert_eq!(LineRange::Line(3).resolve(7), (3, 3));
        assert_eq!(LineRange::Whole.resolve(7), (1, usize::MAX));
    }
}
