//! 错误类型
//!
//! - `CompileError`：正则编译失败，按失败原因分类
//! - `ExpressionParseError`：替换表达式（`5,10s/foo/bar/g`）语法错误
//! - `FindError`：搜索 / 替换操作的统一错误
//! - `EditorError`：参考编辑器的命令错误

use thiserror::Error;

/// 正则编译错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Repetition character, e.g. `?' or `*', appeared in bad position!")]
    BadRepetition,

    #[error("Invalid curly bracket or brace usage!")]
    BadBrace,

    #[error("Unbalanced or invalid square brackets!")]
    BadBracket,

    #[error("Unbalanced parentheses!")]
    UnbalancedGroup,

    #[error("Invalid escape sequence!")]
    BadEscape,

    #[error("Invalid number in the `\\digit' construct!")]
    BadBackReference,

    #[error("Invalid class character name!")]
    BadClassName,

    #[error("Pattern too large to compile!")]
    ResourceExhausted,

    #[error("Syntax error in pattern: {0}")]
    Syntax(String),
}

/// 替换表达式解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionParseError {
    #[error("empty replace expression")]
    Empty,

    #[error("expected `s/<find>/<replace>/' in `{0}'")]
    Malformed(String),

    #[error("cannot provide both whole-buffer and ending line")]
    WholeBufferWithEnd,

    #[error("missing ending line after `{0},'")]
    MissingEnd(usize),

    #[error("missing starting line before `,{0}'")]
    MissingStart(usize),

    #[error("invalid line number `{0}'")]
    InvalidLine(String),

    #[error("backwards range {start},{end}")]
    BackwardsRange { start: usize, end: usize },

    #[error("unknown flag `{0}'")]
    UnknownFlag(char),
}

/// 搜索 / 替换操作错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FindError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Parse(#[from] ExpressionParseError),

    #[error("expected regular expression but got nothing")]
    NoPattern,

    #[error("no previous regular expression")]
    NoPreviousPattern,

    #[error("pattern not found: {0}")]
    NotFound(String),

    #[error("search hit {edge} without match for: {pattern}")]
    WrapRefused { edge: &'static str, pattern: String },

    #[error("replacement text cannot span lines")]
    MultilineReplacement,
}

/// 宿主编辑器命令错误
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Find(#[from] FindError),

    #[error("Not an editor command: {0}")]
    UnknownCommand(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("No write since last change (add ! to override)")]
    Unsaved,

    #[error("No file name")]
    NoFileName,

    #[error("Cannot close last window")]
    LastViewport,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
