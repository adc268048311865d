//! 搜索模式存储
//!
//! 保存当前的模式文本以及最近一次成功编译的正则。
//! 文本一旦改变，旧的编译结果立即作废；每次搜索前都会重新编译，
//! 因为大小写敏感设置可能随调用变化。

use crate::error::CompileError;
use regex::{Regex, RegexBuilder};
use regex_syntax::{ast, hir, ParserBuilder};

/// 编译后正则的大小上限，超出视为资源耗尽
const SIZE_LIMIT: usize = 10 * (1 << 20);

#[derive(Debug, Clone, Default)]
pub struct Pattern {
    text: String,
    compiled: Option<Regex>,
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn exists(&self) -> bool {
        !self.text.is_empty()
    }

    /// 覆盖模式文本，编译结果随之失效
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.compiled = None;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.compiled = None;
    }

    /// 最近一次成功编译的结果（一定来自当前文本）
    pub fn compiled(&self) -> Option<&Regex> {
        self.compiled.as_ref()
    }

    /// 先编译 `text`，成功后才替换当前模式
    ///
    /// 失败时保留原来的文本，存储里只会出现编译通过的模式。
    pub fn try_replace(&mut self, text: &str, ignore_case: bool) -> Result<Regex, CompileError> {
        let regex = compile(text, ignore_case)?;
        self.text = text.to_string();
        self.compiled = Some(regex.clone());
        Ok(regex)
    }

    /// 按当前文本无条件重新编译
    ///
    /// 失败时只清掉旧的编译结果，不影响任何匹配缓存。
    pub fn compile(&mut self, ignore_case: bool) -> Result<Regex, CompileError> {
        self.compiled = None;
        let regex = compile(&self.text, ignore_case)?;
        self.compiled = Some(regex.clone());
        Ok(regex)
    }
}

/// 编译正则，失败时给出分类后的错误
pub fn compile(text: &str, ignore_case: bool) -> Result<Regex, CompileError> {
    ParserBuilder::new()
        .case_insensitive(ignore_case)
        .build()
        .parse(text)
        .map_err(classify)?;

    RegexBuilder::new(text)
        .case_insensitive(ignore_case)
        .size_limit(SIZE_LIMIT)
        .build()
        .map_err(|err| match err {
            regex::Error::CompiledTooBig(_) => CompileError::ResourceExhausted,
            other => CompileError::Syntax(other.to_string()),
        })
}

fn classify(err: regex_syntax::Error) -> CompileError {
    match err {
        regex_syntax::Error::Parse(err) => classify_ast(&err),
        regex_syntax::Error::Translate(err) => classify_hir(&err),
        other => CompileError::Syntax(other.to_string()),
    }
}

fn classify_ast(err: &ast::Error) -> CompileError {
    use ast::ErrorKind::*;

    match err.kind() {
        RepetitionMissing => CompileError::BadRepetition,
        RepetitionCountInvalid
        | RepetitionCountUnclosed
        | RepetitionCountDecimalEmpty
        | DecimalEmpty
        | DecimalInvalid => CompileError::BadBrace,
        ClassUnclosed | ClassRangeInvalid | ClassRangeLiteral => CompileError::BadBracket,
        GroupUnclosed | GroupUnopened => CompileError::UnbalancedGroup,
        EscapeUnrecognized
        | EscapeUnexpectedEof
        | EscapeHexEmpty
        | EscapeHexInvalid
        | EscapeHexInvalidDigit
        | ClassEscapeInvalid => CompileError::BadEscape,
        UnsupportedBackreference => CompileError::BadBackReference,
        UnicodeClassInvalid => CompileError::BadClassName,
        NestLimitExceeded(_) | CaptureLimitExceeded => CompileError::ResourceExhausted,
        _ => CompileError::Syntax(err.to_string()),
    }
}

fn classify_hir(err: &hir::Error) -> CompileError {
    use hir::ErrorKind::*;

    match err.kind() {
        UnicodePropertyNotFound | UnicodePropertyValueNotFound | UnicodePerlClassNotFound => {
            CompileError::BadClassName
        }
        _ => CompileError::Syntax(err.to_string()),
    }
}
