//! 查找 / 替换控制器
//!
//! `Finder` 持有模式、各视口的匹配缓存以及至多一个交互式搜索会话，
//! 所有搜索和替换操作都经由它完成。

use crate::buffer::is_line_break;
use crate::config::Options;
use crate::cursor::Cursor;
use crate::error::FindError;
use crate::frame::{Match, MatchFrame, MatchFrameRegistry};
use crate::host::{Key, Notify, Prompt, TextBuffer};
use crate::navigator::{self, Direction, Hit};
use crate::pattern::Pattern;
use crate::replace::ReplacePass;
use crate::replace_expr::ReplaceSpec;
use crate::search::search;
use crate::window::ViewportId;

/// 交互式搜索会话
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractiveSession {
    /// 进入交互模式时的光标，取消时恢复
    pub saved: Cursor,
    pub viewport: ViewportId,
    pub accepting: bool,
}

/// `handle_key` 处理完一个按键后的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// 没有进行中的会话，按键被忽略
    Idle,
    Active,
    Confirmed,
    Cancelled,
}

/// 替换结果
#[derive(Debug)]
pub enum ReplaceOutcome {
    Done { replaced: usize, lines: usize },
    /// 带 `c` 标志：由调用方逐个询问用户
    Confirm(ReplacePass),
}

#[derive(Debug, Default)]
pub struct Finder {
    pattern: Pattern,
    frames: MatchFrameRegistry,
    session: Option<InteractiveSession>,
}

impl Finder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn frames(&self) -> &MatchFrameRegistry {
        &self.frames
    }

    pub fn frame(&self, viewport: ViewportId) -> Option<&MatchFrame> {
        self.frames.get(viewport)
    }

    pub fn session(&self) -> Option<&InteractiveSession> {
        self.session.as_ref()
    }

    pub fn is_interactive(&self) -> bool {
        self.session.map_or(false, |s| s.accepting)
    }

    /// 命令式搜索：设置模式、搜索整个缓冲区、跳到光标之后最近的匹配
    pub fn find<B, N>(
        &mut self,
        viewport: ViewportId,
        buffer: &B,
        cursor: &mut Cursor,
        text: &str,
        options: &Options,
        notify: &mut N,
    ) -> Result<usize, FindError>
    where
        B: TextBuffer + ?Sized,
        N: Notify + ?Sized,
    {
        if text.is_empty() {
            self.pattern.clear();
            return Err(FindError::NoPattern);
        }
        let regex = self.pattern.try_replace(text, options.ignorecase)?;

        let frame = self.frames.get_or_create(viewport);
        let count = search(buffer, &regex, true, frame);
        if count == 0 {
            return Err(FindError::NotFound(text.to_string()));
        }

        let hit = navigator::nearest(frame, cursor.line, cursor.column, Direction::Forward)
            .ok_or_else(|| FindError::NotFound(text.to_string()))?;
        jump(cursor, hit, Direction::Forward, options, notify, text)?;
        if !hit.wrapped {
            notify.info(&format!("{} match(es) for {}", count, text));
        }
        Ok(count)
    }

    /// `n` / `N`：在已有匹配之间移动
    ///
    /// 当前视口的缓存为空（替换后、新视口）时，用已保存的模式重新搜索。
    pub fn find_next<B, N>(
        &mut self,
        viewport: ViewportId,
        buffer: &B,
        cursor: &mut Cursor,
        direction: Direction,
        options: &Options,
        notify: &mut N,
    ) -> Result<Hit, FindError>
    where
        B: TextBuffer + ?Sized,
        N: Notify + ?Sized,
    {
        if !self.pattern.exists() {
            return Err(FindError::NoPreviousPattern);
        }

        let stale = self.frames.get(viewport).map_or(true, MatchFrame::is_empty);
        if stale {
            let regex = self.pattern.compile(options.ignorecase)?;
            search(buffer, &regex, true, self.frames.get_or_create(viewport));
        }

        let frame = self.frames.get_or_create(viewport);
        let hit = navigator::nearest(frame, cursor.line, cursor.column, direction)
            .ok_or_else(|| FindError::NotFound(self.pattern.text().to_string()))?;
        jump(cursor, hit, direction, options, notify, self.pattern.text())?;
        Ok(hit)
    }

    /// 进入交互式搜索
    pub fn start_interactive<P>(&mut self, viewport: ViewportId, cursor: &Cursor, prompt: &mut P)
    where
        P: Prompt + ?Sized,
    {
        self.session = Some(InteractiveSession {
            saved: *cursor,
            viewport,
            accepting: true,
        });
        self.pattern.clear();
        prompt.clear();
        tracing::debug!(viewport = viewport.as_usize(), "interactive search started");
    }

    /// 交互式搜索收到一个按键
    pub fn handle_key<B, P, N>(
        &mut self,
        key: Key,
        buffer: &B,
        cursor: &mut Cursor,
        prompt: &mut P,
        options: &Options,
        notify: &mut N,
    ) -> SessionStatus
    where
        B: TextBuffer + ?Sized,
        P: Prompt + ?Sized,
        N: Notify + ?Sized,
    {
        let Some(session) = self.session else {
            return SessionStatus::Idle;
        };

        match key {
            Key::Cancel => {
                self.session = None;
                self.pattern.clear();
                if let Some(frame) = self.frames.get_mut(session.viewport) {
                    frame.clear();
                }
                *cursor = session.saved;
                prompt.clear();
                SessionStatus::Cancelled
            }
            Key::Confirm => {
                self.session = None;
                if !options.incsearch {
                    self.refresh(&session, buffer, cursor, options);
                }
                if self.pattern.exists() {
                    if let Err(err) = self.pattern.compile(options.ignorecase) {
                        // 缓存不再对应存储中的模式
                        if let Some(frame) = self.frames.get_mut(session.viewport) {
                            frame.clear();
                        }
                        notify.error(&err.to_string());
                    }
                }
                prompt.clear();
                SessionStatus::Confirmed
            }
            Key::Char(_) | Key::Backspace => {
                prompt.feed(key);
                self.pattern.replace(prompt.text());
                if options.incsearch {
                    self.refresh(&session, buffer, cursor, options);
                }
                SessionStatus::Active
            }
        }
    }

    /// 按当前模式重新搜索，并把光标放到保存位置处或之后的第一个匹配
    fn refresh<B>(
        &mut self,
        session: &InteractiveSession,
        buffer: &B,
        cursor: &mut Cursor,
        options: &Options,
    ) where
        B: TextBuffer + ?Sized,
    {
        if !self.pattern.exists() {
            self.frames.get_or_create(session.viewport).clear();
            *cursor = session.saved;
            return;
        }

        let regex = match self.pattern.compile(options.ignorecase) {
            Ok(regex) => regex,
            Err(err) => {
                // 确认时再报告
                tracing::trace!(pattern = self.pattern.text(), %err, "incomplete pattern");
                return;
            }
        };

        let frame = self.frames.get_or_create(session.viewport);
        search(buffer, &regex, true, frame);
        match navigator::at_or_after(frame, session.saved.line, session.saved.column) {
            Some(hit) => cursor.jump_to(hit.line, hit.column),
            None => *cursor = session.saved,
        }
    }

    /// 执行一次替换
    ///
    /// 带 `c` 标志时返回 `ReplaceOutcome::Confirm`，缓冲区此时尚未改动。
    /// 调用方负责在结束后把光标夹回缓冲区内。
    pub fn replace<B, N>(
        &mut self,
        viewport: ViewportId,
        buffer: &mut B,
        cursor_line: usize,
        spec: &ReplaceSpec,
        notify: &mut N,
    ) -> Result<ReplaceOutcome, FindError>
    where
        B: TextBuffer + ?Sized,
        N: Notify + ?Sized,
    {
        if spec.replacement.chars().any(is_line_break) {
            return Err(FindError::MultilineReplacement);
        }
        let regex = match &spec.find {
            Some(find) => self.pattern.try_replace(find, spec.flags.ignore_case)?,
            None if self.pattern.exists() => self.pattern.compile(spec.flags.ignore_case)?,
            None => return Err(FindError::NoPreviousPattern),
        };

        let frame = self.frames.get_or_create(viewport);
        search(&*buffer, &regex, spec.flags.global, frame);

        let (start, end) = spec.range.resolve(cursor_line);
        let selected: Vec<Match> = frame
            .matches()
            .iter()
            .filter(|m| m.line >= start && m.line <= end)
            .copied()
            .collect();
        if selected.is_empty() {
            return Err(FindError::NotFound(self.pattern.text().to_string()));
        }

        let mut pass = ReplacePass::new(selected, &spec.replacement);
        // 缓冲区即将改变，旧的匹配位置全部作废
        frame.clear();

        if spec.flags.confirm {
            tracing::debug!(candidates = pass.remaining(), "confirm replace started");
            return Ok(ReplaceOutcome::Confirm(pass));
        }

        pass.run_all(buffer);
        let (replaced, lines) = (pass.replaced(), pass.replaced_lines());
        tracing::debug!(pattern = self.pattern.text(), replaced, lines, "replace finished");
        notify.info(&replace_summary(replaced, lines));
        Ok(ReplaceOutcome::Done { replaced, lines })
    }

    /// `:nohlsearch`
    pub fn clear_frame(&mut self, viewport: ViewportId) {
        if let Some(frame) = self.frames.get_mut(viewport) {
            frame.clear();
        }
    }

    /// 缓冲区被其他途径修改后，令该视口的缓存失效
    pub fn invalidate(&mut self, viewport: ViewportId) {
        self.clear_frame(viewport);
    }

    /// 视口关闭时清理
    pub fn close_viewport(&mut self, viewport: ViewportId) {
        self.frames.remove(viewport);
        if self.session.map_or(false, |s| s.viewport == viewport) {
            self.session = None;
        }
    }
}

/// 替换完成后的提示
pub fn replace_summary(replaced: usize, lines: usize) -> String {
    match (replaced, lines) {
        (1, _) => "1 substitution on 1 line".to_string(),
        (n, 1) => format!("{} substitutions on 1 line", n),
        (n, l) => format!("{} substitutions on {} lines", n, l),
    }
}

fn jump<N>(
    cursor: &mut Cursor,
    hit: Hit,
    direction: Direction,
    options: &Options,
    notify: &mut N,
    pattern: &str,
) -> Result<(), FindError>
where
    N: Notify + ?Sized,
{
    if hit.wrapped {
        if !options.wrapscan {
            tracing::warn!(pattern, edge = direction.edge(), "wrap refused");
            return Err(FindError::WrapRefused {
                edge: direction.edge(),
                pattern: pattern.to_string(),
            });
        }
        notify.info(direction.wrap_notice());
    }
    cursor.jump_to(hit.line, hit.column);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Buffer, BufferId};
    use crate::notify::{MessageLog, Severity};
    use crate::prompt::LineEdit;
    use crate::replace_expr::parse_replace_expr;

    fn setup(text: &str) -> (Finder, Buffer, MessageLog) {
        (
            Finder::new(),
            Buffer::from_str(BufferId::new(0), text),
            MessageLog::new(),
        )
    }

    fn vp() -> ViewportId {
        ViewportId::new(0)
    }

    #[test]
    fn test_find_jumps_forward() {
        let (mut finder, buffer, mut log) = setup("foo\nbar foo\nfoo");
        let mut cursor = Cursor::new(1, 0);
        let count = finder
            .find(vp(), &buffer, &mut cursor, "foo", &Options::default(), &mut log)
            .unwrap();
        assert_eq!(count, 3);
        assert_eq!((cursor.line, cursor.column), (2, 4));
    }

    #[test]
    fn test_find_empty_pattern() {
        let (mut finder, buffer, mut log) = setup("foo");
        let mut cursor = Cursor::at_origin();
        let err = finder
            .find(vp(), &buffer, &mut cursor, "", &Options::default(), &mut log)
            .unwrap_err();
        assert_eq!(err, FindError::NoPattern);
        assert!(!finder.pattern().exists());
    }

    #[test]
    fn test_find_next_without_pattern() {
        let (mut finder, buffer, mut log) = setup("foo");
        let mut cursor = Cursor::at_origin();
        let err = finder
            .find_next(vp(), &buffer, &mut cursor, Direction::Forward, &Options::default(), &mut log)
            .unwrap_err();
        assert_eq!(err, FindError::NoPreviousPattern);
    }

    #[test]
    fn test_wrap_refused_without_wrapscan() {
        let (mut finder, buffer, mut log) = setup("foo\nbar");
        let mut cursor = Cursor::new(1, 0);
        let options = Options {
            wrapscan: false,
            ..Options::default()
        };
        finder.pattern.replace("foo");
        let err = finder
            .find_next(vp(), &buffer, &mut cursor, Direction::Forward, &options, &mut log)
            .unwrap_err();
        assert!(matches!(err, FindError::WrapRefused { edge: "BOTTOM", .. }));
        assert_eq!((cursor.line, cursor.column), (1, 0));
    }

    #[test]
    fn test_keys_while_idle_are_ignored() {
        let (mut finder, buffer, mut log) = setup("foo");
        let mut cursor = Cursor::at_origin();
        let mut prompt = LineEdit::new();
        let status = finder.handle_key(
            Key::Char('f'),
            &buffer,
            &mut cursor,
            &mut prompt,
            &Options::default(),
            &mut log,
        );
        assert_eq!(status, SessionStatus::Idle);
        assert!(prompt.is_empty());
    }

    #[test]
    fn test_confirm_reports_compile_error() {
        let (mut finder, buffer, mut log) = setup("foo");
        let mut cursor = Cursor::at_origin();
        let mut prompt = LineEdit::new();
        let options = Options::default();
        finder.start_interactive(vp(), &cursor, &mut prompt);
        for key in [Key::Char('('), Key::Confirm] {
            finder.handle_key(key, &buffer, &mut cursor, &mut prompt, &options, &mut log);
        }
        assert!(!finder.is_interactive());
        let last = log.last().unwrap();
        assert_eq!(last.severity, Severity::Error);
        assert_eq!(last.text, "Unbalanced parentheses!");
    }

    #[test]
    fn test_replace_rejects_newline() {
        let (mut finder, mut buffer, mut log) = setup("foo");
        let mut spec = parse_replace_expr("s/foo/x/").unwrap();
        spec.replacement = "a\nb".to_string();
        let err = finder.replace(vp(), &mut buffer, 1, &spec, &mut log).unwrap_err();
        assert_eq!(err, FindError::MultilineReplacement);
        assert_eq!(buffer.to_string(), "foo");

        spec.replacement = "a\u{2028}b".to_string();
        let err = finder.replace(vp(), &mut buffer, 1, &spec, &mut log).unwrap_err();
        assert_eq!(err, FindError::MultilineReplacement);
    }

    #[test]
    fn test_replace_summary() {
        assert_eq!(replace_summary(1, 1), "1 substitution on 1 line");
        assert_eq!(replace_summary(3, 1), "3 substitutions on 1 line");
        assert_eq!(replace_summary(4, 2), "4 substitutions on 2 lines");
    }

    #[test]
    fn test_close_viewport_drops_session() {
        let (mut finder, _, _) = setup("foo");
        let mut prompt = LineEdit::new();
        finder.start_interactive(vp(), &Cursor::at_origin(), &mut prompt);
        finder.close_viewport(vp());
        assert!(finder.session().is_none());
        assert!(finder.frame(vp()).is_none());
    }
}
