use crate::buffer::{Buffer, BufferId};
use crate::config::Options;
use crate::cursor::Cursor;
use crate::error::{EditorError, FindError};
use crate::finder::{replace_summary, Finder, ReplaceOutcome, SessionStatus};
use crate::highlight::{highlight_line, Attr};
use crate::host::{Key, Notify, Prompt, TextBuffer};
use crate::mode::Mode;
use crate::motion::Motion;
use crate::navigator::Direction;
use crate::notify::{Message, MessageLog};
use crate::prompt::LineEdit;
use crate::replace::{Confirmation, ReplacePass};
use crate::replace_expr::parse_replace_expr;
use crate::window::{ViewportId, ViewportManager};
use std::io;
use std::path::Path;

/// 参考宿主编辑器
///
/// 持有缓冲区和视口，把命令行、按键分派给 `Finder`。
pub struct Editor {
    /// 下标即 `BufferId`
    buffers: Vec<Buffer>,
    viewports: ViewportManager,
    mode: Mode,
    command_line: LineEdit,
    messages: MessageLog,
    finder: Finder,
    options: Options,
    pending_replace: Option<ReplacePass>,
    should_quit: bool,
}

impl Editor {
    pub fn new() -> Self {
        Self::with_buffer(Buffer::new(BufferId::new(0)))
    }

    pub fn from_text(text: &str) -> Self {
        Self::with_buffer(Buffer::from_str(BufferId::new(0), text))
    }

    pub fn with_file(path: &Path) -> io::Result<Self> {
        let mut editor = Self::new();
        editor.open_file(path)?;
        Ok(editor)
    }

    fn with_buffer(buffer: Buffer) -> Self {
        Self {
            viewports: ViewportManager::new(buffer.id()),
            buffers: vec![buffer],
            mode: Mode::Normal,
            command_line: LineEdit::new(),
            messages: MessageLog::new(),
            finder: Finder::new(),
            options: Options::default(),
            pending_replace: None,
            should_quit: false,
        }
    }

    pub fn open_file(&mut self, path: &Path) -> io::Result<()> {
        let buffer_id = BufferId::new(self.buffers.len());
        let buffer = if path.exists() {
            Buffer::from_file(buffer_id, path)?
        } else {
            Buffer::new_with_path(buffer_id, path)
        };
        self.buffers.push(buffer);

        let viewport = self.viewports.current_mut();
        viewport.set_buffer(buffer_id);
        let id = viewport.id();
        self.finder.invalidate(id);
        self.mode = Mode::Normal;
        tracing::debug!(path = %path.display(), "opened file");
        Ok(())
    }

    // ==================== 访问器 ====================

    pub fn buffer(&self, id: BufferId) -> Option<&Buffer> {
        self.buffers.get(id.as_usize())
    }

    pub fn current_buffer(&self) -> &Buffer {
        &self.buffers[self.viewports.current().buffer_id().as_usize()]
    }

    pub fn viewports(&self) -> &ViewportManager {
        &self.viewports
    }

    pub fn viewports_mut(&mut self) -> &mut ViewportManager {
        &mut self.viewports
    }

    pub fn cursor(&self) -> &Cursor {
        self.viewports.current().cursor()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn command_line(&self) -> &str {
        self.command_line.text()
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// 把命令错误送到消息通道
    pub fn report_error(&mut self, err: &EditorError) {
        self.messages.error(&err.to_string());
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    pub fn finder(&self) -> &Finder {
        &self.finder
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// 确认替换时提示行显示的文字
    pub fn confirm_prompt(&self) -> Option<String> {
        let pass = self.pending_replace.as_ref()?;
        Some(format!("replace with {} (y/n/a/q)?", pass.replacement()))
    }

    // ==================== 普通 / 插入模式 ====================

    pub fn execute_motion(&mut self, motion: Motion) {
        let allow_past_end = self.mode.is_insert();
        let viewport = self.viewports.current_mut();
        let buffer = &self.buffers[viewport.buffer_id().as_usize()];
        motion.execute(viewport.cursor_mut(), buffer, allow_past_end);
    }

    pub fn enter_insert_mode(&mut self) {
        self.mode = Mode::Insert;
    }

    pub fn exit_insert_mode(&mut self) {
        self.mode = Mode::Normal;
        let viewport = self.viewports.current_mut();
        let buffer = &self.buffers[viewport.buffer_id().as_usize()];
        viewport.cursor_mut().ensure_valid(buffer, false);
    }

    pub fn insert_char(&mut self, ch: char) {
        if !self.mode.is_insert() {
            return;
        }
        let viewport = self.viewports.current_mut();
        let buffer_id = viewport.buffer_id();
        let cursor = viewport.cursor_mut();
        if self.buffers[buffer_id.as_usize()].insert_char(cursor.line, cursor.column + 1, ch) {
            cursor.column += 1;
            cursor.update_preferred_column();
            self.buffer_changed(buffer_id);
        }
    }

    pub fn insert_newline(&mut self) {
        if !self.mode.is_insert() {
            return;
        }
        let viewport = self.viewports.current_mut();
        let buffer_id = viewport.buffer_id();
        let cursor = viewport.cursor_mut();
        if self.buffers[buffer_id.as_usize()].split_line(cursor.line, cursor.column + 1) {
            cursor.jump_to(cursor.line + 1, 0);
            self.buffer_changed(buffer_id);
        }
    }

    pub fn backspace(&mut self) {
        if !self.mode.is_insert() {
            return;
        }
        let viewport = self.viewports.current_mut();
        let buffer_id = viewport.buffer_id();
        let cursor = viewport.cursor_mut();
        let buffer = &mut self.buffers[buffer_id.as_usize()];

        let changed = if cursor.column > 0 {
            let deleted = buffer.delete_char(cursor.line, cursor.column).is_some();
            if deleted {
                cursor.move_left(1);
            }
            deleted
        } else {
            let prev_len = buffer.line_len(cursor.line.saturating_sub(1));
            let joined = buffer.join_with_previous(cursor.line);
            if joined {
                cursor.jump_to(cursor.line - 1, prev_len);
            }
            joined
        };

        if changed {
            self.buffer_changed(buffer_id);
        }
    }

    /// 缓冲区被修改：显示它的所有视口的匹配缓存作废，光标夹回范围内
    fn buffer_changed(&mut self, buffer_id: BufferId) {
        let current = self.viewports.current().id();
        let insert = self.mode.is_insert();
        let buffer = &self.buffers[buffer_id.as_usize()];
        for viewport in self.viewports.iter_mut() {
            if viewport.buffer_id() != buffer_id {
                continue;
            }
            self.finder.invalidate(viewport.id());
            let allow_past_end = insert && viewport.id() == current;
            viewport.cursor_mut().ensure_valid(buffer, allow_past_end);
        }
    }

    // ==================== 命令行 ====================

    pub fn enter_command_mode(&mut self) {
        self.mode = Mode::Command;
        self.command_line.clear();
    }

    /// 命令行模式下的按键
    pub fn command_key(&mut self, key: Key) {
        match key {
            Key::Cancel => {
                self.command_line.clear();
                self.mode = Mode::Normal;
            }
            Key::Confirm => {
                let command = self.command_line.take();
                self.mode = Mode::Normal;
                if let Err(err) = self.execute_command(&command) {
                    self.report_error(&err);
                }
            }
            Key::Backspace if self.command_line.is_empty() => {
                self.mode = Mode::Normal;
            }
            Key::Char(_) | Key::Backspace => self.command_line.feed(key),
        }
    }

    pub fn execute_command(&mut self, command: &str) -> Result<(), EditorError> {
        let command = command.trim();
        let command = command.strip_prefix(':').unwrap_or(command);
        if command.is_empty() {
            return Ok(());
        }
        if is_replace_expr(command) {
            return self.replace(command);
        }

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "w" | "write" => self.write(arg)?,
            "q" | "quit" => {
                if self.current_buffer().is_modified() {
                    return Err(EditorError::Unsaved);
                }
                self.should_quit = true;
            }
            "q!" | "quit!" => self.should_quit = true,
            "wq" | "x" => {
                self.write(arg)?;
                self.should_quit = true;
            }
            "set" => {
                for option in arg.split_whitespace() {
                    if !self.options.set(option) {
                        return Err(EditorError::UnknownOption(option.to_string()));
                    }
                }
            }
            "find" if arg.is_empty() => self.start_search(),
            "find" => {
                self.find(arg)?;
            }
            "find-next" => self.find_next(Direction::Forward)?,
            "find-prev" => self.find_next(Direction::Backward)?,
            "replace" => self.replace(arg)?,
            "noh" | "nohlsearch" => {
                let id = self.viewports.current().id();
                self.finder.clear_frame(id);
            }
            "sp" | "split" => self.split_viewport(),
            "close" => self.close_viewport()?,
            other => return Err(EditorError::UnknownCommand(other.to_string())),
        }
        Ok(())
    }

    fn write(&mut self, path: &str) -> Result<(), EditorError> {
        let id = self.viewports.current().buffer_id();
        let buffer = &mut self.buffers[id.as_usize()];
        if !path.is_empty() {
            buffer.save_as(Path::new(path))?;
        } else if buffer.file_path().is_some() {
            buffer.save()?;
        } else {
            return Err(EditorError::NoFileName);
        }
        let name = buffer
            .file_path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.messages
            .info(&format!("\"{}\" {}L written", name, buffer.line_count()));
        Ok(())
    }

    // ==================== 搜索 ====================

    /// `/`：进入交互式搜索
    pub fn start_search(&mut self) {
        self.mode = Mode::Search;
        let viewport = self.viewports.current();
        self.finder
            .start_interactive(viewport.id(), viewport.cursor(), &mut self.command_line);
    }

    /// 交互式搜索模式下的按键
    pub fn search_key(&mut self, key: Key) -> SessionStatus {
        let viewport = self.viewports.current_mut();
        let buffer = &self.buffers[viewport.buffer_id().as_usize()];
        let status = self.finder.handle_key(
            key,
            buffer,
            viewport.cursor_mut(),
            &mut self.command_line,
            &self.options,
            &mut self.messages,
        );
        if status != SessionStatus::Active {
            self.mode = Mode::Normal;
        }
        status
    }

    pub fn find(&mut self, text: &str) -> Result<usize, EditorError> {
        let viewport = self.viewports.current_mut();
        let buffer = &self.buffers[viewport.buffer_id().as_usize()];
        let count = self.finder.find(
            viewport.id(),
            buffer,
            viewport.cursor_mut(),
            text,
            &self.options,
            &mut self.messages,
        )?;
        Ok(count)
    }

    pub fn find_next(&mut self, direction: Direction) -> Result<(), EditorError> {
        let viewport = self.viewports.current_mut();
        let buffer = &self.buffers[viewport.buffer_id().as_usize()];
        self.finder.find_next(
            viewport.id(),
            buffer,
            viewport.cursor_mut(),
            direction,
            &self.options,
            &mut self.messages,
        )?;
        Ok(())
    }

    // ==================== 替换 ====================

    pub fn replace(&mut self, expr: &str) -> Result<(), EditorError> {
        let spec = parse_replace_expr(expr).map_err(FindError::from)?;

        let viewport = self.viewports.current_mut();
        let id = viewport.id();
        let buffer_id = viewport.buffer_id();
        let cursor_line = viewport.cursor().line;
        let outcome = self.finder.replace(
            id,
            &mut self.buffers[buffer_id.as_usize()],
            cursor_line,
            &spec,
            &mut self.messages,
        )?;

        match outcome {
            ReplaceOutcome::Done { .. } => self.buffer_changed(buffer_id),
            ReplaceOutcome::Confirm(pass) => {
                if let Some(m) = pass.current() {
                    self.viewports.current_mut().cursor_mut().jump_to(m.line, m.start);
                }
                self.pending_replace = Some(pass);
                self.mode = Mode::ConfirmReplace;
            }
        }
        Ok(())
    }

    /// 确认替换模式下的回答
    pub fn confirm_key(&mut self, reply: Confirmation) {
        let Some(mut pass) = self.pending_replace.take() else {
            self.mode = Mode::Normal;
            return;
        };

        let buffer_id = self.viewports.current().buffer_id();
        let before = pass.replaced();
        let more = pass.answer(&mut self.buffers[buffer_id.as_usize()], reply);
        if pass.replaced() != before {
            self.buffer_changed(buffer_id);
        }

        if more {
            if let Some(m) = pass.current() {
                self.viewports.current_mut().cursor_mut().jump_to(m.line, m.start);
            }
            self.pending_replace = Some(pass);
            return;
        }

        self.mode = Mode::Normal;
        let viewport = self.viewports.current_mut();
        viewport
            .cursor_mut()
            .ensure_valid(&self.buffers[buffer_id.as_usize()], false);
        if pass.replaced() > 0 {
            self.messages
                .info(&replace_summary(pass.replaced(), pass.replaced_lines()));
        }
        tracing::debug!(replaced = pass.replaced(), "confirm replace finished");
    }

    // ==================== 视口 ====================

    pub fn split_viewport(&mut self) {
        let id = self.viewports.split_current();
        tracing::debug!(viewport = id.as_usize(), "split viewport");
    }

    pub fn close_viewport(&mut self) -> Result<(), EditorError> {
        let id = self
            .viewports
            .close_current()
            .ok_or(EditorError::LastViewport)?;
        self.finder.close_viewport(id);
        if self.mode == Mode::Search && self.finder.session().is_none() {
            self.mode = Mode::Normal;
        }
        Ok(())
    }

    pub fn next_viewport(&mut self) {
        self.viewports.next();
    }

    // ==================== 渲染 ====================

    /// 第 `line` 行的文本
    pub fn line_text(&self, viewport: ViewportId, line: usize) -> Option<String> {
        let viewport = self.viewports.get(viewport)?;
        let buffer = self.buffers.get(viewport.buffer_id().as_usize())?;
        buffer.line_text(line).map(|text| text.into_owned())
    }

    /// 第 `line` 行逐字符的高亮属性
    pub fn line_attrs(&self, viewport: ViewportId, line: usize, len: usize) -> Vec<Attr> {
        let mut attrs = vec![Attr::default(); len];
        let Some(view) = self.viewports.get(viewport) else {
            return attrs;
        };
        let styles = &self.options.styles;

        if self.options.hlsearch {
            if let Some(frame) = self.finder.frame(viewport) {
                highlight_line(frame, line, Some(view.cursor()), &mut attrs, styles);
            }
        }

        let is_current = self.viewports.current().id() == viewport;
        if let (true, Some(pass)) = (is_current, &self.pending_replace) {
            if let Some(m) = pass.current().filter(|m| m.line == line) {
                let end = m.end.min(len);
                for attr in attrs.iter_mut().take(end).skip(m.start) {
                    attr.merge(&styles.current);
                }
            }
        }
        attrs
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

/// `s/..`、`%s/..`、`5,10s/..` 这类裸替换表达式
fn is_replace_expr(command: &str) -> bool {
    command
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == ',' || c == '%')
        .starts_with("s/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_replace_expr() {
        assert!(is_replace_expr("s/a/b/"));
        assert!(is_replace_expr("%s/a/b/g"));
        assert!(is_replace_expr("5,10s/a/b/"));
        assert!(!is_replace_expr("set ic"));
        assert!(!is_replace_expr("split"));
    }

    #[test]
    fn test_insert_invalidates_frames() {
        let mut editor = Editor::from_text("foo foo");
        editor.find("foo").unwrap();
        let id = editor.viewports().current().id();
        assert_eq!(editor.finder().frame(id).map(|f| f.len()), Some(2));

        editor.enter_insert_mode();
        editor.insert_char('x');
        assert_eq!(editor.finder().frame(id).map(|f| f.len()), Some(0));
    }

    #[test]
    fn test_unknown_command() {
        let mut editor = Editor::new();
        let err = editor.execute_command("frobnicate").unwrap_err();
        assert!(matches!(err, EditorError::UnknownCommand(name) if name == "frobnicate"));
    }

    #[test]
    fn test_quit_refuses_unsaved() {
        let mut editor = Editor::from_text("abc");
        editor.enter_insert_mode();
        editor.insert_char('x');
        assert!(matches!(editor.execute_command("q"), Err(EditorError::Unsaved)));
        assert!(!editor.should_quit());
        editor.execute_command("q!").unwrap();
        assert!(editor.should_quit());
    }
}
