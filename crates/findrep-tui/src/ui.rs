use findrep_core::highlight::{Attr, Color as AttrColor};
use findrep_core::notify::Severity;
use findrep_core::{Editor, MatchFrame, Mode, ViewportId};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn draw(frame: &mut Frame, editor: &mut Editor) {
    let size = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(size);

    let ids: Vec<ViewportId> = editor.viewports().iter().map(|v| v.id()).collect();
    let count = ids.len() as u32;
    let panes = Layout::default()
        .direction(Direction::Vertical)
        .constraints(ids.iter().map(|_| Constraint::Ratio(1, count)).collect::<Vec<_>>())
        .split(chunks[0]);

    for (id, area) in ids.into_iter().zip(panes.iter()) {
        draw_viewport(frame, editor, id, *area);
    }
    draw_command_line(frame, editor, chunks[1]);
}

/// 一个视口：正文加一行状态栏
fn draw_viewport(frame: &mut Frame, editor: &mut Editor, id: ViewportId, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let text_area = parts[0];
    let height = text_area.height as usize;
    let is_current = editor.viewports().current().id() == id;

    let Some(viewport) = editor.viewports_mut().get_mut(id) else {
        return;
    };
    let cursor = *viewport.cursor();
    let scroll = calculate_scroll_offset(cursor.line, height, viewport.scroll_offset());
    viewport.set_scroll_offset(scroll);
    let buffer_id = viewport.buffer_id();

    let mut lines = Vec::with_capacity(height);
    for line in scroll..scroll + height {
        let Some(text) = editor.line_text(id, line) else {
            lines.push(Line::from(Span::styled("~", Style::default().fg(Color::DarkGray))));
            continue;
        };
        let attrs = editor.line_attrs(id, line, text.chars().count());
        lines.push(styled_line(&text, &attrs));
    }
    frame.render_widget(Paragraph::new(Text::from(lines)), text_area);

    if let Some(buffer) = editor.buffer(buffer_id) {
        if is_current && !editor.mode().uses_prompt() {
            if let Some(row) = cursor.line.checked_sub(scroll) {
                let x = text_area.x + cursor.display_column(buffer) as u16;
                let y = text_area.y + row as u16;
                if row < height && x < text_area.x + text_area.width {
                    frame.set_cursor(x, y);
                }
            }
        }

        let file_name = buffer
            .file_path()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("[No Name]");
        let modified = if buffer.is_modified() { " [+]" } else { "" };
        let counter = match_counter(editor.finder().frame(id), cursor.line, cursor.column)
            .map(|c| format!("{} ", c))
            .unwrap_or_default();
        draw_status_line(
            frame,
            parts[1],
            &format!("{}{}", file_name, modified),
            &format!("{}{}:{} ", counter, cursor.line, cursor.column + 1),
            is_current.then(|| editor.mode()),
        );
    }
}

fn draw_status_line(frame: &mut Frame, area: Rect, file: &str, position: &str, mode: Option<Mode>) {
    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(10), Constraint::Min(1), Constraint::Length(24)])
        .split(area);

    let bar = Style::default().bg(Color::DarkGray);
    if let Some(mode) = mode {
        let mode_style = Style::default()
            .fg(Color::Black)
            .bg(mode_color(mode))
            .add_modifier(Modifier::BOLD);
        let mode_widget = Paragraph::new(Line::from(Span::styled(format!(" {} ", mode.name()), mode_style)));
        frame.render_widget(mode_widget, status_chunks[0]);
    } else {
        frame.render_widget(Paragraph::new("").style(bar), status_chunks[0]);
    }

    frame.render_widget(Paragraph::new(file.to_string()).style(bar), status_chunks[1]);
    frame.render_widget(
        Paragraph::new(position.to_string())
            .style(bar)
            .alignment(Alignment::Right),
        status_chunks[2],
    );
}

fn draw_command_line(frame: &mut Frame, editor: &Editor, area: Rect) {
    let (content, style) = match editor.mode() {
        Mode::Command => (format!(":{}", editor.command_line()), Style::default()),
        Mode::Search => (format!("/{}", editor.command_line()), Style::default()),
        Mode::ConfirmReplace => (
            editor.confirm_prompt().unwrap_or_default(),
            Style::default().fg(Color::Cyan),
        ),
        _ => match editor.message() {
            Some(msg) if msg.severity == Severity::Error => {
                (msg.text.clone(), Style::default().fg(Color::Red))
            }
            Some(msg) => (msg.text.clone(), Style::default().fg(Color::Yellow)),
            None => (String::new(), Style::default()),
        },
    };

    if editor.mode().uses_prompt() {
        let x = area.x + content.width() as u16;
        if x < area.x + area.width {
            frame.set_cursor(x, area.y);
        }
    }
    frame.render_widget(Paragraph::new(Line::from(Span::styled(content, style))), area);
}

fn mode_color(mode: Mode) -> Color {
    match mode {
        Mode::Normal => Color::Blue,
        Mode::Insert => Color::Green,
        Mode::Command => Color::Magenta,
        Mode::Search => Color::Cyan,
        Mode::ConfirmReplace => Color::Red,
    }
}

fn to_color(color: AttrColor) -> Color {
    match color {
        AttrColor::Black => Color::Black,
        AttrColor::Red => Color::Red,
        AttrColor::Green => Color::Green,
        AttrColor::Yellow => Color::Yellow,
        AttrColor::Blue => Color::Blue,
        AttrColor::Magenta => Color::Magenta,
        AttrColor::Cyan => Color::Cyan,
        AttrColor::White => Color::White,
        AttrColor::Gray => Color::Gray,
        AttrColor::DarkGray => Color::DarkGray,
        AttrColor::Rgb(r, g, b) => Color::Rgb(r, g, b),
    }
}

pub fn attr_style(attr: &Attr) -> Style {
    let mut style = Style::default();
    if let Some(fg) = attr.fg {
        style = style.fg(to_color(fg));
    }
    if let Some(bg) = attr.bg {
        style = style.bg(to_color(bg));
    }
    if attr.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if attr.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if attr.reverse {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

/// 把相同属性的连续字符合并成一个 span
pub fn styled_line(text: &str, attrs: &[Attr]) -> Line<'static> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_attr: Option<Attr> = None;

    for (i, ch) in text.chars().enumerate() {
        let attr = attrs.get(i).copied().unwrap_or_default();
        if run_attr.is_some_and(|a| a != attr) {
            let style = run_attr.as_ref().map(attr_style).unwrap_or_default();
            spans.push(Span::styled(std::mem::take(&mut run), style));
        }
        run_attr = Some(attr);
        run.push(ch);
    }
    if let Some(attr) = run_attr {
        spans.push(Span::styled(run, attr_style(&attr)));
    }
    Line::from(spans)
}

/// 光标停在某个匹配的起点时显示 "[2/5]"
pub fn match_counter(frame: Option<&MatchFrame>, line: usize, column: usize) -> Option<String> {
    let frame = frame?;
    let index = frame.index_of(line, column)?;
    Some(format!("[{}/{}]", index, frame.len()))
}

/// 让光标行留在视口内，行号与偏移都从 1 开始
pub fn calculate_scroll_offset(cursor_line: usize, viewport_height: usize, current_offset: usize) -> usize {
    if viewport_height == 0 {
        return cursor_line.max(1);
    }
    if cursor_line < current_offset {
        cursor_line.max(1)
    } else if cursor_line >= current_offset + viewport_height {
        cursor_line + 1 - viewport_height
    } else {
        current_offset.max(1)
    }
}
