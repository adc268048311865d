//! 视口管理
//!
//! 每个视口绑定一个缓冲区，拥有自己的光标和滚动位置。
//! 匹配缓存按 `ViewportId` 区分，同一缓冲区的两个视口各有一份。

use crate::buffer::BufferId;
use crate::cursor::Cursor;

/// 视口唯一标识符（按身份比较，不按内容）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewportId(usize);

impl ViewportId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn as_usize(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Viewport {
    id: ViewportId,
    /// 视口显示的缓冲区
    buffer_id: BufferId,
    cursor: Cursor,
    /// 滚动偏移（显示的第一行，从 1 开始）
    scroll_offset: usize,
}

impl Viewport {
    pub fn new(id: ViewportId, buffer_id: BufferId) -> Self {
        Self {
            id,
            buffer_id,
            cursor: Cursor::at_origin(),
            scroll_offset: 1,
        }
    }

    pub fn id(&self) -> ViewportId {
        self.id
    }

    pub fn buffer_id(&self) -> BufferId {
        self.buffer_id
    }

    pub fn set_buffer(&mut self, buffer_id: BufferId) {
        self.buffer_id = buffer_id;
        self.cursor = Cursor::at_origin();
        self.scroll_offset = 1;
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_offset = offset.max(1);
    }
}

#[derive(Debug)]
pub struct ViewportManager {
    viewports: Vec<Viewport>,
    current_idx: usize,
    next_id: usize,
}

impl ViewportManager {
    pub fn new(buffer_id: BufferId) -> Self {
        Self {
            viewports: vec![Viewport::new(ViewportId::new(0), buffer_id)],
            current_idx: 0,
            next_id: 1,
        }
    }

    /// 分割当前视口，新视口显示同一缓冲区并继承光标
    pub fn split_current(&mut self) -> ViewportId {
        let id = ViewportId::new(self.next_id);
        self.next_id += 1;

        let current = self.current();
        let mut viewport = Viewport::new(id, current.buffer_id());
        viewport.cursor = *current.cursor();
        viewport.scroll_offset = current.scroll_offset();

        // 在当前视口之后插入新视口，并切换过去
        let insert_idx = self.current_idx + 1;
        self.viewports.insert(insert_idx, viewport);
        self.current_idx = insert_idx;

        id
    }

    /// 关闭当前视口，返回被关闭的 id；最后一个视口不能关闭
    pub fn close_current(&mut self) -> Option<ViewportId> {
        if self.viewports.len() <= 1 {
            return None;
        }

        let closed = self.viewports.remove(self.current_idx);
        if self.current_idx >= self.viewports.len() {
            self.current_idx = self.viewports.len() - 1;
        }

        Some(closed.id())
    }

    pub fn current(&self) -> &Viewport {
        &self.viewports[self.current_idx]
    }

    pub fn current_mut(&mut self) -> &mut Viewport {
        &mut self.viewports[self.current_idx]
    }

    pub fn current_idx(&self) -> usize {
        self.current_idx
    }

    pub fn len(&self) -> usize {
        self.viewports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewports.is_empty()
    }

    pub fn get(&self, id: ViewportId) -> Option<&Viewport> {
        self.viewports.iter().find(|v| v.id() == id)
    }

    pub fn get_mut(&mut self, id: ViewportId) -> Option<&mut Viewport> {
        self.viewports.iter_mut().find(|v| v.id() == id)
    }

    /// 切换到下一个视口（循环）
    pub fn next(&mut self) {
        self.current_idx = (self.current_idx + 1) % self.viewports.len();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Viewport> {
        self.viewports.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Viewport> {
        self.viewports.iter_mut()
    }
}
