#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Command,
    /// 交互式搜索（`/` 提示行）
    Search,
    /// 带 `c` 标志的替换正在等待 y/n/a/q
    ConfirmReplace,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Command => "COMMAND",
            Mode::Search => "SEARCH",
            Mode::ConfirmReplace => "REPLACE",
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Mode::Insert)
    }

    /// 底部提示行正在接收输入
    pub fn uses_prompt(&self) -> bool {
        matches!(self, Mode::Command | Mode::Search)
    }
}
