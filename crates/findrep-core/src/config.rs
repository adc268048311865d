//! 选项
//!
//! 运行时通过 `:set` 修改，也可以在启动时从 JSON 反序列化。

use crate::highlight::HighlightStyles;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// 搜索时忽略大小写
    pub ignorecase: bool,
    /// 到达首尾时回绕
    pub wrapscan: bool,
    /// 高亮全部匹配
    pub hlsearch: bool,
    /// 交互式搜索时每次按键都重新搜索
    pub incsearch: bool,
    pub styles: HighlightStyles,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            ignorecase: false,
            wrapscan: true,
            hlsearch: true,
            incsearch: true,
            styles: HighlightStyles::default(),
        }
    }
}

impl Options {
    /// 处理 `:set xxx`，未知选项返回 `false`
    pub fn set(&mut self, option: &str) -> bool {
        let (name, value) = match option.strip_prefix("no") {
            // nohlsearch、nows 等否定形式
            Some(rest) if is_known(rest) => (rest, false),
            _ => (option, true),
        };

        match name {
            "ignorecase" | "ic" => self.ignorecase = value,
            "wrapscan" | "ws" => self.wrapscan = value,
            "hlsearch" | "hls" => self.hlsearch = value,
            "incsearch" | "is" => self.incsearch = value,
            _ => return false,
        }
        true
    }
}

fn is_known(name: &str) -> bool {
    matches!(
        name,
        "ignorecase" | "ic" | "wrapscan" | "ws" | "hlsearch" | "hls" | "incsearch" | "is"
    )
}
