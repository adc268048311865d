pub mod buffer;
pub mod config;
pub mod cursor;
pub mod editor;
pub mod error;
pub mod finder;
pub mod frame;
pub mod highlight;
pub mod host;
pub mod mode;
pub mod motion;
pub mod navigator;
pub mod notify;
pub mod pattern;
pub mod prompt;
pub mod replace;
pub mod replace_expr;
pub mod search;
pub mod window;

pub use buffer::{Buffer, BufferId};
pub use config::Options;
pub use cursor::Cursor;
pub use editor::Editor;
pub use error::{CompileError, EditorError, ExpressionParseError, FindError};
pub use finder::{Finder, ReplaceOutcome, SessionStatus};
pub use frame::{Match, MatchFrame, MatchFrameRegistry};
pub use host::{Key, Notify, Prompt, TextBuffer};
pub use mode::Mode;
pub use navigator::{Direction, Hit};
pub use replace::{Confirmation, ReplacePass};
pub use replace_expr::{parse_replace_expr, LineRange, ReplaceFlags, ReplaceSpec};
pub use search::search;
pub use window::{Viewport, ViewportId, ViewportManager};
