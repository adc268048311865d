use anyhow::Context;
use findrep_core::{Editor, Options};
use findrep_tui::App;
use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 日志文件路径；未设置时不记录日志（终端被 TUI 占用）
const LOG_ENV: &str = "FINDREP_LOG";
/// JSON 选项文件路径
const CONFIG_ENV: &str = "FINDREP_CONFIG";

fn main() -> anyhow::Result<()> {
    if let Some(path) = env::var_os(LOG_ENV) {
        init_logging(Path::new(&path))?;
    }

    let options = match env::var_os(CONFIG_ENV) {
        Some(path) => load_options(Path::new(&path))?,
        None => Options::default(),
    };

    let mut editor = match env::args().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            Editor::with_file(&path).with_context(|| format!("failed to open {}", path.display()))?
        }
        None => Editor::new(),
    };
    editor.set_options(options);

    tracing::info!("findrep started");
    App::new(editor).run()?;
    Ok(())
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

fn load_options(path: &Path) -> anyhow::Result<Options> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let options = serde_json::from_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(options)
}
