use crate::host::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

/// 消息通道的参考实现：按顺序记录，状态栏只显示最后一条
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn push(&mut self, severity: Severity, text: &str) {
        self.messages.push(Message {
            severity,
            text: text.to_string(),
        });
    }
}

impl Notify for MessageLog {
    fn info(&mut self, message: &str) {
        tracing::debug!(message, "info");
        self.push(Severity::Info, message);
    }

    fn error(&mut self, message: &str) {
        tracing::warn!(message, "error");
        self.push(Severity::Error, message);
    }
}
