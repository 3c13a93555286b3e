use std::fmt;

/// Slack emoji shortcode that prefixes the rendered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Info,
    Zap,
    Runner,
    Soccer,
}

impl Icon {
    pub fn shortcode(self) -> &'static str {
        match self {
            Icon::Info   => "information_source",
            Icon::Zap    => "zap",
            Icon::Runner => "runner",
            Icon::Soccer => "soccer",
        }
    }
}

/// One human-facing message. `text` has no icon; `render()` adds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub icon:     Icon,
    pub text:     String,
    pub match_id: Option<String>,
}

impl Notification {
    pub fn new(icon: Icon, text: impl Into<String>) -> Self {
        Self { icon, text: text.into(), match_id: None }
    }

    pub fn for_match(mut self, match_id: impl Into<String>) -> Self {
        self.match_id = Some(match_id.into());
        self
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}: {}", self.icon.shortcode(), self.text)
    }
}
