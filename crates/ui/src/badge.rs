use std::fmt::Write;

use models::{KycStatus, LoanStatus};
use serde::{Deserialize, Serialize};

const BASE_CLASSES: &str = "inline-flex items-center rounded-full border px-2.5 py-0.5 text-xs font-semibold transition-colors focus:outline-none focus:ring-2 focus:ring-ring focus:ring-offset-2";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    #[default]
    Default,
    Secondary,
    Destructive,
    Outline,
    Success,
}

impl BadgeVariant {
    pub const fn classes(self) -> &'static str {
        match self {
            BadgeVariant::Default => "border-transparent bg-primary text-primary-foreground hover:bg-primary/80",
            BadgeVariant::Secondary => "border-transparent bg-secondary text-secondary-foreground hover:bg-secondary/80",
            BadgeVariant::Destructive => "border-transparent bg-destructive text-destructive-foreground hover:bg-destructive/80",
            BadgeVariant::Outline => "text-foreground",
            BadgeVariant::Success => "border-transparent bg-green-500 text-white hover:bg-green-500/80",
        }
    }
}

impl From<LoanStatus> for BadgeVariant {
    fn from(status: LoanStatus) -> Self {
        match status {
            LoanStatus::Active | LoanStatus::Approved => BadgeVariant::Success,
            LoanStatus::Pending => BadgeVariant::Secondary,
            LoanStatus::Rejected | LoanStatus::Defaulted => BadgeVariant::Destructive,
            LoanStatus::Closed => BadgeVariant::Outline,
        }
    }
}

impl From<KycStatus> for BadgeVariant {
    fn from(status: KycStatus) -> Self {
        match status {
            KycStatus::Verified => BadgeVariant::Success,
            KycStatus::Pending => BadgeVariant::Secondary,
            KycStatus::Rejected => BadgeVariant::Destructive,
        }
    }
}

/// Small status label. Stateless: the same inputs always render the same markup.
///
/// ```
/// use ui::{Badge, BadgeVariant};
///
/// let html = Badge::new("Active").variant(BadgeVariant::Success).class("ml-2").render();
/// assert!(html.contains("bg-green-500"));
/// assert!(html.ends_with(">Active</div>"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Badge {
    children: String,
    variant: BadgeVariant,
    class: Option<String>,
    attrs: Vec<(String, String)>,
}

impl Badge {
    pub fn new(children: impl Into<String>) -> Self {
        Self { children: children.into(), ..Self::default() }
    }

    pub fn variant(mut self, variant: BadgeVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Extra classes appended after the variant classes.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Pass-through attribute. Names that are not plain identifiers are dropped at render.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn class_list(&self) -> String {
        [BASE_CLASSES, self.variant.classes(), self.class.as_deref().unwrap_or("")]
            .into_iter()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn render(&self) -> String {
        let mut out = format!("<div class=\"{}\"", escape_html(&self.class_list()));
        for (name, value) in &self.attrs {
            if !valid_attr_name(name) || name.eq_ignore_ascii_case("class") {
                continue;
            }
            let _ = write!(out, " {}=\"{}\"", name, escape_html(value));
        }
        let _ = write!(out, ">{}</div>", escape_html(&self.children));
        out
    }
}

fn valid_attr_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':')
}

/// Escape text for HTML content and double-quoted attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
