//! Inline formatting commands offered by the toolbar.

/// A formatting toggle applied to the current selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    StrikeThrough,
}

impl FormatCommand {
    /// Toolbar order.
    pub const ALL: [Self; 4] = [Self::Bold, Self::Italic, Self::Underline, Self::StrikeThrough];

    /// Command name understood by the browser's `execCommand`.
    #[must_use]
    pub fn exec_name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::StrikeThrough => "strikeThrough",
        }
    }

    /// Short button label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Bold => "B",
            Self::Italic => "I",
            Self::Underline => "U",
            Self::StrikeThrough => "S",
        }
    }

    /// Tooltip text.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Bold => "Жирный",
            Self::Italic => "Курсив",
            Self::Underline => "Подчёркнутый",
            Self::StrikeThrough => "Зачёркнутый",
        }
    }
}
