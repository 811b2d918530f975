//! Formatter options.

/// Options for the canonical printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Indentation per nesting level (default: two spaces)
    pub indent: &'static str,

    /// Reorder block items into extend/variable, property, include, nested order (default: true)
    pub sort_declarations: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: "  ",
            sort_declarations: true,
        }
    }
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self
    }

    /// Keep block items in source order.
    pub fn keep_order(mut self) -> Self {
        self.sort_declarations = false;
        self
    }
}
