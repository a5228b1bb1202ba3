//! Responsive list layout.

/// Widths below this render lists as cards.
pub const MD_BREAKPOINT_PX: u32 = 900;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Cards,
    Table,
}

impl Layout {
    pub fn for_width(width_px: u32) -> Self {
        if width_px < MD_BREAKPOINT_PX {
            Layout::Cards
        } else {
            Layout::Table
        }
    }
}
