//! Fixed chart palette.

/// Border and background color of one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteColor {
    pub border: &'static str,
    pub background: &'static str,
}

pub const PALETTE: [PaletteColor; 10] = [
    PaletteColor { border: "#007bff", background: "rgba(0, 123, 255, 0.2)" },
    PaletteColor { border: "#28a745", background: "rgba(40, 167, 69, 0.2)" },
    PaletteColor { border: "#ffc107", background: "rgba(255, 193, 7, 0.2)" },
    PaletteColor { border: "#dc3545", background: "rgba(220, 53, 69, 0.2)" },
    PaletteColor { border: "#17a2b8", background: "rgba(23, 162, 184, 0.2)" },
    PaletteColor { border: "#6c757d", background: "rgba(108, 117, 125, 0.2)" },
    PaletteColor { border: "#fd7e14", background: "rgba(253, 126, 20, 0.2)" },
    PaletteColor { border: "#6610f2", background: "rgba(102, 16, 242, 0.2)" },
    PaletteColor { border: "#e83e8c", background: "rgba(232, 62, 140, 0.2)" },
    PaletteColor { border: "#20c997", background: "rgba(32, 201, 151, 0.2)" },
];

/// Color of the `index`-th rendered series. Wraps around.
pub fn color_for(index: usize) -> PaletteColor {
    PALETTE[index % PALETTE.len()]
}
