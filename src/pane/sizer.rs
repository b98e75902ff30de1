use ratatui::layout::Rect;

/// Space kept between a centred pane and its parent's edges.
pub const CENTRE_MARGIN: u16 = 4;

/// Decides where a pane sits on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaneSizer {
    Fixed(Rect),
    /// Shrink to the content and centre within `parent`.
    Centred { parent: Rect, area: Rect },
}

impl PaneSizer {
    pub fn fixed(x: u16, y: u16, width: u16, height: u16) -> Self {
        PaneSizer::Fixed(Rect::new(x, y, width, height))
    }

    /// Before the first update a centred pane takes the whole parent less the margin.
    pub fn centred(parent: Rect) -> Self {
        PaneSizer::Centred {
            parent,
            area: Rect::new(
                parent.x,
                parent.y,
                parent.width.saturating_sub(CENTRE_MARGIN),
                parent.height.saturating_sub(CENTRE_MARGIN),
            ),
        }
    }

    pub fn area(&self) -> Rect {
        match self {
            PaneSizer::Fixed(area) | PaneSizer::Centred { area, .. } => *area,
        }
    }

    /// Recompute from content bounds. Fixed panes ignore the content.
    ///
    /// The width is rounded up to an even number after clamping so the pane
    /// centres symmetrically.
    pub fn update(&mut self, bounds_width: i32, bounds_height: i32) {
        let PaneSizer::Centred { parent, area } = self else {
            return;
        };
        let to_cells = |n: i32| u16::try_from(n.max(0)).unwrap_or(u16::MAX);

        let width = to_cells(bounds_width).min(parent.width.saturating_sub(CENTRE_MARGIN));
        let width = (width.saturating_add(1) & !1).min(parent.width);
        let height = to_cells(bounds_height).min(parent.height.saturating_sub(CENTRE_MARGIN));

        *area = Rect::new(
            parent.x + (parent.width - width) / 2,
            parent.y + (parent.height - height) / 2,
            width,
            height,
        );
    }

    /// Move a centred pane to a new parent area, or replace a fixed rect.
    pub fn resize(&mut self, new_area: Rect) {
        *self = match self {
            PaneSizer::Fixed(_) => PaneSizer::Fixed(new_area),
            PaneSizer::Centred { .. } => PaneSizer::centred(new_area),
        };
    }
}
