use super::group::{FieldGroup, FieldId, Section};
use super::{Field, Flow, LAYOUT_MIN_WIDTH};
use crate::error::LayoutError;

/// Width of the border box edge.
const BOX_WIDTH: i32 = 1;
/// Padding between the pane edge (or box) and its content.
const BORDER: i32 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutPosition {
    pub x: i32,
    pub y: i32,
}

impl LayoutPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Positions for an ordered field list, plus the extent of everything placed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldLayout {
    pub positions: Vec<LayoutPosition>,
    pub extent: LayoutPosition,
}

/// The viewport a layout is computed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutFrame {
    pub width: i32,
    pub height: i32,
    pub has_box: bool,
}

/// Flow layout of `order` (indices into `fields`).
///
/// `step` is 1 for top-down body layout or -1 for bottom-anchored static
/// layout. Each field is offered the remaining width on its row before it is
/// measured.
pub fn arrange(
    fields: &mut [Field],
    order: &[FieldId],
    frame: LayoutFrame,
    step: i32,
) -> Result<FieldLayout, LayoutError> {
    let (offset, width, height) = if frame.has_box {
        (BOX_WIDTH, frame.width - BOX_WIDTH, frame.height - BOX_WIDTH)
    } else {
        (0, frame.width, frame.height)
    };

    let x_start = offset + BORDER;
    let y_start = if step >= 0 {
        offset + BORDER
    } else {
        height - BORDER
    };

    let (mut x, mut y) = (x_start, y_start);
    let (mut x_max, mut y_max) = (x, y);
    let mut positions = Vec::with_capacity(order.len());

    for (index, id) in order.iter().enumerate() {
        let field = &mut fields[id.index()];
        positions.push(LayoutPosition::new(x, y));

        field.update_width(width - BORDER - x);
        let field_width = i32::from(field.width());
        let field_height = i32::from(field.height());
        x_max = x_max.max(x + field_width);
        if field_width > 0 {
            y_max = y + step * field_height;
        }

        match field.flow() {
            Flow::Right => x += field_width + 1,
            Flow::Return => {
                x = x_start;
                y += step * field_height;
            }
            Flow::DoubleReturn => {
                x = x_start;
                y += step * (field_height + 1);
            }
            Flow::None => {}
            Flow::Invalid => return Err(LayoutError::InvalidFlow { index }),
        }
    }

    Ok(FieldLayout {
        positions,
        extent: LayoutPosition::new(x_max, y_max),
    })
}

/// Lays out a [`FieldGroup`] for a pane of a given size and memoizes the
/// resulting content size until the size changes or [`reset`](Self::reset).
pub struct FieldArranger {
    width: i32,
    height: i32,
    has_box: bool,
    layout_size: Option<(i32, i32)>,
}

impl FieldArranger {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            has_box: false,
            layout_size: None,
        }
    }

    pub fn reset(&mut self) {
        self.layout_size = None;
    }

    pub fn set_x_size(&mut self, width: i32) {
        self.width = width;
        self.layout_size = None;
    }

    pub fn set_y_size(&mut self, height: i32) {
        self.height = height;
        self.layout_size = None;
    }

    pub fn add_box(&mut self) {
        self.has_box = true;
        self.layout_size = None;
    }

    pub fn has_box(&self) -> bool {
        self.has_box
    }

    pub fn frame(&self) -> LayoutFrame {
        LayoutFrame {
            width: self.width,
            height: self.height,
            has_box: self.has_box,
        }
    }

    pub fn body_layout(&self, group: &mut FieldGroup) -> Result<FieldLayout, LayoutError> {
        let (order, fields) = group.parts_mut(Section::Body);
        arrange(fields, order, self.frame(), 1)
    }

    pub fn static_layout(&self, group: &mut FieldGroup) -> Result<FieldLayout, LayoutError> {
        let (order, fields) = group.parts_mut(Section::Static);
        arrange(fields, order, self.frame(), -1)
    }

    /// Content width: the wider of body and static extents, never below
    /// [`LAYOUT_MIN_WIDTH`].
    pub fn x_size(&mut self, group: &mut FieldGroup) -> Result<i32, LayoutError> {
        let (x, _) = self.layout_size(group)?;
        Ok(x.max(LAYOUT_MIN_WIDTH))
    }

    /// Content height of the body. Static fields are not included.
    pub fn y_size(&mut self, group: &mut FieldGroup) -> Result<i32, LayoutError> {
        let (_, y) = self.layout_size(group)?;
        Ok(y)
    }

    pub fn x_bounds(&mut self, group: &mut FieldGroup) -> Result<i32, LayoutError> {
        let margin = if self.has_box { 4 } else { 2 };
        Ok(self.x_size(group)? + margin)
    }

    pub fn y_bounds(&mut self, group: &mut FieldGroup) -> Result<i32, LayoutError> {
        let margin = if self.has_box { 3 } else { 1 };
        Ok(self.y_size(group)? + margin)
    }

    fn layout_size(&mut self, group: &mut FieldGroup) -> Result<(i32, i32), LayoutError> {
        if let Some(size) = self.layout_size {
            return Ok(size);
        }
        let body = self.body_layout(group)?;
        let statics = self.static_layout(group)?;
        let size = (body.extent.x.max(statics.extent.x), body.extent.y);
        self.layout_size = Some(size);
        Ok(size)
    }
}
