use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};
use serde::Serialize;

/// Drawing target for fields. Coordinates are relative to the surface origin
/// and may be negative or past the edge; anything outside is clipped.
pub trait Surface {
    fn add_text(&mut self, text: &str, x: i32, y: i32, style: Style);
    /// Single-line pass-through used by plain text fields; no wrapping is done.
    fn add_wrapped_text(&mut self, text: &str, x: i32, y: i32, style: Style) {
        self.add_text(text, x, y, style);
    }
    fn cursor_on(&mut self, x: i32, y: i32);
    fn cursor_off(&mut self);
    fn erase(&mut self);
    fn refresh(&mut self);
    /// Restrict painting to rows `min..max`.
    fn set_vertical_clip(&mut self, min: i32, max: i32);
    fn snapshot(&self) -> Snapshot;
}

/// Plain-text capture of a surface, one string per row with trailing blanks trimmed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub rows: Vec<String>,
}

impl Snapshot {
    pub fn of(buffer: &Buffer) -> Self {
        let area = buffer.area;
        let rows = (area.top()..area.bottom())
            .map(|y| {
                let row: String = (area.left()..area.right())
                    .filter_map(|x| buffer.cell((x, y)).map(|c| c.symbol().to_string()))
                    .collect();
                row.trim_end().to_string()
            })
            .collect();
        Self { rows }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.rows.iter().any(|row| row.contains(needle))
    }

    pub fn row(&self, y: usize) -> &str {
        self.rows.get(y).map(String::as_str).unwrap_or("")
    }
}

/// A ratatui `Buffer`-backed window. Painting goes to a back buffer; `refresh`
/// publishes it to the front buffer that gets merged into the terminal frame.
pub struct BufferWindow {
    area: Rect,
    back: Buffer,
    front: Buffer,
    default_style: Style,
    border: Option<Option<String>>,
    clip: (i32, i32),
    cursor: Option<(i32, i32)>,
}

impl BufferWindow {
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            back: Buffer::empty(area),
            front: Buffer::empty(area),
            default_style: Style::default(),
            border: None,
            clip: (0, i32::from(area.height)),
            cursor: None,
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn width(&self) -> i32 {
        i32::from(self.area.width)
    }

    pub fn height(&self) -> i32 {
        i32::from(self.area.height)
    }

    pub fn set_default_style(&mut self, style: Style) {
        self.default_style = style;
    }

    /// Draw a border box, with an optional title, on every erase.
    pub fn add_box(&mut self, title: Option<String>) {
        self.border = Some(title);
    }

    pub fn buffer(&self) -> &Buffer {
        &self.front
    }

    /// Absolute terminal position of the hardware cursor, if shown.
    pub fn cursor_position(&self) -> Option<Position> {
        let (x, y) = self.cursor?;
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        Some(Position::new(
            self.area.x + x as u16,
            self.area.y + y as u16,
        ))
    }
}

impl Surface for BufferWindow {
    fn add_text(&mut self, text: &str, x: i32, y: i32, style: Style) {
        let (clip_min, clip_max) = self.clip;
        if y < clip_min.max(0) || y >= clip_max.min(self.height()) {
            return;
        }
        let row = self.area.y + y as u16;
        for (offset, ch) in text.chars().enumerate() {
            let col = x + offset as i32;
            if col < 0 {
                continue;
            }
            if col >= self.width() {
                break;
            }
            if let Some(cell) = self.back.cell_mut((self.area.x + col as u16, row)) {
                cell.set_char(ch).set_style(style);
            }
        }
    }

    fn cursor_on(&mut self, x: i32, y: i32) {
        self.cursor = Some((x, y));
    }

    fn cursor_off(&mut self) {
        self.cursor = None;
    }

    fn erase(&mut self) {
        self.back.reset();
        self.back.set_style(self.area, self.default_style);
        self.cursor = None;
        if let Some(title) = &self.border {
            let mut block = Block::bordered()
                .border_style(self.default_style)
                .style(self.default_style);
            if let Some(title) = title {
                block = block.title(format!(" {title} "));
            }
            block.render(self.area, &mut self.back);
        }
    }

    fn refresh(&mut self) {
        self.front.clone_from(&self.back);
    }

    fn set_vertical_clip(&mut self, min: i32, max: i32) {
        self.clip = (min, max);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.front)
    }
}
