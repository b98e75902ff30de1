//! Dialogue panes: a field group, its layout and focus, and the window it
//! paints into.

use std::collections::BTreeMap;

use ratatui::layout::{Position, Rect};
use tracing::{debug, trace};

use crate::error::Result;
use crate::fields::group::Section;
use crate::fields::{
    Field, FieldArranger, FieldGroup, FieldInputTracker, Flow, InputField, MenuField,
    SeparatorField, TextField, WrappedTextField,
};
use crate::key::Key;
use crate::menu::Menu;
use crate::ui::{BufferWindow, PaneColours, Snapshot, Surface};

pub mod sizer;

pub use sizer::PaneSizer;

/// Rows a menu field shows unless told otherwise.
pub const DEFAULT_MENU_HEIGHT: usize = 10;

pub struct DialoguePane {
    sizer: PaneSizer,
    window: Option<BufferWindow>,
    group: FieldGroup,
    arranger: FieldArranger,
    tracker: FieldInputTracker,
    y_scroll: i32,
    title: Option<String>,
    has_box: bool,
    colours: PaneColours,
}

impl DialoguePane {
    pub fn new(sizer: PaneSizer, colours: PaneColours) -> Self {
        let area = sizer.area();
        Self {
            sizer,
            window: None,
            group: FieldGroup::new(),
            arranger: FieldArranger::new(i32::from(area.width), i32::from(area.height)),
            tracker: FieldInputTracker::new(),
            y_scroll: 0,
            title: None,
            has_box: false,
            colours,
        }
    }

    /// A content-sized pane centred in `parent`.
    pub fn centred(parent: Rect, colours: PaneColours) -> Self {
        Self::new(PaneSizer::centred(parent), colours)
    }

    pub fn add_box(&mut self) {
        self.has_box = true;
        self.arranger.add_box();
        if let Some(window) = self.window.as_mut() {
            window.add_box(self.title.clone());
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
        self.window = None;
    }

    /// Move or resize the pane. The window is rebuilt on next use.
    pub fn set_sizer(&mut self, sizer: PaneSizer) {
        let area = sizer.area();
        self.sizer = sizer;
        self.arranger.set_x_size(i32::from(area.width));
        self.arranger.set_y_size(i32::from(area.height));
        self.window = None;
    }

    pub fn area(&self) -> Rect {
        self.sizer.area()
    }

    // Field group

    /// Drop every field. Focus and the memoized layout go with them; the scroll
    /// offset is kept and clamped to the new content on the next render.
    pub fn reset_fields(&mut self) {
        self.group.reset();
        self.tracker.clear();
        self.arranger.reset();
    }

    /// Forget the memoized layout and rebuild the window on next use.
    pub fn reset_position(&mut self) {
        self.arranger.reset();
        self.window = None;
    }

    pub fn num_static_fields(&self) -> usize {
        self.group.num_static_fields()
    }

    pub fn num_input_fields(&self) -> usize {
        self.group.num_input_fields()
    }

    pub fn field_values(&self) -> BTreeMap<String, String> {
        self.group.field_values()
    }

    // Input focus

    pub fn activate_next_input(&mut self) {
        self.tracker.activate_next(&mut self.group);
    }

    pub fn activate_previous_input(&mut self) {
        self.tracker.activate_previous(&mut self.group);
    }

    pub fn is_last_input(&self) -> bool {
        self.tracker.is_last_input(&self.group)
    }

    pub fn input_index(&self) -> Option<usize> {
        self.tracker.input_index()
    }

    pub fn set_input_index(&mut self, index: Option<usize>) {
        self.tracker.set_input_index(&mut self.group, index);
    }

    pub fn current_input_mut(&mut self) -> Option<&mut InputField> {
        let index = self.tracker.input_index()?;
        self.group.input_field_mut(index)
    }

    pub fn needs_cursor(&self) -> bool {
        self.tracker.needs_cursor()
    }

    /// Give a key to the focused input. False when nothing took it.
    pub fn handle_input_key(&mut self, key: Key) -> bool {
        self.current_input_mut()
            .is_some_and(|input| input.handle_key(key))
    }

    // Field builders

    pub fn add_body_field(&mut self, field: impl Into<Field>) {
        self.group.body_field_add(field);
        self.arranger.reset();
    }

    pub fn add_static_field(&mut self, field: impl Into<Field>) {
        self.group.static_field_add(field);
        self.arranger.reset();
    }

    pub fn new_line(&mut self) {
        self.add_body_field(SeparatorField::new(Flow::Return));
    }

    pub fn add_title_field(&mut self, title: &str) {
        self.add_body_field(WrappedTextField::new(
            title,
            self.colours.title,
            Flow::DoubleReturn,
        ));
    }

    pub fn add_warning_field(&mut self, text: &str) {
        self.add_body_field(WrappedTextField::new(
            text,
            self.colours.flash,
            Flow::DoubleReturn,
        ));
    }

    pub fn add_text_field(&mut self, text: &str, flow: Option<Flow>) {
        self.add_body_field(TextField::new(
            text,
            self.colours.base,
            flow.unwrap_or(Flow::Right),
        ));
    }

    pub fn add_wrapped_text_field(&mut self, text: &str, flow: Option<Flow>) {
        self.add_body_field(WrappedTextField::new(
            text,
            self.colours.base,
            flow.unwrap_or(Flow::Return),
        ));
    }

    pub fn add_wrapped_bold_text_field(&mut self, text: &str, flow: Option<Flow>) {
        self.add_body_field(WrappedTextField::new(
            text,
            self.colours.bright,
            flow.unwrap_or(Flow::Return),
        ));
    }

    pub fn add_wrapped_centred_text_field(&mut self, text: &str, flow: Option<Flow>) {
        self.add_body_field(
            WrappedTextField::new(text, self.colours.base, flow.unwrap_or(Flow::Return))
                .centred(),
        );
    }

    pub fn add_wrapped_centred_bold_text_field(&mut self, text: &str, flow: Option<Flow>) {
        self.add_body_field(
            WrappedTextField::new(text, self.colours.bright, flow.unwrap_or(Flow::Return))
                .centred(),
        );
    }

    /// A bold label followed by its value on the same line.
    pub fn add_status_field(&mut self, name: &str, value: &str) {
        self.add_body_field(TextField::new(name, self.colours.bright, Flow::Right));
        self.add_body_field(WrappedTextField::new(
            value,
            self.colours.base,
            Flow::Return,
        ));
    }

    pub fn add_input_field(
        &mut self,
        name: &str,
        value: &str,
        tag: &str,
        length_limit: Option<usize>,
    ) {
        let input = self.make_input(value, length_limit);
        self.add_labelled_input(name, tag, input);
    }

    pub fn add_password_field(
        &mut self,
        name: &str,
        value: &str,
        tag: &str,
        length_limit: Option<usize>,
    ) {
        let mut input = self.make_input(value, length_limit);
        input.hide_text();
        self.add_labelled_input(name, tag, input);
    }

    pub fn add_menu_field(&mut self, menu: &Menu, height: Option<usize>) {
        self.add_body_field(MenuField::new(
            menu,
            self.colours.base,
            self.colours.selected,
            height.unwrap_or(DEFAULT_MENU_HEIGHT),
            Flow::DoubleReturn,
        ));
    }

    /// Pinned key legend, sorted by key name.
    pub fn add_key_help_field<K, V>(&mut self, keys: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let sorted: BTreeMap<String, String> = keys
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        for (key, help) in sorted {
            self.add_static_field(TextField::new(key, self.colours.bright, Flow::Right));
            self.add_static_field(TextField::new(help, self.colours.base, Flow::Right));
        }
    }

    /// Refresh every menu field from `menu`.
    pub fn sync_menu_fields(&mut self, menu: &Menu) {
        for field in self.group.fields_mut() {
            if let Some(menu_field) = field.as_menu_mut() {
                menu_field.sync(menu);
            }
        }
    }

    fn make_input(&self, value: &str, length_limit: Option<usize>) -> InputField {
        InputField::new(
            value,
            self.colours.highlight,
            self.colours.selected,
            Flow::Return,
            length_limit,
        )
    }

    fn add_labelled_input(&mut self, name: &str, tag: &str, input: InputField) {
        self.add_body_field(TextField::new(name, self.colours.bright, Flow::Right));
        self.group.input_field_add(tag, input);
        self.arranger.reset();
    }

    // Window and scrolling

    fn remake_window(&mut self) -> Result<()> {
        self.window = None;
        let width = self.arranger.x_bounds(&mut self.group)?;
        let height = self.arranger.y_bounds(&mut self.group)?;
        self.sizer.update(width, height);
        let area = self.sizer.area();
        self.arranger.set_x_size(i32::from(area.width));
        self.arranger.set_y_size(i32::from(area.height));

        let mut window = BufferWindow::new(area);
        window.set_default_style(self.colours.base);
        if self.has_box {
            window.add_box(self.title.clone());
        }
        debug!(?area, "pane window rebuilt");
        self.window = Some(window);
        Ok(())
    }

    fn window_height(&mut self) -> Result<i32> {
        if self.window.is_none() {
            self.remake_window()?;
        }
        Ok(self.window.as_ref().map_or(0, BufferWindow::height))
    }

    /// Rows available to body fields: `(first, end)` exclusive.
    fn body_clip(&self, window_height: i32) -> (i32, i32) {
        let min = if self.has_box { 2 } else { 0 };
        let max = if self.group.num_static_fields() == 0 {
            window_height
        } else if self.has_box {
            (window_height - 3).max(0)
        } else {
            (window_height - 2).max(0)
        };
        (min, max)
    }

    pub fn needs_scroll(&mut self) -> Result<bool> {
        let window_height = self.window_height()?;
        Ok(self.arranger.y_size(&mut self.group)? + 2 >= window_height)
    }

    pub fn scroll_offset(&self) -> i32 {
        self.y_scroll
    }

    fn page_rows(&self, window_height: i32) -> i32 {
        let (min, max) = self.body_clip(window_height);
        (max - min).max(1)
    }

    /// Largest offset that still leaves content in view.
    fn scroll_limit(&mut self, window_height: i32) -> Result<i32> {
        Ok((self.arranger.y_size(&mut self.group)? + 2 - window_height).max(0))
    }

    pub fn scroll_page_up(&mut self) -> Result<()> {
        let window_height = self.window_height()?;
        self.y_scroll = (self.y_scroll - self.page_rows(window_height)).max(0);
        trace!(offset = self.y_scroll, "scrolled up");
        Ok(())
    }

    pub fn scroll_page_down(&mut self) -> Result<()> {
        let window_height = self.window_height()?;
        let limit = self.scroll_limit(window_height)?;
        self.y_scroll = (self.y_scroll + self.page_rows(window_height)).min(limit);
        trace!(offset = self.y_scroll, "scrolled down");
        Ok(())
    }

    pub fn reset_scroll(&mut self) {
        self.y_scroll = 0;
    }

    pub fn render(&mut self) -> Result<()> {
        let window_height = self.window_height()?;
        let limit = self.scroll_limit(window_height)?;
        self.y_scroll = self.y_scroll.clamp(0, limit);
        let (clip_min, clip_max) = self.body_clip(window_height);
        let body = self.arranger.body_layout(&mut self.group)?;
        let statics = self.arranger.static_layout(&mut self.group)?;

        let Some(window) = self.window.as_mut() else {
            return Ok(());
        };
        window.set_default_style(self.colours.base);
        window.erase();
        window.set_vertical_clip(clip_min, clip_max);

        let body_ids = self.group.ids(Section::Body).to_vec();
        for (id, pos) in body_ids.into_iter().zip(&body.positions) {
            let field = self.group.field_mut(id);
            let height = i32::from(field.height());
            let below_top = pos.y + height > self.y_scroll;
            let above_bottom = pos.y <= self.y_scroll + clip_max;
            if below_top && above_bottom {
                field.render(&mut *window, pos.x, pos.y - self.y_scroll);
            }
        }

        window.set_vertical_clip(0, window_height);
        let static_ids = self.group.ids(Section::Static).to_vec();
        for (id, pos) in static_ids.into_iter().zip(&statics.positions) {
            self.group.field_mut(id).render(&mut *window, pos.x, pos.y);
        }

        window.refresh();
        Ok(())
    }

    pub fn cursor_off(&mut self) {
        if let Some(window) = self.window.as_mut() {
            window.cursor_off();
        }
    }

    pub fn cursor_position(&self) -> Option<Position> {
        self.window.as_ref()?.cursor_position()
    }

    /// The last rendered window, if one exists.
    pub fn window(&self) -> Option<&BufferWindow> {
        self.window.as_ref()
    }

    pub fn delete(&mut self) {
        self.window = None;
    }

    pub fn snapshot(&self) -> Snapshot {
        self.window
            .as_ref()
            .map(Surface::snapshot)
            .unwrap_or_default()
    }
}
