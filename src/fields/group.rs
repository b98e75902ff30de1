use std::collections::BTreeMap;

use super::{Field, InputField};

/// Index of a field inside its [`FieldGroup`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldId(usize);

/// Which ordered list of a group to walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Body,
    Static,
}

/// Owns a pane's fields. Body, static and input membership are ordered lists
/// of ids into one arena, so an input field is the same entity in both the
/// body list (for painting) and the input list (for focus).
#[derive(Default)]
pub struct FieldGroup {
    fields: Vec<Field>,
    body: Vec<FieldId>,
    statics: Vec<FieldId>,
    inputs: Vec<FieldId>,
    tags: BTreeMap<String, FieldId>,
}

impl FieldGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.fields.clear();
        self.body.clear();
        self.statics.clear();
        self.inputs.clear();
        self.tags.clear();
    }

    pub fn body_field_add(&mut self, field: impl Into<Field>) -> FieldId {
        let id = self.push(field.into());
        self.body.push(id);
        id
    }

    pub fn static_field_add(&mut self, field: impl Into<Field>) -> FieldId {
        let id = self.push(field.into());
        self.statics.push(id);
        id
    }

    /// Add a focusable input. It is laid out as a body field and its value is
    /// reported under `tag`; a repeated tag replaces the earlier registration.
    pub fn input_field_add(&mut self, tag: impl Into<String>, field: InputField) -> FieldId {
        let id = self.body_field_add(field);
        self.inputs.push(id);
        self.tags.insert(tag.into(), id);
        id
    }

    pub fn num_static_fields(&self) -> usize {
        self.statics.len()
    }

    pub fn num_input_fields(&self) -> usize {
        self.inputs.len()
    }

    pub fn ids(&self, section: Section) -> &[FieldId] {
        match section {
            Section::Body => &self.body,
            Section::Static => &self.statics,
        }
    }

    pub fn input_id(&self, index: usize) -> Option<FieldId> {
        self.inputs.get(index).copied()
    }

    pub fn input_field(&self, index: usize) -> Option<&InputField> {
        let id = self.input_id(index)?;
        self.field(id).as_input()
    }

    pub fn input_field_mut(&mut self, index: usize) -> Option<&mut InputField> {
        let id = self.input_id(index)?;
        self.field_mut(id).as_input_mut()
    }

    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.0]
    }

    pub fn field_mut(&mut self, id: FieldId) -> &mut Field {
        &mut self.fields[id.0]
    }

    /// Split borrow: the id lists alongside mutable access to the arena.
    pub(crate) fn parts_mut(&mut self, section: Section) -> (&[FieldId], &mut [Field]) {
        let ids = match section {
            Section::Body => &self.body,
            Section::Static => &self.statics,
        };
        (ids, &mut self.fields)
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut Field> {
        self.fields.iter_mut()
    }

    /// Current content of every tagged input.
    pub fn field_values(&self) -> BTreeMap<String, String> {
        self.tags
            .iter()
            .filter_map(|(tag, id)| {
                self.field(*id)
                    .as_input()
                    .map(|input| (tag.clone(), input.value().to_string()))
            })
            .collect()
    }

    fn push(&mut self, field: Field) -> FieldId {
        self.fields.push(field);
        FieldId(self.fields.len() - 1)
    }
}

impl FieldId {
    pub(crate) fn index(self) -> usize {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn for_test(index: usize) -> Self {
        Self(index)
    }
}
