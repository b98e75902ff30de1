use tracing::debug;

use super::group::FieldGroup;

/// Cyclic keyboard focus over a group's input fields. At most one input is
/// active at a time.
#[derive(Debug, Default)]
pub struct FieldInputTracker {
    index: Option<usize>,
}

impl FieldInputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_index(&self) -> Option<usize> {
        self.index
    }

    pub fn activate_next(&mut self, group: &mut FieldGroup) {
        let count = group.num_input_fields();
        if count == 0 {
            return;
        }
        let next = self.index.map_or(0, |i| (i + 1) % count);
        self.set_input_index(group, Some(next));
    }

    pub fn activate_previous(&mut self, group: &mut FieldGroup) {
        let count = group.num_input_fields();
        if count == 0 {
            return;
        }
        let prev = self.index.map_or(count - 1, |i| (i + count - 1) % count);
        self.set_input_index(group, Some(prev));
    }

    /// Move focus. The old input is deactivated first; `None` only deactivates.
    pub fn set_input_index(&mut self, group: &mut FieldGroup, index: Option<usize>) {
        if let Some(old) = self.index.and_then(|i| group.input_field_mut(i)) {
            old.deactivate();
        }
        self.index = index.filter(|&i| i < group.num_input_fields());
        if let Some(new) = self.index.and_then(|i| group.input_field_mut(i)) {
            new.activate();
        }
        debug!(index = ?self.index, "input focus changed");
    }

    pub fn is_last_input(&self, group: &FieldGroup) -> bool {
        self.index.is_some_and(|i| i + 1 == group.num_input_fields())
    }

    pub fn needs_cursor(&self) -> bool {
        self.index.is_some()
    }

    /// Forget focus without touching fields; used when the group is rebuilt.
    pub fn clear(&mut self) {
        self.index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Flow, InputField};
    use ratatui::style::Style;

    fn group_with_inputs(n: usize) -> FieldGroup {
        let mut group = FieldGroup::new();
        for i in 0..n {
            group.input_field_add(
                format!("in{i}"),
                InputField::new("v", Style::default(), Style::default(), Flow::Return, None),
            );
        }
        group
    }

    fn active_flags(group: &mut FieldGroup) -> Vec<bool> {
        (0..group.num_input_fields())
            .map(|i| group.input_field_mut(i).unwrap().is_active())
            .collect()
    }

    #[test]
    fn next_cycles_from_unfocused() {
        let mut group = group_with_inputs(3);
        let mut tracker = FieldInputTracker::new();
        let visited: Vec<_> = (0..4)
            .map(|_| {
                tracker.activate_next(&mut group);
                tracker.input_index().unwrap()
            })
            .collect();
        assert_eq!(visited, vec![0, 1, 2, 0]);
        assert_eq!(active_flags(&mut group), vec![true, false, false]);
    }

    #[test]
    fn previous_wraps_backwards() {
        let mut group = group_with_inputs(3);
        let mut tracker = FieldInputTracker::new();
        tracker.activate_previous(&mut group);
        assert_eq!(tracker.input_index(), Some(2));
        assert!(tracker.is_last_input(&group));
        tracker.activate_previous(&mut group);
        assert_eq!(tracker.input_index(), Some(1));
        assert!(!tracker.is_last_input(&group));
    }

    #[test]
    fn none_deactivates_only() {
        let mut group = group_with_inputs(2);
        let mut tracker = FieldInputTracker::new();
        tracker.set_input_index(&mut group, Some(1));
        assert!(tracker.needs_cursor());
        tracker.set_input_index(&mut group, None);
        assert!(!tracker.needs_cursor());
        assert_eq!(active_flags(&mut group), vec![false, false]);
    }

    #[test]
    fn no_inputs_is_a_no_op() {
        let mut group = FieldGroup::new();
        let mut tracker = FieldInputTracker::new();
        tracker.activate_next(&mut group);
        tracker.activate_previous(&mut group);
        assert_eq!(tracker.input_index(), None);
        assert!(!tracker.is_last_input(&group));
    }
}
