//! Inline Registration Editor
//!
//! State machine behind the in-page team-member editor used on the event
//! detail and summary pages. Holds the member rows, the snapshot captured
//! when the editor opened (for the dirty check), and the capacity bound.
//!
//! Invariants: at least one row always remains (removing the last row asks
//! the caller to close instead), and the row count never exceeds capacity.

use crate::state::global::TeamMember;
use crate::utils::{validate_email, validate_phone};

/// One editable member row
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberRow {
    pub name: String,
    pub email: String,
    pub class: String,
    pub phone: String,
}

impl MemberRow {
    fn from_member(member: &TeamMember) -> Self {
        Self {
            name: member.name.clone(),
            email: member.email.clone(),
            class: member.class.clone(),
            phone: member.phone.clone(),
        }
    }

    /// Wire shape for the submit endpoint. `class` is sent as a number
    /// when it parses as one, matching what the backend stores.
    pub fn payload(&self) -> serde_json::Value {
        let class_value = match self.class.trim().parse::<i64>() {
            Ok(n) => serde_json::Value::from(n),
            Err(_) => serde_json::Value::from(self.class.trim()),
        };
        serde_json::json!({
            "name": self.name.trim(),
            "email": self.email.trim(),
            "class": class_value,
            "phone": self.phone.trim(),
        })
    }
}

/// Fields addressable by the view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowField {
    Name,
    Email,
    Class,
    Phone,
}

/// What happened on a row removal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Row removed, editor stays open
    Removed,
    /// It was the last row: nothing changed, the editor should close
    Close,
}

/// Editor state for one registration
#[derive(Clone, Debug, PartialEq)]
pub struct MemberEditor {
    capacity: usize,
    rows: Vec<MemberRow>,
    /// Existing members not yet shown; consumed as rows are added
    seeds: Vec<MemberRow>,
    /// Row values at open time, for the discard-changes check
    snapshot: Vec<MemberRow>,
}

impl MemberEditor {
    /// Open the editor seeded with any existing members, bounded by the
    /// event capacity. Always starts with at least one row.
    pub fn open(existing: &[TeamMember], capacity: u32) -> Self {
        let capacity = capacity.max(1) as usize;
        let mut rows: Vec<MemberRow> = existing
            .iter()
            .take(capacity)
            .map(MemberRow::from_member)
            .collect();
        if rows.is_empty() {
            rows.push(MemberRow::default());
        }
        let seeds = existing
            .iter()
            .skip(rows.len())
            .take(capacity.saturating_sub(rows.len()))
            .map(MemberRow::from_member)
            .collect();
        let snapshot = rows.clone();
        Self {
            capacity,
            rows,
            seeds,
            snapshot,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn rows(&self) -> &[MemberRow] {
        &self.rows
    }

    /// Whether another row fits under the capacity ceiling. Drives the
    /// disabled state of the "Add participant" control.
    pub fn can_add(&self) -> bool {
        self.rows.len() < self.capacity
    }

    /// Add a row, consuming a pending seed member when one exists.
    /// Refused at capacity.
    pub fn add_row(&mut self) -> bool {
        if !self.can_add() {
            return false;
        }
        let row = if self.seeds.is_empty() {
            MemberRow::default()
        } else {
            self.seeds.remove(0)
        };
        self.rows.push(row);
        true
    }

    /// Remove a row. The last remaining row is never removed; the caller
    /// gets `Close` and should dismiss the editor instead.
    pub fn remove_row(&mut self, index: usize) -> RemoveOutcome {
        if self.rows.len() <= 1 {
            return RemoveOutcome::Close;
        }
        if index < self.rows.len() {
            self.rows.remove(index);
        }
        RemoveOutcome::Removed
    }

    pub fn set_field(&mut self, index: usize, field: RowField, value: String) {
        let Some(row) = self.rows.get_mut(index) else {
            return;
        };
        match field {
            RowField::Name => row.name = value,
            RowField::Email => row.email = value,
            RowField::Class => row.class = value,
            RowField::Phone => row.phone = value,
        }
    }

    /// Whether current values differ from the open-time snapshot.
    pub fn is_dirty(&self) -> bool {
        self.rows != self.snapshot
    }

    /// First problem with the rows that would be submitted, if any.
    /// Email and phone are optional per member but must parse when given.
    pub fn validation_error(&self) -> Option<&'static str> {
        for row in self.rows.iter().filter(|r| !r.name.trim().is_empty()) {
            if !row.email.trim().is_empty() && !validate_email(row.email.trim()) {
                return Some("Enter a valid email address for each participant");
            }
            if !row.phone.trim().is_empty() && !validate_phone(&row.phone) {
                return Some("Enter a valid phone number for each participant");
            }
        }
        None
    }

    /// Serialized well-formed rows (non-empty name after trimming).
    /// Empty when nothing submittable was entered.
    pub fn well_formed_payload(&self) -> Vec<serde_json::Value> {
        self.rows
            .iter()
            .filter(|row| !row.name.trim().is_empty())
            .map(MemberRow::payload)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str) -> TeamMember {
        TeamMember {
            name: name.to_string(),
            email: format!("{}@school.edu", name.to_lowercase()),
            class: "11".to_string(),
            phone: String::new(),
        }
    }

    #[test]
    fn opens_with_one_blank_row_when_no_members() {
        let editor = MemberEditor::open(&[], 4);
        assert_eq!(editor.rows().len(), 1);
        assert!(!editor.is_dirty());
        assert!(editor.can_add());
    }

    #[test]
    fn existing_members_clamped_to_capacity() {
        let members = [member("A"), member("B"), member("C")];
        let editor = MemberEditor::open(&members, 2);
        assert_eq!(editor.rows().len(), 2);
        assert!(!editor.can_add());
    }

    #[test]
    fn add_refused_at_capacity() {
        let mut editor = MemberEditor::open(&[], 2);
        assert!(editor.add_row());
        assert!(!editor.can_add());
        assert!(!editor.add_row());
        assert_eq!(editor.rows().len(), 2);
    }

    #[test]
    fn add_consumes_pending_seed_members() {
        let members = [member("A"), member("B"), member("C")];
        let mut editor = MemberEditor::open(&members, 3);
        assert_eq!(editor.rows().len(), 3);
        assert!(!editor.add_row());

        // Fewer shown rows than existing members never happens from open(),
        // but a blank row is appended once the seeds run out
        let mut blank = MemberEditor::open(&members[..1], 3);
        assert!(blank.add_row());
        assert_eq!(blank.rows()[1].name, "");
    }

    #[test]
    fn removing_last_row_closes_without_mutation() {
        let mut editor = MemberEditor::open(&[member("A")], 3);
        assert_eq!(editor.remove_row(0), RemoveOutcome::Close);
        assert_eq!(editor.rows().len(), 1);
        assert_eq!(editor.rows()[0].name, "A");
    }

    #[test]
    fn removing_a_middle_row_keeps_editor_open() {
        let mut editor = MemberEditor::open(&[member("A"), member("B")], 3);
        assert_eq!(editor.remove_row(0), RemoveOutcome::Removed);
        assert_eq!(editor.rows().len(), 1);
        assert_eq!(editor.rows()[0].name, "B");
        // Now the last row: removal closes instead
        assert_eq!(editor.remove_row(0), RemoveOutcome::Close);
    }

    #[test]
    fn dirty_tracks_edits_against_snapshot() {
        let mut editor = MemberEditor::open(&[member("A")], 3);
        assert!(!editor.is_dirty());
        editor.set_field(0, RowField::Name, "Ada".to_string());
        assert!(editor.is_dirty());
        editor.set_field(0, RowField::Name, "A".to_string());
        assert!(!editor.is_dirty());
        editor.add_row();
        assert!(editor.is_dirty());
    }

    #[test]
    fn validation_checks_only_rows_with_names() {
        let mut editor = MemberEditor::open(&[], 3);
        editor.set_field(0, RowField::Name, "Ada".to_string());
        assert_eq!(editor.validation_error(), None);

        editor.set_field(0, RowField::Email, "not-an-email".to_string());
        assert!(editor.validation_error().is_some());
        editor.set_field(0, RowField::Email, "ada@school.edu".to_string());
        assert_eq!(editor.validation_error(), None);

        // A bad email on a nameless row is never submitted, so it passes
        editor.add_row();
        editor.set_field(1, RowField::Email, "junk".to_string());
        assert_eq!(editor.validation_error(), None);

        editor.set_field(0, RowField::Phone, "12".to_string());
        assert!(editor.validation_error().is_some());
    }

    #[test]
    fn payload_skips_nameless_rows_and_numbers_classes() {
        let mut editor = MemberEditor::open(&[], 3);
        editor.set_field(0, RowField::Name, "  Ada  ".to_string());
        editor.set_field(0, RowField::Class, "11".to_string());
        editor.add_row();
        editor.set_field(1, RowField::Email, "ghost@school.edu".to_string());
        editor.add_row();
        editor.set_field(2, RowField::Name, "Brin".to_string());
        editor.set_field(2, RowField::Class, "XII".to_string());

        let payload = editor.well_formed_payload();
        assert_eq!(payload.len(), 2);
        assert_eq!(payload[0]["name"], "Ada");
        assert_eq!(payload[0]["class"], 11);
        assert_eq!(payload[1]["class"], "XII");
    }
}
