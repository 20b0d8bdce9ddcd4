//! Student records and the in-memory roster.
//!
//! CHANGELOG:
//! - 10/15/2026 - Surrogate ids replace value-equality lookups
//! - 10/14/2026 - Initial implementation

use super::fuzzy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display order for class selectors. Classes outside this list are
/// appended alphabetically.
pub const CLASS_ORDER: &[&str] = &[
    "3º Ano A",
    "3º Ano B",
    "4º Ano",
    "5º Ano",
    "6º Ano A",
    "6º Ano B",
    "7º Ano",
    "8º Ano",
    "9º Ano",
    "1ª Série",
    "2ª Série",
    "3ª Série",
];

/// One roster row. Accepts the legacy Portuguese field names when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(alias = "turma")]
    pub class_name: String,
    #[serde(alias = "nome")]
    pub name: String,
    pub login: String,
    #[serde(alias = "senha")]
    pub password: String,
}

impl StudentRecord {
    pub fn new(
        class_name: impl Into<String>,
        name: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            name: name.into(),
            login: login.into(),
            password: password.into(),
        }
    }
}

/// Surrogate id assigned when a record enters the roster. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub u32);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A roster entry: id plus record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub id: StudentId,
    #[serde(flatten)]
    pub record: StudentRecord,
}

/// The full set of student records for all classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    students: Vec<Student>,
    next_id: u32,
}

impl Roster {
    /// Build a roster, numbering records in input order.
    pub fn from_records(records: Vec<StudentRecord>) -> Self {
        let mut roster = Self::default();
        for record in records {
            roster.push(record);
        }
        roster
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn all(&self) -> &[Student] {
        &self.students
    }

    /// Records in roster order, for persistence.
    pub fn records(&self) -> Vec<StudentRecord> {
        self.students.iter().map(|s| s.record.clone()).collect()
    }

    pub fn get(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Append a record and return its new id.
    pub fn push(&mut self, record: StudentRecord) -> StudentId {
        let id = StudentId(self.next_id);
        self.next_id += 1;
        self.students.push(Student { id, record });
        id
    }

    /// Remove by id. Duplicates with the same values are left alone.
    pub fn remove(&mut self, id: StudentId) -> Option<StudentRecord> {
        let index = self.students.iter().position(|s| s.id == id)?;
        Some(self.students.remove(index).record)
    }

    /// Class names in display order: fixed order first, then extras alphabetically.
    pub fn classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = CLASS_ORDER.iter().map(|c| c.to_string()).collect();

        let mut extras: Vec<String> = self
            .students
            .iter()
            .map(|s| s.record.class_name.clone())
            .filter(|c| !CLASS_ORDER.contains(&c.as_str()))
            .collect();
        extras.sort();
        extras.dedup();

        classes.extend(extras);
        classes
    }

    /// Students of a class, sorted by name (case-insensitive).
    pub fn students_in(&self, class_name: &str) -> Vec<&Student> {
        let mut students: Vec<&Student> = self
            .students
            .iter()
            .filter(|s| s.record.class_name == class_name)
            .collect();
        students.sort_by_key(|s| s.record.name.to_lowercase());
        students
    }

    /// Find a student of a class by name.
    ///
    /// Order of matching:
    /// 1. Exact name match (case-insensitive)
    /// 2. Partial name match (name contains query)
    /// 3. Fuzzy match with score >= 0.85
    pub fn find_in_class(&self, class_name: &str, query: &str) -> Option<&Student> {
        let candidates = self.students_in(class_name);
        let query_lower = query.trim().to_lowercase();
        if query_lower.is_empty() {
            return None;
        }

        if let Some(student) = candidates
            .iter()
            .find(|s| s.record.name.to_lowercase() == query_lower)
        {
            return Some(*student);
        }

        if let Some(student) = candidates
            .iter()
            .find(|s| s.record.name.to_lowercase().contains(&query_lower))
        {
            return Some(*student);
        }

        let mut best_match: Option<(&Student, f64)> = None;
        for student in candidates {
            let match_result = fuzzy::multi_match(query, &student.record.name);
            if match_result.score >= fuzzy::DEFAULT_THRESHOLD
                && best_match
                    .as_ref()
                    .map_or(true, |(_, score)| match_result.score > *score)
            {
                best_match = Some((student, match_result.score));
            }
        }

        best_match.map(|(s, _)| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Roster {
        Roster::from_records(vec![
            StudentRecord::new("5º Ano", "Maria Souza", "maria.s", "m123"),
            StudentRecord::new("5º Ano", "ana lima", "ana.l", "a123"),
            StudentRecord::new("7º Ano", "João Pedro", "joao.p", "j123"),
            StudentRecord::new("5º Ano", "Bruno Alves", "bruno.a", "b123"),
        ])
    }

    #[test]
    fn test_ids_are_sequential() {
        let roster = sample();
        let ids: Vec<u32> = roster.all().iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_students_in_sorted_case_insensitive() {
        let roster = sample();
        let names: Vec<&str> = roster
            .students_in("5º Ano")
            .iter()
            .map(|s| s.record.name.as_str())
            .collect();
        assert_eq!(names, vec!["ana lima", "Bruno Alves", "Maria Souza"]);
    }

    #[test]
    fn test_remove_duplicate_by_id_keeps_twin() {
        let twin = StudentRecord::new("4º Ano", "Carla", "c", "p");
        let mut roster = Roster::from_records(vec![twin.clone(), twin.clone()]);

        let removed = roster.remove(StudentId(1));

        assert_eq!(removed, Some(twin));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.all()[0].id, StudentId(0));
    }

    #[test]
    fn test_push_after_remove_does_not_reuse_id() {
        let mut roster = sample();
        roster.remove(StudentId(3));
        let id = roster.push(StudentRecord::new("9º Ano", "Davi", "d", "p"));
        assert_eq!(id, StudentId(4));
    }

    #[test]
    fn test_classes_fixed_order_then_extras() {
        let mut roster = sample();
        roster.push(StudentRecord::new("Turma Z", "Zeca", "z", "p"));
        roster.push(StudentRecord::new("EJA", "Eva", "e", "p"));

        let classes = roster.classes();
        assert_eq!(classes[0], "3º Ano A");
        assert_eq!(classes[CLASS_ORDER.len() - 1], "3ª Série");
        assert_eq!(&classes[CLASS_ORDER.len()..], &["EJA", "Turma Z"]);
    }

    #[test]
    fn test_find_in_class_exact_partial_fuzzy() {
        let roster = sample();
        assert_eq!(
            roster.find_in_class("5º Ano", "MARIA SOUZA").map(|s| s.id),
            Some(StudentId(0))
        );
        assert_eq!(
            roster.find_in_class("5º Ano", "bruno").map(|s| s.id),
            Some(StudentId(3))
        );
        assert_eq!(
            roster.find_in_class("5º Ano", "Maria Sousa").map(|s| s.id),
            Some(StudentId(0))
        );
    }

    #[test]
    fn test_find_in_class_scoped_to_class() {
        let roster = sample();
        assert!(roster.find_in_class("5º Ano", "João Pedro").is_none());
        assert!(roster.find_in_class("5º Ano", "  ").is_none());
    }

    #[test]
    fn test_record_reads_legacy_field_names() {
        let json = r#"{"turma":"5º Ano","nome":"Ana","login":"ana.l","senha":"pw"}"#;
        let record: StudentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, StudentRecord::new("5º Ano", "Ana", "ana.l", "pw"));
    }

    #[test]
    fn test_record_writes_camel_case() {
        let record = StudentRecord::new("5º Ano", "Ana", "ana.l", "pw");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["className"], "5º Ano");
        assert_eq!(value["password"], "pw");
    }
}
