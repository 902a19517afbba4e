//! Form State Store: the only writer of a session's `ResumeProfile`.
//!
//! Every operation is total: lookups that miss (editing or removing an entry that
//! no longer exists) are silent no-ops reported through the `bool` return value.

use tracing::debug;
use uuid::Uuid;

use crate::models::profile::{
    CertificationEntry, CertificationField, EducationEntry, EducationField, EntryField, EntryId,
    ExperienceEntry, ExperienceField, PersonalField, ProjectEntry, ProjectField, ResumeProfile,
    Section, SkillKind,
};

#[derive(Debug, Clone, Default)]
pub struct FormStore {
    profile: ResumeProfile,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> &ResumeProfile {
        &self.profile
    }

    // ── add ────────────────────────────────────────────────────────────────

    pub fn add_education_entry(&mut self) -> EntryId {
        let id = Uuid::new_v4();
        self.profile.education.push(EducationEntry {
            id,
            ..Default::default()
        });
        id
    }

    pub fn add_experience_entry(&mut self) -> EntryId {
        let id = Uuid::new_v4();
        self.profile.experience.push(ExperienceEntry {
            id,
            ..Default::default()
        });
        id
    }

    pub fn add_project_entry(&mut self) -> EntryId {
        let id = Uuid::new_v4();
        self.profile.projects.push(ProjectEntry {
            id,
            ..Default::default()
        });
        id
    }

    pub fn add_certification_entry(&mut self) -> EntryId {
        let id = Uuid::new_v4();
        self.profile.certifications.push(CertificationEntry {
            id,
            ..Default::default()
        });
        id
    }

    pub fn add_entry(&mut self, section: Section) -> EntryId {
        match section {
            Section::Education => self.add_education_entry(),
            Section::Experience => self.add_experience_entry(),
            Section::Projects => self.add_project_entry(),
            Section::Certifications => self.add_certification_entry(),
        }
    }

    // ── update ─────────────────────────────────────────────────────────────

    /// Overwrites one field of the entry `entry_id` in the field's section.
    /// Returns `false` (and changes nothing) when the entry does not exist.
    pub fn update_entry_field(&mut self, entry_id: EntryId, field: EntryField, value: &str) -> bool {
        let applied = match field {
            EntryField::Education(f) => {
                match self.profile.education.iter_mut().find(|e| e.id == entry_id) {
                    Some(entry) => {
                        apply_education(entry, f, value);
                        true
                    }
                    None => false,
                }
            }
            EntryField::Experience(f) => {
                match self.profile.experience.iter_mut().find(|e| e.id == entry_id) {
                    Some(entry) => {
                        apply_experience(entry, f, value);
                        true
                    }
                    None => false,
                }
            }
            EntryField::Projects(f) => {
                match self.profile.projects.iter_mut().find(|e| e.id == entry_id) {
                    Some(entry) => {
                        apply_project(entry, f, value);
                        true
                    }
                    None => false,
                }
            }
            EntryField::Certifications(f) => {
                match self
                    .profile
                    .certifications
                    .iter_mut()
                    .find(|e| e.id == entry_id)
                {
                    Some(entry) => {
                        apply_certification(entry, f, value);
                        true
                    }
                    None => false,
                }
            }
        };

        if !applied {
            debug!(
                "update on missing {} entry {entry_id} ignored",
                field.section().as_str()
            );
        }
        applied
    }

    pub fn update_personal_info(&mut self, field: PersonalField, value: &str) {
        let info = &mut self.profile.personal_info;
        match field {
            PersonalField::FullName => info.full_name = value.to_string(),
            PersonalField::Title => info.title = optional(value),
            PersonalField::Email => info.email = value.to_string(),
            PersonalField::Phone => info.phone = value.to_string(),
            PersonalField::Location => info.location = value.to_string(),
            PersonalField::Linkedin => info.linkedin = value.to_string(),
            PersonalField::Bio => info.bio = optional(value),
        }
    }

    // ── remove ─────────────────────────────────────────────────────────────

    /// Removes the entry; removing an unknown id is a no-op returning `false`.
    pub fn remove_entry(&mut self, section: Section, entry_id: EntryId) -> bool {
        fn retain_without<T>(list: &mut Vec<T>, id_of: impl Fn(&T) -> EntryId, id: EntryId) -> bool {
            let before = list.len();
            list.retain(|e| id_of(e) != id);
            list.len() != before
        }

        match section {
            Section::Education => retain_without(&mut self.profile.education, |e| e.id, entry_id),
            Section::Experience => retain_without(&mut self.profile.experience, |e| e.id, entry_id),
            Section::Projects => retain_without(&mut self.profile.projects, |e| e.id, entry_id),
            Section::Certifications => {
                retain_without(&mut self.profile.certifications, |e| e.id, entry_id)
            }
        }
    }

    // ── skills ─────────────────────────────────────────────────────────────

    /// Adds a trimmed skill to the set. Empty values and duplicates are rejected.
    pub fn add_skill(&mut self, kind: SkillKind, value: &str) -> bool {
        let skill = value.trim();
        if skill.is_empty() {
            return false;
        }
        let set = self.profile.skills.set_mut(kind);
        if set.iter().any(|s| s == skill) {
            return false;
        }
        set.push(skill.to_string());
        true
    }

    pub fn remove_skill(&mut self, kind: SkillKind, value: &str) -> bool {
        let skill = value.trim();
        let set = self.profile.skills.set_mut(kind);
        let before = set.len();
        set.retain(|s| s != skill);
        set.len() != before
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field application
// ────────────────────────────────────────────────────────────────────────────

fn apply_education(entry: &mut EducationEntry, field: EducationField, value: &str) {
    match field {
        EducationField::Institution => entry.institution = value.to_string(),
        EducationField::Degree => entry.degree = value.to_string(),
        EducationField::FieldOfStudy => entry.field_of_study = value.to_string(),
        EducationField::StartDate => entry.start_date = value.to_string(),
        EducationField::EndDate => entry.end_date = value.to_string(),
        EducationField::Grade => entry.grade = optional(value),
    }
}

fn apply_experience(entry: &mut ExperienceEntry, field: ExperienceField, value: &str) {
    match field {
        ExperienceField::Organization => entry.organization = value.to_string(),
        ExperienceField::Role => entry.role = value.to_string(),
        ExperienceField::Location => entry.location = value.to_string(),
        ExperienceField::StartDate => entry.start_date = value.to_string(),
        ExperienceField::EndDate => entry.end_date = value.to_string(),
        ExperienceField::Description => entry.description = split_description(value),
    }
}

fn apply_project(entry: &mut ProjectEntry, field: ProjectField, value: &str) {
    match field {
        ProjectField::Name => entry.name = value.to_string(),
        ProjectField::Description => entry.description = value.to_string(),
        ProjectField::Technologies => entry.technologies = split_tags(value),
        ProjectField::Link => entry.link = optional(value),
    }
}

fn apply_certification(entry: &mut CertificationEntry, field: CertificationField, value: &str) {
    match field {
        CertificationField::Name => entry.name = value.to_string(),
        CertificationField::Issuer => entry.issuer = value.to_string(),
        CertificationField::Date => entry.date = value.to_string(),
        CertificationField::Link => entry.link = optional(value),
    }
}

/// Blank input clears an optional field.
fn optional(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// One description line per text-box line. Blank lines are kept so the text box
/// round-trips; the renderer skips them.
fn split_description(value: &str) -> Vec<String> {
    value
        .split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

/// Comma-separated tags, trimmed, empty and repeated tags dropped, order kept.
fn split_tags(value: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in value.split(',').map(str::trim) {
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_entries_get_unique_ids_and_empty_fields() {
        let mut store = FormStore::new();
        let a = store.add_education_entry();
        let b = store.add_education_entry();
        assert_ne!(a, b);
        assert_eq!(store.profile().education.len(), 2);
        assert_eq!(store.profile().education[0].institution, "");
        assert!(store.profile().education[0].grade.is_none());
    }

    #[test]
    fn test_add_entry_dispatches_by_section() {
        let mut store = FormStore::new();
        store.add_entry(Section::Experience);
        store.add_entry(Section::Projects);
        store.add_entry(Section::Certifications);
        assert_eq!(store.profile().experience.len(), 1);
        assert_eq!(store.profile().projects.len(), 1);
        assert_eq!(store.profile().certifications.len(), 1);
        assert!(store.profile().education.is_empty());
    }

    #[test]
    fn test_update_entry_field_overwrites_one_field() {
        let mut store = FormStore::new();
        let id = store.add_education_entry();
        assert!(store.update_entry_field(
            id,
            EntryField::Education(EducationField::Institution),
            "UC Berkeley"
        ));
        let edu = &store.profile().education[0];
        assert_eq!(edu.institution, "UC Berkeley");
        assert_eq!(edu.degree, "");
    }

    #[test]
    fn test_update_targets_entry_by_identity_not_position() {
        let mut store = FormStore::new();
        let first = store.add_project_entry();
        let second = store.add_project_entry();
        store.remove_entry(Section::Projects, first);
        store.update_entry_field(second, EntryField::Projects(ProjectField::Name), "Compiler");
        assert_eq!(store.profile().projects.len(), 1);
        assert_eq!(store.profile().projects[0].id, second);
        assert_eq!(store.profile().projects[0].name, "Compiler");
    }

    #[test]
    fn test_update_after_remove_is_noop() {
        let mut store = FormStore::new();
        let id = store.add_experience_entry();
        assert!(store.remove_entry(Section::Experience, id));
        let before = store.profile().clone();

        let applied = store.update_entry_field(
            id,
            EntryField::Experience(ExperienceField::Role),
            "Engineer",
        );
        assert!(!applied);
        assert_eq!(store.profile(), &before);
    }

    #[test]
    fn test_update_with_id_from_other_section_is_noop() {
        let mut store = FormStore::new();
        let edu_id = store.add_education_entry();
        store.add_experience_entry();
        let applied = store.update_entry_field(
            edu_id,
            EntryField::Experience(ExperienceField::Role),
            "Engineer",
        );
        assert!(!applied);
        assert_eq!(store.profile().experience[0].role, "");
    }

    #[test]
    fn test_remove_entry_is_idempotent() {
        let mut store = FormStore::new();
        let id = store.add_education_entry();
        assert!(store.remove_entry(Section::Education, id));
        assert!(!store.remove_entry(Section::Education, id));
        assert!(!store.remove_entry(Section::Education, Uuid::new_v4()));
        assert!(store.profile().education.is_empty());
    }

    #[test]
    fn test_description_split_into_lines_in_order() {
        let mut store = FormStore::new();
        let id = store.add_experience_entry();
        store.update_entry_field(
            id,
            EntryField::Experience(ExperienceField::Description),
            "Led a team of 5\r\nCut latency by 40%\nMentored juniors",
        );
        assert_eq!(
            store.profile().experience[0].description,
            vec!["Led a team of 5", "Cut latency by 40%", "Mentored juniors"]
        );
    }

    #[test]
    fn test_technologies_split_and_trimmed() {
        let mut store = FormStore::new();
        let id = store.add_project_entry();
        store.update_entry_field(
            id,
            EntryField::Projects(ProjectField::Technologies),
            "React, Node.js ,, React,MongoDB",
        );
        assert_eq!(
            store.profile().projects[0].technologies,
            vec!["React", "Node.js", "MongoDB"]
        );
    }

    #[test]
    fn test_blank_optional_values_clear_field() {
        let mut store = FormStore::new();
        let id = store.add_project_entry();
        let link = EntryField::Projects(ProjectField::Link);
        store.update_entry_field(id, link, "https://github.com/alexj/shop");
        assert_eq!(
            store.profile().projects[0].link.as_deref(),
            Some("https://github.com/alexj/shop")
        );
        store.update_entry_field(id, link, "   ");
        assert!(store.profile().projects[0].link.is_none());
    }

    #[test]
    fn test_add_skill_rejects_duplicates_and_empty() {
        let mut store = FormStore::new();
        assert!(store.add_skill(SkillKind::Technical, "Rust"));
        assert!(!store.add_skill(SkillKind::Technical, "Rust"));
        assert!(!store.add_skill(SkillKind::Technical, "  Rust "));
        assert!(!store.add_skill(SkillKind::Technical, "   "));
        assert_eq!(store.profile().skills.technical, vec!["Rust"]);
    }

    #[test]
    fn test_same_skill_allowed_in_different_sets() {
        let mut store = FormStore::new();
        assert!(store.add_skill(SkillKind::Technical, "Writing"));
        assert!(store.add_skill(SkillKind::Soft, "Writing"));
        assert_eq!(store.profile().skills.soft, vec!["Writing"]);
    }

    #[test]
    fn test_remove_skill_by_value() {
        let mut store = FormStore::new();
        store.add_skill(SkillKind::Soft, "Leadership");
        store.add_skill(SkillKind::Soft, "Communication");
        assert!(store.remove_skill(SkillKind::Soft, "Leadership"));
        assert!(!store.remove_skill(SkillKind::Soft, "Leadership"));
        assert_eq!(store.profile().skills.soft, vec!["Communication"]);
    }

    #[test]
    fn test_update_personal_info_optional_fields() {
        let mut store = FormStore::new();
        store.update_personal_info(PersonalField::FullName, "Alex Johnson");
        store.update_personal_info(PersonalField::Bio, "Full-stack engineer");
        store.update_personal_info(PersonalField::Title, "");
        let info = &store.profile().personal_info;
        assert_eq!(info.full_name, "Alex Johnson");
        assert_eq!(info.bio.as_deref(), Some("Full-stack engineer"));
        assert!(info.title.is_none());
    }
}
