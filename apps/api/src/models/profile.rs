use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client-side identity of a list entry. Only used for add/remove/update by identity.
pub type EntryId = Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub full_name: String,
    pub title: Option<String>,
    pub email: String,
    pub phone: String,
    pub location: String,
    /// Professional-network profile link.
    pub linkedin: String,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub id: EntryId,
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: String,
    pub end_date: String,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub id: EntryId,
    pub organization: String,
    pub role: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    /// One element per line of the description text box, blank lines included.
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub id: EntryId,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificationEntry {
    pub id: EntryId,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub link: Option<String>,
}

/// Skill sets. `languages` is optional: an empty set is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
    pub languages: Vec<String>,
}

impl Skills {
    pub fn is_empty(&self) -> bool {
        self.technical.is_empty() && self.soft.is_empty() && self.languages.is_empty()
    }

    pub fn set_mut(&mut self, kind: SkillKind) -> &mut Vec<String> {
        match kind {
            SkillKind::Technical => &mut self.technical,
            SkillKind::Soft => &mut self.soft,
            SkillKind::Languages => &mut self.languages,
        }
    }
}

/// The root aggregate edited by one builder session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub personal_info: PersonalInfo,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Skills,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<CertificationEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Closed addressing for edits
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Education,
    Experience,
    Projects,
    Certifications,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Education => "education",
            Section::Experience => "experience",
            Section::Projects => "projects",
            Section::Certifications => "certifications",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Technical,
    Soft,
    Languages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalField {
    FullName,
    Title,
    Email,
    Phone,
    Location,
    Linkedin,
    Bio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationField {
    Institution,
    Degree,
    FieldOfStudy,
    StartDate,
    EndDate,
    Grade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceField {
    Organization,
    Role,
    Location,
    StartDate,
    EndDate,
    /// Multi-line text; split on newlines into description lines.
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectField {
    Name,
    Description,
    /// Comma-separated list of technology tags.
    Technologies,
    Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificationField {
    Name,
    Issuer,
    Date,
    Link,
}

/// One editable field of one list section.
///
/// Serialized adjacently tagged: `{"section": "experience", "field": "description"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "section", content = "field", rename_all = "snake_case")]
pub enum EntryField {
    Education(EducationField),
    Experience(ExperienceField),
    Projects(ProjectField),
    Certifications(CertificationField),
}

impl EntryField {
    pub fn section(&self) -> Section {
        match self {
            EntryField::Education(_) => Section::Education,
            EntryField::Experience(_) => Section::Experience,
            EntryField::Projects(_) => Section::Projects,
            EntryField::Certifications(_) => Section::Certifications,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_field_json_shape() {
        let field: EntryField =
            serde_json::from_str(r#"{"section":"experience","field":"description"}"#).unwrap();
        assert_eq!(field, EntryField::Experience(ExperienceField::Description));
        assert_eq!(field.section(), Section::Experience);
    }

    #[test]
    fn test_entry_field_rejects_field_from_other_section() {
        let result: Result<EntryField, _> =
            serde_json::from_str(r#"{"section":"education","field":"technologies"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_skills_is_empty() {
        assert!(Skills::default().is_empty());
        let skills = Skills {
            languages: vec!["English".to_string()],
            ..Default::default()
        };
        assert!(!skills.is_empty());
    }
}
