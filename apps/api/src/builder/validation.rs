use crate::models::profile::{PersonalField, PersonalInfo};

/// Personal-info fields that are required for submission but still blank.
///
/// Informational only: the builder never blocks editing, preview or export on it.
pub fn missing_required_fields(info: &PersonalInfo) -> Vec<PersonalField> {
    [
        (PersonalField::FullName, &info.full_name),
        (PersonalField::Email, &info.email),
        (PersonalField::Phone, &info.phone),
        (PersonalField::Location, &info.location),
        (PersonalField::Linkedin, &info.linkedin),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_info_misses_every_required_field() {
        let missing = missing_required_fields(&PersonalInfo::default());
        assert_eq!(missing.len(), 5);
        assert!(!missing.contains(&PersonalField::Title));
        assert!(!missing.contains(&PersonalField::Bio));
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let info = PersonalInfo {
            full_name: "Alex".to_string(),
            email: "  ".to_string(),
            phone: "555".to_string(),
            location: "SF".to_string(),
            linkedin: "in/alex".to_string(),
            ..Default::default()
        };
        assert_eq!(missing_required_fields(&info), vec![PersonalField::Email]);
    }
}
