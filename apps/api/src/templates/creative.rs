//! Left-aligned accent header, skills and education in a sidebar, work history
//! and projects in the main column.

use crate::models::profile::{CertificationEntry, ResumeProfile};
use crate::templates::document::{
    Align, Block, Column, DocSection, Entry, Header, HeaderRule, Palette, RenderedDocument, Rgb,
};
use crate::templates::{
    bullet_lines, contact_items, date_range, joined, muted, non_empty_items, present,
    present_opt, push_opt, strong, text, TemplateSelection,
};

pub const PALETTE: Palette = Palette {
    background: Rgb(255, 255, 255),
    heading: Rgb(79, 70, 229),
    text: Rgb(31, 41, 55),
    muted: Rgb(107, 114, 128),
    accent: Rgb(99, 102, 241),
};

pub fn render(profile: &ResumeProfile, selection: TemplateSelection) -> RenderedDocument {
    let info = &profile.personal_info;

    let mut header = Vec::new();
    push_opt(&mut header, present(&info.full_name).map(str::to_string), |text| {
        Block::Title { text }
    });
    push_opt(&mut header, present_opt(&info.title).map(str::to_string), |text| {
        Block::Subtitle { text }
    });
    let contacts = contact_items(info, true);
    if !contacts.is_empty() {
        header.push(Block::Inline { items: contacts });
    }
    push_opt(&mut header, present_opt(&info.bio).map(str::to_string), text);

    let mut sidebar = Vec::new();
    if !profile.skills.is_empty() {
        let mut entries = Vec::new();
        for (label, items) in [
            ("Technical Skills", &profile.skills.technical),
            ("Soft Skills", &profile.skills.soft),
            ("Languages", &profile.skills.languages),
        ] {
            if items.is_empty() {
                continue;
            }
            entries.push(Entry {
                blocks: vec![Block::Tags {
                    label: Some(label.to_string()),
                    items: non_empty_items(items),
                }],
            });
        }
        sidebar.push(DocSection {
            heading: "Skills".to_string(),
            entries,
        });
    }
    if !profile.education.is_empty() {
        let entries = profile
            .education
            .iter()
            .map(|e| {
                let mut blocks = Vec::new();
                push_opt(
                    &mut blocks,
                    joined(&[e.degree.as_str(), e.field_of_study.as_str()], " in "),
                    strong,
                );
                push_opt(&mut blocks, present(&e.institution).map(str::to_string), text);
                push_opt(&mut blocks, date_range(&e.start_date, &e.end_date), muted);
                push_opt(
                    &mut blocks,
                    present_opt(&e.grade).map(|g| format!("GPA: {g}")),
                    muted,
                );
                Entry { blocks }
            })
            .collect();
        sidebar.push(DocSection {
            heading: "Education".to_string(),
            entries,
        });
    }

    let mut main = Vec::new();
    if !profile.experience.is_empty() {
        let entries = profile
            .experience
            .iter()
            .map(|e| {
                let mut blocks = Vec::new();
                push_opt(&mut blocks, present(&e.role).map(str::to_string), strong);
                push_opt(&mut blocks, present(&e.organization).map(str::to_string), text);
                push_opt(&mut blocks, date_range(&e.start_date, &e.end_date), muted);
                push_opt(&mut blocks, present(&e.location).map(str::to_string), muted);
                let bullets = bullet_lines(&e.description);
                if !bullets.is_empty() {
                    blocks.push(Block::Bullets { items: bullets });
                }
                Entry { blocks }
            })
            .collect();
        main.push(DocSection {
            heading: "Professional Experience".to_string(),
            entries,
        });
    }
    if !profile.projects.is_empty() {
        let entries = profile
            .projects
            .iter()
            .map(|p| {
                let mut blocks = Vec::new();
                push_opt(&mut blocks, present(&p.name).map(str::to_string), strong);
                let tags = non_empty_items(&p.technologies);
                if !tags.is_empty() {
                    blocks.push(Block::Tags {
                        label: None,
                        items: tags,
                    });
                }
                push_opt(&mut blocks, present(&p.description).map(str::to_string), text);
                if let Some(href) = present_opt(&p.link) {
                    blocks.push(Block::Link {
                        label: "View Project".to_string(),
                        href: href.to_string(),
                    });
                }
                Entry { blocks }
            })
            .collect();
        main.push(DocSection {
            heading: "Projects".to_string(),
            entries,
        });
    }
    if !profile.certifications.is_empty() {
        main.push(DocSection {
            heading: "Certifications".to_string(),
            entries: profile.certifications.iter().map(certification).collect(),
        });
    }

    RenderedDocument {
        selection,
        palette: PALETTE,
        header: Header {
            align: Align::Left,
            rule: HeaderRule::None,
            blocks: header,
        },
        columns: vec![
            Column {
                span: 4,
                sections: sidebar,
            },
            Column {
                span: 8,
                sections: main,
            },
        ],
    }
}

fn certification(c: &CertificationEntry) -> Entry {
    let mut blocks = Vec::new();
    push_opt(&mut blocks, present(&c.name).map(str::to_string), strong);
    push_opt(
        &mut blocks,
        joined(&[c.issuer.as_str(), c.date.as_str()], " | "),
        muted,
    );
    if let Some(href) = present_opt(&c.link) {
        blocks.push(Block::Link {
            label: "View Credential".to_string(),
            href: href.to_string(),
        });
    }
    Entry { blocks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::test_support::sample_profile;
    use crate::templates::{DocumentType, TemplateKind};

    fn selection() -> TemplateSelection {
        TemplateSelection::new(TemplateKind::Creative, DocumentType::Cv)
    }

    #[test]
    fn test_sidebar_and_main_sections() {
        let doc = render(&sample_profile(), selection());
        assert_eq!(doc.header.align, Align::Left);
        assert_eq!(doc.header.rule, HeaderRule::None);
        assert_eq!(
            doc.section_headings(),
            vec![
                "Skills",
                "Education",
                "Professional Experience",
                "Projects",
                "Certifications"
            ]
        );
    }

    #[test]
    fn test_education_headline_joins_degree_and_field() {
        let mut profile = sample_profile();
        profile.education[0].field_of_study.clear();
        let doc = render(&profile, selection());
        let entry = &doc.find_section("Education").unwrap().entries[0];
        assert_eq!(
            entry.blocks[0],
            Block::Strong {
                text: "Bachelor of Science".to_string()
            }
        );
    }

    #[test]
    fn test_palette_uses_indigo_headings() {
        let doc = render(&sample_profile(), selection());
        assert_eq!(doc.palette.heading.hex(), "#4f46e5");
    }
}
