//! Centered header over a thin rule; narrow left column for skills, education
//! and certifications, wide right column for experience and projects.

use crate::models::profile::ResumeProfile;
use crate::templates::document::{
    Align, Block, Column, DocSection, Entry, Header, HeaderRule, Palette, RenderedDocument, Rgb,
};
use crate::templates::{
    bullet_lines, contact_items, date_range, joined, muted, non_empty_items, present,
    present_opt, push_opt, strong, text, TemplateSelection,
};

pub const PALETTE: Palette = Palette {
    background: Rgb(255, 255, 255),
    heading: Rgb(17, 24, 39),
    text: Rgb(55, 65, 81),
    muted: Rgb(107, 114, 128),
    accent: Rgb(75, 85, 99),
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

    let mut left = Vec::new();
    if !profile.skills.is_empty() {
        let groups = [
            ("Technical", &profile.skills.technical),
            ("Soft Skills", &profile.skills.soft),
            ("Languages", &profile.skills.languages),
        ];
        let entries = groups
            .into_iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(label, items)| Entry {
                blocks: vec![Block::Tags {
                    label: Some(label.to_string()),
                    items: non_empty_items(items),
                }],
            })
            .collect();
        left.push(DocSection {
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
                push_opt(&mut blocks, present(&e.institution).map(str::to_string), strong);
                push_opt(
                    &mut blocks,
                    joined(&[e.degree.as_str(), e.field_of_study.as_str()], " in "),
                    text,
                );
                push_opt(&mut blocks, date_range(&e.start_date, &e.end_date), muted);
                push_opt(
                    &mut blocks,
                    present_opt(&e.grade).map(|g| format!("GPA: {g}")),
                    muted,
                );
                Entry { blocks }
            })
            .collect();
        left.push(DocSection {
            heading: "Education".to_string(),
            entries,
        });
    }
    if !profile.certifications.is_empty() {
        let entries = profile
            .certifications
            .iter()
            .map(|c| {
                let mut blocks = Vec::new();
                push_opt(&mut blocks, present(&c.name).map(str::to_string), strong);
                push_opt(&mut blocks, present(&c.issuer).map(str::to_string), text);
                push_opt(&mut blocks, present(&c.date).map(str::to_string), muted);
                if let Some(href) = present_opt(&c.link) {
                    blocks.push(Block::Link {
                        label: "View Credential".to_string(),
                        href: href.to_string(),
                    });
                }
                Entry { blocks }
            })
            .collect();
        left.push(DocSection {
            heading: "Certifications".to_string(),
            entries,
        });
    }

    let mut right = Vec::new();
    if !profile.experience.is_empty() {
        let entries = profile
            .experience
            .iter()
            .map(|e| {
                let mut blocks = Vec::new();
                push_opt(&mut blocks, present(&e.role).map(str::to_string), strong);
                push_opt(&mut blocks, present(&e.organization).map(str::to_string), text);
                let dates = date_range(&e.start_date, &e.end_date).unwrap_or_default();
                push_opt(&mut blocks, joined(&[dates.as_str(), e.location.as_str()], " | "), muted);
                let bullets = bullet_lines(&e.description);
                if !bullets.is_empty() {
                    blocks.push(Block::Bullets { items: bullets });
                }
                Entry { blocks }
            })
            .collect();
        right.push(DocSection {
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
                push_opt(&mut blocks, present(&p.description).map(str::to_string), text);
                let tags = non_empty_items(&p.technologies);
                if !tags.is_empty() {
                    blocks.push(Block::Tags {
                        label: None,
                        items: tags,
                    });
                }
                if let Some(href) = present_opt(&p.link) {
                    blocks.push(Block::Link {
                        label: "View Project".to_string(),
                        href: href.to_string(),
                    });
                }
                Entry { blocks }
            })
            .collect();
        right.push(DocSection {
            heading: "Projects".to_string(),
            entries,
        });
    }

    RenderedDocument {
        selection,
        palette: PALETTE,
        header: Header {
            align: Align::Center,
            rule: HeaderRule::Thin,
            blocks: header,
        },
        columns: vec![
            Column {
                span: 4,
                sections: left,
            },
            Column {
                span: 8,
                sections: right,
            },
        ],
    }
}
