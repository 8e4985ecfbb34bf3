use super::*;
use crate::{composition::model::SectionKind, form::photo::ImageUpload};

fn jean() -> ResumeRecord {
    ResumeRecord {
        first_name: "Jean".into(),
        last_name: "Dupont".into(),
        title: "Développeur".into(),
        email: "jean@example.com".into(),
        phone: "+33 6 00 00 00 00".into(),
        address: "Lyon".into(),
        experience: "2020-2024 Acme\r\nBackend".into(),
        education: "Master, INSA".into(),
        skills: "Python\n\n  Go \nRust".into(),
    }
}

fn photo() -> ProfileImage {
    ProfileImage::from_upload(&ImageUpload::new("image/png", vec![1, 2, 3])).unwrap()
}

#[test]
fn full_record_renders_every_section() {
    for t in TemplateId::ALL {
        let comp = render_composition(&jean(), None, t);
        assert_eq!(comp.template, t);
        for kind in [
            SectionKind::Contact,
            SectionKind::Experience,
            SectionKind::Education,
            SectionKind::Skills,
        ] {
            assert!(comp.has_section(kind), "{t}: {kind:?} missing");
        }
        assert_eq!(
            comp.find(Role::Name).unwrap().text_content(),
            "Jean Dupont",
            "{t}"
        );
        assert_eq!(
            comp.find(Role::Title).unwrap().text_content(),
            "Développeur"
        );
    }
}

#[test]
fn blank_fields_drop_their_sections() {
    let mut record = jean();
    record.experience = "  \n ".into();
    record.education = String::new();
    record.skills = "\n\n".into();
    record.email = String::new();
    record.phone = " ".into();
    record.address = String::new();
    for t in TemplateId::ALL {
        let comp = render_composition(&record, None, t);
        assert!(!comp.has_section(SectionKind::Experience), "{t}");
        assert!(!comp.has_section(SectionKind::Education), "{t}");
        assert!(!comp.has_section(SectionKind::Skills), "{t}");
        assert!(!comp.has_section(SectionKind::Contact), "{t}");
        assert!(comp.find(Role::SectionHeading(SectionKind::Skills)).is_none());
        assert!(comp.skill_tokens().is_empty());
    }
}

#[test]
fn skills_are_parsed_the_same_way_everywhere() {
    for t in TemplateId::ALL {
        let comp = render_composition(&jean(), None, t);
        assert_eq!(comp.skill_tokens(), ["Python", "Go", "Rust"], "{t}");
    }
}

#[test]
fn contact_items_are_omitted_individually() {
    let mut record = jean();
    record.phone = String::new();
    for t in TemplateId::ALL {
        let comp = render_composition(&record, None, t);
        assert!(comp.find(Role::ContactItem(ContactKind::Email)).is_some());
        assert!(comp.find(Role::ContactItem(ContactKind::Phone)).is_none());
        assert!(comp.find(Role::ContactItem(ContactKind::Address)).is_some());
    }
}

#[test]
fn free_text_keeps_line_breaks() {
    let comp = render_composition(&jean(), None, TemplateId::Template1);
    let section = comp.find(Role::Section(SectionKind::Experience)).unwrap();
    assert!(
        section
            .text_content()
            .ends_with("2020-2024 Acme\nBackend")
    );
}

#[test]
fn photo_is_drawn_only_when_present() {
    let image = photo();
    for t in TemplateId::ALL {
        assert!(!render_composition(&jean(), None, t).has_photo());
        let comp = render_composition(&jean(), Some(&image), t);
        assert!(comp.has_photo(), "{t}");
        match &comp.find(Role::Photo).unwrap().kind {
            NodeKind::Image(spec) => assert_eq!(spec.source, image),
            other => panic!("photo node is {other:?}"),
        }
    }
}

#[test]
fn empty_record_renders_chrome_only() {
    for t in TemplateId::ALL {
        let comp = render_composition(&ResumeRecord::default(), None, t);
        assert_eq!(comp.width, t.descriptor().width);
        assert!(comp.find(Role::Name).is_some());
        assert!(comp.find_all(Role::SkillToken).is_empty());
        assert_eq!(comp.root.text_content().trim(), "");
    }
}

#[test]
fn sidebar_template_moves_contact_and_skills_into_panel() {
    let comp = render_composition(&jean(), None, TemplateId::Template3);
    let panel = comp.find(Role::Sidebar).unwrap();
    let mut inside = Vec::new();
    panel.walk(&mut |n| inside.extend(n.role));
    assert!(inside.contains(&Role::Section(SectionKind::Contact)));
    assert!(inside.contains(&Role::Section(SectionKind::Skills)));
    assert!(!inside.contains(&Role::Section(SectionKind::Experience)));
}

#[test]
fn templates_differ_only_in_presentation() {
    let record = jean();
    let names: Vec<String> = TemplateId::ALL
        .iter()
        .map(|t| {
            render_composition(&record, None, *t)
                .find(Role::Name)
                .unwrap()
                .text_content()
        })
        .collect();
    assert!(names.iter().all(|n| n == "Jean Dupont"));
    let widths: Vec<f64> = TemplateId::ALL
        .iter()
        .map(|t| render_composition(&record, None, *t).width)
        .collect();
    assert_eq!(widths, [672.0, 672.0, 896.0, 768.0, 672.0]);
}
