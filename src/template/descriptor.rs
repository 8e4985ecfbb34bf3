use std::{fmt, str::FromStr};

use crate::{
    composition::model::{Align, SectionKind},
    foundation::core::Rgba8,
    foundation::error::{CvError, CvResult},
};

/// One of the five fixed templates.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    /// Photo beside the name, chips for skills.
    #[default]
    Template1,
    /// Centered serif header, two columns.
    Template2,
    /// Colored sidebar holding contact and skills.
    Template3,
    /// Photo on the right, accent bars before headings.
    Template4,
    /// Card on a tinted background, ruled section bodies.
    Template5,
}

impl TemplateId {
    /// All templates in display order.
    pub const ALL: [TemplateId; 5] = [
        TemplateId::Template1,
        TemplateId::Template2,
        TemplateId::Template3,
        TemplateId::Template4,
        TemplateId::Template5,
    ];

    /// Stable identifier (`template1` .. `template5`).
    pub fn id(self) -> &'static str {
        match self {
            TemplateId::Template1 => "template1",
            TemplateId::Template2 => "template2",
            TemplateId::Template3 => "template3",
            TemplateId::Template4 => "template4",
            TemplateId::Template5 => "template5",
        }
    }

    /// 1-based position in the picker.
    pub fn number(self) -> u8 {
        match self {
            TemplateId::Template1 => 1,
            TemplateId::Template2 => 2,
            TemplateId::Template3 => 3,
            TemplateId::Template4 => 4,
            TemplateId::Template5 => 5,
        }
    }

    /// Name shown in the picker.
    pub fn display_name(self) -> String {
        format!("Modèle {}", self.number())
    }

    /// Layout data consumed by the renderer.
    pub fn descriptor(self) -> LayoutDescriptor {
        match self {
            TemplateId::Template1 => template1(),
            TemplateId::Template2 => template2(),
            TemplateId::Template3 => template3(),
            TemplateId::Template4 => template4(),
            TemplateId::Template5 => template5(),
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TemplateId {
    type Err = CvError;

    fn from_str(s: &str) -> CvResult<Self> {
        let s = s.trim();
        TemplateId::ALL
            .into_iter()
            .find(|t| t.id().eq_ignore_ascii_case(s) || s == t.number().to_string())
            .ok_or_else(|| CvError::validation(format!("unknown template '{s}'")))
    }
}

/// Generic font family requested by a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontKind {
    /// Sans-serif.
    Sans,
    /// Serif.
    Serif,
}

/// Colors of one template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Behind the card (visible around it in the card layout).
    pub page: Rgba8,
    /// Card background.
    pub card: Rgba8,
    /// First name and name without accent.
    pub name: Rgba8,
    /// Last name when accented.
    pub accent: Rgba8,
    /// Title line.
    pub title: Rgba8,
    /// Contact entries.
    pub contact: Rgba8,
    /// Section headings.
    pub heading: Rgba8,
    /// Heading rules, body rules.
    pub rule: Rgba8,
    /// Body text.
    pub body: Rgba8,
    /// Skill chip fill.
    pub chip: Rgba8,
    /// Skill chip text.
    pub chip_text: Rgba8,
    /// Bullets, dots and accent bars.
    pub marker: Rgba8,
}

/// Colors of the side panel in [`BodyLayout::Sidebar`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SidebarPalette {
    /// Panel background.
    pub background: Rgba8,
    /// Panel text.
    pub text: Rgba8,
    /// Title line.
    pub title: Rgba8,
    /// Heading rules.
    pub rule: Rgba8,
}

/// Arrangement of photo and identity block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderLayout {
    /// Photo left of the name block.
    PhotoLeft,
    /// Photo above a centered name block.
    Centered,
    /// Name block left, photo pushed to the right edge.
    PhotoRight,
}

/// Arrangement of contact entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactLayout {
    /// On one wrapping line.
    Inline,
    /// One entry per line.
    Stacked,
}

/// Arrangement of the section area.
#[derive(Clone, Debug, PartialEq)]
pub enum BodyLayout {
    /// Header on top, sections below in one column.
    SingleColumn(Vec<SectionKind>),
    /// Header on top, sections split over two equal columns.
    TwoColumns {
        left: Vec<SectionKind>,
        right: Vec<SectionKind>,
    },
    /// Header and listed sections in a colored side panel, the rest in the main column.
    Sidebar {
        fraction: f64,
        side: Vec<SectionKind>,
        main: Vec<SectionKind>,
        palette: SidebarPalette,
    },
}

/// Decoration of section headings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HeadingStyle {
    /// Rule under the heading text.
    Underline { thickness: f64, padding: f64 },
    /// Short bar before the heading text.
    AccentBar { width: f64, height: f64 },
}

/// Rendering of the parsed skill tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillStyle {
    /// Rounded chips on wrapping lines.
    Chips,
    /// Bulleted list.
    Bullets,
    /// Dot + label, one per line.
    DotList,
    /// Dot + label in a grid.
    DotGrid { columns: u32 },
}

/// Circular photo geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhotoStyle {
    /// Diameter of the picture itself.
    pub size: f64,
    /// Ring width around the picture.
    pub ring: f64,
    /// Ring color.
    pub ring_color: Rgba8,
}

/// Section titles as displayed.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionTitles {
    pub contact: &'static str,
    pub experience: &'static str,
    pub education: &'static str,
    pub skills: &'static str,
}

impl SectionTitles {
    pub fn get(&self, kind: SectionKind) -> &'static str {
        match kind {
            SectionKind::Contact => self.contact,
            SectionKind::Experience => self.experience,
            SectionKind::Education => self.education,
            SectionKind::Skills => self.skills,
        }
    }
}

/// Data describing one template; consumed by [`crate::render_composition`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutDescriptor {
    pub id: TemplateId,
    /// Card width in pixels.
    pub width: f64,
    /// Card inner padding.
    pub padding: f64,
    /// Inset of the card inside a tinted page, if any.
    pub inset: Option<f64>,
    pub radius: f64,
    pub font: FontKind,
    pub palette: Palette,
    pub header: HeaderLayout,
    /// Cross-axis alignment of photo and identity block in row headers.
    pub header_align: Align,
    /// Gap between header and body.
    pub header_gap: f64,
    pub photo: PhotoStyle,
    pub name_size: f32,
    /// Last name drawn in the accent color.
    pub accent_last_name: bool,
    pub title_size: f32,
    pub contact: ContactLayout,
    pub contact_size: f32,
    pub body: BodyLayout,
    /// Vertical gap between sections.
    pub section_gap: f64,
    pub heading: HeadingStyle,
    pub heading_size: f32,
    pub titles: SectionTitles,
    pub body_size: f32,
    /// Left indent of section bodies.
    pub body_indent: f64,
    /// Vertical rule left of experience and education bodies.
    pub body_rule: Option<f64>,
    pub skills: SkillStyle,
}

const GRAY_50: Rgba8 = Rgba8::hex(0xf9fafb);
const GRAY_200: Rgba8 = Rgba8::hex(0xe5e7eb);
const GRAY_500: Rgba8 = Rgba8::hex(0x6b7280);
const GRAY_600: Rgba8 = Rgba8::hex(0x4b5563);
const GRAY_700: Rgba8 = Rgba8::hex(0x374151);
const GRAY_800: Rgba8 = Rgba8::hex(0x1f2937);
const GRAY_900: Rgba8 = Rgba8::hex(0x111827);

const TITLES_PLAIN: SectionTitles = SectionTitles {
    contact: "Contact",
    experience: "Expérience Professionnelle",
    education: "Formation",
    skills: "Compétences",
};

fn template1() -> LayoutDescriptor {
    LayoutDescriptor {
        id: TemplateId::Template1,
        width: 672.0,
        padding: 32.0,
        inset: None,
        radius: 8.0,
        font: FontKind::Sans,
        palette: Palette {
            page: Rgba8::WHITE,
            card: Rgba8::WHITE,
            name: GRAY_800,
            accent: Rgba8::hex(0x2563eb),
            title: GRAY_600,
            contact: GRAY_600,
            heading: GRAY_800,
            rule: GRAY_200,
            body: GRAY_700,
            chip: Rgba8::hex(0xdbeafe),
            chip_text: Rgba8::hex(0x1e40af),
            marker: Rgba8::hex(0x2563eb),
        },
        header: HeaderLayout::PhotoLeft,
        header_align: Align::Start,
        header_gap: 32.0,
        photo: PhotoStyle {
            size: 104.0,
            ring: 4.0,
            ring_color: Rgba8::hex(0xdbeafe),
        },
        name_size: 30.0,
        accent_last_name: true,
        title_size: 20.0,
        contact: ContactLayout::Inline,
        contact_size: 14.0,
        body: BodyLayout::SingleColumn(vec![
            SectionKind::Experience,
            SectionKind::Education,
            SectionKind::Skills,
        ]),
        section_gap: 24.0,
        heading: HeadingStyle::Underline {
            thickness: 1.0,
            padding: 8.0,
        },
        heading_size: 20.0,
        titles: TITLES_PLAIN,
        body_size: 16.0,
        body_indent: 0.0,
        body_rule: None,
        skills: SkillStyle::Chips,
    }
}

fn template2() -> LayoutDescriptor {
    let teal = Rgba8::hex(0x0f766e);
    LayoutDescriptor {
        id: TemplateId::Template2,
        width: 672.0,
        padding: 32.0,
        inset: None,
        radius: 8.0,
        font: FontKind::Serif,
        palette: Palette {
            page: GRAY_50,
            card: GRAY_50,
            name: GRAY_800,
            accent: teal,
            title: GRAY_600,
            contact: GRAY_600,
            heading: teal,
            rule: Rgba8::hex(0x99f6e4),
            body: GRAY_700,
            chip: Rgba8::hex(0xccfbf1),
            chip_text: teal,
            marker: GRAY_700,
        },
        header: HeaderLayout::Centered,
        header_align: Align::Center,
        header_gap: 32.0,
        photo: PhotoStyle {
            size: 120.0,
            ring: 4.0,
            ring_color: Rgba8::WHITE,
        },
        name_size: 36.0,
        accent_last_name: true,
        title_size: 24.0,
        contact: ContactLayout::Inline,
        contact_size: 16.0,
        body: BodyLayout::TwoColumns {
            left: vec![SectionKind::Experience],
            right: vec![SectionKind::Education, SectionKind::Skills],
        },
        section_gap: 24.0,
        heading: HeadingStyle::Underline {
            thickness: 1.0,
            padding: 4.0,
        },
        heading_size: 20.0,
        titles: SectionTitles {
            contact: "CONTACT",
            experience: "EXPÉRIENCE",
            education: "FORMATION",
            skills: "COMPÉTENCES",
        },
        body_size: 16.0,
        body_indent: 0.0,
        body_rule: None,
        skills: SkillStyle::Bullets,
    }
}

fn template3() -> LayoutDescriptor {
    let indigo = Rgba8::hex(0x3730a3);
    LayoutDescriptor {
        id: TemplateId::Template3,
        width: 896.0,
        padding: 32.0,
        inset: None,
        radius: 8.0,
        font: FontKind::Sans,
        palette: Palette {
            page: Rgba8::WHITE,
            card: Rgba8::WHITE,
            name: Rgba8::WHITE,
            accent: Rgba8::WHITE,
            title: Rgba8::hex(0xc7d2fe),
            contact: Rgba8::WHITE,
            heading: indigo,
            rule: Rgba8::hex(0xc7d2fe),
            body: GRAY_700,
            chip: Rgba8::hex(0x4338ca),
            chip_text: Rgba8::WHITE,
            marker: Rgba8::WHITE,
        },
        header: HeaderLayout::Centered,
        header_align: Align::Center,
        header_gap: 32.0,
        photo: PhotoStyle {
            size: 124.0,
            ring: 2.0,
            ring_color: Rgba8::WHITE,
        },
        name_size: 24.0,
        accent_last_name: false,
        title_size: 18.0,
        contact: ContactLayout::Stacked,
        contact_size: 14.0,
        body: BodyLayout::Sidebar {
            fraction: 1.0 / 3.0,
            side: vec![SectionKind::Contact, SectionKind::Skills],
            main: vec![SectionKind::Experience, SectionKind::Education],
            palette: SidebarPalette {
                background: indigo,
                text: Rgba8::WHITE,
                title: Rgba8::hex(0xc7d2fe),
                rule: Rgba8::hex(0x4338ca),
            },
        },
        section_gap: 32.0,
        heading: HeadingStyle::Underline {
            thickness: 2.0,
            padding: 4.0,
        },
        heading_size: 20.0,
        titles: SectionTitles {
            contact: "CONTACT",
            experience: "EXPÉRIENCE PROFESSIONNELLE",
            education: "FORMATION",
            skills: "COMPÉTENCES",
        },
        body_size: 16.0,
        body_indent: 0.0,
        body_rule: None,
        skills: SkillStyle::DotList,
    }
}

fn template4() -> LayoutDescriptor {
    let purple = Rgba8::hex(0x9333ea);
    LayoutDescriptor {
        id: TemplateId::Template4,
        width: 768.0,
        padding: 32.0,
        inset: None,
        radius: 8.0,
        font: FontKind::Sans,
        palette: Palette {
            page: Rgba8::WHITE,
            card: Rgba8::WHITE,
            name: GRAY_900,
            accent: purple,
            title: GRAY_600,
            contact: GRAY_500,
            heading: GRAY_800,
            rule: Rgba8::hex(0xf3e8ff),
            body: GRAY_700,
            chip: Rgba8::hex(0xf3e8ff),
            chip_text: purple,
            marker: purple,
        },
        header: HeaderLayout::PhotoRight,
        header_align: Align::Start,
        header_gap: 32.0,
        photo: PhotoStyle {
            size: 92.0,
            ring: 2.0,
            ring_color: Rgba8::hex(0xf3e8ff),
        },
        name_size: 36.0,
        accent_last_name: true,
        title_size: 24.0,
        contact: ContactLayout::Stacked,
        contact_size: 14.0,
        body: BodyLayout::SingleColumn(vec![
            SectionKind::Experience,
            SectionKind::Education,
            SectionKind::Skills,
        ]),
        section_gap: 32.0,
        heading: HeadingStyle::AccentBar {
            width: 40.0,
            height: 4.0,
        },
        heading_size: 20.0,
        titles: SectionTitles {
            skills: "Compétences Techniques",
            ..TITLES_PLAIN
        },
        body_size: 16.0,
        body_indent: 56.0,
        body_rule: None,
        skills: SkillStyle::DotGrid { columns: 2 },
    }
}

fn template5() -> LayoutDescriptor {
    let emerald = Rgba8::hex(0x059669);
    LayoutDescriptor {
        id: TemplateId::Template5,
        width: 672.0,
        padding: 32.0,
        inset: Some(32.0),
        radius: 4.0,
        font: FontKind::Sans,
        palette: Palette {
            page: GRAY_50,
            card: Rgba8::WHITE,
            name: GRAY_800,
            accent: GRAY_800,
            title: emerald,
            contact: GRAY_500,
            heading: emerald,
            rule: Rgba8::hex(0xd1fae5),
            body: GRAY_700,
            chip: Rgba8::hex(0xd1fae5),
            chip_text: emerald,
            marker: emerald,
        },
        header: HeaderLayout::PhotoLeft,
        header_align: Align::Center,
        header_gap: 32.0,
        photo: PhotoStyle {
            size: 104.0,
            ring: 4.0,
            ring_color: Rgba8::WHITE,
        },
        name_size: 30.0,
        accent_last_name: false,
        title_size: 20.0,
        contact: ContactLayout::Stacked,
        contact_size: 14.0,
        body: BodyLayout::SingleColumn(vec![
            SectionKind::Experience,
            SectionKind::Education,
            SectionKind::Skills,
        ]),
        section_gap: 24.0,
        heading: HeadingStyle::Underline {
            thickness: 1.0,
            padding: 8.0,
        },
        heading_size: 20.0,
        titles: SectionTitles {
            experience: "Expérience",
            ..TITLES_PLAIN
        },
        body_size: 16.0,
        body_indent: 16.0,
        body_rule: Some(2.0),
        skills: SkillStyle::DotGrid { columns: 2 },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/descriptor.rs"]
mod tests;
