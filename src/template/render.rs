use crate::{
    composition::model::{
        Align, Border, Composition, ContactKind, ImageSpec, Justify, Length, Node,
        NodeKind, Role, SectionKind, Span, TextSpec,
    },
    form::photo::ProfileImage,
    form::record::{ResumeRecord, is_blank, text_lines},
    foundation::core::{Edges, Rgba8},
    template::descriptor::{
        BodyLayout, ContactLayout, HeaderLayout, HeadingStyle, LayoutDescriptor, SkillStyle,
        TemplateId,
    },
};

/// Map form data onto the visual tree of `template`.
///
/// The mapping is total: every record, including the empty one, yields a composition. Sections
/// whose backing field is blank are left out entirely (no heading either).
pub fn render_composition(
    record: &ResumeRecord,
    photo: Option<&ProfileImage>,
    template: TemplateId,
) -> Composition {
    let d = template.descriptor();
    let renderer = Renderer {
        d: &d,
        record,
        photo,
    };
    let root = renderer.card();
    Composition {
        template,
        width: d.width,
        background: d.palette.page,
        root,
    }
}

/// Colors and sizes for one region of the card (main area or side panel).
#[derive(Clone, Copy)]
struct Ink {
    name: Rgba8,
    accent: Rgba8,
    title: Rgba8,
    contact: Rgba8,
    heading: Rgba8,
    heading_size: f32,
    rule: Rgba8,
    rule_thickness: Option<f64>,
    body: Rgba8,
    marker: Rgba8,
}

struct Renderer<'a> {
    d: &'a LayoutDescriptor,
    record: &'a ResumeRecord,
    photo: Option<&'a ProfileImage>,
}

impl Renderer<'_> {
    fn main_ink(&self) -> Ink {
        let p = &self.d.palette;
        Ink {
            name: p.name,
            accent: if self.d.accent_last_name {
                p.accent
            } else {
                p.name
            },
            title: p.title,
            contact: p.contact,
            heading: p.heading,
            heading_size: self.d.heading_size,
            rule: p.rule,
            rule_thickness: None,
            body: p.body,
            marker: p.marker,
        }
    }

    fn card(&self) -> Node {
        let d = self.d;
        let main = self.main_ink();

        let mut card = match &d.body {
            BodyLayout::SingleColumn(sections) => Node::column(
                d.header_gap,
                vec![self.header(main, true), self.sections(sections, main)],
            )
            .with_style(|s| s.padding = Edges::all(d.padding)),
            BodyLayout::TwoColumns { left, right } => {
                let columns = Node::new(NodeKind::Row {
                    gap: 32.0,
                    align: Align::Start,
                    justify: Justify::Start,
                    children: vec![
                        self.sections(left, main).with_style(|s| s.width = Length::Fill),
                        self.sections(right, main).with_style(|s| s.width = Length::Fill),
                    ],
                });
                Node::column(d.header_gap, vec![self.header(main, true), columns])
                    .with_style(|s| s.padding = Edges::all(d.padding))
            }
            BodyLayout::Sidebar {
                fraction,
                side,
                main: main_sections,
                palette,
            } => {
                let side_ink = Ink {
                    name: palette.text,
                    accent: palette.text,
                    title: palette.title,
                    contact: palette.text,
                    heading: palette.text,
                    heading_size: d.heading_size - 2.0,
                    rule: palette.rule,
                    rule_thickness: Some(1.0),
                    body: palette.text,
                    marker: palette.text,
                };
                let mut side_children = vec![self.header(side_ink, false)];
                side_children.extend(self.section_nodes(side, side_ink));
                let panel = Node::column(d.header_gap, side_children)
                    .with_role(Role::Sidebar)
                    .with_style(|s| {
                        s.width = Length::Fraction(*fraction);
                        s.padding = Edges::all(24.0);
                        s.background = Some(palette.background);
                    });
                let body = self
                    .sections(main_sections, main)
                    .with_style(|s| {
                        s.width = Length::Fill;
                        s.padding = Edges::all(d.padding);
                    });
                Node::new(NodeKind::Row {
                    gap: 0.0,
                    align: Align::Stretch,
                    justify: Justify::Start,
                    children: vec![panel, body],
                })
            }
        };
        card.style.background = Some(d.palette.card);
        card.style.radius = d.radius;

        match d.inset {
            Some(inset) => Node::column(0.0, vec![card]).with_style(|s| {
                s.padding = Edges::all(inset);
                s.background = Some(d.palette.page);
                s.radius = d.radius;
            }),
            None => card,
        }
    }

    fn header(&self, ink: Ink, with_contact: bool) -> Node {
        let d = self.d;
        let centered = d.header == HeaderLayout::Centered;

        let mut identity = vec![self.name(ink, centered), self.title(ink, centered)];
        if with_contact
            && let Some(contact) = self.contact_group(ink, centered)
        {
            identity.push(contact.with_style(|s| s.margin = Edges::top(8.0)));
        }
        let identity = Node::column(4.0, identity);

        match d.header {
            HeaderLayout::Centered => {
                let mut children = Vec::new();
                if let Some(photo) = self.photo_node() {
                    children.push(photo);
                }
                children.push(identity);
                Node::new(NodeKind::Column {
                    gap: 16.0,
                    align: Align::Center,
                    children,
                })
            }
            HeaderLayout::PhotoLeft => {
                let mut children = Vec::new();
                if let Some(photo) = self.photo_node() {
                    children.push(photo);
                }
                children.push(identity.with_style(|s| s.width = Length::Fill));
                Node::row(24.0, d.header_align, children)
            }
            HeaderLayout::PhotoRight => {
                let mut children = vec![identity.with_style(|s| s.width = Length::Fill)];
                if let Some(photo) = self.photo_node() {
                    children.push(photo);
                }
                Node::new(NodeKind::Row {
                    gap: 24.0,
                    align: d.header_align,
                    justify: Justify::SpaceBetween,
                    children,
                })
            }
        }
    }

    fn name(&self, ink: Ink, centered: bool) -> Node {
        let spec = TextSpec {
            spans: vec![
                Span {
                    text: format!("{} ", self.record.first_name),
                    color: ink.name,
                },
                Span {
                    text: self.record.last_name.clone(),
                    color: ink.accent,
                },
            ],
            font: self.d.font,
            bold: true,
            size: self.d.name_size,
            align: if centered { Align::Center } else { Align::Start },
        };
        Node::text(spec).with_role(Role::Name)
    }

    fn title(&self, ink: Ink, centered: bool) -> Node {
        let mut spec = TextSpec::plain(
            self.record.title.clone(),
            self.d.font,
            self.d.title_size,
            ink.title,
        );
        if centered {
            spec = spec.centered();
        }
        Node::text(spec).with_role(Role::Title)
    }

    fn photo_node(&self) -> Option<Node> {
        let photo = self.photo?;
        let p = self.d.photo;
        let outer = p.size + 2.0 * p.ring;
        Some(
            Node::new(NodeKind::Image(ImageSpec {
                source: photo.clone(),
                size: p.size,
            }))
            .with_role(Role::Photo)
            .with_style(|s| {
                s.width = Length::Px(outer);
                s.padding = Edges::all(p.ring);
                s.background = Some(p.ring_color);
                s.radius = outer / 2.0;
            }),
        )
    }

    fn contact_items(&self, ink: Ink, centered: bool) -> Vec<Node> {
        [
            (ContactKind::Email, &self.record.email),
            (ContactKind::Phone, &self.record.phone),
            (ContactKind::Address, &self.record.address),
        ]
        .into_iter()
        .filter(|(_, value)| !is_blank(value))
        .map(|(kind, value)| {
            let mut spec = TextSpec::plain(
                value.trim(),
                self.d.font,
                self.d.contact_size,
                ink.contact,
            );
            if centered && self.d.contact == ContactLayout::Stacked {
                spec = spec.centered();
            }
            Node::text(spec).with_role(Role::ContactItem(kind))
        })
        .collect()
    }

    /// Contact entries arranged per template, without a heading.
    fn contact_group(&self, ink: Ink, centered: bool) -> Option<Node> {
        let items = self.contact_items(ink, centered);
        if items.is_empty() {
            return None;
        }
        let group = match self.d.contact {
            ContactLayout::Inline => Node::new(NodeKind::Wrap {
                gap_x: 16.0,
                gap_y: 8.0,
                justify: if centered {
                    Justify::Center
                } else {
                    Justify::Start
                },
                children: items,
            }),
            ContactLayout::Stacked => Node::column(4.0, items),
        };
        Some(group.with_role(Role::Section(SectionKind::Contact)))
    }

    fn sections(&self, kinds: &[SectionKind], ink: Ink) -> Node {
        Node::column(self.d.section_gap, self.section_nodes(kinds, ink))
    }

    fn section_nodes(&self, kinds: &[SectionKind], ink: Ink) -> Vec<Node> {
        kinds
            .iter()
            .filter_map(|kind| self.section(*kind, ink))
            .collect()
    }

    fn section(&self, kind: SectionKind, ink: Ink) -> Option<Node> {
        let body = match kind {
            SectionKind::Contact => {
                let items = self.contact_items(ink, false);
                if items.is_empty() {
                    return None;
                }
                Node::column(8.0, items)
            }
            SectionKind::Experience => self.free_text(&self.record.experience, ink)?,
            SectionKind::Education => self.free_text(&self.record.education, ink)?,
            SectionKind::Skills => self.skills(ink)?,
        };
        let body = body.with_style(|s| {
            if kind != SectionKind::Contact {
                s.padding.left = self.d.body_indent;
            }
            if let Some(w) = self.d.body_rule
                && matches!(kind, SectionKind::Experience | SectionKind::Education)
            {
                s.border = Some(Border {
                    widths: Edges::left(w),
                    color: ink.rule,
                });
            }
        });

        Some(
            Node::column(12.0, vec![self.heading(kind, ink), body])
                .with_role(Role::Section(kind)),
        )
    }

    fn heading(&self, kind: SectionKind, ink: Ink) -> Node {
        let text = TextSpec::plain(
            self.d.titles.get(kind),
            self.d.font,
            ink.heading_size,
            ink.heading,
        )
        .bold();
        let node = match self.d.heading {
            HeadingStyle::Underline { thickness, padding } => {
                let thickness = ink.rule_thickness.unwrap_or(thickness);
                Node::text(text).with_style(|s| {
                    s.padding = Edges::bottom(padding);
                    s.border = Some(Border {
                        widths: Edges::bottom(thickness),
                        color: ink.rule,
                    });
                })
            }
            HeadingStyle::AccentBar { width, height } => Node::row(
                16.0,
                Align::Center,
                vec![
                    Node::shape(width, height, ink.marker, 0.0),
                    Node::text(text).with_style(|s| s.width = Length::Fill),
                ],
            ),
        };
        node.with_role(Role::SectionHeading(kind))
    }

    fn free_text(&self, raw: &str, ink: Ink) -> Option<Node> {
        if is_blank(raw) {
            return None;
        }
        let text = text_lines(raw).join("\n");
        Some(Node::text(TextSpec::plain(
            text,
            self.d.font,
            self.d.body_size,
            ink.body,
        )))
    }

    fn skills(&self, ink: Ink) -> Option<Node> {
        let tokens = self.record.skill_tokens();
        if tokens.is_empty() {
            return None;
        }
        let d = self.d;
        let node = match d.skills {
            SkillStyle::Chips => Node::new(NodeKind::Wrap {
                gap_x: 8.0,
                gap_y: 8.0,
                justify: Justify::Start,
                children: tokens
                    .into_iter()
                    .map(|t| {
                        Node::text(TextSpec::plain(t, d.font, 14.0, d.palette.chip_text))
                            .with_role(Role::SkillToken)
                            .with_style(|s| {
                                s.padding = Edges::xy(12.0, 4.0);
                                s.background = Some(d.palette.chip);
                                s.radius = 999.0;
                            })
                    })
                    .collect(),
            }),
            SkillStyle::Bullets => Node::column(
                4.0,
                tokens
                    .into_iter()
                    .map(|t| self.marked_item(t, 5.0, ink.body, ink))
                    .collect(),
            ),
            SkillStyle::DotList => Node::column(
                8.0,
                tokens
                    .into_iter()
                    .map(|t| self.marked_item(t, 8.0, ink.marker, ink))
                    .collect(),
            ),
            SkillStyle::DotGrid { columns } => Node::new(NodeKind::Grid {
                columns,
                gap_x: 8.0,
                gap_y: 8.0,
                children: tokens
                    .into_iter()
                    .map(|t| self.marked_item(t, 8.0, ink.marker, ink))
                    .collect(),
            }),
        };
        Some(node)
    }

    fn marked_item(&self, token: String, dot: f64, dot_color: Rgba8, ink: Ink) -> Node {
        Node::row(
            8.0,
            Align::Center,
            vec![
                Node::shape(dot, dot, dot_color, dot / 2.0),
                Node::text(TextSpec::plain(token, self.d.font, self.d.body_size, ink.body))
                    .with_style(|s| s.width = Length::Fill),
            ],
        )
        .with_role(Role::SkillToken)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/render.rs"]
mod tests;
