use crate::{
    form::photo::ProfileImage,
    foundation::core::{Edges, Rgba8},
    template::descriptor::{FontKind, TemplateId},
};

/// Visual tree produced by applying a template to the form data.
///
/// A composition is pure data: it holds no measured geometry. The layout solver
/// ([`crate::layout_composition`]) turns it into a [`crate::RenderPlan`].
#[derive(Clone, Debug)]
pub struct Composition {
    /// Template that produced this composition.
    pub template: TemplateId,
    /// Logical width in CSS-like pixels.
    pub width: f64,
    /// Color behind the root node.
    pub background: Rgba8,
    /// Root box.
    pub root: Node,
}

/// A box in the composition tree.
#[derive(Clone, Debug)]
pub struct Node {
    /// Semantic tag used for queries and diagnostics.
    pub role: Option<Role>,
    /// Box decoration and sizing.
    pub style: BoxStyle,
    /// Content.
    pub kind: NodeKind,
}

/// Semantic role of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Full name line.
    Name,
    /// Professional title line.
    Title,
    /// Profile photo.
    Photo,
    /// One contact entry.
    ContactItem(ContactKind),
    /// A whole section, heading included.
    Section(SectionKind),
    /// Heading of a section.
    SectionHeading(SectionKind),
    /// One parsed skill.
    SkillToken,
    /// Colored side panel of a sidebar layout.
    Sidebar,
}

/// Contact entry kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContactKind {
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Postal address.
    Address,
}

/// Conditionally rendered sections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Contact line or block.
    Contact,
    /// Professional experience.
    Experience,
    /// Education.
    Education,
    /// Skills.
    Skills,
}

/// Box decoration and sizing.
#[derive(Clone, Debug, Default)]
pub struct BoxStyle {
    /// Requested width.
    pub width: Length,
    /// Inner spacing between border and content.
    pub padding: Edges,
    /// Outer spacing.
    pub margin: Edges,
    /// Fill behind the padding box.
    pub background: Option<Rgba8>,
    /// Corner radius of the background.
    pub radius: f64,
    /// Border drawn on the edges of the padding box.
    pub border: Option<Border>,
}

/// Border widths and color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Border {
    /// Per-side widths.
    pub widths: Edges,
    /// Border color.
    pub color: Rgba8,
}

/// Width request of a box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Length {
    /// Fill the container in columns, shrink to content in rows and wraps.
    #[default]
    Auto,
    /// Share the space left over by siblings in a row.
    Fill,
    /// Fixed width in pixels (margin box excluded).
    Px(f64),
    /// Fraction of the container width.
    Fraction(f64),
}

/// Alignment on the cross axis or of text lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    /// Left or top.
    #[default]
    Start,
    /// Centered.
    Center,
    /// Rows only: every child grows to the row height.
    Stretch,
}

/// Distribution of free space on the main axis of a row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Justify {
    /// Pack at the start.
    #[default]
    Start,
    /// Pack in the middle.
    Center,
    /// Push first and last item to the edges.
    SpaceBetween,
}

/// Content of a node.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Children stacked vertically.
    Column {
        /// Vertical gap between children.
        gap: f64,
        /// Horizontal placement of fixed-width children.
        align: Align,
        /// Children.
        children: Vec<Node>,
    },
    /// Children laid out horizontally on a single line.
    Row {
        /// Horizontal gap between children.
        gap: f64,
        /// Vertical placement of children.
        align: Align,
        /// Distribution of free space.
        justify: Justify,
        /// Children.
        children: Vec<Node>,
    },
    /// Children flowing horizontally onto as many lines as needed.
    Wrap {
        /// Horizontal gap.
        gap_x: f64,
        /// Vertical gap between lines.
        gap_y: f64,
        /// Placement of each line.
        justify: Justify,
        /// Children.
        children: Vec<Node>,
    },
    /// Children in equal-width columns, row by row.
    Grid {
        /// Column count (at least 1).
        columns: u32,
        /// Horizontal gap.
        gap_x: f64,
        /// Vertical gap.
        gap_y: f64,
        /// Children.
        children: Vec<Node>,
    },
    /// A paragraph of text.
    Text(TextSpec),
    /// The profile photo.
    Image(ImageSpec),
    /// A solid decorative shape (dot, bar).
    Shape(ShapeSpec),
}

/// A colored piece of a paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct Span {
    /// Text content.
    pub text: String,
    /// Text color.
    pub color: Rgba8,
}

/// A paragraph: one font face, one size, possibly several colors.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSpec {
    /// Colored spans, concatenated in order.
    pub spans: Vec<Span>,
    /// Font family.
    pub font: FontKind,
    /// Bold face.
    pub bold: bool,
    /// Font size in pixels.
    pub size: f32,
    /// Placement of each line inside the box.
    pub align: Align,
}

impl TextSpec {
    /// Plain single-color paragraph.
    pub fn plain(text: impl Into<String>, font: FontKind, size: f32, color: Rgba8) -> Self {
        Self {
            spans: vec![Span {
                text: text.into(),
                color,
            }],
            font,
            bold: false,
            size,
            align: Align::Start,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    /// Concatenated text of all spans.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Circular profile photo of a fixed size.
#[derive(Clone, Debug)]
pub struct ImageSpec {
    /// Encoded photo.
    pub source: ProfileImage,
    /// Diameter in pixels.
    pub size: f64,
}

/// Solid decorative shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeSpec {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// Fill color.
    pub color: Rgba8,
    /// Corner radius.
    pub radius: f64,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            role: None,
            style: BoxStyle::default(),
            kind,
        }
    }

    pub fn column(gap: f64, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Column {
            gap,
            align: Align::Start,
            children,
        })
    }

    pub fn row(gap: f64, align: Align, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Row {
            gap,
            align,
            justify: Justify::Start,
            children,
        })
    }

    pub fn text(spec: TextSpec) -> Self {
        Self::new(NodeKind::Text(spec))
    }

    pub fn shape(width: f64, height: f64, color: Rgba8, radius: f64) -> Self {
        Self::new(NodeKind::Shape(ShapeSpec {
            width,
            height,
            color,
            radius,
        }))
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_style(mut self, f: impl FnOnce(&mut BoxStyle)) -> Self {
        f(&mut self.style);
        self
    }

    /// Child nodes of container kinds; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Column { children, .. }
            | NodeKind::Row { children, .. }
            | NodeKind::Wrap { children, .. }
            | NodeKind::Grid { children, .. } => children,
            NodeKind::Text(_) | NodeKind::Image(_) | NodeKind::Shape(_) => &[],
        }
    }

    /// Depth-first pre-order visit of this node and its descendants.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a Node)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    /// Concatenated text of every text leaf under this node, in tree order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |n| {
            if let NodeKind::Text(t) = &n.kind {
                out.push_str(&t.text());
            }
        });
        out
    }
}

impl Composition {
    /// First node carrying `role`, in tree order.
    pub fn find(&self, role: Role) -> Option<&Node> {
        self.find_all(role).into_iter().next()
    }

    /// Every node carrying `role`, in tree order.
    pub fn find_all(&self, role: Role) -> Vec<&Node> {
        let mut out = Vec::new();
        self.root.walk(&mut |n| {
            if n.role == Some(role) {
                out.push(n);
            }
        });
        out
    }

    /// `true` when the section (heading included) is present.
    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.find(Role::Section(kind)).is_some()
    }

    /// Rendered skill tokens, in order.
    pub fn skill_tokens(&self) -> Vec<String> {
        self.find_all(Role::SkillToken)
            .into_iter()
            .map(Node::text_content)
            .collect()
    }

    /// `true` when a profile photo is drawn.
    pub fn has_photo(&self) -> bool {
        self.find(Role::Photo).is_some()
    }
}
