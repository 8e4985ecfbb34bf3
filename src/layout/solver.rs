use crate::{
    assets::text::TextShaper,
    composition::model::{
        Align, BoxStyle, Composition, Justify, Length, Node, NodeKind, TextSpec,
    },
    foundation::core::{Rect, Vec2},
    foundation::error::{CvError, CvResult},
    render::plan::{DrawOp, RenderPlan},
};

/// Resolve `comp` into absolutely positioned drawing operations.
///
/// The root box spans the composition width; the plan height is the height of the laid-out root.
#[tracing::instrument(skip(comp, shaper), fields(template = %comp.template))]
pub fn layout_composition(
    comp: &Composition,
    shaper: &mut dyn TextShaper,
) -> CvResult<RenderPlan> {
    if !comp.width.is_finite() || comp.width <= 0.0 {
        return Err(CvError::render("composition width must be finite and > 0"));
    }
    let mut solver = Solver { shaper };
    let laid = solver.layout(&comp.root, comp.width, None)?;
    tracing::debug!(height = laid.height, ops = laid.ops.len(), "layout resolved");
    Ok(RenderPlan {
        width: comp.width,
        height: laid.height,
        background: comp.background,
        ops: laid.ops,
    })
}

/// A laid-out box: margin-box height plus ops relative to the margin box's top-left corner.
struct Laid {
    height: f64,
    ops: Vec<DrawOp>,
}

impl Laid {
    fn place(self, x: f64, y: f64, out: &mut Vec<DrawOp>) {
        let by = Vec2::new(x, y);
        out.extend(self.ops.into_iter().map(|op| op.translate(by)));
    }
}

struct Solver<'s> {
    shaper: &'s mut dyn TextShaper,
}

impl Solver<'_> {
    /// Lay out `node` in a margin box of `width`, at least `min_height` tall when given.
    fn layout(&mut self, node: &Node, width: f64, min_height: Option<f64>) -> CvResult<Laid> {
        let s = &node.style;
        let (bl, br, bt, bb) = border_widths(s);
        let box_w = (width - s.margin.horizontal()).max(0.0);
        let content_w = (box_w - s.padding.horizontal() - bl - br).max(0.0);

        let content = self.layout_content(node, content_w)?;

        let mut box_h = content.height + s.padding.vertical() + bt + bb;
        if let Some(min) = min_height {
            box_h = box_h.max(min - s.margin.vertical());
        }

        let frame = Rect::new(
            s.margin.left,
            s.margin.top,
            s.margin.left + box_w,
            s.margin.top + box_h,
        );
        let mut ops = Vec::new();
        if let Some(color) = s.background {
            ops.push(DrawOp::FillRect {
                rect: frame,
                radius: s.radius,
                color,
            });
        }
        if let Some(border) = s.border {
            let sides = [
                Rect::new(frame.x0, frame.y0, frame.x1, frame.y0 + bt),
                Rect::new(frame.x0, frame.y1 - bb, frame.x1, frame.y1),
                Rect::new(frame.x0, frame.y0, frame.x0 + bl, frame.y1),
                Rect::new(frame.x1 - br, frame.y0, frame.x1, frame.y1),
            ];
            for rect in sides.into_iter().filter(|r| r.area() > 0.0) {
                ops.push(DrawOp::FillRect {
                    rect,
                    radius: 0.0,
                    color: border.color,
                });
            }
        }
        content.place(
            frame.x0 + bl + s.padding.left,
            frame.y0 + bt + s.padding.top,
            &mut ops,
        );

        Ok(Laid {
            height: box_h + s.margin.vertical(),
            ops,
        })
    }

    fn layout_content(&mut self, node: &Node, width: f64) -> CvResult<Laid> {
        match &node.kind {
            NodeKind::Column {
                gap,
                align,
                children,
            } => self.column(children, *gap, *align, width),
            NodeKind::Row {
                gap,
                align,
                justify,
                children,
            } => self.row(children, *gap, *align, *justify, width),
            NodeKind::Wrap {
                gap_x,
                gap_y,
                justify,
                children,
            } => self.wrap(children, *gap_x, *gap_y, *justify, width),
            NodeKind::Grid {
                columns,
                gap_x,
                gap_y,
                children,
            } => self.grid(children, *columns, *gap_x, *gap_y, width),
            NodeKind::Text(spec) => self.text(spec, width),
            NodeKind::Image(image) => Ok(Laid {
                height: image.size,
                ops: vec![DrawOp::Image {
                    rect: Rect::new(0.0, 0.0, image.size, image.size),
                    source: image.source.clone(),
                }],
            }),
            NodeKind::Shape(shape) => Ok(Laid {
                height: shape.height,
                ops: vec![DrawOp::FillRect {
                    rect: Rect::new(0.0, 0.0, shape.width, shape.height),
                    radius: shape.radius,
                    color: shape.color,
                }],
            }),
        }
    }

    fn text(&mut self, spec: &TextSpec, width: f64) -> CvResult<Laid> {
        let shaped = self.shaper.shape(spec, Some(width))?;
        Ok(Laid {
            height: shaped.height,
            ops: shaped
                .runs
                .into_iter()
                .map(|run| DrawOp::Glyphs {
                    run,
                    origin: Default::default(),
                })
                .collect(),
        })
    }

    fn column(&mut self, children: &[Node], gap: f64, align: Align, width: f64) -> CvResult<Laid> {
        let mut ops = Vec::new();
        let mut y = 0.0;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                y += gap;
            }
            let w = match child.style.width {
                Length::Auto | Length::Fill => width,
                Length::Px(px) => (px + child.style.margin.horizontal()).min(width),
                Length::Fraction(f) => width * f,
            };
            let x = match align {
                Align::Center => ((width - w) / 2.0).max(0.0),
                Align::Start | Align::Stretch => 0.0,
            };
            let laid = self.layout(child, w, None)?;
            let h = laid.height;
            laid.place(x, y, &mut ops);
            y += h;
        }
        Ok(Laid { height: y, ops })
    }

    fn row(
        &mut self,
        children: &[Node],
        gap: f64,
        align: Align,
        justify: Justify,
        width: f64,
    ) -> CvResult<Laid> {
        if children.is_empty() {
            return Ok(Laid {
                height: 0.0,
                ops: Vec::new(),
            });
        }
        let gaps = gap * (children.len() - 1) as f64;

        let mut widths = vec![0.0; children.len()];
        let mut fills = Vec::new();
        for (i, child) in children.iter().enumerate() {
            widths[i] = match child.style.width {
                Length::Px(px) => px + child.style.margin.horizontal(),
                Length::Fraction(f) => width * f,
                Length::Auto => self.intrinsic_width(child)?.min(width),
                Length::Fill => {
                    fills.push(i);
                    0.0
                }
            };
        }
        let fixed: f64 = widths.iter().sum();
        let free = (width - gaps - fixed).max(0.0);
        if !fills.is_empty() {
            let share = free / fills.len() as f64;
            for i in &fills {
                widths[*i] = share;
            }
        }

        let mut laid = Vec::with_capacity(children.len());
        for (child, w) in children.iter().zip(&widths) {
            laid.push(self.layout(child, *w, None)?);
        }
        let height = laid.iter().map(|l| l.height).fold(0.0, f64::max);
        if align == Align::Stretch {
            for (i, child) in children.iter().enumerate() {
                if laid[i].height < height {
                    laid[i] = self.layout(child, widths[i], Some(height))?;
                }
            }
        }

        let used: f64 = widths.iter().sum::<f64>() + gaps;
        let spare = (width - used).max(0.0);
        let (mut x, step) = match justify {
            Justify::Start => (0.0, gap),
            Justify::Center => (spare / 2.0, gap),
            Justify::SpaceBetween if children.len() > 1 => {
                (0.0, gap + spare / (children.len() - 1) as f64)
            }
            Justify::SpaceBetween => (0.0, gap),
        };

        let mut ops = Vec::new();
        for (l, w) in laid.into_iter().zip(&widths) {
            let y = match align {
                Align::Center => (height - l.height) / 2.0,
                Align::Start | Align::Stretch => 0.0,
            };
            l.place(x, y, &mut ops);
            x += w + step;
        }
        Ok(Laid { height, ops })
    }

    fn wrap(
        &mut self,
        children: &[Node],
        gap_x: f64,
        gap_y: f64,
        justify: Justify,
        width: f64,
    ) -> CvResult<Laid> {
        let mut lines: Vec<Vec<(usize, f64)>> = Vec::new();
        let mut current: Vec<(usize, f64)> = Vec::new();
        let mut line_w = 0.0;
        for (i, child) in children.iter().enumerate() {
            let w = match child.style.width {
                Length::Px(px) => px + child.style.margin.horizontal(),
                Length::Fraction(f) => width * f,
                Length::Auto | Length::Fill => self.intrinsic_width(child)?,
            }
            .min(width);
            if !current.is_empty() && line_w + gap_x + w > width {
                lines.push(std::mem::take(&mut current));
                line_w = 0.0;
            }
            line_w += if current.is_empty() { w } else { gap_x + w };
            current.push((i, w));
        }
        if !current.is_empty() {
            lines.push(current);
        }

        let mut ops = Vec::new();
        let mut y = 0.0;
        for (n, line) in lines.iter().enumerate() {
            if n > 0 {
                y += gap_y;
            }
            let used: f64 =
                line.iter().map(|(_, w)| w).sum::<f64>() + gap_x * (line.len() - 1) as f64;
            let mut x = match justify {
                Justify::Center => ((width - used) / 2.0).max(0.0),
                Justify::Start | Justify::SpaceBetween => 0.0,
            };
            let mut line_h: f64 = 0.0;
            for (i, w) in line {
                let laid = self.layout(&children[*i], *w, None)?;
                line_h = line_h.max(laid.height);
                laid.place(x, y, &mut ops);
                x += w + gap_x;
            }
            y += line_h;
        }
        Ok(Laid { height: y, ops })
    }

    fn grid(
        &mut self,
        children: &[Node],
        columns: u32,
        gap_x: f64,
        gap_y: f64,
        width: f64,
    ) -> CvResult<Laid> {
        let columns = columns.max(1) as usize;
        let cell_w = ((width - gap_x * (columns - 1) as f64) / columns as f64).max(0.0);

        let mut ops = Vec::new();
        let mut y = 0.0;
        for (r, row) in children.chunks(columns).enumerate() {
            if r > 0 {
                y += gap_y;
            }
            let mut row_h: f64 = 0.0;
            for (c, child) in row.iter().enumerate() {
                let laid = self.layout(child, cell_w, None)?;
                row_h = row_h.max(laid.height);
                laid.place(c as f64 * (cell_w + gap_x), y, &mut ops);
            }
            y += row_h;
        }
        Ok(Laid { height: y, ops })
    }

    /// Shrink-to-fit width of `node`'s margin box.
    fn intrinsic_width(&mut self, node: &Node) -> CvResult<f64> {
        let s = &node.style;
        if let Length::Px(px) = s.width {
            return Ok(px + s.margin.horizontal());
        }
        let (bl, br, _, _) = border_widths(s);
        let content = match &node.kind {
            NodeKind::Column { children, .. } => {
                let mut w: f64 = 0.0;
                for child in children {
                    w = w.max(self.intrinsic_width(child)?);
                }
                w
            }
            NodeKind::Row { gap, children, .. } => {
                self.sum_widths(children)? + gap * children.len().saturating_sub(1) as f64
            }
            NodeKind::Wrap {
                gap_x, children, ..
            } => self.sum_widths(children)? + gap_x * children.len().saturating_sub(1) as f64,
            NodeKind::Grid {
                columns,
                gap_x,
                children,
                ..
            } => {
                let mut cell: f64 = 0.0;
                for child in children {
                    cell = cell.max(self.intrinsic_width(child)?);
                }
                let cols = (*columns).max(1) as usize;
                cell * cols as f64 + gap_x * (cols - 1) as f64
            }
            // Rounded up so re-shaping at exactly this width never breaks the line.
            NodeKind::Text(spec) => self.shaper.shape(spec, None)?.width.ceil(),
            NodeKind::Image(image) => image.size,
            NodeKind::Shape(shape) => shape.width,
        };
        Ok(content + s.padding.horizontal() + bl + br + s.margin.horizontal())
    }

    fn sum_widths(&mut self, children: &[Node]) -> CvResult<f64> {
        let mut total = 0.0;
        for child in children {
            total += self.intrinsic_width(child)?;
        }
        Ok(total)
    }
}

/// Border widths as (left, right, top, bottom); zero without a border.
fn border_widths(s: &BoxStyle) -> (f64, f64, f64, f64) {
    match s.border {
        Some(b) => (b.widths.left, b.widths.right, b.widths.top, b.widths.bottom),
        None => (0.0, 0.0, 0.0, 0.0),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
