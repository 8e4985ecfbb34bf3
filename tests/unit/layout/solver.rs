use super::*;
use crate::{
    assets::text::FixedAdvanceShaper,
    composition::model::Border,
    form::record::ResumeRecord,
    foundation::core::{Edges, Rgba8},
    template::{
        descriptor::{FontKind, TemplateId},
        render::render_composition,
    },
};

const RED: Rgba8 = Rgba8::hex(0xff0000);
const GREEN: Rgba8 = Rgba8::hex(0x00ff00);
const BLUE: Rgba8 = Rgba8::hex(0x0000ff);

fn comp(width: f64, root: Node) -> Composition {
    Composition {
        template: TemplateId::Template1,
        width,
        background: Rgba8::WHITE,
        root,
    }
}

fn solve(width: f64, root: Node) -> RenderPlan {
    layout_composition(&comp(width, root), &mut FixedAdvanceShaper::default()).unwrap()
}

fn only(plan: &RenderPlan, color: Rgba8) -> Rect {
    let rects = plan.rects_of(color);
    assert_eq!(rects.len(), 1, "{rects:?}");
    rects[0]
}

#[test]
fn column_stacks_children_inside_padding() {
    let root = Node::column(
        10.0,
        vec![
            Node::shape(20.0, 10.0, RED, 0.0),
            Node::shape(30.0, 5.0, GREEN, 0.0),
        ],
    )
    .with_style(|s| {
        s.padding = Edges::all(5.0);
        s.background = Some(BLUE);
    });
    let plan = solve(100.0, root);
    assert_eq!(plan.height, 35.0);
    assert_eq!(plan.width, 100.0);
    assert_eq!(only(&plan, BLUE), Rect::new(0.0, 0.0, 100.0, 35.0));
    assert_eq!(only(&plan, RED), Rect::new(5.0, 5.0, 25.0, 15.0));
    assert_eq!(only(&plan, GREEN), Rect::new(5.0, 25.0, 35.0, 30.0));
}

#[test]
fn row_shares_free_space_between_fill_children() {
    let fill = |color| {
        Node::column(0.0, vec![Node::shape(5.0, 5.0, color, 0.0)])
            .with_style(|s| s.width = Length::Fill)
    };
    let root = Node::row(
        10.0,
        Align::Start,
        vec![Node::shape(20.0, 10.0, RED, 0.0), fill(GREEN), fill(BLUE)],
    );
    let plan = solve(100.0, root);
    assert_eq!(only(&plan, RED).x0, 0.0);
    assert_eq!(only(&plan, GREEN).x0, 30.0);
    assert_eq!(only(&plan, BLUE).x0, 70.0);
    assert_eq!(plan.height, 10.0);
}

#[test]
fn stretched_row_children_share_the_tallest_height() {
    let panel = |color, h| {
        Node::column(0.0, vec![Node::shape(10.0, h, GREEN, 0.0)]).with_style(|s| {
            s.width = Length::Fill;
            s.background = Some(color);
        })
    };
    let root = Node::row(0.0, Align::Stretch, vec![panel(RED, 40.0), panel(BLUE, 10.0)]);
    let plan = solve(100.0, root);
    assert_eq!(only(&plan, RED), Rect::new(0.0, 0.0, 50.0, 40.0));
    assert_eq!(only(&plan, BLUE), Rect::new(50.0, 0.0, 100.0, 40.0));
}

#[test]
fn centered_row_aligns_children_vertically() {
    let root = Node::row(
        0.0,
        Align::Center,
        vec![
            Node::shape(10.0, 40.0, RED, 0.0),
            Node::shape(10.0, 10.0, BLUE, 0.0),
        ],
    );
    let plan = solve(100.0, root);
    assert_eq!(only(&plan, BLUE), Rect::new(10.0, 15.0, 20.0, 25.0));
}

#[test]
fn space_between_pushes_last_child_to_the_edge() {
    let root = Node::new(NodeKind::Row {
        gap: 0.0,
        align: Align::Start,
        justify: Justify::SpaceBetween,
        children: vec![
            Node::shape(10.0, 10.0, RED, 0.0),
            Node::shape(10.0, 10.0, BLUE, 0.0),
        ],
    });
    let plan = solve(100.0, root);
    assert_eq!(only(&plan, BLUE).x1, 100.0);
}

#[test]
fn wrap_breaks_chips_onto_new_lines() {
    let chip = |text: &str| {
        Node::text(TextSpec::plain(text, FontKind::Sans, 10.0, RED)).with_style(|s| {
            s.padding = Edges::xy(5.0, 0.0);
            s.background = Some(GREEN);
        })
    };
    let root = Node::new(NodeKind::Wrap {
        gap_x: 5.0,
        gap_y: 4.0,
        justify: Justify::Start,
        children: vec![chip("abcd"), chip("efgh")],
    });
    let plan = solve(50.0, root);
    assert_eq!(
        plan.rects_of(GREEN),
        vec![
            Rect::new(0.0, 0.0, 30.0, 12.5),
            Rect::new(0.0, 16.5, 30.0, 29.0)
        ]
    );
    assert_eq!(plan.height, 29.0);
}

#[test]
fn grid_uses_equal_columns() {
    let root = Node::new(NodeKind::Grid {
        columns: 2,
        gap_x: 10.0,
        gap_y: 6.0,
        children: vec![
            Node::shape(5.0, 8.0, RED, 0.0),
            Node::shape(5.0, 8.0, GREEN, 0.0),
            Node::shape(5.0, 8.0, BLUE, 0.0),
        ],
    });
    let plan = solve(110.0, root);
    assert_eq!(only(&plan, GREEN).x0, 60.0);
    assert_eq!(only(&plan, BLUE).origin(), (0.0, 14.0).into());
    assert_eq!(plan.height, 22.0);
}

#[test]
fn centered_column_centers_fixed_width_children() {
    let root = Node::new(NodeKind::Column {
        gap: 0.0,
        align: Align::Center,
        children: vec![Node::shape(20.0, 20.0, RED, 10.0).with_style(|s| s.width = Length::Px(20.0))],
    });
    let plan = solve(100.0, root);
    assert_eq!(only(&plan, RED).x0, 40.0);
}

#[test]
fn borders_offset_content() {
    let root = Node::column(0.0, vec![Node::shape(10.0, 10.0, RED, 0.0)]).with_style(|s| {
        s.border = Some(Border {
            widths: Edges::left(3.0),
            color: BLUE,
        });
        s.padding = Edges::left(2.0);
    });
    let plan = solve(100.0, root);
    assert_eq!(only(&plan, BLUE), Rect::new(0.0, 0.0, 3.0, 10.0));
    assert_eq!(only(&plan, RED).x0, 5.0);
}

#[test]
fn templates_lay_out_to_their_width() {
    let record = ResumeRecord {
        first_name: "Jean".into(),
        last_name: "Dupont".into(),
        experience: "Line one\nLine two".into(),
        skills: "Rust\nGo".into(),
        ..ResumeRecord::default()
    };
    for t in TemplateId::ALL {
        let full = render_composition(&record, None, t);
        let plan = layout_composition(&full, &mut FixedAdvanceShaper::default()).unwrap();
        assert_eq!(plan.width, t.descriptor().width);
        assert!(plan.height > 0.0);

        let bare = render_composition(
            &ResumeRecord {
                experience: String::new(),
                skills: String::new(),
                ..record.clone()
            },
            None,
            t,
        );
        let shorter = layout_composition(&bare, &mut FixedAdvanceShaper::default()).unwrap();
        assert!(shorter.height <= plan.height, "{t}");
    }
}

#[test]
fn zero_width_is_rejected() {
    let err = layout_composition(
        &comp(0.0, Node::column(0.0, Vec::new())),
        &mut FixedAdvanceShaper::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CvError::Render(_)));
}
