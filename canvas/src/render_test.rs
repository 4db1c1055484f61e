#![allow(clippy::float_cmp)]

use super::*;
use crate::stroke::{EditTarget, Tool};
use crate::style::CompositeOp;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn viewport() -> Viewport {
    Viewport { width: 800.0, height: 600.0, dpr: 2.0 }
}

fn session_with(tools: &[Tool]) -> DrawingSession {
    let mut s = DrawingSession::new();
    for (i, &tool) in tools.iter().enumerate() {
        let offset = f64::from(u32::try_from(i).unwrap()) * 10.0;
        s.set_tool(tool);
        s.begin_stroke(pt(offset, 0.0), 0.5);
        s.extend_stroke(pt(offset + 5.0, 5.0), 0.5);
        s.extend_stroke(pt(offset + 10.0, 0.0), 0.5);
        s.end_stroke();
    }
    s
}

fn stroke_layers(cmds: &[DrawCommand]) -> Vec<&StrokeLayer> {
    cmds.iter()
        .filter_map(|c| match c {
            DrawCommand::Stroke { layer, .. } => Some(layer),
            _ => None,
        })
        .collect()
}

// --- Scene structure ---

#[test]
fn empty_session_clears_and_transforms_only() {
    let cam = Camera { pan_x: 12.0, pan_y: -4.0, zoom: 1.5 };
    let cmds = build_scene(&DrawingSession::new(), &cam, viewport(), 0.5);
    assert_eq!(
        cmds,
        vec![
            DrawCommand::Clear { width: 800.0, height: 600.0, dpr: 2.0 },
            DrawCommand::Transform { pan_x: 12.0, pan_y: -4.0, zoom: 1.5 },
        ]
    );
}

#[test]
fn background_is_drawn_at_fixed_placement_before_strokes() {
    let mut s = DrawingSession::new();
    s.load_target(EditTarget { background: Some("data:image/png;base64,QQ==".into()), note_id: None }, "t");
    s.begin_stroke(pt(1.0, 1.0), 0.5);

    let cmds = build_scene(&s, &Camera::default(), viewport(), 0.5);
    assert_eq!(
        cmds[2],
        DrawCommand::Image { src: "data:image/png;base64,QQ==".into(), x: 0.0, y: 0.0, width: 600.0, height: 400.0 }
    );
    assert!(matches!(cmds[3], DrawCommand::Stroke { .. }));
}

#[test]
fn strokes_render_in_insertion_order_with_layer_counts() {
    let s = session_with(&[Tool::Pencil, Tool::Pen, Tool::Eraser]);
    let cmds = build_scene(&s, &Camera::default(), viewport(), 0.5);
    let composites: Vec<CompositeOp> = stroke_layers(&cmds).iter().map(|l| l.composite).collect();
    assert_eq!(
        composites,
        vec![
            CompositeOp::SourceOver,
            CompositeOp::Overlay,
            CompositeOp::Multiply,
            CompositeOp::SourceOver,
            CompositeOp::DestinationOut,
        ]
    );
}

#[test]
fn pencil_layers_share_the_same_points() {
    let s = session_with(&[Tool::Pencil]);
    let cmds = build_scene(&s, &Camera::default(), viewport(), 0.5);
    let ends: Vec<Point> = cmds
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Stroke { path, .. } => path.last().map(|seg| match *seg {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => p,
                PathSegment::QuadTo { to, .. } | PathSegment::CubicTo { to, .. } => to,
            }),
            _ => None,
        })
        .collect();
    assert_eq!(ends, vec![pt(10.0, 0.0); 3]);
}

#[test]
fn build_scene_is_idempotent() {
    let s = session_with(&[Tool::Pen, Tool::Pencil, Tool::Eraser, Tool::Pen]);
    let cam = Camera { pan_x: 3.0, pan_y: 4.0, zoom: 0.8 };
    let a = build_scene(&s, &cam, viewport(), 0.3);
    let b = build_scene(&s, &cam, viewport(), 0.3);
    assert_eq!(a, b);
}

#[test]
fn render_does_not_depend_on_camera_for_stroke_geometry() {
    let s = session_with(&[Tool::Pen]);
    let a = build_scene(&s, &Camera::default(), viewport(), 0.5);
    let b = build_scene(&s, &Camera { pan_x: 100.0, pan_y: 100.0, zoom: 3.0 }, viewport(), 0.5);
    assert_eq!(a[2..], b[2..]);
    assert_ne!(a[1], b[1]);
}

#[test]
fn pen_opacity_follows_last_pressure() {
    let s = session_with(&[Tool::Pen]);
    let low = build_scene(&s, &Camera::default(), viewport(), 0.0);
    let high = build_scene(&s, &Camera::default(), viewport(), 1.0);
    assert!((stroke_layers(&low)[0].opacity - 0.9).abs() < 1e-12);
    assert!((stroke_layers(&high)[0].opacity - 1.0).abs() < 1e-12);
}

// --- Paths ---

#[test]
fn path_of_no_points_is_empty() {
    assert!(stroke_path(&[], 0.0).is_empty());
}

#[test]
fn single_point_path_is_zero_length_segment() {
    let path = stroke_path(&[pt(4.0, 5.0)], 0.1);
    assert_eq!(path, vec![PathSegment::MoveTo(pt(4.0, 5.0)), PathSegment::LineTo(pt(4.0, 5.0))]);
}

#[test]
fn zero_tension_path_is_polyline() {
    let pts = [pt(0.0, 0.0), pt(1.0, 1.0), pt(2.0, 0.0)];
    let path = stroke_path(&pts, 0.0);
    assert_eq!(
        path,
        vec![
            PathSegment::MoveTo(pts[0]),
            PathSegment::LineTo(pts[1]),
            PathSegment::LineTo(pts[2]),
        ]
    );
}

#[test]
fn two_point_path_ignores_tension() {
    let pts = [pt(0.0, 0.0), pt(3.0, 4.0)];
    let path = stroke_path(&pts, 0.5);
    assert_eq!(path, vec![PathSegment::MoveTo(pts[0]), PathSegment::LineTo(pts[1])]);
}

#[test]
fn tension_path_uses_quadratic_ends_and_cubic_interior() {
    let pts = [pt(0.0, 0.0), pt(10.0, 0.0), pt(20.0, 0.0), pt(30.0, 0.0)];
    let path = stroke_path(&pts, 0.1);
    assert_eq!(path.len(), 4);
    assert!(matches!(path[0], PathSegment::MoveTo(p) if p == pts[0]));
    assert!(matches!(path[1], PathSegment::QuadTo { to, .. } if to == pts[1]));
    assert!(matches!(path[2], PathSegment::CubicTo { to, .. } if to == pts[2]));
    assert!(matches!(path[3], PathSegment::QuadTo { to, .. } if to == pts[3]));
}

#[test]
fn tension_controls_straddle_interior_point() {
    // Evenly spaced collinear points: controls sit tension * spacing on either side.
    let pts = [pt(0.0, 0.0), pt(10.0, 0.0), pt(20.0, 0.0)];
    let path = stroke_path(&pts, 0.1);
    let PathSegment::QuadTo { ctrl: incoming, .. } = path[1] else {
        panic!("expected quad");
    };
    let PathSegment::QuadTo { ctrl: outgoing, .. } = path[2] else {
        panic!("expected quad");
    };
    assert!((incoming.x - 9.0).abs() < 1e-12);
    assert!((outgoing.x - 11.0).abs() < 1e-12);
    assert_eq!(incoming.y, 0.0);
    assert_eq!(outgoing.y, 0.0);
}

#[test]
fn tension_with_repeated_points_stays_finite() {
    let pts = [pt(5.0, 5.0), pt(5.0, 5.0), pt(5.0, 5.0)];
    for seg in stroke_path(&pts, 0.1) {
        let p = match seg {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => p,
            PathSegment::QuadTo { ctrl, .. } => ctrl,
            PathSegment::CubicTo { ctrl1, .. } => ctrl1,
        };
        assert!(p.is_finite());
    }
}
