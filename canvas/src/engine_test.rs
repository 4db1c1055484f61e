#![allow(clippy::float_cmp)]

use super::*;
use crate::style::CompositeOp;

// =============================================================
// Helpers
// =============================================================

fn sample(x: f64, y: f64, pressure: Option<f64>) -> PointerSample {
    PointerSample::new(x, y, pressure)
}

fn draw_line(core: &mut EngineCore, from: (f64, f64), to: (f64, f64), steps: u32) {
    core.on_pointer_down(sample(from.0, from.1, Some(0.5)), Button::Primary);
    for i in 1..=steps {
        let t = f64::from(i) / f64::from(steps);
        let x = from.0 + (to.0 - from.0) * t;
        let y = from.1 + (to.1 - from.1) * t;
        core.on_pointer_move(sample(x, y, Some(0.5)));
    }
    core.on_pointer_up();
}

struct StubSnapshot;

impl NoteSnapshot for StubSnapshot {
    fn to_data_url(&self) -> Result<String, PersistError> {
        Ok("data:image/png;base64,c3R1Yg==".into())
    }
}

// =============================================================
// Stroke capture
// =============================================================

#[test]
fn pointer_down_starts_stroke() {
    let mut core = EngineCore::new();
    let actions = core.on_pointer_down(sample(10.0, 20.0, Some(0.8)), Button::Primary);
    assert_eq!(actions, vec![Action::StrokeStarted, Action::RenderNeeded]);
    assert_eq!(core.input, InputState::Drawing);
    let stroke = core.session.active_stroke().unwrap();
    assert_eq!(stroke.points, vec![Point::new(10.0, 20.0)]);
    assert_eq!(stroke.pressures, vec![0.8]);
}

#[test]
fn missing_pressure_defaults_to_half() {
    let mut core = EngineCore::new();
    core.on_pointer_down(sample(0.0, 0.0, None), Button::Primary);
    assert_eq!(core.session.strokes()[0].pressures, vec![0.5]);
    assert_eq!(core.session.strokes()[0].stroke_width, 2.25);
}

#[test]
fn move_without_pressure_reuses_last_sample() {
    let mut core = EngineCore::new();
    core.on_pointer_down(sample(0.0, 0.0, Some(0.9)), Button::Primary);
    core.on_pointer_move(sample(1.0, 1.0, Some(0.0)));
    assert_eq!(core.session.strokes()[0].pressures, vec![0.9, 0.9]);
}

#[test]
fn pointer_moves_keep_points_and_pressures_equal_length() {
    let mut core = EngineCore::new();
    core.on_pointer_down(sample(0.0, 0.0, Some(0.1)), Button::Primary);
    for i in 0..100 {
        let pressure = if i % 3 == 0 { None } else { Some(f64::from(i) / 100.0) };
        core.on_pointer_move(sample(f64::from(i), 0.0, pressure));
        let stroke = core.session.active_stroke().unwrap();
        assert_eq!(stroke.points.len(), stroke.pressures.len());
    }
}

#[test]
fn move_while_idle_is_ignored() {
    let mut core = EngineCore::new();
    assert!(core.on_pointer_move(sample(5.0, 5.0, None)).is_empty());
    assert!(core.session.strokes().is_empty());
}

#[test]
fn pointer_up_finalizes_stroke() {
    let mut core = EngineCore::new();
    core.on_pointer_down(sample(0.0, 0.0, None), Button::Primary);
    assert_eq!(core.on_pointer_up(), vec![Action::StrokeFinished]);
    assert!(core.input.is_idle());
    assert!(core.on_pointer_move(sample(1.0, 1.0, None)).is_empty());
    assert_eq!(core.session.strokes()[0].points.len(), 1);
    assert!(core.on_pointer_up().is_empty());
}

#[test]
fn events_without_position_are_ignored() {
    let mut core = EngineCore::new();
    let no_pos = PointerSample { screen: None, pressure: Some(0.5) };
    assert!(core.on_pointer_down(no_pos, Button::Primary).is_empty());
    assert!(core.input.is_idle());

    core.on_pointer_down(sample(0.0, 0.0, None), Button::Primary);
    assert!(core.on_pointer_move(no_pos).is_empty());
    assert!(core.on_pointer_move(sample(f64::NAN, 0.0, None)).is_empty());
    assert_eq!(core.session.strokes()[0].points.len(), 1);
}

#[test]
fn strokes_are_recorded_in_content_space() {
    let mut core = EngineCore::new();
    core.camera = Camera { pan_x: 100.0, pan_y: 50.0, zoom: 2.0 };
    core.on_pointer_down(sample(140.0, 90.0, None), Button::Primary);
    assert_eq!(core.session.strokes()[0].points[0], Point::new(20.0, 20.0));
}

#[test]
fn eraser_tool_records_white() {
    let mut core = EngineCore::new();
    core.set_color("#ff00ff");
    core.set_tool(Tool::Eraser);
    draw_line(&mut core, (0.0, 0.0), (10.0, 0.0), 3);
    assert_eq!(core.session.strokes()[0].color, "#ffffff");
}

// =============================================================
// Viewport
// =============================================================

#[test]
fn wheel_zooms_around_pointer() {
    let mut core = EngineCore::new();
    let pointer = Point::new(300.0, 200.0);
    let before = core.camera.screen_to_world(pointer);

    let actions = core.on_wheel(pointer, WheelDelta { dx: 0.0, dy: -100.0 });
    assert!((core.camera.zoom - 1.05).abs() < 1e-12);
    assert_eq!(actions, vec![Action::CameraChanged(core.camera), Action::RenderNeeded]);

    let after = core.camera.screen_to_world(pointer);
    assert!((before.x - after.x).abs() < 1e-9);
    assert!((before.y - after.y).abs() < 1e-9);
}

#[test]
fn wheel_down_zooms_out() {
    let mut core = EngineCore::new();
    core.on_wheel(Point::new(0.0, 0.0), WheelDelta { dx: 0.0, dy: 53.0 });
    assert!(core.camera.zoom < 1.0);
}

#[test]
fn wheel_with_non_finite_input_is_ignored() {
    let mut core = EngineCore::new();
    assert!(core.on_wheel(Point::new(f64::NAN, 0.0), WheelDelta { dx: 0.0, dy: 1.0 }).is_empty());
    assert!(core.on_wheel(Point::new(0.0, 0.0), WheelDelta { dx: 0.0, dy: f64::NAN }).is_empty());
    assert_eq!(core.camera, Camera::default());
}

#[test]
fn middle_drag_pans_without_drawing() {
    let mut core = EngineCore::new();
    assert!(core.on_pointer_down(sample(10.0, 10.0, None), Button::Middle).is_empty());
    core.on_pointer_move(sample(25.0, 5.0, None));
    core.on_pointer_move(sample(30.0, 0.0, None));
    core.on_pointer_up();
    assert_eq!(core.camera.offset(), Point::new(20.0, -10.0));
    assert!(core.session.strokes().is_empty());
    assert!(core.input.is_idle());
}

#[test]
fn drag_end_sets_offset() {
    let mut core = EngineCore::new();
    core.camera.zoom = 2.0;
    core.on_drag_end(Point::new(-40.0, 12.0));
    assert_eq!(core.camera, Camera { pan_x: -40.0, pan_y: 12.0, zoom: 2.0 });
}

#[test]
fn viewport_changes_leave_strokes_alone() {
    let mut core = EngineCore::new();
    draw_line(&mut core, (0.0, 0.0), (5.0, 5.0), 4);
    let strokes = core.session.strokes().to_vec();
    core.on_wheel(Point::new(1.0, 1.0), WheelDelta { dx: 0.0, dy: -1.0 });
    core.on_drag_end(Point::new(9.0, 9.0));
    assert_eq!(core.session.strokes(), strokes.as_slice());
}

// =============================================================
// Scene
// =============================================================

#[test]
fn scene_reflects_viewport_and_camera() {
    let mut core = EngineCore::new();
    core.set_viewport(640.0, 480.0, 2.0);
    core.on_drag_end(Point::new(5.0, 6.0));
    let scene = core.scene();
    assert_eq!(scene[0], DrawCommand::Clear { width: 640.0, height: 480.0, dpr: 2.0 });
    assert_eq!(scene[1], DrawCommand::Transform { pan_x: 5.0, pan_y: 6.0, zoom: 1.0 });
}

#[test]
fn scene_contains_every_stroke_layer() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Pencil);
    draw_line(&mut core, (0.0, 0.0), (10.0, 10.0), 5);
    core.set_tool(Tool::Eraser);
    draw_line(&mut core, (10.0, 0.0), (0.0, 10.0), 5);

    let composites: Vec<CompositeOp> = core
        .scene()
        .into_iter()
        .filter_map(|c| match c {
            DrawCommand::Stroke { layer, .. } => Some(layer.composite),
            _ => None,
        })
        .collect();
    assert_eq!(composites.len(), 4);
    assert_eq!(composites[3], CompositeOp::DestinationOut);
}

#[test]
fn clear_empties_scene_strokes() {
    let mut core = EngineCore::new();
    draw_line(&mut core, (0.0, 0.0), (1.0, 1.0), 2);
    assert_eq!(core.clear(), vec![Action::RenderNeeded]);
    assert_eq!(core.scene().len(), 2);
}

#[test]
fn load_note_resets_session_and_draws_background() {
    let mut core = EngineCore::new();
    draw_line(&mut core, (0.0, 0.0), (1.0, 1.0), 2);
    core.load_note(
        EditTarget { background: Some("data:bg".into()), note_id: Some("42".into()) },
        "loaded",
    );
    assert!(core.session.strokes().is_empty());
    assert_eq!(core.session.title(), "loaded");
    assert!(matches!(&core.scene()[2], DrawCommand::Image { src, .. } if src == "data:bg"));
}

#[test]
fn load_note_mid_stroke_cancels_gesture() {
    let mut core = EngineCore::new();
    core.on_pointer_down(sample(0.0, 0.0, None), Button::Primary);
    core.load_note(EditTarget::default(), "");
    assert!(core.input.is_idle());
    assert!(core.on_pointer_move(sample(3.0, 3.0, None)).is_empty());
    assert!(core.session.strokes().is_empty());
}

// =============================================================
// Save
// =============================================================

#[test]
fn prepare_save_uses_session_title_and_target() {
    let mut core = EngineCore::new();
    core.load_note(EditTarget { background: None, note_id: Some("n7".into()) }, "draft");
    core.set_title("final");
    let req = core.prepare_save(&StubSnapshot).unwrap();
    assert_eq!(req.id.as_deref(), Some("n7"));
    assert_eq!(req.title, "final");
    assert_eq!(req.image, "data:image/png;base64,c3R1Yg==");
}

#[test]
fn pan_button_during_stroke_finalizes_it() {
    let mut core = EngineCore::new();
    core.on_pointer_down(sample(0.0, 0.0, Some(0.5)), Button::Primary);
    core.on_pointer_move(sample(5.0, 5.0, Some(0.5)));

    let actions = core.on_pointer_down(sample(5.0, 5.0, None), Button::Secondary);
    assert_eq!(actions, vec![Action::StrokeFinished]);
    assert!(!core.session.is_drawing());
    assert!(core.session.active_stroke().is_none());

    core.on_pointer_move(sample(15.0, 5.0, None));
    assert!(core.on_pointer_up().is_empty());
    assert!(core.input.is_idle());
    assert_eq!(core.session.strokes()[0].points.len(), 2);
    assert_eq!(core.camera.offset(), Point::new(10.0, 0.0));
}
