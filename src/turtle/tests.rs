use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

const TOLERANCE: f64 = 1e-6;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn assert_at(turtle: &Turtle, x: f64, y: f64) {
    assert_close(turtle.x(), x);
    assert_close(turtle.y(), y);
}

#[test]
fn test_initial_state() {
    let turtle = Turtle::new();
    assert_eq!(turtle.position(), Point::new(0.0, 0.0));
    assert_eq!(turtle.heading(), 90.0);
    assert!(turtle.is_pen_down());
    assert!(turtle.is_visible());
    assert_eq!(turtle.pen_width(), 1.0);
    assert_eq!(turtle.pen_color(), Color::BLACK);
    assert!(turtle.drawing().is_empty());
}

#[test]
fn test_forward_follows_heading() {
    let mut turtle = Turtle::new();
    turtle.forward(50.0);
    assert_at(&turtle, 0.0, 50.0);

    turtle.right(90.0);
    assert_eq!(turtle.heading(), 0.0);
    turtle.forward(10.0);
    assert_at(&turtle, 10.0, 50.0);

    turtle.left(45.0);
    turtle.backward(2.0_f64.sqrt());
    assert_at(&turtle, 9.0, 49.0);
}

#[test]
fn test_square_scenario() {
    let mut turtle = Turtle::new();
    for _ in 0..4 {
        turtle.forward(100.0);
        turtle.right(90.0);
    }
    assert_at(&turtle, 0.0, 0.0);
    assert_eq!(turtle.heading(), 90.0);

    let drawing = turtle.drawing();
    assert_eq!(drawing.len(), 1);
    assert_eq!(drawing[0].points.len(), 5);
    assert_close(drawing[0].length(), 400.0);
    assert_eq!(turtle.segments().len(), 4);
}

#[test]
fn test_pen_up_finalizes_path() {
    let mut turtle = Turtle::new();
    turtle.forward(10.0);
    turtle.pen_up();
    assert_eq!(turtle.paths().len(), 1);

    turtle.forward(10.0);
    assert_eq!(turtle.paths().len(), 1);
    assert_eq!(turtle.segments().len(), 1);

    turtle.pen_down();
    turtle.forward(10.0);
    let drawing = turtle.drawing();
    assert_eq!(drawing.len(), 2);
    assert_close(drawing[1].points[0].y, 20.0);
    assert_close(drawing[1].points[1].y, 30.0);
}

#[test]
fn test_pen_up_without_movement_keeps_nothing() {
    let mut turtle = Turtle::new();
    turtle.pen_up();
    turtle.pen_down();
    turtle.pen_up();
    assert!(turtle.drawing().is_empty());
}

#[test]
fn test_set_xy_draws_straight_line() {
    let mut turtle = Turtle::new();
    turtle.set_xy(30.0, 40.0);
    turtle.set_x(0.0);
    turtle.set_y(0.0);
    let segments = turtle.segments();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].to, Point::new(30.0, 40.0));
    assert_eq!(segments[1].to, Point::new(0.0, 40.0));
    assert_close(turtle.drawing()[0].length(), 50.0 + 30.0 + 40.0);
}

#[test]
fn test_home_draws_and_resets_heading() {
    let mut turtle = Turtle::new();
    turtle.set_heading(10.0);
    turtle.set_xy(5.0, 5.0);
    turtle.home();
    assert_at(&turtle, 0.0, 0.0);
    assert_eq!(turtle.heading(), 90.0);
    assert_eq!(turtle.segments().len(), 2);
}

#[test]
fn test_circle_closes() {
    let mut turtle = Turtle::new();
    turtle.circle(50.0);
    assert_at(&turtle, 0.0, 0.0);
    assert_close(turtle.heading(), 90.0);
    let drawing = turtle.drawing();
    assert_eq!(drawing[0].points.len(), 37);
    assert_close(drawing[0].length(), 2.0 * PI * 50.0);
}

#[test]
fn test_circle_steps_setting() {
    let mut turtle = Turtle::new();
    turtle.set_circle_steps(4);
    turtle.circle(1.0);
    assert_eq!(turtle.segments().len(), 4);

    turtle.set_circle_steps(0);
    turtle.circle(1.0);
    assert_eq!(turtle.segments().len(), 5);
}

#[test]
fn test_box_and_square() {
    let mut turtle = Turtle::new();
    turtle.draw_box(20.0, 10.0);
    assert_at(&turtle, 0.0, 0.0);
    let drawing = turtle.drawing();
    let points = &drawing[0].points;
    assert_eq!(points.len(), 5);
    assert_close(points[1].y, 20.0);
    assert_close(points[2].x, 10.0);

    let mut turtle = Turtle::new();
    turtle.square(10.0);
    assert_close(turtle.drawing()[0].length(), 40.0);
}

#[test]
fn test_style_change_splits_path() {
    let mut turtle = Turtle::new();
    turtle.forward(10.0);
    turtle.set_pen_color(Color::new(255, 0, 0));
    turtle.forward(10.0);
    turtle.set_pen_size(3.0);
    turtle.forward(10.0);

    let drawing = turtle.drawing();
    assert_eq!(drawing.len(), 3);
    assert_eq!(drawing[0].color, Color::BLACK);
    assert_eq!(drawing[1].color, Color::new(255, 0, 0));
    assert_eq!(drawing[1].width, 1.0);
    assert_eq!(drawing[2].width, 3.0);
}

#[test]
fn test_style_change_before_drawing_does_not_split() {
    let mut turtle = Turtle::new();
    turtle.set_pen_color(Color::new(0, 0, 255));
    turtle.set_pen_color(Color::new(0, 0, 255));
    turtle.forward(5.0);
    let drawing = turtle.drawing();
    assert_eq!(drawing.len(), 1);
    assert_eq!(drawing[0].color, Color::new(0, 0, 255));
}

#[test]
fn test_color_clamping() {
    assert_eq!(Color::clamped(-5.0, 127.6, 300.0), Color::new(0, 128, 255));
    assert_eq!(Color::clamped(f64::NAN, 0.0, 0.0), Color::BLACK);
    assert_eq!(Color::new(255, 0, 16).to_string(), "#ff0010");
}

#[test]
fn test_clear_resets_pose_and_paths() {
    let mut turtle = Turtle::new();
    turtle.set_pen_size(4.0);
    turtle.forward(10.0);
    turtle.pen_up();
    turtle.right(30.0);
    turtle.clear();

    assert_at(&turtle, 0.0, 0.0);
    assert_eq!(turtle.heading(), 90.0);
    assert!(turtle.is_pen_down());
    assert!(turtle.drawing().is_empty());
    assert_eq!(turtle.pen_width(), 4.0);
}

#[test]
fn test_visibility() {
    let mut turtle = Turtle::new();
    turtle.hide();
    assert!(!turtle.snapshot().visible);
    turtle.show();
    assert!(turtle.is_visible());
}

#[test]
fn test_segment_sink_sees_each_line() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let mut turtle = Turtle::new();
    turtle.set_segment_sink(move |segment| sink.borrow_mut().push(*segment));
    turtle.forward(10.0);
    turtle.pen_up();
    turtle.forward(10.0);
    turtle.pen_down();
    turtle.right(90.0);
    turtle.forward(5.0);

    assert_eq!(seen.borrow().len(), 2);
    assert_close(seen.borrow()[1].from.y, 20.0);
    assert_close(seen.borrow()[1].to.x, 5.0);

    turtle.clear_segment_sink();
    turtle.forward(1.0);
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn test_snapshot_serializes() {
    let mut turtle = Turtle::with_style(2.0, Color::new(1, 2, 3));
    turtle.set_heading(0.0);
    let json = serde_json::to_string(&turtle.snapshot()).unwrap();
    assert_eq!(
        json,
        r#"{"x":0.0,"y":0.0,"heading":0.0,"pen_down":true,"pen_width":2.0,"pen_color":{"r":1,"g":2,"b":3},"visible":true}"#
    );
}

#[test]
fn test_normalize_heading_edges() {
    assert_eq!(normalize_heading(360.0), 0.0);
    assert_eq!(normalize_heading(-90.0), 270.0);
    assert_eq!(normalize_heading(725.0), 5.0);
    assert_eq!(normalize_heading(-1e-20), 0.0);
}

proptest! {
    #[test]
    fn prop_heading_is_normalized(start in -1e6f64..1e6, turn in -1e6f64..1e6) {
        let mut turtle = Turtle::new();
        turtle.set_heading(start);
        prop_assert!((0.0..360.0).contains(&turtle.heading()));
        turtle.left(turn);
        prop_assert!((0.0..360.0).contains(&turtle.heading()));
        turtle.right(turn * 2.0);
        prop_assert!((0.0..360.0).contains(&turtle.heading()));
    }

    #[test]
    fn prop_forward_then_backward_returns(
        heading in 0.0f64..360.0,
        distance in -1e4f64..1e4,
    ) {
        let mut turtle = Turtle::new();
        turtle.set_heading(heading);
        let before = turtle.position();
        turtle.forward(distance);
        turtle.backward(distance);
        prop_assert!(turtle.position().distance(&before) < 1e-6);
        prop_assert_eq!(turtle.heading(), normalize_heading(heading));
    }
}
