use nalgebra as na;
use stereo_hand_haptics::curve::{Curve, CurveSet};
use stereo_hand_haptics::proximity::{check_collisions, distance_to_curve, is_touching};
use stereo_hand_haptics::types::Rgb;

fn segment_curve(name: &str, thickness: f64) -> Curve {
    Curve::new(
        name,
        vec![na::Vector3::new(0.0, 0.0, 0.0), na::Vector3::new(10.0, 0.0, 0.0)],
        thickness,
        Rgb(200, 100, 50),
    )
}

fn offset_curve(name: &str, y: f64, thickness: f64) -> Curve {
    Curve::new(
        name,
        vec![na::Vector3::new(-100.0, y, 0.0), na::Vector3::new(100.0, y, 0.0)],
        thickness,
        Rgb(50, 100, 200),
    )
}

#[test]
fn test_perpendicular_projection() {
    let curve = segment_curve("seg", 5.0);
    let d = distance_to_curve(&na::Vector3::new(5.0, 3.0, 0.0), &curve);
    assert!((d - 3.0).abs() < 1e-12);
}

#[test]
fn test_clamped_to_endpoint() {
    let curve = segment_curve("seg", 5.0);
    let d = distance_to_curve(&na::Vector3::new(20.0, 0.0, 0.0), &curve);
    assert!((d - 10.0).abs() < 1e-12);
}

#[test]
fn test_empty_and_single_point_curves() {
    let p = na::Vector3::new(1.0, 2.0, 2.0);
    let empty = Curve::new("empty", vec![], 1e9, Rgb(0, 0, 0));
    assert_eq!(distance_to_curve(&p, &empty), f64::INFINITY);
    assert!(!is_touching(&p, &empty));

    let single = Curve::new("dot", vec![na::Vector3::zeros()], 3.0, Rgb(0, 0, 0));
    assert!((distance_to_curve(&p, &single) - 3.0).abs() < 1e-12);
}

#[test]
fn test_polyline_takes_minimum_over_segments() {
    let curve = Curve::new(
        "zigzag",
        vec![
            na::Vector3::new(0.0, 0.0, 0.0),
            na::Vector3::new(10.0, 10.0, 0.0),
            na::Vector3::new(20.0, 0.0, 0.0),
            na::Vector3::new(20.0, 0.0, 0.0),
            na::Vector3::new(30.0, 0.0, 7.0),
        ],
        1.0,
        Rgb(0, 0, 0),
    );
    let d = distance_to_curve(&na::Vector3::new(10.0, 12.0, 0.0), &curve);
    assert!((d - 2.0).abs() < 1e-12);
}

#[test]
fn test_touching_is_inclusive() {
    let curve = segment_curve("seg", 3.0);
    assert!(is_touching(&na::Vector3::new(5.0, 3.0, 0.0), &curve));
    assert!(!is_touching(&na::Vector3::new(5.0, 3.0001, 0.0), &curve));
}

#[test]
fn test_collisions_sorted_nearest_first() {
    let mut set = CurveSet::new();
    set.push(offset_curve("far", 8.0, 10.0));
    set.push(offset_curve("near", 2.0, 10.0));
    set.push(offset_curve("out", 30.0, 10.0));
    set.push(offset_curve("mid", -5.0, 10.0));
    let collisions = check_collisions(&na::Vector3::zeros(), &set);
    let order: Vec<usize> = collisions.iter().map(|c| c.index).collect();
    assert_eq!(order, vec![1, 3, 0]);
    assert!((collisions[0].distance - 2.0).abs() < 1e-12);
    assert!(collisions.windows(2).all(|w| w[0].distance <= w[1].distance));
}

#[test]
fn test_invisible_and_empty_curves_skipped() {
    let mut set = CurveSet::new();
    set.push(offset_curve("hidden", 0.0, 10.0));
    set.push(Curve::new("empty", vec![], 10.0, Rgb(0, 0, 0)));
    set.push(offset_curve("shown", 4.0, 10.0));
    set.toggle_visibility(0).unwrap();
    let collisions = check_collisions(&na::Vector3::zeros(), &set);
    assert_eq!(collisions.len(), 1);
    assert_eq!(collisions[0].index, 2);
}

#[test]
fn test_ties_keep_insertion_order() {
    let mut set = CurveSet::new();
    set.push(offset_curve("a", 3.0, 10.0));
    set.push(offset_curve("b", 1.0, 10.0));
    set.push(offset_curve("c", -3.0, 10.0));
    set.push(offset_curve("d", 3.0, 10.0));
    let order: Vec<usize> = check_collisions(&na::Vector3::zeros(), &set)
        .iter()
        .map(|c| c.index)
        .collect();
    assert_eq!(order, vec![1, 0, 2, 3]);
}
