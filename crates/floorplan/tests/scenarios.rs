use exhibit::{FALLBACK_COLOR, gik};
use floorplan::{
    Aggregation, Booth, CanvasSize, Normalizer, PickOptions, SkipReason, aggregate_booths,
    pick_booth,
};
use foundation::bounds::Aabb2;
use foundation::math::Vec2;
use formats::{RawAnnotation, RawPoint, fallback_annotations, parse_booth_positions};

fn aggregate(anns: &[RawAnnotation]) -> Aggregation {
    aggregate_booths(anns, &gik::exhibit(), &Normalizer::default())
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn by_code<'a>(booths: &'a [Booth], code: &str) -> &'a Booth {
    booths
        .iter()
        .find(|b| b.code == code)
        .unwrap_or_else(|| panic!("missing booth {code}"))
}

#[test]
fn percent_rect_centroid() {
    let anns = parse_booth_positions(
        r#"[{"code": "A-01", "type": "rect", "rotation": 0, "points": [],
             "pointsPercent": [{"x": "36.79", "y": "20.21"}, {"x": "40.29", "y": "25.01"}]}]"#,
    )
    .unwrap();
    let agg = aggregate(&anns);
    assert_eq!(agg.booths.len(), 1);
    let b = &agg.booths[0];
    assert!(approx(b.center_x, 231.24), "centerX = {}", b.center_x);
    assert!(approx(b.center_y, 113.05), "centerY = {}", b.center_y);
    assert_eq!(b.title, "IoT for Monitoring");
}

#[test]
fn ambiguous_pixel_points_follow_the_percent_heuristic() {
    let anns = parse_booth_positions(
        r#"[{"code": "C-01", "pointsPercent": [], "points": [{"x": "74.76", "y": "96.20"}]}]"#,
    )
    .unwrap();
    let agg = aggregate(&anns);
    let b = &agg.booths[0];
    assert!(approx(b.center_x, 448.56));
    assert!(approx(b.center_y, 481.0));
}

#[test]
fn unknown_booth_code() {
    let anns = vec![RawAnnotation::new("Z-99").with_points(vec![RawPoint::new("310", "220")])];
    let agg = aggregate(&anns);
    let b = by_code(&agg.booths, "Z-99");
    assert_eq!(b.title, "Z-99");
    assert_eq!(b.description, "Booth");
    assert_eq!(b.color, FALLBACK_COLOR);
}

#[test]
fn empty_input_yields_nothing_to_hit() {
    let agg = aggregate(&[]);
    assert!(agg.booths.is_empty());
    for p in [Vec2::new(0.0, 0.0), Vec2::new(300.0, 250.0), Vec2::new(-5.0, 1e6)] {
        assert!(pick_booth(&agg.booths, p, PickOptions::default()).is_none());
    }
}

#[test]
fn aggregation_is_order_independent() {
    let anns = fallback_annotations();
    let forward = aggregate(&anns).booths;

    let mut reversed_input = anns.clone();
    reversed_input.reverse();
    let reversed = aggregate(&reversed_input).booths;

    let mut rotated_input = anns.clone();
    rotated_input.rotate_left(2);
    let rotated = aggregate(&rotated_input).booths;

    for other in [&reversed, &rotated] {
        assert_eq!(other.len(), forward.len());
        for b in &forward {
            let o = by_code(other, &b.code);
            assert!(approx(o.center_x, b.center_x));
            assert!(approx(o.center_y, b.center_y));
        }
    }
}

#[test]
fn centroid_is_the_mean_of_normalized_points() {
    let normalizer = Normalizer::new(CanvasSize::new(800.0, 400.0));
    let raw = vec![
        RawPoint::new("10", "20"),
        RawPoint::new(250.0, 150.0),
        RawPoint::new("55.5", "75"),
    ];
    let anns = vec![RawAnnotation::new("D-01").with_points(raw.clone())];
    let agg = aggregate_booths(&anns, &gik::exhibit(), &normalizer);

    let pts: Vec<Vec2> = raw.iter().map(|p| normalizer.normalize(p).unwrap()).collect();
    let mean_x = pts.iter().map(|p| p.x).sum::<f64>() / pts.len() as f64;
    let mean_y = pts.iter().map(|p| p.y).sum::<f64>() / pts.len() as f64;

    let b = &agg.booths[0];
    assert!(approx(b.center_x, mean_x));
    assert!(approx(b.center_y, mean_y));

    let hull = Aabb2::from_points(&pts).unwrap();
    assert!(hull.contains(b.center()));
}

#[test]
fn fallback_layout_lands_inside_the_canvas() {
    let canvas = CanvasSize::default();
    let agg = aggregate(&fallback_annotations());
    assert_eq!(agg.booths.len(), 6);
    assert!(agg.skipped_points.is_empty());
    for b in &agg.booths {
        assert!(canvas.bounds().contains(b.center()), "{} outside canvas", b.code);
    }

    // Percent lists win over pixel lists.
    let b01 = by_code(&agg.booths, "B-01");
    assert!(approx(b01.center_x, (24.79 + 28.29) / 2.0 / 100.0 * 600.0));
    assert!(approx(b01.center_y, (20.44 + 25.44) / 2.0 / 100.0 * 500.0));
}

#[test]
fn click_on_centroid_finds_booth() {
    let agg = aggregate(&fallback_annotations());
    for b in &agg.booths {
        let hit = pick_booth(&agg.booths, b.center(), PickOptions::default()).unwrap();
        assert_eq!(hit.code, b.code);
    }
}

#[test]
fn malformed_entries_cost_only_themselves() {
    let anns = parse_booth_positions(
        r#"[
            {"code": "A-01", "points": [{"x": 300, "y": 200}], "pointsPercent": null},
            {"code": 7, "points": [{"x": 450, "y": 120}]},
            "not an annotation",
            {"code": "B-01", "points": {"x": 1, "y": 2}}
        ]"#,
    )
    .unwrap();
    let agg = aggregate(&anns);

    let codes: Vec<&str> = agg.booths.iter().map(|b| b.code.as_str()).collect();
    assert_eq!(codes, vec!["7", "A-01"]);
    let a01 = by_code(&agg.booths, "A-01");
    assert_eq!((a01.center_x, a01.center_y), (300.0, 200.0));
    assert_eq!(by_code(&agg.booths, "7").color, FALLBACK_COLOR);

    let skipped: Vec<(usize, SkipReason)> = agg
        .skipped_annotations
        .iter()
        .map(|s| (s.annotation, s.reason))
        .collect();
    assert_eq!(
        skipped,
        vec![(2, SkipReason::MissingCode), (3, SkipReason::NoPoints)]
    );
}

#[test]
fn huge_coordinates_stay_inside_the_hull() {
    let raw = vec![RawPoint::new(1.0e308, 200.0), RawPoint::new(1.5e308, 200.0)];
    let agg = aggregate(&[RawAnnotation::new("A-01").with_points(raw.clone())]);

    let normalizer = Normalizer::default();
    let pts: Vec<Vec2> = raw.iter().map(|p| normalizer.normalize(p).unwrap()).collect();
    let hull = Aabb2::from_points(&pts).unwrap();

    let b = by_code(&agg.booths, "A-01");
    assert!(b.center().is_finite());
    assert!(hull.contains(b.center()));
}
