use super::*;
use crate::bounds::BoundingBox;
use crate::relay::{DistanceRelay, QueryRelay};
use std::cell::RefCell;

fn line() -> Shape {
    Shape::LineString(vec![vec![0.0, 0.0, 1.0], vec![5.0, -2.0, 2.0], vec![3.0, 9.0, 3.0]])
}

fn ring(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Vec<f64>> {
    vec![
        vec![x0, y0],
        vec![x1, y0],
        vec![x1, y1],
        vec![x0, y1],
        vec![x0, y0],
    ]
}

#[test]
fn shapes_load_and_describe_back_identically() {
    let e = MemoryEngine::default();
    let shapes = [
        Shape::Point(vec![1.0, 2.0]),
        Shape::Point(vec![]),
        line(),
        Shape::LinearRing(ring(0.0, 0.0, 1.0, 1.0)),
        Shape::Polygon(vec![ring(0.0, 0.0, 4.0, 4.0), ring(1.0, 1.0, 2.0, 2.0)]),
        Shape::Polygon(vec![]),
        Shape::MultiPoint(vec![vec![0.0, 0.0], vec![1.0, 1.0]]),
        Shape::MultiLineString(vec![vec![vec![0.0, 0.0], vec![1.0, 1.0]]]),
        Shape::MultiPolygon(vec![vec![ring(0.0, 0.0, 1.0, 1.0)]]),
        Shape::GeometryCollection(vec![Shape::Point(vec![0.0, 0.0]), line()]),
    ];
    for shape in shapes {
        let g = e.load(&shape).unwrap();
        assert_eq!(e.to_shape(&g).as_ref(), Some(&shape));
        e.geom_destroy(g);
    }
    assert_eq!(e.live(), Live::default());
}

#[test]
fn shape_json_uses_type_and_coordinates() {
    let json = r#"{"type":"Polygon","coordinates":[[[0,0],[2,0],[2,2],[0,0]]]}"#;
    let shape: Shape = serde_json::from_str(json).unwrap();
    assert_eq!(
        shape,
        Shape::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![2.0, 0.0],
            vec![2.0, 2.0],
            vec![0.0, 0.0]
        ]])
    );
    let back = serde_json::to_value(&shape).unwrap();
    assert_eq!(back["type"], "Polygon");
}

#[test]
fn invalid_shapes_are_rejected_with_a_message() {
    let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::<String>::new()));
    let sink = std::rc::Rc::clone(&log);
    let mut e = MemoryEngine::default();
    e.set_message_handler(Some(Box::new(move |m: &str| {
        sink.borrow_mut().push(m.to_string())
    })));
    let open = Shape::LinearRing(vec![
        vec![0.0, 0.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
    ]);
    assert!(e.load(&open).is_none());
    let short = Shape::Polygon(vec![vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 0.0]]]);
    assert!(e.load(&short).is_none());
    let mixed = Shape::LineString(vec![vec![0.0, 0.0], vec![1.0, 1.0, 1.0]]);
    assert!(e.load(&mixed).is_none());
    assert_eq!(log.borrow().len(), 3);
    assert!(log.borrow()[1].contains("must be 0 or >= 4"));
    assert_eq!(e.live().total(), 0);
}

#[test]
fn accounting_tracks_nested_footprint() {
    let e = MemoryEngine::default();
    let g = e
        .load(&Shape::MultiPolygon(vec![
            vec![ring(0.0, 0.0, 4.0, 4.0), ring(1.0, 1.0, 2.0, 2.0)],
            vec![ring(5.0, 5.0, 6.0, 6.0)],
        ]))
        .unwrap();
    // 3 rings (seq + geom each), 2 polygons, 1 collection.
    assert_eq!(
        e.live(),
        Live {
            seqs: 3,
            geoms: 6,
            other: 0
        }
    );
    e.geom_destroy(g);
    assert_eq!(e.live().total(), 0);
}

#[test]
fn children_are_borrowed_from_the_parent() {
    let e = MemoryEngine::default();
    let g = e
        .load(&Shape::Polygon(vec![ring(0.0, 0.0, 4.0, 4.0), ring(1.0, 1.0, 2.0, 2.0)]))
        .unwrap();
    let hole = e.interior_ring_n(&g, 0).unwrap();
    assert_eq!(e.num_points(hole), Some(5));
    assert!(e.interior_ring_n(&g, 1).is_none());
    let shell = e.exterior_ring(&g).unwrap();
    let seq = e.coord_seq(shell).unwrap();
    assert_eq!(e.seq_x(seq, 1), Some(4.0));
    assert_eq!(e.geometry_n(&g, 0).map(|c| e.type_id(c)), Some(Some(3)));
    assert!(e.geometry_n(&g, 1).is_none());
    e.geom_destroy(g);
}

#[test]
fn ordinate_access_is_range_checked() {
    let e = MemoryEngine::default();
    let mut s = e.seq_create(2, 3).unwrap();
    assert_eq!(e.seq_set_ordinate(&mut s, 1, 2, 7.0), Some(()));
    assert_eq!(e.seq_ordinate(&s, 1, 2), Some(7.0));
    assert_eq!(e.seq_ordinate(&s, 2, 0), None);
    assert_eq!(e.seq_ordinate(&s, 0, 3), None);
    assert_eq!(e.seq_size(&s), Some(2));
    assert_eq!(e.seq_dims(&s), Some(3));
    assert!(e.seq_create(1, 5).is_none());
    e.seq_destroy(s);
    assert_eq!(e.live().total(), 0);
}

#[test]
fn bulk_copy_drops_unrequested_ordinates() {
    let e = MemoryEngine::default();
    let g = e.load(&line()).unwrap();
    let seq = e.coord_seq(&g).unwrap();
    let mut xy = [0.0; 6];
    e.seq_copy_to_buffer(seq, &mut xy, false, false).unwrap();
    assert_eq!(xy, [0.0, 0.0, 5.0, -2.0, 3.0, 9.0]);
    let mut xym = [0.0; 9];
    assert!(e.seq_copy_to_buffer(seq, &mut xym, false, true).is_none());
    e.geom_destroy(g);
}

#[test]
fn constructors_hand_inputs_back_on_failure() {
    let e = MemoryEngine::default();
    let s = e.seq_copy_from_buffer(&[0.0, 0.0, 1.0, 1.0], 2, false, false).unwrap();
    let s = e.create_point(s).unwrap_err();
    let s = e.create_linear_ring(s).unwrap_err();
    assert_eq!(s.size(), 2);
    e.seq_destroy(s);

    let s = e.seq_copy_from_buffer(&[1.0, 2.0], 1, false, false).unwrap();
    let p = e.create_point(s).unwrap();
    let (shell, holes) = e.create_polygon(p, Vec::new()).unwrap_err();
    assert!(holes.is_empty());
    e.geom_destroy(shell);
    assert_eq!(e.live().total(), 0);
}

#[test]
fn fault_fires_once_on_the_nth_call() {
    let e = MemoryEngine::default();
    let g = e.load(&line()).unwrap();
    e.reset_calls();
    e.fail_nth("type_id", 2);
    assert_eq!(e.type_id(&g), Some(1));
    assert_eq!(e.type_id(&g), None);
    assert_eq!(e.type_id(&g), Some(1));
    assert_eq!(e.calls("type_id"), 3);
    e.clear_faults();
    e.reset_calls();
    assert_eq!(e.type_id(&g), Some(1));
    e.geom_destroy(g);
}

#[test]
fn empty_point_has_no_coordinates() {
    let e = MemoryEngine::default();
    let p = e.create_empty_point().unwrap();
    assert_eq!(e.is_empty(&p), Some(true));
    assert_eq!(e.point_x(&p), None);
    assert_eq!(e.num_geometries(&p), Some(1));
    e.geom_destroy(p);
}

fn push_char(c: &char, hits: &RefCell<Vec<char>>) {
    hits.borrow_mut().push(*c);
}

fn abs_diff(a: &f64, b: &f64, out: &mut f64, _: &()) -> bool {
    *out = (a - b).abs();
    true
}

#[test]
fn index_query_matches_by_envelope_overlap() {
    let mut index = MemoryIndex::new();
    assert!(index.is_empty());
    index.insert(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 'a');
    index.insert(BoundingBox::new(2.0, 2.0, 3.0, 3.0), 'b');
    index.insert(BoundingBox::empty(), 'c');
    assert_eq!(index.len(), 3);
    let relay = QueryRelay::new(push_char, RefCell::new(Vec::new()));
    index.query(&BoundingBox::new(-10.0, -10.0, 10.0, 10.0), &relay);
    assert_eq!(*relay.token().borrow(), vec!['a', 'b']);
}

#[test]
fn index_iterate_visits_every_item_in_order() {
    let mut index = MemoryIndex::new();
    index.insert(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 'a');
    index.insert(BoundingBox::empty(), 'b');
    index.insert(BoundingBox::new(9.0, 9.0, 9.0, 9.0), 'c');
    let relay = QueryRelay::new(push_char, RefCell::new(Vec::new()));
    index.iterate(&relay);
    assert_eq!(*relay.token().borrow(), vec!['a', 'b', 'c']);
}

#[test]
fn index_remove_needs_matching_envelope_and_item() {
    let unit = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
    let mut index = MemoryIndex::new();
    index.insert(unit, 'a');
    index.insert(BoundingBox::new(2.0, 2.0, 3.0, 3.0), 'b');
    index.insert(unit, 'c');

    assert!(!index.remove(&unit, &'b'));
    assert!(!index.remove(&BoundingBox::new(0.0, 0.0, 2.0, 2.0), &'a'));
    assert!(index.remove(&unit, &'a'));
    assert!(!index.remove(&unit, &'a'));
    assert_eq!(index.len(), 2);

    let relay = QueryRelay::new(push_char, RefCell::new(Vec::new()));
    index.query(&unit, &relay);
    assert_eq!(*relay.token().borrow(), vec!['c']);
}

#[test]
fn index_nearest_keeps_first_of_ties() {
    let mut index = MemoryIndex::new();
    for x in [1.0, -1.0, 4.0] {
        index.insert(BoundingBox::new(x, 0.0, x, 0.0), x);
    }
    let relay = DistanceRelay::new(abs_diff, ());
    assert_eq!(index.nearest(&0.0, &relay), Some(&1.0));
    assert_eq!(MemoryIndex::<f64>::new().nearest(&0.0, &relay), None);
}
