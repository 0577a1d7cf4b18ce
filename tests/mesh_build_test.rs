use cgmath::Vector3;
use rally_ngin::{
    data_structures::model::ModelVertex,
    resources::{
        mesh::{build_vertices, center_vertices},
        obj::{ObjData, ObjError},
    },
};

const TRIANGLE: &str = "\
v 0.0 0.0 0.0
v 2.0 0.0 0.0
v 0.0 2.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";

fn vertex(position: [f32; 3]) -> ModelVertex {
    ModelVertex {
        position,
        normal: [0.0, 0.0, 1.0],
        tex_coords: [0.0, 0.0],
    }
}

#[test]
fn should_expand_faces_into_flat_vertices() {
    let data = ObjData::parse(TRIANGLE).unwrap();
    let vertices = build_vertices(&data, &data.objects[0].faces).unwrap();
    assert_eq!(vertices.len(), 3);
    assert_eq!(
        vertices[1],
        ModelVertex {
            position: [2.0, 0.0, 0.0],
            normal: [0.0, 0.0, 1.0],
            tex_coords: [1.0, 0.0],
        }
    );
}

#[test]
fn should_reject_out_of_range_indices() {
    let src = "\
v 0.0 0.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1/1/1 2/1/1 1/1/1
";
    let data = ObjData::parse(src).unwrap();
    let err = build_vertices(&data, &data.objects[0].faces).unwrap_err();
    assert_eq!(
        err,
        ObjError::IndexOutOfRange {
            kind: "position",
            index: 1,
            len: 1,
        }
    );
}

#[test]
fn should_center_vertices_around_bounding_box_midpoint() {
    let mut vertices = vec![
        vertex([1.0, 2.0, 3.0]),
        vertex([3.0, 6.0, 3.0]),
        vertex([1.0, 4.0, 7.0]),
    ];
    let offset = center_vertices(&mut vertices);
    assert_eq!(offset, Vector3::new(2.0, 4.0, 5.0));
    assert_eq!(vertices[0].position, [-1.0, -2.0, -2.0]);
    assert_eq!(vertices[1].position, [1.0, 2.0, -2.0]);
    assert_eq!(vertices[2].position, [-1.0, 0.0, 2.0]);
}

#[test]
fn should_return_zero_offset_for_empty_mesh() {
    let mut vertices: Vec<ModelVertex> = Vec::new();
    assert_eq!(center_vertices(&mut vertices), Vector3::new(0.0, 0.0, 0.0));
}

#[test]
fn should_keep_centering_independent_per_object() {
    let src = "\
v 0.0 0.0 0.0
v 2.0 0.0 0.0
v 0.0 2.0 0.0
v 10.0 0.0 0.0
v 12.0 0.0 0.0
v 10.0 2.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
o left
f 1/1/1 2/1/1 3/1/1
o right
f 4/1/1 5/1/1 6/1/1
";
    let data = ObjData::parse(src).unwrap();
    let mut left = build_vertices(&data, &data.objects[0].faces).unwrap();
    let mut right = build_vertices(&data, &data.objects[1].faces).unwrap();
    let left_offset = center_vertices(&mut left);
    let right_offset = center_vertices(&mut right);
    assert_eq!(left_offset, Vector3::new(1.0, 1.0, 0.0));
    assert_eq!(right_offset, Vector3::new(11.0, 1.0, 0.0));
    // both objects end up with identical local geometry, only the offsets differ
    for (l, r) in left.iter().zip(right.iter()) {
        assert_eq!(l.position, r.position);
    }
}
