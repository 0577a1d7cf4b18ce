use rally_ngin::resources::{
    mesh::build_vertices,
    obj::{FaceVertex, ObjData, ObjError},
};

const TRIANGLE: &str = "\
# a single triangle
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";

#[test]
fn should_parse_vertex_data_and_faces() {
    let data = ObjData::parse(TRIANGLE).unwrap();
    assert_eq!(data.positions.len(), 3);
    assert_eq!(data.texcoords.len(), 3);
    assert_eq!(data.normals.len(), 1);
    assert_eq!(data.objects.len(), 1);
    assert_eq!(data.objects[0].faces.len(), 1);
    assert_eq!(
        data.objects[0].faces[0][0],
        FaceVertex {
            position: 0,
            texcoord: 0,
            normal: 0,
        }
    );
}

#[test]
fn should_fan_triangulate_polygons() {
    let src = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1/1/1 2/1/1 3/1/1 4/1/1
";
    let data = ObjData::parse(src).unwrap();
    let faces = &data.objects[0].faces;
    // a quad becomes two triangles sharing the first corner
    assert_eq!(faces.len(), 2);
    assert_eq!(faces[0].map(|c| c.position), [0, 1, 2]);
    assert_eq!(faces[1].map(|c| c.position), [0, 2, 3]);
}

#[test]
fn should_group_faces_by_object_name() {
    let src = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
o hull
f 1/1/1 2/1/1 3/1/1
o turret
f 1/1/1 2/1/1 3/1/1
o hull
f 1/1/1 2/1/1 3/1/1
";
    let data = ObjData::parse(src).unwrap();
    assert_eq!(data.objects.len(), 2);
    assert_eq!(data.objects[0].name, "hull");
    // faces for a re-opened name land in the existing bucket
    assert_eq!(data.objects[0].faces.len(), 2);
    assert_eq!(data.objects[1].name, "turret");
    assert_eq!(data.objects[1].faces.len(), 1);
}

#[test]
fn should_bucket_faces_before_first_object_under_empty_name() {
    let data = ObjData::parse(TRIANGLE).unwrap();
    assert_eq!(data.objects[0].name, "");
}

#[test]
fn should_record_mtllib_and_per_object_material() {
    let src = "\
mtllib rally.mtl
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
o hull
usemtl armor
f 1/1/1 2/1/1 3/1/1
o glass
f 1/1/1 2/1/1 3/1/1
";
    let data = ObjData::parse(src).unwrap();
    assert_eq!(data.mtllib.as_deref(), Some("rally.mtl"));
    assert_eq!(data.objects[0].material.as_deref(), Some("armor"));
    assert_eq!(data.objects[1].material, None);
}

#[test]
fn should_ignore_unknown_directives() {
    let src = format!("s off\ng whatever\n{}", TRIANGLE);
    let data = ObjData::parse(&src).unwrap();
    assert_eq!(data.objects[0].faces.len(), 1);
}

#[test]
fn should_reject_zero_indices() {
    let src = "\
v 0.0 0.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 0/1/1 1/1/1 1/1/1
";
    let err = ObjData::parse(src).unwrap_err();
    assert_eq!(err, ObjError::ZeroIndex { line: 4 });
}

#[test]
fn should_reject_faces_with_fewer_than_three_corners() {
    let src = "\
v 0.0 0.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1/1/1 1/1/1
";
    let err = ObjData::parse(src).unwrap_err();
    assert_eq!(err, ObjError::DegenerateFace { line: 4 });
}

#[test]
fn should_reject_malformed_face_references() {
    let src = "\
v 0.0 0.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1/1 1/1/1 1/1/1
";
    let err = ObjData::parse(src).unwrap_err();
    assert_eq!(
        err,
        ObjError::MalformedFaceRef {
            line: 4,
            token: "1/1".to_string(),
        }
    );
}

#[test]
fn should_reject_malformed_numbers() {
    let err = ObjData::parse("v 0.0 abc 0.0\n").unwrap_err();
    assert_eq!(
        err,
        ObjError::MalformedNumber {
            line: 1,
            token: "abc".to_string(),
        }
    );
}

#[test]
fn should_reject_missing_components() {
    let err = ObjData::parse("v 0.0 1.0\n").unwrap_err();
    assert_eq!(
        err,
        ObjError::MissingComponents {
            line: 1,
            directive: "v",
            expected: 3,
        }
    );
}

#[test]
fn should_concat_sources_into_one_shared_index_space() {
    let wheel = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1/1/1 2/1/1 3/1/1
";
    let body = "\
v 2.0 0.0 0.0
v 3.0 0.0 0.0
v 2.0 1.0 0.0
vt 1.0 1.0
vn 0.0 1.0 0.0
f 1/1/1 2/1/1 3/1/1
";
    let data = ObjData::parse_concat(&[wheel, body]).unwrap();
    assert_eq!(data.positions.len(), 6);
    assert_eq!(data.objects.len(), 1);
    let faces = &data.objects[0].faces;
    assert_eq!(faces.len(), 2);
    // the first file's indices are untouched
    assert_eq!(faces[0].map(|c| c.position), [0, 1, 2]);
    // the second file's indices are shifted by the first file's counts
    assert_eq!(faces[1].map(|c| c.position), [3, 4, 5]);
    assert_eq!(faces[1].map(|c| c.texcoord), [1, 1, 1]);
    assert_eq!(faces[1].map(|c| c.normal), [1, 1, 1]);
}

#[test]
fn should_ignore_grouping_directives_when_concatenating() {
    let src = "\
mtllib rally.mtl
o hull
usemtl armor
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1/1/1 2/1/1 3/1/1
";
    let data = ObjData::parse_concat(&[src]).unwrap();
    assert_eq!(data.mtllib, None);
    assert_eq!(data.objects.len(), 1);
    assert_eq!(data.objects[0].name, "");
    assert_eq!(data.objects[0].material, None);
}

#[test]
fn should_produce_identical_vertices_on_repeated_parse() {
    let src = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vn 0.0 0.0 1.0
o quad
f 1/1/1 2/2/1 3/3/1 4/1/1
";
    let first = ObjData::parse(src).unwrap();
    let second = ObjData::parse(src).unwrap();

    assert_eq!(first.positions, second.positions);
    assert_eq!(first.texcoords, second.texcoords);
    assert_eq!(first.normals, second.normals);
    assert_eq!(first.objects.len(), second.objects.len());
    for (a, b) in first.objects.iter().zip(second.objects.iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.faces, b.faces);
    }

    let first_vertices = build_vertices(&first, &first.objects[0].faces).unwrap();
    let second_vertices = build_vertices(&second, &second.objects[0].faces).unwrap();
    assert_eq!(first_vertices, second_vertices);
}

#[test]
fn should_fail_concat_on_first_malformed_source() {
    let good = "v 0.0 0.0 0.0\n";
    let bad = "v nope 0.0 0.0\n";
    assert!(ObjData::parse_concat(&[good, bad]).is_err());
}
