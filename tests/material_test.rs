use rally_ngin::resources::mtl::{MtlData, MtlError};

#[test]
fn should_parse_materials_with_defaults() {
    let data = MtlData::parse("newmtl armor\n").unwrap();
    let def = data.get("armor").unwrap();
    assert_eq!(def.ambient, [0.2; 3]);
    assert_eq!(def.diffuse, [0.8; 3]);
    assert_eq!(def.specular, [1.0; 3]);
    assert_eq!(def.ambient_map, None);
    assert_eq!(def.diffuse_map, None);
}

#[test]
fn should_parse_reflectance_and_maps() {
    let src = "\
# rally materials
newmtl armor
Ka 0.1 0.2 0.3
Kd 0.4 0.5 0.6
Ks 0.7 0.8 0.9
map_Ka armor_ao.png
map_Kd armor.png
";
    let data = MtlData::parse(src).unwrap();
    let def = data.get("armor").unwrap();
    assert_eq!(def.ambient, [0.1, 0.2, 0.3]);
    assert_eq!(def.diffuse, [0.4, 0.5, 0.6]);
    assert_eq!(def.specular, [0.7, 0.8, 0.9]);
    assert_eq!(def.ambient_map.as_deref(), Some("armor_ao.png"));
    assert_eq!(def.diffuse_map.as_deref(), Some("armor.png"));
}

#[test]
fn should_apply_directives_to_most_recent_material() {
    let src = "\
newmtl armor
Kd 1.0 0.0 0.0
newmtl glass
Kd 0.0 0.0 1.0
";
    let data = MtlData::parse(src).unwrap();
    assert_eq!(data.get("armor").unwrap().diffuse, [1.0, 0.0, 0.0]);
    assert_eq!(data.get("glass").unwrap().diffuse, [0.0, 0.0, 1.0]);
}

#[test]
fn should_keep_materials_in_declaration_order() {
    let src = "newmtl zeta\nnewmtl alpha\n";
    let data = MtlData::parse(src).unwrap();
    let names: Vec<&str> = data.materials.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["zeta", "alpha"]);
}

#[test]
fn should_skip_non_png_texture_maps() {
    let src = "\
newmtl armor
map_Kd armor.tga
";
    let data = MtlData::parse(src).unwrap();
    assert_eq!(data.get("armor").unwrap().diffuse_map, None);
}

#[test]
fn should_reject_directives_before_any_material() {
    let err = MtlData::parse("Kd 1.0 1.0 1.0\n").unwrap_err();
    assert_eq!(
        err,
        MtlError::DirectiveOutsideMaterial {
            line: 1,
            directive: "Kd".to_string(),
        }
    );
}

#[test]
fn should_reject_malformed_reflectance() {
    let err = MtlData::parse("newmtl armor\nKa 1.0 x 1.0\n").unwrap_err();
    assert_eq!(
        err,
        MtlError::MalformedNumber {
            line: 2,
            token: "x".to_string(),
        }
    );
}

#[test]
fn should_reject_missing_reflectance_components() {
    let err = MtlData::parse("newmtl armor\nKs 1.0\n").unwrap_err();
    assert_eq!(
        err,
        MtlError::MissingComponents {
            line: 2,
            directive: "Ks",
            expected: 3,
        }
    );
}

#[test]
fn should_return_none_for_unknown_material() {
    let data = MtlData::parse("newmtl armor\n").unwrap();
    assert!(data.get("missing").is_none());
}
