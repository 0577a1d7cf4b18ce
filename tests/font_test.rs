use rally_ngin::resources::font::{FontDef, FontError, FontMetrics, build_glyph_vertices};

const HACK10: &str = "\
# hack, 10pt
atlas hack.png
glyph 8 16
";

fn metrics() -> FontMetrics {
    FontMetrics {
        glyph_width: 8,
        glyph_height: 16,
        first_char: 32,
        glyph_count: 96,
        atlas_size: [1024, 16],
    }
}

#[test]
fn should_parse_descriptor_with_ascii_defaults() {
    let def = FontDef::parse(HACK10).unwrap();
    assert_eq!(
        def,
        FontDef {
            atlas: "hack.png".to_string(),
            glyph_width: 8,
            glyph_height: 16,
            first_char: 32,
            glyph_count: 96,
        }
    );
}

#[test]
fn should_parse_explicit_character_range() {
    let src = "atlas digits.png\nglyph 8 16\nrange 48 10\n";
    let def = FontDef::parse(src).unwrap();
    assert_eq!(def.first_char, 48);
    assert_eq!(def.glyph_count, 10);
}

#[test]
fn should_reject_descriptor_without_atlas() {
    let err = FontDef::parse("glyph 8 16\n").unwrap_err();
    assert_eq!(err, FontError::MissingDirective { directive: "atlas" });
}

#[test]
fn should_reject_descriptor_without_glyph_size() {
    let err = FontDef::parse("atlas hack.png\n").unwrap_err();
    assert_eq!(err, FontError::MissingDirective { directive: "glyph" });
}

#[test]
fn should_reject_non_png_atlas() {
    let err = FontDef::parse("atlas hack.bmp\nglyph 8 16\n").unwrap_err();
    assert_eq!(
        err,
        FontError::AtlasNotPng {
            line: 1,
            path: "hack.bmp".to_string(),
        }
    );
}

#[test]
fn should_reject_malformed_glyph_size() {
    let err = FontDef::parse("atlas hack.png\nglyph 8 tall\n").unwrap_err();
    assert_eq!(
        err,
        FontError::MalformedNumber {
            line: 2,
            token: "tall".to_string(),
        }
    );
}

#[test]
fn should_emit_one_quad_per_renderable_character() {
    let vertices = build_glyph_vertices(&metrics(), "FPS: 60", 0.0, 0.0);
    assert_eq!(vertices.len(), 7 * 6);
}

#[test]
fn should_advance_the_pen_one_cell_per_character() {
    let vertices = build_glyph_vertices(&metrics(), "AB", 4.0, 2.0);
    // first corner of each quad is the glyph's top-left
    assert_eq!(vertices[0].position, [4.0, 2.0]);
    assert_eq!(vertices[6].position, [12.0, 2.0]);
    // quads span one cell
    assert_eq!(vertices[5].position, [12.0, 18.0]);
}

#[test]
fn should_map_uvs_to_the_glyph_cell() {
    let m = metrics();
    let vertices = build_glyph_vertices(&m, "!", 0.0, 0.0);
    // '!' is the second cell in an ascii atlas
    let cell = 8.0 / 1024.0;
    assert_eq!(vertices[0].uv, [cell, 0.0]);
    assert_eq!(vertices[1].uv, [2.0 * cell, 0.0]);
    assert_eq!(vertices[5].uv, [2.0 * cell, 1.0]);
}

#[test]
fn should_skip_out_of_range_characters_but_keep_spacing() {
    let vertices = build_glyph_vertices(&metrics(), "a\tb", 0.0, 0.0);
    // tab produces no quad yet still advances the pen
    assert_eq!(vertices.len(), 2 * 6);
    assert_eq!(vertices[0].position, [0.0, 0.0]);
    assert_eq!(vertices[6].position, [16.0, 0.0]);
}

#[test]
fn should_layout_nothing_for_empty_text() {
    assert!(build_glyph_vertices(&metrics(), "", 0.0, 0.0).is_empty());
}
