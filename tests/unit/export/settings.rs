use super::*;

#[test]
fn defaults_are_a4_at_twice_the_resolution() {
    let s = ExportSettings::default();
    assert_eq!(s.page_width_mm, 210.0);
    assert_eq!(s.render.scale, 2.0);
    s.validate().unwrap();
}

#[test]
fn overrides_apply_and_garbage_is_ignored() {
    let s = ExportSettings::default().with_overrides(Some(" 3 "), Some("216"));
    assert_eq!(s.render.scale, 3.0);
    assert_eq!(s.page_width_mm, 216.0);

    let s = ExportSettings::default().with_overrides(Some("big"), None);
    assert_eq!(s.render.scale, 2.0);
    assert_eq!(s.page_width_mm, 210.0);
}

#[test]
fn validate_rejects_out_of_range_values() {
    for scale in [0.0, -1.0, 9.0, f32::NAN] {
        let mut s = ExportSettings::default();
        s.render.scale = scale;
        assert!(s.validate().is_err(), "{scale}");
    }
    let s = ExportSettings {
        page_width_mm: f64::INFINITY,
        ..ExportSettings::default()
    };
    assert!(matches!(s.validate(), Err(CvError::Validation(_))));
}
