use super::*;
use crate::{assets::text::FixedAdvanceShaper, form::photo::ImageUpload};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "cvpress_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn named(first: &str, last: &str) -> FormState {
    let mut state = FormState::new();
    state.update_field(Field::FirstName, first);
    state.update_field(Field::LastName, last);
    state
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn filename_uses_trimmed_names() {
    let mut r = ResumeRecord::default();
    r.set(Field::FirstName, " Jean ");
    r.set(Field::LastName, "Dupont");
    assert_eq!(export_filename(&r).unwrap(), "Jean_Dupont_CV.pdf");

    r.set(Field::LastName, "a/b\\c");
    assert_eq!(export_filename(&r).unwrap(), "Jean_a_b_c_CV.pdf");

    r.set(Field::LastName, "   ");
    assert!(matches!(export_filename(&r), Err(CvError::Validation(_))));
}

#[test]
fn export_writes_single_pdf_named_after_the_person() {
    let dir = temp_dir("export_ok");
    let state = named("Jean", "Dupont");
    let settings = ExportSettings::default();
    let outcome = export_pdf(
        &state,
        &mut FixedAdvanceShaper::default(),
        &settings,
        &dir,
    )
    .unwrap();

    assert_eq!(outcome.path, dir.join("Jean_Dupont_CV.pdf"));
    assert_eq!(entries(&dir), ["Jean_Dupont_CV.pdf"]);
    let (w, h) = outcome.pixel_size;
    assert_eq!(w, 672 * 2);
    let expected = 210.0 * f64::from(h) / f64::from(w);
    assert!((outcome.page.height_mm - expected).abs() < 1e-9);
    assert_eq!(
        std::fs::metadata(&outcome.path).unwrap().len() as usize,
        outcome.bytes
    );
    assert!(!state.is_exporting());
}

#[test]
fn blank_names_block_export_without_output() {
    let dir = temp_dir("export_blank");
    let state = named("Jean", "  ");
    let err = export_pdf(
        &state,
        &mut FixedAdvanceShaper::default(),
        &ExportSettings::default(),
        &dir,
    )
    .unwrap_err();
    assert!(matches!(err, CvError::Validation(_)));
    assert!(entries(&dir).is_empty());
}

#[test]
fn failed_render_leaves_nothing_behind_and_releases_the_flag() {
    let dir = temp_dir("export_bad_photo");
    let mut state = named("Jean", "Dupont");
    assert!(state.update_image(&ImageUpload::new("image/png", b"not a png".to_vec())));
    let err = export_pdf(
        &state,
        &mut FixedAdvanceShaper::default(),
        &ExportSettings::default(),
        &dir,
    );
    assert!(err.is_err());
    assert!(entries(&dir).is_empty());
    assert!(state.can_export());
}

#[test]
fn unwritable_destination_is_an_error() {
    let dir = temp_dir("export_missing").join("does-not-exist");
    let state = named("Jean", "Dupont");
    assert!(
        export_pdf(
            &state,
            &mut FixedAdvanceShaper::default(),
            &ExportSettings::default(),
            &dir,
        )
        .is_err()
    );
    assert!(!dir.exists());
}

#[test]
fn invalid_settings_are_rejected_before_rendering() {
    let dir = temp_dir("export_settings");
    let state = named("Jean", "Dupont");
    let mut settings = ExportSettings::default();
    settings.render.scale = 0.0;
    let err = export_pdf(&state, &mut FixedAdvanceShaper::default(), &settings, &dir).unwrap_err();
    assert!(matches!(err, CvError::Validation(_)));
    assert!(entries(&dir).is_empty());
}
