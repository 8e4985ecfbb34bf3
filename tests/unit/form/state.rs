use super::*;
use crate::composition::model::Role;

fn png_upload() -> ImageUpload {
    ImageUpload::new("image/png", vec![0x89, b'P', b'N', b'G'])
}

#[test]
fn new_state_is_empty_on_template1() {
    let s = FormState::new();
    assert_eq!(s.record(), &ResumeRecord::default());
    assert!(s.photo().is_none());
    assert_eq!(s.template(), TemplateId::Template1);
    assert_eq!(s.revision(), 0);
    assert!(!s.can_export());
}

#[test]
fn update_field_changes_record_and_preview() {
    let mut s = FormState::new();
    s.update_field(Field::FirstName, "Jean");
    s.update_field(Field::LastName, "Dupont");
    assert_eq!(s.revision(), 2);
    assert_eq!(s.record().first_name, "Jean");
    assert_eq!(
        s.preview().find(Role::Name).unwrap().text_content(),
        "Jean Dupont"
    );
    s.update_field(Field::FirstName, "Marie");
    assert_eq!(s.record().first_name, "Marie");
    assert_eq!(s.record().last_name, "Dupont");
}

#[test]
fn non_image_upload_keeps_previous_photo() {
    let mut s = FormState::new();
    assert!(!s.update_image(&ImageUpload::new("application/pdf", vec![1])));
    assert!(s.photo().is_none());

    assert!(s.update_image(&png_upload()));
    let before = s.photo().cloned();
    let rev = s.revision();
    assert!(!s.update_image(&ImageUpload::new("text/plain", b"hi".to_vec())));
    assert_eq!(s.photo().cloned(), before);
    assert_eq!(s.revision(), rev);
}

#[test]
fn new_upload_replaces_photo() {
    let mut s = FormState::new();
    assert!(s.update_image(&png_upload()));
    assert!(s.update_image(&ImageUpload::new("image/jpeg", vec![0xff, 0xd8])));
    assert_eq!(s.photo().unwrap().mime(), "image/jpeg");
    s.clear_image();
    assert!(s.photo().is_none());
}

#[test]
fn template_switch_preserves_record_and_photo() {
    let mut s = FormState::new();
    s.update_field(Field::Skills, "Rust");
    s.update_image(&png_upload());
    let record = s.record().clone();
    let photo = s.photo().cloned();
    for t in TemplateId::ALL {
        s.select_template(t);
        assert_eq!(s.template(), t);
        assert_eq!(s.record(), &record);
        assert_eq!(s.photo().cloned(), photo);
        assert_eq!(s.preview().template, t);
    }
}

#[test]
fn missing_required_lists_blank_required_fields() {
    let mut s = FormState::new();
    assert_eq!(s.missing_required(), Field::REQUIRED.to_vec());
    s.update_field(Field::LastName, "Dupont");
    s.update_field(Field::Title, "   ");
    assert_eq!(s.missing_required(), [Field::FirstName, Field::Title]);
}

#[test]
fn export_needs_both_names() {
    let mut s = FormState::new();
    s.update_field(Field::FirstName, "Jean");
    assert!(!s.can_export());
    assert!(s.begin_export().is_err());
    s.update_field(Field::LastName, " ");
    assert!(!s.can_export());
    s.update_field(Field::LastName, "Dupont");
    assert!(s.can_export());
}

#[test]
fn busy_flag_blocks_second_export_until_guard_drops() {
    let mut s = FormState::new();
    s.update_field(Field::FirstName, "Jean");
    s.update_field(Field::LastName, "Dupont");
    {
        let _guard = s.begin_export().unwrap();
        assert!(s.is_exporting());
        assert!(!s.can_export());
        let err = s.begin_export().unwrap_err();
        assert!(err.to_string().contains("already in progress"));
    }
    assert!(!s.is_exporting());
    assert!(s.can_export());
}

#[test]
fn busy_flag_is_released_when_export_fails() {
    let mut s = FormState::new();
    s.update_field(Field::FirstName, "Jean");
    s.update_field(Field::LastName, "Dupont");
    let run = |s: &FormState| -> CvResult<()> {
        let _guard = s.begin_export()?;
        Err(CvError::export("disk full"))
    };
    assert!(run(&s).is_err());
    assert!(s.can_export());
}
