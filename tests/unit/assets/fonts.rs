use super::*;

#[test]
fn empty_database_is_a_render_error() {
    let db = fontdb::Database::new();
    let err = FontSet::from_database(&db).unwrap_err();
    assert!(matches!(err, CvError::Render(_)), "{err}");
}

#[test]
fn garbage_font_bytes_are_rejected() {
    assert!(FontSet::from_font_bytes(b"definitely not a font".to_vec()).is_err());
}

#[test]
fn face_keys_cover_both_families_and_weights() {
    let keys: std::collections::HashSet<FaceKey> = FaceKey::ALL.into_iter().collect();
    assert_eq!(keys.len(), 4);
    assert!(keys.contains(&FaceKey::new(FontKind::Serif, true)));
}

#[test]
fn missing_font_dir_is_ignored() {
    let mut db = fontdb::Database::new();
    load_fonts_from_dir(&mut db, Path::new("/nonexistent/cvpress-fonts"));
    assert_eq!(db.len(), 0);
}

#[test]
fn font_dirs_are_scanned_once_each() {
    let env = PathBuf::from("/fonts/env");
    let dirs = font_dirs(
        Some(env.clone()),
        &[env.clone(), PathBuf::from("/fonts/extra"), PathBuf::from("/fonts/extra")],
    );
    assert_eq!(dirs, [env, PathBuf::from("/fonts/extra")]);
    assert!(font_dirs(None, &[]).is_empty());
}
