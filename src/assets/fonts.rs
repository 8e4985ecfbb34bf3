use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use usvg::fontdb;

use crate::{
    foundation::error::{CvError, CvResult},
    template::descriptor::FontKind,
};

/// Environment variable naming an extra directory of `.ttf/.otf/.ttc` files.
pub const FONT_DIR_ENV: &str = "CVPRESS_FONT_DIR";

const SANS_NAMES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Helvetica",
    "Arial",
];
const SERIF_NAMES: &[&str] = &[
    "DejaVu Serif",
    "Liberation Serif",
    "Noto Serif",
    "Georgia",
    "Times New Roman",
];

/// One of the four faces a template can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceKey {
    pub kind: FontKind,
    pub bold: bool,
}

impl FaceKey {
    pub const ALL: [FaceKey; 4] = [
        FaceKey::new(FontKind::Sans, false),
        FaceKey::new(FontKind::Sans, true),
        FaceKey::new(FontKind::Serif, false),
        FaceKey::new(FontKind::Serif, true),
    ];

    pub const fn new(kind: FontKind, bold: bool) -> Self {
        Self { kind, bold }
    }
}

/// Raw font file plus the face selected inside it.
#[derive(Debug)]
pub struct FontFace {
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection file.
    pub index: u32,
    /// Family name as reported by the font.
    pub family: String,
}

/// Resolved faces for every [`FaceKey`].
#[derive(Clone, Debug)]
pub struct FontSet {
    faces: HashMap<FaceKey, Arc<FontFace>>,
}

impl FontSet {
    /// Load system fonts plus fonts from [`FONT_DIR_ENV`] and `extra_dirs`, then resolve faces.
    pub fn discover(extra_dirs: &[PathBuf]) -> CvResult<Self> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        let env_dir = std::env::var_os(FONT_DIR_ENV).map(PathBuf::from);
        for dir in font_dirs(env_dir, extra_dirs) {
            load_fonts_from_dir(&mut db, &dir);
        }
        tracing::debug!(faces = db.len(), "font database loaded");
        Self::from_database(&db)
    }

    /// Build a set from a single font file, used for every face.
    pub fn from_font_bytes(bytes: Vec<u8>) -> CvResult<Self> {
        let mut db = fontdb::Database::new();
        db.load_font_data(bytes);
        Self::from_database(&db)
    }

    pub fn from_database(db: &fontdb::Database) -> CvResult<Self> {
        let mut faces = HashMap::new();
        let mut loaded: Vec<(fontdb::ID, Arc<FontFace>)> = Vec::new();
        for key in FaceKey::ALL {
            let id = query_face(db, key)
                .or_else(|| query_face(db, FaceKey::new(FontKind::Sans, key.bold)))
                .or_else(|| db.faces().next().map(|f| f.id))
                .ok_or_else(|| CvError::render("no usable fonts found"))?;
            let face = match loaded.iter().find(|(loaded_id, _)| *loaded_id == id) {
                Some((_, face)) => face.clone(),
                None => {
                    let face = Arc::new(load_face(db, id)?);
                    loaded.push((id, face.clone()));
                    face
                }
            };
            tracing::debug!(?key, family = %face.family, "font face resolved");
            faces.insert(key, face);
        }
        Ok(Self { faces })
    }

    /// Face for `key`; every key is resolved at construction.
    pub fn face(&self, key: FaceKey) -> CvResult<Arc<FontFace>> {
        self.faces
            .get(&key)
            .cloned()
            .ok_or_else(|| CvError::render(format!("font face {key:?} is not loaded")))
    }
}

/// Directories to scan, in order, each listed once.
fn font_dirs(env_dir: Option<PathBuf>, extra_dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = env_dir.into_iter().collect();
    for dir in extra_dirs {
        if !dirs.contains(dir) {
            dirs.push(dir.clone());
        }
    }
    dirs
}

fn query_face(db: &fontdb::Database, key: FaceKey) -> Option<fontdb::ID> {
    let (names, generic) = match key.kind {
        FontKind::Sans => (SANS_NAMES, fontdb::Family::SansSerif),
        FontKind::Serif => (SERIF_NAMES, fontdb::Family::Serif),
    };
    let mut families: Vec<fontdb::Family<'_>> =
        names.iter().map(|n| fontdb::Family::Name(*n)).collect();
    families.push(generic);

    let query = fontdb::Query {
        families: &families,
        weight: if key.bold {
            fontdb::Weight::BOLD
        } else {
            fontdb::Weight::NORMAL
        },
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };
    db.query(&query)
}

fn load_face(db: &fontdb::Database, id: fontdb::ID) -> CvResult<FontFace> {
    let family = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_default();
    let (bytes, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| CvError::render(format!("font data for '{family}' is unavailable")))?;
    Ok(FontFace {
        bytes: Arc::new(bytes),
        index,
        family,
    })
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(err) = db.load_font_file(&path) {
            tracing::debug!(path = %path.display(), %err, "skipping font file");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
