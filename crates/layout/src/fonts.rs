//! Font discovery and lookup.
//!
//! `FontLibrary` resolves a weight to a concrete font program. Fonts added
//! directly with [`FontLibrary::add_font_data`] take precedence; with the
//! `system-fonts` feature the fontdb database is consulted next. When nothing
//! matches, callers get `None` and fall back to approximate metrics.

use folio_scene::FontFace;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    SemiBold,
    Bold,
    Black,
}

impl FontWeight {
    pub fn numeric(&self) -> u16 {
        match self {
            FontWeight::Regular => 400,
            FontWeight::SemiBold => 600,
            FontWeight::Bold => 700,
            FontWeight::Black => 900,
        }
    }
}

#[derive(Clone)]
struct RegisteredFace {
    weight: u16,
    face: FontFace,
}

#[derive(Clone)]
pub struct FontLibrary {
    #[cfg(feature = "system-fonts")]
    db: Arc<RwLock<fontdb::Database>>,
    family: Option<String>,
    registered: Arc<RwLock<Vec<RegisteredFace>>>,
    cache: Arc<RwLock<HashMap<FontWeight, Option<FontFace>>>>,
}

impl fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered = self.registered.read().map(|r| r.len()).unwrap_or(0);
        let mut s = f.debug_struct("FontLibrary");
        s.field("family", &self.family)
            .field("registered", &registered);
        #[cfg(feature = "system-fonts")]
        s.field("system_faces", &self.db.read().map(|db| db.len()).unwrap_or(0));
        s.finish()
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLibrary {
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "system-fonts")]
            db: Arc::new(RwLock::new(fontdb::Database::new())),
            family: None,
            registered: Arc::new(RwLock::new(Vec::new())),
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Preferred family name; sans-serif is always the fallback.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    #[cfg(feature = "system-fonts")]
    pub fn with_system_fonts(self, enable: bool) -> Self {
        if enable && let Ok(mut db) = self.db.write() {
            db.load_system_fonts();
            log::debug!("Loaded {} system font faces", db.len());
        }
        self.invalidate();
        self
    }

    #[cfg(feature = "system-fonts")]
    pub fn add_font_dir<P: AsRef<std::path::Path>>(&self, path: P) {
        if let Ok(mut db) = self.db.write() {
            db.load_fonts_dir(path);
        }
        self.invalidate();
    }

    /// Registers a font program. Returns `false` if it cannot be parsed.
    pub fn add_font_data(&self, data: Vec<u8>) -> bool {
        let weight = match ttf_parser::Face::parse(&data, 0) {
            Ok(face) => face.weight().to_number(),
            Err(e) => {
                log::warn!("Ignoring unparseable font data ({} bytes): {}", data.len(), e);
                return false;
            }
        };
        if let Ok(mut registered) = self.registered.write() {
            registered.push(RegisteredFace {
                weight,
                face: FontFace {
                    data: Arc::new(data),
                    index: 0,
                },
            });
        }
        self.invalidate();
        true
    }

    /// The best face for `weight`, or `None` when no font is available.
    pub fn resolve(&self, weight: FontWeight) -> Option<FontFace> {
        if let Ok(cache) = self.cache.read()
            && let Some(hit) = cache.get(&weight)
        {
            return hit.clone();
        }

        let resolved = self
            .resolve_registered(weight)
            .or_else(|| self.resolve_system(weight));
        if resolved.is_none() {
            log::debug!("No font for weight {}; using fallback metrics", weight.numeric());
        }
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(weight, resolved.clone());
        }
        resolved
    }

    fn resolve_registered(&self, weight: FontWeight) -> Option<FontFace> {
        let wanted = weight.numeric() as i32;
        self.registered
            .read()
            .ok()?
            .iter()
            .min_by_key(|r| (r.weight as i32 - wanted).abs())
            .map(|r| r.face.clone())
    }

    #[cfg(feature = "system-fonts")]
    fn resolve_system(&self, weight: FontWeight) -> Option<FontFace> {
        let db = self.db.read().ok()?;
        let named = self.family.as_deref().map(fontdb::Family::Name);
        let families: Vec<fontdb::Family<'_>> = named
            .into_iter()
            .chain(std::iter::once(fontdb::Family::SansSerif))
            .collect();
        let id = db.query(&fontdb::Query {
            families: &families,
            weight: fontdb::Weight(weight.numeric()),
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        })?;
        let info = db.face(id)?;
        let data: Vec<u8> = match &info.source {
            fontdb::Source::Binary(bytes) => bytes.as_ref().as_ref().to_vec(),
            fontdb::Source::File(path) => match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::warn!("Failed to read font file {}: {}", path.display(), e);
                    return None;
                }
            },
            _ => return None,
        };
        log::debug!("Resolved weight {} to {}", weight.numeric(), info.post_script_name);
        Some(FontFace {
            data: Arc::new(data),
            index: info.index,
        })
    }

    #[cfg(not(feature = "system-fonts"))]
    fn resolve_system(&self, _weight: FontWeight) -> Option<FontFace> {
        None
    }

    fn invalidate(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }
}
