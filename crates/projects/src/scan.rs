//! Media folder scanning.
//!
//! A project's storage location holds three fixed subfolders: `photos/`,
//! `videos/` and `models/`. Refresh walks the files directly inside each
//! subfolder and rebuilds the media list from scratch, pairing files with
//! descriptions from the parsed `desc.txt`.

use std::{collections::HashMap, fs, path::Path};

use tracing::debug;

use crate::{
    descfile::DescriptionFile,
    types::{MediaItem, MediaKind},
};

/// Subfolders scanned under a storage root, with the nominal kind used
/// for files whose extension is not recognized.
pub const MEDIA_SUBFOLDERS: &[(&str, MediaKind)] = &[
    ("photos", MediaKind::Image),
    ("videos", MediaKind::Video),
    ("models", MediaKind::Model),
];

/// Classify a file by its extension (case-insensitive). `None` for
/// unknown or missing extensions.
#[must_use]
pub fn media_kind_for(path: &Path) -> Option<MediaKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "tif" | "tiff" => {
            Some(MediaKind::Image)
        },
        "mp4" | "mov" | "avi" | "mkv" | "webm" => Some(MediaKind::Video),
        "obj" | "fbx" | "gltf" | "glb" | "stl" | "dae" => Some(MediaKind::Model),
        _ => None,
    }
}

/// Build the full media list for a storage root.
///
/// Only regular files directly inside the three media subfolders are
/// listed; unreadable or absent subfolders contribute nothing. Each file's
/// description comes from `desc.txt` (full file name first, then the stem,
/// empty values skipped) and falls back to the file name itself.
#[must_use]
pub fn scan_media(root: &Path, desc: &DescriptionFile) -> Vec<MediaItem> {
    let mut media = Vec::new();
    for &(subfolder, nominal_kind) in MEDIA_SUBFOLDERS {
        let folder = root.join(subfolder);
        let Ok(entries) = fs::read_dir(&folder) else {
            continue;
        };
        for entry in entries.flatten() {
            if !entry.file_type().is_ok_and(|t| t.is_file()) {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let path = folder.join(&file_name);
            let kind = media_kind_for(&path).unwrap_or(nominal_kind);
            media.push(MediaItem {
                uri: path.to_string_lossy().into_owned(),
                description: describe(&desc.entries, &file_name),
                kind,
            });
        }
    }
    debug!(root = %root.display(), count = media.len(), "scanned media subfolders");
    media
}

/// Look up a file's description: full lowercased name first, then the
/// stem. Empty entry values are skipped, and the file name itself is the
/// final fallback.
fn describe(entries: &HashMap<String, String>, file_name: &str) -> String {
    let full_key = file_name.to_lowercase();
    let stem_key = Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_lowercase());
    entries
        .get(&full_key)
        .filter(|value| !value.is_empty())
        .or_else(|| {
            stem_key
                .as_ref()
                .and_then(|key| entries.get(key))
                .filter(|value| !value.is_empty())
        })
        .cloned()
        .unwrap_or_else(|| file_name.to_string())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, crate::descfile::parse_desc_file, std::fs};

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    fn sorted_uris(items: &[MediaItem]) -> Vec<String> {
        let mut uris: Vec<String> = items.iter().map(|m| m.uri.clone()).collect();
        uris.sort();
        uris
    }

    #[test]
    fn classifies_by_extension_case_insensitively() {
        assert_eq!(media_kind_for(Path::new("a.PNG")), Some(MediaKind::Image));
        assert_eq!(media_kind_for(Path::new("b.mkv")), Some(MediaKind::Video));
        assert_eq!(media_kind_for(Path::new("statue.OBJ")), Some(MediaKind::Model));
        assert_eq!(media_kind_for(Path::new("notes.xyz")), None);
        assert_eq!(media_kind_for(Path::new("no_extension")), None);
    }

    #[test]
    fn scans_all_three_subfolders() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["photos", "videos", "models"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
        }
        touch(&dir.path().join("photos").join("cat.png"));
        touch(&dir.path().join("videos").join("tour.mp4"));
        touch(&dir.path().join("models").join("statue.OBJ"));

        let media = scan_media(dir.path(), &DescriptionFile::default());
        assert_eq!(media.len(), 3);
        let kinds: Vec<MediaKind> = {
            let mut items = media.clone();
            items.sort_by(|a, b| a.uri.cmp(&b.uri));
            items.iter().map(|m| m.kind).collect()
        };
        // Sorted by uri: models/statue.OBJ, photos/cat.png, videos/tour.mp4.
        assert_eq!(kinds, vec![MediaKind::Model, MediaKind::Image, MediaKind::Video]);
    }

    #[test]
    fn unknown_extension_falls_back_to_subfolder_kind() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("photos")).unwrap();
        touch(&dir.path().join("photos").join("mystery.xyz"));

        let media = scan_media(dir.path(), &DescriptionFile::default());
        assert_eq!(media.len(), 1);
        assert_eq!(media[0].kind, MediaKind::Image);
    }

    #[test]
    fn known_extension_wins_over_subfolder() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("photos")).unwrap();
        touch(&dir.path().join("photos").join("misfiled.mp4"));

        let media = scan_media(dir.path(), &DescriptionFile::default());
        assert_eq!(media[0].kind, MediaKind::Video);
    }

    #[test]
    fn uri_is_the_full_joined_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("photos")).unwrap();
        touch(&dir.path().join("photos").join("cat.png"));

        let media = scan_media(dir.path(), &DescriptionFile::default());
        let expected = dir.path().join("photos").join("cat.png");
        assert_eq!(media[0].uri, expected.to_string_lossy());
    }

    #[test]
    fn descriptions_come_from_desc_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("photos")).unwrap();
        touch(&dir.path().join("photos").join("Cat.PNG"));
        touch(&dir.path().join("photos").join("dog.png"));
        touch(&dir.path().join("photos").join("bird.png"));

        let desc = parse_desc_file("cat.png: A cat\ndog: Good dog");
        let media = scan_media(dir.path(), &desc);
        let by_name = |needle: &str| {
            media
                .iter()
                .find(|m| m.uri.ends_with(needle))
                .unwrap()
                .description
                .clone()
        };
        // Full-name key, matched case-insensitively.
        assert_eq!(by_name("Cat.PNG"), "A cat");
        // Stem key.
        assert_eq!(by_name("dog.png"), "Good dog");
        // No entry: file name itself.
        assert_eq!(by_name("bird.png"), "bird.png");
    }

    #[test]
    fn empty_desc_values_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("photos")).unwrap();
        touch(&dir.path().join("photos").join("cat.png"));

        // Full-name entry is empty, stem entry holds the text.
        let desc = parse_desc_file("cat.png:\ncat: By stem");
        let media = scan_media(dir.path(), &desc);
        assert_eq!(media[0].description, "By stem");
    }

    #[test]
    fn skips_directories_and_missing_subfolders() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("photos")).unwrap();
        fs::create_dir(dir.path().join("photos").join("nested")).unwrap();
        touch(&dir.path().join("photos").join("nested").join("deep.png"));
        // No videos/ or models/ folders at all.

        let media = scan_media(dir.path(), &DescriptionFile::default());
        assert!(media.is_empty());
    }

    #[test]
    fn empty_root_yields_empty_media() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_media(dir.path(), &DescriptionFile::default()).is_empty());
    }

    #[test]
    fn rescan_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("photos")).unwrap();
        fs::create_dir(dir.path().join("models")).unwrap();
        touch(&dir.path().join("photos").join("a.png"));
        touch(&dir.path().join("photos").join("b.gif"));
        touch(&dir.path().join("models").join("c.stl"));

        let desc = parse_desc_file("a.png: First");
        let first = scan_media(dir.path(), &desc);
        let second = scan_media(dir.path(), &desc);
        assert_eq!(sorted_uris(&first), sorted_uris(&second));
        assert_eq!(first.len(), 3);
    }
}
