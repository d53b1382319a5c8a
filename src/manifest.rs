use std::path::Path;

use crate::errors::ManifestError;

const WATCH_URL: &str = "https://youtube.com/watch?v=";

/// Flattened manifest: every video id in category order, then list order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<(String, String)>,
}

impl Manifest {
    pub fn parse(text: &str) -> Result<Manifest, ManifestError> {
        let document = json::parse(text)?;
        let kinds = &document["videos"];
        if !kinds.is_object() {
            return Err(ManifestError::MissingVideos);
        }

        let mut entries = Vec::new();
        for (kind, videos) in kinds.entries() {
            if !videos.is_array() {
                return Err(ManifestError::BadCategory(kind.to_string()));
            }
            for video in videos.members() {
                let id = if let Some(id) = video.as_str() {
                    id.to_string()
                } else if video.is_number() {
                    video.dump()
                } else {
                    return Err(ManifestError::BadVideoId(kind.to_string()));
                };
                entries.push((kind.to_string(), id));
            }
        }
        Ok(Manifest { entries })
    }

    /// (category, video id) pairs.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn urls(&self) -> Vec<String> {
        self.entries()
            .iter()
            .map(|(_, id)| format!("{WATCH_URL}{id}"))
            .collect()
    }
}

pub fn load(path: &Path) -> Result<Manifest, ManifestError> {
    log::info!("Loading manifest {}", path.display());
    let text = std::fs::read_to_string(path)
        .map_err(|e| ManifestError::Read(path.to_path_buf(), e))?;
    let manifest = Manifest::parse(&text)?;
    log::info!("Loaded {} video urls", manifest.len());
    Ok(manifest)
}
