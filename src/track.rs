//! Track identifiers and the metadata the playback source reports for them.
//!
//! The index never looks at metadata; it is only used when presenting
//! patterns to a person.

use serde::{Deserialize, Serialize};

/// Opaque track identifier as reported by the playback source.
pub type TrackId = String;

/// Display metadata for one track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackMeta {
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    /// 0-100, as reported by the source.
    pub popularity: u8,
}

impl TrackMeta {
    /// `"Artist A, Artist B - Name"`, or just the name without artists.
    /// `None` when the source sent no name.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        if self.name.is_empty() {
            return None;
        }
        if self.artists.is_empty() {
            return Some(self.name.clone());
        }
        Some(format!("{} - {}", self.artists.join(", "), self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let meta = TrackMeta {
            name: "So What".to_string(),
            artists: vec!["Miles Davis".to_string(), "John Coltrane".to_string()],
            album: "Kind of Blue".to_string(),
            popularity: 71,
        };
        assert_eq!(meta.display_name().as_deref(), Some("Miles Davis, John Coltrane - So What"));

        let bare = TrackMeta { name: "Untitled".to_string(), ..TrackMeta::default() };
        assert_eq!(bare.display_name().as_deref(), Some("Untitled"));

        assert_eq!(TrackMeta::default().display_name(), None);
    }

    #[test]
    fn test_partial_metadata_deserializes() {
        let meta: TrackMeta = serde_json::from_str(r#"{"name": "Blue in Green"}"#).unwrap();

        assert_eq!(meta.name, "Blue in Green");
        assert!(meta.artists.is_empty());
        assert_eq!(meta.popularity, 0);
    }
}
