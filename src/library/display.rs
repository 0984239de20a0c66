use std::path::Path;

use crate::config::TrackDisplayField;

/// Compose a display string from track metadata in the order given by `fields`.
///
/// Blank fields are skipped. When nothing is left the title is returned as-is,
/// so a track never renders as an empty line.
pub fn display_from_fields(
    path: &Path,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let non_blank = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
    let stem = path.file_stem().and_then(|s| s.to_str());

    let parts: Vec<String> = fields
        .iter()
        .flat_map(|field| match field {
            TrackDisplayField::Display => vec![non_blank(artist), non_blank(Some(title))],
            TrackDisplayField::Title => vec![non_blank(Some(title))],
            TrackDisplayField::Artist => vec![non_blank(artist)],
            TrackDisplayField::Album => vec![non_blank(album)],
            TrackDisplayField::Filename => vec![non_blank(stem)],
            TrackDisplayField::Path => vec![Some(path.display().to_string())],
        })
        .flatten()
        .collect();

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}
