//! Enrichment of `/library/metadata/` responses.
//!
//! Plex clients show the `title` of a media rendition in the version picker
//! and the `displayTitle` of a stream in the track pickers. Many libraries
//! leave the rendition title empty and only put the useful hint ("Extended",
//! "Commentary") in places the clients never render. The rewrite copies those
//! hints to where they are shown.

use axum::body::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::plex::{Container, Media, Stream};

/// Title used when a rendition has no video stream to derive one from.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Trailing parenthesised group of a video stream's display title,
/// e.g. `1080p (HDR10)`.
static TRAILING_GROUP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".* \((.*)\)$").expect("trailing group regex should compile"));

/// Rewrites a metadata response body.
///
/// Anything that doesn't decode as a container with a metadata list is
/// returned untouched, as is the original body if re-encoding fails.
pub fn rewrite_metadata(data: Bytes) -> Bytes {
    let mut container = match serde_json::from_slice::<Container>(&data) {
        Ok(container) => container,
        Err(e) => {
            log::warn!("Failed to parse metadata: {}", e);
            return data;
        }
    };

    if !enrich(&mut container) {
        return data;
    }

    match serde_json::to_vec(&container) {
        Ok(encoded) => Bytes::from(encoded),
        Err(e) => {
            log::warn!("Failed to encode rewritten metadata: {}", e);
            data
        }
    }
}

/// Applies both enrichment rules in place. Returns `false` if there was no
/// metadata list to work on.
pub fn enrich(container: &mut Container) -> bool {
    let Some(metadata) = container
        .media_container
        .as_mut()
        .and_then(|mc| mc.metadata.as_mut())
    else {
        return false;
    };

    for media in metadata
        .iter_mut()
        .filter_map(|md| md.media.as_mut())
        .flatten()
    {
        if media.parts.as_ref().is_none() {
            continue;
        }

        if media.title.as_str().is_empty() {
            let title = derive_media_title(media);
            log::debug!("Derived media title: {}", title);
            media.title = title.into();
        }

        for stream in media
            .parts
            .as_mut()
            .into_iter()
            .flatten()
            .filter_map(|part| part.streams.as_mut())
            .flatten()
        {
            annotate_display_title(stream);
        }
    }

    true
}

/// Builds a title for a rendition from its first titled video stream and its
/// container format.
pub fn derive_media_title(media: &Media) -> String {
    let container = media.container.as_str();

    let video = media
        .parts
        .as_ref()
        .into_iter()
        .flatten()
        .filter_map(|part| part.streams.as_ref())
        .flatten()
        .find(|stream| stream.is_video() && !stream.display_title.as_str().is_empty());

    let Some(video) = video else {
        return UNKNOWN_TITLE.to_string();
    };

    let hint = TRAILING_GROUP_PATTERN
        .captures(video.display_title.as_str())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|hint| !hint.is_empty());

    match hint {
        Some(hint) => format!("{} {}", hint, container),
        None => container.to_string(),
    }
}

/// Appends a stream's own `title` to its `displayTitle`, if both are set.
///
/// Not idempotent: a second pass appends the suffix again.
pub fn annotate_display_title(stream: &mut Stream) {
    let title = stream.title.as_str();
    if title.is_empty() {
        return;
    }

    if let Some(display_title) = stream.display_title.as_mut() {
        if !display_title.is_empty() {
            *display_title = format!("{} ({})", display_title, title);
        }
    }
}
