//! DASH manifest parsing for Reddit-hosted video.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use redditembed_core::VideoError;
use std::collections::HashMap;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamKind {
    Video,
    Audio,
}

impl StreamKind {
    fn from_type(value: &str) -> Option<Self> {
        if value.starts_with("video") {
            Some(Self::Video)
        } else if value.starts_with("audio") {
            Some(Self::Audio)
        } else {
            None
        }
    }
}

/// A single downloadable stream from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representation {
    pub bandwidth: u64,
    pub height: Option<u32>,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashManifest {
    pub video: Vec<Representation>,
    pub audio: Option<Representation>,
}

#[derive(Debug, Default)]
struct PendingRepresentation {
    kind: Option<StreamKind>,
    bandwidth: u64,
    height: Option<u32>,
    base_url: Option<String>,
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, VideoError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| VideoError::ManifestInvalid {
            details: e.to_string(),
        })?;
        if attr.key.local_name().as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| VideoError::ManifestInvalid {
                    details: e.to_string(),
                })?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn element_kind(element: &BytesStart<'_>) -> Result<Option<StreamKind>, VideoError> {
    if let Some(kind) = attribute(element, b"contentType")?.and_then(|v| StreamKind::from_type(&v)) {
        return Ok(Some(kind));
    }
    Ok(attribute(element, b"mimeType")?.and_then(|v| StreamKind::from_type(&v)))
}

fn start_representation(
    element: &BytesStart<'_>,
    set_kind: Option<StreamKind>,
) -> Result<PendingRepresentation, VideoError> {
    let height = attribute(element, b"height")?.and_then(|h| h.parse().ok());
    let kind = element_kind(element)?.or(set_kind).or_else(|| {
        if height.is_some() {
            Some(StreamKind::Video)
        } else if attribute(element, b"audioSamplingRate").ok().flatten().is_some() {
            Some(StreamKind::Audio)
        } else {
            None
        }
    });

    Ok(PendingRepresentation {
        kind,
        bandwidth: attribute(element, b"bandwidth")?
            .and_then(|b| b.parse().ok())
            .unwrap_or(0),
        height,
        base_url: None,
    })
}

impl DashManifest {
    /// Parse an MPD document, resolving stream locations against
    /// `manifest_url`.
    pub fn parse(xml: &str, manifest_url: &str) -> Result<Self, VideoError> {
        let base = Url::parse(manifest_url).map_err(|e| VideoError::ManifestInvalid {
            details: format!("bad manifest URL {}: {}", manifest_url, e),
        })?;

        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut manifest = DashManifest::default();
        let mut saw_root = false;
        let mut set_kind: Option<StreamKind> = None;
        let mut pending: Option<PendingRepresentation> = None;
        let mut in_base_url = false;

        loop {
            let event = reader.read_event().map_err(|e| VideoError::ManifestInvalid {
                details: format!("at byte {}: {}", reader.buffer_position(), e),
            })?;

            match event {
                Event::Start(element) => match element.local_name().as_ref() {
                    b"MPD" => saw_root = true,
                    b"AdaptationSet" => set_kind = element_kind(&element)?,
                    b"Representation" => {
                        pending = Some(start_representation(&element, set_kind)?);
                    }
                    b"BaseURL" => in_base_url = pending.is_some(),
                    _ => {}
                },
                // An empty Representation has no BaseURL and nothing to download.
                Event::Empty(element) if element.local_name().as_ref() == b"MPD" => {
                    saw_root = true
                }
                Event::Text(text) if in_base_url => {
                    let value = text.unescape().map_err(|e| VideoError::ManifestInvalid {
                        details: e.to_string(),
                    })?;
                    if let Some(representation) = pending.as_mut() {
                        representation.base_url = Some(value.trim().to_string());
                    }
                }
                Event::End(element) => match element.local_name().as_ref() {
                    b"BaseURL" => in_base_url = false,
                    b"AdaptationSet" => set_kind = None,
                    b"Representation" => {
                        if let Some(done) = pending.take() {
                            manifest.push(done, &base);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_root {
            return Err(VideoError::ManifestInvalid {
                details: "missing MPD root element".to_string(),
            });
        }
        Ok(manifest)
    }

    fn push(&mut self, pending: PendingRepresentation, base: &Url) {
        let Some(location) = pending.base_url else {
            return;
        };
        let Ok(url) = base.join(&location) else {
            tracing::debug!("Skipping unresolvable representation {}", location);
            return;
        };
        let representation = Representation {
            bandwidth: pending.bandwidth,
            height: pending.height,
            url: url.to_string(),
        };

        match pending.kind {
            Some(StreamKind::Audio) => {
                let better = self
                    .audio
                    .as_ref()
                    .map_or(true, |current| representation.bandwidth > current.bandwidth);
                if better {
                    self.audio = Some(representation);
                }
            }
            Some(StreamKind::Video) => self.video.push(representation),
            None => tracing::debug!("Skipping representation of unknown type: {}", url),
        }
    }

    /// Video stream URLs, best quality first, keeping only the highest
    /// bandwidth stream at each height.
    pub fn video_candidates(&self) -> Vec<String> {
        let mut best: HashMap<Option<u32>, &Representation> = HashMap::new();
        for representation in &self.video {
            best.entry(representation.height)
                .and_modify(|current| {
                    if representation.bandwidth > current.bandwidth {
                        *current = representation;
                    }
                })
                .or_insert(representation);
        }

        let mut ranked: Vec<&Representation> = best.into_values().collect();
        ranked.sort_by(|a, b| {
            b.height
                .cmp(&a.height)
                .then_with(|| b.bandwidth.cmp(&a.bandwidth))
        });
        ranked.into_iter().map(|r| r.url.clone()).collect()
    }

    pub fn audio_url(&self) -> Option<&str> {
        self.audio.as_ref().map(|audio| audio.url.as_str())
    }
}
