//! Voice catalog for speech synthesis
//!
//! Maps human-readable labels (what users pick and what presets store) to
//! the voice identifiers understood by the synthesis backend.

/// A selectable synthesis voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    /// Display label, e.g. "Jenny (US, Female)"
    pub label: &'static str,

    /// Backend voice identifier, e.g. "en-US-JennyNeural"
    pub id: &'static str,
}

const CATALOG: [Voice; 7] = [
    Voice { label: "Jenny (US, Female)", id: "en-US-JennyNeural" },
    Voice { label: "Aria (US, Female)", id: "en-US-AriaNeural" },
    Voice { label: "Guy (US, Male)", id: "en-US-GuyNeural" },
    Voice { label: "Ryan (UK, Male)", id: "en-GB-RyanNeural" },
    Voice { label: "Thomas (UK, Male)", id: "en-GB-ThomasNeural" },
    Voice { label: "Prabhat (India, Male)", id: "en-IN-PrabhatNeural" },
    Voice { label: "Neerja (India, Female)", id: "en-IN-NeerjaNeural" },
];

/// All voices, in display order
pub fn all() -> &'static [Voice] {
    &CATALOG
}

/// The voice used when nothing else has been chosen (first catalog entry)
pub fn default_voice() -> &'static Voice {
    &CATALOG[0]
}

/// Find a voice by its display label (exact match)
pub fn lookup(label: &str) -> Option<&'static Voice> {
    CATALOG.iter().find(|v| v.label == label)
}

/// Find a voice by its backend identifier
pub fn lookup_id(id: &str) -> Option<&'static Voice> {
    CATALOG.iter().find(|v| v.id == id)
}
