/// A voice offered by a speech synthesizer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Voice {
    /// Human-readable voice name, used for preference matching.
    pub name: String,
    /// Language tag the voice speaks.
    pub lang: String,
}

impl Voice {
    /// Creates a voice descriptor.
    #[inline]
    pub fn new<N: Into<String>, L: Into<String>>(name: N, lang: L) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

/// Name fragments that mark a voice as preferred, checked in order
/// against the lowercased voice name.
const PREFERRED_NAME_HINTS: &[&str] = &["female", "susan", "zira"];

/// Picks the preferred voice from the available set.
///
/// The first voice whose name contains one of the known fragments
/// (case-insensitive) wins. `None` means no voice stood out and the
/// engine default should be used.
pub fn preferred_voice(voices: &[Voice]) -> Option<&Voice> {
    voices.iter().find(|voice| {
        let name = voice.name.to_lowercase();
        PREFERRED_NAME_HINTS.iter().any(|hint| name.contains(hint))
    })
}
