//! Static per-locale voice tables for the vendors that pick voices by name.

use crate::config::normalize_locale;

/// A vendor voice and the locale it speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceSelection {
    pub language_code: &'static str,
    pub name: &'static str,
}

/// A locale-keyed voice table with an English fallback.
#[derive(Debug)]
pub struct VoiceTable {
    entries: &'static [VoiceSelection],
    fallback: VoiceSelection,
}

impl VoiceTable {
    /// Voice for `language_code`, or the English fallback when the locale is
    /// not in the table.
    pub fn select(&self, language_code: &str) -> VoiceSelection {
        let wanted = normalize_locale(language_code);
        self.entries
            .iter()
            .find(|entry| normalize_locale(entry.language_code) == wanted)
            .copied()
            .unwrap_or(self.fallback)
    }
}

const fn voice(language_code: &'static str, name: &'static str) -> VoiceSelection {
    VoiceSelection {
        language_code,
        name,
    }
}

pub static GOOGLE_VOICES: VoiceTable = VoiceTable {
    entries: &[
        voice("ta-IN", "ta-IN-Wavenet-A"),
        voice("hi-IN", "hi-IN-Wavenet-A"),
        voice("te-IN", "te-IN-Standard-A"),
        voice("kn-IN", "kn-IN-Wavenet-A"),
        voice("ml-IN", "ml-IN-Wavenet-A"),
        voice("bn-IN", "bn-IN-Wavenet-A"),
        voice("mr-IN", "mr-IN-Wavenet-A"),
        voice("gu-IN", "gu-IN-Wavenet-A"),
        voice("en-IN", "en-IN-Wavenet-D"),
        voice("en-US", "en-US-Wavenet-D"),
    ],
    fallback: voice("en-US", "en-US-Wavenet-D"),
};

pub static AZURE_VOICES: VoiceTable = VoiceTable {
    entries: &[
        voice("ta-IN", "ta-IN-PallaviNeural"),
        voice("hi-IN", "hi-IN-SwaraNeural"),
        voice("te-IN", "te-IN-ShrutiNeural"),
        voice("kn-IN", "kn-IN-SapnaNeural"),
        voice("ml-IN", "ml-IN-SobhanaNeural"),
        voice("bn-IN", "bn-IN-TanishaaNeural"),
        voice("mr-IN", "mr-IN-AarohiNeural"),
        voice("gu-IN", "gu-IN-DhwaniNeural"),
        voice("en-IN", "en-IN-NeerjaNeural"),
        voice("en-US", "en-US-JennyNeural"),
    ],
    fallback: voice("en-US", "en-US-JennyNeural"),
};
