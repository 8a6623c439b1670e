//! SSML documents for Azure Speech.

use crate::voices::VoiceSelection;

/// Escapes the five XML special characters.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Relative rate for `<prosody rate>`: 1.0 is `+0%`, 1.25 is `+25%`.
fn rate_percent(speaking_rate: f64) -> String {
    let percent = ((speaking_rate.clamp(0.5, 2.0) - 1.0) * 100.0).round() as i64;
    format!("{:+}%", percent)
}

/// Relative pitch for `<prosody pitch>` in semitones.
fn pitch_semitones(pitch: f64) -> String {
    let semitones = pitch.clamp(-12.0, 12.0).round() as i64;
    format!("{:+}st", semitones)
}

/// Builds a single-voice SSML document. `text` is escaped here.
pub fn build_ssml(voice: VoiceSelection, text: &str, speaking_rate: f64, pitch: f64) -> String {
    format!(
        "<speak version=\"1.0\" xmlns=\"http://www.w3.org/2001/10/synthesis\" xml:lang=\"{lang}\">\
         <voice name=\"{name}\">\
         <prosody rate=\"{rate}\" pitch=\"{pitch}\">{text}</prosody>\
         </voice></speak>",
        lang = voice.language_code,
        name = voice.name,
        rate = rate_percent(speaking_rate),
        pitch = pitch_semitones(pitch),
        text = escape_xml(text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voices::AZURE_VOICES;

    #[test]
    fn escapes_all_special_characters() {
        assert_eq!(
            escape_xml("<script>&\"'"),
            "&lt;script&gt;&amp;&quot;&apos;"
        );
        assert_eq!(escape_xml("வணக்கம்"), "வணக்கம்");
    }

    #[test]
    fn neutral_prosody_is_explicit_zero() {
        let ssml = build_ssml(AZURE_VOICES.select("ta-IN"), "hi", 1.0, 0.0);
        assert!(ssml.contains("<prosody rate=\"+0%\" pitch=\"+0st\">hi</prosody>"));
        assert!(ssml.contains("xml:lang=\"ta-IN\""));
        assert!(ssml.contains("<voice name=\"ta-IN-PallaviNeural\">"));
    }

    #[test]
    fn prosody_reflects_rate_and_pitch() {
        let ssml = build_ssml(AZURE_VOICES.select("en-US"), "hi", 1.25, -3.0);
        assert!(ssml.contains("rate=\"+25%\""));
        assert!(ssml.contains("pitch=\"-3st\""));
    }

    #[test]
    fn text_is_escaped_inside_document() {
        let ssml = build_ssml(AZURE_VOICES.select("en-US"), "<script>&\"'", 1.0, 0.0);
        assert!(ssml.contains("&lt;script&gt;&amp;&quot;&apos;"));
        assert!(!ssml.contains("<script>"));
    }
}
