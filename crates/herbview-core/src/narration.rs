//! Spoken narration of plant records.
//!
//! Speech output lives behind [`NarrationPort`] so that hosts can plug in a
//! platform synthesizer while tests use a recording port.

use crate::plant::PlantRecord;

/// Platform speech output.
pub trait NarrationPort {
    /// Starts speaking `text`, interrupting anything already being spoken.
    fn speak(&mut self, text: &str);

    /// Stops speaking. No-op when idle.
    fn stop(&mut self);

    /// Returns whether the platform can synthesize speech at all.
    fn is_supported(&self) -> bool;
}

/// A port for platforms without speech synthesis.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNarration;

impl NarrationPort for SilentNarration {
    fn speak(&mut self, _text: &str) {}
    fn stop(&mut self) {}
    fn is_supported(&self) -> bool {
        false
    }
}

/// Builds the narration script for a plant.
#[must_use]
pub fn compose_narration(plant: &PlantRecord) -> String {
    let data = plant.data();
    let mut sentences = vec![
        format!(
            "{} is an Ayurvedic plant native to {}.",
            data.name,
            clause(&data.native_region)
        ),
        format!(
            "It thrives in {} and prefers {} with {}.",
            clause(&data.climate).to_lowercase(),
            clause(&data.sunlight).to_lowercase(),
            clause(&data.soil).to_lowercase()
        ),
        format!(
            "Traditional healers often use the {}.",
            data.part_used.join(", ")
        ),
    ];

    let properties: Vec<&str> = data
        .therapeutic_properties
        .iter()
        .take(3)
        .map(String::as_str)
        .collect();
    sentences.push(format!(
        "It is known for {} properties.",
        properties.join(", ").to_lowercase()
    ));

    let benefits: Vec<&str> = data
        .health_benefits
        .iter()
        .take(2)
        .map(|b| clause(b))
        .collect();
    sentences.push(format!(
        "Some key benefits include {}.",
        benefits.join(", ")
    ));

    let forms: Vec<&str> = data.dosage_forms.iter().take(2).map(String::as_str).collect();
    sentences.push(format!("Common preparations are {}.", forms.join(" and ")));

    sentences.join(" ")
}

/// Strips trailing sentence punctuation so a field can sit inside a sentence.
fn clause(text: &str) -> &str {
    text.trim().trim_end_matches('.')
}

/// Truncates `text` to at most `max_chars` characters.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Tracks speaking state on top of a [`NarrationPort`].
pub struct Narrator<P: NarrationPort> {
    port: P,
    speaking: bool,
    max_chars: usize,
}

impl<P: NarrationPort> Narrator<P> {
    /// Wraps `port`; scripts longer than `max_chars` are truncated.
    pub fn new(port: P, max_chars: usize) -> Self {
        Self {
            port,
            speaking: false,
            max_chars,
        }
    }

    /// Returns whether narration is currently playing.
    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// Returns whether the underlying port can speak.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.port.is_supported()
    }

    /// Starts speaking `text`, or stops if already speaking.
    ///
    /// Does nothing when speech is unsupported or `text` is empty.
    pub fn toggle(&mut self, text: &str) {
        if !self.port.is_supported() || text.trim().is_empty() {
            return;
        }
        if self.speaking {
            self.stop();
            return;
        }
        self.port.stop();
        self.port.speak(truncate_chars(text, self.max_chars));
        self.speaking = true;
    }

    /// Narrates a plant record.
    pub fn toggle_plant(&mut self, plant: &PlantRecord) {
        self.toggle(&compose_narration(plant));
    }

    /// Stops narration.
    pub fn stop(&mut self) {
        self.port.stop();
        self.speaking = false;
    }

    /// Called by the host when the platform reports the utterance ended or
    /// failed.
    pub fn on_finished(&mut self) {
        self.stop();
    }

    /// Returns the underlying port.
    pub fn port(&self) -> &P {
        &self.port
    }
}

impl<P: NarrationPort> Drop for Narrator<P> {
    fn drop(&mut self) {
        if self.speaking {
            self.port.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::tests::sample_data;

    #[derive(Default)]
    struct RecordingPort {
        spoken: Vec<String>,
        stops: usize,
    }

    impl NarrationPort for RecordingPort {
        fn speak(&mut self, text: &str) {
            self.spoken.push(text.to_string());
        }
        fn stop(&mut self) {
            self.stops += 1;
        }
        fn is_supported(&self) -> bool {
            true
        }
    }

    fn record() -> PlantRecord {
        PlantRecord::new(sample_data()).unwrap()
    }

    #[test]
    fn test_compose_narration() {
        let text = compose_narration(&record());
        assert_eq!(
            text,
            "Holy Basil is an Ayurvedic plant native to Indian subcontinent. \
             It thrives in warm, tropical and subtropical climates and prefers \
             full sun to partial shade with well-drained, fertile soil rich in organic matter. \
             Traditional healers often use the Leaves. \
             It is known for adaptogenic, antioxidant, anti-inflammatory properties. \
             Some key benefits include Reduces stress and anxiety levels, \
             Supports respiratory health and eases breathing. \
             Common preparations are Tea and Capsules."
        );
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("तुलसी", 2), "तु");
    }

    #[test]
    fn test_toggle_speaks_then_stops() {
        let mut narrator = Narrator::new(RecordingPort::default(), 900);
        narrator.toggle("hello");
        assert!(narrator.is_speaking());
        assert_eq!(narrator.port().spoken, vec!["hello".to_string()]);

        narrator.toggle("hello");
        assert!(!narrator.is_speaking());
        assert_eq!(narrator.port().spoken.len(), 1);
    }

    #[test]
    fn test_toggle_truncates() {
        let mut narrator = Narrator::new(RecordingPort::default(), 4);
        narrator.toggle("narration");
        assert_eq!(narrator.port().spoken, vec!["narr".to_string()]);
    }

    #[test]
    fn test_on_finished_resets_state() {
        let mut narrator = Narrator::new(RecordingPort::default(), 900);
        narrator.toggle_plant(&record());
        narrator.on_finished();
        assert!(!narrator.is_speaking());
    }

    #[test]
    fn test_unsupported_is_noop() {
        let mut narrator = Narrator::new(SilentNarration, 900);
        narrator.toggle("hello");
        assert!(!narrator.is_speaking());
        assert!(!narrator.is_supported());
    }

    #[test]
    fn test_empty_text_is_noop() {
        let mut narrator = Narrator::new(RecordingPort::default(), 900);
        narrator.toggle("   ");
        assert!(!narrator.is_speaking());
        assert!(narrator.port().spoken.is_empty());
    }
}
