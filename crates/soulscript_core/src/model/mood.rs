//! Mood options and their display metadata.
//!
//! # Invariants
//! - The option order is stable; the first option is the composition default.
//! - Lookup by label is exact (case-sensitive), matching persisted values.

use serde::{Deserialize, Serialize};

/// Gray used for moods missing from the table.
pub const FALLBACK_MOOD_COLOR: u32 = 0xFF88_8888;
/// Icon key used for moods missing from the table.
pub const FALLBACK_MOOD_ICON: &str = "sentiment_very_satisfied";

/// Closed set of moods a user can pick when writing an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Calm,
    Focused,
    Sad,
    Stressed,
    Tired,
    Creative,
}

/// Display metadata for one mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodDisplay {
    pub label: &'static str,
    /// Platform-neutral icon key resolved by the UI.
    pub icon: &'static str,
    /// Two-stop ARGB gradient; the first stop doubles as the chart color.
    pub gradient: [u32; 2],
}

impl Mood {
    /// All moods in picker order.
    pub const ALL: [Mood; 7] = [
        Mood::Happy,
        Mood::Calm,
        Mood::Focused,
        Mood::Sad,
        Mood::Stressed,
        Mood::Tired,
        Mood::Creative,
    ];

    pub fn label(self) -> &'static str {
        self.display().label
    }

    pub fn display(self) -> MoodDisplay {
        match self {
            Mood::Happy => MoodDisplay {
                label: "Happy",
                icon: "sentiment_very_satisfied",
                gradient: [0xFFCB_5D40, 0xFFF5_C42A],
            },
            Mood::Calm => MoodDisplay {
                label: "Calm",
                icon: "spa",
                gradient: [0xFF3A_7ACE, 0xFF89_F7FE],
            },
            Mood::Focused => MoodDisplay {
                label: "Focused",
                icon: "lightbulb",
                gradient: [0xFF48_5563, 0xFF29_323C],
            },
            Mood::Sad => MoodDisplay {
                label: "Sad",
                icon: "sentiment_dissatisfied",
                gradient: [0xFF2C_3E50, 0xFF4C_A1AF],
            },
            Mood::Stressed => MoodDisplay {
                label: "Stressed",
                icon: "flash_on",
                gradient: [0xFFFC_4568, 0xFFB4_3A91],
            },
            Mood::Tired => MoodDisplay {
                label: "Tired",
                icon: "nightlight",
                gradient: [0xFF23_2526, 0xFF48_4D50],
            },
            Mood::Creative => MoodDisplay {
                label: "Creative",
                icon: "palette",
                gradient: [0xFF83_1ED9, 0xFF4A_00E0],
            },
        }
    }

    /// Finds the mood whose label equals `label`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mood| mood.label() == label)
    }
}

impl Default for Mood {
    fn default() -> Self {
        Self::ALL[0]
    }
}

/// Icon key for any stored label, falling back for unknown labels.
pub fn icon_for_label(label: &str) -> &'static str {
    Mood::from_label(label).map_or(FALLBACK_MOOD_ICON, |mood| mood.display().icon)
}

/// Chart color for any stored label, falling back to gray.
pub fn color_for_label(label: &str) -> u32 {
    Mood::from_label(label).map_or(FALLBACK_MOOD_COLOR, |mood| mood.display().gradient[0])
}

#[cfg(test)]
mod tests {
    use super::{color_for_label, icon_for_label, Mood, FALLBACK_MOOD_COLOR, FALLBACK_MOOD_ICON};

    #[test]
    fn labels_roundtrip_through_lookup() {
        for mood in Mood::ALL {
            assert_eq!(Mood::from_label(mood.label()), Some(mood));
        }
    }

    #[test]
    fn unknown_label_uses_fallback_metadata() {
        assert_eq!(icon_for_label("happy"), FALLBACK_MOOD_ICON);
        assert_eq!(color_for_label("Bored"), FALLBACK_MOOD_COLOR);
        assert_eq!(color_for_label("Calm"), 0xFF3A_7ACE);
    }

    #[test]
    fn default_mood_is_first_picker_option() {
        assert_eq!(Mood::default(), Mood::Happy);
    }
}
