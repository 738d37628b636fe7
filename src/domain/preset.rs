use crate::utils::error::{FormError, Result};
use std::fmt;
use std::str::FromStr;

/// 預設病例，用於快速填寫表單
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Low,
    Medium,
    High,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Low, Preset::Medium, Preset::High];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Low => "low",
            Preset::Medium => "medium",
            Preset::High => "high",
        }
    }

    /// Literal values written into the form, in form order.
    pub fn values(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Preset::Low => &[
                ("Age", "35"),
                ("Sex", "F"),
                ("ChestPainType", "ATA"),
                ("RestingBP", "115"),
                ("Cholesterol", "180"),
                ("FastingBS", "0"),
                ("RestingECG", "Normal"),
                ("MaxHR", "172"),
                ("ExerciseAngina", "N"),
                ("Oldpeak", "0"),
                ("ST_Slope", "Up"),
            ],
            Preset::Medium => &[
                ("Age", "52"),
                ("Sex", "M"),
                ("ChestPainType", "NAP"),
                ("RestingBP", "138"),
                ("Cholesterol", "223"),
                ("FastingBS", "0"),
                ("RestingECG", "Normal"),
                ("MaxHR", "145"),
                ("ExerciseAngina", "N"),
                ("Oldpeak", "1"),
                ("ST_Slope", "Flat"),
            ],
            Preset::High => &[
                ("Age", "67"),
                ("Sex", "M"),
                ("ChestPainType", "ASY"),
                ("RestingBP", "160"),
                ("Cholesterol", "286"),
                ("FastingBS", "1"),
                ("RestingECG", "LVH"),
                ("MaxHR", "108"),
                ("ExerciseAngina", "Y"),
                ("Oldpeak", "2.5"),
                ("ST_Slope", "Down"),
            ],
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FormError::UnknownPreset {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FORM_FIELDS;

    #[test]
    fn test_presets_cover_every_field() {
        for preset in Preset::ALL {
            let names: Vec<&str> = preset.values().iter().map(|(k, _)| *k).collect();
            assert_eq!(names, FORM_FIELDS, "preset {}", preset);
        }
    }

    #[test]
    fn test_parse_preset_name() {
        assert_eq!("high".parse::<Preset>().unwrap(), Preset::High);
        assert_eq!("Medium".parse::<Preset>().unwrap(), Preset::Medium);
        assert!("extreme".parse::<Preset>().is_err());
    }
}
