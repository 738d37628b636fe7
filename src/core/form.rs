use crate::domain::model::{PredictionRequest, FORM_FIELDS};
use crate::domain::preset::Preset;
use crate::utils::error::{FormError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct FormControl {
    pub name: String,
    pub value: String,
    pub required: bool,
}

/// Live values of the single-prediction form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    controls: Vec<FormControl>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            controls: FORM_FIELDS
                .iter()
                .map(|name| FormControl {
                    name: name.to_string(),
                    value: String::new(),
                    required: true,
                })
                .collect(),
        }
    }
}

impl FormState {
    pub fn controls(&self) -> &[FormControl] {
        &self.controls
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.controls
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let control = self
            .controls
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| FormError::UnknownField {
                field: name.to_string(),
            })?;
        control.value = value.into();
        Ok(())
    }

    /// 以預設值覆寫表單欄位，不會送出
    pub fn apply_preset(&mut self, preset: Preset) -> Result<()> {
        for (name, value) in preset.values() {
            self.set(name, *value)?;
        }
        tracing::debug!("Applied preset '{}' to form", preset);
        Ok(())
    }

    /// Equivalent of the browser's native `required` constraint.
    pub fn check_required(&self) -> Result<()> {
        match self
            .controls
            .iter()
            .find(|c| c.required && c.value.is_empty())
        {
            Some(control) => Err(FormError::MissingRequiredField {
                field: control.name.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn serialize(&self) -> PredictionRequest {
        PredictionRequest {
            fields: self
                .controls
                .iter()
                .map(|c| (c.name.clone(), c.value.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_preset_reads_back_literally() {
        let mut form = FormState::default();
        form.apply_preset(Preset::High).unwrap();

        for (name, value) in Preset::High.values() {
            assert_eq!(form.get(name), Some(*value), "field {}", name);
        }
        assert_eq!(form.get("Age"), Some("67"));
        assert_eq!(form.get("Sex"), Some("M"));
        assert_eq!(form.get("ST_Slope"), Some("Down"));
    }

    #[test]
    fn test_low_preset_serializes_every_pair() {
        let mut form = FormState::default();
        form.apply_preset(Preset::Low).unwrap();
        let request = form.serialize();

        assert_eq!(request.fields.len(), FORM_FIELDS.len());
        for (name, value) in Preset::Low.values() {
            assert_eq!(request.get(name), Some(*value));
        }
    }

    #[test]
    fn test_preset_overwrites_user_edits() {
        let mut form = FormState::default();
        form.set("Age", "99").unwrap();
        form.apply_preset(Preset::Medium).unwrap();
        assert_eq!(form.get("Age"), Some("52"));
    }

    #[test]
    fn test_required_fields() {
        let mut form = FormState::default();
        let err = form.check_required().unwrap_err();
        assert!(matches!(err, FormError::MissingRequiredField { field } if field == "Age"));

        form.apply_preset(Preset::Low).unwrap();
        assert!(form.check_required().is_ok());

        form.set("Cholesterol", "  ").unwrap();
        assert!(form.check_required().is_ok());

        form.set("Cholesterol", "").unwrap();
        assert!(form.check_required().is_err());
    }

    #[test]
    fn test_unknown_field() {
        let mut form = FormState::default();
        assert!(matches!(
            form.set("Weight", "80"),
            Err(FormError::UnknownField { .. })
        ));
    }
}
