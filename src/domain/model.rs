use crate::utils::error::{FormError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 表單欄位名稱，順序與頁面上的控制項一致
pub const FORM_FIELDS: [&str; 11] = [
    "Age",
    "Sex",
    "ChestPainType",
    "RestingBP",
    "Cholesterol",
    "FastingBS",
    "RestingECG",
    "MaxHR",
    "ExerciseAngina",
    "Oldpeak",
    "ST_Slope",
];

/// Body of `POST /predict`: one entry per form control, values as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionRequest {
    pub fields: BTreeMap<String, String>,
}

impl PredictionRequest {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::High => "High",
        }
    }

}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Low" => Ok(RiskLevel::Low),
            "High" => Ok(RiskLevel::High),
            other => Err(FormError::UnrecognizedRiskLevel {
                value: other.to_string(),
            }),
        }
    }
}

/// `/predict` 回應的原始形狀；錯誤回應只帶 `error`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub risk_factors: Option<Vec<String>>,
    #[serde(default)]
    pub prediction: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A successful, validated single prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub probability: f64,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
}

/// Integer percentage shown by the counter, clamped to 0..=100.
pub fn rounded_percent(probability: f64) -> u32 {
    probability.clamp(0.0, 100.0).round() as u32
}

impl Prediction {
    pub fn percent(&self) -> u32 {
        rounded_percent(self.probability)
    }

    /// 解析 `/predict` 回應；欄位型別不符時回傳 FormatMismatch
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(body) = &value else {
            return Err(FormError::FormatMismatch {
                message: "response is not an object".to_string(),
            });
        };

        if let Some(serde_json::Value::String(message)) = body.get("error") {
            if !message.is_empty() {
                return Err(FormError::ApplicationError {
                    message: message.clone(),
                });
            }
        }

        let response: PredictionResponse =
            serde_json::from_value(value).map_err(|e| FormError::FormatMismatch {
                message: e.to_string(),
            })?;
        Prediction::try_from(response)
    }
}

impl TryFrom<PredictionResponse> for Prediction {
    type Error = FormError;

    fn try_from(response: PredictionResponse) -> Result<Self> {
        if let Some(message) = response.error.filter(|m| !m.is_empty()) {
            return Err(FormError::ApplicationError { message });
        }

        let probability = response.probability.ok_or_else(|| FormError::FormatMismatch {
            message: "missing probability".to_string(),
        })?;
        let level = response.risk_level.ok_or_else(|| FormError::FormatMismatch {
            message: "missing risk_level".to_string(),
        })?;

        Ok(Prediction {
            probability,
            risk_level: level.parse()?,
            risk_factors: response.risk_factors.unwrap_or_default(),
        })
    }
}

/// One scored row of an uploaded CSV.
///
/// The server echoes every CSV column back; only the ones shown in the
/// table are kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchRow {
    #[serde(rename = "Age", default)]
    pub age: serde_json::Value,
    #[serde(rename = "Sex", default)]
    pub sex: serde_json::Value,
    #[serde(rename = "Risk_Probability")]
    pub risk_probability: f64,
    #[serde(rename = "Risk_Level", default)]
    pub risk_level: String,
    #[serde(rename = "Risk_Factors", default)]
    pub risk_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub rows: Vec<BatchRow>,
}

impl BatchResult {
    /// 解析 `/upload` 回應；`results` 缺少或形狀不符時回傳 FormatMismatch
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(mut body) = value else {
            return Err(FormError::FormatMismatch {
                message: "response is not an object".to_string(),
            });
        };

        if let Some(serde_json::Value::String(message)) = body.get("error") {
            if !message.is_empty() {
                return Err(FormError::ApplicationError {
                    message: message.clone(),
                });
            }
        }

        let Some(serde_json::Value::Array(items)) = body.remove("results") else {
            return Err(FormError::FormatMismatch {
                message: "results is missing or not an array".to_string(),
            });
        };

        let rows = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<BatchRow>(item).map_err(|e| FormError::FormatMismatch {
                    message: format!("row {}: {}", index, e),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BatchResult { rows })
    }
}

/// 使用者選擇的上傳檔案
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}
