use thiserror::Error;

pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error.";
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed.";
pub const FORMAT_MISMATCH_MESSAGE: &str = "Unexpected response format from server.";

#[derive(Error, Debug)]
pub enum FormError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Page element not found: #{id}")]
    MissingElement { id: String },

    #[error("Required field is empty: {field}")]
    MissingRequiredField { field: String },

    #[error("Unknown form field: {field}")]
    UnknownField { field: String },

    #[error("Unknown preset: {name}")]
    UnknownPreset { name: String },

    #[error("Server reported an error: {message}")]
    ApplicationError { message: String },

    #[error("Response format mismatch: {message}")]
    FormatMismatch { message: String },

    #[error("Unrecognized risk level: {value}")]
    UnrecognizedRiskLevel { value: String },
}

impl FormError {
    /// 傳輸層或解析失敗（請求被拒絕、回應不是 JSON、逾時）
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FormError::ApiError(_) | FormError::SerializationError(_) | FormError::IoError(_)
        )
    }

    /// 顯示給使用者的訊息
    ///
    /// Transport failures collapse into `fallback`; everything else keeps
    /// its own wording so the user sees what the server actually said.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            FormError::ApplicationError { message } => message.clone(),
            FormError::FormatMismatch { .. } => FORMAT_MISMATCH_MESSAGE.to_string(),
            FormError::UnrecognizedRiskLevel { value } => {
                format!("Server returned an unrecognized risk level: {}", value)
            }
            FormError::MissingRequiredField { field } => {
                format!("Please fill out the {} field.", field)
            }
            e if e.is_transport() => fallback.to_string(),
            e => e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FormError>;
