pub mod animation;
pub mod controller;
pub mod form;
pub mod guard;
pub mod page;
pub mod render;
pub mod view_state;

pub use crate::domain::model::{BatchResult, Prediction, PredictionRequest, SelectedFile};
pub use crate::domain::ports::{ConfigProvider, PredictionApi, RenderMode, Storage};
pub use crate::utils::error::Result;
