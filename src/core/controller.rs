use crate::core::animation::{GaugeAnimation, START_DELAY};
use crate::core::guard::{lock_page, SubmitGuard};
use crate::core::page::{ButtonSlot, Page, FILE_PLACEHOLDER};
use crate::core::render::{
    render_batch_table, render_factors, render_plain_result, risk_class, risk_description,
    risk_label,
};
use crate::domain::model::{BatchResult, Prediction, SelectedFile};
use crate::domain::ports::{ConfigProvider, PredictionApi, RenderMode};
use crate::domain::preset::Preset;
use crate::utils::error::{FormError, Result, CONNECTION_ERROR_MESSAGE, UPLOAD_FAILED_MESSAGE};
use std::sync::atomic::AtomicBool;
use std::sync::Mutex;

pub const DEFAULT_BATCH_ROW_LIMIT: usize = 50;

/// What a submit ended with. Failures are already on the page as a notice.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Predicted(Prediction),
    Uploaded { shown: usize, total: usize },
    Notified(String),
    /// Another request from the same form was still in flight.
    Ignored,
    /// Upload submitted without a selected file; nothing was sent.
    NoFile,
}

pub struct FormController<A: PredictionApi> {
    api: A,
    page: Mutex<Page>,
    batch_row_limit: usize,
    predicting: AtomicBool,
    uploading: AtomicBool,
}

impl<A: PredictionApi> FormController<A> {
    pub fn new(api: A, page: Page, batch_row_limit: usize) -> Self {
        Self {
            api,
            page: Mutex::new(page),
            batch_row_limit,
            predicting: AtomicBool::new(false),
            uploading: AtomicBool::new(false),
        }
    }

    pub fn from_config<C: ConfigProvider>(api: A, page: Page, config: &C) -> Self {
        Self::new(api, page, config.batch_row_limit())
    }

    /// Copy of the current page state.
    pub fn snapshot(&self) -> Page {
        lock_page(&self.page).clone()
    }

    pub fn mode(&self) -> RenderMode {
        lock_page(&self.page).mode
    }

    /// 點擊預設標籤：覆寫表單欄位，不送出
    pub fn apply_preset(&self, preset: Preset) -> Result<()> {
        let mut page = lock_page(&self.page);
        if !page.has_chip(preset) {
            return Err(FormError::MissingElement {
                id: format!("[data-preset={}]", preset),
            });
        }
        page.form.apply_preset(preset)
    }

    pub fn set_field(&self, name: &str, value: &str) -> Result<()> {
        lock_page(&self.page).form.set(name, value)
    }

    /// Reflects the chosen file (or its absence) into the file label.
    pub fn select_file(&self, file: Option<SelectedFile>) {
        let mut page = lock_page(&self.page);
        match &file {
            Some(selected) => {
                page.file_label.set_text(&selected.name);
                match csv_record_count(&selected.bytes) {
                    Ok(rows) => tracing::debug!("📄 Selected {} ({} data rows)", selected.name, rows),
                    Err(e) => tracing::warn!("⚠️ Could not preview {}: {}", selected.name, e),
                }
            }
            None => page.file_label.set_text(FILE_PLACEHOLDER),
        }
        page.selected_file = file;
    }

    pub async fn submit_prediction(&self) -> SubmitOutcome {
        let request = {
            let mut page = lock_page(&self.page);
            if let Err(e) = page.form.check_required() {
                let message = e.user_message(CONNECTION_ERROR_MESSAGE);
                page.notice.set_text(&message);
                return SubmitOutcome::Notified(message);
            }
            page.form.serialize()
        };

        let Some(_guard) = SubmitGuard::acquire(&self.predicting, &self.page, ButtonSlot::Predict)
        else {
            tracing::debug!("Prediction already in flight, ignoring submit");
            return SubmitOutcome::Ignored;
        };
        self.clear_notice();

        tracing::info!("📡 Submitting prediction ({} fields)", request.fields.len());
        let result = self
            .api
            .predict(&request)
            .await
            .and_then(Prediction::from_value);

        match result {
            Ok(prediction) => {
                tracing::info!(
                    "✅ Prediction: {} risk ({}%)",
                    prediction.risk_level,
                    prediction.probability
                );
                self.show_prediction(&prediction);
                SubmitOutcome::Predicted(prediction)
            }
            Err(e) => self.report(e, CONNECTION_ERROR_MESSAGE, "Error: "),
        }
    }

    pub async fn submit_upload(&self) -> SubmitOutcome {
        let Some(file) = lock_page(&self.page).selected_file.clone() else {
            tracing::debug!("No file selected, upload skipped");
            return SubmitOutcome::NoFile;
        };

        let Some(_guard) = SubmitGuard::acquire(&self.uploading, &self.page, ButtonSlot::Upload)
        else {
            tracing::debug!("Upload already in flight, ignoring submit");
            return SubmitOutcome::Ignored;
        };
        self.clear_notice();

        tracing::info!("📡 Uploading {} ({} bytes)", file.name, file.bytes.len());
        let result = self
            .api
            .upload(&file)
            .await
            .and_then(BatchResult::from_value);

        match result {
            Ok(batch) => {
                let total = batch.rows.len();
                let shown = total.min(self.batch_row_limit);
                tracing::info!("✅ Batch scored: {} rows, showing {}", total, shown);
                self.show_batch(&batch);
                SubmitOutcome::Uploaded { shown, total }
            }
            Err(e) => self.report(e, UPLOAD_FAILED_MESSAGE, ""),
        }
    }

    /// Counts the gauge percentage up from zero, one frame at a time.
    pub async fn play_gauge<F: FnMut(u32)>(&self, probability: f64, mut on_frame: F) {
        let animation = GaugeAnimation::new(probability);
        tokio::time::sleep(START_DELAY).await;
        for value in animation.frames() {
            lock_page(&self.page)
                .result_percent
                .set_text(&format!("{}%", value));
            on_frame(value);
            tokio::time::sleep(animation.frame_interval()).await;
        }
    }

    fn clear_notice(&self) {
        lock_page(&self.page).notice.inner_html.clear();
    }

    fn show_prediction(&self, prediction: &Prediction) {
        let mut page = lock_page(&self.page);
        let level = prediction.risk_level;

        match page.mode {
            RenderMode::Gauge => {
                let next = page.view.after_prediction();
                page.switch_state(next);

                let animation = GaugeAnimation::new(prediction.probability);
                let color = animation.color().hex();

                page.risk_label.set_text(&risk_label(level));
                page.risk_label.classes.retain(|c| !c.starts_with("risk-"));
                page.risk_label.classes.insert(risk_class(level).to_string());
                page.risk_label.set_style("color", color);
                page.risk_desc.set_text(risk_description(level));
                page.factors_list.inner_html =
                    render_factors(&prediction.risk_factors, RenderMode::Gauge);
                page.gauge_fill.set_style(
                    "transform",
                    format!("rotate({}deg)", animation.rotation_degrees()),
                );
                page.gauge_fill.set_style("border-top-color", color);
                page.result_percent
                    .set_text(&format!("{}%", prediction.percent()));
            }
            RenderMode::Plain => {
                page.result_state.inner_html = render_plain_result(prediction);
            }
        }
    }

    fn show_batch(&self, batch: &BatchResult) {
        let mut page = lock_page(&self.page);
        let mode = page.mode;
        if mode == RenderMode::Gauge {
            let next = page.view.after_upload();
            page.switch_state(next);
        }
        page.batch_table.inner_html = render_batch_table(&batch.rows, self.batch_row_limit, mode);
    }

    fn report(&self, error: FormError, fallback: &str, prefix: &str) -> SubmitOutcome {
        let message = match &error {
            FormError::ApplicationError { message } => {
                tracing::info!("Server reported: {}", message);
                format!("{}{}", prefix, message)
            }
            e if e.is_transport() => {
                tracing::error!("❌ Request failed: {}", e);
                fallback.to_string()
            }
            e => {
                tracing::warn!("⚠️ {}", e);
                e.user_message(fallback)
            }
        };

        lock_page(&self.page).notice.set_text(&message);
        SubmitOutcome::Notified(message)
    }
}

fn csv_record_count(bytes: &[u8]) -> Result<usize> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut count = 0;
    for record in reader.records() {
        record?;
        count += 1;
    }
    Ok(count)
}
