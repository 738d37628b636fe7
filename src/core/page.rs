use crate::core::form::FormState;
use crate::core::render::escape_html;
use crate::core::view_state::ViewState;
use crate::domain::model::SelectedFile;
use crate::domain::ports::RenderMode;
use crate::domain::preset::Preset;
use crate::utils::error::{FormError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const FILE_PLACEHOLDER: &str = "Choose a CSV file";
pub const PREDICT_LABEL: &str = "<i class=\"fa-solid fa-heart-pulse\"></i> Analyze Risk";
pub const UPLOAD_LABEL: &str = "<i class=\"fa-solid fa-upload\"></i> Upload &amp; Analyze";

/// Element ids the controller binds to in the host page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub prediction_form: String,
    pub upload_form: String,
    pub predict_button: String,
    pub upload_button: String,
    pub file_input: String,
    pub file_label: String,
    pub notice: String,
    pub welcome_state: String,
    pub result_state: String,
    pub batch_state: String,
    pub gauge_fill: String,
    pub result_percent: String,
    pub risk_label: String,
    pub risk_desc: String,
    pub factors_list: String,
    pub batch_table: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            prediction_form: "predictionForm".to_string(),
            upload_form: "uploadForm".to_string(),
            predict_button: "predictBtn".to_string(),
            upload_button: "uploadBtn".to_string(),
            file_input: "csvIn".to_string(),
            file_label: "fileName".to_string(),
            notice: "notice".to_string(),
            welcome_state: "welcomeState".to_string(),
            result_state: "resultState".to_string(),
            batch_state: "batchState".to_string(),
            gauge_fill: "gaugeFill".to_string(),
            result_percent: "resultPercent".to_string(),
            risk_label: "riskLabel".to_string(),
            risk_desc: "riskDesc".to_string(),
            factors_list: "factorsList".to_string(),
            batch_table: "batchTable".to_string(),
        }
    }
}

impl PageLayout {
    /// (config key, id, needed only by the gauge variant)
    fn entries(&self) -> [(&'static str, &str, bool); 16] {
        [
            ("page.prediction_form", self.prediction_form.as_str(), false),
            ("page.upload_form", self.upload_form.as_str(), false),
            ("page.predict_button", self.predict_button.as_str(), false),
            ("page.upload_button", self.upload_button.as_str(), false),
            ("page.file_input", self.file_input.as_str(), false),
            ("page.file_label", self.file_label.as_str(), false),
            ("page.notice", self.notice.as_str(), false),
            ("page.result_state", self.result_state.as_str(), false),
            ("page.batch_table", self.batch_table.as_str(), false),
            ("page.welcome_state", self.welcome_state.as_str(), true),
            ("page.batch_state", self.batch_state.as_str(), true),
            ("page.gauge_fill", self.gauge_fill.as_str(), true),
            ("page.result_percent", self.result_percent.as_str(), true),
            ("page.risk_label", self.risk_label.as_str(), true),
            ("page.risk_desc", self.risk_desc.as_str(), true),
            ("page.factors_list", self.factors_list.as_str(), true),
        ]
    }

    pub fn required_ids(&self, mode: RenderMode) -> Vec<&str> {
        self.entries()
            .into_iter()
            .filter(|(_, _, gauge_only)| mode == RenderMode::Gauge || !gauge_only)
            .map(|(_, id, _)| id)
            .collect()
    }
}

impl Validate for PageLayout {
    fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for (field, id, _) in self.entries() {
            validate_non_empty_string(field, id)?;
            if !seen.insert(id) {
                return Err(FormError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: id.to_string(),
                    reason: "Element id is used more than once".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Ids and preset chips found in the host markup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    ids: BTreeSet<String>,
    preset_chips: Vec<String>,
}

impl Document {
    pub fn from_html(markup: &str) -> Result<Self> {
        let id_re = Regex::new(r#"\bid\s*=\s*["']([^"']+)["']"#).map_err(|e| {
            FormError::ConfigError {
                message: format!("id pattern: {}", e),
            }
        })?;
        let chip_re = Regex::new(r#"\bdata-preset\s*=\s*["']([^"']+)["']"#).map_err(|e| {
            FormError::ConfigError {
                message: format!("preset pattern: {}", e),
            }
        })?;

        let ids = id_re
            .captures_iter(markup)
            .map(|caps| caps[1].to_string())
            .collect();
        let preset_chips = chip_re
            .captures_iter(markup)
            .map(|caps| caps[1].to_string())
            .collect();

        Ok(Self { ids, preset_chips })
    }

    /// Document that contains every id of `layout` and all preset chips.
    pub fn from_layout(layout: &PageLayout) -> Self {
        Self {
            ids: layout
                .entries()
                .into_iter()
                .map(|(_, id, _)| id.to_string())
                .collect(),
            preset_chips: Preset::ALL.iter().map(|p| p.name().to_string()).collect(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn preset_chips(&self) -> &[String] {
        &self.preset_chips
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub id: String,
    pub inner_html: String,
    pub classes: BTreeSet<String>,
    pub style: BTreeMap<String, String>,
    pub disabled: bool,
}

impl Element {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.inner_html = escape_html(text);
    }

    pub fn set_style(&mut self, property: &str, value: impl Into<String>) {
        self.style.insert(property.to_string(), value.into());
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    fn attributes(&self) -> String {
        let mut attrs = format!(" id=\"{}\"", escape_html(&self.id));
        if !self.classes.is_empty() {
            let classes: Vec<&str> = self.classes.iter().map(String::as_str).collect();
            attrs.push_str(&format!(" class=\"{}\"", classes.join(" ")));
        }
        if !self.style.is_empty() {
            let style: Vec<String> = self
                .style
                .iter()
                .map(|(k, v)| format!("{}:{}", k, v))
                .collect();
            attrs.push_str(&format!(" style=\"{}\"", escape_html(&style.join(";"))));
        }
        if self.disabled {
            attrs.push_str(" disabled");
        }
        attrs
    }

    fn to_html(&self, tag: &str) -> String {
        format!("<{tag}{}>{}</{tag}>", self.attributes(), self.inner_html)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonSlot {
    Predict,
    Upload,
}

/// Typed view-model of the host page.
///
/// Built once by [`Page::bind`]; every element the controller touches is
/// a field here, so a missing element is a construction error instead of a
/// silent no-op later.
#[derive(Debug, Clone)]
pub struct Page {
    pub mode: RenderMode,
    pub layout: PageLayout,
    pub form: FormState,
    pub selected_file: Option<SelectedFile>,
    pub view: ViewState,
    pub predict_button: Element,
    pub upload_button: Element,
    pub file_label: Element,
    pub notice: Element,
    pub welcome_state: Element,
    pub result_state: Element,
    pub batch_state: Element,
    pub gauge_fill: Element,
    pub result_percent: Element,
    pub risk_label: Element,
    pub risk_desc: Element,
    pub factors_list: Element,
    pub batch_table: Element,
    chips: Vec<Preset>,
}

impl Page {
    pub fn bind(document: &Document, layout: &PageLayout, mode: RenderMode) -> Result<Self> {
        layout.validate()?;

        for id in layout.required_ids(mode) {
            if !document.contains(id) {
                return Err(FormError::MissingElement { id: id.to_string() });
            }
        }

        let chips = document
            .preset_chips()
            .iter()
            .map(|name| name.parse::<Preset>())
            .collect::<Result<Vec<_>>>()?;

        let mut page = Self {
            mode,
            layout: layout.clone(),
            form: FormState::default(),
            selected_file: None,
            view: ViewState::Welcome,
            predict_button: Element::new(&layout.predict_button),
            upload_button: Element::new(&layout.upload_button),
            file_label: Element::new(&layout.file_label),
            notice: Element::new(&layout.notice),
            welcome_state: Element::new(&layout.welcome_state),
            result_state: Element::new(&layout.result_state),
            batch_state: Element::new(&layout.batch_state),
            gauge_fill: Element::new(&layout.gauge_fill),
            result_percent: Element::new(&layout.result_percent),
            risk_label: Element::new(&layout.risk_label),
            risk_desc: Element::new(&layout.risk_desc),
            factors_list: Element::new(&layout.factors_list),
            batch_table: Element::new(&layout.batch_table),
            chips,
        };
        page.predict_button.inner_html = PREDICT_LABEL.to_string();
        page.upload_button.inner_html = UPLOAD_LABEL.to_string();
        page.file_label.set_text(FILE_PLACEHOLDER);
        if mode == RenderMode::Gauge {
            page.switch_state(ViewState::Welcome);
        }

        tracing::debug!(
            "Bound page ({:?} mode, {} preset chips)",
            mode,
            page.chips.len()
        );
        Ok(page)
    }

    pub fn has_chip(&self, preset: Preset) -> bool {
        self.chips.contains(&preset)
    }

    pub fn button_mut(&mut self, slot: ButtonSlot) -> &mut Element {
        match slot {
            ButtonSlot::Predict => &mut self.predict_button,
            ButtonSlot::Upload => &mut self.upload_button,
        }
    }

    pub fn switch_state(&mut self, target: ViewState) {
        self.view = target;
        for state in ViewState::ALL {
            let panel = self.panel_mut(state);
            if state == target {
                panel.classes.insert("active".to_string());
            } else {
                panel.classes.remove("active");
            }
        }
    }

    fn panel_mut(&mut self, state: ViewState) -> &mut Element {
        match state {
            ViewState::Welcome => &mut self.welcome_state,
            ViewState::Result => &mut self.result_state,
            ViewState::Batch => &mut self.batch_state,
        }
    }

    /// 將目前狀態輸出成完整 HTML 頁面
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(8 * 1024);
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Heart Risk Assessment</title></head>\n<body>\n");

        out.push_str(&format!(
            "<form id=\"{}\">\n",
            escape_html(&self.layout.prediction_form)
        ));
        for control in self.form.controls() {
            out.push_str(&format!(
                "  <label>{name} <input name=\"{name}\" value=\"{value}\"{required}></label>\n",
                name = escape_html(&control.name),
                value = escape_html(&control.value),
                required = if control.required { " required" } else { "" },
            ));
        }
        for preset in &self.chips {
            out.push_str(&format!(
                "  <span class=\"chip\" data-preset=\"{}\">{}</span>\n",
                preset.name(),
                preset.name()
            ));
        }
        out.push_str(&format!("  {}\n</form>\n", self.predict_button.to_html("button")));

        out.push_str(&format!(
            "<form id=\"{}\">\n  <input type=\"file\" id=\"{}\" name=\"file\" accept=\".csv\">\n  {}\n  {}\n</form>\n",
            escape_html(&self.layout.upload_form),
            escape_html(&self.layout.file_input),
            self.file_label.to_html("span"),
            self.upload_button.to_html("button"),
        ));

        out.push_str(&self.notice.to_html("div"));
        out.push('\n');

        match self.mode {
            RenderMode::Gauge => {
                out.push_str(&self.welcome_state.to_html("section"));
                out.push('\n');
                let result_body = format!(
                    "{}{}{}{}{}",
                    self.gauge_fill.to_html("div"),
                    self.result_percent.to_html("span"),
                    self.risk_label.to_html("h3"),
                    self.risk_desc.to_html("p"),
                    self.factors_list.to_html("div"),
                );
                let mut result_state = self.result_state.clone();
                result_state.inner_html = result_body;
                out.push_str(&result_state.to_html("section"));
                out.push('\n');
                let mut batch_state = self.batch_state.clone();
                batch_state.inner_html = self.batch_table.to_html("div");
                out.push_str(&batch_state.to_html("section"));
            }
            RenderMode::Plain => {
                out.push_str(&self.result_state.to_html("div"));
                out.push('\n');
                out.push_str(&self.batch_table.to_html("div"));
            }
        }

        out.push_str("\n</body>\n</html>\n");
        out
    }
}
