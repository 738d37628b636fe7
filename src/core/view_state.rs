/// Which right-hand panel is visible. Exactly one is active at a time.
///
/// There is no transition back to `Welcome`; once a result has been shown
/// the page stays on a result panel until it is reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Welcome,
    Result,
    Batch,
}

impl ViewState {
    pub const ALL: [ViewState; 3] = [ViewState::Welcome, ViewState::Result, ViewState::Batch];

    pub fn after_prediction(self) -> ViewState {
        ViewState::Result
    }

    pub fn after_upload(self) -> ViewState {
        ViewState::Batch
    }
}
