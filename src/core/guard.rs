use crate::core::page::{ButtonSlot, Page};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

pub const BUSY_LABEL: &str = "<i class=\"fa-solid fa-circle-notch fa-spin\"></i> Analyzing...";

pub(crate) fn lock_page(page: &Mutex<Page>) -> MutexGuard<'_, Page> {
    page.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Scoped "request in flight" state for one submit button.
///
/// Acquiring sets the in-flight flag, disables the button and swaps its
/// label; dropping puts all three back, whichever way the submit ends.
pub struct SubmitGuard<'a> {
    in_flight: &'a AtomicBool,
    page: &'a Mutex<Page>,
    slot: ButtonSlot,
    original_label: String,
}

impl<'a> SubmitGuard<'a> {
    /// Returns `None` when a request from this button is already running.
    pub fn acquire(in_flight: &'a AtomicBool, page: &'a Mutex<Page>, slot: ButtonSlot) -> Option<Self> {
        if in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }

        let mut page_ref = lock_page(page);
        let button = page_ref.button_mut(slot);
        let original_label = std::mem::replace(&mut button.inner_html, BUSY_LABEL.to_string());
        button.disabled = true;

        Some(Self {
            in_flight,
            page,
            slot,
            original_label,
        })
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        {
            let mut page = lock_page(self.page);
            let button = page.button_mut(self.slot);
            button.inner_html = std::mem::take(&mut self.original_label);
            button.disabled = false;
        }
        self.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::page::{Document, PageLayout, PREDICT_LABEL};
    use crate::domain::ports::RenderMode;

    fn page() -> Mutex<Page> {
        let layout = PageLayout::default();
        Mutex::new(Page::bind(&Document::from_layout(&layout), &layout, RenderMode::Gauge).unwrap())
    }

    #[test]
    fn test_guard_disables_and_restores_button() {
        let page = page();
        let flag = AtomicBool::new(false);

        {
            let _guard = SubmitGuard::acquire(&flag, &page, ButtonSlot::Predict).unwrap();
            let p = lock_page(&page);
            assert!(p.predict_button.disabled);
            assert_eq!(p.predict_button.inner_html, BUSY_LABEL);
            assert!(!p.upload_button.disabled);
        }

        let p = lock_page(&page);
        assert!(!p.predict_button.disabled);
        assert_eq!(p.predict_button.inner_html, PREDICT_LABEL);
        assert!(!flag.load(Ordering::Acquire));
    }

    #[test]
    fn test_second_acquire_is_refused() {
        let page = page();
        let flag = AtomicBool::new(false);

        let first = SubmitGuard::acquire(&flag, &page, ButtonSlot::Upload);
        assert!(first.is_some());
        assert!(SubmitGuard::acquire(&flag, &page, ButtonSlot::Upload).is_none());
        drop(first);
        assert!(SubmitGuard::acquire(&flag, &page, ButtonSlot::Upload).is_some());
    }
}
