use crate::model::JournalError;

/// Host clipboard seam. Failures map onto the journal error taxonomy
/// and never disturb journal state.
pub trait Clipboard {
    fn read_text(&mut self) -> Result<String, JournalError>;
    fn write_text(&mut self, contents: &str) -> Result<(), JournalError>;
}

/// System clipboard via arboard, initialized on first use so that
/// merely opening the app never fails on a headless display.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        SystemClipboard { inner: None }
    }

    fn ensure(&mut self) -> Option<&mut arboard::Clipboard> {
        if self.inner.is_none() {
            self.inner = arboard::Clipboard::new().ok();
        }
        self.inner.as_mut()
    }
}

impl Clipboard for SystemClipboard {
    fn read_text(&mut self) -> Result<String, JournalError> {
        self.ensure()
            .ok_or(JournalError::PasteFailed)?
            .get_text()
            .map_err(|_| JournalError::PasteFailed)
    }

    fn write_text(&mut self, contents: &str) -> Result<(), JournalError> {
        self.ensure()
            .ok_or(JournalError::CopyFailed)?
            .set_text(contents.to_string())
            .map_err(|_| JournalError::CopyFailed)
    }
}
