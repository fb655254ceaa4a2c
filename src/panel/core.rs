use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

type KeyupListener = Box<dyn Fn() + Send + Sync>;

/// Handle returned by [`TextField::listen`], used to detach the listener again.
pub struct ListenerHandle(usize);

/// The place-name input field. Carries the current value and a registry of
/// key-up listeners fired on every edit.
#[derive(Clone, Default)]
pub struct TextField {
    inner: Arc<TextFieldInner>,
}

#[derive(Default)]
struct TextFieldInner {
    value: RwLock<String>,
    listeners: Mutex<HashMap<usize, KeyupListener>>,
    next_listener: AtomicUsize,
}

impl TextField {
    pub fn value(&self) -> String {
        self.inner.value.read().unwrap().clone()
    }

    /// Replaces the field value and fires every registered listener, the way
    /// a burst of keystrokes would.
    pub fn enter_text(&self, text: &str) {
        *self.inner.value.write().unwrap() = text.to_string();

        for listener in self.inner.listeners.lock().unwrap().values() {
            listener();
        }
    }

    pub fn listen(&self, callback: impl Fn() + Send + Sync + 'static) -> ListenerHandle {
        let id = self.inner.next_listener.fetch_add(1, Ordering::SeqCst);
        self.inner
            .listeners
            .lock()
            .unwrap()
            .insert(id, Box::new(callback));
        ListenerHandle(id)
    }

    pub fn unlisten(&self, handle: &ListenerHandle) {
        self.inner.listeners.lock().unwrap().remove(&handle.0);
    }
}

/// A numeric output field. Holds the string-formatted value the way a form
/// field would.
#[derive(Clone, Default)]
pub struct NumberField {
    value: Arc<RwLock<String>>,
}

impl NumberField {
    pub fn value(&self) -> String {
        self.value.read().unwrap().clone()
    }

    pub fn set_number(&self, value: f64) {
        *self.value.write().unwrap() = value.to_string();
    }
}

/// The status container under the input: a line of text plus an error marker.
#[derive(Clone, Default)]
pub struct StatusPanel {
    inner: Arc<RwLock<StatusState>>,
}

#[derive(Default)]
struct StatusState {
    text: String,
    error: bool,
}

impl StatusPanel {
    pub fn text(&self) -> String {
        self.inner.read().unwrap().text.clone()
    }

    pub fn has_error(&self) -> bool {
        self.inner.read().unwrap().error
    }

    pub fn show_error(&self, message: &str) {
        let mut state = self.inner.write().unwrap();
        state.text = message.to_string();
        state.error = true;
    }

    pub fn show(&self, text: &str) {
        let mut state = self.inner.write().unwrap();
        state.text = text.to_string();
        state.error = false;
    }

    // Empties the text but leaves the error marker as it was
    pub fn clear_text(&self) {
        self.inner.write().unwrap().text.clear();
    }
}

/// The widget's slice of the page: the `loi` input, the `lng`/`lat` outputs
/// and the status container. Clone shares the underlying fields.
#[derive(Clone, Default)]
pub struct GeocodePanel {
    pub loi: TextField,
    pub lng: NumberField,
    pub lat: NumberField,
    pub output: StatusPanel,
}

impl GeocodePanel {
    pub fn new() -> Self {
        Self::default()
    }
}
