use serde::Serialize;

// A switch posting its new value to `action`.
#[derive(Debug, Serialize)]
pub(crate) struct Toggle {
    label: &'static str,
    action: String,
    value: bool,
}

impl Toggle {
    pub(crate) fn new(label: &'static str, action: String, value: bool) -> Self {
        Self {
            label,
            action,
            value,
        }
    }

    // A switch which is rendered but never posted.
    pub(crate) fn inert(label: &'static str, value: bool) -> Self {
        Self::new(label, String::new(), value)
    }

    #[cfg(test)]
    pub(crate) fn value(&self) -> bool {
        self.value
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Slider<T> {
    label: &'static str,
    action: String,
    min: T,
    max: T,
    step: T,
    value: T,
    disabled: bool,
}

impl<T> Slider<T> {
    pub(crate) fn new(
        label: &'static str,
        action: String,
        min: T,
        max: T,
        step: T,
        value: T,
    ) -> Self {
        Self {
            label,
            action,
            min,
            max,
            step,
            value,
            disabled: false,
        }
    }

    // Shows the slider at `value` without letting it be moved.
    pub(crate) fn disabled(mut self, value: T) -> Self {
        self.value = value;
        self.disabled = true;
        self
    }

    #[cfg(test)]
    pub(crate) fn is_disabled(&self) -> bool {
        self.disabled
    }
}

#[cfg(test)]
impl<T: Copy> Slider<T> {
    pub(crate) fn value(&self) -> T {
        self.value
    }
}

// A time of day field, formatted as `HH:MM`.
#[derive(Debug, Serialize)]
pub(crate) struct TimeInput {
    label: &'static str,
    value: &'static str,
}

impl TimeInput {
    pub(crate) fn new(label: &'static str, value: &'static str) -> Self {
        Self { label, value }
    }
}
