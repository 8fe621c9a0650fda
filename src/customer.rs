use crate::error::FormError;

/// Customers the backend has an extraction schema for.
pub const CUSTOMER_NAMES: [&str; 4] = ["voorbeelden", "allseas", "visdeal", "berencourt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomerInputMode {
    #[default]
    Dropdown,
    FreeText,
}

impl CustomerInputMode {
    pub fn label(&self) -> &'static str {
        match self {
            CustomerInputMode::Dropdown => "Select from Dropdown",
            CustomerInputMode::FreeText => "Enter Customer Name",
        }
    }
}

pub fn is_known_customer(name: &str) -> bool {
    CUSTOMER_NAMES.contains(&name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSelection {
    pub mode: CustomerInputMode,
    pub dropdown: String,
    pub free_text: String,
}

impl Default for CustomerSelection {
    fn default() -> Self {
        Self {
            mode: CustomerInputMode::Dropdown,
            dropdown: CUSTOMER_NAMES[0].to_string(),
            free_text: String::new(),
        }
    }
}

impl CustomerSelection {
    pub fn select(&mut self, mode: CustomerInputMode, value: &str) {
        self.mode = mode;
        match mode {
            CustomerInputMode::Dropdown => {
                // The dropdown can only ever hold a listed name.
                if is_known_customer(value) {
                    self.dropdown = value.to_string();
                }
            }
            CustomerInputMode::FreeText => self.free_text = value.to_string(),
        }
    }

    /// The name currently shown to the user, valid or not.
    pub fn current(&self) -> &str {
        match self.mode {
            CustomerInputMode::Dropdown => &self.dropdown,
            CustomerInputMode::FreeText => &self.free_text,
        }
    }

    /// Live check for the form: an empty entry is not flagged until submit.
    pub fn inline_error(&self) -> Option<FormError> {
        let name = self.current();
        if !name.is_empty() && !is_known_customer(name) {
            Some(FormError::InvalidCustomer(name.to_string()))
        } else {
            None
        }
    }

    pub fn validated(&self) -> Result<String, FormError> {
        let name = self.current();
        if name.trim().is_empty() {
            return Err(FormError::MissingCustomer);
        }
        if !is_known_customer(name) {
            return Err(FormError::InvalidCustomer(name.to_string()));
        }
        Ok(name.to_string())
    }
}
