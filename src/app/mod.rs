pub(crate) mod input;
pub(crate) mod keymap;
mod form_ui;
mod options;
mod popup;
mod runtime;
mod status;
mod terminal;

pub use form_ui::FormUI;
pub use options::UiOptions;
