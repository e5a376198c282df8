mod components;
mod view;

pub use view::{Pane, PopupRender, UiContext, draw};
