mod banner;
mod fields;
mod footer;
mod layout;
mod popup;
mod records;

pub use fields::render_form_pane;
pub use footer::render_footer;
pub use popup::render_popup;
pub use records::render_records_pane;
