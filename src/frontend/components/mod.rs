pub mod confirm_dialog;
pub mod data_table;
pub mod form_field;
pub mod layout;
pub mod notifications;
pub mod patient_form;
pub mod search_input;
pub mod ui_components;

pub use confirm_dialog::ConfirmDialog;
pub use data_table::DataTable;
pub use form_field::TextField;
pub use layout::DashboardLayout;
pub use notifications::Notifications;
pub use patient_form::PatientFormView;
pub use search_input::SearchInput;
pub use ui_components::NotFoundView;
