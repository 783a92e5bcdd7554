mod account;
mod add_patient;
mod all_patients;
mod edit_patient;
mod login;
mod not_found;
mod register;
mod start;

pub use account::AccountManagement;
pub use add_patient::AddPatient;
pub use all_patients::AllPatients;
pub use edit_patient::EditPatient;
pub use login::Login;
pub use not_found::NotFound;
pub use register::Register;
pub use start::Start;
