pub mod handlers;
pub mod header;
pub mod home;
pub mod leave_dialog;
pub mod notes;
pub mod preview_area;
pub mod results;
pub mod upload_section;
pub mod utils;
