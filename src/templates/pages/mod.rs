pub mod analytics;
pub mod check_email;
pub mod dashboard;
pub mod deal_form;
pub mod error;
pub mod login;

pub use analytics::analytics_page;
pub use check_email::check_email_content;
pub use dashboard::dashboard_page;
pub use deal_form::deal_form_page;
pub use error::error_page;
pub use login::login_page;
