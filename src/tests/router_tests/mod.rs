mod analytics_tests;
mod auth_tests;
mod dashboard_tests;
mod deal_tests;
