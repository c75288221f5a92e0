pub mod deal_form;
pub mod email_cta;
pub mod metrics_card;
pub mod month_bars;
pub mod pipeline;

pub use deal_form::deal_form;
pub use email_cta::email_cta_form;
pub use metrics_card::metrics_card;
pub use month_bars::month_bars;
pub use pipeline::{deal_card, pipeline_column};
