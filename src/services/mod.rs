pub mod chart_service;
pub mod history_service;
pub mod merge_service;
pub mod metrics_service;
pub mod power_law_service;
pub mod sampling_service;
