pub mod chart;
pub mod history;
pub mod record;
pub mod setup;
pub mod summary;
pub mod track;
pub mod ui;
