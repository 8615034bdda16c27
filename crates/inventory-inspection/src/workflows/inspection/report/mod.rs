mod render;
pub mod views;

pub use render::render;
pub use views::ReportDocument;
