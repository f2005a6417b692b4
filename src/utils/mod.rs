pub mod formatting;
pub mod html;
