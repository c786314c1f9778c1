pub mod row;
pub mod save;
pub mod ui;

pub use row::ClickableRow;
pub use save::{SaveButton, SaveStatus};
