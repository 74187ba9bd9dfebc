pub mod resolver;
pub mod table;
pub mod validation;

pub use resolver::{resolve_criterion, Criterion, Field};
pub use table::{load_rubric, CellValue, RubricRow, RubricTable};
pub use validation::validate_rubric;
