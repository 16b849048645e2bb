mod auth_vm;
mod category_vm;
mod quiz_vm;
mod results_vm;

pub use auth_vm::auth_error_message;
pub use category_vm::{CategoryCardVm, filter_categories, map_category_cards};
pub use quiz_vm::{OptionTone, OptionVm, QuizVm};
pub use results_vm::{ResultsVm, map_results};
