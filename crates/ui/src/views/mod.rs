mod auth;
mod categories;
mod home;
mod quiz;
mod results;
mod splash;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use auth::{LoginView, SignupView};
pub use categories::{CategoriesView, CategoryGrid};
pub use home::HomeView;
pub use quiz::QuizView;
pub use results::ResultsView;
pub use splash::SplashView;
pub use state::{ViewError, ViewState, view_state_from_resource};
