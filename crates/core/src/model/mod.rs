mod auth;
mod category;
mod ids;
mod progress;
mod question;
mod session;

pub use auth::{
    AuthSession, AuthUser, CallbackError, Credentials, CredentialsError, MIN_PASSWORD_LEN,
    authorization_code,
};
pub use category::{
    Category, FEATURED_CATEGORY_IDS, builtin_categories, featured_categories, is_featured,
};
pub use ids::{CategoryId, ParseIdError, UserId};
pub use progress::{DaysStreak, ProgressSnapshot};
pub use question::{MAX_OPTIONS, MIN_OPTIONS, Question, QuestionDraft, QuestionError};
pub use session::{FinalScore, FinalScoreError};
