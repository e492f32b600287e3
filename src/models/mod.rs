pub mod note;
pub mod project;
pub mod refresh_token;
pub mod task;
pub mod user;

pub use note::Note;
pub use project::{Project, ProjectStatus, ProjectView};
pub use refresh_token::RefreshToken;
pub use task::Task;
pub use user::User;
