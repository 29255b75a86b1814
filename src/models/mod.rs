pub mod todo;
pub mod user;

pub use todo::{NewTodo, Todo, TodoChanges};
pub use user::{Credentials, Profile, User};
