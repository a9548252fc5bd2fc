// todo-tui - in-memory todo list rendered in the terminal

pub mod generator;
pub mod todo;
pub mod todo_list;
pub mod ui;

pub use generator::{RandomGenerator, TodoGenerator};
pub use todo::{Filter, Todo, TodoDraft, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};
pub use todo_list::{visible_todos, Counts, TodoStore, BULK_COUNT};
pub use ui::{render, run_app, App, Focus};
