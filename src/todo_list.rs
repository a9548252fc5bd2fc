use crate::generator::{RandomGenerator, TodoGenerator};
use crate::todo::{trim_title, Filter, Todo, TodoDraft};
use tracing::{debug, info};

pub const BULK_COUNT: usize = 1_000;

/// Totals shown in the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// In-memory todo list plus the active filter.
#[derive(Debug)]
pub struct TodoStore<G = RandomGenerator> {
    todos: Vec<Todo>,
    filter: Filter,
    generator: G,
}

impl TodoStore<RandomGenerator> {
    pub fn new() -> Self {
        Self::with_generator(RandomGenerator::new())
    }
}

impl Default for TodoStore<RandomGenerator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: TodoGenerator> TodoStore<G> {
    pub fn with_generator(generator: G) -> Self {
        Self {
            todos: Vec::new(),
            filter: Filter::All,
            generator,
        }
    }

    /// Append a todo built from `draft` and clear it.
    ///
    /// The title is trimmed; a blank title leaves both the list and the draft
    /// untouched and returns `None`. The description is stored as typed.
    pub fn add(&mut self, draft: &mut TodoDraft) -> Option<&Todo> {
        let title = trim_title(&draft.title);
        if title.is_empty() {
            debug!("Ignoring add with blank title");
            return None;
        }

        let todo = Todo {
            id: self.generator.next_id(),
            title: title.to_string(),
            description: draft.description.clone(),
            completed: false,
        };
        debug!(id = %todo.id, "Adding todo");
        self.todos.push(todo);
        draft.clear();
        self.todos.last()
    }

    pub fn bulk_generate(&mut self, n: usize) {
        self.todos.reserve(n);
        for _ in 0..n {
            let todo = self.generator.random_todo();
            self.todos.push(todo);
        }
        info!(count = n, total = self.todos.len(), "Generated todos");
    }

    /// Flip `completed` on the todo with `id`. Unknown ids are ignored.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.todos.iter_mut().find(|t| t.id == id) {
            Some(todo) => {
                todo.completed = !todo.completed;
                debug!(id, completed = todo.completed, "Toggled todo");
                true
            }
            None => {
                debug!(id, "Toggle for unknown id ignored");
                false
            }
        }
    }

    pub fn set_filter(&mut self, filter: Filter) {
        debug!(%filter, "Filter changed");
        self.filter = filter;
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn visible_todos(&self) -> Vec<&Todo> {
        visible_todos(&self.todos, self.filter)
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn counts(&self) -> Counts {
        let completed = self.todos.iter().filter(|t| t.completed).count();
        Counts {
            total: self.todos.len(),
            completed,
            pending: self.todos.len() - completed,
        }
    }
}

/// Todos passing `filter`, in list order.
pub fn visible_todos(todos: &[Todo], filter: Filter) -> Vec<&Todo> {
    todos.iter().filter(|t| filter.matches(t)).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Deterministic generator: ids "id-0", "id-1", ..., alternating completion.
    #[derive(Debug, Default)]
    pub(crate) struct SequentialGenerator {
        next: usize,
    }

    impl TodoGenerator for SequentialGenerator {
        fn next_id(&mut self) -> String {
            let id = format!("id-{}", self.next);
            self.next += 1;
            id
        }

        fn random_todo(&mut self) -> Todo {
            let completed = self.next % 2 == 1;
            let id = self.next_id();
            Todo {
                title: format!("Generated {id}"),
                description: format!("Description for {id}"),
                id,
                completed,
            }
        }
    }

    fn store() -> TodoStore<SequentialGenerator> {
        TodoStore::with_generator(SequentialGenerator::default())
    }

    #[test]
    fn test_add_buy_milk() {
        let mut store = store();
        let mut draft = TodoDraft::new("Buy milk", "2%");

        let added = store.add(&mut draft).cloned();

        assert_eq!(
            added,
            Some(Todo {
                id: "id-0".to_string(),
                title: "Buy milk".to_string(),
                description: "2%".to_string(),
                completed: false,
            })
        );
        assert_eq!(store.todos().len(), 1);
        assert_eq!(draft, TodoDraft::default());
    }

    #[test]
    fn test_add_trims_title_but_not_description() {
        let mut store = store();
        let mut draft = TodoDraft::new("  Call mom \t", "  after work ");
        store.add(&mut draft);

        assert_eq!(store.todos()[0].title, "Call mom");
        assert_eq!(store.todos()[0].description, "  after work ");
    }

    #[test]
    fn test_add_blank_title_is_noop() {
        let mut store = store();
        let mut draft = TodoDraft::new("   ", "kept");

        assert!(store.add(&mut draft).is_none());
        assert!(store.is_empty());
        assert_eq!(draft, TodoDraft::new("   ", "kept"));
    }

    #[test]
    fn test_add_title_whitespace_set() {
        let mut store = store();
        let mut draft = TodoDraft::new("\u{FEFF}", "");

        assert!(store.add(&mut draft).is_none());
        assert!(store.is_empty());

        let mut draft = TodoDraft::new("\u{0085}", "");
        assert!(store.add(&mut draft).is_some());
        assert_eq!(store.todos()[0].title, "\u{0085}");
    }

    #[test]
    fn test_add_counts_only_non_empty_titles() {
        let mut store = store();
        let titles = ["a", " ", "b", "", "\n", "c  "];
        for title in titles {
            let mut draft = TodoDraft::new(title, "");
            store.add(&mut draft);
        }
        assert_eq!(store.len(), 3);
        assert!(store.todos().iter().all(|t| !t.completed));
        let added: Vec<&str> = store.todos().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(added, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_bulk_generate_appends_after_existing() {
        let mut store = store();
        store.add(&mut TodoDraft::new("first", ""));
        store.bulk_generate(BULK_COUNT);

        assert_eq!(store.len(), BULK_COUNT + 1);
        assert_eq!(store.todos()[0].title, "first");
        assert_eq!(store.todos()[1].id, "id-1");
        assert_eq!(store.todos()[BULK_COUNT].id, format!("id-{BULK_COUNT}"));
    }

    #[test]
    fn test_bulk_generate_with_random_generator() {
        let mut store = TodoStore::with_generator(RandomGenerator::seeded(9));
        store.bulk_generate(BULK_COUNT);

        assert_eq!(store.len(), 1000);
        assert!(store.todos().iter().all(|t| !t.id.is_empty()));
        let unique: std::collections::HashSet<&str> =
            store.todos().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(unique.len(), 1000);
    }

    #[test]
    fn test_toggle_is_involution() {
        let mut store = store();
        store.bulk_generate(4);
        let before = store.todos().to_vec();

        assert!(store.toggle("id-2"));
        assert_ne!(store.todos()[2].completed, before[2].completed);
        assert_eq!(store.todos()[1], before[1]);
        assert!(store.toggle("id-2"));
        assert_eq!(store.todos(), before.as_slice());
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let mut store = store();
        store.bulk_generate(3);
        let before = store.todos().to_vec();

        assert!(!store.toggle("missing"));
        assert_eq!(store.todos(), before.as_slice());
    }

    #[test]
    fn test_visible_todos_by_filter() {
        let mut store = store();
        store.bulk_generate(6);

        let ids = |store: &TodoStore<SequentialGenerator>| -> Vec<String> {
            store.visible_todos().iter().map(|t| t.id.clone()).collect()
        };

        assert_eq!(ids(&store).len(), 6);
        store.set_filter(Filter::Completed);
        assert_eq!(ids(&store), vec!["id-1", "id-3", "id-5"]);
        store.set_filter(Filter::Pending);
        assert_eq!(ids(&store), vec!["id-0", "id-2", "id-4"]);
        assert_eq!(store.filter(), Filter::Pending);
    }

    #[test]
    fn test_toggle_then_filter_pending() {
        let mut store = store();
        store.add(&mut TodoDraft::new("one", ""));
        store.add(&mut TodoDraft::new("two", ""));
        store.toggle("id-0");
        store.set_filter(Filter::Pending);

        let visible = store.visible_todos();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "two");
    }

    #[test]
    fn test_counts() {
        let mut store = store();
        store.bulk_generate(5);
        assert_eq!(
            store.counts(),
            Counts {
                total: 5,
                completed: 2,
                pending: 3
            }
        );
    }
}
