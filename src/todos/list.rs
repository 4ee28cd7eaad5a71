use crate::api::Todo;
use crate::mvi::{Intent, Reducer, State};

/// The locally held todo list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TodoList {
    items: Vec<Todo>,
}

impl State for TodoList {}

impl TodoList {
    pub fn new(items: Vec<Todo>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn get(&self, id: u64) -> Option<&Todo> {
        self.items.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The first `limit` items, or all of them if there are fewer.
    pub fn visible(&self, limit: usize) -> &[Todo] {
        &self.items[..limit.min(self.items.len())]
    }

    /// Only the items belonging to `user_id`, in their original order.
    pub fn owned_by(&self, user_id: u64) -> TodoList {
        let items = self
            .items
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        TodoList { items }
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|t| t.completed).count()
    }

    fn next_id(&self) -> u64 {
        self.items.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }
}

#[derive(Debug, Clone)]
pub enum TodoIntent {
    /// Swap in a freshly fetched or cached list.
    Replace(Vec<Todo>),
    /// Invert the completed flag of one item.
    Toggle(u64),
    /// Append a new item. Blank titles are ignored.
    Add { title: String, user_id: u64 },
    Remove(u64),
}

impl Intent for TodoIntent {
    fn label(&self) -> &'static str {
        match self {
            Self::Replace(_) => "todos/replace",
            Self::Toggle(_) => "todos/toggle",
            Self::Add { .. } => "todos/add",
            Self::Remove(_) => "todos/remove",
        }
    }
}

pub struct TodoReducer;

impl Reducer for TodoReducer {
    type State = TodoList;
    type Intent = TodoIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            TodoIntent::Replace(items) => TodoList { items },
            TodoIntent::Toggle(id) => {
                if let Some(todo) = state.items.iter_mut().find(|t| t.id == id) {
                    todo.completed = !todo.completed;
                }
                state
            }
            TodoIntent::Add { title, user_id } => {
                let title = title.trim();
                if title.is_empty() {
                    return state;
                }
                let id = state.next_id();
                state.items.push(Todo {
                    id,
                    user_id,
                    title: title.to_string(),
                    completed: false,
                });
                state
            }
            TodoIntent::Remove(id) => {
                state.items.retain(|t| t.id != id);
                state
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todos(n: u64) -> Vec<Todo> {
        (1..=n)
            .map(|id| Todo {
                id,
                user_id: 1 + id % 3,
                title: format!("task {}", id),
                completed: id % 2 == 0,
            })
            .collect()
    }

    #[test]
    fn visible_caps_at_limit() {
        for n in [3, 10, 300] {
            let list = TodoList::new(todos(n));
            assert_eq!(list.visible(10).len(), (n as usize).min(10));
        }
        assert!(TodoList::default().visible(10).is_empty());
        assert_eq!(TodoList::new(todos(300)).visible(10)[9].id, 10);
    }

    #[test]
    fn toggle_flips_exactly_one_item() {
        let before = TodoList::new(todos(5));
        let after = TodoReducer::reduce(before.clone(), TodoIntent::Toggle(3));

        for (old, new) in before.items().iter().zip(after.items()) {
            if old.id == 3 {
                assert_eq!(new.completed, !old.completed);
                assert_eq!(new.title, old.title);
                assert_eq!(new.user_id, old.user_id);
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn toggle_unknown_id_is_noop() {
        let before = TodoList::new(todos(2));
        assert_eq!(TodoReducer::reduce(before.clone(), TodoIntent::Toggle(99)), before);
    }

    #[test]
    fn add_assigns_next_id() {
        let list = TodoReducer::reduce(
            TodoList::new(todos(4)),
            TodoIntent::Add {
                title: "  write docs ".into(),
                user_id: 7,
            },
        );
        let added = list.get(5).unwrap();
        assert_eq!(added.title, "write docs");
        assert_eq!(added.user_id, 7);
        assert!(!added.completed);
    }

    #[test]
    fn add_ignores_blank_title() {
        let before = TodoList::new(todos(1));
        let after = TodoReducer::reduce(
            before.clone(),
            TodoIntent::Add {
                title: "   ".into(),
                user_id: 1,
            },
        );
        assert_eq!(after, before);
    }

    #[test]
    fn add_to_empty_list_starts_at_one() {
        let list = TodoReducer::reduce(
            TodoList::default(),
            TodoIntent::Add {
                title: "first".into(),
                user_id: 1,
            },
        );
        assert_eq!(list.items()[0].id, 1);
    }

    #[test]
    fn remove_drops_only_that_item() {
        let list = TodoReducer::reduce(TodoList::new(todos(3)), TodoIntent::Remove(2));
        let ids: Vec<u64> = list.items().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn completed_count() {
        assert_eq!(TodoList::new(todos(4)).completed_count(), 2);
    }

    #[test]
    fn owned_by_keeps_order() {
        let list = TodoList::new(todos(6));
        let ids: Vec<u64> = list.owned_by(2).items().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 4]);
        assert!(list.owned_by(9).is_empty());
    }
}
