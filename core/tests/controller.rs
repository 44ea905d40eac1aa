//! Screen-level behaviour of `TodoController` over the in-memory store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use todo_core::{
    ApiError, Filter, MemoryStore, NewTodo, OrderUpdate, Status, Subscription, Todo, TodoController, TodoEdit,
    TodoStore,
};
use uuid::Uuid;

/// Wraps `MemoryStore` and counts every mutation that reaches it.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
    reorders: std::sync::Mutex<Vec<Vec<OrderUpdate>>>,
}

impl CountingStore {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl TodoStore for CountingStore {
    fn subscribe(&self) -> Subscription {
        self.inner.subscribe()
    }

    async fn create(&self, todo: NewTodo) -> Result<Uuid, ApiError> {
        self.hit();
        self.inner.create(todo).await
    }

    async fn toggle(&self, id: Uuid) -> Result<(), ApiError> {
        self.hit();
        self.inner.toggle(id).await
    }

    async fn remove(&self, id: Uuid) -> Result<(), ApiError> {
        self.hit();
        self.inner.remove(id).await
    }

    async fn update(&self, id: Uuid, edit: TodoEdit) -> Result<(), ApiError> {
        self.hit();
        self.inner.update(id, edit).await
    }

    async fn reorder(&self, updates: Vec<OrderUpdate>) -> Result<(), ApiError> {
        self.hit();
        self.reorders.lock().unwrap().push(updates.clone());
        self.inner.reorder(updates).await
    }

    async fn remove_completed(&self) -> Result<usize, ApiError> {
        self.hit();
        self.inner.remove_completed().await
    }
}

struct Screen {
    controller: TodoController<CountingStore>,
    subscription: Subscription,
}

impl Screen {
    fn new() -> Self {
        let mut controller = TodoController::new(Arc::new(CountingStore::default()));
        let subscription = controller.subscribe();
        Self {
            controller,
            subscription,
        }
    }

    /// Apply whatever the store has published since the last call.
    fn settle(&mut self) {
        let feed = self.subscription.current();
        self.controller.apply(feed);
    }

    async fn add(&mut self, title: &str) -> Uuid {
        self.controller.set_title(title);
        let id = self.controller.submit().await.unwrap().unwrap();
        self.settle();
        id
    }

    fn store(&self) -> &CountingStore {
        self.controller.store()
    }

    fn texts(&self) -> Vec<String> {
        self.controller.todos().iter().map(|t| t.text.clone()).collect()
    }
}

fn find<'a>(todos: &'a [Todo], id: Uuid) -> &'a Todo {
    todos.iter().find(|t| t.id == id).unwrap()
}

#[tokio::test]
async fn empty_submission_makes_no_store_call() {
    let mut screen = Screen::new();
    screen.controller.focus_composer();
    screen.controller.set_title("   ");
    screen.controller.set_description("");

    assert_eq!(screen.controller.submit().await, Ok(None));
    assert_eq!(screen.store().calls(), 0);
}

#[tokio::test]
async fn title_only_creates_active_todo_after_highest_order() {
    let mut screen = Screen::new();
    screen.add("first").await;
    let id = screen.add("second").await;

    let todo = find(screen.controller.todos(), id).clone();
    assert_eq!(todo.text, "second");
    assert_eq!(todo.description, "");
    assert_eq!(todo.status, Status::OnProgress);
    let max_before = screen
        .controller
        .todos()
        .iter()
        .filter(|t| t.id != id)
        .map(|t| t.order)
        .max()
        .unwrap();
    assert_eq!(todo.order, max_before + 1);
}

#[tokio::test]
async fn toggling_twice_restores_status() {
    let mut screen = Screen::new();
    let id = screen.add("flip").await;

    screen.controller.toggle(id).await.unwrap();
    screen.settle();
    assert_eq!(find(screen.controller.todos(), id).status, Status::Completed);

    screen.controller.toggle(id).await.unwrap();
    screen.settle();
    assert_eq!(find(screen.controller.todos(), id).status, Status::OnProgress);
}

#[tokio::test]
async fn filters_and_search_shape_the_view() {
    let mut screen = Screen::new();
    let milk = screen.add("Buy milk").await;
    screen.add("Walk dog").await;
    screen.controller.toggle(milk).await.unwrap();
    screen.settle();

    screen.controller.set_filter(Filter::Completed);
    let shown: Vec<_> = screen.controller.visible().iter().map(|t| t.id).collect();
    assert_eq!(shown, vec![milk]);

    screen.controller.set_filter(Filter::All);
    screen.controller.toggle_search();
    screen.controller.set_search_query("DOG");
    let view = screen.controller.view();
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].title, "Walk dog");
    assert_eq!(view.items_left, "1 item left");
}

#[tokio::test]
async fn drag_in_filtered_view_renumbers_whole_list() {
    let mut screen = Screen::new();
    let mut ids = Vec::new();
    for title in ["a", "b", "c", "d", "e"] {
        ids.push(screen.add(title).await);
    }
    // Complete b and d so the Active view shows a, c, e.
    for id in [ids[1], ids[3]] {
        screen.controller.toggle(id).await.unwrap();
    }
    screen.settle();
    screen.controller.set_filter(Filter::Active);
    assert_eq!(screen.controller.visible().len(), 3);

    // Drag e (displayed index 2) to the top.
    assert_eq!(screen.controller.drag(2, 0).await, Ok(true));
    screen.settle();

    let batch = screen.store().reorders.lock().unwrap()[0].clone();
    assert_eq!(batch.len(), 5);
    let mut orders: Vec<i64> = batch.iter().map(|u| u.order).collect();
    orders.sort_unstable();
    assert_eq!(orders, vec![0, 1, 2, 3, 4]);
    assert_eq!(batch.iter().find(|u| u.id == ids[4]).unwrap().order, 0);

    assert_eq!(screen.texts(), vec!["e", "a", "b", "c", "d"]);
    let shown: Vec<_> = screen.controller.visible().iter().map(|t| t.text.clone()).collect();
    assert_eq!(shown, vec!["e", "a", "c"]);
}

#[tokio::test]
async fn drag_to_same_position_is_a_no_op() {
    let mut screen = Screen::new();
    screen.add("only").await;
    let calls = screen.store().calls();

    assert_eq!(screen.controller.drag(0, 0).await, Ok(false));
    assert_eq!(screen.store().calls(), calls);
}

#[tokio::test]
async fn deleting_selected_todo_closes_detail() {
    let mut screen = Screen::new();
    let id = screen.add("doomed").await;
    assert!(screen.controller.open_detail(id));

    screen.controller.delete_selected().await.unwrap();
    assert!(screen.controller.detail().is_none());
    screen.settle();
    assert!(screen.controller.todos().is_empty());
}

#[tokio::test]
async fn deleted_elsewhere_closes_detail_on_next_snapshot() {
    let mut screen = Screen::new();
    let id = screen.add("shared").await;
    screen.controller.open_detail(id);

    screen.store().inner.remove(id).await.unwrap();
    screen.settle();
    assert!(screen.controller.detail().is_none());
}

#[tokio::test]
async fn removing_a_missing_todo_is_satisfied() {
    let mut screen = Screen::new();
    assert_eq!(screen.controller.remove(Uuid::new_v4()).await, Ok(()));
}

#[tokio::test]
async fn saved_edit_reaches_store_and_detail() {
    let mut screen = Screen::new();
    let id = screen.add("draft").await;
    screen.controller.open_detail(id);
    screen.controller.begin_edit();
    {
        let draft = screen.controller.draft_mut().unwrap();
        draft.text = "final".to_string();
        draft.due_date = "2026-12-01".to_string();
    }

    assert_eq!(screen.controller.save_edit().await, Ok(true));
    screen.settle();

    let detail = screen.controller.detail().unwrap();
    assert!(!detail.is_editing());
    assert_eq!(detail.todo().text, "final");
    assert_eq!(detail.todo().due_date, "2026-12-01");
    assert_eq!(detail.todo().status, Status::OnProgress);
}

#[tokio::test]
async fn blank_edit_is_not_sent() {
    let mut screen = Screen::new();
    let id = screen.add("keep").await;
    screen.controller.open_detail(id);
    screen.controller.begin_edit();
    screen.controller.draft_mut().unwrap().text.clear();
    screen.controller.draft_mut().unwrap().description.clear();
    let calls = screen.store().calls();

    assert_eq!(screen.controller.save_edit().await, Ok(false));
    assert_eq!(screen.store().calls(), calls);
    assert!(screen.controller.detail().unwrap().is_editing());
}

#[tokio::test]
async fn clear_completed_keeps_other_orders() {
    let mut screen = Screen::new();
    let a = screen.add("a").await;
    let b = screen.add("b").await;
    let c = screen.add("c").await;
    screen.controller.toggle(b).await.unwrap();
    screen.settle();
    let before: Vec<_> = [a, c]
        .iter()
        .map(|id| find(screen.controller.todos(), *id).order)
        .collect();

    assert_eq!(screen.controller.clear_completed().await, Ok(1));
    screen.settle();

    let after: Vec<_> = screen.controller.todos().iter().map(|t| (t.id, t.order)).collect();
    assert_eq!(after, vec![(a, before[0]), (c, before[1])]);
}
