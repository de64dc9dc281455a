//! Presentation state for a single todo list view.
//!
//! # Design
//! `TodoBoard` owns everything a view needs to render: the list, the draft
//! being typed, the search query and the busy flags. Each user action is a
//! method. Errors are logged here, at the call site that issued the request,
//! and returned; busy flags are reset on every path.
//!
//! State sits behind a mutex because the debounced search task updates the
//! list after the `search` call has returned. The lock is never held across
//! an await.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;

use crate::api::ApiClient;
use crate::debounce::{Debouncer, SEARCH_DELAY};
use crate::error::ApiError;
use crate::types::Todo;

/// Per-item request in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Toggling(String),
    Deleting(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    pub todos: Vec<Todo>,
    pub draft: Todo,
    pub query: String,
    pub busy: bool,
    pub searching: bool,
    pub pending: Option<PendingAction>,
}

impl BoardState {
    /// The draft can be submitted: not busy, non-empty, and no search query is
    /// active.
    pub fn can_submit(&self) -> bool {
        !self.busy && !self.draft.text.is_empty() && self.query.is_empty()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.busy {
            "Loading..."
        } else if self.draft.is_draft() {
            "Add"
        } else {
            "Update"
        }
    }

    /// Deleting is disabled while an existing todo is being edited.
    pub fn can_delete(&self) -> bool {
        self.draft.is_draft()
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        if !self.todos.is_empty() {
            None
        } else if self.query.is_empty() {
            Some("No todos")
        } else {
            Some("No Result")
        }
    }

    pub fn is_pending(&self, action: &PendingAction) -> bool {
        self.pending.as_ref() == Some(action)
    }
}

pub struct TodoBoard {
    api: Arc<ApiClient>,
    state: Arc<Mutex<BoardState>>,
    search: Debouncer,
}

impl TodoBoard {
    pub fn new(api: Arc<ApiClient>, todos: Vec<Todo>) -> Self {
        Self::with_search_delay(api, todos, SEARCH_DELAY)
    }

    pub fn with_search_delay(api: Arc<ApiClient>, todos: Vec<Todo>, delay: Duration) -> Self {
        let state = BoardState {
            todos,
            ..BoardState::default()
        };
        Self {
            api,
            state: Arc::new(Mutex::new(state)),
            search: Debouncer::new(delay),
        }
    }

    /// Run debounced searches on `runtime`, so `search` can be called from
    /// threads outside it.
    pub fn on_runtime(mut self, runtime: Handle) -> Self {
        self.search = Debouncer::on_runtime(self.search.delay(), runtime);
        self
    }

    /// Board populated with the unfiltered list.
    pub async fn load(api: Arc<ApiClient>) -> Result<Self, ApiError> {
        let todos = api.list_todos(None).await?;
        Ok(Self::new(api, todos))
    }

    pub fn snapshot(&self) -> BoardState {
        self.state.lock().clone()
    }

    pub fn set_draft_text(&self, text: impl Into<String>) {
        self.state.lock().draft.text = text.into();
    }

    /// Copy the todo with `id` into the draft. Returns false if it is not
    /// in the list.
    pub fn edit(&self, id: &str) -> bool {
        let mut state = self.state.lock();
        match state.todos.iter().find(|todo| todo.id == id).cloned() {
            Some(todo) => {
                state.draft = todo;
                true
            }
            None => false,
        }
    }

    /// Create or update the draft, then refresh the list.
    ///
    /// Returns `Ok(false)` without issuing a request when the draft text is
    /// empty or another submit is still running.
    pub async fn submit(&self) -> Result<bool, ApiError> {
        let draft = {
            let mut state = self.state.lock();
            if state.busy || state.draft.text.is_empty() {
                return Ok(false);
            }
            state.busy = true;
            state.draft.clone()
        };

        let result = self.save(&draft).await;
        self.state.lock().busy = false;
        if let Err(err) = &result {
            tracing::error!(error = %err, "failed to save todo");
        }
        result.map(|()| true)
    }

    async fn save(&self, draft: &Todo) -> Result<(), ApiError> {
        if draft.is_draft() {
            self.api.create_todo(draft).await?;
        } else {
            self.api.update_todo(draft).await?;
        }
        self.state.lock().draft = Todo::default();
        self.reload().await
    }

    /// Flip completion of the todo with `id`. Unknown ids are ignored.
    pub async fn toggle(&self, id: &str) -> Result<(), ApiError> {
        let todo = {
            let mut state = self.state.lock();
            state.pending = Some(PendingAction::Toggling(id.to_string()));
            state.todos.iter().find(|todo| todo.id == id).cloned()
        };
        let result = match todo {
            Some(todo) => self.flip(&todo).await,
            None => Ok(()),
        };
        self.state.lock().pending = None;
        if let Err(err) = &result {
            tracing::error!(error = %err, id, "failed to toggle todo");
        }
        result
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.state.lock().pending = Some(PendingAction::Deleting(id.to_string()));
        let result = self.remove(id).await;
        self.state.lock().pending = None;
        if let Err(err) = &result {
            tracing::error!(error = %err, id, "failed to delete todo");
        }
        result
    }

    async fn flip(&self, todo: &Todo) -> Result<(), ApiError> {
        self.api.update_todo(&todo.toggled()).await?;
        self.reload().await
    }

    async fn remove(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete_todo(id).await?;
        self.reload().await
    }

    /// Store `query` and schedule a debounced search for it.
    ///
    /// Must be called from within a tokio runtime unless the board was bound
    /// to one with [`TodoBoard::on_runtime`].
    pub fn search(&self, query: impl Into<String>) {
        let query = query.into();
        self.state.lock().query = query.clone();

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        self.search.schedule(async move {
            state.lock().searching = true;
            match api.list_todos(Some(&query)).await {
                Ok(todos) => state.lock().todos = todos,
                Err(err) => tracing::error!(error = %err, %query, "search failed"),
            }
            state.lock().searching = false;
        });
    }

    /// Re-fetch the list, filtered by the current query if there is one.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let result = self.reload().await;
        if let Err(err) = &result {
            tracing::error!(error = %err, "failed to refresh todos");
        }
        result
    }

    async fn reload(&self) -> Result<(), ApiError> {
        let query = {
            let state = self.state.lock();
            (!state.query.is_empty()).then(|| state.query.clone())
        };
        let todos = self.api.list_todos(query.as_deref()).await?;
        self.state.lock().todos = todos;
        Ok(())
    }
}
