use ratatui::widgets::TableState;
use taskdeck_core::{FileTaskRepository, SortDirection, StoreError, TaskListStore};

pub enum InputMode {
    Normal,
    Adding,
    Editing,
    Searching,
}

#[derive(Clone, Copy, PartialEq)]
pub enum SortMode {
    None,
    TextAscending,
    TextDescending,
    DueDate,
}

impl SortMode {
    pub fn label(self) -> &'static str {
        match self {
            SortMode::None => "insertion",
            SortMode::TextAscending => "text ↑",
            SortMode::TextDescending => "text ↓",
            SortMode::DueDate => "due date",
        }
    }
}

/// TUI state around the store: selection, input buffer and the active
/// input mode. The store itself stays the single owner of the task
/// collection; every key handler below forwards into one store
/// operation and the next draw re-reads the derived views.
pub struct App {
    pub store: TaskListStore<FileTaskRepository>,
    pub state: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub status: Option<String>,
    pub sort_mode: SortMode,
}

impl App {
    pub fn new(store: TaskListStore<FileTaskRepository>) -> App {
        let mut state = TableState::default();
        if !store.paginated_tasks().is_empty() {
            state.select(Some(0));
        }
        App {
            store,
            state,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            status: None,
            sort_mode: SortMode::None,
        }
    }

    fn visible_count(&self) -> usize {
        self.store.paginated_tasks().len()
    }

    fn selected_id(&self) -> Option<i64> {
        let i = self.state.selected()?;
        self.store.paginated_tasks().get(i).map(|t| t.id)
    }

    /// Keeps the cursor inside the page after the collection or the
    /// page changed under it.
    fn clamp_selection(&mut self) {
        let count = self.visible_count();
        match self.state.selected() {
            _ if count == 0 => self.state.select(None),
            Some(i) if i >= count => self.state.select(Some(count - 1)),
            None => self.state.select(Some(0)),
            _ => {}
        }
    }

    pub fn next(&mut self) {
        let count = self.visible_count();
        if count == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= count - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let count = self.visible_count();
        if count == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn next_page(&mut self) {
        let total = self.store.total_pages().max(1);
        let page = self.store.current_page();
        if page < total {
            self.store.set_current_page(page + 1);
            self.clamp_selection();
        }
    }

    pub fn previous_page(&mut self) {
        let page = self.store.current_page();
        if page > 1 {
            self.store.set_current_page(page - 1);
            self.clamp_selection();
        }
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            let result = self.store.toggle_completion(id);
            self.report(result.err());
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            let result = self.store.delete_task(id);
            self.report(result.err());
            self.clamp_selection();
        }
    }

    pub fn clear_completed(&mut self) {
        match self.store.delete_completed() {
            Ok(removed) => self.status = Some(format!("Removed {removed} completed task(s)")),
            Err(e) => self.status = Some(e.to_string()),
        }
        self.clamp_selection();
    }

    pub fn toggle_all(&mut self) {
        let result = self.store.toggle_all_completed();
        self.report(result.err());
    }

    pub fn cycle_sort(&mut self) {
        let (next, result) = match self.sort_mode {
            SortMode::None | SortMode::DueDate => (
                SortMode::TextAscending,
                self.store.sort_by_text(SortDirection::Ascending),
            ),
            SortMode::TextAscending => (
                SortMode::TextDescending,
                self.store.sort_by_text(SortDirection::Descending),
            ),
            SortMode::TextDescending => (SortMode::DueDate, self.store.sort_by_due_date()),
        };
        self.sort_mode = next;
        self.status = Some(format!("Sorted by {}", next.label()));
        self.report(result.err());
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input.clear();
        self.cursor_position = 0;
        self.status = None;
    }

    pub fn enter_edit_mode(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        self.store.begin_edit(id);
        // Prefill with the current text; the due date is re-entered via
        // a `due:` token, otherwise the task keeps its existing one
        self.input = self.store.edit_text.clone();
        self.store.edit_due_date.clear();
        self.cursor_position = self.input.chars().count();
        self.input_mode = InputMode::Editing;
        self.status = None;
    }

    pub fn enter_search_mode(&mut self) {
        self.input = self.store.search_text.clone();
        self.cursor_position = self.input.chars().count();
        self.input_mode = InputMode::Searching;
        self.status = None;
    }

    pub fn exit_input_mode(&mut self) {
        if matches!(self.input_mode, InputMode::Editing) {
            self.store.cancel_edit();
        }
        self.input_mode = InputMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn submit_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.submit_add(),
            InputMode::Editing => self.submit_edit(),
            InputMode::Searching => self.submit_search(),
            InputMode::Normal => {}
        }
    }

    fn submit_add(&mut self) {
        let (text, due) = split_due_token(&self.input);
        match self.store.add_task(&text, "", &due) {
            Ok(_) => {
                self.input_mode = InputMode::Normal;
                self.input.clear();
                self.cursor_position = 0;
                self.clamp_selection();
                self.status = None;
            }
            // Validation failure keeps the input so the user can fix it
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn submit_edit(&mut self) {
        let (text, due) = split_due_token(&self.input);
        self.store.edit_text = text;
        self.store.edit_due_date = due;
        match self.store.save_edit() {
            Ok(()) => {
                self.input_mode = InputMode::Normal;
                self.input.clear();
                self.cursor_position = 0;
                self.status = None;
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn submit_search(&mut self) {
        self.store.set_search_text(self.input.clone());
        self.store.set_current_page(1);
        self.input_mode = InputMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
        self.clamp_selection();
    }

    fn report(&mut self, err: Option<StoreError>) {
        if let Some(e) = err {
            self.status = Some(e.to_string());
        }
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self
            .input
            .chars()
            .take(self.cursor_position)
            .map(|c| c.len_utf8())
            .sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self
                .input
                .chars()
                .take(self.cursor_position - 1)
                .map(|c| c.len_utf8())
                .sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }
}

/// Pulls a `due:YYYY-MM-DD` token out of the input line; the remaining
/// words are the task text.
fn split_due_token(input: &str) -> (String, String) {
    let mut words = Vec::new();
    let mut due = String::new();
    for word in input.split_whitespace() {
        match word.strip_prefix("due:") {
            Some(value) => due = value.to_string(),
            None => words.push(word),
        }
    }
    (words.join(" "), due)
}
