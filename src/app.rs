use crate::catalog::{Catalog, CatalogEvent, EventReceiver, Mutation, Outcome};
use crate::movie::{DraftFields, MovieId};
use crate::ui::form::{FormPurpose, MovieForm};
use crate::view::{Affordance, AffordanceKind, CatalogView};
use tracing::{debug, info, warn};

/// Input mode for the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Searching,
}

/// Rows taken by header, search bar, list borders and status line.
pub const LIST_OVERHEAD: u16 = 8;

/// Main application state.
pub struct App {
    pub catalog: Catalog,
    events: EventReceiver,

    pub should_quit: bool,
    pub show_help: bool,

    // Current render pass over the (possibly filtered) catalog
    pub view: CatalogView,
    pub selected: usize,
    pub page_size: usize,

    pub search: String,
    pub input_mode: InputMode,

    pub form: Option<MovieForm>,
    // Add-movie values kept while the form is closed
    create_fields: DraftFields,
    // A create request has been sent and not yet answered
    create_in_flight: bool,

    pub status_msg: String,
}

impl App {
    pub fn new(catalog: Catalog, events: EventReceiver) -> Self {
        Self {
            catalog,
            events,
            should_quit: false,
            show_help: false,
            view: CatalogView::Empty,
            selected: 0,
            page_size: 20,
            search: String::new(),
            input_mode: InputMode::Normal,
            form: None,
            create_fields: DraftFields::default(),
            create_in_flight: false,
            status_msg: "Loading movies...".to_string(),
        }
    }

    /// Initial data load.
    pub fn init(&mut self) {
        self.catalog.load();
    }

    /// Manual reload.
    pub fn reload(&mut self) {
        self.catalog.load();
        self.status_msg = "Reloading...".to_string();
    }

    /// Apply every completion that has arrived so far. Returns how many.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Wait for the next completion and apply it.
    #[cfg(test)]
    pub async fn next_event(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    pub fn handle_event(&mut self, event: CatalogEvent) {
        match self.catalog.apply(event) {
            Outcome::Reloaded { count } => {
                self.refresh_view();
                self.status_msg = if self.catalog.state().is_empty() {
                    "Catalog is empty, press 'a' to add a movie".to_string()
                } else {
                    format!("{} movies loaded", count)
                };
            }
            Outcome::LoadFailed(msg) => {
                self.status_msg = format!("Load failed: {}", msg);
            }
            Outcome::Mutated(Mutation::Create) => {
                self.create_in_flight = false;
                self.create_fields.clear();
                if self
                    .form
                    .as_ref()
                    .is_some_and(|form| form.purpose() == &FormPurpose::Create && form.is_pending())
                {
                    self.form = None;
                }
                self.status_msg = "Movie added, reloading...".to_string();
            }
            Outcome::Mutated(Mutation::Update(id)) => {
                self.status_msg = format!("Movie #{} updated, reloading...", id);
            }
            Outcome::Mutated(Mutation::Delete(id)) => {
                self.status_msg = format!("Movie #{} deleted, reloading...", id);
            }
            Outcome::MutationFailed(Mutation::Create, msg) => {
                self.create_in_flight = false;
                match self.form.as_mut() {
                    Some(form) if form.purpose() == &FormPurpose::Create => {
                        form.set_error(msg.clone());
                    }
                    _ => {}
                }
                self.status_msg = format!("Add failed: {}", msg);
            }
            Outcome::MutationFailed(mutation, msg) => {
                self.status_msg = format!("{} failed: {}", capitalize(mutation.label()), msg);
            }
        }
    }

    /// Rebuild the view from the catalog state and the current search term.
    pub fn refresh_view(&mut self) {
        let visible = self.catalog.state().filter(&self.search);
        self.view = CatalogView::build(&visible);
        self.selected = self.selected.min(self.view.len().saturating_sub(1));
        debug!(rows = self.view.len(), affordances = self.view.affordances().count(), "view rebuilt");
    }

    /// Update page size based on terminal height.
    pub fn update_page_size(&mut self, terminal_height: u16) {
        let new_size = terminal_height.saturating_sub(LIST_OVERHEAD) as usize;
        self.page_size = new_size.max(1);
    }

    // ── Search ──

    pub fn search_push(&mut self, c: char) {
        self.search.push(c);
        self.apply_search();
    }

    pub fn search_pop(&mut self) {
        self.search.pop();
        self.apply_search();
    }

    pub fn clear_search(&mut self) {
        if !self.search.is_empty() {
            self.search.clear();
            self.apply_search();
        }
    }

    fn apply_search(&mut self) {
        self.selected = 0;
        self.refresh_view();
        self.status_msg = format!(
            "{} of {} movies match \"{}\"",
            self.view.len(),
            self.catalog.state().len(),
            if self.search.is_empty() { "all" } else { &self.search }
        );
    }

    // ── Navigation ──

    pub fn list_next(&mut self) {
        if self.selected + 1 < self.view.len() {
            self.selected += 1;
        }
    }

    pub fn list_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn list_page_down(&mut self) {
        let last = self.view.len().saturating_sub(1);
        self.selected = (self.selected + self.page_size).min(last);
    }

    pub fn list_page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.page_size);
    }

    pub fn list_first(&mut self) {
        self.selected = 0;
    }

    pub fn list_last(&mut self) {
        self.selected = self.view.len().saturating_sub(1);
    }

    // ── Affordances ──

    /// Trigger the selected row's Edit or Delete affordance.
    pub fn activate_selected(&mut self, kind: AffordanceKind) {
        if self.view.is_empty() {
            self.status_msg = "No movies to act on".to_string();
            return;
        }
        if let Some(affordance) = self.view.affordance(self.selected, kind).cloned() {
            self.activate(affordance);
        }
    }

    pub fn activate(&mut self, affordance: Affordance) {
        match affordance {
            Affordance::Edit(id) => self.open_edit(&id),
            Affordance::Delete(id) => {
                info!(id = %id, "deleting movie");
                self.status_msg = format!("Deleting movie #{}...", id);
                self.catalog.delete(id);
            }
        }
    }

    /// Open the edit form for `id`, looked up in the full catalog state.
    pub fn open_edit(&mut self, id: &MovieId) {
        match self.catalog.state().find(id) {
            Some(record) => {
                self.form = Some(MovieForm::edit(record));
            }
            None => {
                warn!(id = %id, "edit requested for a movie that is no longer loaded");
                self.status_msg = format!("Movie #{} no longer exists", id);
            }
        }
    }

    pub fn open_create(&mut self) {
        let mut form = MovieForm::create(self.create_fields.clone());
        if self.create_in_flight {
            form.set_pending();
        }
        self.form = Some(form);
    }

    /// Close the form. Unsaved add-movie values are kept for next time.
    pub fn close_form(&mut self) {
        if let Some(form) = self.form.take() {
            if form.purpose() == &FormPurpose::Create {
                self.create_fields = form.into_fields();
            }
        }
    }

    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let fields = form.fields().clone();

        match form.purpose().clone() {
            FormPurpose::Create => match fields.into_draft() {
                Some(draft) => {
                    info!(title = %draft.title, "creating movie");
                    form.set_pending();
                    self.create_in_flight = true;
                    self.catalog.create(draft);
                    self.status_msg = "Saving...".to_string();
                }
                None => {
                    form.set_error("Title, year and genre are required".to_string());
                }
            },
            FormPurpose::Edit(id) => {
                self.form = None;
                match fields.into_draft() {
                    Some(draft) => {
                        info!(id = %id, "updating movie");
                        self.catalog.update(id, draft);
                        self.status_msg = "Saving...".to_string();
                    }
                    None => {
                        self.status_msg = "Edit abandoned: empty field".to_string();
                    }
                }
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
