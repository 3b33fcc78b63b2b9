use crate::movie::{MovieId, MovieRecord};

pub const EMPTY_MESSAGE: &str = "No movies found.";

/// Per-row action, keyed by the record id rather than by the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affordance {
    Edit(MovieId),
    Delete(MovieId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffordanceKind {
    Edit,
    Delete,
}

impl Affordance {
    pub fn label(&self) -> &'static str {
        match self {
            Affordance::Edit(_) => "[e]dit",
            Affordance::Delete(_) => "[d]elete",
        }
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: MovieId,
    pub title: String,
    pub year: String,
    pub genre: String,
    pub affordances: [Affordance; 2],
}

impl ItemView {
    fn from_record(record: &MovieRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            year: record.year_label(),
            genre: record.genre.clone(),
            affordances: [
                Affordance::Edit(record.id.clone()),
                Affordance::Delete(record.id.clone()),
            ],
        }
    }

    pub fn affordance(&self, kind: AffordanceKind) -> &Affordance {
        match kind {
            AffordanceKind::Edit => &self.affordances[0],
            AffordanceKind::Delete => &self.affordances[1],
        }
    }
}

/// Result of a render pass. Rebuilt from scratch on every redraw, so the
/// affordances on screen are always exactly those of the current rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogView {
    #[default]
    Empty,
    Items(Vec<ItemView>),
}

impl CatalogView {
    pub fn build(records: &[MovieRecord]) -> Self {
        if records.is_empty() {
            CatalogView::Empty
        } else {
            CatalogView::Items(records.iter().map(ItemView::from_record).collect())
        }
    }

    pub fn items(&self) -> &[ItemView] {
        match self {
            CatalogView::Empty => &[],
            CatalogView::Items(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Every affordance currently on screen.
    pub fn affordances(&self) -> impl Iterator<Item = &Affordance> {
        self.items().iter().flat_map(|item| item.affordances.iter())
    }

    /// The affordance of `kind` on row `row`, if that row exists.
    pub fn affordance(&self, row: usize, kind: AffordanceKind) -> Option<&Affordance> {
        self.items().get(row).map(|item| item.affordance(kind))
    }
}
