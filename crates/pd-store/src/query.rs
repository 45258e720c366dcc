//! Gallery filtering: title search plus ordering.

use pd_core::DesignRecord;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Most recently updated first.
    #[default]
    Recent,
    /// Least recently updated first.
    Oldest,
    /// Alphabetical by title, ignoring case.
    Name,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recent" => Ok(Self::Recent),
            "oldest" => Ok(Self::Oldest),
            "name" => Ok(Self::Name),
            other => Err(format!("unknown sort order '{other}' (expected recent, oldest or name)")),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Recent => "recent",
            Self::Oldest => "oldest",
            Self::Name => "name",
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct DesignQuery {
    /// Case-insensitive substring of the title. Empty matches everything.
    pub search: String,
    pub sort: SortOrder,
}

impl DesignQuery {
    pub fn new(search: impl Into<String>, sort: SortOrder) -> Self {
        Self {
            search: search.into(),
            sort,
        }
    }

    pub fn matches(&self, record: &DesignRecord) -> bool {
        self.search.is_empty() || record.title.to_lowercase().contains(&self.search.to_lowercase())
    }

    /// Filter and order `records`. The sort is stable, so ties keep their
    /// stored order.
    pub fn apply<'a>(&self, records: &'a [DesignRecord]) -> Vec<&'a DesignRecord> {
        let mut out: Vec<_> = records.iter().filter(|r| self.matches(r)).collect();
        out.sort_by(|a, b| self.compare(a, b));
        out
    }

    fn compare(&self, a: &DesignRecord, b: &DesignRecord) -> Ordering {
        match self.sort {
            SortOrder::Recent => b.updated_at.cmp(&a.updated_at),
            SortOrder::Oldest => a.updated_at.cmp(&b.updated_at),
            SortOrder::Name => a
                .title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title)),
        }
    }
}
