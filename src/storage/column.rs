use std::cmp::Ordering;
use std::fmt;

/// Key of a column: a header name, or a zero-based position for tables
/// read without a header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnId {
    Name(String),
    Index(usize),
}

impl ColumnId {
    pub fn is_index(&self) -> bool {
        matches!(self, ColumnId::Index(_))
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            ColumnId::Index(i) => Some(*i),
            ColumnId::Name(_) => None,
        }
    }

    /// Whether both identifiers use the same naming scheme.
    pub fn same_scheme(&self, other: &ColumnId) -> bool {
        self.is_index() == other.is_index()
    }

    /// Interprets user input as an index when `positional` is set, falling
    /// back to a name if the text is not a number.
    pub fn parse(text: &str, positional: bool) -> Self {
        if positional {
            if let Ok(i) = text.trim().parse::<usize>() {
                return ColumnId::Index(i);
            }
        }
        ColumnId::Name(text.to_string())
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnId::Name(name) => write!(f, "{}", name),
            ColumnId::Index(i) => write!(f, "{}", i),
        }
    }
}

// Indices compare numerically so that 2 sorts before 10.
impl Ord for ColumnId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ColumnId::Index(a), ColumnId::Index(b)) => a.cmp(b),
            (ColumnId::Name(a), ColumnId::Name(b)) => a.cmp(b),
            (ColumnId::Index(_), ColumnId::Name(_)) => Ordering::Less,
            (ColumnId::Name(_), ColumnId::Index(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for ColumnId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for ColumnId {
    fn from(name: &str) -> Self {
        ColumnId::Name(name.to_string())
    }
}

impl From<String> for ColumnId {
    fn from(name: String) -> Self {
        ColumnId::Name(name)
    }
}

impl From<&String> for ColumnId {
    fn from(name: &String) -> Self {
        ColumnId::Name(name.clone())
    }
}

impl From<usize> for ColumnId {
    fn from(index: usize) -> Self {
        ColumnId::Index(index)
    }
}
