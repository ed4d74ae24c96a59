use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// One spreadsheet cell after parsing
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Numeric view of the cell. Text is parsed, booleans count as 1/0.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) if v.is_finite() => Some(*v),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Text used for grouping and labels; `None` for empty cells
    pub fn key(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            other => Some(other.to_string()),
        }
    }

    /// Sortable grouping key; `None` for empty cells
    pub fn group_key(&self) -> Option<GroupKey> {
        match self {
            Cell::Empty => None,
            Cell::Number(v) => Some(GroupKey::Number(*v)),
            other => Some(GroupKey::Text(other.to_string())),
        }
    }
}

/// Grouping key ordered the way a sorted group-by orders it: numbers by
/// value, then text.
#[derive(Debug, Clone)]
pub enum GroupKey {
    Number(f64),
    Text(String),
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Number(a), GroupKey::Number(b)) => a.total_cmp(b),
            (GroupKey::Number(_), GroupKey::Text(_)) => Ordering::Less,
            (GroupKey::Text(_), GroupKey::Number(_)) => Ordering::Greater,
            (GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Number(v) => fmt::Display::fmt(&Cell::Number(*v), f),
            GroupKey::Text(s) => f.write_str(s),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{v:.0}"),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_f64() {
        assert_eq!(Cell::Number(2.5).as_f64(), Some(2.5));
        assert_eq!(Cell::Text(" 42 ".to_string()).as_f64(), Some(42.0));
        assert_eq!(Cell::Text("n/a".to_string()).as_f64(), None);
        assert_eq!(Cell::Bool(true).as_f64(), Some(1.0));
        assert_eq!(Cell::Number(f64::NAN).as_f64(), None);
        assert_eq!(Cell::Empty.as_f64(), None);
    }

    #[test]
    fn test_display_drops_integral_fraction() {
        assert_eq!(Cell::Number(2024.0).to_string(), "2024");
        assert_eq!(Cell::Number(0.25).to_string(), "0.25");
        assert_eq!(Cell::Bool(false).to_string(), "false");
        assert_eq!(Cell::Empty.to_string(), "");
    }

    #[test]
    fn test_key() {
        assert_eq!(Cell::Empty.key(), None);
        assert_eq!(Cell::Text("A".to_string()).key(), Some("A".to_string()));
        assert_eq!(Cell::Number(3.0).key(), Some("3".to_string()));
    }

    #[test]
    fn test_group_key_orders_numbers_by_value_before_text() {
        let mut keys: Vec<GroupKey> = [
            Cell::Text("B".to_string()),
            Cell::Number(10.0),
            Cell::Text("10".to_string()),
            Cell::Number(9.0),
            Cell::Bool(true),
        ]
        .iter()
        .filter_map(Cell::group_key)
        .collect();
        keys.sort();

        let shown: Vec<String> = keys.iter().map(GroupKey::to_string).collect();
        assert_eq!(shown, vec!["9", "10", "10", "B", "true"]);
        assert_eq!(Cell::Empty.group_key(), None);
        assert_ne!(
            Cell::Number(10.0).group_key(),
            Cell::Text("10".to_string()).group_key()
        );
    }

    #[test]
    fn test_serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Cell::Empty,
            Cell::Text("x".to_string()),
            Cell::Number(1.5),
            Cell::Bool(true),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,"x",1.5,true]"#);
    }
}
