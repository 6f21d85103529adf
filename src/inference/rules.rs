use crate::table::Column;
use crate::table::RecordTable;

/// How a rule compares a lower-cased column name.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum NameMatch {
    /// Equal to one of the names
    OneOf(&'static [&'static str]),
    /// Contains the fragment
    Contains(&'static str),
}

/// A named column matching rule.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColumnRule {
    pub name: &'static str,
    pub matcher: NameMatch,
}

impl ColumnRule {
    pub fn matches(&self, column_name: &str) -> bool {
        let column_name = column_name.to_lowercase();
        match self.matcher {
            NameMatch::OneOf(names) => names.contains(&column_name.as_str()),
            NameMatch::Contains(fragment) => column_name.contains(fragment),
        }
    }
}

/// Event date column, in priority order.
pub const DATE_COLUMN_RULES: [ColumnRule; 2] = [
    ColumnRule {
        name: "exact-date-name",
        matcher: NameMatch::OneOf(&["data evento", "data", "data do evento"]),
    },
    ColumnRule {
        name: "contains-data",
        matcher: NameMatch::Contains("data"),
    },
];

/// Source column of the group label.
pub const EVENT_NAME_RULES: [ColumnRule; 1] = [ColumnRule {
    name: "event-name",
    matcher: NameMatch::OneOf(&["evento", "nome do evento", "titulo"]),
}];

/// Applies `rules` in order; the first rule with a match wins, and within a
/// rule the first matching column in table order.
pub fn first_match<'a>(rules: &[ColumnRule], table: &'a RecordTable) -> Option<(&'static str, &'a Column)> {
    rules.iter().find_map(|rule| {
        table
            .columns
            .iter()
            .find(|column| rule.matches(&column.name))
            .map(|column| (rule.name, column))
    })
}
