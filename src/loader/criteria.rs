use glob::Pattern;
use std::collections::HashSet;

/// Literals read as missing values, in both delimited text and worksheet cells.
pub(crate) const NULL_LITERALS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA",
    "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Criteria for selecting and cleaning data while loading an upload.
#[derive(Clone, Debug)]
pub(crate) struct Criteria {
    /// Sheet name patterns; the first matching worksheet is read.
    pub(crate) sheet_name_patterns: Option<Vec<Pattern>>,

    /// Null literals
    pub(crate) nulls: HashSet<String>,
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria {
            sheet_name_patterns: None,
            nulls: NULL_LITERALS.iter().map(|literal| literal.to_string()).collect(),
        }
    }
}

impl Criteria {
    /// Criteria reading the first sheet matching `pattern`, or the first sheet.
    pub(crate) fn with_sheet_pattern(pattern: Option<&str>) -> Result<Criteria, glob::PatternError> {
        let sheet_name_patterns = pattern.map(Pattern::new).transpose()?.map(|pattern| vec![pattern]);
        Ok(Criteria {
            sheet_name_patterns,
            ..Criteria::default()
        })
    }

    /// Checks if a sheet name matches the criteria patterns.
    /// Returns true if no patterns are specified or if name matches any pattern.
    pub(crate) fn accept(&self, sheet_name: &str) -> bool {
        if let Some(patterns) = &self.sheet_name_patterns {
            patterns.iter().any(|pattern| pattern.matches(sheet_name))
        } else {
            true
        }
    }

    pub(crate) fn is_null(&self, text: &str) -> bool {
        self.nulls.contains(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_all_sheets_without_patterns() {
        assert!(Criteria::default().accept("Plan1"));
    }

    #[test]
    fn accepts_matching_sheets() {
        let criteria = Criteria::with_sheet_pattern(Some("Vendas*")).unwrap();
        assert!(criteria.accept("Vendas 2023"));
        assert!(!criteria.accept("Resumo"));
        assert!(Criteria::with_sheet_pattern(Some("[")).is_err());
    }

    #[test]
    fn null_literals() {
        let criteria = Criteria::default();
        assert!(criteria.is_null(""));
        assert!(criteria.is_null("NA"));
        assert!(criteria.is_null("#N/A"));
        assert!(!criteria.is_null("na"));
        assert!(!criteria.is_null("0"));
    }
}
