use std::fmt;

use crate::classify::Filter;
use crate::fonts::KerningSource;
use crate::session::KerningSession;
use crate::types::{Pair, ValueList, Values};

/// The pairs one filter selected, with the label shown for it.
#[derive(Debug, Clone)]
pub struct FilterSummary {
    pub filter: Filter,
    pub label: String,
    pub pairs: Vec<Pair>,
}

/// Every filter applied to a session, in menu order.
#[derive(Debug, Clone)]
pub struct Report {
    masters: Vec<String>,
    filters: Vec<FilterSummary>,
}

impl Report {
    pub fn new<M: KerningSource>(session: &KerningSession<M>) -> Report {
        let filters = Filter::ALL
            .iter()
            .map(|&filter| FilterSummary {
                filter,
                label: filter.label(session.config()),
                pairs: session.filter(filter),
            })
            .collect();
        Report {
            masters: session
                .masters()
                .iter()
                .map(|m| m.style_name().to_string())
                .collect(),
            filters,
        }
    }

    pub fn masters(&self) -> &[String] {
        &self.masters
    }

    pub fn filters(&self) -> &[FilterSummary] {
        &self.filters
    }

    pub fn get(&self, filter: Filter) -> Option<&FilterSummary> {
        self.filters.iter().find(|s| s.filter == filter)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Masters: {}", self.masters.join(", "))?;
        for summary in &self.filters {
            writeln!(f, "{} ({})", summary.label, summary.pairs.len())?;
        }
        Ok(())
    }
}

/// Pairs with their per-master values, one row each, columns aligned.
#[derive(Debug, Clone)]
pub struct PairTable {
    masters: Vec<String>,
    rows: Vec<(Pair, ValueList)>,
}

impl PairTable {
    pub fn new<M: KerningSource>(session: &KerningSession<M>, pairs: &[Pair]) -> PairTable {
        let rows = pairs
            .iter()
            .map(|pair| {
                let values = session
                    .values(pair)
                    .cloned()
                    .unwrap_or_else(|| vec![None; session.masters().len()]);
                (pair.clone(), values)
            })
            .collect();
        PairTable {
            masters: session
                .masters()
                .iter()
                .map(|m| m.style_name().to_string())
                .collect(),
            rows,
        }
    }

    pub fn rows(&self) -> &[(Pair, ValueList)] {
        &self.rows
    }
}

impl fmt::Display for PairTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const VALUE_WIDTH: usize = 6;

        let left_width = self
            .rows
            .iter()
            .map(|(p, _)| p.left.chars().count())
            .max()
            .unwrap_or(1);
        let right_width = self
            .rows
            .iter()
            .map(|(p, _)| p.right.chars().count())
            .max()
            .unwrap_or(1);

        write!(f, "{:left_width$} {:right_width$}", "L", "R")?;
        for name in &self.masters {
            // Long style names are cut so the value columns stay aligned.
            let short: String = name.chars().take(VALUE_WIDTH).collect();
            write!(f, " {:>width$}", short, width = VALUE_WIDTH)?;
        }
        writeln!(f)?;

        for (pair, values) in &self.rows {
            writeln!(
                f,
                "{:left_width$} {:right_width$} {}",
                pair.left,
                pair.right,
                Values(values)
            )?;
        }
        Ok(())
    }
}
