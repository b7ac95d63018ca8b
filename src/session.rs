use tracing::{debug, info, warn};

use crate::aggregate::{aggregate, values_for};
use crate::classify::{Filter, classify};
use crate::error::KernError;
use crate::fonts::{KerningSink, KerningSource};
use crate::groups::representative_pair;
use crate::interpolate;
use crate::style::sort_by_style_name;
use crate::types::{KernMap, Pair, ValueList};

/// Tuning of the filters and edit operations.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// How many times the average a value must be to count as an outlier.
    pub outlier_factor: f64,
    /// Approximate number of high-gamut pairs to list.
    pub gamut_amount: usize,
    /// Number of long-distance pairs to list, split between both signs.
    pub largest_amount: usize,
    /// Average magnitude below which a pair counts as negligible.
    pub small_average_threshold: f64,
    /// Position between the neighbours when interpolating; 0.5 is the middle.
    pub interpolation_factor: f64,
    /// Keep italics next to their uprights when sorting masters.
    pub italics_interspersed: bool,
    /// Reorder masters by style name before combining them.
    pub sort_masters: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            outlier_factor: 4.,
            gamut_amount: 100,
            largest_amount: 200,
            small_average_threshold: 5.,
            interpolation_factor: 0.5,
            italics_interspersed: false,
            sort_masters: false,
        }
    }
}

/// Builder for configuring a [`KerningSession`].
///
/// # Examples
///
/// ```
/// use kernalytics::{MasterSnapshot, SessionBuilder};
///
/// let masters = vec![
///     MasterSnapshot::new("Bold").with_kerning(("A", "V"), -90),
///     MasterSnapshot::new("Light").with_kerning(("A", "V"), -40),
/// ];
/// let session = SessionBuilder::new()
///     .outlier_factor(5.)
///     .sort_masters(true)
///     .build(masters);
/// assert_eq!(session.masters()[0].style_name(), "Light");
/// # use kernalytics::KerningSource;
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    config: AnalysisConfig,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn outlier_factor(mut self, factor: f64) -> Self {
        self.config.outlier_factor = factor;
        self
    }

    pub fn gamut_amount(mut self, amount: usize) -> Self {
        self.config.gamut_amount = amount;
        self
    }

    pub fn largest_amount(mut self, amount: usize) -> Self {
        self.config.largest_amount = amount;
        self
    }

    pub fn small_average_threshold(mut self, threshold: f64) -> Self {
        self.config.small_average_threshold = threshold;
        self
    }

    pub fn interpolation_factor(mut self, factor: f64) -> Self {
        self.config.interpolation_factor = factor;
        self
    }

    pub fn italics_interspersed(mut self, interspersed: bool) -> Self {
        self.config.italics_interspersed = interspersed;
        self
    }

    pub fn sort_masters(mut self, sort: bool) -> Self {
        self.config.sort_masters = sort;
        self
    }

    /// Order the masters if asked to, then combine their kerning.
    pub fn build<M: KerningSource>(self, masters: Vec<M>) -> KerningSession<M> {
        let config = self.config;
        let (masters, unsortable) = if config.sort_masters {
            let indexed: Vec<(usize, String)> = masters
                .iter()
                .enumerate()
                .map(|(i, m)| (i, m.style_name().to_string()))
                .collect();
            let sorted = sort_by_style_name(indexed, config.italics_interspersed);
            let unsortable: Vec<String> = sorted
                .unsortable
                .iter()
                .map(|&i| masters[i].style_name().to_string())
                .collect();
            let order = sorted.into_ordered();
            let mut slots: Vec<Option<M>> = masters.into_iter().map(Some).collect();
            let masters = order.into_iter().filter_map(|i| slots[i].take()).collect();
            (masters, unsortable)
        } else {
            (masters, Vec::new())
        };

        let combined = aggregate(&masters);
        info!(
            "session with {} masters and {} pairs",
            masters.len(),
            combined.len()
        );
        KerningSession {
            masters,
            combined,
            config,
            unsortable,
        }
    }
}

/// The masters of one family together with their combined kerning.
#[derive(Debug)]
pub struct KerningSession<M> {
    masters: Vec<M>,
    combined: KernMap,
    config: AnalysisConfig,
    unsortable: Vec<String>,
}

impl<M: KerningSource> KerningSession<M> {
    /// Combine `masters` in the order given, with default settings.
    pub fn new(masters: Vec<M>) -> Self {
        SessionBuilder::new().build(masters)
    }

    pub fn masters(&self) -> &[M] {
        &self.masters
    }

    pub fn into_masters(self) -> Vec<M> {
        self.masters
    }

    pub fn map(&self) -> &KernMap {
        &self.combined
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Style names that did not match any axis when sorting.
    pub fn unsortable(&self) -> &[String] {
        &self.unsortable
    }

    pub fn values(&self, pair: &Pair) -> Option<&ValueList> {
        self.combined.get(pair)
    }

    pub fn filter(&self, filter: Filter) -> Vec<Pair> {
        classify(&self.combined, &self.masters, filter, &self.config)
    }

    /// Preview glyphs for `pair` in every master; `None` where a master
    /// cannot show the pair.
    pub fn representative_pairs(&self, pair: &Pair) -> Vec<Option<(String, String)>> {
        self.masters
            .iter()
            .map(|master| {
                let glyphs = representative_pair(master, pair);
                if glyphs.is_none() {
                    debug!("{} cannot preview {}", master.style_name(), pair);
                }
                glyphs
            })
            .collect()
    }

    fn current_values(&self, pair: &Pair) -> ValueList {
        self.combined
            .get(pair)
            .cloned()
            .unwrap_or_else(|| values_for(&self.masters, pair))
    }
}

impl<M: KerningSource + KerningSink> KerningSession<M> {
    /// Replace the values of `pair` in the map and in every master.
    pub fn update_pair(&mut self, pair: &Pair, values: ValueList) -> Result<(), KernError> {
        if values.len() != self.masters.len() {
            return Err(KernError::MasterCount {
                expected: self.masters.len(),
                found: values.len(),
            });
        }
        for master in &self.masters {
            master.check_pair(pair)?;
        }
        for (master, value) in self.masters.iter_mut().zip(&values) {
            master.set_kerning(pair, *value)?;
        }
        debug!("updated {} to {:?}", pair, values);
        if let Some(slot) = self.combined.get_mut(pair) {
            *slot = values;
        } else {
            warn!("{} was not kerned before, appending it", pair);
            self.combined.insert(pair.clone(), values);
        }
        Ok(())
    }

    /// Remove `pair` from every master. The map keeps the pair, all unset.
    pub fn delete_pair(&mut self, pair: &Pair) -> Result<(), KernError> {
        self.update_pair(pair, interpolate::cleared(self.masters.len()))
    }

    /// Interpolate the `targets` masters of `pair` from their neighbours.
    pub fn interpolate_pair(&mut self, pair: &Pair, targets: &[usize]) -> Result<ValueList, KernError> {
        let values = interpolate::interpolate_targets(
            &self.current_values(pair),
            targets,
            self.config.interpolation_factor,
        )?;
        self.update_pair(pair, values.clone())?;
        Ok(values)
    }

    /// Copy the value of master `source` into all masters.
    pub fn transfer_pair(&mut self, pair: &Pair, source: usize) -> Result<ValueList, KernError> {
        let values = interpolate::transfer(&self.current_values(pair), source)?;
        self.update_pair(pair, values.clone())?;
        Ok(values)
    }

    /// Set all masters to the rounded average value.
    pub fn average_pair(&mut self, pair: &Pair) -> Result<ValueList, KernError> {
        let values = interpolate::average(&self.current_values(pair));
        self.update_pair(pair, values.clone())?;
        Ok(values)
    }

    /// Shift the selected masters, or all of them, by `amount`.
    pub fn nudge_pair(
        &mut self,
        pair: &Pair,
        amount: i64,
        selected: &[usize],
    ) -> Result<ValueList, KernError> {
        let values = interpolate::nudge(&self.current_values(pair), amount, selected);
        self.update_pair(pair, values.clone())?;
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fonts::MasterSnapshot;

    fn masters() -> Vec<MasterSnapshot> {
        vec![
            MasterSnapshot::new("Bold")
                .with_glyph_order(["A", "V"])
                .with_kerning(("A", "V"), -120),
            MasterSnapshot::new("Light")
                .with_glyph_order(["A", "V"])
                .with_kerning(("A", "V"), -40),
            MasterSnapshot::new("Regular")
                .with_glyph_order(["A"])
                .with_kerning(("A", "V"), -70)
                .with_kerning(("V", "A"), 0),
        ]
    }

    #[test_log::test]
    fn sorting_reorders_value_slots() {
        let session = SessionBuilder::new().sort_masters(true).build(masters());
        let names: Vec<&str> = session.masters().iter().map(|m| m.style_name()).collect();
        assert_eq!(names, vec!["Light", "Regular", "Bold"]);
        assert_eq!(
            session.values(&Pair::new("A", "V")),
            Some(&vec![Some(-40), Some(-70), Some(-120)])
        );
        assert!(session.unsortable().is_empty());
    }

    #[test_log::test]
    fn unsortable_masters_are_reported() {
        let masters = vec![MasterSnapshot::new("Foo"), MasterSnapshot::new("Bold")];
        let session = SessionBuilder::new().sort_masters(true).build(masters);
        assert_eq!(session.unsortable(), &["Foo".to_string()]);
        assert_eq!(session.masters()[0].style_name(), "Bold");
    }

    #[test_log::test]
    fn updates_write_through() {
        let mut session = KerningSession::new(masters());
        let pair = Pair::new("V", "A");
        session.update_pair(&pair, vec![Some(10), None, Some(0)]).unwrap();
        assert_eq!(session.values(&pair), Some(&vec![Some(10), None, Some(0)]));
        assert_eq!(session.masters()[0].kerning_value(&pair), Some(10));
        assert_eq!(session.masters()[1].kerning_value(&pair), None);

        let err = session.update_pair(&pair, vec![Some(1)]).unwrap_err();
        assert!(matches!(err, KernError::MasterCount { expected: 3, found: 1 }));

        session.delete_pair(&pair).unwrap();
        assert_eq!(session.values(&pair), Some(&vec![None, None, None]));
        assert!(session.masters().iter().all(|m| m.kerning_value(&pair).is_none()));
    }

    #[test_log::test]
    fn edit_operations() {
        let mut session = KerningSession::new(masters());
        let pair = Pair::new("A", "V");
        assert_eq!(
            session.interpolate_pair(&pair, &[1]).unwrap(),
            vec![Some(-120), Some(-95), Some(-70)]
        );
        assert_eq!(
            session.transfer_pair(&pair, 0).unwrap(),
            vec![Some(-120); 3]
        );
        assert_eq!(
            session.nudge_pair(&pair, 10, &[2]).unwrap(),
            vec![Some(-120), Some(-120), Some(-110)]
        );
        assert_eq!(session.average_pair(&pair).unwrap(), vec![Some(-117); 3]);
        assert_eq!(session.masters()[2].kerning_value(&pair), Some(-117));
    }

    #[test_log::test]
    fn interpolation_needs_three_masters() {
        let mut masters = masters();
        masters.pop();
        let mut session = KerningSession::new(masters);
        let before = session.values(&Pair::new("A", "V")).cloned();
        assert!(session.interpolate_pair(&Pair::new("A", "V"), &[0]).is_err());
        assert_eq!(session.values(&Pair::new("A", "V")).cloned(), before);
    }

    #[test_log::test]
    fn previews_fail_softly() {
        let session = KerningSession::new(masters());
        assert_eq!(
            session.representative_pairs(&Pair::new("A", "V")),
            vec![
                Some(("A".to_string(), "V".to_string())),
                Some(("A".to_string(), "V".to_string())),
                None,
            ]
        );
    }

    #[test_log::test]
    fn filters_through_session() {
        let session = KerningSession::new(masters());
        assert_eq!(session.filter(Filter::ZeroValue), vec![Pair::new("V", "A")]);
        assert_eq!(session.filter(Filter::All).len(), 2);
    }
}
