//! Ordered pivot tables
//!
//! A [`PivotTable`] maps category keys to aggregated values (counts, point
//! clouds, nested tables) and iterates in the order of the
//! [`CategoryKeySet`] it was built from.
//!
//! # Layout
//!
//! ```text
//! PivotTable<V>
//! ├─ entries: Vec<(key, V)>        arena, iteration order
//! └─ index:   HashMap<key, usize>  key -> arena slot
//! ```
//!
//! There is no insertion or removal API: the key set is fixed at construction.
//! Value-transforming operations ([`PivotTable::map_values`],
//! [`PivotTable::relabel`]) produce new tables with the same order.
//!
//! # Serialization
//!
//! Tables serialize as JSON objects whose members follow table order:
//!
//! ```json
//! { "2020": { "Fire": 2, "Flood": 0 }, "2021": { "Fire": 0, "Flood": 1 } }
//! ```

use std::collections::HashMap;

use serde::{Serialize, Serializer, ser::SerializeMap as _};

use crate::{
    AnalysisError,
    category::{CategoryKeySet, LabelMap},
};

#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for PivotTable<V> {
    fn default() -> Self {
        Self {
            entries: vec![],
            index: HashMap::new(),
        }
    }
}

impl<V> PivotTable<V> {
    /// Builds a table with one entry per key, in key order.
    #[must_use]
    pub fn from_keys<F>(keys: &CategoryKeySet, mut f: F) -> Self
    where
        F: FnMut(&str) -> V,
    {
        Self::from_entries(keys.iter().map(|key| (key.to_owned(), f(key))).collect())
    }

    /// Builds a table with one entry per key, stopping at the first error.
    pub fn try_from_keys<F, E>(keys: &CategoryKeySet, mut f: F) -> Result<Self, E>
    where
        F: FnMut(&str) -> Result<V, E>,
    {
        let entries = keys
            .iter()
            .map(|key| Ok((key.to_owned(), f(key)?)))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Self::from_entries(entries))
    }

    /// Pairs `keys` with `values` position by position.
    #[cfg_attr(not(feature = "parallel"), expect(dead_code))]
    pub(crate) fn zip_keys(keys: &CategoryKeySet, values: Vec<V>) -> Self {
        assert_eq!(keys.len(), values.len(), "one value per key required");
        Self::from_entries(keys.iter().map(str::to_owned).zip(values).collect())
    }

    // Lookup of a repeated key resolves to its first entry.
    fn from_entries(entries: Vec<(String, V)>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, (key, _)) in entries.iter().enumerate() {
            index.entry(key.clone()).or_insert(i);
        }
        Self { entries, index }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + '_ {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &V)> + '_ {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Applies `f` to every value, keeping keys and order.
    #[must_use]
    pub fn map_values<U, F>(self, mut f: F) -> PivotTable<U>
    where
        F: FnMut(V) -> U,
    {
        PivotTable {
            entries: self
                .entries
                .into_iter()
                .map(|(key, value)| (key, f(value)))
                .collect(),
            index: self.index,
        }
    }

    pub fn try_map_values<U, F, E>(self, mut f: F) -> Result<PivotTable<U>, E>
    where
        F: FnMut(V) -> Result<U, E>,
    {
        let entries = self
            .entries
            .into_iter()
            .map(|(key, value)| Ok((key, f(value)?)))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(PivotTable {
            entries,
            index: self.index,
        })
    }

    /// Replaces every key by its display label, keeping values and order.
    ///
    /// A key without a label fails with [`AnalysisError::NotFound`]; keys are
    /// never silently replaced by an empty string. [`LabelMap`] labels are
    /// unique, so the relabelled table keeps one entry per key.
    ///
    /// # Examples
    ///
    /// ```
    /// # use geopivot_analysis::{category::{extract_keys, extract_labels}, dimension::Dimension,
    /// #     table::PivotTable};
    /// # use geopivot_data::{Dataset, Event};
    /// let dataset = Dataset::from_events(&[
    ///     Event::from_raw("2020-03-01", "A", "Fire", 0.0, 0.0).unwrap(),
    ///     Event::from_raw("2020-01-01", "A", "Fire", 0.0, 0.0).unwrap(),
    /// ]);
    /// let keys = extract_keys(&dataset, Dimension::Month).unwrap();
    /// let labels = extract_labels(&dataset, &keys, Dimension::Month).unwrap();
    /// let table = PivotTable::from_keys(&keys, |key| key.len());
    ///
    /// let relabeled = table.relabel(&labels).unwrap();
    /// assert_eq!(relabeled.keys().collect::<Vec<_>>(), ["Январь", "Март"]);
    /// ```
    pub fn relabel(self, labels: &LabelMap) -> Result<Self, AnalysisError> {
        let entries = self
            .entries
            .into_iter()
            .map(|(key, value)| Ok((labels.try_get(&key)?.to_owned(), value)))
            .collect::<Result<Vec<_>, AnalysisError>>()?;
        Ok(Self::from_entries(entries))
    }
}

impl<A, B> PivotTable<(A, B)> {
    /// Splits a table of pairs into two tables with identical keys.
    #[must_use]
    pub fn unzip(self) -> (PivotTable<A>, PivotTable<B>) {
        let (left, right): (Vec<_>, Vec<_>) = self
            .entries
            .into_iter()
            .map(|(key, (a, b))| ((key.clone(), a), (key, b)))
            .unzip();
        (
            PivotTable {
                entries: left,
                index: self.index.clone(),
            },
            PivotTable {
                entries: right,
                index: self.index,
            },
        )
    }
}

impl<V> PivotTable<PivotTable<V>> {
    /// Relabels the keys of every nested table.
    pub fn relabel_inner(self, labels: &LabelMap) -> Result<Self, AnalysisError> {
        self.try_map_values(|inner| inner.relabel(labels))
    }
}

impl PivotTable<usize> {
    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> usize {
        self.values().sum()
    }
}

impl<V> Serialize for PivotTable<V>
where
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::Dimension;

    fn keys(keys: &[&str]) -> CategoryKeySet {
        CategoryKeySet::first_seen(keys.iter().map(|&k| k.to_owned()))
    }

    fn labels(pairs: &[(&str, &str)]) -> LabelMap {
        let keys = keys(&pairs.iter().map(|(k, _)| *k).collect::<Vec<_>>());
        LabelMap::from_fn(Dimension::Type, &keys, |key| {
            let (_, label) = pairs.iter().find(|(k, _)| *k == key).unwrap();
            (*label).to_owned()
        })
    }

    #[test]
    fn test_from_keys_preserves_order() {
        let table = PivotTable::from_keys(&keys(&["c", "a", "b"]), str::len);
        assert_eq!(table.keys().collect::<Vec<_>>(), ["c", "a", "b"]);
        assert_eq!(table.get("a"), Some(&1));
        assert_eq!(table.get("z"), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_try_from_keys_stops_at_error() {
        let mut seen = vec![];
        let result: Result<PivotTable<usize>, &str> =
            PivotTable::try_from_keys(&keys(&["a", "bad", "c"]), |key| {
                seen.push(key.to_owned());
                if key == "bad" {
                    Err("bad key")
                } else {
                    Ok(1)
                }
            });
        assert_eq!(result.unwrap_err(), "bad key");
        assert_eq!(seen, ["a", "bad"]);
    }

    #[test]
    fn test_relabel_preserves_order_and_values() {
        let table =
            PivotTable::from_keys(&keys(&["20", "10", "30"]), |k| k.parse::<usize>().unwrap());
        let relabeled = table
            .relabel(&labels(&[("10", "Fire"), ("20", "Flood"), ("30", "Storm")]))
            .unwrap();
        assert_eq!(
            relabeled.iter().collect::<Vec<_>>(),
            [("Flood", &20), ("Fire", &10), ("Storm", &30)]
        );
        assert_eq!(relabeled.get("Storm"), Some(&30));
        assert_eq!(relabeled.get("30"), None);
    }

    #[test]
    fn test_relabel_missing_label_fails() {
        let table = PivotTable::from_keys(&keys(&["10", "99"]), |_| 0_usize);
        let err = table.relabel(&labels(&[("10", "Fire")])).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::NotFound {
                dimension: Dimension::Type,
                key: "99".to_owned()
            }
        );
    }

    #[test]
    fn test_relabel_shared_label_keeps_every_count() {
        let table = PivotTable::from_keys(&keys(&["1", "2"]), |k| k.parse::<usize>().unwrap());
        let relabeled = table.relabel(&labels(&[("1", "Fire"), ("2", "Fire")])).unwrap();
        assert_eq!(relabeled.keys().collect::<Vec<_>>(), ["Fire", "Fire (2)"]);
        assert_eq!(relabeled.get("Fire (2)"), Some(&2));

        let json = serde_json::to_value(&relabeled).unwrap();
        assert_eq!(json, serde_json::json!({ "Fire": 1, "Fire (2)": 2 }));
        let sum = json
            .as_object()
            .unwrap()
            .values()
            .map(|v| v.as_u64().unwrap())
            .sum::<u64>();
        assert_eq!(sum, 3);
    }

    #[test]
    fn test_unzip_and_relabel_inner() {
        let outer = keys(&["2020", "2021"]);
        let inner = keys(&["1", "2"]);
        let table = PivotTable::from_keys(&outer, |year| {
            let pairs = PivotTable::from_keys(&inner, |ty| (year.len() + ty.len(), ty.to_owned()));
            pairs.unzip().0
        });
        let relabeled = table.relabel_inner(&labels(&[("1", "Fire"), ("2", "Flood")])).unwrap();
        let y2020 = relabeled.get("2020").unwrap();
        assert_eq!(y2020.keys().collect::<Vec<_>>(), ["Fire", "Flood"]);
        assert_eq!(y2020.get("Flood"), Some(&5));
    }

    #[test]
    fn test_map_values_and_total() {
        let table = PivotTable::from_keys(&keys(&["a", "bb"]), str::len);
        assert_eq!(table.total(), 3);
        let doubled = table.map_values(|v| v * 2);
        assert_eq!(doubled.get("bb"), Some(&4));
        assert_eq!(doubled.total(), 6);
    }

    #[test]
    fn test_serializes_in_table_order() {
        let table = PivotTable::from_keys(&keys(&["z", "a", "m"]), str::len);
        assert_eq!(
            serde_json::to_string(&table).unwrap(),
            r#"{"z":1,"a":1,"m":1}"#
        );
    }
}
