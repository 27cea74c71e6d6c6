use serde::ser::{Error as _, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::ActionError;

/// Numeric type that can sit in an alternating `[id, value, ...]` list.
pub trait FlatEntry: Copy + Serialize {
    fn from_id(id: i64) -> Self;

    fn to_id(self) -> i64;
}

impl FlatEntry for i64 {
    fn from_id(id: i64) -> Self {
        id
    }

    fn to_id(self) -> i64 {
        self
    }
}

impl FlatEntry for f64 {
    fn from_id(id: i64) -> Self {
        id as f64
    }

    fn to_id(self) -> i64 {
        self as i64
    }
}

/// Resource quantities or allocation percentages keyed by id.
///
/// The API only accepts the flat alternating form. Callers may hand over
/// either shape and [`IdValueMapping::to_flat`] normalizes it, keeping the
/// order in which pairs were given.
#[derive(Debug, Clone, PartialEq)]
pub enum IdValueMapping<V> {
    Map(Vec<(i64, V)>),
    Flat(Vec<V>),
}

impl<V: FlatEntry> IdValueMapping<V> {
    pub fn pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i64, V)>,
    {
        IdValueMapping::Map(pairs.into_iter().collect())
    }

    pub fn flat(values: Vec<V>) -> Self {
        IdValueMapping::Flat(values)
    }

    pub fn to_flat(&self) -> Result<Vec<V>, ActionError> {
        match self {
            IdValueMapping::Map(pairs) => Ok(pairs
                .iter()
                .flat_map(|&(id, value)| [V::from_id(id), value])
                .collect()),
            IdValueMapping::Flat(values) if values.len() % 2 != 0 => {
                Err(ActionError::OddFlatList { len: values.len() })
            }
            IdValueMapping::Flat(values) => Ok(values.clone()),
        }
    }
}

/// Always written in the flat form, ids as integers whatever the value type.
impl<V: FlatEntry> Serialize for IdValueMapping<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let flat = self.to_flat().map_err(S::Error::custom)?;
        let mut seq = serializer.serialize_seq(Some(flat.len()))?;
        for pair in flat.chunks_exact(2) {
            seq.serialize_element(&pair[0].to_id())?;
            seq.serialize_element(&pair[1])?;
        }
        seq.end()
    }
}

impl<V> From<Vec<V>> for IdValueMapping<V>
where
    V: FlatEntry,
{
    fn from(values: Vec<V>) -> Self {
        IdValueMapping::Flat(values)
    }
}

impl<V, const N: usize> From<[(i64, V); N]> for IdValueMapping<V> {
    fn from(pairs: [(i64, V); N]) -> Self {
        IdValueMapping::Map(pairs.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_flattens_in_given_order() {
        let mapping = IdValueMapping::from([(31, 5_i64), (30, 10)]);
        assert_eq!(mapping.to_flat().expect("flat"), vec![31, 5, 30, 10]);
    }

    #[test]
    fn flat_list_passes_through() {
        let mapping = IdValueMapping::from(vec![30_i64, 10, 31, 5]);
        assert_eq!(mapping.to_flat().expect("flat"), vec![30, 10, 31, 5]);
    }

    #[test]
    fn odd_flat_list_is_rejected() {
        let mapping = IdValueMapping::flat(vec![30_i64, 10, 31]);
        assert_eq!(mapping.to_flat(), Err(ActionError::OddFlatList { len: 3 }));
    }

    #[test]
    fn serializes_as_flat_list() {
        let mapping = IdValueMapping::from([(30, 10_i64)]);
        assert_eq!(
            serde_json::to_value(&mapping).expect("serialize"),
            serde_json::json!([30, 10])
        );
        assert!(serde_json::to_value(IdValueMapping::flat(vec![30_i64])).is_err());
    }

    #[test]
    fn percentages_keep_integer_ids_on_the_wire() {
        let mapping = IdValueMapping::pairs([(30, 62.5_f64), (31, 37.5)]);
        assert_eq!(mapping.to_flat().expect("flat"), vec![30.0, 62.5, 31.0, 37.5]);
        assert_eq!(
            serde_json::to_value(&mapping).expect("serialize"),
            serde_json::json!([30, 62.5, 31, 37.5])
        );

        let flat = IdValueMapping::flat(vec![33.0_f64, 25.0, 31.0, 75.0]);
        let wire = serde_json::to_value(&flat).expect("serialize");
        assert_eq!(wire, serde_json::json!([33, 25.0, 31, 75.0]));
        assert!(wire[0].is_i64());
        assert!(wire[1].is_f64());
    }
}
