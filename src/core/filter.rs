use crate::core::{CountryRecord, Extraction, TransformResult};

/// Keeps the countries strictly larger than `reference_area`, in page order.
pub fn filter_above_reference(
    candidates: Vec<CountryRecord>,
    reference_area: f64,
) -> Vec<CountryRecord> {
    candidates
        .into_iter()
        .filter(|record| record.area > reference_area)
        .collect()
}

pub fn transform(extraction: Extraction) -> TransformResult {
    let total = extraction.candidates.len();
    let records = filter_above_reference(extraction.candidates, extraction.reference_area);

    TransformResult {
        below_reference: total - records.len(),
        records,
        reference_area: extraction.reference_area,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(name: &str, area: f64) -> CountryRecord {
        CountryRecord {
            name: name.to_string(),
            capital: "Capital".to_string(),
            population: "1".to_string(),
            area,
        }
    }

    #[test]
    fn test_keeps_only_larger_than_bulgaria() {
        let candidates = vec![country("Belgium", 30528.0), country("Germany", 357022.0)];

        let result = filter_above_reference(candidates, 110994.0);

        assert_eq!(result, vec![country("Germany", 357022.0)]);
    }

    #[test]
    fn test_equal_area_is_excluded() {
        let result = filter_above_reference(vec![country("Bulgaria", 110994.0)], 110994.0);
        assert!(result.is_empty());
    }

    #[test]
    fn test_zero_reference_keeps_positive_areas() {
        let candidates = vec![
            country("Andorra", 468.0),
            country("Belgium", 30528.0),
            country("Brazil", 8511965.0),
        ];

        let result = filter_above_reference(candidates.clone(), 0.0);

        assert_eq!(result, candidates);
    }

    #[test]
    fn test_transform_counts_dropped() {
        let extraction = Extraction {
            reference_area: 100.0,
            candidates: vec![country("A", 50.0), country("B", 150.0), country("C", 250.0)],
            skipped: 1,
        };

        let result = transform(extraction);

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.below_reference, 1);
        assert_eq!(result.reference_area, 100.0);
        assert!(result.records.iter().all(|r| r.area > result.reference_area));
    }
}
