use crate::parser::score_reader::{read_score, ScoreEvent, ScoreReader};
use crate::ScoreError;
use std::path::Path;

const MEASURE: &str = "measure";

/// Count `<measure>` elements across all parts.
///
/// Parts are not distinguished: two parts of two measures each count as four.
pub fn count_measures(xml: &str) -> Result<usize, ScoreError> {
    let mut measure_count = 0;
    for event in ScoreReader::new(xml) {
        if let ScoreEvent::Open(name) = event? {
            if name == MEASURE {
                measure_count += 1;
            }
        }
    }
    log::debug!("Counted {measure_count} measures");
    if measure_count == 0 {
        return Err(ScoreError::NoMeasuresFound);
    }
    Ok(measure_count)
}

pub fn count_measures_in_file(path: &Path) -> Result<usize, ScoreError> {
    let xml = read_score(path)?;
    count_measures(&xml)
}
