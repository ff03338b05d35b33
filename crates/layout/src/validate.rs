use crate::BreakError;
use folio_types::{Element, INFINITE};

/// Rejects sequences a producer should never emit.
///
/// Checked: two glues in a row, a flagged penalty that is also forced, and
/// negative shrink. Negative stretch is allowed; ragged and centered patterns
/// rely on it.
pub fn validate(seq: &[Element]) -> Result<(), BreakError> {
    let invalid = |index: usize, reason: &str| BreakError::InvalidElementSequence {
        index,
        reason: reason.to_string(),
    };

    for (index, element) in seq.iter().enumerate() {
        match element {
            Element::Glue { shrink, .. } => {
                if index > 0 && seq[index - 1].is_glue() {
                    return Err(invalid(index, "glue directly follows glue"));
                }
                if *shrink < 0 {
                    return Err(invalid(index, "glue has negative shrink"));
                }
            }
            Element::Penalty { cost, flagged, .. } => {
                if *flagged && *cost <= -INFINITE {
                    return Err(invalid(index, "flagged penalty is a forced break"));
                }
            }
            Element::Box { .. } => {}
        }
    }
    Ok(())
}
