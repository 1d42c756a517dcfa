//! Capability-qualified selection.
//!
//! Device APIs expose capability tables where the position of a record is
//! also its identifier (a queue family index is its position in the list of
//! queue family properties). The functions here pick the first record that
//! satisfies a predicate and report an explicit error when none does.

use crate::error::{Result, SelectError};

/// Outcome of [`confirm_or_select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The preferred index satisfied the predicate.
    Preferred(usize),
    /// The preferred index did not qualify; a scan found this one instead.
    Fallback(usize),
}

impl Selection {
    /// The selected index, regardless of how it was found.
    pub const fn index(self) -> usize {
        match self {
            Self::Preferred(index) | Self::Fallback(index) => index,
        }
    }

    /// Whether the preferred index was kept.
    pub const fn is_preferred(self) -> bool {
        matches!(self, Self::Preferred(_))
    }
}

/// Return the index of the first record satisfying `predicate`.
///
/// The scan is a single forward pass and stops at the first match, so for a
/// fixed table the result is always the lowest qualifying index. An empty
/// table yields [`SelectError::EmptyInput`] without calling the predicate.
pub fn select_first<T, P>(records: &[T], predicate: P) -> Result<usize>
where
    P: FnMut(&T) -> bool,
{
    if records.is_empty() {
        return Err(SelectError::EmptyInput);
    }

    records
        .iter()
        .position(predicate)
        .ok_or(SelectError::NotFound { len: records.len() })
}

/// Fallible form of [`select_first`].
///
/// The predicate receives the index alongside the record, for capabilities
/// that are answered per index by an external query. The first predicate
/// error stops the scan and is returned as is.
pub fn try_select_first<T, E, P>(records: &[T], mut predicate: P) -> std::result::Result<usize, E>
where
    E: From<SelectError>,
    P: FnMut(usize, &T) -> std::result::Result<bool, E>,
{
    if records.is_empty() {
        return Err(SelectError::EmptyInput.into());
    }

    for (index, record) in records.iter().enumerate() {
        if predicate(index, record)? {
            return Ok(index);
        }
    }

    Err(SelectError::NotFound { len: records.len() }.into())
}

/// Check whether `preferred` satisfies `predicate`, scanning for another
/// record only if it does not.
///
/// The predicate is evaluated on `preferred` exactly once. If that fails, or
/// `preferred` is out of range, one fallback scan runs over the remaining
/// records; it never returns `preferred` itself.
pub fn confirm_or_select<T, E, P>(
    records: &[T],
    preferred: usize,
    mut predicate: P,
) -> std::result::Result<Selection, E>
where
    E: From<SelectError>,
    P: FnMut(usize, &T) -> std::result::Result<bool, E>,
{
    if let Some(record) = records.get(preferred) {
        if predicate(preferred, record)? {
            return Ok(Selection::Preferred(preferred));
        }
    }

    try_select_first(records, |index, record| {
        if index == preferred {
            Ok(false)
        } else {
            predicate(index, record)
        }
    })
    .map(Selection::Fallback)
}

/// Convert a selected index to the `u32` used by device APIs.
pub fn checked_index(index: usize) -> Result<u32> {
    u32::try_from(index).map_err(|_| SelectError::IndexOverflow(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: u8 = 0;
    const A: u8 = 0b01;
    const B: u8 = 0b10;

    fn has_a(flags: &u8) -> bool {
        flags & A != 0
    }

    #[test]
    fn first_qualifying_record_is_selected() {
        let records = [NONE, A, A | B];
        assert_eq!(select_first(&records, has_a), Ok(1));
    }

    #[test]
    fn no_qualifying_record_is_not_found() {
        let records = [B];
        assert_eq!(
            select_first(&records, has_a),
            Err(SelectError::NotFound { len: 1 })
        );
    }

    #[test]
    fn empty_table_does_not_call_predicate() {
        let records: [u8; 0] = [];
        let mut calls = 0;
        let result = select_first(&records, |_| {
            calls += 1;
            true
        });
        assert_eq!(result, Err(SelectError::EmptyInput));
        assert_eq!(calls, 0);
    }

    #[test]
    fn first_match_wins_over_richer_match() {
        let records = [A | B, A];
        assert_eq!(select_first(&records, has_a), Ok(0));
    }

    #[test]
    fn selection_is_deterministic() {
        let records = [NONE, B, A, A | B, A];
        let first = select_first(&records, has_a);
        let second = select_first(&records, has_a);
        assert_eq!(first, Ok(2));
        assert_eq!(first, second);
    }

    #[test]
    fn scan_stops_at_first_match() {
        let records = [NONE, A, A, A];
        let mut visited = Vec::new();
        let result = select_first(&records, |flags| {
            visited.push(*flags);
            has_a(flags)
        });
        assert_eq!(result, Ok(1));
        assert_eq!(visited, vec![NONE, A]);
    }

    #[test]
    fn try_select_passes_indices_and_propagates_errors() {
        #[derive(Debug, PartialEq)]
        enum QueryError {
            Lost,
            Select(SelectError),
        }

        impl From<SelectError> for QueryError {
            fn from(e: SelectError) -> Self {
                Self::Select(e)
            }
        }

        let records = [NONE, NONE, A];
        let found: std::result::Result<usize, QueryError> =
            try_select_first(&records, |index, flags| Ok(index > 0 && has_a(flags)));
        assert_eq!(found, Ok(2));

        let failed: std::result::Result<usize, QueryError> =
            try_select_first(&records, |index, _| {
                if index == 1 {
                    Err(QueryError::Lost)
                } else {
                    Ok(false)
                }
            });
        assert_eq!(failed, Err(QueryError::Lost));

        let missing: std::result::Result<usize, QueryError> =
            try_select_first(&records, |_, _| Ok(false));
        assert_eq!(
            missing,
            Err(QueryError::Select(SelectError::NotFound { len: 3 }))
        );
    }

    #[test]
    fn preferred_index_is_confirmed() {
        let records = [A, A | B, B];
        let selection: std::result::Result<Selection, SelectError> =
            confirm_or_select(&records, 1, |_, flags| Ok(flags & B != 0));
        assert_eq!(selection, Ok(Selection::Preferred(1)));
        assert!(selection.unwrap().is_preferred());
    }

    #[test]
    fn failing_preferred_index_falls_back() {
        let records = [A, A, B, B];
        let mut checked = Vec::new();
        let selection: std::result::Result<Selection, SelectError> =
            confirm_or_select(&records, 0, |index, flags| {
                checked.push(index);
                Ok(flags & B != 0)
            });
        assert_eq!(selection, Ok(Selection::Fallback(2)));
        assert_eq!(selection.unwrap().index(), 2);
        // Preferred once, then the scan skips it.
        assert_eq!(checked, vec![0, 1, 2]);
    }

    #[test]
    fn out_of_range_preferred_index_falls_back() {
        let records = [NONE, B];
        let selection: std::result::Result<Selection, SelectError> =
            confirm_or_select(&records, 7, |_, flags| Ok(flags & B != 0));
        assert_eq!(selection, Ok(Selection::Fallback(1)));
    }

    #[test]
    fn confirm_without_any_match_is_not_found() {
        let records = [A, A];
        let selection: std::result::Result<Selection, SelectError> =
            confirm_or_select(&records, 0, |_, flags| Ok(flags & B != 0));
        assert_eq!(selection, Err(SelectError::NotFound { len: 2 }));

        let empty: [u8; 0] = [];
        let selection: std::result::Result<Selection, SelectError> =
            confirm_or_select(&empty, 0, |_, _| Ok(true));
        assert_eq!(selection, Err(SelectError::EmptyInput));
    }

    #[test]
    fn index_conversion() {
        assert_eq!(checked_index(0), Ok(0));
        assert_eq!(checked_index(u32::MAX as usize), Ok(u32::MAX));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn index_conversion_overflow() {
        let index = u32::MAX as usize + 1;
        assert_eq!(checked_index(index), Err(SelectError::IndexOverflow(index)));
    }
}
