//! Vertical-merge planning for the category column
//!
//! After the kept rows are known, column 0 is rendered as vertical merge
//! spans: a run of consecutive rows with the same category becomes one
//! visual cell. The first row of a span carries `w:vMerge="restart"` and
//! the category text; every following row of the span carries
//! `w:vMerge="continue"` with its visible text cleared.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    Restart,
    Continue,
}

impl MergeState {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            MergeState::Restart => "restart",
            MergeState::Continue => "continue",
        }
    }
}

/// One merge state per kept row, in order. Comparison is exact equality of
/// the trimmed category text; whitespace-only or case differences start a
/// new span.
pub(crate) fn merge_plan<S: AsRef<str>>(categories: &[S]) -> Vec<MergeState> {
    let mut plan = Vec::with_capacity(categories.len());
    let mut last: Option<&str> = None;

    for category in categories {
        let category = category.as_ref().trim();
        match last {
            Some(previous) if previous == category => plan.push(MergeState::Continue),
            _ => {
                plan.push(MergeState::Restart);
                last = Some(category);
            }
        }
    }

    plan
}
