//! Active-marker bookkeeping.
//!
//! One boolean per candidate index, rebuilt from the host's classes every
//! time the tracker queries its candidates.  Indices are only meaningful for
//! the candidate list of that query: cards inserted, removed or reordered by
//! the host between passes are picked up by the next sync.
//!
//! Only the tracker writes here.  Markers restored by the host (server
//! rendered classes, session restore) arrive through the sync and are
//! cleaned up by invariant repair.

/// Index → active flag mapping for the current candidate set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveMarkers {
    flags: Vec<bool>,
}

impl ActiveMarkers {
    pub fn new(len: usize) -> Self {
        Self {
            flags: vec![false; len],
        }
    }

    /// Replace every flag with the host's view, one entry per candidate.
    pub(crate) fn sync(&mut self, flags: impl IntoIterator<Item = bool>) {
        self.flags.clear();
        self.flags.extend(flags);
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// Indices currently carrying the marker, in order.
    pub fn active(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(i, _)| i)
    }

    pub fn first_active(&self) -> Option<usize> {
        self.active().next()
    }

    pub fn active_count(&self) -> usize {
        self.flags.iter().filter(|on| **on).count()
    }

    /// Clear every marker and return the indices that were set.
    pub(crate) fn reset_all(&mut self) -> Vec<usize> {
        let cleared: Vec<usize> = self.active().collect();
        for i in &cleared {
            self.flags[*i] = false;
        }
        cleared
    }

    /// Clear every marker, then set `index`.  Returns the cleared indices
    /// (not including `index` itself).
    pub(crate) fn set_only(&mut self, index: usize) -> Vec<usize> {
        let mut cleared = self.reset_all();
        cleared.retain(|i| *i != index);
        if let Some(flag) = self.flags.get_mut(index) {
            *flag = true;
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synced(flags: &[bool]) -> ActiveMarkers {
        let mut m = ActiveMarkers::default();
        m.sync(flags.iter().copied());
        m
    }

    #[test]
    fn set_only_leaves_single_marker() {
        let mut m = synced(&[true, false, true, false]);
        let cleared = m.set_only(3);
        assert_eq!(cleared, vec![0, 2]);
        assert_eq!(m.active().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn set_only_on_already_active_index() {
        let mut m = synced(&[false, true, false]);
        assert!(m.set_only(1).is_empty());
        assert_eq!(m.first_active(), Some(1));
    }

    #[test]
    fn sync_replaces_previous_flags() {
        let mut m = synced(&[false, false, true]);
        m.sync([true, false]);
        assert_eq!(m.len(), 2);
        assert_eq!(m.active().collect::<Vec<_>>(), vec![0]);
        m.sync(std::iter::empty());
        assert!(m.is_empty());
    }

    #[test]
    fn out_of_range_is_inactive() {
        let mut m = ActiveMarkers::new(1);
        assert!(m.set_only(9).is_empty());
        assert!(!m.is_active(9));
        assert_eq!(m.active_count(), 0);
    }
}
