use parking_lot::Mutex;

/// Outcome of attempting to claim a slot for an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed,
    AlreadyInFlight,
    CapacityExhausted,
}

/// Fixed-capacity table of aliases with an acquisition currently in flight.
/// Each operation holds the lock for its whole body, and none of them do any
/// I/O, so the lock is never held across a suspension point. Invariant: an
/// alias occupies at most one slot at a time.
#[derive(Debug)]
pub struct AdmissionTable {
    slots: Mutex<Vec<Option<String>>>,
}

impl AdmissionTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(vec![None; capacity]),
        }
    }

    pub fn try_claim(&self, alias: &str) -> ClaimOutcome {
        let mut slots = self.slots.lock();
        if slots
            .iter()
            .flatten()
            .any(|occupied| occupied.as_str() == alias)
        {
            return ClaimOutcome::AlreadyInFlight;
        }
        match slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(alias.to_string());
                ClaimOutcome::Claimed
            }
            None => ClaimOutcome::CapacityExhausted,
        }
    }

    /// Clears the slot holding `alias`. Called exactly once per successful
    /// claim, on every exit path of the acquisition that claimed it.
    pub fn release(&self, alias: &str) {
        let mut slots = self.slots.lock();
        if let Some(slot) = slots
            .iter_mut()
            .find(|slot| slot.as_deref() == Some(alias))
        {
            *slot = None;
        }
    }

    /// Sorted view of all in-flight aliases.
    pub fn snapshot(&self) -> Vec<String> {
        let slots = self.slots.lock();
        let mut aliases: Vec<String> = slots.iter().flatten().cloned().collect();
        aliases.sort();
        aliases
    }
}
