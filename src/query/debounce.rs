/// Delay between the last keystroke and committing a search.
pub const SEARCH_DEBOUNCE_MS: u32 = 1000;

/// Identifies one pushed value. Firing an outdated ticket yields nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

/// Time-free debouncer.
///
/// The caller pushes every new value and schedules a timer of
/// [`SEARCH_DEBOUNCE_MS`] carrying the returned ticket. When a timer fires,
/// [`Debouncer::fire`] releases the value only if nothing newer was pushed in
/// the meantime, so superseded timers are harmless no-ops.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    pending: Option<T>,
    generation: u64,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debouncer<T> {
    pub fn new() -> Self {
        Self {
            pending: None,
            generation: 0,
        }
    }

    pub fn push(&mut self, value: T) -> DebounceTicket {
        self.generation += 1;
        self.pending = Some(value);
        DebounceTicket(self.generation)
    }

    pub fn fire(&mut self, ticket: DebounceTicket) -> Option<T> {
        if ticket.0 != self.generation {
            return None;
        }
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
