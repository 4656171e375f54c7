//! Fresh-name allocation.

use ext_ir::{Name, StringInterner};

/// Per-compilation-unit fresh-name supply.
///
/// Generated names have the form `{hint}${n}`. The counter is shared by every
/// hint and only ever increases, so allocation within one unit is strictly
/// sequential. A candidate already present in the interner is skipped, which
/// keeps generated names distinct from anything the unit already mentions.
#[derive(Debug, Default)]
pub struct FreshNames {
    counter: u32,
}

impl FreshNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a name derived from `hint`, unique within this unit.
    pub fn fresh(&mut self, interner: &StringInterner, hint: &str) -> Name {
        loop {
            self.counter += 1;
            let candidate = format!("{hint}${}", self.counter);
            if interner.get(&candidate).is_none() {
                return interner.intern(&candidate);
            }
        }
    }
}
