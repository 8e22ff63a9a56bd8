//! Generation-checked handle table for objects owned across the C boundary.
//!
//! A handle packs a slot index (high 32 bits) and the slot's generation (low
//! 32 bits). Removing an entry bumps the generation, so a stale handle never
//! resolves to whatever later reuses the slot.

/// A decoded `u64` handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Handle {
    slot: u32,
    generation: u32,
}

impl Handle {
    fn from_bits(bits: u64) -> Self {
        Self {
            slot: (bits >> 32) as u32,
            generation: bits as u32,
        }
    }

    fn to_bits(self) -> u64 {
        (u64::from(self.slot) << 32) | u64::from(self.generation)
    }
}

enum Entry<T> {
    Occupied { generation: u32, value: T },
    /// Free slot; `next_free` links the intrusive free list.
    Vacant { generation: u32, next_free: Option<u32> },
    /// Generation exhausted. Never reused.
    Retired,
}

/// Owned values addressed by `u64` handles.
pub(crate) struct HandleTable<T> {
    entries: Vec<Entry<T>>,
    free_head: Option<u32>,
}

impl<T> HandleTable<T> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_head: None,
        }
    }

    /// Store `value` and return its handle.
    pub fn insert(&mut self, value: T) -> u64 {
        if let Some(slot) = self.free_head {
            let entry = &mut self.entries[slot as usize];
            if let Entry::Vacant {
                generation,
                next_free,
            } = *entry
            {
                self.free_head = next_free;
                *entry = Entry::Occupied { generation, value };
                return Handle { slot, generation }.to_bits();
            }
        }
        let slot = self.entries.len() as u32;
        self.entries.push(Entry::Occupied {
            generation: 0,
            value,
        });
        Handle {
            slot,
            generation: 0,
        }
        .to_bits()
    }

    /// The value behind `handle`, or `None` if it is stale or was never
    /// issued.
    pub fn get(&self, handle: u64) -> Option<&T> {
        let h = Handle::from_bits(handle);
        match self.entries.get(h.slot as usize)? {
            Entry::Occupied { generation, value } if *generation == h.generation => Some(value),
            _ => None,
        }
    }

    /// Remove and return the value behind `handle`.
    ///
    /// Removing twice returns `None` the second time.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let h = Handle::from_bits(handle);
        let entry = self.entries.get_mut(h.slot as usize)?;
        if !matches!(entry, Entry::Occupied { generation, .. } if *generation == h.generation) {
            return None;
        }
        let next = match h.generation.checked_add(1) {
            Some(generation) => Entry::Vacant {
                generation,
                next_free: self.free_head,
            },
            None => Entry::Retired,
        };
        let recycled = matches!(next, Entry::Vacant { .. });
        let Entry::Occupied { value, .. } = std::mem::replace(entry, next) else {
            return None;
        };
        if recycled {
            self.free_head = Some(h.slot);
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get() {
        let mut table = HandleTable::new();
        let a = table.insert("a");
        let b = table.insert("b");
        assert_ne!(a, b);
        assert_eq!(table.get(a), Some(&"a"));
        assert_eq!(table.get(b), Some(&"b"));
    }

    #[test]
    fn removed_handle_is_stale() {
        let mut table = HandleTable::new();
        let h = table.insert(7);
        assert_eq!(table.remove(h), Some(7));
        assert_eq!(table.get(h), None);
        assert_eq!(table.remove(h), None);
    }

    #[test]
    fn reused_slot_gets_new_generation() {
        let mut table = HandleTable::new();
        let old = table.insert(1);
        table.remove(old);
        let new = table.insert(2);
        assert_eq!(new >> 32, old >> 32, "slot is reused");
        assert_ne!(new, old);
        assert_eq!(table.get(old), None);
        assert_eq!(table.get(new), Some(&2));
    }

    #[test]
    fn free_list_is_lifo() {
        let mut table = HandleTable::new();
        let a = table.insert('a');
        let b = table.insert('b');
        table.remove(a);
        table.remove(b);
        let c = table.insert('c');
        assert_eq!(c >> 32, b >> 32);
        let d = table.insert('d');
        assert_eq!(d >> 32, a >> 32);
    }

    #[test]
    fn never_issued_handles_are_rejected() {
        let table: HandleTable<u8> = HandleTable::new();
        assert_eq!(table.get(0), None);
        assert_eq!(table.get(u64::MAX), None);
    }

    #[test]
    fn exhausted_generation_retires_slot() {
        let mut table = HandleTable::new();
        let h = table.insert(0u8);
        // Force the slot to its last generation.
        table.entries[0] = Entry::Occupied {
            generation: u32::MAX,
            value: 0,
        };
        let last = Handle {
            slot: 0,
            generation: u32::MAX,
        }
        .to_bits();
        assert_eq!(table.remove(last), Some(0));
        assert_eq!(table.get(h), None);
        let next = table.insert(1);
        assert_ne!(next >> 32, 0, "retired slot must not be reused");
    }
}
