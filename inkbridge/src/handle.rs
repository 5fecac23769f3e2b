//! Generation-checked handle tables.
//!
//! Handles cross the host boundary as opaque 64-bit integers. Rather than
//! handing out raw addresses, the registry issues indexes into a slot table
//! with a per-slot generation counter: the generation lives in the high 32
//! bits, the slot index plus one in the low 32 bits. Zero is never issued,
//! so the host's null handle stays the "no resource" value, and a freed or
//! fabricated handle fails the generation check instead of dereferencing
//! freed memory.

/// An opaque handle to an open document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentHandle(u64);

/// An opaque handle to an open page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageHandle(u64);

macro_rules! handle_impl {
    ($name:ident) => {
        impl $name {
            /// The null handle: "no resource".
            pub const NULL: $name = $name(0);

            /// Reconstruct a handle from its raw integer form.
            pub fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            /// The raw integer form that crosses the host boundary.
            pub fn to_raw(self) -> u64 {
                self.0
            }

            /// Whether this is the null handle.
            pub fn is_null(self) -> bool {
                self.0 == 0
            }
        }
    };
}

handle_impl!(DocumentHandle);
handle_impl!(PageHandle);

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// A slot table issuing generation-checked `u64` handles.
pub(crate) struct HandleTable<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
}

impl<T> HandleTable<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store a value and issue its handle.
    pub fn insert(&mut self, value: T) -> u64 {
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index].value = Some(value);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 1,
                    value: Some(value),
                });
                self.slots.len() - 1
            }
        };
        encode(self.slots[index].generation, index)
    }

    /// Resolve a handle to its value, if the handle is live.
    pub fn get(&self, raw: u64) -> Option<&T> {
        let (generation, index) = decode(raw)?;
        let slot = self.slots.get(index)?;
        if slot.generation != generation {
            return None;
        }
        slot.value.as_ref()
    }

    /// Resolve a handle mutably, if the handle is live.
    pub fn get_mut(&mut self, raw: u64) -> Option<&mut T> {
        let (generation, index) = decode(raw)?;
        let slot = self.slots.get_mut(index)?;
        if slot.generation != generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Remove a handle's value, invalidating the handle.
    ///
    /// The slot's generation is bumped so the same raw value can never
    /// resolve again, then the slot is recycled.
    pub fn remove(&mut self, raw: u64) -> Option<T> {
        let (generation, index) = decode(raw)?;
        let slot = self.slots.get_mut(index)?;
        if slot.generation != generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1).max(1);
        self.free.push(index);
        Some(value)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.value.is_some()).count()
    }
}

fn encode(generation: u32, index: usize) -> u64 {
    ((generation as u64) << 32) | (index as u64 + 1)
}

fn decode(raw: u64) -> Option<(u32, usize)> {
    let low = (raw & 0xffff_ffff) as usize;
    if low == 0 {
        return None;
    }
    Some(((raw >> 32) as u32, low - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove() {
        let mut table = HandleTable::new();
        let h = table.insert("alpha");
        assert_eq!(table.get(h), Some(&"alpha"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.remove(h), Some("alpha"));
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn null_never_resolves() {
        let table: HandleTable<u32> = HandleTable::new();
        assert!(table.get(0).is_none());
    }

    #[test]
    fn stale_handle_rejected_after_slot_reuse() {
        let mut table = HandleTable::new();
        let first = table.insert(1);
        table.remove(first);
        let second = table.insert(2);
        // same slot, new generation
        assert_ne!(first, second);
        assert!(table.get(first).is_none());
        assert_eq!(table.get(second), Some(&2));
    }

    #[test]
    fn double_remove_is_none() {
        let mut table = HandleTable::new();
        let h = table.insert(9);
        assert!(table.remove(h).is_some());
        assert!(table.remove(h).is_none());
    }

    #[test]
    fn fabricated_handle_rejected() {
        let mut table = HandleTable::new();
        table.insert(7);
        assert!(table.get(0xdead_beef_0000_0001 | (99u64 << 32)).is_none());
        assert!(table.get(1 | (42u64 << 32)).is_none());
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut table = HandleTable::new();
        let h = table.insert(vec![1]);
        table.get_mut(h).unwrap().push(2);
        assert_eq!(table.get(h), Some(&vec![1, 2]));
    }
}
