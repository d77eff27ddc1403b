//! Fixed-capacity record registry
//!
//! Records live in `N` inline slots chained through a free list, so the
//! registry never allocates and slot exhaustion is reported synchronously.
//! Each slot carries a generation that is bumped whenever its record is
//! released; identifiers embed it, which makes a stale identifier miss
//! instead of aliasing a newer record in the same slot.

use super::error::{LlsError, LlsResult};
use super::types::{ConnectionId, MAX_GENERATION};

/// Maximum number of slots addressable by a [`ConnectionId`].
pub const MAX_REGISTRY_CAPACITY: usize = 256;

const FIRST_GENERATION: u32 = 1;

enum Entry<T> {
    Vacant { next_free: Option<usize> },
    Occupied(T),
}

struct Slot<T> {
    generation: u32,
    entry: Entry<T>,
}

impl<T> Slot<T> {
    fn bump_generation(&mut self) {
        self.generation = if self.generation >= MAX_GENERATION {
            FIRST_GENERATION
        } else {
            self.generation + 1
        };
    }
}

pub struct Registry<T, const N: usize> {
    slots: [Slot<T>; N],
    free_head: Option<usize>,
    len: usize,
}

impl<T, const N: usize> Registry<T, N> {
    const CAPACITY_CHECK: () = assert!(
        N <= MAX_REGISTRY_CAPACITY,
        "registry capacity exceeds the connection identifier range"
    );

    pub fn new() -> Self {
        let () = Self::CAPACITY_CHECK;

        Self {
            slots: core::array::from_fn(|index| Slot {
                generation: FIRST_GENERATION,
                entry: Entry::Vacant {
                    next_free: Self::successor(index),
                },
            }),
            free_head: Self::first_free(),
            len: 0,
        }
    }

    fn successor(index: usize) -> Option<usize> {
        (index + 1 < N).then_some(index + 1)
    }

    fn first_free() -> Option<usize> {
        (N > 0).then_some(0)
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Takes a free slot and stores the value built for its identifier.
    pub fn insert_with<F>(&mut self, build: F) -> LlsResult<ConnectionId>
    where
        F: FnOnce(ConnectionId) -> T,
    {
        let index = self.free_head.ok_or(LlsError::ResourceExhausted)?;
        let slot = &mut self.slots[index];

        let next_free = match slot.entry {
            Entry::Vacant { next_free } => next_free,
            // free list only ever links vacant slots
            Entry::Occupied(_) => return Err(LlsError::ResourceExhausted),
        };

        let cid = ConnectionId::new(index, slot.generation);
        slot.entry = Entry::Occupied(build(cid));
        self.free_head = next_free;
        self.len += 1;
        Ok(cid)
    }

    fn slot_for(&self, cid: ConnectionId) -> Option<&Slot<T>> {
        self.slots
            .get(cid.index())
            .filter(|slot| slot.generation == cid.generation())
    }

    pub fn get(&self, cid: ConnectionId) -> Option<&T> {
        match &self.slot_for(cid)?.entry {
            Entry::Occupied(value) => Some(value),
            Entry::Vacant { .. } => None,
        }
    }

    pub fn get_mut(&mut self, cid: ConnectionId) -> Option<&mut T> {
        let slot = self
            .slots
            .get_mut(cid.index())
            .filter(|slot| slot.generation == cid.generation())?;
        match &mut slot.entry {
            Entry::Occupied(value) => Some(value),
            Entry::Vacant { .. } => None,
        }
    }

    pub fn contains(&self, cid: ConnectionId) -> bool {
        self.get(cid).is_some()
    }

    /// Releases the record and invalidates its identifier.
    pub fn remove(&mut self, cid: ConnectionId) -> Option<T> {
        self.get(cid)?;

        let index = cid.index();
        let slot = &mut self.slots[index];
        let entry = std::mem::replace(
            &mut slot.entry,
            Entry::Vacant {
                next_free: self.free_head,
            },
        );
        slot.bump_generation();
        self.free_head = Some(index);
        self.len -= 1;

        match entry {
            Entry::Occupied(value) => Some(value),
            Entry::Vacant { .. } => None,
        }
    }

    /// Identifier of the first live record matching `predicate`.
    pub fn find<P>(&self, mut predicate: P) -> Option<ConnectionId>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter()
            .find(|(_, value)| predicate(value))
            .map(|(cid, _)| cid)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConnectionId, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match &slot.entry {
                Entry::Occupied(value) => Some((ConnectionId::new(index, slot.generation), value)),
                Entry::Vacant { .. } => None,
            })
    }

    /// Releases every record; all outstanding identifiers go stale.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if matches!(slot.entry, Entry::Occupied(_)) {
                slot.bump_generation();
            }
            slot.entry = Entry::Vacant {
                next_free: Self::successor(index),
            };
        }
        self.free_head = Self::first_free();
        self.len = 0;
    }
}

impl<T, const N: usize> Default for Registry<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_until_exhausted() {
        let mut registry: Registry<u16, 2> = Registry::new();
        let a = registry.insert_with(|_| 10).unwrap();
        let b = registry.insert_with(|_| 20).unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.insert_with(|_| 30),
            Err(LlsError::ResourceExhausted)
        );
        assert_eq!(registry.get(a), Some(&10));
        assert_eq!(registry.get(b), Some(&20));
    }

    #[test]
    fn test_zero_capacity() {
        let mut registry: Registry<u16, 0> = Registry::new();
        assert_eq!(registry.capacity(), 0);
        assert_eq!(
            registry.insert_with(|_| 1),
            Err(LlsError::ResourceExhausted)
        );
    }

    #[test]
    fn test_builder_sees_assigned_id() {
        let mut registry: Registry<ConnectionId, 4> = Registry::new();
        let cid = registry.insert_with(|cid| cid).unwrap();
        assert_eq!(registry.get(cid), Some(&cid));
        assert_ne!(cid.value(), 0);
    }

    #[test]
    fn test_removed_id_goes_stale() {
        let mut registry: Registry<u16, 1> = Registry::new();
        let old = registry.insert_with(|_| 1).unwrap();
        assert_eq!(registry.remove(old), Some(1));
        assert_eq!(registry.remove(old), None);

        // the slot is reused, the identifier is not
        let new = registry.insert_with(|_| 2).unwrap();
        assert_eq!(new.index(), old.index());
        assert_ne!(new, old);
        assert_eq!(registry.get(old), None);
        assert_eq!(registry.get_mut(old), None);
        assert_eq!(registry.get(new), Some(&2));
    }

    #[test]
    fn test_busy_slot_never_repeats_an_id() {
        let mut registry: Registry<u16, 1> = Registry::new();
        let first = registry.insert_with(|_| 0).unwrap();
        registry.remove(first);

        // well past the point where an 8-bit generation would wrap
        let mut seen = vec![first];
        for cycle in 1..1_000u16 {
            let cid = registry.insert_with(|_| cycle).unwrap();
            assert!(!seen.contains(&cid), "{:?} reissued", cid);
            assert_eq!(registry.get(first), None);
            seen.push(cid);
            registry.remove(cid);
        }
    }

    #[test]
    fn test_generation_wraps_to_first() {
        let mut registry: Registry<u16, 1> = Registry::new();
        registry.slots[0].generation = MAX_GENERATION;
        let last = registry.insert_with(|_| 0).unwrap();
        assert_eq!(last.generation(), MAX_GENERATION);
        registry.remove(last);

        let wrapped = registry.insert_with(|_| 1).unwrap();
        assert_eq!(wrapped.generation(), FIRST_GENERATION);
        assert_ne!(wrapped, last);
    }

    #[test]
    fn test_find_and_iter() {
        let mut registry: Registry<u16, 4> = Registry::new();
        let a = registry.insert_with(|_| 5).unwrap();
        let b = registry.insert_with(|_| 6).unwrap();
        registry.remove(a);

        assert_eq!(registry.find(|handle| *handle == 6), Some(b));
        assert_eq!(registry.find(|handle| *handle == 5), None);
        let live: Vec<_> = registry.iter().collect();
        assert_eq!(live, vec![(b, &6)]);
    }

    #[test]
    fn test_clear_invalidates_everything() {
        let mut registry: Registry<u16, 3> = Registry::new();
        let ids: Vec<_> = (0..3).map(|v| registry.insert_with(|_| v).unwrap()).collect();
        registry.clear();
        assert!(registry.is_empty());
        for cid in ids {
            assert!(!registry.contains(cid));
        }
        for v in 0..3 {
            registry.insert_with(|_| v).unwrap();
        }
        assert_eq!(registry.len(), 3);
    }
}
