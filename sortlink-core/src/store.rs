//! Cargo store
//!
//! The authoritative record of the three regional counters. On the host
//! board it is fed by UART sort events; on the 63B board it is replaced
//! wholesale by frames received over SLE.
//!
//! Every operation holds the lock only for the copy or assignment, so a
//! reader always sees a whole snapshot from before or after an update.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use sortlink_protocol::{CargoSnapshot, Region};

/// Shared counter record
///
/// Lives in a `static` and is handed to tasks as `&'static CargoStore`.
pub struct CargoStore {
    inner: Mutex<CriticalSectionRawMutex, Cell<CargoSnapshot>>,
}

impl CargoStore {
    /// All counters zero, not yet valid
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(CargoSnapshot::EMPTY)),
        }
    }

    /// Count one parcel for `region` at monotonic time `now` (ms)
    ///
    /// Returns the updated snapshot.
    pub fn apply_increment(&self, region: Region, now: u64) -> CargoSnapshot {
        self.inner.lock(|cell| {
            let mut snapshot = cell.get();
            let counter = match region {
                Region::Jiangsu => &mut snapshot.jiangsu,
                Region::Zhejiang => &mut snapshot.zhejiang,
                Region::Shanghai => &mut snapshot.shanghai,
            };
            *counter = counter.wrapping_add(1);
            snapshot.timestamp = now;
            snapshot.valid = true;
            cell.set(snapshot);
            snapshot
        })
    }

    /// Overwrite every field (last writer wins)
    pub fn apply_replace(&self, snapshot: CargoSnapshot) {
        self.inner.lock(|cell| cell.set(snapshot));
    }

    /// Copy of the current record
    pub fn read_snapshot(&self) -> CargoSnapshot {
        self.inner.lock(Cell::get)
    }

    /// Copy of the current record, once anything has been recorded
    pub fn read_valid(&self) -> Option<CargoSnapshot> {
        let snapshot = self.read_snapshot();
        snapshot.valid.then_some(snapshot)
    }
}

impl Default for CargoStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_store_is_invalid() {
        let store = CargoStore::new();
        assert_eq!(store.read_snapshot(), CargoSnapshot::EMPTY);
        assert_eq!(store.read_valid(), None);
    }

    #[test]
    fn test_increment_touches_one_counter() {
        let store = CargoStore::new();
        let snapshot = store.apply_increment(Region::Zhejiang, 42);
        assert_eq!(snapshot, CargoSnapshot::new(0, 1, 0, 42));
        assert_eq!(store.read_valid(), Some(snapshot));
    }

    #[test]
    fn test_increment_wraps() {
        let store = CargoStore::new();
        store.apply_replace(CargoSnapshot::new(u32::MAX, 0, 0, 0));
        assert_eq!(store.apply_increment(Region::Jiangsu, 1).jiangsu, 0);
    }

    #[test]
    fn test_replace_overwrites_everything() {
        let store = CargoStore::new();
        store.apply_increment(Region::Shanghai, 5);
        let incoming = CargoSnapshot::new(7, 8, 9, 1000);
        store.apply_replace(incoming);
        assert_eq!(store.read_snapshot(), incoming);
    }

    #[test]
    fn test_concurrent_increment_and_replace() {
        let replacement = CargoSnapshot::new(100, 200, 300, 9000);

        for _ in 0..200 {
            let store = CargoStore::new();
            std::thread::scope(|scope| {
                scope.spawn(|| {
                    store.apply_increment(Region::Jiangsu, 50);
                });
                scope.spawn(|| store.apply_replace(replacement));
            });

            // Either the increment was overwritten, or it landed on top
            let after = store.read_snapshot();
            let incremented = CargoSnapshot::new(101, 200, 300, 50);
            assert!(after == replacement || after == incremented, "{:?}", after);
        }
    }

    proptest! {
        #[test]
        fn prop_increments_are_counted(regions in proptest::collection::vec(0u8..3, 0..100)) {
            let store = CargoStore::new();
            for (now, index) in regions.iter().enumerate() {
                let region = Region::from_index(*index).unwrap();
                store.apply_increment(region, now as u64);
            }

            let snapshot = store.read_snapshot();
            for region in Region::ALL {
                let expected = regions.iter().filter(|&&i| i == region.index()).count();
                prop_assert_eq!(snapshot.count(region) as usize, expected);
            }
            prop_assert_eq!(snapshot.valid, !regions.is_empty());
        }
    }
}
