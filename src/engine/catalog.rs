//! Asset catalog: the fixed id universe and the photos resolved so far.
//!
//! Loads settle in any order. A failed id is remembered and never offered
//! as a spawn candidate again; it never blocks the other ids.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use crate::error::TunnelError;
use crate::net::image::{LoadEvent, Photo, PhotoLoader};

/// Catalog identifier of one photo.
pub type CatalogId = u32;

/// Inclusive id range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogRange {
    pub min: CatalogId,
    pub max: CatalogId,
}

impl CatalogRange {
    pub const fn new(min: CatalogId, max: CatalogId) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, id: CatalogId) -> bool {
        (self.min..=self.max).contains(&id)
    }

    pub fn len(&self) -> usize {
        if self.min > self.max {
            0
        } else {
            (self.max - self.min) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> RangeInclusive<CatalogId> {
        self.min..=self.max
    }
}

pub struct AssetCatalog {
    range: CatalogRange,
    photos: BTreeMap<CatalogId, Photo>,
    failed: BTreeSet<CatalogId>,
    loader: Option<PhotoLoader>,
}

impl AssetCatalog {
    /// A catalog without a loader; photos arrive only through `resolve`.
    pub fn new(range: CatalogRange) -> Self {
        Self {
            range,
            photos: BTreeMap::new(),
            failed: BTreeSet::new(),
            loader: None,
        }
    }

    pub fn with_loader(range: CatalogRange, loader: PhotoLoader) -> Self {
        Self {
            loader: Some(loader),
            ..Self::new(range)
        }
    }

    pub fn range(&self) -> CatalogRange {
        self.range
    }

    /// Issue one background load per id in the range. Returns the number of
    /// loads issued by this call.
    pub fn request_all(&mut self) -> usize {
        let Some(loader) = self.loader.as_mut() else {
            return 0;
        };
        let before = loader.requested_count();
        for id in self.range.ids() {
            loader.request(id);
        }
        loader.requested_count() - before
    }

    /// Completion handler for one load. Returns true if the id became
    /// available.
    pub fn resolve(&mut self, event: LoadEvent) -> bool {
        let id = event.id;
        if !self.range.contains(id) {
            log::warn!("Ignoring photo {} outside catalog {:?}", id, self.range);
            return false;
        }
        if self.photos.contains_key(&id) || self.failed.contains(&id) {
            return false;
        }

        match event.result {
            Ok(photo) => {
                log::info!("Loaded photo {} ({}x{})", id, photo.width, photo.height);
                self.photos.insert(id, photo);
                true
            }
            Err(e) => {
                log::warn!("Excluding photo {}: {}", id, e);
                self.failed.insert(id);
                false
            }
        }
    }

    /// Apply every load that finished since the last call. Returns how many
    /// ids became available.
    pub fn poll(&mut self) -> usize {
        let events = match self.loader.as_mut() {
            Some(loader) => loader.poll(),
            None => return 0,
        };
        events
            .into_iter()
            .fold(0, |n, event| n + usize::from(self.resolve(event)))
    }

    /// Block until at least `threshold` photos are available.
    ///
    /// Fails with `GateUnreachable` once nothing is left in flight, and with
    /// `GateTimeout` when `timeout` passes first.
    pub fn wait_until_available(
        &mut self,
        threshold: usize,
        timeout: Duration,
    ) -> Result<usize, TunnelError> {
        let deadline = Instant::now() + timeout;
        self.poll();

        while self.available_count() < threshold {
            if self.pending_count() == 0 {
                return Err(TunnelError::GateUnreachable {
                    available: self.available_count(),
                    required: threshold,
                });
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            let event = self.loader.as_mut().and_then(|loader| loader.wait(remaining));
            match event {
                Some(event) => {
                    self.resolve(event);
                }
                None => {
                    return Err(TunnelError::GateTimeout {
                        available: self.available_count(),
                        required: threshold,
                    })
                }
            }
        }

        Ok(self.available_count())
    }

    pub fn is_available(&self, id: CatalogId) -> bool {
        self.photos.contains_key(&id)
    }

    pub fn get(&self, id: CatalogId) -> Option<&Photo> {
        self.photos.get(&id)
    }

    pub fn available_count(&self) -> usize {
        self.photos.len()
    }

    /// Available ids in ascending order.
    pub fn available_ids(&self) -> impl Iterator<Item = CatalogId> + '_ {
        self.photos.keys().copied()
    }

    pub fn is_failed(&self, id: CatalogId) -> bool {
        self.failed.contains(&id)
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Loads requested but not yet applied to the catalog.
    pub fn pending_count(&self) -> usize {
        self.loader.as_ref().map_or(0, PhotoLoader::pending_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssetError;
    use crate::net::image::AssetSource;
    use std::sync::Arc;

    fn photo(id: CatalogId) -> Photo {
        Photo {
            id,
            width: 2,
            height: 3,
            rgba: vec![255; 2 * 3 * 4],
        }
    }

    fn loaded(id: CatalogId) -> LoadEvent {
        LoadEvent { id, result: Ok(photo(id)) }
    }

    fn failed(id: CatalogId) -> LoadEvent {
        LoadEvent {
            id,
            result: Err(AssetError::Status { id, status: 500 }),
        }
    }

    /// Fails every id divisible by three.
    struct FlakySource;

    impl AssetSource for FlakySource {
        fn load(&self, id: CatalogId) -> Result<Photo, AssetError> {
            if id % 3 == 0 {
                Err(AssetError::Status { id, status: 503 })
            } else {
                Ok(photo(id))
            }
        }
    }

    /// Holds every load for longer than any gate timeout used below.
    struct SlowSource;

    impl AssetSource for SlowSource {
        fn load(&self, id: CatalogId) -> Result<Photo, AssetError> {
            std::thread::sleep(Duration::from_millis(500));
            Ok(photo(id))
        }
    }

    #[test]
    fn test_range_len() {
        assert_eq!(CatalogRange::new(1, 81).len(), 81);
        assert_eq!(CatalogRange::new(5, 5).len(), 1);
        assert!(CatalogRange::new(6, 5).is_empty());
        assert!(CatalogRange::new(1, 81).contains(81));
        assert!(!CatalogRange::new(1, 81).contains(0));
    }

    #[test]
    fn test_resolve_out_of_order() {
        let mut catalog = AssetCatalog::new(CatalogRange::new(1, 5));
        assert!(catalog.resolve(loaded(4)));
        assert!(catalog.resolve(loaded(2)));
        assert!(catalog.is_available(4));
        assert!(!catalog.is_available(1));
        assert_eq!(catalog.available_count(), 2);
        assert_eq!(catalog.available_ids().collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(catalog.get(2).map(|p| p.id), Some(2));
        assert!(catalog.get(3).is_none());
    }

    #[test]
    fn test_failed_id_is_permanently_excluded() {
        let mut catalog = AssetCatalog::new(CatalogRange::new(1, 5));
        assert!(!catalog.resolve(failed(3)));
        // a late success for the same id is ignored
        assert!(!catalog.resolve(loaded(3)));
        assert!(catalog.is_failed(3));
        assert!(!catalog.is_available(3));
        assert!(catalog.resolve(loaded(1)));
        assert_eq!(catalog.failed_count(), 1);
    }

    #[test]
    fn test_ignores_ids_outside_range() {
        let mut catalog = AssetCatalog::new(CatalogRange::new(1, 5));
        assert!(!catalog.resolve(loaded(99)));
        assert_eq!(catalog.available_count(), 0);
    }

    #[test]
    fn test_gate_opens_despite_failures() {
        let loader = PhotoLoader::new(Arc::new(FlakySource), 4).unwrap();
        let mut catalog = AssetCatalog::with_loader(CatalogRange::new(1, 12), loader);
        assert_eq!(catalog.request_all(), 12);
        assert_eq!(catalog.request_all(), 0);

        let available = catalog
            .wait_until_available(6, Duration::from_secs(10))
            .unwrap();
        assert!(available >= 6);

        // drain the rest: 8 succeed, 4 are excluded
        let _ = catalog.wait_until_available(8, Duration::from_secs(10)).unwrap();
        while catalog.pending_count() > 0 {
            catalog.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(catalog.available_count(), 8);
        assert_eq!(catalog.failed_count(), 4);
        assert!(catalog.is_failed(9));
    }

    #[test]
    fn test_gate_unreachable_when_everything_settled() {
        let loader = PhotoLoader::new(Arc::new(FlakySource), 2).unwrap();
        let mut catalog = AssetCatalog::with_loader(CatalogRange::new(1, 6), loader);
        catalog.request_all();
        let err = catalog
            .wait_until_available(5, Duration::from_secs(10))
            .unwrap_err();
        assert!(matches!(
            err,
            TunnelError::GateUnreachable { available: 4, required: 5 }
        ));
    }

    #[test]
    fn test_gate_without_loader_is_unreachable() {
        let mut catalog = AssetCatalog::new(CatalogRange::new(1, 6));
        catalog.resolve(loaded(1));
        assert_eq!(catalog.wait_until_available(1, Duration::ZERO).unwrap(), 1);
        assert!(matches!(
            catalog.wait_until_available(2, Duration::ZERO),
            Err(TunnelError::GateUnreachable { available: 1, required: 2 })
        ));
    }

    #[test]
    fn test_gate_times_out_while_loads_are_in_flight() {
        let loader = PhotoLoader::new(Arc::new(SlowSource), 1).unwrap();
        let mut catalog = AssetCatalog::with_loader(CatalogRange::new(1, 1), loader);
        catalog.request_all();

        let err = catalog
            .wait_until_available(1, Duration::from_millis(20))
            .unwrap_err();
        assert!(matches!(
            err,
            TunnelError::GateTimeout { available: 0, required: 1 }
        ));
        // the load is still owed to the catalog
        assert_eq!(catalog.pending_count(), 1);

        let available = catalog
            .wait_until_available(1, Duration::from_secs(10))
            .unwrap();
        assert_eq!(available, 1);
    }
}
