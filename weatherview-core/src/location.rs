//! Device location: a permission check followed by one last-known-position read.

use async_trait::async_trait;
use std::fmt::Debug;
use tracing::{debug, info, warn};

use crate::{config::LocationConfig, error::PositionError, model::Coordinates};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    FineLocation,
    CoarseLocation,
}

/// Platform permission registry. Prompting is the display layer's job.
pub trait PermissionRegistry: Send + Sync + Debug {
    fn is_granted(&self, permission: Permission) -> bool;
}

/// Platform location service.
#[async_trait]
pub trait PositionService: Send + Sync + Debug {
    /// The cached position, without starting a new fix.
    async fn last_known_position(&self) -> Result<Option<Coordinates>, PositionError>;
}

/// Resolves the current device position. `None` means "unavailable" and is
/// a normal outcome, not an error.
#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn current_location(&self) -> Option<Coordinates>;
}

#[derive(Debug, Clone)]
pub struct LocationTracker<R, S> {
    permissions: R,
    positions: S,
}

impl<R, S> LocationTracker<R, S> {
    pub fn new(permissions: R, positions: S) -> Self {
        Self { permissions, positions }
    }
}

impl LocationTracker<StaticPermissions, FixedPosition> {
    /// Desktop tracker: the `enabled` flag grants coarse location and the
    /// configured coordinates act as the cached fix.
    pub fn from_config(location: &LocationConfig) -> Self {
        Self::new(
            StaticPermissions { fine: false, coarse: location.enabled },
            FixedPosition(location.last_known()),
        )
    }
}

#[async_trait]
impl<R, S> LocationProvider for LocationTracker<R, S>
where
    R: PermissionRegistry,
    S: PositionService,
{
    async fn current_location(&self) -> Option<Coordinates> {
        let fine = self.permissions.is_granted(Permission::FineLocation);
        let coarse = self.permissions.is_granted(Permission::CoarseLocation);

        if !fine && !coarse {
            debug!("location permission not granted");
            return None;
        }

        match self.positions.last_known_position().await {
            Ok(Some(coords)) => {
                info!(%coords, "resolved last known position");
                Some(coords)
            }
            Ok(None) => {
                debug!("no cached position available");
                None
            }
            Err(e) => {
                warn!(error = %e, "last known position lookup failed");
                None
            }
        }
    }
}

/// Fixed permission answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticPermissions {
    pub fine: bool,
    pub coarse: bool,
}

impl PermissionRegistry for StaticPermissions {
    fn is_granted(&self, permission: Permission) -> bool {
        match permission {
            Permission::FineLocation => self.fine,
            Permission::CoarseLocation => self.coarse,
        }
    }
}

/// A position service whose cache holds a preconfigured value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedPosition(pub Option<Coordinates>);

#[async_trait]
impl PositionService for FixedPosition {
    async fn last_known_position(&self) -> Result<Option<Coordinates>, PositionError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingService {
        calls: AtomicUsize,
        fail: bool,
        position: Option<Coordinates>,
    }

    #[async_trait]
    impl PositionService for CountingService {
        async fn last_known_position(&self) -> Result<Option<Coordinates>, PositionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(PositionError::ServiceUnavailable)
            } else {
                Ok(self.position)
            }
        }
    }

    fn granted() -> StaticPermissions {
        StaticPermissions { fine: true, coarse: false }
    }

    #[tokio::test]
    async fn no_permission_skips_position_service() {
        let tracker = LocationTracker::new(
            StaticPermissions::default(),
            CountingService { position: Some(Coordinates::new(1.0, 2.0)), ..Default::default() },
        );

        assert_eq!(tracker.current_location().await, None);
        assert_eq!(tracker.positions.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn coarse_permission_alone_is_enough() {
        let tracker = LocationTracker::new(
            StaticPermissions { fine: false, coarse: true },
            FixedPosition(Some(Coordinates::new(28.1, -15.4))),
        );

        assert_eq!(tracker.current_location().await, Some(Coordinates::new(28.1, -15.4)));
    }

    #[tokio::test]
    async fn cached_position_is_read_once() {
        let tracker = LocationTracker::new(
            granted(),
            CountingService { position: Some(Coordinates::new(40.4, -3.7)), ..Default::default() },
        );

        assert_eq!(tracker.current_location().await, Some(Coordinates::new(40.4, -3.7)));
        assert_eq!(tracker.positions.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_cache_is_unavailable() {
        let tracker = LocationTracker::new(granted(), CountingService::default());
        assert_eq!(tracker.current_location().await, None);
    }

    #[tokio::test]
    async fn service_failure_is_unavailable_not_error() {
        let tracker = LocationTracker::new(
            granted(),
            CountingService { fail: true, ..Default::default() },
        );

        assert_eq!(tracker.current_location().await, None);
        assert_eq!(tracker.positions.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn from_config_maps_enabled_flag_to_permission() {
        let disabled = LocationConfig { enabled: false, latitude: Some(1.0), longitude: Some(2.0) };
        assert_eq!(LocationTracker::from_config(&disabled).current_location().await, None);

        let enabled = LocationConfig { enabled: true, ..disabled };
        assert_eq!(
            LocationTracker::from_config(&enabled).current_location().await,
            Some(Coordinates::new(1.0, 2.0))
        );
    }
}
