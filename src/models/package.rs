//! Package type.

use std::sync::Arc;

use super::{Cost, LocationId, PackageId};

/// A package to be delivered to its target location.
///
/// `location` is `None` while the package is carried by a vehicle.
///
/// # Examples
///
/// ```
/// use u_transport::models::{Cost, LocationId, Package, PackageId};
///
/// let p = Package::new(PackageId::new(0), "package-1", Some(LocationId::new(1)), LocationId::new(2))
///     .with_size(Cost::new(2));
/// assert!(!p.is_delivered());
/// assert_eq!(p.size(), Cost::new(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    id: PackageId,
    name: Arc<str>,
    location: Option<LocationId>,
    target: LocationId,
    size: Cost,
}

impl Package {
    /// Creates a package of size 1.
    pub fn new(
        id: PackageId,
        name: impl Into<Arc<str>>,
        location: Option<LocationId>,
        target: LocationId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            target,
            size: Cost::ONE,
        }
    }

    /// Sets the package size.
    pub fn with_size(mut self, size: Cost) -> Self {
        self.size = size;
        self
    }

    /// Places the package at `location`, or marks it carried with `None`.
    pub fn with_location(mut self, location: Option<LocationId>) -> Self {
        self.location = location;
        self
    }

    /// Package id.
    pub fn id(&self) -> PackageId {
        self.id
    }

    /// Package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the name.
    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Current location, `None` while carried.
    pub fn location(&self) -> Option<LocationId> {
        self.location
    }

    /// Delivery target.
    pub fn target(&self) -> LocationId {
        self.target
    }

    /// Size taken from a vehicle's capacity.
    pub fn size(&self) -> Cost {
        self.size
    }

    /// Returns `true` if the package lies at its target.
    pub fn is_delivered(&self) -> bool {
        self.location == Some(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_delivery() {
        let p = Package::new(PackageId::new(0), "p", Some(LocationId::new(0)), LocationId::new(1));
        assert!(!p.is_delivered());
        assert_eq!(p.size(), Cost::ONE);

        let carried = p.clone().with_location(None);
        assert!(carried.location().is_none());
        assert!(!carried.is_delivered());

        let delivered = p.with_location(Some(LocationId::new(1)));
        assert!(delivered.is_delivered());
    }

    #[test]
    fn test_already_delivered() {
        let p = Package::new(PackageId::new(0), "p", Some(LocationId::new(4)), LocationId::new(4));
        assert!(p.is_delivered());
    }
}
