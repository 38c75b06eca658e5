// The fixed list of monitored places.
//
// A catalog is validated once when it is built: every capacity is positive and
// every id is unique. Everything downstream relies on that.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::error::{ConfigurationError, Result};
use super::model::{Headcount, Location, LocationCategory};

#[derive(Debug, Clone, PartialEq)]
pub struct LocationCatalog {
    locations: Vec<Location>,
}

impl LocationCatalog {
    pub fn new(locations: Vec<Location>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(locations.len());
        for location in &locations {
            if location.capacity == 0 {
                return Err(ConfigurationError::NonPositiveCapacity(location.id.clone()));
            }
            if !seen.insert(location.id.as_str()) {
                return Err(ConfigurationError::DuplicateLocationId(location.id.clone()));
            }
        }
        Ok(Self { locations })
    }

    /// Load a JSON array of locations.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let locations: Vec<Location> = serde_json::from_str(&content)?;
        let catalog = Self::new(locations)?;
        log::info!(
            "Loaded {} locations from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    /// The fourteen monitored places of the riverside festival grounds.
    pub fn builtin() -> Self {
        use LocationCategory::{EntryGate, FoodStall, Ghat, HealthCenter};

        let entries: [(&str, &str, LocationCategory, f32, f32, Headcount); 14] = [
            ("ghat-1", "Ram Ghat", Ghat, 45.0, 60.0, 5000),
            ("ghat-2", "Triveni Ghat", Ghat, 55.0, 65.0, 8000),
            ("ghat-3", "Mangal Nath Ghat", Ghat, 35.0, 70.0, 3000),
            ("ghat-4", "Gau Ghat", Ghat, 65.0, 55.0, 4000),
            ("gate-1", "Main Entry Gate", EntryGate, 20.0, 30.0, 10000),
            ("gate-2", "North Gate", EntryGate, 50.0, 15.0, 6000),
            ("gate-3", "South Gate", EntryGate, 70.0, 85.0, 7000),
            ("gate-4", "East Gate", EntryGate, 90.0, 50.0, 5000),
            ("food-1", "Central Food Court", FoodStall, 60.0, 45.0, 2000),
            ("food-2", "Riverside Stalls", FoodStall, 40.0, 55.0, 1500),
            ("food-3", "Temple Food Area", FoodStall, 75.0, 40.0, 1000),
            ("health-1", "Main Medical Center", HealthCenter, 30.0, 40.0, 500),
            ("health-2", "Emergency Station", HealthCenter, 80.0, 30.0, 300),
            ("health-3", "First Aid Post", HealthCenter, 25.0, 75.0, 200),
        ];

        let locations = entries
            .into_iter()
            .map(|(id, name, category, x, y, capacity)| Location {
                id: id.to_string(),
                name: name.to_string(),
                category,
                x,
                y,
                capacity,
            })
            .collect();
        Self { locations }
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn get(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|location| location.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn total_capacity(&self) -> u64 {
        self.locations
            .iter()
            .map(|location| u64::from(location.capacity))
            .sum()
    }
}

impl<'a> IntoIterator for &'a LocationCatalog {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn location(id: &str, capacity: Headcount) -> Location {
        Location {
            id: id.to_string(),
            name: format!("Place {id}"),
            category: LocationCategory::FoodStall,
            x: 0.0,
            y: 0.0,
            capacity,
        }
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let builtin = LocationCatalog::builtin();
        assert_eq!(builtin.len(), 14);
        let revalidated = LocationCatalog::new(builtin.locations().to_vec()).unwrap();
        assert_eq!(revalidated, builtin);
        assert_eq!(builtin.total_capacity(), 53_500);
        assert_eq!(builtin.get("ghat-2").unwrap().name, "Triveni Ghat");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = LocationCatalog::new(vec![location("a", 10), location("b", 0)]).unwrap_err();
        assert!(matches!(err, ConfigurationError::NonPositiveCapacity(ref id) if id == "b"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = LocationCatalog::new(vec![location("a", 10), location("a", 20)]).unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateLocationId(ref id) if id == "a"));
    }

    #[test]
    fn test_load_from_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"[{{"id":"ghat-9","name":"Night Ghat","type":"ghat","x":1,"y":2,"capacity":700}}]"#
        )
        .unwrap();

        let catalog = LocationCatalog::from_json_file(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.locations()[0].category, LocationCategory::Ghat);
    }

    #[test]
    fn test_negative_capacity_in_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        fs::write(
            &path,
            r#"[{"id":"x","name":"X","type":"ghat","x":0,"y":0,"capacity":-5}]"#,
        )
        .unwrap();

        let err = LocationCatalog::from_json_file(&path).unwrap_err();
        assert!(matches!(err, ConfigurationError::SerdeError(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = LocationCatalog::from_json_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigurationError::IoError(_)));
    }
}
