use crate::models::{Unit, UnitStatus, UnitType};

/// The fixed set of consoles the shop rents out
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    units: Vec<Unit>,
}

impl UnitRegistry {
    pub fn new(units: Vec<Unit>) -> Self {
        Self { units }
    }

    /// The shop floor as it opens: four consoles ready, one in the repair bay.
    pub fn seeded() -> Self {
        Self::new(vec![
            Unit::new("1", "Console 01", UnitType::Ps5, 15.0, UnitStatus::Available),
            Unit::new("2", "Console 02", UnitType::Ps5, 15.0, UnitStatus::Available),
            Unit::new("3", "Console 03", UnitType::Ps5Digital, 12.0, UnitStatus::Available),
            Unit::new("4", "Console 04", UnitType::Ps4Pro, 8.0, UnitStatus::Available),
            Unit::new("5", "Console 05", UnitType::Ps5, 15.0, UnitStatus::Maintenance),
        ])
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn get(&self, unit_id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == unit_id)
    }

    fn get_mut(&mut self, unit_id: &str) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == unit_id)
    }

    /// Status lookup that treats an unknown id as available.
    pub fn status_of(&self, unit_id: &str) -> UnitStatus {
        self.get(unit_id).map(|u| u.status).unwrap_or_default()
    }

    /// Flip a unit to rented by `booking_id`. Returns false for unknown units.
    pub fn mark_rented(&mut self, unit_id: &str, booking_id: &str) -> bool {
        match self.get_mut(unit_id) {
            Some(unit) => {
                unit.status = UnitStatus::Rented;
                unit.current_booking_id = Some(booking_id.to_string());
                true
            }
            None => false,
        }
    }

    /// Hand a unit back, but only if `booking_id` is the booking holding it.
    pub fn release(&mut self, unit_id: &str, booking_id: &str) -> bool {
        match self.get_mut(unit_id) {
            Some(unit) if unit.current_booking_id.as_deref() == Some(booking_id) => {
                unit.status = UnitStatus::Available;
                unit.current_booking_id = None;
                true
            }
            _ => false,
        }
    }

    pub fn count_with_status(&self, status: UnitStatus) -> usize {
        self.units.iter().filter(|u| u.status == status).count()
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_registry() {
        let registry = UnitRegistry::seeded();
        assert_eq!(registry.units().len(), 5);
        assert_eq!(registry.count_with_status(UnitStatus::Available), 4);
        assert_eq!(registry.status_of("5"), UnitStatus::Maintenance);
        assert_eq!(registry.get("3").unwrap().unit_type, UnitType::Ps5Digital);
    }

    #[test]
    fn test_unknown_unit_reads_as_available() {
        let registry = UnitRegistry::seeded();
        assert_eq!(registry.status_of("does-not-exist"), UnitStatus::Available);
    }

    #[test]
    fn test_release_requires_matching_booking() {
        let mut registry = UnitRegistry::seeded();
        assert!(registry.mark_rented("2", "first"));

        assert!(!registry.release("2", "someone-else"));
        assert_eq!(registry.status_of("2"), UnitStatus::Rented);

        assert!(registry.release("2", "first"));
        let unit = registry.get("2").unwrap();
        assert_eq!(unit.status, UnitStatus::Available);
        assert!(unit.current_booking_id.is_none());
    }
}
