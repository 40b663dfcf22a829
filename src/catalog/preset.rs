// Facility Sim - Preset catalogs
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Ready-made plant catalogs.
//!
//! [`machine_shop`] models a small machining workshop with two lathes and a
//! milling machine. Motor temperatures and vibrations follow the power draw of
//! their motor; spindle bearings follow the main drive.

use super::{Catalog, ComponentBinding, ControllerParameterSettings, Distribution, FacilitySettings};
use crate::keys::{ComponentId, ComponentKey, ControllerParameterType, FacilityId};

use ControllerParameterType::{PowerConsumption, Temperature, Vibration};

/// Lathe CS6150.
pub const LATHE_CS6150: FacilityId = FacilityId(1001);
/// Lathe C61100.
pub const LATHE_C61100: FacilityId = FacilityId(1002);
/// Universal milling machine X6232Cx16.
pub const MILL_X6232: FacilityId = FacilityId(1003);

/// Speed change used for temperatures, which move slower than power draw.
const TEMPERATURE_SPEED_CHANGE: f64 = 0.3;

/// Two lathes and a milling machine with 13 components in total.
pub fn machine_shop() -> Catalog {
    let mut builder = PresetBuilder::default();

    // CS6150: main motor, rapid traverse motor, fast feed motor, coolant pump, spindle bearing
    builder.motor(LATHE_CS6150, 10011, (7.4, 1.0), 8.0);
    builder.motor(LATHE_CS6150, 10012, (0.25, 0.05), 0.3);
    builder.motor(LATHE_CS6150, 10013, (0.25, 0.05), 0.3);
    builder.pump(LATHE_CS6150, 10014, (0.05, 0.03), 0.1, (70.0, 5.0), 90.0);
    builder.bearing(LATHE_CS6150, 10015, 10011);

    // C61100: spindle motor, rapid traverse motor, coolant pump, spindle bearing
    builder.motor(LATHE_C61100, 10021, (22.0, 5.0), 25.0);
    builder.motor(LATHE_C61100, 10022, (1.5, 0.5), 1.7);
    builder.motor(LATHE_C61100, 10023, (0.15, 0.05), 0.18);
    builder.bearing(LATHE_C61100, 10024, 10023);

    // X6232Cx16: vertical spindle motor, horizontal spindle motor, coolant pump, spindle bearing
    builder.motor(MILL_X6232, 10031, (3.0, 1.0), 4.0);
    builder.motor(MILL_X6232, 10032, (5.5, 1.0), 7.0);
    builder.motor(MILL_X6232, 10033, (0.125, 0.05), 0.15);
    builder.bearing(MILL_X6232, 10034, 10031);

    builder.facility(
        LATHE_CS6150,
        FacilitySettings::new(0.8, Distribution::new(580.0, 30.0), 240.0).with_location(1, 1),
    );
    builder.facility(
        LATHE_C61100,
        FacilitySettings::new(0.7, Distribution::new(420.0, 30.0), 300.0).with_location(1, 2),
    );
    builder.facility(
        MILL_X6232,
        FacilitySettings::new(0.6, Distribution::new(320.0, 30.0), 300.0).with_location(2, 3),
    );

    builder.catalog
}

#[derive(Default)]
struct PresetBuilder {
    catalog: Catalog,
    bindings: Vec<(FacilityId, ComponentBinding)>,
}

impl PresetBuilder {
    /// A motor: power draw with temperature and vibration coupled to it.
    fn motor(&mut self, facility: FacilityId, component: u32, power: (f64, f64), bound: f64) {
        let key = self.component(facility, component);
        self.insert(
            key,
            PowerConsumption,
            ControllerParameterSettings::for_parameter(PowerConsumption)
                .with_value_distribution(power.0, power.1)
                .with_upper_bound(bound),
        );
        self.coupled_thermals(key, key, None);
    }

    /// A pump with its own temperature profile.
    fn pump(
        &mut self,
        facility: FacilityId,
        component: u32,
        power: (f64, f64),
        bound: f64,
        temperature: (f64, f64),
        temperature_bound: f64,
    ) {
        let key = self.component(facility, component);
        self.insert(
            key,
            PowerConsumption,
            ControllerParameterSettings::for_parameter(PowerConsumption)
                .with_value_distribution(power.0, power.1)
                .with_upper_bound(bound),
        );
        self.coupled_thermals(key, key, Some((temperature, temperature_bound)));
    }

    /// A bearing has no power draw; it follows the drive it carries.
    fn bearing(&mut self, facility: FacilityId, component: u32, drive: u32) {
        let key = self.component(facility, component);
        let drive = ComponentKey::new(facility, ComponentId(drive));
        self.coupled_thermals(key, drive, None);
    }

    fn coupled_thermals(
        &mut self,
        key: ComponentKey,
        drive: ComponentKey,
        temperature: Option<((f64, f64), f64)>,
    ) {
        let power = drive.parameter(PowerConsumption);

        let mut temp = ControllerParameterSettings::for_parameter(Temperature)
            .with_speed_change(TEMPERATURE_SPEED_CHANGE)
            .with_dependence(power);
        if let Some(((mean, std_dev), bound)) = temperature {
            temp = temp.with_value_distribution(mean, std_dev).with_upper_bound(bound);
        }
        self.insert(key, Temperature, temp);

        self.insert(
            key,
            Vibration,
            ControllerParameterSettings::for_parameter(Vibration).with_dependence(power),
        );
    }

    fn component(&mut self, facility: FacilityId, component: u32) -> ComponentKey {
        let key = ComponentKey::new(facility, ComponentId(component));
        self.catalog.insert_default_statistics(key, 1.0);
        self.bindings
            .push((facility, ComponentBinding::with_all_statistics(key.component)));
        key
    }

    fn insert(
        &mut self,
        key: ComponentKey,
        parameter: ControllerParameterType,
        settings: ControllerParameterSettings,
    ) {
        self.catalog.parameters.insert(key.parameter(parameter), settings);
    }

    fn facility(&mut self, facility: FacilityId, mut settings: FacilitySettings) {
        for (_, binding) in self.bindings.iter().filter(|(f, _)| *f == facility) {
            settings.components.push(binding.clone());
        }
        self.catalog.facilities.insert(facility, settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::ParamKey;

    #[test]
    fn test_machine_shop_is_valid() {
        let catalog = machine_shop();
        let structure = catalog.validate().unwrap();

        assert_eq!(catalog.facilities.len(), 3);
        assert_eq!(structure.components(LATHE_CS6150).len(), 5);
        assert_eq!(structure.components(LATHE_C61100).len(), 4);
        assert_eq!(structure.components(MILL_X6232).len(), 4);
        assert_eq!(catalog.statistics.len(), 13 * 5);
        // 10 powered components with 3 parameters, 3 bearings with 2
        assert_eq!(catalog.parameters.len(), 10 * 3 + 3 * 2);
    }

    #[test]
    fn test_bearing_has_no_power() {
        let catalog = machine_shop();
        let bearing = ComponentKey::new(LATHE_CS6150, ComponentId(10015));
        assert!(!catalog.parameters.contains_key(&bearing.parameter(PowerConsumption)));

        let temp = &catalog.parameters[&bearing.parameter(Temperature)];
        let dependence = temp.dependence.unwrap();
        assert_eq!(
            dependence.parameter,
            ParamKey::new(LATHE_CS6150, ComponentId(10011), PowerConsumption)
        );
        assert_eq!(temp.speed_change, TEMPERATURE_SPEED_CHANGE);
    }

    #[test]
    fn test_pump_temperature_override() {
        let catalog = machine_shop();
        let pump = ComponentKey::new(LATHE_CS6150, ComponentId(10014));
        let temp = &catalog.parameters[&pump.parameter(Temperature)];
        assert_eq!(temp.value_distribution, Distribution::new(70.0, 5.0));
        assert_eq!(temp.normal_value_upper_bound, 90.0);
    }

    #[test]
    fn test_facility_settings() {
        let catalog = machine_shop();
        let mill = &catalog.facilities[&MILL_X6232];
        assert_eq!(mill.probability_running, 0.6);
        assert_eq!(mill.time_repair, 300.0);
        assert_eq!(mill.location.unwrap().department, 2);
    }
}
