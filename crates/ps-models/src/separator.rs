//! Three-phase separator vessel: liquid levels and compressible gas venting.
//!
//! Oil and water drain through their dump valves under Torricelli's law; the
//! gas cap vents through an orifice using the compressible-flow equation with
//! a choked/subcritical branch. Pressure follows from the ideal gas law on
//! the conserved gas mass and the shrinking/growing gas volume.

use ps_core::units::constants::G_MPS2;
use ps_core::units::{Area, Pressure, Volume, m2, m3, pa};
use ps_core::{CycleTime, clamp_percent, ensure_finite};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::model::CyclicModel;

/// Universal gas constant, J/(mol*K).
const GAS_CONSTANT: f64 = 8.314;
/// Vessel temperature, K (isothermal model).
const TEMPERATURE_K: f64 = 300.0;
/// Molar mass of the gas phase, kg/mol (approximate for natural gas).
const GAS_MOLAR_MASS: f64 = 0.029;
/// Specific heat ratio Cp/Cv.
const GAMMA: f64 = 1.4;

/// Critical pressure ratio below which the vent flow chokes (~0.528 for air).
fn critical_pressure_ratio() -> f64 {
    (2.0 / (GAMMA + 1.0)).powf(GAMMA / (GAMMA - 1.0))
}

/// Externally writable separator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeparatorConfig {
    /// Oil inflow, m³/s.
    pub q_in_oil_m3s: f64,
    /// Water inflow, m³/s.
    pub q_in_water_m3s: f64,
    /// Gas inflow at vessel pressure, m³/s.
    pub q_in_gas_m3s: f64,
    /// Oil dump valve opening, %.
    pub valve_oil_pct: f64,
    /// Water dump valve opening, %.
    pub valve_water_pct: f64,
    /// Gas vent valve opening, %.
    pub valve_gas_pct: f64,
}

impl Default for SeparatorConfig {
    fn default() -> Self {
        Self {
            q_in_oil_m3s: 0.05,
            q_in_water_m3s: 0.03,
            q_in_gas_m3s: 0.1,
            valve_oil_pct: 45.0,
            valve_water_pct: 35.0,
            valve_gas_pct: 25.0,
        }
    }
}

impl SeparatorConfig {
    pub fn validate(&self) -> ModelResult<()> {
        if self.q_in_oil_m3s < 0.0 || self.q_in_water_m3s < 0.0 || self.q_in_gas_m3s < 0.0 {
            return Err(ModelError::InvalidArg {
                what: "inflow rates must be non-negative",
            });
        }
        Ok(())
    }
}

/// Fixed vessel geometry and discharge parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SeparatorGeometry {
    /// Liquid surface area.
    pub area: Area,
    /// Total vessel volume.
    pub total_volume: Volume,
    /// Discharge coefficient shared by all outlets.
    pub cd: f64,
    /// Liquid dump valve throat area.
    pub a_valve_liquid: Area,
    /// Gas vent valve throat area.
    pub a_valve_gas: Area,
    /// Pressure downstream of the vent.
    pub ambient_pressure: Pressure,
}

impl Default for SeparatorGeometry {
    fn default() -> Self {
        Self {
            area: m2(10.0),
            total_volume: m3(50.0),
            cd: 0.6,
            a_valve_liquid: m2(0.01),
            a_valve_gas: m2(0.005),
            ambient_pressure: pa(101_325.0),
        }
    }
}

impl SeparatorGeometry {
    pub fn validate(&self) -> ModelResult<()> {
        if !(self.area.value > 0.0) || !(self.total_volume.value > 0.0) {
            return Err(ModelError::InvalidArg {
                what: "vessel area and volume must be positive",
            });
        }
        if !(self.cd > 0.0) {
            return Err(ModelError::InvalidArg {
                what: "discharge coefficient must be positive",
            });
        }
        if !(self.a_valve_liquid.value > 0.0) || !(self.a_valve_gas.value > 0.0) {
            return Err(ModelError::InvalidArg {
                what: "valve throat areas must be positive",
            });
        }
        if !(self.ambient_pressure.value > 0.0) {
            return Err(ModelError::InvalidArg {
                what: "ambient pressure must be positive",
            });
        }
        Ok(())
    }

    /// Maximum liquid column height, m.
    pub fn max_height_m(&self) -> f64 {
        self.total_volume.value / self.area.value
    }
}

/// Computed separator state.
#[derive(Debug, Clone, PartialEq)]
pub struct SeparatorState {
    /// Oil layer height, m.
    pub h_oil_m: f64,
    /// Water layer height, m.
    pub h_water_m: f64,
    /// Gas cap pressure, Pa, never below ambient.
    pub pressure_pa: f64,
}

/// Three-phase separator model.
#[derive(Debug, Clone)]
pub struct SeparatorModel {
    pub config: SeparatorConfig,
    geometry: SeparatorGeometry,
    state: SeparatorState,
    /// Conserved gas inventory, kg.
    gas_mass_kg: f64,
}

impl SeparatorModel {
    /// Create a separator at its steady startup state: 0.5 m of each liquid
    /// and a 1.5 bar gas cap, with gas mass back-computed from the ideal gas
    /// law.
    pub fn new(config: SeparatorConfig, geometry: SeparatorGeometry) -> ModelResult<Self> {
        config.validate()?;
        geometry.validate()?;

        let state = SeparatorState {
            h_oil_m: 0.5,
            h_water_m: 0.5,
            pressure_pa: 150_000.0,
        };

        let gas_volume = geometry.total_volume.value
            - geometry.area.value * (state.h_oil_m + state.h_water_m);
        if gas_volume <= 0.0 {
            return Err(ModelError::NonPhysical {
                what: "initial liquid inventory fills the vessel",
            });
        }
        let gas_mass_kg = ensure_finite(
            state.pressure_pa * gas_volume * GAS_MOLAR_MASS / (GAS_CONSTANT * TEMPERATURE_K),
            "initial gas mass",
        )?;

        Ok(Self {
            config,
            geometry,
            state,
            gas_mass_kg,
        })
    }

    pub fn state(&self) -> &SeparatorState {
        &self.state
    }

    pub fn geometry(&self) -> &SeparatorGeometry {
        &self.geometry
    }

    /// Gas inventory, kg.
    pub fn gas_mass_kg(&self) -> f64 {
        self.gas_mass_kg
    }

    /// Torricelli drain rate for a liquid column of height `h_m` through a
    /// dump valve at `valve_pct` opening, m³/s.
    fn liquid_outflow(&self, h_m: f64, valve_pct: f64) -> f64 {
        let coeff = clamp_percent(valve_pct) / 100.0;
        self.geometry.cd
            * self.geometry.a_valve_liquid.value
            * coeff
            * (2.0 * G_MPS2 * h_m.max(0.0)).sqrt()
    }

    /// Vent flow at the given cap pressure, m³/s referenced to vessel
    /// conditions. Chokes once the back-pressure ratio falls to the critical
    /// ratio; subcritical flow follows the isentropic orifice formula.
    fn gas_outflow(&self, pressure_pa: f64) -> f64 {
        let coeff = clamp_percent(self.config.valve_gas_pct) / 100.0;
        let p_ratio = self.geometry.ambient_pressure.value / pressure_pa;

        let specific = if p_ratio <= critical_pressure_ratio() {
            // Choked: sonic at the throat, independent of downstream pressure.
            GAMMA * pressure_pa / GAS_MOLAR_MASS
                * (2.0 / (GAMMA + 1.0)).powf((GAMMA + 1.0) / (GAMMA - 1.0))
        } else {
            2.0 * pressure_pa / GAS_MOLAR_MASS * (GAMMA / (GAMMA - 1.0))
                * (p_ratio.powf(2.0 / GAMMA) - p_ratio.powf((GAMMA + 1.0) / GAMMA))
        };

        self.geometry.cd * self.geometry.a_valve_gas.value * coeff * specific.max(0.0).sqrt()
    }
}

impl CyclicModel for SeparatorModel {
    fn update(&mut self, cycle: CycleTime) {
        let dt = cycle.as_secs_f64();
        let area = self.geometry.area.value;
        let max_height = self.geometry.max_height_m();

        // Liquid balances from the pre-step levels.
        let q_out_oil = self.liquid_outflow(self.state.h_oil_m, self.config.valve_oil_pct);
        let q_out_water = self.liquid_outflow(self.state.h_water_m, self.config.valve_water_pct);

        let mut h_oil = self.state.h_oil_m
            + (self.config.q_in_oil_m3s.max(0.0) - q_out_oil) / area * dt;
        let mut h_water = self.state.h_water_m
            + (self.config.q_in_water_m3s.max(0.0) - q_out_water) / area * dt;

        // Oil takes vertical priority for the remaining headspace.
        h_oil = h_oil.clamp(0.0, max_height);
        h_water = h_water.clamp(0.0, max_height - h_oil);

        // Liquids may clamp to a brim-full vessel; the gas cap never vanishes.
        let gas_volume = (self.geometry.total_volume.value - area * (h_oil + h_water))
            .max(self.geometry.total_volume.value * 1e-6);

        // Gas mass balance: volumetric inflow converted to mass at vessel
        // density, vent outflow converted via molar mass.
        let q_out_gas = self.gas_outflow(self.state.pressure_pa);
        let q_in_gas_mass = self.config.q_in_gas_m3s.max(0.0) * self.state.pressure_pa
            * GAS_MOLAR_MASS
            / (GAS_CONSTANT * TEMPERATURE_K);
        self.gas_mass_kg += (q_in_gas_mass - q_out_gas * GAS_MOLAR_MASS) * dt;

        let pressure = self.gas_mass_kg * GAS_CONSTANT * TEMPERATURE_K
            / (gas_volume * GAS_MOLAR_MASS);

        self.state = SeparatorState {
            h_oil_m: h_oil,
            h_water_m: h_water,
            pressure_pa: pressure.max(self.geometry.ambient_pressure.value),
        };
    }
}
