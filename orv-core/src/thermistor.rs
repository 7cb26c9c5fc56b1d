//! Thermistor conversion pipeline
//!
//! Converts raw ADC counts from a 10K B3950 NTC thermistor into degrees
//! Celsius. The thermistor sits in a voltage divider: 3.3V through the
//! thermistor, into the ADC pin, through a 10K pulldown to ground. See the
//! board schematic for details.
//!
//! The pipeline is two pure stages: counts -> resistance (circuit math),
//! then resistance -> temperature (nearest-value lookup against a bundled
//! table). No interpolation between table entries is performed; the table is
//! dense enough that nearest-value is within the sensor's own tolerance.

use crate::error::{OrvError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Value of the divider pulldown resistor, in ohms.
pub const PULLDOWN_OHMS: f64 = 10_000.0;

/// Full-scale count of the 12-bit ADC.
pub const U12_MAX_COUNT: u16 = 4096;

/// Bundled temperature-to-resistance table for the barrel-style 10K B3950
/// NTC thermistors used in the reference build.
const NTC_LOOKUP_JSON: &str =
    include_str!("../assets/b3950_10k_ntc_temperature_to_resistance.json");

/// Convert ADC counts into the thermistor's resistance in ohms.
///
/// Pure divider math; no clamping is applied. Out-of-circuit inputs can
/// produce negative or extreme resistances, and those propagate to the
/// lookup stage rather than being silently corrected. A count of zero has
/// no defined resistance and is an error.
pub fn counts_to_resistance(
    adc_counts: u16,
    pulldown_ohms: f64,
    max_adc_count: u16,
) -> Result<f64> {
    if adc_counts == 0 {
        return Err(OrvError::ZeroAdcCount);
    }

    Ok(pulldown_ohms * (f64::from(max_adc_count) / f64::from(adc_counts)) - pulldown_ohms)
}

/// Resistance-to-temperature mapping, ohms to degrees Celsius.
///
/// Built by inverting a temperature-to-resistance source table whose
/// resistances are given in kilo-ohms. Loaded once and immutable afterward.
#[derive(Debug, Clone)]
pub struct ResistanceTemperatureTable {
    /// Entries sorted ascending by resistance.
    entries: Vec<(f64, f64)>,
}

impl ResistanceTemperatureTable {
    /// Parse a source table from its JSON form.
    ///
    /// Keys are temperature strings in Celsius, values are resistance
    /// strings in kilo-ohms; resistances are multiplied by 1000 here to
    /// normalize to ohms. Should two source entries collapse to the same
    /// resistance after conversion, the one seen last wins (the source
    /// format implicitly allows this).
    pub fn from_json(source: &str) -> Result<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(source)
            .map_err(|e| OrvError::MalformedTable(e.to_string()))?;

        let mut entries: Vec<(f64, f64)> = Vec::with_capacity(raw.len());
        for (temperature_str, resistance_str) in &raw {
            let temperature: f64 = temperature_str.parse().map_err(|_| {
                OrvError::MalformedTable(format!("bad temperature key: {temperature_str}"))
            })?;
            let resistance_ohms: f64 = resistance_str
                .parse::<f64>()
                .map_err(|_| {
                    OrvError::MalformedTable(format!("bad resistance value: {resistance_str}"))
                })?
                * 1_000.0;

            match entries.iter_mut().find(|(r, _)| *r == resistance_ohms) {
                Some(entry) => entry.1 = temperature,
                None => entries.push((resistance_ohms, temperature)),
            }
        }

        entries.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(Self { entries })
    }

    /// Load a source table from a file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    /// The table bundled with this crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(NTC_LOOKUP_JSON)
    }

    /// Resolve a resistance to a temperature by nearest-value lookup.
    ///
    /// Linear scan minimizing absolute distance to the input. An exact tie
    /// between two keys resolves to the lower resistance key, which is
    /// guaranteed by the ascending sort plus `min_by` keeping the first
    /// minimum. Returns `None` only for an empty table.
    pub fn resolve(&self, resistance: f64) -> Option<f64> {
        self.entries
            .iter()
            .min_by(|a, b| (a.0 - resistance).abs().total_cmp(&(b.0 - resistance).abs()))
            .map(|&(_, temperature)| temperature)
    }

    /// Number of distinct resistance keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The full ADC-counts-to-temperature pipeline with its circuit constants.
#[derive(Debug, Clone)]
pub struct TemperatureConverter {
    table: ResistanceTemperatureTable,
    pulldown_ohms: f64,
    max_adc_count: u16,
}

impl TemperatureConverter {
    pub fn new(table: ResistanceTemperatureTable, pulldown_ohms: f64, max_adc_count: u16) -> Self {
        Self {
            table,
            pulldown_ohms,
            max_adc_count,
        }
    }

    /// Converter for the reference circuit: bundled NTC table, 10K pulldown,
    /// 12-bit ADC.
    pub fn for_reference_circuit() -> Result<Self> {
        Ok(Self::new(
            ResistanceTemperatureTable::bundled()?,
            PULLDOWN_OHMS,
            U12_MAX_COUNT,
        ))
    }

    /// Convert a raw sample to degrees Celsius.
    ///
    /// Any failure in either stage becomes `None`, meaning "sensor read
    /// failed, do not use this sample". Callers must not treat `None` as
    /// zero degrees.
    pub fn convert(&self, adc_counts: u16) -> Option<f64> {
        let resistance =
            counts_to_resistance(adc_counts, self.pulldown_ohms, self.max_adc_count).ok()?;
        self.table.resolve(resistance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_table() -> ResistanceTemperatureTable {
        // 0C:50kOhm, 25C:10kOhm, 100C:1kOhm
        ResistanceTemperatureTable::from_json(r#"{"0":"50","25":"10","100":"1"}"#).unwrap()
    }

    #[test]
    fn test_counts_to_resistance_midpoint() {
        // Half-scale counts on a 10K divider read exactly the pulldown value.
        let r = counts_to_resistance(2048, 10_000.0, 4096).unwrap();
        assert_eq!(r, 10_000.0);
    }

    #[test]
    fn test_counts_to_resistance_zero_counts() {
        assert!(matches!(
            counts_to_resistance(0, 10_000.0, 4096),
            Err(OrvError::ZeroAdcCount)
        ));
    }

    #[test]
    fn test_counts_to_resistance_no_clamping() {
        // Full-scale counts give zero resistance; beyond-full-scale goes
        // negative and must not be corrected here.
        let r = counts_to_resistance(4096, 10_000.0, 4096).unwrap();
        assert_eq!(r, 0.0);

        let r = counts_to_resistance(8192, 10_000.0, 4096).unwrap();
        assert!(r < 0.0);
    }

    #[test]
    fn test_table_unit_conversion() {
        let table = test_table();
        assert_eq!(table.len(), 3);
        // Source kilo-ohms become ohms.
        assert_eq!(table.resolve(50_000.0), Some(0.0));
    }

    #[test]
    fn test_nearest_value_resolution() {
        let table = test_table();
        assert_eq!(table.resolve(10_000.0), Some(25.0));
        assert_eq!(table.resolve(10_001.0), Some(25.0));
        // 30000 is 20000 from the 10K key and 20000 from the 50K key; the
        // tie resolves to the lower resistance key.
        assert_eq!(table.resolve(30_000.0), Some(25.0));
        assert_eq!(table.resolve(30_001.0), Some(0.0));
    }

    #[test]
    fn test_exact_tie_resolves_to_lowest_key() {
        let table = ResistanceTemperatureTable::from_json(r#"{"10":"1","20":"3"}"#).unwrap();
        // 2000 Ohm is equidistant from 1000 and 3000; lowest key wins.
        assert_eq!(table.resolve(2_000.0), Some(10.0));
    }

    #[test]
    fn test_malformed_table_bad_json() {
        assert!(matches!(
            ResistanceTemperatureTable::from_json("[1, 2, 3]"),
            Err(OrvError::MalformedTable(_))
        ));
        assert!(matches!(
            ResistanceTemperatureTable::from_json("not json"),
            Err(OrvError::MalformedTable(_))
        ));
    }

    #[test]
    fn test_malformed_table_non_numeric_entries() {
        assert!(matches!(
            ResistanceTemperatureTable::from_json(r#"{"cold":"50"}"#),
            Err(OrvError::MalformedTable(_))
        ));
        assert!(matches!(
            ResistanceTemperatureTable::from_json(r#"{"0":"fifty"}"#),
            Err(OrvError::MalformedTable(_))
        ));
    }

    #[test]
    fn test_duplicate_resistance_last_write_wins() {
        let table = ResistanceTemperatureTable::from_json(r#"{"25":"10","26":"10"}"#).unwrap();
        assert_eq!(table.len(), 1);
        // Either source entry is acceptable; the surviving one must be one
        // of the two temperatures.
        let resolved = table.resolve(10_000.0).unwrap();
        assert!(resolved == 25.0 || resolved == 26.0);
    }

    #[test]
    fn test_from_path() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"0":"50","25":"10"}}"#).unwrap();

        let table = ResistanceTemperatureTable::from_path(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(9_000.0), Some(25.0));
    }

    #[test]
    fn test_bundled_table_loads() {
        let table = ResistanceTemperatureTable::bundled().unwrap();
        assert!(!table.is_empty());
        // The reference thermistor is 10K at 25C.
        assert_eq!(table.resolve(10_000.0), Some(25.0));
    }

    #[test]
    fn test_converter_zero_counts_is_no_reading() {
        let converter = TemperatureConverter::for_reference_circuit().unwrap();
        assert_eq!(converter.convert(0), None);
    }

    #[test]
    fn test_converter_midpoint_reads_room_temperature() {
        let converter = TemperatureConverter::for_reference_circuit().unwrap();
        // Half-scale counts -> 10 kOhm -> 25C on the bundled table.
        assert_eq!(converter.convert(2048), Some(25.0));
    }

    #[test]
    fn test_converter_with_custom_table() {
        let converter = TemperatureConverter::new(test_table(), 10_000.0, 4096);
        assert_eq!(converter.convert(2048), Some(25.0));
        // Near-zero counts give a huge resistance, nearest to the 50K key.
        assert_eq!(converter.convert(1), Some(0.0));
    }

    #[test]
    fn test_converter_empty_table_is_no_reading() {
        let table = ResistanceTemperatureTable::from_json("{}").unwrap();
        let converter = TemperatureConverter::new(table, 10_000.0, 4096);
        assert_eq!(converter.convert(2048), None);
    }
}
