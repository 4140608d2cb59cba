use std::io::Write;

use crate::constants::{REQUIRED_COLUMNS, TIME_COLUMN, VOLTAGE_COLUMN};
use crate::error::{LpfError, Result};

use super::loader::{CsvTable, DataSource, load_table};

/// Sampled voltage trace
///
/// Two parallel vectors of equal length. Time is expected to be
/// non-decreasing; that is checked by the simulator, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub time: Vec<f64>,
    pub voltage: Vec<f64>,
}

impl Signal {
    /// # Errors
    /// Returns `LpfError::LengthMismatch` if the vectors differ in length.
    pub fn new(time: Vec<f64>, voltage: Vec<f64>) -> Result<Self> {
        if time.len() != voltage.len() {
            return Err(LpfError::LengthMismatch {
                inputs: voltage.len(),
                times: time.len(),
            });
        }
        Ok(Self { time, voltage })
    }

    /// Extract the time and voltage columns from a loaded table.
    ///
    /// # Errors
    /// - `LpfError::Schema` if `Time (s)` or `Channel 1 (V)` is missing
    /// - `LpfError::Load` if a cell in either column is not a number
    pub fn from_table(table: &CsvTable) -> Result<Self> {
        let missing = table.missing_columns(&REQUIRED_COLUMNS);
        if !missing.is_empty() {
            return Err(LpfError::Schema { missing });
        }

        let time = parse_column(table, TIME_COLUMN)?;
        let voltage = parse_column(table, VOLTAGE_COLUMN)?;
        Self::new(time, voltage)
    }

    /// Load and validate in one step.
    pub fn load(source: &DataSource) -> Result<Self> {
        let table = load_table(source)?;
        let signal = Self::from_table(&table)?;
        log::info!(
            "Loaded {} samples spanning {:.6} s",
            signal.len(),
            signal.duration()
        );
        Ok(signal)
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Time between the first and last sample (0 for fewer than 2 samples).
    pub fn duration(&self) -> f64 {
        match (self.time.first(), self.time.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Time-ordered `[t, v]` pairs, the shape plotting code wants.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.time
            .iter()
            .zip(self.voltage.iter())
            .map(|(&t, &v)| [t, v])
            .collect()
    }

    /// Write the signal as a two-column CSV that [`Signal::load`] reads back.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record([TIME_COLUMN, VOLTAGE_COLUMN])?;
        for (t, v) in self.time.iter().zip(&self.voltage) {
            wtr.write_record(&[t.to_string(), v.to_string()])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn parse_column(table: &CsvTable, name: &str) -> Result<Vec<f64>> {
    let cells = table
        .column(name)
        .ok_or_else(|| LpfError::Schema {
            missing: vec![name.to_string()],
        })?;

    cells
        .enumerate()
        .map(|(row, cell)| {
            cell.parse::<f64>().map_err(|_| {
                LpfError::Load(format!(
                    "non-numeric value {:?} in column '{}' at row {}",
                    cell,
                    name,
                    row + 1
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> CsvTable {
        CsvTable::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_from_table_any_column_order() {
        let t = table("Channel 1 (V),extra,Time (s)\n2.0,x,0.0\n2.5,y,0.5\n");
        let signal = Signal::from_table(&t).unwrap();
        assert_eq!(signal.time, vec![0.0, 0.5]);
        assert_eq!(signal.voltage, vec![2.0, 2.5]);
        assert_eq!(signal.duration(), 0.5);
    }

    #[test]
    fn test_missing_time_column_is_schema_error() {
        let t = table("Channel 1 (V)\n1.0\n");
        match Signal::from_table(&t) {
            Err(LpfError::Schema { missing }) => assert_eq!(missing, vec!["Time (s)"]),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_cell_is_load_error() {
        let t = table("Time (s),Channel 1 (V)\n0.0,1.0\n0.1,oops\n");
        match Signal::from_table(&t) {
            Err(LpfError::Load(msg)) => assert!(msg.contains("row 2"), "{}", msg),
            other => panic!("expected load error, got {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_mismatched_lengths() {
        assert!(Signal::new(vec![0.0, 1.0], vec![1.0]).is_err());
    }

    #[test]
    fn test_written_csv_loads_back() {
        let signal = Signal::new(vec![0.0, 0.001, 0.002], vec![-1.5, 0.1, 3.0]).unwrap();
        let mut buf = Vec::new();
        signal.write_csv(&mut buf).unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("Time (s),Channel 1 (V)\n"));

        let source = DataSource::Bytes {
            name: "written.csv".to_string(),
            bytes: buf,
        };
        assert_eq!(Signal::load(&source).unwrap(), signal);
    }

    #[test]
    fn test_points() {
        let signal = Signal::new(vec![0.0, 1.0], vec![3.0, 4.0]).unwrap();
        assert_eq!(signal.points(), vec![[0.0, 3.0], [1.0, 4.0]]);
    }
}
