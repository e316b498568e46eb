use std::fs::File;
use std::io;
use std::path::Path;

use bopm_core::Lattice;

/// One grid cell: `price(probability)`, both to four decimal places.
fn cell(price: f64, probability: f64) -> String {
    format!("{price:.4}({probability:.4})")
}

/// Write the lattice as a grid: row `j` holds the nodes with `j` down-moves,
/// column `i` is step `i`. Cells above the diagonal (`j > i`) stay blank.
pub fn write_lattice_grid<W: io::Write>(lattice: &Lattice, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    let steps = lattice.steps();

    for j in 0..=steps {
        let row: Vec<String> = (0..=steps)
            .map(|i| {
                lattice
                    .node(i, j)
                    .map(|node| cell(node.price, node.probability))
                    .unwrap_or_default()
            })
            .collect();
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_lattice_grid(lattice: &Lattice, path: &Path) -> Result<(), csv::Error> {
    let file = File::create(path)?;
    write_lattice_grid(lattice, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bopm_core::lattice::{build_lattice, ModelParameters, MoveSpec};

    fn scenario_lattice(maturity: f64) -> Lattice {
        build_lattice(&ModelParameters {
            initial_price: 10.0,
            moves: MoveSpec::symmetric_from_price(10.0, 11.0),
            probability_up: 0.5,
            frequency: 3.0,
            maturity,
        })
        .unwrap()
    }

    fn render(lattice: &Lattice) -> String {
        let mut buf = Vec::new();
        write_lattice_grid(lattice, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_grid_layout() {
        let text = render(&scenario_lattice(1.0));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "10.0000(1.0000),11.0000(0.5000),12.1000(0.2500),13.3100(0.1250)"
        );
        assert_eq!(lines[1], ",9.0000(0.5000),9.9000(0.5000),10.8900(0.3750)");
        assert_eq!(lines[3], ",,,7.2900(0.1250)");
    }

    #[test]
    fn test_single_node_grid() {
        let text = render(&scenario_lattice(0.0));
        assert_eq!(text, "10.0000(1.0000)\n");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bopm_output.csv");
        export_lattice_grid(&scenario_lattice(1.0), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render(&scenario_lattice(1.0)));
        assert_eq!(written.lines().count(), 4);
    }
}
