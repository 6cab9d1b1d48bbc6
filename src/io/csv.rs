use std::io::{self, Write};
use std::path::Path;

use crate::sim::Trajectory;

/// Write trajectory data to CSV format.
///
/// Columns: t, x, y, vx, vy. Values use the shortest representation that
/// parses back to the same `f64`.
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &Trajectory) -> io::Result<()> {
    writeln!(writer, "t,x,y,vx,vy")?;

    for (t, s) in trajectory.iter() {
        writeln!(
            writer,
            "{},{},{},{},{}",
            t, s.pos.x, s.pos.y, s.vel.x, s.vel.y,
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: impl AsRef<Path>, trajectory: &Trajectory) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_trajectory(&mut file, trajectory)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::State;

    fn two_samples() -> Trajectory {
        let mut traj = Trajectory::default();
        traj.push(0.0, State::new(0.0, 10.0, 68.94, 12.16));
        traj.push(0.02, State::new(1.38, 10.24, 68.9, 12.1));
        traj
    }

    #[test]
    fn csv_output_has_header_and_rows() {
        let mut buf = Vec::new();
        write_trajectory(&mut buf, &two_samples()).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "t,x,y,vx,vy");
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert_eq!(lines[1], "0,0,10,68.94,12.16");
        assert!(lines[2].starts_with("0.02,1.38,"));
    }

    #[test]
    fn values_survive_a_text_round_trip() {
        let mut traj = Trajectory::default();
        let s = State::new(1.0 / 3.0, 1e-7 + 10.0, 68.123456789012345, -1.0e-9);
        traj.push(0.1 + 0.2, s);
        let mut buf = Vec::new();
        write_trajectory(&mut buf, &traj).unwrap();

        let output = String::from_utf8(buf).unwrap();
        let row: Vec<f64> = output.lines().nth(1).unwrap().split(',').map(|v| v.parse().unwrap()).collect();
        assert_eq!(row, vec![0.1 + 0.2, s.pos.x, s.pos.y, s.vel.x, s.vel.y]);
    }

    #[test]
    fn file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");
        write_trajectory_file(&path, &two_samples()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
