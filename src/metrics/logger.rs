use super::analyzer::SweepPoint;
use anyhow::Result;
use csv::Writer;
use std::fs::File;
use std::path::Path;

pub struct ResultLogger {
    writer: Writer<File>,
}

impl ResultLogger {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let writer = Writer::from_path(path)?;
        Ok(Self { writer })
    }

    pub fn log_batch(&mut self, points: &[SweepPoint]) -> Result<()> {
        for point in points {
            self.writer.serialize(point)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let path = std::env::temp_dir().join(format!("portmux-log-{}.csv", std::process::id()));
        let point = SweepPoint {
            axis: "horizon".into(),
            value: 100.0,
            replications: 3,
            mean_handled: 900.0,
            mean_blocked: 0.0,
            mean_loss_ratio: Some(0.0),
            mean_makespan: Some(100.2),
            mean_wait_time: None,
            mean_service_time: Some(0.08),
        };

        let mut logger = ResultLogger::new(&path).unwrap();
        logger.log_batch(&[point.clone(), point]).unwrap();
        drop(logger);

        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("axis,value,replications,mean_handled"));
        let fields: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(fields.len(), 9);
        assert_eq!(fields[0], "horizon");
        assert_eq!(fields[2], "3");
        assert_eq!(fields[7], "");
    }
}
