use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillResult {
    name: String,
    success: bool,
    duration_ms: u64,
    error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DrillReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub execution_time_ms: u64,
    pub log_file: Option<String>,
    pub drills: Vec<DrillResult>,
}

pub struct DrillRunner {
    results: Vec<DrillResult>,
}

impl DrillRunner {
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
        }
    }

    pub fn run<F>(&mut self, name: &str, drill: F)
    where
        F: FnOnce() -> anyhow::Result<()>,
    {
        log::info!("Starting drill: {}", name);
        println!("Running drill: {}", name);

        let start = std::time::Instant::now();
        let outcome = drill();
        let duration = start.elapsed();

        let result = match outcome {
            Ok(()) => {
                log::info!("Drill '{}' PASSED in {:?}", name, duration);
                println!("  ✓ PASSED");
                DrillResult {
                    name: name.to_string(),
                    success: true,
                    duration_ms: duration.as_millis() as u64,
                    error: None,
                }
            }
            Err(e) => {
                log::error!("Drill '{}' FAILED in {:?}: {:#}", name, duration, e);
                println!("  ✗ FAILED: {:#}", e);
                DrillResult {
                    name: name.to_string(),
                    success: false,
                    duration_ms: duration.as_millis() as u64,
                    error: Some(format!("{:#}", e)),
                }
            }
        };

        self.results.push(result);
    }

    pub fn report(&self, start_time: std::time::Instant, log_file: Option<String>) -> DrillReport {
        let passed = self.results.iter().filter(|r| r.success).count();

        DrillReport {
            total: self.results.len(),
            passed,
            failed: self.results.len() - passed,
            execution_time_ms: start_time.elapsed().as_millis() as u64,
            log_file,
            drills: self.results.clone(),
        }
    }
}
