//! PASS/FAIL lines and the final summary.

use crate::fixture::Fixture;
use crate::runner::RunResult;

#[derive(Debug, Default)]
pub struct Reporter {
    passed: usize,
    failed: usize,
}

impl Reporter {
    pub fn record(&mut self, fixture: &Fixture, result: &RunResult) {
        let label = format!("[{}/{}] {}", fixture.service, fixture.id, fixture.description);
        if result.passed() {
            self.passed += 1;
            println!("PASS  {label}");
            return;
        }
        self.failed += 1;
        println!("FAIL  {label}");
        println!(
            "        {} {}",
            fixture.request.method, fixture.request.path
        );
        if let Some(err) = &result.error {
            println!("        error: {err}");
        }
        for mismatch in &result.mismatches {
            println!("        {mismatch}");
        }
    }

    pub fn print_summary(&self) {
        println!();
        println!("Results: {} passed, {} failed", self.passed, self.failed);
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
