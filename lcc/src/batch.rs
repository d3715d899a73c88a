use crate::config::Config;
use crate::diag::Diagnostics;
use crate::driver;
use crate::error::Error;
use color_print::cprintln;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Result of compiling one file of a test run
#[derive(Debug)]
pub struct Outcome {
    pub path: PathBuf,
    pub elapsed: Duration,
    pub diagnostics: Diagnostics,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    pub fn print(&self, source: &str) {
        if self.passed() {
            cprintln!(
                "<green,bold>[PASSED]</> - '{}' in {:.3}s",
                self.path.display(),
                self.elapsed.as_secs_f64()
            );
        } else {
            cprintln!("<red,bold>[FAILED]</> - '{}'", self.path.display());
            self.diagnostics.print(source);
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            write!(
                f,
                "[PASSED] - '{}' in {:.3}s",
                self.path.display(),
                self.elapsed.as_secs_f64()
            )
        } else {
            writeln!(f, "[FAILED] - '{}'", self.path.display())?;
            write!(f, "{}", self.diagnostics)
        }
    }
}

#[derive(Debug, Default)]
pub struct Report(pub Vec<Outcome>);

impl Report {
    pub fn passed(&self) -> usize {
        self.0.iter().filter(|outcome| outcome.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.0.len() - self.passed()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s): {} passed, {} failed",
            self.0.len(),
            self.passed(),
            self.failed()
        )
    }
}

/// Compile each file, writing its outputs, and time it
pub fn run(paths: &[PathBuf], config: &Config) -> Result<Report, Error> {
    let mut report = Report::default();
    for path in paths {
        report.0.push(run_one(path, config)?);
    }
    Ok(report)
}

fn run_one(path: &Path, config: &Config) -> Result<Outcome, Error> {
    let start = Instant::now();
    let (source, compilation) = driver::compile_file(path, config)?;
    let elapsed = start.elapsed();
    driver::write_outputs(path, None, &compilation, &config.dumps)?;

    let outcome = Outcome {
        path: path.to_path_buf(),
        elapsed,
        diagnostics: compilation.diagnostics,
    };
    outcome.print(&source);
    Ok(outcome)
}

#[test]
fn test() {
    use crate::diag::Kind;

    let mut diagnostics = Diagnostics::new("bad.l");
    diagnostics.push(Kind::UndefinedMain, None, 1);
    let report = Report(vec![
        Outcome {
            path: PathBuf::from("good.l"),
            elapsed: Duration::from_millis(1500),
            diagnostics: Diagnostics::new("good.l"),
        },
        Outcome {
            path: PathBuf::from("bad.l"),
            elapsed: Duration::from_millis(2),
            diagnostics,
        },
    ]);
    assert_eq!(report.0[0].to_string(), "[PASSED] - 'good.l' in 1.500s");
    assert_eq!(
        report.0[1].to_string(),
        "[FAILED] - 'bad.l'\nbad.l:1: error: undefined reference to 'main'\n"
    );
    assert_eq!(report.to_string(), "2 file(s): 1 passed, 1 failed");
}
