use anyhow::{Context, Result};
use log::{Level, LevelFilter, Log, Metadata, Record};

use os_scheduling_simulator::kernel::{ReadWrite, Snapshot, SnapshotTarget, SystemCallRequest};
use os_scheduling_simulator::{Driver, SystemConfig};

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let tag = match record.level() {
                Level::Error => "ERROR",
                Level::Warn => "WARN ",
                Level::Info => "INFO ",
                Level::Debug => "DEBUG",
                Level::Trace => "TRACE",
            };
            eprintln!("[{}] {}", tag, record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logger(level: LevelFilter) -> Result<()> {
    let logger = Box::new(StderrLogger { level });
    log::set_boxed_logger(logger).context("Failed to install logger")?;
    log::set_max_level(level);
    Ok(())
}

fn print_snapshot(driver: &Driver, target: SnapshotTarget) -> Result<()> {
    let snapshot = driver
        .snapshot(&target)
        .with_context(|| format!("Failed to snapshot {:?}", target))?;

    match snapshot {
        Snapshot::Ready(views) => {
            println!("...Ready queue:");
            for view in views {
                println!("...... #{:02} | est. burst {:05.2}", view.pid, view.next_estimated_burst);
            }
        }
        Snapshot::Cpu(view) => match view {
            Some(view) => println!("...CPU: #{:02} | est. burst {:05.2}", view.pid, view.next_estimated_burst),
            None => println!("...CPU: idle"),
        },
        Snapshot::JobPool(views) => {
            println!("...Job pool:");
            for view in views {
                println!("...... #{:02} | size {}", view.pid, view.size);
            }
        }
        Snapshot::Memory { frame_size, frames, free_frames } => {
            println!("...Frame table ({} byte frames):", frame_size);
            println!("... Frame | PID | Page");
            println!("...-------|-----|-----");
            for (frame, entry) in frames.iter().enumerate() {
                match entry {
                    Some(entry) => println!("... {:#05x} | {:03} | {:#04x}", frame, entry.pid, entry.page),
                    None => println!("... {:#05x} |  -  |  -", frame),
                }
            }
            println!("...Free frames: {:?}", free_frames);
        }
        Snapshot::Device { name, kind, queue } => {
            println!("...{} ({:?}):", name, kind);
            for view in queue {
                println!(
                    "...... #{:02} | {} | {:?} | cylinder {:?}",
                    view.pid,
                    view.params.file_name.as_deref().unwrap_or("-"),
                    view.params.rw,
                    view.params.cylinder
                );
            }
        }
    }

    Ok(())
}

fn disk_read(file_name: &str, cylinder: u32, elapsed: f64) -> SystemCallRequest {
    SystemCallRequest {
        file_name: file_name.to_string(),
        logical_address: 0,
        rw: ReadWrite::Read,
        file_length: None,
        cylinder: Some(cylinder),
        elapsed,
    }
}

fn main() -> Result<()> {
    let config = SystemConfig::default();
    init_logger(config.log_level)?;

    let mut driver = Driver::new(&config).context("Failed to generate system")?;

    println!("Starting the driver.");
    for (name, kind) in driver.devices() {
        println!("...Device {} ({:?})", name, kind);
    }

    println!("Admitting processes.");
    for (size, tau) in [(300, 10.0), (200, 4.0), (150, 6.0), (400, 3.0)] {
        let pid = driver.admit_process(size, 0.5, tau)?;
        println!("...Process #{:02} created ({} bytes)", pid, size);
    }
    print_snapshot(&driver, SnapshotTarget::Cpu)?;
    print_snapshot(&driver, SnapshotTarget::Ready)?;
    print_snapshot(&driver, SnapshotTarget::JobPool)?;

    println!("Issuing disk requests.");
    driver.system_call("d1", disk_read("a.dat", 70, 6.0))?;
    driver.system_call("d1", disk_read("b.dat", 15, 2.5))?;
    print_snapshot(&driver, SnapshotTarget::Device("d1".to_string()))?;

    println!("Printing from the active process.");
    driver.system_call(
        "p1",
        SystemCallRequest {
            file_name: "report.txt".to_string(),
            logical_address: 120,
            rw: ReadWrite::Write,
            file_length: Some(80),
            cylinder: None,
            elapsed: 3.0,
        },
    )?;

    println!("Completing device requests.");
    while let Ok(pid) = driver.device_interrupt("d1") {
        println!("...d1 completed #{:02}", pid);
    }
    let pid = driver.device_interrupt("p1")?;
    println!("...p1 completed #{:02}", pid);
    print_snapshot(&driver, SnapshotTarget::Ready)?;

    println!("Terminating the active process.");
    let report = driver.terminate_active_process()?;
    println!(
        "...#{:02} | total CPU time {:05.2} | avg burst {:05.2} | admitted from job pool {:?}",
        report.pid, report.total_cpu_time, report.avg_burst_time, report.admitted
    );
    print_snapshot(&driver, SnapshotTarget::Memory)?;
    print_snapshot(&driver, SnapshotTarget::JobPool)?;

    Ok(())
}
