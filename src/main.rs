use clap::Parser;
use ringstream::RingBufferStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Pumps a synthetic byte stream through a ring buffer stream, reading back
/// half of every chunk so the ring fills up and starts overwriting.
#[derive(Debug, Parser)]
#[command(name = "ringstream", version)]
struct Args {
    /// Ring capacity in bytes
    #[arg(long, default_value_t = 64 * 1024)]
    capacity: usize,

    /// Bytes written per iteration
    #[arg(long, default_value_t = 4096)]
    chunk: usize,

    /// Seconds between status lines
    #[arg(long, default_value_t = 5)]
    report_secs: u64,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!("ringstream v{}", env!("CARGO_PKG_VERSION"));
    info!("Press Ctrl+C to stop");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        info!("Shutting down...");
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| format!("Failed to set Ctrl+C handler: {}", e))?;

    let stream = RingBufferStream::new(args.capacity)?;
    let payload: Vec<u8> = (0..args.chunk).map(|i| i as u8).collect();
    let mut scratch = vec![0u8; args.chunk];
    let report_every = Duration::from_secs(args.report_secs);

    let mut total_written = 0u64;
    let mut total_read = 0u64;
    let mut last_report = Instant::now();

    info!(capacity = args.capacity, chunk = args.chunk, "Pumping bytes");

    while running.load(Ordering::SeqCst) {
        stream.write(&payload, 0, payload.len())?;
        total_written += payload.len() as u64;

        total_read += stream.read(&mut scratch, 0, args.chunk / 2)? as u64;

        if last_report.elapsed() >= report_every {
            info!(
                total_written,
                total_read,
                len = stream.len(),
                available = stream.available(),
                full = stream.is_full(),
                "status"
            );
            last_report = Instant::now();
        }

        std::thread::sleep(Duration::from_millis(10));
    }

    let discarded = total_written - total_read - stream.len() as u64;
    stream.close();

    info!(total_written, total_read, discarded, "Stream closed");
    Ok(())
}
