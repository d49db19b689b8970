use clap::Parser;
use ringstream::RingBufferStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Producer and consumer threads hammering one shared ring buffer stream.
#[derive(Debug, Parser)]
#[command(name = "stress")]
struct Args {
    #[arg(long, default_value_t = 64 * 1024 * 1024)]
    capacity: usize,

    #[arg(long, default_value_t = 64)]
    chunk: usize,

    #[arg(long, default_value_t = 5)]
    seconds: u64,
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
    info!("ring buffer stream stress test");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| format!("Failed to set Ctrl+C handler: {}", e))?;

    let stream = RingBufferStream::new(args.capacity)
        .map_err(|e| format!("Failed to create ring buffer stream: {}", e))?;
    let chunk = args.chunk;

    std::thread::scope(|scope| -> Result<(), Box<dyn std::error::Error>> {
        let writer_running = running.clone();
        let stream = &stream;
        let writer = scope.spawn(move || -> Result<u64, ringstream::RingError> {
            let payload: Vec<u8> = (0..chunk).map(|i| i as u8).collect();
            let mut written = 0u64;

            while writer_running.load(Ordering::Relaxed) {
                stream.write(&payload, 0, chunk)?;
                written += chunk as u64;
            }

            Ok(written)
        });

        let reader_running = running.clone();
        let reader = scope.spawn(move || -> Result<u64, ringstream::RingError> {
            let mut scratch = vec![0u8; chunk];
            let mut read = 0u64;

            loop {
                let n = stream.read(&mut scratch, 0, chunk)?;
                read += n as u64;

                if n == 0 && !reader_running.load(Ordering::Relaxed) {
                    break;
                }
            }

            Ok(read)
        });

        info!("Running for {} seconds...", args.seconds);
        let started = Instant::now();
        let deadline = started + Duration::from_secs(args.seconds);
        while running.load(Ordering::SeqCst) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(50));
        }
        running.store(false, Ordering::SeqCst);

        let written = writer.join().map_err(|_| "writer thread panicked")??;
        let read = reader.join().map_err(|_| "reader thread panicked")??;
        let elapsed = started.elapsed().as_secs_f64();
        let remaining = stream.len() as u64;

        info!("Results:");
        info!("  Written to ring: {} bytes", written);
        info!("  Read from ring: {} bytes", read);
        info!("  Left in ring: {} bytes", remaining);
        info!("  Overwritten: {} bytes", overwritten(written, read, remaining));
        info!(
            "  Throughput: {:.2} MB/sec",
            written as f64 / elapsed / 1024.0 / 1024.0
        );

        Ok(())
    })?;

    stream.close();
    Ok(())
}

/// Bytes the ring discarded: whatever was written but neither read nor still held.
fn overwritten(written: u64, read: u64, remaining: u64) -> u64 {
    written.saturating_sub(read + remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_still_in_ring_are_not_overwritten() {
        let stream = RingBufferStream::new(8).unwrap();
        stream.write(&[1, 2, 3, 4, 5], 0, 5).unwrap();
        let mut scratch = [0u8; 2];
        let read = stream.read(&mut scratch, 0, 2).unwrap() as u64;

        assert_eq!(overwritten(5, read, stream.len() as u64), 0);
    }

    #[test]
    fn overflow_is_counted_once() {
        let stream = RingBufferStream::new(4).unwrap();
        stream.write(&[0u8; 10], 0, 10).unwrap();
        let mut scratch = [0u8; 1];
        let read = stream.read(&mut scratch, 0, 1).unwrap() as u64;

        assert_eq!(overwritten(10, read, stream.len() as u64), 6);
    }
}
