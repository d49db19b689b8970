use ringstream::RingBufferStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[test]
fn consumer_that_keeps_up_sees_every_byte_in_order() {
    const TOTAL: usize = 64 * 1024;
    const CHUNK: usize = 97;

    let stream = Arc::new(RingBufferStream::new(1024).unwrap());

    let producer = {
        let stream = Arc::clone(&stream);
        thread::spawn(move || {
            let data: Vec<u8> = (0..TOTAL).map(|i| (i % 251) as u8).collect();
            let mut sent = 0;
            while sent < TOTAL {
                let count = CHUNK.min(TOTAL - sent);
                // only the consumer shrinks the ring, so free space cannot vanish here
                if stream.capacity() - stream.len() < count {
                    thread::yield_now();
                    continue;
                }
                stream.write(&data, sent, count).unwrap();
                sent += count;
            }
        })
    };

    let mut received = Vec::with_capacity(TOTAL);
    let mut buf = [0u8; 256];
    let want = buf.len();
    while received.len() < TOTAL {
        let n = stream.read(&mut buf, 0, want).unwrap();
        if n == 0 {
            thread::yield_now();
        }
        received.extend_from_slice(&buf[..n]);
    }
    producer.join().unwrap();

    assert!(received.iter().enumerate().all(|(i, &b)| b == (i % 251) as u8));
    assert!(stream.is_empty());
}

#[test]
fn concurrent_writers_never_exceed_capacity() {
    const CAPACITY: usize = 64;

    let stream = Arc::new(RingBufferStream::new(CAPACITY).unwrap());
    let done = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = (0..4u8)
        .map(|id| {
            let stream = Arc::clone(&stream);
            thread::spawn(move || {
                let chunk = [id; 13];
                for _ in 0..2_000 {
                    stream.write(&chunk, 0, chunk.len()).unwrap();
                }
            })
        })
        .collect();

    let reader = {
        let stream = Arc::clone(&stream);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut buf = [0u8; 32];
            let want = buf.len();
            let mut total = 0usize;
            while !done.load(Ordering::Acquire) {
                let len = stream.len();
                assert!(len <= CAPACITY);
                total += stream.read(&mut buf, 0, want).unwrap();
                assert!(buf.iter().all(|&b| b < 4));
            }
            total
        })
    };

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::Release);
    let read = reader.join().unwrap();

    assert!(stream.len() <= CAPACITY);
    assert!(read + stream.len() <= 4 * 2_000 * 13);
}

#[test]
fn dispose_races_cleanly_with_writers() {
    let stream = Arc::new(RingBufferStream::new(128).unwrap());

    let writer = {
        let stream = Arc::clone(&stream);
        thread::spawn(move || {
            let mut accepted = 0u32;
            loop {
                match stream.write(b"payload", 0, 7) {
                    Ok(()) => accepted += 1,
                    Err(ringstream::RingError::Disposed) => return accepted,
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
        })
    };

    thread::sleep(std::time::Duration::from_millis(5));
    stream.dispose();
    writer.join().unwrap();

    assert!(stream.is_disposed());
    assert_eq!(stream.len(), 0);
}
